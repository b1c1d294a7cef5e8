//! Document-level consistency checks.
//!
//! Decoding accepts any well-shaped document. [`Idl::validate`] then checks
//! the properties a code generator relies on: unique names, resolvable type
//! references and distinct discriminators.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;

use crate::error::ValidationError;
use crate::error::ValidationErrors;
use crate::model::Discriminator;
use crate::model::EnumFields;
use crate::model::Field;
use crate::model::Idl;
use crate::model::IdlType;
use crate::model::Instruction;
use crate::model::TypeDef;
use crate::model::TypeDefTy;
use crate::walk::for_each_account;

impl Idl {
	/// Check the document for consistency, reporting every problem found.
	pub fn validate(&self) -> Result<(), ValidationErrors> {
		let mut validator = Validator {
			idl: self,
			errors: Vec::new(),
		};
		validator.run();

		debug!(issues = validator.errors.len(), "validated idl document");
		if validator.errors.is_empty() {
			Ok(())
		} else {
			Err(ValidationErrors(validator.errors))
		}
	}
}

struct Validator<'a> {
	idl: &'a Idl,
	errors: Vec<ValidationError>,
}

impl<'a> Validator<'a> {
	fn run(&mut self) {
		let idl = self.idl;

		self.unique_names("instruction", idl.instructions.iter().map(|ix| ix.name.as_str()));
		self.unique_names("type", idl.types.iter().map(|def| def.name.as_str()));
		self.unique_names("account", idl.accounts.iter().map(|def| def.name.as_str()));
		self.unique_names("event", idl.events.iter().map(|event| event.name.as_str()));
		self.unique_names("constant", idl.constants.iter().map(|c| c.name.as_str()));
		self.unique_names("error", idl.errors.iter().map(|error| error.name.as_str()));
		self.unique_error_codes();

		self.unique_discriminators(
			"instruction",
			idl.instructions
				.iter()
				.map(|ix| (ix.name.as_str(), ix.discriminator.as_ref())),
		);
		self.unique_discriminators(
			"account",
			idl.accounts
				.iter()
				.map(|def| (def.name.as_str(), def.discriminator.as_ref())),
		);
		self.unique_discriminators(
			"event",
			idl.events
				.iter()
				.map(|event| (event.name.as_str(), event.discriminator.as_ref())),
		);

		for ix in &idl.instructions {
			self.instruction(ix, &format!("instruction `{}`", ix.name));
		}
		if let Some(state) = &idl.state {
			self.type_def(&state.state_struct, "state");
			for method in &state.methods {
				self.instruction(method, &format!("state method `{}`", method.name));
			}
		}
		for def in &idl.accounts {
			self.type_def(def, &format!("account `{}`", def.name));
		}
		for def in &idl.types {
			if def.ty.is_none() {
				self.errors.push(ValidationError::MissingLayout {
					name: def.name.clone(),
				});
			}
			self.type_def(def, &format!("type `{}`", def.name));
		}
		for constant in &idl.constants {
			self.idl_type(&constant.ty, &format!("constant `{}`", constant.name));
		}
	}

	fn unique_names(&mut self, scope: &'static str, names: impl Iterator<Item = &'a str>) {
		let mut seen = HashSet::new();
		let mut reported = HashSet::new();
		for name in names {
			if !seen.insert(name) && reported.insert(name) {
				self.errors.push(ValidationError::DuplicateName {
					scope,
					name: name.to_owned(),
				});
			}
		}
	}

	fn unique_error_codes(&mut self) {
		let mut seen: HashMap<u32, &str> = HashMap::new();
		for error in &self.idl.errors {
			if let Some(first) = seen.get(&error.code) {
				self.errors.push(ValidationError::DuplicateErrorCode {
					code: error.code,
					first: (*first).to_owned(),
					second: error.name.clone(),
				});
			} else {
				seen.insert(error.code, &error.name);
			}
		}
	}

	fn unique_discriminators(
		&mut self,
		scope: &'static str,
		entries: impl Iterator<Item = (&'a str, Option<&'a Discriminator>)>,
	) {
		let mut seen: HashMap<&Discriminator, &str> = HashMap::new();
		for (name, discriminator) in entries {
			let Some(discriminator) = discriminator else {
				continue;
			};
			if let Some(first) = seen.get(discriminator) {
				self.errors.push(ValidationError::DuplicateDiscriminator {
					scope,
					first: (*first).to_owned(),
					second: name.to_owned(),
				});
			} else {
				seen.insert(discriminator, name);
			}
		}
	}

	fn non_empty(&mut self, name: &str, location: impl FnOnce() -> String) {
		if name.is_empty() {
			self.errors.push(ValidationError::EmptyName {
				location: location(),
			});
		}
	}

	fn instruction(&mut self, ix: &Instruction, location: &str) {
		self.non_empty(&ix.name, || location.to_owned());

		let mut seen = HashSet::new();
		let mut leaves = Vec::new();
		for_each_account(&ix.accounts, |leaf| leaves.push(leaf.qualified_name()));
		for qualified in leaves {
			if qualified.is_empty() || qualified.ends_with('/') {
				self.errors.push(ValidationError::EmptyName {
					location: format!("{location}, account `{qualified}`"),
				});
			} else if !seen.insert(qualified.clone()) {
				self.errors.push(ValidationError::DuplicateAccount {
					instruction: ix.name.clone(),
					account: qualified,
				});
			}
		}

		for arg in &ix.args {
			self.field(arg, &format!("{location}, argument"));
		}
	}

	fn type_def(&mut self, def: &TypeDef, location: &str) {
		self.non_empty(&def.name, || location.to_owned());
		match &def.ty {
			None => {}
			Some(TypeDefTy::Struct { fields }) => {
				for field in fields {
					self.field(field, &format!("{location}, field"));
				}
			}
			Some(TypeDefTy::Enum { variants }) => {
				let mut seen = HashSet::new();
				for variant in variants.iter() {
					let variant_location = format!("{location}, variant `{}`", variant.name);
					self.non_empty(&variant.name, || variant_location.clone());
					if !variant.name.is_empty() && !seen.insert(variant.name.as_str()) {
						self.errors.push(ValidationError::DuplicateVariant {
							type_name: def.name.clone(),
							variant: variant.name.clone(),
						});
					}
					match &variant.fields {
						Some(EnumFields::Named(fields)) => {
							for field in fields {
								self.field(field, &format!("{variant_location}, field"));
							}
						}
						Some(EnumFields::Tuple(types)) => {
							for (index, ty) in types.iter().enumerate() {
								self.idl_type(ty, &format!("{variant_location}, element {index}"));
							}
						}
						None => {}
					}
				}
			}
		}
	}

	fn field(&mut self, field: &Field, location: &str) {
		let location = format!("{location} `{}`", field.name);
		self.non_empty(&field.name, || location.clone());
		self.idl_type(&field.ty, &location);
	}

	fn idl_type(&mut self, ty: &IdlType, location: &str) {
		let Some(name) = ty.defined_name() else {
			return;
		};
		if self.idl.get_by_name(name).is_none() {
			self.errors.push(ValidationError::UnresolvedType {
				location: location.to_owned(),
				name: name.to_owned(),
			});
		}
	}
}
