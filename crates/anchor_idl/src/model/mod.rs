//! Typed representation of an Anchor-style IDL document.
//!
//! Every value here is built once by [`crate::decode`] and only read
//! afterwards. Serializing a model produces the same wire shapes the decoder
//! accepts, with defaults filled in.

mod accounts;
mod ty;

use std::ops::Deref;

use serde::Serialize;

pub use self::accounts::Account;
pub use self::accounts::AccountGroup;
pub use self::accounts::AccountItem;
pub use self::accounts::AccountItems;
pub use self::accounts::Pda;
pub use self::accounts::PdaSeed;
pub use self::ty::ArrayType;
pub use self::ty::DefinedType;
pub use self::ty::IdlType;
pub use self::ty::ScalarType;

/// Fixed-width tag identifying an instruction, account or event on the wire.
pub type Discriminator = [u8; 8];

/// Root of a decoded IDL document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Idl {
	pub version: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	pub instructions: Vec<Instruction>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<IdlState>,
	#[serde(skip_serializing_if = "TypeDefs::is_empty")]
	pub accounts: TypeDefs,
	#[serde(skip_serializing_if = "TypeDefs::is_empty")]
	pub types: TypeDefs,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub events: Vec<Event>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<ErrorCode>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub constants: Vec<Constant>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Deprecated location of the program name and address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Metadata>,
}

impl Idl {
	/// Resolve a user-defined type reference.
	///
	/// `types` is searched first, then `accounts`. Within each collection the
	/// first declared entry wins.
	pub fn get_by_name(&self, name: &str) -> Option<&TypeDef> {
		self.types
			.get_by_name(name)
			.or_else(|| self.accounts.get_by_name(name))
	}

	/// The data layout of an account type.
	///
	/// Newer IDLs list accounts by name and discriminator only and keep the
	/// layout under `types`; older ones inline it.
	pub fn account_layout(&self, name: &str) -> Option<&TypeDefTy> {
		let account = self.accounts.get_by_name(name)?;
		account
			.ty
			.as_ref()
			.or_else(|| self.types.get_by_name(name)?.ty.as_ref())
	}

	pub fn instruction(&self, name: &str) -> Option<&Instruction> {
		self.instructions.iter().find(|ix| ix.name == name)
	}

	pub fn error_by_code(&self, code: u32) -> Option<&ErrorCode> {
		self.errors.iter().find(|error| error.code == code)
	}

	/// On-chain program address, falling back to the deprecated metadata
	/// block.
	pub fn program_address(&self) -> Option<&str> {
		self.address
			.as_deref()
			.or_else(|| self.metadata.as_ref().map(|m| m.address.as_str()))
			.filter(|address| !address.is_empty())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
	pub name: String,
	pub address: String,
}

/// Legacy program state block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdlState {
	#[serde(rename = "struct")]
	pub state_struct: TypeDef,
	pub methods: Vec<Instruction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Instruction {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discriminator: Option<Discriminator>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	pub accounts: Vec<AccountItem>,
	pub args: Vec<Field>,
}

impl Instruction {
	/// Number of leaf accounts the instruction takes.
	pub fn num_accounts(&self) -> usize {
		self.accounts.num_accounts()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
	pub name: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	#[serde(rename = "type")]
	pub ty: IdlType,
}

impl Field {
	pub fn new(name: impl Into<String>, ty: IdlType) -> Self {
		Self {
			name: name.into(),
			docs: Vec::new(),
			ty,
		}
	}
}

/// A named struct or enum definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDef {
	pub name: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discriminator: Option<Discriminator>,
	/// `None` for account declarations that carry no inline layout.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub ty: Option<TypeDefTy>,
}

impl TypeDef {
	pub fn kind(&self) -> Option<TypeDefKind> {
		self.ty.as_ref().map(TypeDefTy::kind)
	}

	pub fn fields(&self) -> Option<&[Field]> {
		match &self.ty {
			Some(TypeDefTy::Struct { fields }) => Some(fields),
			_ => None,
		}
	}

	pub fn variants(&self) -> Option<&EnumVariants> {
		match &self.ty {
			Some(TypeDefTy::Enum { variants }) => Some(variants),
			_ => None,
		}
	}

	/// `true` for an enum whose variants all carry no fields.
	pub fn is_simple_enum(&self) -> bool {
		self.variants().is_some_and(EnumVariants::is_simple_enum)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
	Struct,
	Enum,
}

impl TypeDefKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Struct => "struct",
			Self::Enum => "enum",
		}
	}
}

/// Layout of a [`TypeDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDefTy {
	Struct { fields: Vec<Field> },
	Enum { variants: EnumVariants },
}

impl TypeDefTy {
	pub fn kind(&self) -> TypeDefKind {
		match self {
			Self::Struct { .. } => TypeDefKind::Struct,
			Self::Enum { .. } => TypeDefKind::Enum,
		}
	}
}

/// Ordered collection of type definitions with by-name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeDefs(Vec<TypeDef>);

impl TypeDefs {
	pub fn new(defs: Vec<TypeDef>) -> Self {
		Self(defs)
	}

	/// The first definition named `name`. Later duplicates are shadowed.
	pub fn get_by_name(&self, name: &str) -> Option<&TypeDef> {
		self.0.iter().find(|def| def.name == name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn into_inner(self) -> Vec<TypeDef> {
		self.0
	}
}

impl Deref for TypeDefs {
	type Target = [TypeDef];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<TypeDef>> for TypeDefs {
	fn from(defs: Vec<TypeDef>) -> Self {
		Self(defs)
	}
}

impl FromIterator<TypeDef> for TypeDefs {
	fn from_iter<I: IntoIterator<Item = TypeDef>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a TypeDefs {
	type IntoIter = std::slice::Iter<'a, TypeDef>;
	type Item = &'a TypeDef;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
	pub name: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fields: Option<EnumFields>,
}

impl EnumVariant {
	/// A variant without fields is encoded as its `u8` tag alone.
	pub fn is_simple(&self) -> bool {
		self.fields.is_none()
	}
}

/// Payload of an enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnumFields {
	Named(Vec<Field>),
	Tuple(Vec<IdlType>),
}

impl EnumFields {
	pub fn len(&self) -> usize {
		match self {
			Self::Named(fields) => fields.len(),
			Self::Tuple(types) => types.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Every type mentioned by the payload, in declaration order.
	pub fn types(&self) -> Vec<&IdlType> {
		match self {
			Self::Named(fields) => fields.iter().map(|field| &field.ty).collect(),
			Self::Tuple(types) => types.iter().collect(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnumVariants(Vec<EnumVariant>);

impl EnumVariants {
	pub fn new(variants: Vec<EnumVariant>) -> Self {
		Self(variants)
	}

	pub fn is_simple_enum(&self) -> bool {
		self.0.iter().all(EnumVariant::is_simple)
	}

	pub fn variant_names(&self) -> Vec<&str> {
		self.0.iter().map(|variant| variant.name.as_str()).collect()
	}
}

impl Deref for EnumVariants {
	type Target = [EnumVariant];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<EnumVariant>> for EnumVariants {
	fn from(variants: Vec<EnumVariant>) -> Self {
		Self(variants)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discriminator: Option<Discriminator>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorCode {
	pub code: u32,
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: IdlType,
	pub value: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
}
