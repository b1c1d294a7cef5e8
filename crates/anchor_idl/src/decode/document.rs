use serde_json::Value;
use tracing::debug;

use super::Decoder;
use super::JsonPath;
use crate::error::DecodeError;
use crate::error::Shape;
use crate::model::Constant;
use crate::model::EnumVariant;
use crate::model::EnumVariants;
use crate::model::ErrorCode;
use crate::model::Event;
use crate::model::Field;
use crate::model::Idl;
use crate::model::IdlState;
use crate::model::Instruction;
use crate::model::Metadata;
use crate::model::TypeDef;
use crate::model::TypeDefTy;
use crate::model::TypeDefs;

impl Decoder {
	pub(super) fn document(&self, value: &Value, path: &JsonPath<'_>) -> Result<Idl, DecodeError> {
		let map = self.object(value, path)?;

		let state = match Self::optional(map, "state") {
			Some(state) => Some(self.state(state, &path.key("state"))?),
			None => None,
		};
		let metadata = match Self::optional(map, "metadata") {
			Some(metadata) => Some(self.metadata(metadata, &path.key("metadata"))?),
			None => None,
		};

		let idl = Idl {
			version: self.string(map, "version", path)?,
			docs: self.docs(map, path)?,
			instructions: self.list(map, "instructions", path, |v, p| self.instruction(v, p))?,
			state,
			accounts: self.type_defs(map, "accounts", path)?,
			types: self.type_defs(map, "types", path)?,
			events: self.list(map, "events", path, |v, p| self.event(v, p))?,
			errors: self.list(map, "errors", path, |v, p| self.error_code(v, p))?,
			constants: self.list(map, "constants", path, |v, p| self.constant(v, p))?,
			address: self
				.opt_string(map, "address", path)?
				.filter(|address| !address.is_empty()),
			metadata,
		};

		debug!(
			instructions = idl.instructions.len(),
			accounts = idl.accounts.len(),
			types = idl.types.len(),
			events = idl.events.len(),
			errors = idl.errors.len(),
			"decoded idl document"
		);
		Ok(idl)
	}

	fn instruction(&self, value: &Value, path: &JsonPath<'_>) -> Result<Instruction, DecodeError> {
		let map = self.object(value, path)?;
		Ok(Instruction {
			name: self.string(map, "name", path)?,
			discriminator: self.discriminator(map, path)?,
			docs: self.docs(map, path)?,
			accounts: self.list(map, "accounts", path, |v, p| self.account_item(v, p, 0))?,
			args: self.list(map, "args", path, |v, p| self.field(v, p, 0))?,
		})
	}

	fn state(&self, value: &Value, path: &JsonPath<'_>) -> Result<IdlState, DecodeError> {
		let map = self.object(value, path)?;
		let state_struct = Self::required(map, "struct", path)?;
		Ok(IdlState {
			state_struct: self.type_def(state_struct, &path.key("struct"))?,
			methods: self.list(map, "methods", path, |v, p| self.instruction(v, p))?,
		})
	}

	fn type_defs(
		&self,
		map: &serde_json::Map<String, Value>,
		key: &str,
		path: &JsonPath<'_>,
	) -> Result<TypeDefs, DecodeError> {
		self.list(map, key, path, |v, p| self.type_def(v, p))
			.map(TypeDefs::new)
	}

	fn type_def(&self, value: &Value, path: &JsonPath<'_>) -> Result<TypeDef, DecodeError> {
		let map = self.object(value, path)?;
		let ty = match Self::optional(map, "type") {
			Some(ty) => Some(self.type_def_ty(ty, &path.key("type"))?),
			None => None,
		};
		Ok(TypeDef {
			name: self.string(map, "name", path)?,
			docs: self.docs(map, path)?,
			discriminator: self.discriminator(map, path)?,
			ty,
		})
	}

	fn type_def_ty(&self, value: &Value, path: &JsonPath<'_>) -> Result<TypeDefTy, DecodeError> {
		let map = self.object(value, path)?;
		match map.get("kind").and_then(Value::as_str) {
			Some("struct") => {
				Ok(TypeDefTy::Struct {
					fields: self.list(map, "fields", path, |v, p| self.field(v, p, 0))?,
				})
			}
			Some("enum") => {
				Ok(TypeDefTy::Enum {
					variants: EnumVariants::new(
						self.list(map, "variants", path, |v, p| self.variant(v, p))?,
					),
				})
			}
			_ => Err(self.unrecognized(value, Shape::TypeDefTy, path)),
		}
	}

	fn variant(&self, value: &Value, path: &JsonPath<'_>) -> Result<EnumVariant, DecodeError> {
		let map = self.object(value, path)?;
		let fields = match Self::optional(map, "fields") {
			Some(fields) => self.enum_fields(fields, &path.key("fields"), 0)?,
			None => None,
		};
		Ok(EnumVariant {
			name: self.string(map, "name", path)?,
			docs: self.docs(map, path)?,
			fields,
		})
	}

	pub(super) fn field(
		&self,
		value: &Value,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<Field, DecodeError> {
		let map = self.object(value, path)?;
		let ty = Self::required(map, "type", path)?;
		Ok(Field {
			name: self.string(map, "name", path)?,
			docs: self.docs(map, path)?,
			ty: self.idl_type(ty, &path.key("type"), depth)?,
		})
	}

	fn event(&self, value: &Value, path: &JsonPath<'_>) -> Result<Event, DecodeError> {
		let map = self.object(value, path)?;
		Ok(Event {
			name: self.string(map, "name", path)?,
			discriminator: self.discriminator(map, path)?,
		})
	}

	fn error_code(&self, value: &Value, path: &JsonPath<'_>) -> Result<ErrorCode, DecodeError> {
		let map = self.object(value, path)?;
		let code = match Self::optional(map, "code") {
			None => 0,
			Some(code) => {
				code.as_u64()
					.and_then(|code| u32::try_from(code).ok())
					.ok_or_else(|| self.unrecognized(code, Shape::Integer, &path.key("code")))?
			}
		};
		Ok(ErrorCode {
			code,
			name: self.string(map, "name", path)?,
			msg: self.opt_string(map, "msg", path)?,
		})
	}

	fn constant(&self, value: &Value, path: &JsonPath<'_>) -> Result<Constant, DecodeError> {
		let map = self.object(value, path)?;
		let ty = Self::required(map, "type", path)?;
		Ok(Constant {
			name: self.string(map, "name", path)?,
			ty: self.idl_type(ty, &path.key("type"), 0)?,
			value: self.string(map, "value", path)?,
			docs: self.docs(map, path)?,
		})
	}

	fn metadata(&self, value: &Value, path: &JsonPath<'_>) -> Result<Metadata, DecodeError> {
		let map = self.object(value, path)?;
		Ok(Metadata {
			name: self.string(map, "name", path)?,
			address: self.string(map, "address", path)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::model::AccountItem;
	use crate::model::EnumFields;
	use crate::model::IdlType;
	use crate::model::TypeDefKind;

	fn decode(value: &Value) -> Result<Idl, DecodeError> {
		Decoder::default().decode_value(value)
	}

	#[test]
	fn decodes_minimal_document() {
		let idl = decode(&json!({ "version": "0.1.0", "instructions": [] }))
			.unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(idl.version, "0.1.0");
		assert!(idl.instructions.is_empty());
		assert!(idl.state.is_none());
		assert!(idl.address.is_none());
	}

	#[test]
	fn top_level_must_be_an_object() {
		assert!(matches!(
			decode(&json!([])),
			Err(DecodeError::UnrecognizedShape { expected: Shape::Object, .. })
		));
		assert!(matches!(
			decode(&Value::Null),
			Err(DecodeError::NullEnvelope { .. })
		));
	}

	#[test]
	fn field_without_type_is_missing_key() {
		let err = decode(&json!({
			"instructions": [{ "name": "ix", "accounts": [], "args": [{ "name": "amount" }] }]
		}))
		.err();
		assert!(matches!(
			err,
			Some(DecodeError::MissingKey { ref path, key: "type" }) if path == "instructions[0].args[0]"
		));
	}

	#[test]
	fn field_with_null_type_is_null_envelope() {
		let err = decode(&json!({
			"instructions": [{}, {}, { "name": "ix", "args": [{ "name": "amount", "type": null }] }]
		}))
		.err();
		assert!(matches!(
			err,
			Some(DecodeError::NullEnvelope { ref path, expected: Shape::Type })
				if path == "instructions[2].args[0].type"
		));
	}

	#[test]
	fn decodes_nested_account_groups() {
		let idl = decode(&json!({
			"instructions": [{
				"name": "swap",
				"accounts": [
					{ "name": "user", "signer": true },
					{ "name": "pool", "accounts": [
						{ "name": "state", "writable": true },
						{ "name": "vaults", "accounts": [{ "name": "a", "writable": true }] }
					]}
				],
				"args": []
			}]
		}))
		.unwrap_or_else(|e| panic!("{e}"));

		let ix = &idl.instructions[0];
		assert_eq!(ix.num_accounts(), 3);
		let AccountItem::Group(pool) = &ix.accounts[1] else {
			panic!("expected group");
		};
		assert_eq!(pool.name, "pool");
		assert_eq!(pool.accounts[1].name(), "vaults");
	}

	#[test]
	fn decodes_type_definitions() {
		let idl = decode(&json!({
			"types": [
				{ "name": "Side", "type": { "kind": "enum", "variants": [{ "name": "Bid" }, { "name": "Ask", "fields": [] }] } },
				{ "name": "Order", "type": { "kind": "struct", "fields": [
					{ "name": "side", "type": { "defined": { "name": "Side" } } },
					{ "name": "price", "type": "u64" }
				] } },
				{ "name": "Event", "type": { "kind": "enum", "variants": [
					{ "name": "Fill", "fields": [{ "name": "order", "type": { "defined": { "name": "Order" } } }] },
					{ "name": "Cancel", "fields": ["u64"] }
				] } }
			]
		}))
		.unwrap_or_else(|e| panic!("{e}"));

		let side = idl.get_by_name("Side").unwrap_or_else(|| panic!("Side missing"));
		assert_eq!(side.kind(), Some(TypeDefKind::Enum));
		assert!(side.is_simple_enum());

		let order = idl.get_by_name("Order").unwrap_or_else(|| panic!("Order missing"));
		assert_eq!(order.fields().map(<[Field]>::len), Some(2));

		let event = idl.get_by_name("Event").unwrap_or_else(|| panic!("Event missing"));
		assert!(!event.is_simple_enum());
		let variants = event.variants().unwrap_or_else(|| panic!("not an enum"));
		assert!(matches!(variants[0].fields, Some(EnumFields::Named(_))));
		assert_eq!(
			variants[1].fields,
			Some(EnumFields::Tuple(vec![IdlType::scalar("u64")]))
		);
	}

	#[test]
	fn unknown_type_kind_is_rejected() {
		let err = decode(&json!({ "types": [{ "name": "T", "type": { "kind": "union" } }] })).err();
		assert!(matches!(
			err,
			Some(DecodeError::UnrecognizedShape { ref path, expected: Shape::TypeDefTy, .. })
				if path == "types[0].type"
		));
	}

	#[test]
	fn decodes_errors_constants_and_metadata() {
		let idl = decode(&json!({
			"errors": [{ "code": 6000, "name": "Overflow", "msg": "math overflow" }, { "code": 6001, "name": "Bare" }],
			"constants": [{ "name": "SEED", "type": "bytes", "value": "[115, 101, 101, 100]" }],
			"metadata": { "name": "demo", "address": "Demo111111111111111111111111111111111111111" },
			"state": null
		}))
		.unwrap_or_else(|e| panic!("{e}"));

		assert_eq!(
			idl.error_by_code(6000).and_then(|e| e.msg.as_deref()),
			Some("math overflow")
		);
		assert_eq!(idl.errors[1].msg, None);
		assert_eq!(idl.constants[0].ty, IdlType::scalar("bytes"));
		assert_eq!(
			idl.program_address(),
			Some("Demo111111111111111111111111111111111111111")
		);
		assert!(idl.state.is_none());
	}

	#[test]
	fn negative_error_code_is_rejected() {
		let err = decode(&json!({ "errors": [{ "code": -1, "name": "Bad" }] })).err();
		assert!(matches!(
			err,
			Some(DecodeError::UnrecognizedShape { expected: Shape::Integer, ref path, .. }) if path == "errors[0].code"
		));
	}

	#[test]
	fn decodes_legacy_state() {
		let idl = decode(&json!({
			"state": {
				"struct": { "name": "Global", "type": { "kind": "struct", "fields": [{ "name": "count", "type": "u64" }] } },
				"methods": [{ "name": "bump", "accounts": [{ "name": "authority", "signer": true }], "args": [] }]
			}
		}))
		.unwrap_or_else(|e| panic!("{e}"));

		let state = idl.state.unwrap_or_else(|| panic!("state missing"));
		assert_eq!(state.state_struct.name, "Global");
		assert_eq!(state.methods[0].num_accounts(), 1);
	}
}
