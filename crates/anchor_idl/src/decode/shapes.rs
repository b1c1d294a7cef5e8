//! Resolution of the wire format's implicitly tagged unions.
//!
//! None of these unions carries an explicit discriminant: the variant is
//! inferred from which keys an object has, or from the shape of the first
//! element of an array.

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use super::Decoder;
use super::JsonPath;
use crate::error::DecodeError;
use crate::error::Shape;
use crate::model::Account;
use crate::model::AccountGroup;
use crate::model::AccountItem;
use crate::model::DefinedType;
use crate::model::EnumFields;
use crate::model::IdlType;
use crate::model::Pda;
use crate::model::ScalarType;

#[derive(Debug, Clone, Copy)]
enum TypeKey {
	Vec,
	Option,
	Defined,
	Array,
}

/// Keys that select a compound [`IdlType`]. Exactly one may be present.
const TYPE_KEYS: [(&str, TypeKey); 4] = [
	("vec", TypeKey::Vec),
	("option", TypeKey::Option),
	("defined", TypeKey::Defined),
	("array", TypeKey::Array),
];

impl Decoder {
	pub(super) fn idl_type(
		&self,
		value: &Value,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<IdlType, DecodeError> {
		let depth = self.descend(depth, path)?;
		let map = match value {
			Value::String(tag) => return Ok(IdlType::Scalar(ScalarType::from_tag(tag))),
			Value::Object(map) => map,
			other => return Err(self.unrecognized(other, Shape::Type, path)),
		};

		let present: Vec<(&str, TypeKey)> = TYPE_KEYS
			.iter()
			.copied()
			.filter(|(key, _)| map.contains_key(*key))
			.collect();

		let (key, kind) = match present.as_slice() {
			[single] => *single,
			[] => return Err(self.unrecognized(value, Shape::Type, path)),
			_ => {
				let keys = present
					.iter()
					.map(|(key, _)| format!("`{key}`"))
					.collect::<Vec<_>>()
					.join(", ");
				return Err(DecodeError::AmbiguousShape {
					path: path.to_string(),
					keys,
					payload: self.preview(value),
				});
			}
		};

		let inner_path = path.key(key);
		let inner = &map[key];
		trace!(path = %path, key, "decoding compound type");
		match kind {
			TypeKey::Vec => Ok(IdlType::Vec(Box::new(self.idl_type(inner, &inner_path, depth)?))),
			TypeKey::Option => {
				Ok(IdlType::Option(Box::new(
					self.idl_type(inner, &inner_path, depth)?,
				)))
			}
			TypeKey::Defined => self.defined_type(inner, &inner_path).map(IdlType::Defined),
			TypeKey::Array => self.array_type(inner, &inner_path, depth),
		}
	}

	/// Accepts `{"name": "Foo", "generics": [...]}` as well as the older bare
	/// `"Foo"`.
	fn defined_type(&self, value: &Value, path: &JsonPath<'_>) -> Result<DefinedType, DecodeError> {
		match value {
			Value::String(name) => Ok(DefinedType { name: name.clone() }),
			Value::Object(map) => {
				let name_value = Self::required(map, "name", path)?;
				let name = name_value
					.as_str()
					.ok_or_else(|| self.unrecognized(name_value, Shape::String, &path.key("name")))?;
				Ok(DefinedType {
					name: name.to_owned(),
				})
			}
			other => Err(self.unrecognized(other, Shape::Type, path)),
		}
	}

	fn array_type(
		&self,
		value: &Value,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<IdlType, DecodeError> {
		let invalid = |reason| {
			DecodeError::InvalidArray {
				path: path.to_string(),
				reason,
				payload: self.preview(value),
			}
		};

		let Some(pair) = value.as_array() else {
			return Err(invalid("expected an `[element, length]` pair"));
		};
		let [elem, len] = pair.as_slice() else {
			return Err(invalid("expected exactly two entries"));
		};

		let len = match len {
			Value::Number(number) => {
				if let Some(len) = number.as_u64() {
					usize::try_from(len).map_err(|_| invalid("length does not fit in usize"))?
				} else if number.is_i64() {
					return Err(invalid("length is negative"));
				} else {
					return Err(invalid("length is not a whole number"));
				}
			}
			_ => return Err(invalid("length is not a number")),
		};

		let elem = self.idl_type(elem, &path.index(0), depth)?;
		Ok(IdlType::array(elem, len))
	}

	pub(super) fn account_item(
		&self,
		value: &Value,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<AccountItem, DecodeError> {
		let depth = self.descend(depth, path)?;
		let Value::Object(map) = value else {
			return Err(self.unrecognized(value, Shape::AccountItem, path));
		};

		if map.contains_key("accounts") {
			trace!(path = %path, "decoding account group");
			return self.account_group(map, path, depth).map(AccountItem::Group);
		}
		if map.is_empty() {
			return Ok(AccountItem::Account(Account::default()));
		}
		if !is_leaf_account(map) {
			return Err(self.unrecognized(value, Shape::AccountItem, path));
		}
		self.account(map, path).map(AccountItem::Account)
	}

	fn account_group(
		&self,
		map: &Map<String, Value>,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<AccountGroup, DecodeError> {
		Ok(AccountGroup {
			name: self.string(map, "name", path)?,
			docs: self.docs(map, path)?,
			accounts: self.list(map, "accounts", path, |item, item_path| {
				self.account_item(item, item_path, depth)
			})?,
		})
	}

	fn account(&self, map: &Map<String, Value>, path: &JsonPath<'_>) -> Result<Account, DecodeError> {
		let pda = match Self::optional(map, "pda") {
			Some(value) => {
				Some(
					Pda::deserialize(value)
						.map_err(|_| self.unrecognized(value, Shape::Pda, &path.key("pda")))?,
				)
			}
			None => None,
		};

		Ok(Account {
			name: self.string(map, "name", path)?,
			docs: self.docs(map, path)?,
			signer: self.bool(map, "signer", path)?,
			writable: self.bool(map, "writable", path)?,
			optional: self.bool(map, "optional", path)?,
			address: self
				.opt_string(map, "address", path)?
				.filter(|address| !address.is_empty()),
			pda,
			relations: self.list(map, "relations", path, |value, item_path| {
				value
					.as_str()
					.map(str::to_owned)
					.ok_or_else(|| self.unrecognized(value, Shape::String, item_path))
			})?,
		})
	}

	/// `Ok(None)` for an empty list: such a variant has no payload.
	pub(super) fn enum_fields(
		&self,
		value: &Value,
		path: &JsonPath<'_>,
		depth: usize,
	) -> Result<Option<EnumFields>, DecodeError> {
		let Value::Array(items) = value else {
			return Err(self.unrecognized(value, Shape::EnumFields, path));
		};
		let Some(first) = items.first() else {
			return Ok(None);
		};

		// The first element decides for the whole list.
		let named = first
			.as_object()
			.and_then(|map| map.get("name"))
			.is_some_and(|name| !name.is_null());

		let decoded = items.iter().enumerate();
		let fields = if named {
			trace!(path = %path, "decoding named enum fields");
			EnumFields::Named(
				decoded
					.map(|(index, item)| self.field(item, &path.index(index), depth))
					.collect::<Result<_, _>>()?,
			)
		} else {
			trace!(path = %path, "decoding tuple enum fields");
			EnumFields::Tuple(
				decoded
					.map(|(index, item)| self.idl_type(item, &path.index(index), depth))
					.collect::<Result<_, _>>()?,
			)
		};
		Ok(Some(fields))
	}
}

/// An object is a single account when it carries any account flag, a
/// non-empty constant address, or derivation seeds.
fn is_leaf_account(map: &Map<String, Value>) -> bool {
	let has_address = map
		.get("address")
		.is_some_and(|address| !address.is_null() && address.as_str() != Some(""));

	map.contains_key("signer") || map.contains_key("writable") || has_address || map.contains_key("pda")
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn decode_type(value: &Value) -> Result<IdlType, DecodeError> {
		Decoder::default().idl_type(value, &JsonPath::ROOT.key("type"), 0)
	}

	fn decode_item(value: &Value) -> Result<AccountItem, DecodeError> {
		Decoder::default().account_item(value, &JsonPath::ROOT, 0)
	}

	#[test]
	fn unknown_scalar_is_kept_verbatim() {
		let ty = decode_type(&json!("publicKey")).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(ty.as_scalar().map(ScalarType::as_str), Some("publicKey"));
	}

	#[test]
	fn empty_object_is_not_a_type() {
		assert!(matches!(
			decode_type(&json!({})),
			Err(DecodeError::UnrecognizedShape { expected: Shape::Type, .. })
		));
	}

	#[test]
	fn conflicting_keys_are_ambiguous() {
		let err = decode_type(&json!({ "vec": "u8", "option": "u8" })).err();
		assert!(matches!(
			err,
			Some(DecodeError::AmbiguousShape { ref keys, .. }) if keys == "`vec`, `option`"
		));
	}

	#[test]
	fn null_type_is_a_null_envelope() {
		assert!(matches!(
			decode_type(&Value::Null),
			Err(DecodeError::NullEnvelope { expected: Shape::Type, .. })
		));
	}

	#[test]
	fn legacy_defined_string() {
		let ty = decode_type(&json!({ "defined": "Foo" })).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(ty, IdlType::defined("Foo"));
	}

	#[test]
	fn defined_with_generics_keeps_name() {
		let ty = decode_type(&json!({ "defined": { "name": "Wrapper", "generics": [{ "kind": "type", "type": "u8" }] } }))
			.unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(ty.defined_name(), Some("Wrapper"));
	}

	#[test]
	fn array_errors_point_at_the_pair() {
		let err = decode_type(&json!({ "array": ["u8", 1.5] })).err();
		assert!(matches!(
			err,
			Some(DecodeError::InvalidArray { ref path, reason: "length is not a whole number", .. })
				if path == "type.array"
		));
	}

	#[test]
	fn array_element_errors_point_into_the_pair() {
		let err = decode_type(&json!({ "array": [null, 4] })).err();
		assert!(matches!(
			err,
			Some(DecodeError::NullEnvelope { ref path, .. }) if path == "type.array[0]"
		));
	}

	#[test]
	fn depth_is_bounded() {
		let mut value = json!("u8");
		for _ in 0..40 {
			value = json!({ "vec": value });
		}
		assert!(matches!(decode_type(&value), Err(DecodeError::TooDeep { max_depth: 32, .. })));
	}

	#[test]
	fn empty_object_is_default_account() {
		let item = decode_item(&json!({})).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(item, AccountItem::Account(Account::default()));
	}

	#[test]
	fn empty_address_does_not_make_a_leaf() {
		assert!(matches!(
			decode_item(&json!({ "name": "x", "address": "" })),
			Err(DecodeError::UnrecognizedShape { expected: Shape::AccountItem, .. })
		));
	}

	#[test]
	fn constant_address_makes_a_leaf() {
		let item = decode_item(&json!({ "name": "system_program", "address": "11111111111111111111111111111111" }))
			.unwrap_or_else(|e| panic!("{e}"));
		let account = item.as_account().unwrap_or_else(|| panic!("expected account"));
		assert_eq!(account.address.as_deref(), Some("11111111111111111111111111111111"));
		assert!(!account.signer && !account.writable);
	}

	#[test]
	fn pda_makes_a_leaf() {
		let item = decode_item(&json!({
			"name": "counter",
			"pda": { "seeds": [{ "kind": "const", "value": [1, 2] }] }
		}))
		.unwrap_or_else(|e| panic!("{e}"));
		assert!(item.as_account().is_some_and(Account::is_pda));
	}

	#[test]
	fn non_object_account_item() {
		assert!(matches!(
			decode_item(&json!(["a"])),
			Err(DecodeError::UnrecognizedShape { expected: Shape::AccountItem, .. })
		));
		assert!(matches!(
			decode_item(&Value::Null),
			Err(DecodeError::NullEnvelope { expected: Shape::AccountItem, .. })
		));
	}

	#[test]
	fn enum_fields_are_classified_by_first_element() {
		let decoder = Decoder::default();
		let path = JsonPath::ROOT;

		let named = decoder
			.enum_fields(&json!([{ "name": "a", "type": "u8" }]), &path, 0)
			.unwrap_or_else(|e| panic!("{e}"));
		assert!(matches!(named, Some(EnumFields::Named(ref fields)) if fields.len() == 1));

		let tuple = decoder
			.enum_fields(&json!(["u8", { "vec": "u16" }]), &path, 0)
			.unwrap_or_else(|e| panic!("{e}"));
		assert!(matches!(tuple, Some(EnumFields::Tuple(ref types)) if types.len() == 2));

		let none = decoder
			.enum_fields(&json!([]), &path, 0)
			.unwrap_or_else(|e| panic!("{e}"));
		assert!(none.is_none());
	}

	#[test]
	fn null_name_means_tuple() {
		let decoder = Decoder::default();
		let err = decoder
			.enum_fields(&json!([{ "name": null, "type": "u8" }]), &JsonPath::ROOT, 0)
			.err();
		// Classified as a tuple, so the object is decoded as a type and fails.
		assert!(matches!(err, Some(DecodeError::UnrecognizedShape { expected: Shape::Type, .. })));
	}

	#[test]
	fn mixed_enum_fields_fail_on_the_odd_element() {
		let err = Decoder::default()
			.enum_fields(&json!([{ "name": "a", "type": "u8" }, "u8"]), &JsonPath::ROOT.key("fields"), 0)
			.err();
		assert!(matches!(
			err,
			Some(DecodeError::UnrecognizedShape { ref path, expected: Shape::Object, .. })
				if path == "fields[1]"
		));
	}

	#[test]
	fn enum_fields_must_be_an_array() {
		assert!(matches!(
			Decoder::default().enum_fields(&json!({ "name": "a" }), &JsonPath::ROOT, 0),
			Err(DecodeError::UnrecognizedShape { expected: Shape::EnumFields, .. })
		));
		assert!(matches!(
			Decoder::default().enum_fields(&Value::Null, &JsonPath::ROOT, 0),
			Err(DecodeError::NullEnvelope { expected: Shape::EnumFields, .. })
		));
	}
}
