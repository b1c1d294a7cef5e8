//! Decoding of IDL JSON into the typed [`crate::model`].
//!
//! The payload is first parsed into a [`serde_json::Value`]. The value is
//! then walked with its JSON path in hand, so that every failure names the
//! exact location of the offending fragment. The implicitly tagged unions of
//! the wire format are resolved in [`shapes`].

mod document;
mod path;
mod shapes;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

pub(crate) use self::path::JsonPath;
use crate::error::DecodeError;
use crate::error::Shape;
use crate::model::AccountItem;
use crate::model::Discriminator;
use crate::model::EnumFields;
use crate::model::Idl;
use crate::model::IdlType;

/// Knobs for [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Maximum nesting of type wrappers and account groups.
	pub max_depth: usize,
	/// Maximum length of the payload rendering stored in errors.
	pub preview_len: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 32,
			preview_len: 256,
		}
	}
}

/// Converts IDL JSON into an [`Idl`].
///
/// A decoder holds no state between calls; the same instance can decode any
/// number of independent documents.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
	options: DecodeOptions,
}

impl Decoder {
	pub fn new(options: DecodeOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	pub fn decode(&self, bytes: &[u8]) -> Result<Idl, DecodeError> {
		let value: Value = serde_json::from_slice(bytes)?;
		self.decode_value(&value)
	}

	pub fn decode_str(&self, source: &str) -> Result<Idl, DecodeError> {
		let value: Value = serde_json::from_str(source)?;
		self.decode_value(&value)
	}

	pub fn decode_value(&self, value: &Value) -> Result<Idl, DecodeError> {
		self.document(value, &JsonPath::ROOT)
	}

	/// Decode a standalone field type.
	pub fn decode_type(&self, value: &Value) -> Result<IdlType, DecodeError> {
		self.idl_type(value, &JsonPath::ROOT, 0)
	}

	/// Decode a standalone instruction account entry.
	pub fn decode_account_item(&self, value: &Value) -> Result<AccountItem, DecodeError> {
		self.account_item(value, &JsonPath::ROOT, 0)
	}

	/// Decode a standalone enum variant payload. An empty list yields `None`.
	pub fn decode_enum_fields(&self, value: &Value) -> Result<Option<EnumFields>, DecodeError> {
		self.enum_fields(value, &JsonPath::ROOT, 0)
	}

	/// Returns the depth one level below `depth`, or fails when that exceeds
	/// the configured maximum.
	fn descend(&self, depth: usize, path: &JsonPath<'_>) -> Result<usize, DecodeError> {
		if depth >= self.options.max_depth {
			return Err(DecodeError::TooDeep {
				path: path.to_string(),
				max_depth: self.options.max_depth,
			});
		}
		Ok(depth + 1)
	}

	fn preview(&self, value: &Value) -> String {
		let mut rendered = value.to_string();
		if rendered.len() > self.options.preview_len {
			let mut end = self.options.preview_len;
			while !rendered.is_char_boundary(end) {
				end -= 1;
			}
			rendered.truncate(end);
			rendered.push_str("...");
		}
		rendered
	}

	fn unrecognized(&self, value: &Value, expected: Shape, path: &JsonPath<'_>) -> DecodeError {
		if value.is_null() {
			return DecodeError::NullEnvelope {
				path: path.to_string(),
				expected,
			};
		}
		DecodeError::UnrecognizedShape {
			path: path.to_string(),
			expected,
			payload: self.preview(value),
		}
	}

	fn object<'v>(
		&self,
		value: &'v Value,
		path: &JsonPath<'_>,
	) -> Result<&'v Map<String, Value>, DecodeError> {
		value
			.as_object()
			.ok_or_else(|| self.unrecognized(value, Shape::Object, path))
	}

	/// A required key. Present-but-null counts as present; the caller's shape
	/// decoder reports the null.
	fn required<'v>(
		map: &'v Map<String, Value>,
		key: &'static str,
		path: &JsonPath<'_>,
	) -> Result<&'v Value, DecodeError> {
		map.get(key).ok_or_else(|| {
			DecodeError::MissingKey {
				path: path.to_string(),
				key,
			}
		})
	}

	/// An optional key; absent and `null` are both `None`.
	fn optional<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
		map.get(key).filter(|value| !value.is_null())
	}

	fn opt_string(
		&self,
		map: &Map<String, Value>,
		key: &str,
		path: &JsonPath<'_>,
	) -> Result<Option<String>, DecodeError> {
		let Some(value) = Self::optional(map, key) else {
			return Ok(None);
		};
		match value {
			Value::String(s) => Ok(Some(s.clone())),
			other => Err(self.unrecognized(other, Shape::String, &path.key(key))),
		}
	}

	fn string(
		&self,
		map: &Map<String, Value>,
		key: &str,
		path: &JsonPath<'_>,
	) -> Result<String, DecodeError> {
		Ok(self.opt_string(map, key, path)?.unwrap_or_default())
	}

	fn bool(
		&self,
		map: &Map<String, Value>,
		key: &str,
		path: &JsonPath<'_>,
	) -> Result<bool, DecodeError> {
		match Self::optional(map, key) {
			None => Ok(false),
			Some(Value::Bool(flag)) => Ok(*flag),
			Some(other) => Err(self.unrecognized(other, Shape::Bool, &path.key(key))),
		}
	}

	/// A list under `key`, each element decoded by `decode_item`. Absent and
	/// `null` lists are empty.
	fn list<T>(
		&self,
		map: &Map<String, Value>,
		key: &str,
		path: &JsonPath<'_>,
		mut decode_item: impl FnMut(&Value, &JsonPath<'_>) -> Result<T, DecodeError>,
	) -> Result<Vec<T>, DecodeError> {
		let Some(value) = Self::optional(map, key) else {
			return Ok(Vec::new());
		};
		let list_path = path.key(key);
		let items = value
			.as_array()
			.ok_or_else(|| self.unrecognized(value, Shape::Array, &list_path))?;
		items
			.iter()
			.enumerate()
			.map(|(index, item)| decode_item(item, &list_path.index(index)))
			.collect()
	}

	fn docs(&self, map: &Map<String, Value>, path: &JsonPath<'_>) -> Result<Vec<String>, DecodeError> {
		self.list(map, "docs", path, |value, item_path| {
			value
				.as_str()
				.map(str::to_owned)
				.ok_or_else(|| self.unrecognized(value, Shape::String, item_path))
		})
	}

	fn discriminator(
		&self,
		map: &Map<String, Value>,
		path: &JsonPath<'_>,
	) -> Result<Option<Discriminator>, DecodeError> {
		let Some(value) = Self::optional(map, "discriminator") else {
			return Ok(None);
		};
		Discriminator::deserialize(value)
			.map(Some)
			.map_err(|_| self.unrecognized(value, Shape::Discriminator, &path.key("discriminator")))
	}
}

/// Decode an IDL document from raw bytes with default options.
pub fn decode(bytes: &[u8]) -> Result<Idl, DecodeError> {
	Decoder::default().decode(bytes)
}

/// Decode an IDL document from a string with default options.
pub fn decode_str(source: &str) -> Result<Idl, DecodeError> {
	Decoder::default().decode_str(source)
}

/// Decode an already-parsed JSON value with default options.
pub fn decode_value(value: &Value) -> Result<Idl, DecodeError> {
	Decoder::default().decode_value(value)
}
