use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde::ser::SerializeTuple;

/// A primitive type keyword.
///
/// Unknown keywords are kept verbatim in [`ScalarType::Other`] so that a
/// downstream generator can decide what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
	Bool,
	U8,
	I8,
	U16,
	I16,
	U32,
	I32,
	U64,
	I64,
	U128,
	I128,
	Bytes,
	String,
	Pubkey,
	F32,
	F64,
	UnixTimestamp,
	Hash,
	Duration,
	Other(String),
}

impl ScalarType {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"bool" => Self::Bool,
			"u8" => Self::U8,
			"i8" => Self::I8,
			"u16" => Self::U16,
			"i16" => Self::I16,
			"u32" => Self::U32,
			"i32" => Self::I32,
			"u64" => Self::U64,
			"i64" => Self::I64,
			"u128" => Self::U128,
			"i128" => Self::I128,
			"bytes" => Self::Bytes,
			"string" => Self::String,
			"pubkey" => Self::Pubkey,
			"f32" => Self::F32,
			"f64" => Self::F64,
			"unixTimestamp" => Self::UnixTimestamp,
			"hash" => Self::Hash,
			"duration" => Self::Duration,
			other => Self::Other(other.to_owned()),
		}
	}

	/// The tag exactly as it appears on the wire.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Bool => "bool",
			Self::U8 => "u8",
			Self::I8 => "i8",
			Self::U16 => "u16",
			Self::I16 => "i16",
			Self::U32 => "u32",
			Self::I32 => "i32",
			Self::U64 => "u64",
			Self::I64 => "i64",
			Self::U128 => "u128",
			Self::I128 => "i128",
			Self::Bytes => "bytes",
			Self::String => "string",
			Self::Pubkey => "pubkey",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::UnixTimestamp => "unixTimestamp",
			Self::Hash => "hash",
			Self::Duration => "duration",
			Self::Other(tag) => tag,
		}
	}

	/// Whether the tag belongs to the known keyword set.
	pub fn is_known(&self) -> bool {
		!matches!(self, Self::Other(_))
	}
}

impl fmt::Display for ScalarType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for ScalarType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

/// Reference to a user-defined type by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DefinedType {
	pub name: String,
}

/// A fixed-size array of `len` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
	pub elem: Box<IdlType>,
	pub len: usize,
}

/// The type of a field, argument, constant or tuple element.
///
/// On the wire this is either a bare string (a scalar keyword) or an object
/// with exactly one of the keys `vec`, `option`, `defined`, `array`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdlType {
	Scalar(ScalarType),
	Vec(Box<IdlType>),
	Option(Box<IdlType>),
	Defined(DefinedType),
	Array(ArrayType),
}

impl IdlType {
	pub fn scalar(tag: &str) -> Self {
		Self::Scalar(ScalarType::from_tag(tag))
	}

	pub fn vec(inner: Self) -> Self {
		Self::Vec(Box::new(inner))
	}

	pub fn option(inner: Self) -> Self {
		Self::Option(Box::new(inner))
	}

	pub fn defined(name: impl Into<String>) -> Self {
		Self::Defined(DefinedType { name: name.into() })
	}

	pub fn array(elem: Self, len: usize) -> Self {
		Self::Array(ArrayType {
			elem: Box::new(elem),
			len,
		})
	}

	pub fn as_scalar(&self) -> Option<&ScalarType> {
		match self {
			Self::Scalar(scalar) => Some(scalar),
			_ => None,
		}
	}

	pub fn as_vec(&self) -> Option<&IdlType> {
		match self {
			Self::Vec(inner) => Some(inner),
			_ => None,
		}
	}

	pub fn as_option(&self) -> Option<&IdlType> {
		match self {
			Self::Option(inner) => Some(inner),
			_ => None,
		}
	}

	pub fn as_defined(&self) -> Option<&DefinedType> {
		match self {
			Self::Defined(defined) => Some(defined),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&ArrayType> {
		match self {
			Self::Array(array) => Some(array),
			_ => None,
		}
	}

	pub fn is_scalar(&self) -> bool {
		matches!(self, Self::Scalar(_))
	}

	pub fn is_vec(&self) -> bool {
		matches!(self, Self::Vec(_))
	}

	pub fn is_option(&self) -> bool {
		matches!(self, Self::Option(_))
	}

	pub fn is_defined(&self) -> bool {
		matches!(self, Self::Defined(_))
	}

	pub fn is_array(&self) -> bool {
		matches!(self, Self::Array(_))
	}

	/// Name of the user-defined type underneath any `vec`, `option` and
	/// `array` wrappers, if there is one.
	pub fn defined_name(&self) -> Option<&str> {
		match self {
			Self::Defined(defined) => Some(&defined.name),
			Self::Vec(inner) | Self::Option(inner) => inner.defined_name(),
			Self::Array(array) => array.elem.defined_name(),
			Self::Scalar(_) => None,
		}
	}
}

impl fmt::Display for IdlType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scalar(scalar) => write!(f, "{scalar}"),
			Self::Vec(inner) => write!(f, "vec<{inner}>"),
			Self::Option(inner) => write!(f, "option<{inner}>"),
			Self::Defined(defined) => f.write_str(&defined.name),
			Self::Array(array) => write!(f, "[{}; {}]", array.elem, array.len),
		}
	}
}

impl Serialize for IdlType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Scalar(scalar) => scalar.serialize(serializer),
			Self::Vec(inner) => single_entry(serializer, "vec", inner),
			Self::Option(inner) => single_entry(serializer, "option", inner),
			Self::Defined(defined) => single_entry(serializer, "defined", defined),
			Self::Array(array) => single_entry(serializer, "array", &ArrayPair(array)),
		}
	}
}

fn single_entry<S: Serializer, V: Serialize + ?Sized>(
	serializer: S,
	key: &str,
	value: &V,
) -> Result<S::Ok, S::Error> {
	let mut map = serializer.serialize_map(Some(1))?;
	map.serialize_entry(key, value)?;
	map.end()
}

/// Serializes an array type as its `[elem, len]` wire pair.
struct ArrayPair<'a>(&'a ArrayType);

impl Serialize for ArrayPair<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut pair = serializer.serialize_tuple(2)?;
		pair.serialize_element(self.0.elem.as_ref())?;
		pair.serialize_element(&self.0.len)?;
		pair.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_tags_roundtrip_verbatim() {
		for tag in ["u8", "pubkey", "unixTimestamp", "duration", "publicKey"] {
			assert_eq!(ScalarType::from_tag(tag).as_str(), tag);
		}
		assert!(ScalarType::from_tag("hash").is_known());
		assert!(!ScalarType::from_tag("publicKey").is_known());
	}

	#[test]
	fn defined_name_looks_through_wrappers() {
		let ty = IdlType::option(IdlType::vec(IdlType::array(IdlType::defined("Foo"), 4)));
		assert_eq!(ty.defined_name(), Some("Foo"));
		assert_eq!(IdlType::vec(IdlType::scalar("u8")).defined_name(), None);
	}

	#[test]
	fn displays_nested_types() {
		let ty = IdlType::option(IdlType::array(IdlType::scalar("u8"), 32));
		assert_eq!(ty.to_string(), "option<[u8; 32]>");
	}

	#[test]
	fn serializes_wire_shapes() {
		let ty = IdlType::vec(IdlType::array(IdlType::defined("Foo"), 2));
		let json = serde_json::to_value(&ty).unwrap_or_else(|e| panic!("serialize failed: {e}"));
		assert_eq!(
			json,
			serde_json::json!({ "vec": { "array": [{ "defined": { "name": "Foo" } }, 2] } })
		);
	}
}
