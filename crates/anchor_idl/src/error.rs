use std::fmt;

/// What the decoder expected to find at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
	Type,
	AccountItem,
	EnumFields,
	TypeDefTy,
	Object,
	Array,
	String,
	Bool,
	Integer,
	Discriminator,
	Pda,
}

impl Shape {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Type => "type",
			Self::AccountItem => "account item",
			Self::EnumFields => "enum fields",
			Self::TypeDefTy => "type definition",
			Self::Object => "object",
			Self::Array => "array",
			Self::String => "string",
			Self::Bool => "boolean",
			Self::Integer => "integer",
			Self::Discriminator => "8-byte discriminator",
			Self::Pda => "pda",
		}
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors produced while decoding an IDL document.
///
/// Every variant except [`DecodeError::Syntax`] carries the JSON path of the
/// offending value, e.g. `instructions[2].args[0].type`.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("malformed JSON: {source}")]
	Syntax { source: serde_json::Error },

	#[error("{path}: expected {expected}, found null")]
	NullEnvelope { path: String, expected: Shape },

	#[error("{path}: unrecognized {expected} shape: {payload}")]
	UnrecognizedShape {
		path: String,
		expected: Shape,
		payload: String,
	},

	#[error("{path}: invalid array type ({reason}): {payload}")]
	InvalidArray {
		path: String,
		reason: &'static str,
		payload: String,
	},

	#[error("{path}: ambiguous type shape, keys {keys} are mutually exclusive: {payload}")]
	AmbiguousShape {
		path: String,
		keys: String,
		payload: String,
	},

	#[error("{path}: missing required key `{key}`")]
	MissingKey { path: String, key: &'static str },

	#[error("{path}: nesting exceeds the maximum depth of {max_depth}")]
	TooDeep { path: String, max_depth: usize },
}

impl DecodeError {
	/// JSON path of the offending value. `None` for syntax errors.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::Syntax { .. } => None,
			Self::NullEnvelope { path, .. }
			| Self::UnrecognizedShape { path, .. }
			| Self::InvalidArray { path, .. }
			| Self::AmbiguousShape { path, .. }
			| Self::MissingKey { path, .. }
			| Self::TooDeep { path, .. } => Some(path),
		}
	}

	/// Rendering of the offending payload, where one was captured.
	pub fn payload(&self) -> Option<&str> {
		match self {
			Self::UnrecognizedShape { payload, .. }
			| Self::InvalidArray { payload, .. }
			| Self::AmbiguousShape { payload, .. } => Some(payload),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for DecodeError {
	fn from(source: serde_json::Error) -> Self {
		Self::Syntax { source }
	}
}

/// A single document-level consistency problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("duplicate {scope} name `{name}`")]
	DuplicateName { scope: &'static str, name: String },

	#[error("error code {code} is used by both `{first}` and `{second}`")]
	DuplicateErrorCode {
		code: u32,
		first: String,
		second: String,
	},

	#[error("{location}: unresolved type `{name}`")]
	UnresolvedType { location: String, name: String },

	#[error("{scope} discriminator collision between `{first}` and `{second}`")]
	DuplicateDiscriminator {
		scope: &'static str,
		first: String,
		second: String,
	},

	#[error("enum `{type_name}` declares variant `{variant}` more than once")]
	DuplicateVariant { type_name: String, variant: String },

	#[error("type `{name}` has no layout")]
	MissingLayout { name: String },

	#[error("{location}: empty name")]
	EmptyName { location: String },

	#[error("instruction `{instruction}` declares account `{account}` more than once")]
	DuplicateAccount {
		instruction: String,
		account: String,
	},
}

/// All problems found by [`crate::Idl::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
	pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} validation error(s)", self.0.len())?;
		for error in &self.0 {
			write!(f, "\n  - {error}")?;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
	type IntoIter = std::slice::Iter<'a, ValidationError>;
	type Item = &'a ValidationError;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
