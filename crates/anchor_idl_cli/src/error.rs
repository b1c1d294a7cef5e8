use std::path::PathBuf;

use anchor_idl::DecodeError;
use anchor_idl::ValidationErrors;

/// Errors produced by the `anchor-idl` commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("IO error at {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Failed to scan {path}: {source}")]
	Scan {
		path: PathBuf,
		source: walkdir::Error,
	},

	#[error("Failed to decode {path}: {source}")]
	Decode { path: PathBuf, source: DecodeError },

	#[error("{path}: {source}")]
	Validate {
		path: PathBuf,
		source: ValidationErrors,
	},

	#[error("No instruction named `{name}`. Available instructions: {available}")]
	UnknownInstruction { name: String, available: String },

	#[error("No IDL files given (use --idl or --idl-dir)")]
	NoInputs,

	#[error("JSON serialization error: {source}")]
	Serialize { source: serde_json::Error },
}

impl CliError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub fn decode(path: impl Into<PathBuf>, source: DecodeError) -> Self {
		Self::Decode {
			path: path.into(),
			source,
		}
	}
}
