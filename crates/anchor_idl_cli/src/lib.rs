pub mod error;

use std::path::Path;
use std::path::PathBuf;

use anchor_idl::AccountItems;
use anchor_idl::Idl;
use anchor_idl::Instruction;
use comfy_table::Table;
use rayon::prelude::*;
use tracing::debug;
use tracing::info;
use walkdir::WalkDir;

use crate::error::CliError;

/// Read and decode a single IDL file.
pub fn load_idl(path: &Path) -> Result<Idl, CliError> {
	let bytes = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
	let idl = anchor_idl::decode(&bytes).map_err(|e| CliError::decode(path, e))?;
	debug!(path = %path.display(), instructions = idl.instructions.len(), "loaded idl");
	Ok(idl)
}

/// Explicit files followed by every `*.json` file under `dir`, sorted.
pub fn collect_idl_paths(files: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>, CliError> {
	let mut paths = files.to_vec();

	if let Some(dir) = dir {
		let mut found = Vec::new();
		for entry in WalkDir::new(dir) {
			let entry = entry.map_err(|source| {
				CliError::Scan {
					path: dir.to_path_buf(),
					source,
				}
			})?;
			let path = entry.path();
			if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
				found.push(path.to_path_buf());
			}
		}
		found.sort();
		paths.extend(found);
	}

	if paths.is_empty() {
		return Err(CliError::NoInputs);
	}
	Ok(paths)
}

/// Counts reported for a document that decoded and validated cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
	pub instructions: usize,
	pub accounts: usize,
	pub types: usize,
}

#[derive(Debug)]
pub struct CheckOutcome {
	pub path: PathBuf,
	pub result: Result<CheckSummary, CliError>,
}

/// Decode and validate every file. Documents are independent, so they are
/// processed in parallel; outcomes keep the input order.
pub fn check_idls(paths: &[PathBuf]) -> Vec<CheckOutcome> {
	let outcomes: Vec<CheckOutcome> = paths
		.par_iter()
		.map(|path| {
			CheckOutcome {
				path: path.clone(),
				result: check_idl(path),
			}
		})
		.collect();

	let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
	info!(files = outcomes.len(), failed, "checked idl files");
	outcomes
}

fn check_idl(path: &Path) -> Result<CheckSummary, CliError> {
	let idl = load_idl(path)?;
	idl.validate().map_err(|source| {
		CliError::Validate {
			path: path.to_path_buf(),
			source,
		}
	})?;

	Ok(CheckSummary {
		instructions: idl.instructions.len(),
		accounts: idl
			.instructions
			.iter()
			.map(|ix| ix.accounts.num_accounts())
			.sum(),
		types: idl.types.len(),
	})
}

/// The flattened leaf accounts of every instruction (or just `instruction`)
/// as a table.
pub fn accounts_table(idl: &Idl, instruction: Option<&str>) -> Result<Table, CliError> {
	let selected: Vec<&Instruction> = match instruction {
		Some(name) => {
			let ix = idl.instruction(name).ok_or_else(|| {
				CliError::UnknownInstruction {
					name: name.to_owned(),
					available: idl
						.instructions
						.iter()
						.map(|ix| ix.name.as_str())
						.collect::<Vec<_>>()
						.join(", "),
				}
			})?;
			vec![ix]
		}
		None => idl.instructions.iter().collect(),
	};

	let mut table = Table::new();
	table.set_header(vec![
		"instruction",
		"index",
		"group",
		"account",
		"signer",
		"writable",
		"optional",
	]);

	for ix in selected {
		for leaf in ix.flatten_accounts() {
			table.add_row(vec![
				ix.name.clone(),
				leaf.index.to_string(),
				leaf.group_path,
				leaf.account.name.clone(),
				flag(leaf.account.signer),
				flag(leaf.account.writable),
				flag(leaf.account.optional),
			]);
		}
	}

	Ok(table)
}

fn flag(value: bool) -> String {
	if value { "yes" } else { "" }.to_owned()
}

/// The decoded model as normalized JSON.
pub fn dump_idl(idl: &Idl, pretty: bool) -> Result<String, CliError> {
	let json = if pretty {
		serde_json::to_string_pretty(idl)
	} else {
		serde_json::to_string(idl)
	};
	json.map_err(|source| CliError::Serialize { source })
}

#[cfg(test)]
mod tests {
	use super::*;

	const IDL: &str = r#"{
		"instructions": [
			{ "name": "open", "accounts": [
				{ "name": "owner", "signer": true },
				{ "name": "book", "accounts": [{ "name": "asks", "writable": true }] }
			], "args": [] },
			{ "name": "close", "accounts": [{ "name": "owner", "signer": true }], "args": [] }
		]
	}"#;

	fn idl() -> Idl {
		anchor_idl::decode_str(IDL).unwrap_or_else(|e| panic!("{e}"))
	}

	#[test]
	fn table_lists_leaves_of_every_instruction() {
		let table = accounts_table(&idl(), None).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(table.row_iter().count(), 3);
		let rendered = table.to_string();
		assert!(rendered.contains("asks"));
		assert!(rendered.contains("book"));
	}

	#[test]
	fn table_filters_by_instruction() {
		let table = accounts_table(&idl(), Some("close")).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(table.row_iter().count(), 1);
	}

	#[test]
	fn unknown_instruction_lists_available() {
		let err = accounts_table(&idl(), Some("missing")).err();
		assert!(matches!(
			err,
			Some(CliError::UnknownInstruction { ref available, .. }) if available == "open, close"
		));
	}

	#[test]
	fn collects_json_files_from_directory() {
		let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
		for name in ["b.json", "a.json", "notes.txt"] {
			std::fs::write(dir.path().join(name), "{}").unwrap_or_else(|e| panic!("write failed: {e}"));
		}

		let paths = collect_idl_paths(&[], Some(dir.path())).unwrap_or_else(|e| panic!("{e}"));
		let names: Vec<_> = paths
			.iter()
			.filter_map(|path| path.file_name().and_then(|name| name.to_str()))
			.collect();
		assert_eq!(names, vec!["a.json", "b.json"]);
	}

	#[test]
	fn no_inputs_is_an_error() {
		assert!(matches!(collect_idl_paths(&[], None), Err(CliError::NoInputs)));
	}

	#[test]
	fn dump_is_reloadable() {
		let idl = idl();
		let json = dump_idl(&idl, false).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(anchor_idl::decode_str(&json).ok(), Some(idl));
	}
}
