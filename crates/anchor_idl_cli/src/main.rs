use std::path::Path;
use std::path::PathBuf;

use anchor_idl_cli::CheckOutcome;
use clap::Parser;
use clap::Subcommand;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "anchor-idl", version, about = "Inspect Anchor-style program IDLs")]
struct Cli {
	/// Log decoding details to stderr. `RUST_LOG` takes precedence.
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Decode and validate IDL files.
	Check {
		/// An IDL file. Can be provided multiple times.
		#[arg(long = "idl")]
		idls: Vec<PathBuf>,

		/// A directory searched recursively for `*.json` IDLs.
		#[arg(long = "idl-dir")]
		idl_dir: Option<PathBuf>,
	},
	/// Print the flattened leaf accounts of each instruction.
	Accounts {
		/// The IDL file.
		#[arg(long)]
		idl: PathBuf,

		/// Only show this instruction.
		#[arg(short, long)]
		instruction: Option<String>,
	},
	/// Print the decoded IDL as normalized JSON.
	Dump {
		/// The IDL file.
		#[arg(long)]
		idl: PathBuf,

		/// Print on a single line.
		#[arg(long, default_value_t = false)]
		compact: bool,
	},
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Check { idls, idl_dir } => run_check(&idls, idl_dir.as_deref()),
		Commands::Accounts { idl, instruction } => run_accounts(&idl, instruction.as_deref()),
		Commands::Dump { idl, compact } => run_dump(&idl, compact),
	}
}

fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run_check(idls: &[PathBuf], idl_dir: Option<&Path>) {
	let paths = match anchor_idl_cli::collect_idl_paths(idls, idl_dir) {
		Ok(paths) => paths,
		Err(e) => {
			eprintln!("Error: {e}");
			std::process::exit(1);
		}
	};

	let outcomes = anchor_idl_cli::check_idls(&paths);
	let mut failed = 0;
	for CheckOutcome { path, result } in &outcomes {
		match result {
			Ok(summary) => {
				println!(
					"{} {}: {} instruction(s), {} account(s), {} type(s)",
					"ok".green(),
					path.display(),
					summary.instructions,
					summary.accounts,
					summary.types,
				);
			}
			Err(e) => {
				failed += 1;
				eprintln!("{} {e}", "error".red());
			}
		}
	}

	if failed > 0 {
		eprintln!("{failed} of {} IDL file(s) failed", outcomes.len());
		std::process::exit(1);
	}
}

fn run_accounts(idl_path: &Path, instruction: Option<&str>) {
	let table = anchor_idl_cli::load_idl(idl_path)
		.and_then(|idl| anchor_idl_cli::accounts_table(&idl, instruction));

	match table {
		Ok(table) => println!("{table}"),
		Err(e) => {
			eprintln!("Error: {e}");
			std::process::exit(1);
		}
	}
}

fn run_dump(idl_path: &Path, compact: bool) {
	let json = anchor_idl_cli::load_idl(idl_path)
		.and_then(|idl| anchor_idl_cli::dump_idl(&idl, !compact));

	match json {
		Ok(json) => println!("{json}"),
		Err(e) => {
			eprintln!("Error: {e}");
			std::process::exit(1);
		}
	}
}
