#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use aurdoc::erf::{ErfVersion, Result};

mod cmd;

#[derive(Parser)]
#[command(
	name = "aurdoc",
	about = "Aurora engine resource archive tool",
	group = ArgGroup::new("mode").required(true)
)]
struct Cli {
	/// List archive members.
	#[arg(short = 't', long = "list", group = "mode")]
	list: bool,
	/// Create a fresh archive from the given files.
	#[arg(short = 'c', long = "create", group = "mode")]
	create: bool,
	/// Extract members into the current directory.
	#[arg(short = 'x', long = "extract", group = "mode")]
	extract: bool,
	/// Add files to an existing archive.
	#[arg(short = 'a', long = "add", group = "mode")]
	add: bool,
	/// Remove members from an existing archive.
	#[arg(short = 'r', long = "remove", group = "mode")]
	remove: bool,

	/// Archive file; standard input/output when absent.
	#[arg(short = 'f', value_name = "FILE")]
	file: Option<PathBuf>,
	/// Set the description for language id 0.
	#[arg(short = 'D', value_name = "TEXT")]
	description: Option<String>,
	/// Archive type code, 3-4 letters.
	#[arg(long = "type", value_name = "TYPE", default_value = "ERF")]
	file_type: String,
	/// Shorthand for --type HAK.
	#[arg(short = 'H')]
	hak: bool,
	/// Shorthand for --type ERF.
	#[arg(short = 'E')]
	erf: bool,
	/// Shorthand for --type MOD.
	#[arg(short = 'M')]
	module: bool,
	/// Write V1.0 keys (16-byte resrefs). The default.
	#[arg(short = '0')]
	narrow: bool,
	/// Write V1.1 keys (32-byte resrefs).
	#[arg(short = '1')]
	wide: bool,
	/// Override the header build day (days since January 1).
	#[arg(long)]
	day: Option<u32>,
	/// Override the header build year.
	#[arg(long)]
	year: Option<u32>,
	/// Keep duplicate member names instead of failing.
	#[arg(long = "allow-duplicates")]
	allow_duplicates: bool,
	/// Chatty progress output; extra listing columns.
	#[arg(short = 'v', long)]
	verbose: bool,

	/// Member names or input files, depending on the mode.
	args: Vec<String>,
}

impl Cli {
	fn resolved_type(&self) -> &str {
		if self.hak {
			"HAK"
		} else if self.module {
			"MOD"
		} else if self.erf {
			"ERF"
		} else {
			&self.file_type
		}
	}

	fn resolved_version(&self) -> ErfVersion {
		if self.narrow {
			ErfVersion::V1_0
		} else if self.wide {
			ErfVersion::V1_1
		} else {
			ErfVersion::V1_0
		}
	}
}

fn main() {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(err) => {
			let code = if err.use_stderr() { 1 } else { 0 };
			let _ = err.print();
			std::process::exit(code);
		}
	};

	if let Err(err) = run(cli) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(cli: Cli) -> Result<()> {
	let file = cli.file.as_deref();
	if cli.list {
		cmd::list::run(file, cli.verbose)
	} else if cli.create {
		cmd::create::run(
			&cmd::create::CreateArgs {
				file_type: cli.resolved_type().to_owned(),
				version: cli.resolved_version(),
				description: cli.description,
				year: cli.year,
				day: cli.day,
				allow_duplicates: cli.allow_duplicates,
				verbose: cli.verbose,
			},
			file,
			&cli.args,
		)
	} else if cli.extract {
		cmd::extract::run(file, &cli.args, cli.verbose)
	} else if cli.add {
		cmd::add::run(
			&cmd::add::AddArgs {
				description: cli.description,
				year: cli.year,
				day: cli.day,
				allow_duplicates: cli.allow_duplicates,
				verbose: cli.verbose,
			},
			file,
			&cli.args,
		)
	} else {
		cmd::remove::run(file, &cli.args, cli.verbose)
	}
}
