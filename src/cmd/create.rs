use std::fs;
use std::path::Path;

use aurdoc::erf::{Erf, ErfError, ErfVersion, Result};

use crate::cmd::util::store_archive;

/// Header and policy options for a fresh archive.
pub struct CreateArgs {
	pub file_type: String,
	pub version: ErfVersion,
	pub description: Option<String>,
	pub year: Option<u32>,
	pub day: Option<u32>,
	pub allow_duplicates: bool,
	pub verbose: bool,
}

/// Build a fresh archive from the given input files. Duplicate basenames
/// abort before anything is written, unless explicitly allowed.
pub fn run(args: &CreateArgs, file: Option<&Path>, inputs: &[String]) -> Result<()> {
	let mut erf = Erf::new(args.file_type.clone(), args.version)?;
	erf.year = args.year;
	erf.day_of_year = args.day;
	if let Some(text) = &args.description {
		erf.set_description(0, text.clone());
	}

	for input in inputs {
		let path = Path::new(input);
		let name = member_name(path);
		if !args.allow_duplicates && erf.contains(&name) {
			return Err(ErfError::DuplicateEntry { name });
		}
		if args.verbose {
			eprintln!("adding {name}");
		}
		erf.add_file(name, fs::read(path)?);
	}

	store_archive(&erf, file)
}

/// Archive member name for an input path: its basename.
pub(crate) fn member_name(path: &Path) -> String {
	match path.file_name() {
		Some(name) => name.to_string_lossy().into_owned(),
		None => path.to_string_lossy().into_owned(),
	}
}
