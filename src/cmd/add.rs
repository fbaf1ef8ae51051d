use std::fs;
use std::path::Path;

use aurdoc::erf::{ErfError, Result};

use crate::cmd::create::member_name;
use crate::cmd::util::{load_archive, store_archive};

/// Header overrides and policy options for the add mode.
pub struct AddArgs {
	pub description: Option<String>,
	pub year: Option<u32>,
	pub day: Option<u32>,
	pub allow_duplicates: bool,
	pub verbose: bool,
}

/// Read-modify-rebuild-replace: append the given files to an existing
/// archive. Duplicate names abort before the rebuild, unless explicitly
/// allowed.
pub fn run(args: &AddArgs, file: Option<&Path>, inputs: &[String]) -> Result<()> {
	let mut erf = load_archive(file)?;

	if let Some(year) = args.year {
		erf.year = Some(year);
	}
	if let Some(day) = args.day {
		erf.day_of_year = Some(day);
	}
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
