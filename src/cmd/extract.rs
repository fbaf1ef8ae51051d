use std::fs;
use std::path::Path;
use std::process;

use aurdoc::erf::Result;

use crate::cmd::util::load_archive;

/// Write the named members (or all of them) into the current directory.
/// Each missing name is reported and recorded without aborting the rest;
/// any miss turns into exit status 1 once the present members are out.
pub fn run(file: Option<&Path>, names: &[String], verbose: bool) -> Result<()> {
	let erf = load_archive(file)?;

	let mut missing = 0_usize;
	let targets: Vec<_> = if names.is_empty() {
		erf.entries().collect()
	} else {
		names
			.iter()
			.filter_map(|name| {
				let found = erf.find(name);
				if found.is_none() {
					eprintln!("error: no such member: {name}");
					missing += 1;
				}
				found
			})
			.collect()
	};

	for entry in targets {
		let bytes = erf.read_entry(entry)?;
		fs::write(entry.name(), bytes)?;
		if verbose {
			eprintln!("extracted {} ({} bytes)", entry.name(), bytes.len());
		}
	}

	if missing > 0 {
		process::exit(1);
	}
	Ok(())
}
