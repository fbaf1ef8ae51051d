use std::path::Path;
use std::process;

use aurdoc::erf::Result;

use crate::cmd::util::{load_archive, store_archive};

/// Read-modify-rebuild-replace: drop the named members. Missing names are
/// reported like missing extraction targets; the members that were found
/// are still removed and persisted before the status-1 exit.
pub fn run(file: Option<&Path>, names: &[String], verbose: bool) -> Result<()> {
	let mut erf = load_archive(file)?;

	let mut missing = 0_usize;
	for name in names {
		match erf.remove_file(name) {
			Some(entry) => {
				if verbose {
					eprintln!("removed {}", entry.name());
				}
			}
			None => {
				eprintln!("error: no such member: {name}");
				missing += 1;
			}
		}
	}

	store_archive(&erf, file)?;
	if missing > 0 {
		process::exit(1);
	}
	Ok(())
}
