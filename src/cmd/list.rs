use std::path::Path;

use aurdoc::erf::Result;

use crate::cmd::util::{load_archive, type_label};

/// Print member names, one per line. Verbose mode prepends offset, size,
/// build date, and type columns.
pub fn run(file: Option<&Path>, verbose: bool) -> Result<()> {
	let erf = load_archive(file)?;

	let date = format!("{}-{:03}", erf.year.unwrap_or(0), erf.day_of_year.unwrap_or(0));
	for entry in erf.entries() {
		if verbose {
			let offset = match entry.offset() {
				Some(offset) => offset.to_string(),
				None => "-".to_owned(),
			};
			println!(
				"{:>10} {:>10} {} {:>5} {}",
				offset,
				entry.size(),
				date,
				type_label(entry.res_type()),
				entry.name()
			);
		} else {
			println!("{}", entry.name());
		}
	}
	Ok(())
}
