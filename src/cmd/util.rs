use std::io::{self, Read};
use std::path::Path;

use aurdoc::erf::{Erf, Result};

/// Open the archive from a file, or from standard input when no path was
/// given.
pub(crate) fn load_archive(file: Option<&Path>) -> Result<Erf> {
	match file {
		Some(path) => Erf::open(path),
		None => {
			let mut bytes = Vec::new();
			io::stdin().read_to_end(&mut bytes)?;
			Erf::from_bytes(bytes)
		}
	}
}

/// Persist the archive: atomic rebuild-and-replace for a file target,
/// straight serialization for standard output.
pub(crate) fn store_archive(erf: &Erf, file: Option<&Path>) -> Result<()> {
	match file {
		Some(path) => erf.rebuild_at(path),
		None => erf.write_to(&mut io::stdout().lock()),
	}
}

/// Listing label for a resource type code.
pub(crate) fn type_label(code: u16) -> String {
	match aurdoc::erf::restype::extension(code) {
		Some(ext) => ext.to_owned(),
		None => format!("{code}"),
	}
}
