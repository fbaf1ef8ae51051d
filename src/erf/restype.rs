//! Resource type codes shared by the Aurora container and document formats.

/// Sentinel for a resource type outside the known table.
pub const RES_TYPE_INVALID: u16 = 0xFFFF;

const TABLE: &[(u16, &str)] = &[
	(1, "bmp"),
	(3, "tga"),
	(4, "wav"),
	(6, "plt"),
	(7, "ini"),
	(10, "txt"),
	(2002, "mdl"),
	(2009, "nss"),
	(2010, "ncs"),
	(2012, "are"),
	(2013, "set"),
	(2014, "ifo"),
	(2015, "bic"),
	(2016, "wok"),
	(2017, "2da"),
	(2022, "txi"),
	(2023, "git"),
	(2025, "uti"),
	(2027, "utc"),
	(2029, "dlg"),
	(2030, "itp"),
	(2032, "utt"),
	(2033, "dds"),
	(2035, "uts"),
	(2036, "ltr"),
	(2037, "gff"),
	(2038, "fac"),
	(2040, "ute"),
	(2042, "utd"),
	(2044, "utp"),
	(2045, "dft"),
	(2046, "gic"),
	(2047, "gui"),
	(2051, "utm"),
	(2052, "dwk"),
	(2053, "pwk"),
	(2056, "jrl"),
	(2058, "utw"),
	(2060, "ssf"),
	(2064, "ndb"),
	(2065, "ptm"),
	(2066, "ptt"),
];

/// Type code for a file extension, case-insensitive.
pub fn from_extension(ext: &str) -> Option<u16> {
	TABLE.iter().find(|entry| entry.1.eq_ignore_ascii_case(ext)).map(|entry| entry.0)
}

/// Canonical file extension for a type code.
pub fn extension(code: u16) -> Option<&'static str> {
	TABLE.iter().find(|entry| entry.0 == code).map(|entry| entry.1)
}

/// Type code derived from a filename's extension, the invalid sentinel when
/// the extension is missing or unknown.
pub fn for_filename(name: &str) -> u16 {
	name.rsplit_once('.')
		.and_then(|(_, ext)| from_extension(ext))
		.unwrap_or(RES_TYPE_INVALID)
}

/// Display filename for a stored resref and type code.
pub fn display_name(resref: &str, code: u16) -> String {
	match extension(code) {
		Some(ext) => format!("{resref}.{ext}"),
		None => resref.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::{RES_TYPE_INVALID, display_name, extension, for_filename, from_extension};

	#[test]
	fn extension_lookup_is_case_insensitive() {
		assert_eq!(from_extension("utc"), Some(2027));
		assert_eq!(from_extension("UTC"), Some(2027));
		assert_eq!(from_extension("weird"), None);
	}

	#[test]
	fn filename_lookup_handles_missing_and_unknown_extensions() {
		assert_eq!(for_filename("guard.utc"), 2027);
		assert_eq!(for_filename("readme"), RES_TYPE_INVALID);
		assert_eq!(for_filename("module.weird"), RES_TYPE_INVALID);
	}

	#[test]
	fn display_name_round_trips_known_codes() {
		assert_eq!(display_name("guard", 2027), "guard.utc");
		assert_eq!(display_name("raw", RES_TYPE_INVALID), "raw");
		assert_eq!(extension(2017), Some("2da"));
	}
}
