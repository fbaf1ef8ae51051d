use thiserror::Error;

use crate::bytes::ShortRead;

/// Module-local result type.
pub type Result<T> = std::result::Result<T, ErfError>;

/// Errors produced while reading, managing, and rebuilding ERF archives.
#[derive(Debug, Error)]
pub enum ErfError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error(transparent)]
	Truncated(#[from] ShortRead),
	/// File header is malformed or too short.
	#[error("invalid archive header")]
	InvalidHeader,
	/// Archive version other than the supported V1.0 / V1.1.
	#[error("unsupported archive version {version:?} (expected V1.0 or V1.1)")]
	UnsupportedVersion {
		/// Version string from the header.
		version: String,
	},
	/// Archive type code is not 3-4 ASCII letters.
	#[error("bad archive type {file_type:?} (expected 3-4 letters)")]
	BadFileType {
		/// Offending type code.
		file_type: String,
	},
	/// An entry's recorded range does not fit the backing bytes.
	#[error("entry {name:?} out of bounds: offset={offset}, size={size}, available={available}")]
	EntryOutOfBounds {
		/// Entry filename.
		name: String,
		/// Recorded byte offset.
		offset: usize,
		/// Recorded byte size.
		size: usize,
		/// Backing source length.
		available: usize,
	},
	/// An entry name already present in the archive.
	#[error("duplicate entry: {name}")]
	DuplicateEntry {
		/// Offending filename.
		name: String,
	},
	/// An entry's filename stem does not fit the version's resref slot.
	#[error("resref too long for {name:?} (max {max} bytes)")]
	ResRefTooLong {
		/// Offending filename.
		name: String,
		/// Maximum stem length for the selected version.
		max: usize,
	},
}
