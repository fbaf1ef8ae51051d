use std::fs;
use std::path::Path;

use crate::bytes::Cursor;
use crate::erf::restype;
use crate::erf::{ErfError, Result};

pub(crate) const HEADER_SIZE: usize = 160;
pub(crate) const RESERVED_SIZE: usize = 116;

/// On-disk format revision; selects the resref field width in the key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErfVersion {
	/// 16-byte resrefs.
	#[default]
	V1_0,
	/// 32-byte resrefs.
	V1_1,
}

impl ErfVersion {
	/// Version string as stored in the header.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::V1_0 => "V1.0",
			Self::V1_1 => "V1.1",
		}
	}

	/// Resref slot width in the key list.
	pub fn resref_len(self) -> usize {
		match self {
			Self::V1_0 => 16,
			Self::V1_1 => 32,
		}
	}

	fn parse(version: &str) -> Result<Self> {
		match version {
			"V1.0" => Ok(Self::V1_0),
			"V1.1" => Ok(Self::V1_1),
			other => Err(ErfError::UnsupportedVersion { version: other.to_owned() }),
		}
	}
}

#[derive(Debug)]
enum EntryData {
	Stored { offset: usize, size: usize },
	Added(Vec<u8>),
}

/// One named resource in an archive.
#[derive(Debug)]
pub struct ErfEntry {
	name: String,
	res_type: u16,
	data: EntryData,
}

impl ErfEntry {
	/// Display filename; matching elsewhere is case-insensitive.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Resource type code.
	pub fn res_type(&self) -> u16 {
		self.res_type
	}

	/// Payload size in bytes.
	pub fn size(&self) -> usize {
		match &self.data {
			EntryData::Stored { size, .. } => *size,
			EntryData::Added(bytes) => bytes.len(),
		}
	}

	/// Byte offset into the backing source, `None` for entries added in
	/// memory and not yet written.
	pub fn offset(&self) -> Option<usize> {
		match &self.data {
			EntryData::Stored { offset, .. } => Some(*offset),
			EntryData::Added(_) => None,
		}
	}

	fn matches(&self, name: &str) -> bool {
		self.name.eq_ignore_ascii_case(name)
	}
}

/// An ordered collection of named binary resources under a shared header.
///
/// The archive is a whole-file structure: opening one reads everything into
/// memory, and every mutation is persisted by a full rebuild (`write_to` /
/// `rebuild_at`), never an in-place patch.
#[derive(Debug)]
pub struct Erf {
	/// Archive type code, 3-4 letters ("ERF", "HAK", "MOD").
	pub file_type: String,
	/// Format revision, selects the on-disk resref width.
	pub version: ErfVersion,
	/// Build year; the current year is stamped at write time when unset.
	pub year: Option<u32>,
	/// Build day as days since January 1; stamped at write time when unset.
	pub day_of_year: Option<u32>,
	/// Talk-table reference for the archive description.
	pub description_str_ref: u32,
	descriptions: Vec<(u32, String)>,
	entries: Vec<ErfEntry>,
	source: Vec<u8>,
}

impl Erf {
	/// Empty archive of the given type code.
	pub fn new(file_type: impl Into<String>, version: ErfVersion) -> Result<Self> {
		let file_type = file_type.into();
		if !(3..=4).contains(&file_type.len()) || !file_type.bytes().all(|byte| byte.is_ascii_alphabetic()) {
			return Err(ErfError::BadFileType { file_type });
		}

		Ok(Self {
			file_type,
			version,
			year: None,
			day_of_year: None,
			description_str_ref: crate::gff::STR_REF_NONE,
			descriptions: Vec::new(),
			entries: Vec::new(),
			source: Vec::new(),
		})
	}

	/// Parse an archive from its full byte image, which becomes the backing
	/// source for stored entries.
	pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
		let mut cursor = Cursor::new(&bytes);
		let file_type = String::from_utf8_lossy(&cursor.read_code4()?).trim_end().to_owned();
		let version_raw = String::from_utf8_lossy(&cursor.read_code4()?).into_owned();
		let version = ErfVersion::parse(&version_raw)?;

		let language_count = cursor.read_u32_le()? as usize;
		let _localized_string_size = cursor.read_u32_le()? as usize;
		let entry_count = cursor.read_u32_le()? as usize;
		let offset_to_localized_string = cursor.read_u32_le()? as usize;
		let offset_to_key_list = cursor.read_u32_le()? as usize;
		let offset_to_resource_list = cursor.read_u32_le()? as usize;
		let build_year = cursor.read_u32_le()?;
		let build_day = cursor.read_u32_le()?;
		let description_str_ref = cursor.read_u32_le()?;
		cursor.read_exact(RESERVED_SIZE)?;

		let mut descriptions = Vec::with_capacity(language_count);
		let mut loc_cursor = Cursor::at(&bytes, offset_to_localized_string);
		for _ in 0..language_count {
			let language = loc_cursor.read_u32_le()?;
			let size = loc_cursor.read_u32_le()? as usize;
			let text = String::from_utf8_lossy(loc_cursor.read_exact(size)?).into_owned();
			descriptions.push((language, text));
		}

		let resref_len = version.resref_len();
		let mut names = Vec::with_capacity(entry_count);
		let mut key_cursor = Cursor::at(&bytes, offset_to_key_list);
		for _ in 0..entry_count {
			let raw = key_cursor.read_exact(resref_len)?;
			let end = raw.iter().position(|byte| *byte == 0).unwrap_or(resref_len);
			let resref = String::from_utf8_lossy(&raw[..end]).into_owned();
			let _res_id = key_cursor.read_u32_le()?;
			let res_type = key_cursor.read_u16_le()?;
			let _unused = key_cursor.read_u16_le()?;
			names.push((resref, res_type));
		}

		let mut entries = Vec::with_capacity(entry_count);
		let mut res_cursor = Cursor::at(&bytes, offset_to_resource_list);
		for (resref, res_type) in names {
			let offset = res_cursor.read_u32_le()? as usize;
			let size = res_cursor.read_u32_le()? as usize;
			let name = restype::display_name(&resref, res_type);

			if offset.checked_add(size).is_none_or(|end| end > bytes.len()) {
				return Err(ErfError::EntryOutOfBounds {
					name,
					offset,
					size,
					available: bytes.len(),
				});
			}
			entries.push(ErfEntry {
				name,
				res_type,
				data: EntryData::Stored { offset, size },
			});
		}

		Ok(Self {
			file_type,
			version,
			year: Some(1900 + build_year),
			day_of_year: Some(build_day),
			description_str_ref,
			descriptions,
			entries,
			source: bytes,
		})
	}

	/// Read and parse an archive file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_bytes(fs::read(path)?)
	}

	/// Iterate entries in archive order. Restartable, no side effects.
	pub fn entries(&self) -> impl Iterator<Item = &ErfEntry> {
		self.entries.iter()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the archive holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Case-insensitive membership test against entry filenames.
	pub fn contains(&self, name: &str) -> bool {
		self.find(name).is_some()
	}

	/// First entry matching `name`, case-insensitively.
	pub fn find(&self, name: &str) -> Option<&ErfEntry> {
		self.entries.iter().find(|entry| entry.matches(name))
	}

	/// Raw bytes for one entry, sliced from the backing source for stored
	/// entries.
	pub fn read_entry<'a>(&'a self, entry: &'a ErfEntry) -> Result<&'a [u8]> {
		match &entry.data {
			EntryData::Added(bytes) => Ok(bytes),
			EntryData::Stored { offset, size } => {
				self.source
					.get(*offset..offset + size)
					.ok_or_else(|| ErfError::EntryOutOfBounds {
						name: entry.name.clone(),
						offset: *offset,
						size: *size,
						available: self.source.len(),
					})
			}
		}
	}

	/// Append a new entry. Duplicate names are not checked here; that policy
	/// belongs to the caller. Nothing is written until the next rebuild.
	pub fn add_file(&mut self, name: impl Into<String>, content: Vec<u8>) {
		let name = name.into();
		let res_type = restype::for_filename(&name);
		self.entries.push(ErfEntry {
			name,
			res_type,
			data: EntryData::Added(content),
		});
	}

	/// Remove and return the first entry matching `name`, case-insensitively.
	pub fn remove_file(&mut self, name: &str) -> Option<ErfEntry> {
		let idx = self.entries.iter().position(|entry| entry.matches(name))?;
		Some(self.entries.remove(idx))
	}

	/// Set the localized description for a language id, replacing in place.
	pub fn set_description(&mut self, language: u32, text: impl Into<String>) {
		let text = text.into();
		match self.descriptions.iter_mut().find(|entry| entry.0 == language) {
			Some(entry) => entry.1 = text,
			None => self.descriptions.push((language, text)),
		}
	}

	/// Localized description for a language id.
	pub fn description(&self, language: u32) -> Option<&str> {
		self.descriptions.iter().find(|entry| entry.0 == language).map(|entry| entry.1.as_str())
	}

	/// Iterate `(language, text)` descriptions in insertion order.
	pub fn descriptions(&self) -> impl Iterator<Item = (u32, &str)> {
		self.descriptions.iter().map(|entry| (entry.0, entry.1.as_str()))
	}
}
