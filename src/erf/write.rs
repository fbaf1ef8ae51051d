use std::io::Write;
use std::path::Path;

use chrono::Datelike;

use crate::erf::file::{Erf, HEADER_SIZE, RESERVED_SIZE};
use crate::erf::{ErfError, Result};

const KEY_META_SIZE: usize = 8;
const RESOURCE_RECORD_SIZE: usize = 8;

impl Erf {
	/// Serialize the archive: header, localized descriptions, key list,
	/// freshly computed offset/size table, then every payload in order. A
	/// full rebuild each time; adds and removes are never patched in place.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let resref_len = self.version.resref_len();

		let mut stems = Vec::with_capacity(self.len());
		for entry in self.entries() {
			let stem = match entry.name().rsplit_once('.') {
				Some((stem, _)) => stem,
				None => entry.name(),
			};
			if stem.len() > resref_len {
				return Err(ErfError::ResRefTooLong {
					name: entry.name().to_owned(),
					max: resref_len,
				});
			}
			stems.push(stem);
		}

		let mut loc_section = Vec::new();
		for (language, text) in self.descriptions() {
			loc_section.extend_from_slice(&language.to_le_bytes());
			loc_section.extend_from_slice(&(text.len() as u32).to_le_bytes());
			loc_section.extend_from_slice(text.as_bytes());
		}

		let offset_to_localized_string = HEADER_SIZE;
		let offset_to_key_list = offset_to_localized_string + loc_section.len();
		let offset_to_resource_list = offset_to_key_list + self.len() * (resref_len + KEY_META_SIZE);
		let data_offset = offset_to_resource_list + self.len() * RESOURCE_RECORD_SIZE;

		let now = chrono::Local::now();
		let year = self.year.unwrap_or(now.year() as u32);
		let day = self.day_of_year.unwrap_or(now.ordinal0());

		let mut out = Vec::with_capacity(data_offset);
		out.extend_from_slice(&pad4(&self.file_type));
		out.extend_from_slice(self.version.as_str().as_bytes());
		for value in [
			self.descriptions().count() as u32,
			loc_section.len() as u32,
			self.len() as u32,
			offset_to_localized_string as u32,
			offset_to_key_list as u32,
			offset_to_resource_list as u32,
			year.saturating_sub(1900),
			day,
			self.description_str_ref,
		] {
			out.extend_from_slice(&value.to_le_bytes());
		}
		out.extend_from_slice(&[0_u8; RESERVED_SIZE]);
		out.extend_from_slice(&loc_section);

		for (idx, (entry, stem)) in self.entries().zip(&stems).enumerate() {
			let mut slot = vec![0_u8; resref_len];
			slot[..stem.len()].copy_from_slice(stem.as_bytes());
			out.extend_from_slice(&slot);
			out.extend_from_slice(&(idx as u32).to_le_bytes());
			out.extend_from_slice(&entry.res_type().to_le_bytes());
			out.extend_from_slice(&0_u16.to_le_bytes());
		}

		let mut cursor = data_offset;
		for entry in self.entries() {
			out.extend_from_slice(&(cursor as u32).to_le_bytes());
			out.extend_from_slice(&(entry.size() as u32).to_le_bytes());
			cursor += entry.size();
		}

		for entry in self.entries() {
			out.extend_from_slice(self.read_entry(entry)?);
		}
		Ok(out)
	}

	/// Serialize the archive into a sink.
	pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
		sink.write_all(&self.to_bytes()?)?;
		Ok(())
	}

	/// Rebuild into a sibling temporary file and atomically replace `path`.
	/// The original archive is untouched on any failure, and the temporary
	/// is removed on every exit path.
	pub fn rebuild_at(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.to_bytes()?;

		let dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
		tmp.write_all(&bytes)?;
		tmp.persist(path).map_err(|err| ErfError::Io(err.error))?;
		Ok(())
	}
}

fn pad4(code: &str) -> [u8; 4] {
	let mut out = [b' '; 4];
	for (slot, byte) in out.iter_mut().zip(code.bytes()) {
		*slot = byte;
	}
	out
}
