use std::fs;
use std::path::Path;

use crate::bytes::Cursor;
use crate::gff::tree::Struct;
use crate::gff::value::LocString;
use crate::gff::{FieldType, GffError, Result, Value};

pub(crate) const HEADER_SIZE: usize = 56;
pub(crate) const LABEL_SIZE: usize = 16;
pub(crate) const SUPPORTED_VERSION: &str = "V3.2";

const MAX_DEPTH: u32 = 64;

struct RawStruct {
	struct_id: u32,
	data: u32,
	field_count: u32,
}

struct RawField {
	type_code: u32,
	label_idx: u32,
	data: u32,
}

struct Tables<'a> {
	structs: Vec<RawStruct>,
	fields: Vec<RawField>,
	labels: Vec<String>,
	field_data: &'a [u8],
	field_indices: &'a [u8],
	list_indices: &'a [u8],
}

/// Parse a binary GFF document. The returned root carries the header's
/// resource type (trailing padding trimmed) as `data_type` and its format
/// version as `data_version`; nested paths are derived on the way out.
pub fn read(bytes: &[u8]) -> Result<Struct> {
	let mut cursor = Cursor::new(bytes);
	let file_type = cursor.read_code4()?;
	let file_version = cursor.read_code4()?;

	let version = String::from_utf8_lossy(&file_version).into_owned();
	if version != SUPPORTED_VERSION {
		return Err(GffError::UnsupportedVersion { version });
	}

	let struct_offset = cursor.read_u32_le()? as usize;
	let struct_count = cursor.read_u32_le()? as usize;
	let field_offset = cursor.read_u32_le()? as usize;
	let field_count = cursor.read_u32_le()? as usize;
	let label_offset = cursor.read_u32_le()? as usize;
	let label_count = cursor.read_u32_le()? as usize;
	let field_data_offset = cursor.read_u32_le()? as usize;
	let field_data_count = cursor.read_u32_le()? as usize;
	let field_indices_offset = cursor.read_u32_le()? as usize;
	let field_indices_count = cursor.read_u32_le()? as usize;
	let list_indices_offset = cursor.read_u32_le()? as usize;
	let list_indices_count = cursor.read_u32_le()? as usize;

	let mut structs = Vec::with_capacity(struct_count);
	let mut struct_cursor = Cursor::at(bytes, struct_offset);
	for _ in 0..struct_count {
		structs.push(RawStruct {
			struct_id: struct_cursor.read_u32_le()?,
			data: struct_cursor.read_u32_le()?,
			field_count: struct_cursor.read_u32_le()?,
		});
	}

	let mut fields = Vec::with_capacity(field_count);
	let mut field_cursor = Cursor::at(bytes, field_offset);
	for _ in 0..field_count {
		fields.push(RawField {
			type_code: field_cursor.read_u32_le()?,
			label_idx: field_cursor.read_u32_le()?,
			data: field_cursor.read_u32_le()?,
		});
	}

	let mut labels = Vec::with_capacity(label_count);
	let mut label_cursor = Cursor::at(bytes, label_offset);
	for _ in 0..label_count {
		let raw = label_cursor.read_exact(LABEL_SIZE)?;
		let end = raw.iter().position(|byte| *byte == 0).unwrap_or(LABEL_SIZE);
		labels.push(String::from_utf8_lossy(&raw[..end]).into_owned());
	}

	let tables = Tables {
		structs,
		fields,
		labels,
		field_data: section(bytes, field_data_offset, field_data_count)?,
		field_indices: section(bytes, field_indices_offset, field_indices_count)?,
		list_indices: section(bytes, list_indices_offset, list_indices_count)?,
	};

	let mut root = build_struct(&tables, 0, 0)?;
	let data_type = String::from_utf8_lossy(&file_type).trim_end().to_owned();
	root.promote_root(data_type, version);
	Ok(root)
}

/// Read and parse a binary GFF file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Struct> {
	read(&fs::read(path)?)
}

fn section(bytes: &[u8], offset: usize, count: usize) -> Result<&[u8]> {
	let end = offset.checked_add(count).ok_or(GffError::InvalidHeader)?;
	bytes.get(offset..end).ok_or(GffError::InvalidHeader)
}

fn build_struct(tables: &Tables<'_>, struct_idx: usize, depth: u32) -> Result<Struct> {
	if depth > MAX_DEPTH {
		return Err(GffError::DepthExceeded { max_depth: MAX_DEPTH });
	}

	let raw = tables.structs.get(struct_idx).ok_or(GffError::IndexOutOfRange {
		kind: "struct",
		idx: struct_idx,
		max: tables.structs.len().saturating_sub(1),
	})?;

	let mut out = Struct::new(raw.struct_id);
	match raw.field_count {
		0 => {}
		1 => add_field(tables, &mut out, raw.data as usize, depth)?,
		count => {
			let mut cursor = Cursor::at(tables.field_indices, raw.data as usize);
			for _ in 0..count {
				let field_idx = cursor.read_u32_le()? as usize;
				add_field(tables, &mut out, field_idx, depth)?;
			}
		}
	}
	Ok(out)
}

fn add_field(tables: &Tables<'_>, out: &mut Struct, field_idx: usize, depth: u32) -> Result<()> {
	let raw = tables.fields.get(field_idx).ok_or(GffError::IndexOutOfRange {
		kind: "field",
		idx: field_idx,
		max: tables.fields.len().saturating_sub(1),
	})?;

	let label = tables.labels.get(raw.label_idx as usize).ok_or(GffError::IndexOutOfRange {
		kind: "label",
		idx: raw.label_idx as usize,
		max: tables.labels.len().saturating_sub(1),
	})?;

	let value = decode_value(tables, raw, depth)?;
	out.add_field(label.clone(), value);
	Ok(())
}

fn decode_value(tables: &Tables<'_>, raw: &RawField, depth: u32) -> Result<Value> {
	let ftype = FieldType::from_code(raw.type_code)?;
	let value = match ftype {
		FieldType::Byte => Value::Byte(raw.data as u8),
		FieldType::Char => Value::Char(raw.data as u8 as i8),
		FieldType::Word => Value::Word(raw.data as u16),
		FieldType::Short => Value::Short(raw.data as u16 as i16),
		FieldType::Dword => Value::Dword(raw.data),
		FieldType::Int => Value::Int(raw.data as i32),
		FieldType::Float => Value::Float(f32::from_bits(raw.data)),
		FieldType::Dword64 => Value::Dword64(Cursor::at(tables.field_data, raw.data as usize).read_u64_le()?),
		FieldType::Int64 => Value::Int64(Cursor::at(tables.field_data, raw.data as usize).read_i64_le()?),
		FieldType::Double => Value::Double(Cursor::at(tables.field_data, raw.data as usize).read_f64_le()?),
		FieldType::CExoString => {
			let mut cursor = Cursor::at(tables.field_data, raw.data as usize);
			let len = cursor.read_u32_le()? as usize;
			Value::String(lossy(cursor.read_exact(len)?))
		}
		FieldType::ResRef => {
			let mut cursor = Cursor::at(tables.field_data, raw.data as usize);
			let len = cursor.read_u8()? as usize;
			Value::ResRef(lossy(cursor.read_exact(len)?))
		}
		FieldType::CExoLocString => {
			let mut cursor = Cursor::at(tables.field_data, raw.data as usize);
			let _total = cursor.read_u32_le()?;
			let str_ref = cursor.read_u32_le()?;
			let count = cursor.read_u32_le()?;

			let mut loc = LocString::with_str_ref(str_ref);
			for _ in 0..count {
				let language = cursor.read_u32_le()?;
				let len = cursor.read_u32_le()? as usize;
				loc.set(language, lossy(cursor.read_exact(len)?));
			}
			Value::LocString(loc)
		}
		FieldType::Void => {
			let mut cursor = Cursor::at(tables.field_data, raw.data as usize);
			let len = cursor.read_u32_le()? as usize;
			Value::Void(cursor.read_exact(len)?.to_vec())
		}
		FieldType::Struct => Value::Struct(build_struct(tables, raw.data as usize, depth + 1)?),
		FieldType::List => {
			let mut cursor = Cursor::at(tables.list_indices, raw.data as usize);
			let count = cursor.read_u32_le()? as usize;
			let mut items = Vec::with_capacity(count);
			for _ in 0..count {
				let struct_idx = cursor.read_u32_le()? as usize;
				items.push(build_struct(tables, struct_idx, depth + 1)?);
			}
			Value::List(items)
		}
	};
	Ok(value)
}

fn lossy(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).into_owned()
}
