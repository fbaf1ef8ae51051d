use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::gff::decode::{HEADER_SIZE, LABEL_SIZE, SUPPORTED_VERSION};
use crate::gff::tree::Struct;
use crate::gff::{GffError, Result, Value};

const RESREF_MAX: usize = 16;

/// Serialize a document to binary GFF. `type_override` replaces the root's
/// resource type in the header when given. The layout is deterministic
/// (breadth-first struct numbering, labels interned in first-use order), so
/// writing is a fixed point for any tree produced by a load.
pub fn write(root: &Struct, type_override: Option<&str>) -> Result<Vec<u8>> {
	let mut writer = Writer::default();

	writer.structs.push(OutStruct {
		struct_id: root.struct_id(),
		data: 0,
		field_count: 0,
	});

	let mut queue: VecDeque<(usize, &Struct)> = VecDeque::new();
	queue.push_back((0, root));

	while let Some((slot, item)) = queue.pop_front() {
		let mut indices = Vec::with_capacity(item.len());
		for field in item.fields() {
			let field_idx = writer.fields.len() as u32;
			let label_idx = writer.intern_label(field.label())?;
			let (type_code, data) = writer.encode_value(field.value(), &mut queue)?;
			writer.fields.push(OutField {
				type_code,
				label_idx,
				data,
			});
			indices.push(field_idx);
		}

		let data = match indices.as_slice() {
			[] => 0,
			[only] => *only,
			many => {
				let offset = writer.field_indices.len() as u32;
				for idx in many {
					writer.field_indices.extend_from_slice(&idx.to_le_bytes());
				}
				offset
			}
		};
		let record = &mut writer.structs[slot];
		record.field_count = indices.len() as u32;
		record.data = data;
	}

	let file_type = pad_code(type_override.unwrap_or(root.data_type()));
	let file_version = root.data_version().unwrap_or(SUPPORTED_VERSION);
	Ok(writer.assemble(file_type, file_version))
}

/// Serialize a document and write it to a file.
pub fn write_file(path: impl AsRef<Path>, root: &Struct, type_override: Option<&str>) -> Result<()> {
	let bytes = write(root, type_override)?;
	fs::write(path, bytes)?;
	Ok(())
}

struct OutStruct {
	struct_id: u32,
	data: u32,
	field_count: u32,
}

struct OutField {
	type_code: u32,
	label_idx: u32,
	data: u32,
}

#[derive(Default)]
struct Writer {
	structs: Vec<OutStruct>,
	fields: Vec<OutField>,
	labels: Vec<String>,
	field_data: Vec<u8>,
	field_indices: Vec<u8>,
	list_indices: Vec<u8>,
}

impl Writer {
	fn intern_label(&mut self, label: &str) -> Result<u32> {
		if label.len() > LABEL_SIZE {
			return Err(GffError::LabelTooLong {
				label: label.to_owned(),
				len: label.len(),
			});
		}
		if let Some(idx) = self.labels.iter().position(|known| known == label) {
			return Ok(idx as u32);
		}
		self.labels.push(label.to_owned());
		Ok(self.labels.len() as u32 - 1)
	}

	fn alloc_struct<'a>(&mut self, item: &'a Struct, queue: &mut VecDeque<(usize, &'a Struct)>) -> u32 {
		let slot = self.structs.len();
		self.structs.push(OutStruct {
			struct_id: item.struct_id(),
			data: 0,
			field_count: 0,
		});
		queue.push_back((slot, item));
		slot as u32
	}

	fn encode_value<'a>(&mut self, value: &'a Value, queue: &mut VecDeque<(usize, &'a Struct)>) -> Result<(u32, u32)> {
		let type_code = value.field_type().code();
		let data = match value {
			Value::Byte(v) => u32::from(*v),
			Value::Char(v) => u32::from(*v as u8),
			Value::Word(v) => u32::from(*v),
			Value::Short(v) => u32::from(*v as u16),
			Value::Dword(v) => *v,
			Value::Int(v) => *v as u32,
			Value::Float(v) => v.to_bits(),
			Value::Dword64(v) => self.append_data(&v.to_le_bytes()),
			Value::Int64(v) => self.append_data(&v.to_le_bytes()),
			Value::Double(v) => self.append_data(&v.to_bits().to_le_bytes()),
			Value::String(text) => {
				let offset = self.field_data.len() as u32;
				self.field_data.extend_from_slice(&(text.len() as u32).to_le_bytes());
				self.field_data.extend_from_slice(text.as_bytes());
				offset
			}
			Value::ResRef(text) => {
				if text.len() > RESREF_MAX {
					return Err(GffError::ResRefTooLong {
						len: text.len(),
						max: RESREF_MAX,
					});
				}
				let offset = self.field_data.len() as u32;
				self.field_data.push(text.len() as u8);
				self.field_data.extend_from_slice(text.as_bytes());
				offset
			}
			Value::LocString(loc) => {
				let total: usize = 8 + loc.iter().map(|(_, text)| 8 + text.len()).sum::<usize>();
				let offset = self.field_data.len() as u32;
				self.field_data.extend_from_slice(&(total as u32).to_le_bytes());
				self.field_data.extend_from_slice(&loc.str_ref.to_le_bytes());
				self.field_data.extend_from_slice(&(loc.len() as u32).to_le_bytes());
				for (language, text) in loc.iter() {
					self.field_data.extend_from_slice(&language.to_le_bytes());
					self.field_data.extend_from_slice(&(text.len() as u32).to_le_bytes());
					self.field_data.extend_from_slice(text.as_bytes());
				}
				offset
			}
			Value::Void(bytes) => {
				let offset = self.field_data.len() as u32;
				self.field_data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
				self.field_data.extend_from_slice(bytes);
				offset
			}
			Value::Struct(item) => self.alloc_struct(item, queue),
			Value::List(items) => {
				let offset = self.list_indices.len() as u32;
				self.list_indices.extend_from_slice(&(items.len() as u32).to_le_bytes());
				for item in items {
					let slot = self.alloc_struct(item, queue);
					self.list_indices.extend_from_slice(&slot.to_le_bytes());
				}
				offset
			}
		};
		Ok((type_code, data))
	}

	fn append_data(&mut self, bytes: &[u8]) -> u32 {
		let offset = self.field_data.len() as u32;
		self.field_data.extend_from_slice(bytes);
		offset
	}

	fn assemble(self, file_type: [u8; 4], file_version: &str) -> Vec<u8> {
		let struct_bytes = self.structs.len() * 12;
		let field_bytes = self.fields.len() * 12;
		let label_bytes = self.labels.len() * LABEL_SIZE;

		let struct_offset = HEADER_SIZE;
		let field_offset = struct_offset + struct_bytes;
		let label_offset = field_offset + field_bytes;
		let field_data_offset = label_offset + label_bytes;
		let field_indices_offset = field_data_offset + self.field_data.len();
		let list_indices_offset = field_indices_offset + self.field_indices.len();
		let total = list_indices_offset + self.list_indices.len();

		let mut out = Vec::with_capacity(total);
		out.extend_from_slice(&file_type);
		out.extend_from_slice(&pad_code(file_version));
		for value in [
			struct_offset,
			self.structs.len(),
			field_offset,
			self.fields.len(),
			label_offset,
			self.labels.len(),
			field_data_offset,
			self.field_data.len(),
			field_indices_offset,
			self.field_indices.len(),
			list_indices_offset,
			self.list_indices.len(),
		] {
			out.extend_from_slice(&(value as u32).to_le_bytes());
		}

		for record in &self.structs {
			out.extend_from_slice(&record.struct_id.to_le_bytes());
			out.extend_from_slice(&record.data.to_le_bytes());
			out.extend_from_slice(&record.field_count.to_le_bytes());
		}
		for record in &self.fields {
			out.extend_from_slice(&record.type_code.to_le_bytes());
			out.extend_from_slice(&record.label_idx.to_le_bytes());
			out.extend_from_slice(&record.data.to_le_bytes());
		}
		for label in &self.labels {
			let mut slot = [0_u8; LABEL_SIZE];
			slot[..label.len()].copy_from_slice(label.as_bytes());
			out.extend_from_slice(&slot);
		}
		out.extend_from_slice(&self.field_data);
		out.extend_from_slice(&self.field_indices);
		out.extend_from_slice(&self.list_indices);
		out
	}
}

fn pad_code(code: &str) -> [u8; 4] {
	let mut out = [b' '; 4];
	for (slot, byte) in out.iter_mut().zip(code.bytes()) {
		*slot = byte;
	}
	out
}

#[cfg(test)]
mod tests {
	use super::{pad_code, write};
	use crate::gff::decode::read;
	use crate::gff::{GffError, LocString, Struct, Value};

	fn sample_doc() -> Struct {
		let mut name = LocString::with_str_ref(4321);
		name.set(0, "Longsword");
		name.set(2, "Langschwert");

		let mut first = Struct::new(0);
		first.add_field("Active", Value::Byte(1));
		first.add_field("Cost", Value::Dword(350));
		let mut second = Struct::new(1);
		second.add_field("Active", Value::Byte(0));
		second.add_field("Cost", Value::Dword(75));

		let mut stats = Struct::new(10);
		stats.add_field("Str", Value::Char(-2));
		stats.add_field("HitDice", Value::Word(8));

		let mut root = Struct::root("UTI", "V3.2");
		root.add_field("Tag", Value::String("it_sword01".to_owned()));
		root.add_field("TemplateResRef", Value::ResRef("it_sword01".to_owned()));
		root.add_field("LocalizedName", Value::LocString(name));
		root.add_field("Plot", Value::Byte(0));
		root.add_field("Charges", Value::Short(-5));
		root.add_field("AddCost", Value::Int(-100));
		root.add_field("Serial", Value::Dword64(1 << 48));
		root.add_field("Delta", Value::Int64(-(1_i64 << 40)));
		root.add_field("Weight", Value::Float(4.5));
		root.add_field("Exact", Value::Double(0.125));
		root.add_field("Blob", Value::Void(vec![0xde, 0xad, 0xbe, 0xef]));
		root.add_field("Stats", Value::Struct(stats));
		root.add_field("Properties", Value::List(vec![first, second]));
		root
	}

	#[test]
	fn binary_round_trip_preserves_structure() {
		let doc = sample_doc();
		let bytes = write(&doc, None).expect("document writes");
		let back = read(&bytes).expect("document reads");
		assert_eq!(back, doc);
	}

	#[test]
	fn write_is_a_fixed_point_after_one_load() {
		let doc = sample_doc();
		let first = write(&doc, None).expect("document writes");
		let second = write(&read(&first).expect("document reads"), None).expect("document rewrites");
		assert_eq!(first, second);
	}

	#[test]
	fn type_override_replaces_header_type() {
		let doc = sample_doc();
		let bytes = write(&doc, Some("BIC")).expect("document writes");
		assert_eq!(&bytes[0..4], b"BIC ");
		let back = read(&bytes).expect("document reads");
		assert_eq!(back.data_type(), "BIC");
	}

	#[test]
	fn shared_labels_are_interned_once() {
		let doc = sample_doc();
		let bytes = write(&doc, None).expect("document writes");
		let label_count = u32::from_le_bytes(bytes[28..32].try_into().expect("header slice")) as usize;
		// "Active" and "Cost" appear in both list elements.
		assert_eq!(label_count, 17);
	}

	#[test]
	fn oversized_label_is_rejected() {
		let mut root = Struct::root("UTI", "V3.2");
		root.add_field("ThisLabelIsTooLongForDisk", Value::Byte(0));
		let err = write(&root, None).expect_err("long label fails");
		assert!(matches!(err, GffError::LabelTooLong { len: 25, .. }));
	}

	#[test]
	fn oversized_resref_is_rejected() {
		let mut root = Struct::root("UTI", "V3.2");
		root.add_field("TemplateResRef", Value::ResRef("a_resref_well_beyond_sixteen".to_owned()));
		let err = write(&root, None).expect_err("long resref fails");
		assert!(matches!(err, GffError::ResRefTooLong { max: 16, .. }));
	}

	#[test]
	fn unsupported_version_is_rejected() {
		let doc = sample_doc();
		let mut bytes = write(&doc, None).expect("document writes");
		bytes[4..8].copy_from_slice(b"V9.9");
		let err = read(&bytes).expect_err("bad version fails");
		assert!(matches!(err, GffError::UnsupportedVersion { version } if version == "V9.9"));
	}

	#[test]
	fn cyclic_struct_indices_hit_the_depth_guard() {
		// Hand-built file whose single struct holds a struct field pointing
		// back at itself.
		let mut bytes = Vec::new();
		bytes.extend_from_slice(b"GFF V3.2");
		for value in [56_u32, 1, 68, 1, 80, 1, 96, 0, 96, 0, 96, 0] {
			bytes.extend_from_slice(&value.to_le_bytes());
		}
		for value in [0_u32, 0, 1] {
			bytes.extend_from_slice(&value.to_le_bytes());
		}
		for value in [14_u32, 0, 0] {
			bytes.extend_from_slice(&value.to_le_bytes());
		}
		bytes.extend_from_slice(b"Self\0\0\0\0\0\0\0\0\0\0\0\0");

		let err = read(&bytes).expect_err("cycle fails");
		assert!(matches!(err, GffError::DepthExceeded { .. }));
	}

	#[test]
	fn pad_code_truncates_and_pads() {
		assert_eq!(pad_code("ERF"), *b"ERF ");
		assert_eq!(pad_code("TOOLONG"), *b"TOOL");
		assert_eq!(pad_code(""), *b"    ");
	}
}
