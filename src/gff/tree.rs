use crate::gff::path::{self, PathValue};
use crate::gff::{FieldType, GffError, Result, Value};

/// All-ones struct id sentinel used when no id has been assigned.
pub const STRUCT_ID_NONE: u32 = 0xFFFF_FFFF;

/// A single labeled, typed value inside a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	label: String,
	value: Value,
}

impl Field {
	/// Build a detached field, validating that the value's shape matches the
	/// requested type tag.
	pub fn new(label: impl Into<String>, ftype: FieldType, value: Value) -> Result<Self> {
		let label = label.into();
		if value.field_type() != ftype {
			return Err(GffError::ValueTypeMismatch {
				label,
				expected: ftype,
				got: value.field_type(),
			});
		}
		Ok(Self { label, value })
	}

	/// Label key, unique within the owning struct.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Borrow the payload.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Mutably borrow the payload.
	pub fn value_mut(&mut self) -> &mut Value {
		&mut self.value
	}

	/// Type tag of the payload.
	pub fn field_type(&self) -> FieldType {
		self.value.field_type()
	}
}

/// Ordered label-to-field container, the document model's composite node.
///
/// A struct's identity path is carried in `data_type`: resource type for a
/// document root, `<parent-path>/<field-label>` once attached under a field.
/// Attachment recomputes the derived paths of the whole subtree and never
/// touches a previous owner's storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
	struct_id: u32,
	data_type: String,
	data_version: Option<String>,
	fields: Vec<Field>,
}

impl Struct {
	/// Detached non-root struct with the given id.
	pub fn new(struct_id: u32) -> Self {
		Self {
			struct_id,
			data_type: String::new(),
			data_version: None,
			fields: Vec::new(),
		}
	}

	/// Document root carrying a resource type and format version.
	pub fn root(data_type: impl Into<String>, data_version: impl Into<String>) -> Self {
		Self {
			struct_id: STRUCT_ID_NONE,
			data_type: data_type.into(),
			data_version: Some(data_version.into()),
			fields: Vec::new(),
		}
	}

	/// 32-bit struct id tag.
	pub fn struct_id(&self) -> u32 {
		self.struct_id
	}

	/// Set the 32-bit struct id tag.
	pub fn set_struct_id(&mut self, struct_id: u32) {
		self.struct_id = struct_id;
	}

	/// Resource type (root) or derived parent path (nested).
	pub fn data_type(&self) -> &str {
		&self.data_type
	}

	/// Format version, populated only on document roots.
	pub fn data_version(&self) -> Option<&str> {
		self.data_version.as_deref()
	}

	/// Whether this struct is a document root.
	pub fn is_root(&self) -> bool {
		self.data_version.is_some()
	}

	/// Type-qualified path of this struct. Equals the owning field's path
	/// once attached, the resource type otherwise.
	pub fn path(&self) -> &str {
		&self.data_type
	}

	/// Path a field stored under `label` resolves to.
	pub fn field_path(&self, label: &str) -> String {
		format!("{}/{}", self.data_type, label)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the struct holds no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterate fields in insertion order.
	pub fn fields(&self) -> impl Iterator<Item = &Field> {
		self.fields.iter()
	}

	/// Borrow the field stored under `label`.
	pub fn field(&self, label: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.label == label)
	}

	/// Mutably borrow the field stored under `label`.
	pub fn field_mut(&mut self, label: &str) -> Option<&mut Field> {
		self.fields.iter_mut().find(|field| field.label == label)
	}

	/// Whether a field is stored under `label`.
	pub fn has_field(&self, label: &str) -> bool {
		self.field(label).is_some()
	}

	/// Attach a field, replacing in place (position preserved) if the label
	/// already exists. Struct- and list-valued payloads are re-parented:
	/// their derived paths are recomputed from this struct's path.
	pub fn add_field(&mut self, label: impl Into<String>, mut value: Value) -> &mut Field {
		let label = label.into();
		reparent_value(&mut value, &self.field_path(&label));

		let idx = match self.fields.iter().position(|field| field.label == label) {
			Some(idx) => {
				self.fields[idx].value = value;
				idx
			}
			None => {
				self.fields.push(Field { label, value });
				self.fields.len() - 1
			}
		};
		&mut self.fields[idx]
	}

	/// Attach a pre-built field. Equivalent to `add_field` with its parts.
	pub fn attach(&mut self, field: Field) -> &mut Field {
		self.add_field(field.label, field.value)
	}

	/// Dynamic-dispatch shorthand over `add_field`: resolve a type-tag name,
	/// validate the value's shape against it, attach. Unknown names fail
	/// with an unknown-operation error instead of creating a malformed
	/// field.
	pub fn add(&mut self, type_name: &str, label: impl Into<String>, value: Value) -> Result<&mut Field> {
		let Some(ftype) = FieldType::from_name(type_name) else {
			return Err(GffError::InvalidFieldOperation {
				op: format!("add_{type_name}"),
			});
		};

		let label = label.into();
		if value.field_type() != ftype {
			return Err(GffError::ValueTypeMismatch {
				label,
				expected: ftype,
				got: value.field_type(),
			});
		}
		Ok(self.add_field(label, value))
	}

	/// Remove and return the field stored under `label`.
	pub fn remove_field(&mut self, label: &str) -> Option<Field> {
		let idx = self.fields.iter().position(|field| field.label == label)?;
		Some(self.fields.remove(idx))
	}

	/// Evaluate a path expression against this struct. See [`crate::gff::path`].
	pub fn by_path(&self, input: &str) -> Result<PathValue<'_>> {
		path::resolve(self, input)
	}

	pub(crate) fn promote_root(&mut self, data_type: String, data_version: String) {
		self.data_type = data_type;
		self.data_version = Some(data_version);
		let base = self.data_type.clone();
		for field in &mut self.fields {
			let child_path = format!("{}/{}", base, field.label);
			reparent_value(&mut field.value, &child_path);
		}
	}

	pub(crate) fn reparent(&mut self, new_path: &str) {
		self.data_type = new_path.to_owned();
		self.data_version = None;
		let base = self.data_type.clone();
		for field in &mut self.fields {
			let child_path = format!("{}/{}", base, field.label);
			reparent_value(&mut field.value, &child_path);
		}
	}
}

fn reparent_value(value: &mut Value, field_path: &str) {
	match value {
		Value::Struct(item) => item.reparent(field_path),
		Value::List(items) => {
			for item in items {
				item.reparent(field_path);
			}
		}
		_ => {}
	}
}
