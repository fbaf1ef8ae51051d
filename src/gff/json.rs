//! Reversible transform between the document tree and a generic JSON
//! representation, plus the human-readable codec built on top of it.
//!
//! The boxed form is a plain object: three reserved metadata keys
//! (`__struct_id`, `__data_type` on roots only, `__data_version` when
//! present) followed by one `{"type": ..., "value": ...}` entry per field in
//! insertion order. `unbox` strips the reserved keys back out and re-derives
//! struct/field capability recursively, so `unbox . box` is the identity and
//! `box . unbox . box` equals `box`.

use serde_json::{Map, Value as JsonValue};

use crate::gff::tree::Struct;
use crate::gff::value::{LocString, STR_REF_NONE};
use crate::gff::{FieldType, GffError, Result, Value};

const KEY_STRUCT_ID: &str = "__struct_id";
const KEY_DATA_TYPE: &str = "__data_type";
const KEY_DATA_VERSION: &str = "__data_version";

/// Return a plain associative copy of a struct's entries plus the reserved
/// metadata keys. `__data_type` is omitted for nested structs; it is
/// recoverable from the parent path.
pub fn box_struct(item: &Struct) -> JsonValue {
	let mut map = Map::new();
	map.insert(KEY_STRUCT_ID.to_owned(), JsonValue::from(item.struct_id()));
	if item.is_root() {
		map.insert(KEY_DATA_TYPE.to_owned(), JsonValue::from(item.data_type()));
	}
	if let Some(version) = item.data_version() {
		map.insert(KEY_DATA_VERSION.to_owned(), JsonValue::from(version));
	}

	for field in item.fields() {
		map.insert(field.label().to_owned(), box_value(field.value()));
	}
	JsonValue::Object(map)
}

fn box_value(value: &Value) -> JsonValue {
	let mut map = Map::new();
	map.insert("type".to_owned(), JsonValue::from(value.field_type().name()));

	if let Value::LocString(loc) = value
		&& loc.str_ref != STR_REF_NONE
	{
		map.insert("str_ref".to_owned(), JsonValue::from(loc.str_ref));
	}

	let boxed = match value {
		Value::Byte(v) => JsonValue::from(*v),
		Value::Char(v) => JsonValue::from(*v),
		Value::Word(v) => JsonValue::from(*v),
		Value::Short(v) => JsonValue::from(*v),
		Value::Dword(v) => JsonValue::from(*v),
		Value::Int(v) => JsonValue::from(*v),
		Value::Dword64(v) => JsonValue::from(*v),
		Value::Int64(v) => JsonValue::from(*v),
		Value::Float(v) => JsonValue::from(*v),
		Value::Double(v) => JsonValue::from(*v),
		Value::String(text) | Value::ResRef(text) => JsonValue::from(text.as_str()),
		Value::Void(bytes) => JsonValue::from(hex::encode(bytes)),
		Value::LocString(loc) => {
			let mut strings = Map::new();
			for (language, text) in loc.iter() {
				strings.insert(language.to_string(), JsonValue::from(text));
			}
			JsonValue::Object(strings)
		}
		Value::Struct(item) => box_struct(item),
		Value::List(items) => JsonValue::Array(items.iter().map(box_struct).collect()),
	};
	map.insert("value".to_owned(), boxed);
	JsonValue::Object(map)
}

/// Rebuild a document tree from its boxed representation: extract the
/// reserved metadata keys and convert every remaining entry into a typed
/// field, recursively.
pub fn unbox(value: &JsonValue) -> Result<Struct> {
	let map = value.as_object().ok_or(GffError::JsonNotAnObject)?;

	let struct_id = match map.get(KEY_STRUCT_ID) {
		None => crate::gff::tree::STRUCT_ID_NONE,
		Some(raw) => uint_value(raw, KEY_STRUCT_ID)?,
	};
	let data_type = match map.get(KEY_DATA_TYPE) {
		None => None,
		Some(raw) => Some(str_value(raw, KEY_DATA_TYPE)?.to_owned()),
	};
	let data_version = match map.get(KEY_DATA_VERSION) {
		None => None,
		Some(raw) => Some(str_value(raw, KEY_DATA_VERSION)?.to_owned()),
	};

	let mut out = Struct::new(struct_id);
	for (label, entry) in map {
		if label == KEY_STRUCT_ID || label == KEY_DATA_TYPE || label == KEY_DATA_VERSION {
			continue;
		}
		let value = unbox_field(label, entry)?;
		out.add_field(label.clone(), value);
	}

	if data_type.is_some() || data_version.is_some() {
		out.promote_root(
			data_type.unwrap_or_default(),
			data_version.unwrap_or_else(|| crate::gff::decode::SUPPORTED_VERSION.to_owned()),
		);
	}
	Ok(out)
}

fn unbox_field(label: &str, entry: &JsonValue) -> Result<Value> {
	let map = entry.as_object().ok_or_else(|| GffError::JsonBadField {
		label: label.to_owned(),
		reason: "expected an object",
	})?;

	let type_name = map
		.get("type")
		.and_then(JsonValue::as_str)
		.ok_or_else(|| GffError::JsonBadField {
			label: label.to_owned(),
			reason: "missing type tag",
		})?;
	let ftype = FieldType::from_name(type_name).ok_or_else(|| GffError::UnknownFieldType { name: type_name.to_owned() })?;

	let raw = map.get("value").ok_or_else(|| GffError::JsonBadField {
		label: label.to_owned(),
		reason: "missing value",
	})?;

	let value = match ftype {
		FieldType::Byte => Value::Byte(uint_value(raw, label)?),
		FieldType::Char => Value::Char(int_value(raw, label)?),
		FieldType::Word => Value::Word(uint_value(raw, label)?),
		FieldType::Short => Value::Short(int_value(raw, label)?),
		FieldType::Dword => Value::Dword(uint_value(raw, label)?),
		FieldType::Int => Value::Int(int_value(raw, label)?),
		FieldType::Dword64 => Value::Dword64(uint_value(raw, label)?),
		FieldType::Int64 => Value::Int64(int_value(raw, label)?),
		FieldType::Float => Value::Float(float_value(raw, label)? as f32),
		FieldType::Double => Value::Double(float_value(raw, label)?),
		FieldType::CExoString => Value::String(str_value(raw, label)?.to_owned()),
		FieldType::ResRef => Value::ResRef(str_value(raw, label)?.to_owned()),
		FieldType::Void => {
			let text = str_value(raw, label)?;
			let bytes = hex::decode(text).map_err(|_| GffError::JsonBadField {
				label: label.to_owned(),
				reason: "expected a hex string",
			})?;
			Value::Void(bytes)
		}
		FieldType::CExoLocString => {
			let strings = raw.as_object().ok_or_else(|| GffError::JsonBadField {
				label: label.to_owned(),
				reason: "expected a language map",
			})?;

			let str_ref = match map.get("str_ref") {
				None => STR_REF_NONE,
				Some(value) => uint_value(value, label)?,
			};
			let mut loc = LocString::with_str_ref(str_ref);
			for (key, text) in strings {
				let language: u32 = key.parse().map_err(|_| GffError::JsonBadField {
					label: label.to_owned(),
					reason: "bad language id",
				})?;
				loc.set(language, str_value(text, label)?);
			}
			Value::LocString(loc)
		}
		FieldType::Struct => Value::Struct(unbox(raw)?),
		FieldType::List => {
			let items = raw.as_array().ok_or_else(|| GffError::JsonBadField {
				label: label.to_owned(),
				reason: "expected an array",
			})?;
			Value::List(items.iter().map(unbox).collect::<Result<Vec<_>>>()?)
		}
	};
	Ok(value)
}

fn int_value<T: TryFrom<i64>>(raw: &JsonValue, label: &str) -> Result<T> {
	let wide = raw.as_i64().ok_or_else(|| bad_int(label))?;
	T::try_from(wide).map_err(|_| bad_int(label))
}

fn uint_value<T: TryFrom<u64>>(raw: &JsonValue, label: &str) -> Result<T> {
	let wide = raw.as_u64().ok_or_else(|| bad_int(label))?;
	T::try_from(wide).map_err(|_| bad_int(label))
}

fn bad_int(label: &str) -> GffError {
	GffError::JsonBadField {
		label: label.to_owned(),
		reason: "expected an integer in range",
	}
}

fn float_value(raw: &JsonValue, label: &str) -> Result<f64> {
	raw.as_f64().ok_or_else(|| GffError::JsonBadField {
		label: label.to_owned(),
		reason: "expected a number",
	})
}

fn str_value<'a>(raw: &'a JsonValue, label: &str) -> Result<&'a str> {
	raw.as_str().ok_or_else(|| GffError::JsonBadField {
		label: label.to_owned(),
		reason: "expected a string",
	})
}

/// Print a document through the boxed representation. Pretty-printing is an
/// explicit choice of the call, not process state.
pub fn to_json_string(item: &Struct, pretty: bool) -> Result<String> {
	let boxed = box_struct(item);
	let text = if pretty {
		serde_json::to_string_pretty(&boxed)?
	} else {
		serde_json::to_string(&boxed)?
	};
	Ok(text)
}

/// Parse a document from its JSON representation.
pub fn from_json_str(text: &str) -> Result<Struct> {
	unbox(&serde_json::from_str::<JsonValue>(text)?)
}

#[cfg(test)]
mod tests {
	use super::{box_struct, from_json_str, to_json_string, unbox};
	use crate::gff::tree::STRUCT_ID_NONE;
	use crate::gff::{GffError, LocString, Struct, Value};

	fn sample_doc() -> Struct {
		let mut name = LocString::with_str_ref(77);
		name.set(0, "Guard");
		name.set(3, "Garde");

		let mut item = Struct::new(4);
		item.add_field("Tag", Value::String("gate_key".to_owned()));

		let mut root = Struct::root("UTC", "V3.2");
		root.add_field("Level", Value::Byte(7));
		root.add_field("Gold", Value::Dword(250));
		root.add_field("FirstName", Value::LocString(name));
		root.add_field("Comment", Value::LocString(LocString::new()));
		root.add_field("Portrait", Value::ResRef("po_guard".to_owned()));
		root.add_field("Weight", Value::Float(80.5));
		root.add_field("Blob", Value::Void(vec![1, 2, 0xfe]));
		root.add_field("Inventory", Value::List(vec![item]));
		root
	}

	#[test]
	fn unbox_undoes_box() {
		let doc = sample_doc();
		let back = unbox(&box_struct(&doc)).expect("boxed form unboxes");
		assert_eq!(back, doc);
	}

	#[test]
	fn box_unbox_box_is_idempotent() {
		let doc = sample_doc();
		let once = box_struct(&doc);
		let twice = box_struct(&unbox(&once).expect("boxed form unboxes"));
		assert_eq!(once, twice);
	}

	#[test]
	fn reserved_keys_follow_rootness() {
		let boxed = box_struct(&sample_doc());
		let map = boxed.as_object().expect("boxed root is an object");
		assert_eq!(map["__data_type"], "UTC");
		assert_eq!(map["__data_version"], "V3.2");

		let nested = map["Inventory"]["value"][0].as_object().expect("boxed element is an object");
		assert!(nested.contains_key("__struct_id"));
		assert!(!nested.contains_key("__data_type"));
		assert!(!nested.contains_key("__data_version"));
	}

	#[test]
	fn str_ref_key_appears_only_when_set() {
		let boxed = box_struct(&sample_doc());
		assert_eq!(boxed["FirstName"]["str_ref"], 77);
		assert!(boxed["Comment"].as_object().expect("boxed field is an object").get("str_ref").is_none());
	}

	#[test]
	fn missing_struct_id_defaults_to_sentinel() {
		let doc = unbox(&serde_json::json!({})).expect("empty object unboxes");
		assert_eq!(doc.struct_id(), STRUCT_ID_NONE);
		assert!(doc.is_empty());
	}

	#[test]
	fn unknown_type_name_is_rejected() {
		let err = unbox(&serde_json::json!({
			"X": { "type": "quux", "value": 0 }
		}))
		.expect_err("unknown tag fails");
		assert!(matches!(err, GffError::UnknownFieldType { name } if name == "quux"));
	}

	#[test]
	fn malformed_field_entries_are_rejected() {
		let err = unbox(&serde_json::json!({ "X": 5 })).expect_err("non-object entry fails");
		assert!(matches!(err, GffError::JsonBadField { .. }));

		let err = unbox(&serde_json::json!({
			"X": { "type": "byte", "value": 999 }
		}))
		.expect_err("out of range fails");
		assert!(matches!(err, GffError::JsonBadField { .. }));

		let err = unbox(&serde_json::json!({
			"X": { "type": "void", "value": "zz" }
		}))
		.expect_err("bad hex fails");
		assert!(matches!(err, GffError::JsonBadField { .. }));
	}

	#[test]
	fn text_codec_round_trips_both_layouts() {
		let doc = sample_doc();

		let pretty = to_json_string(&doc, true).expect("pretty prints");
		let compact = to_json_string(&doc, false).expect("compact prints");
		assert!(pretty.contains('\n'));
		assert!(!compact.contains('\n'));

		assert_eq!(from_json_str(&pretty).expect("pretty parses"), doc);
		assert_eq!(from_json_str(&compact).expect("compact parses"), doc);
	}
}
