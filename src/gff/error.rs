use thiserror::Error;

use crate::bytes::ShortRead;
use crate::gff::FieldType;

/// Module-local result type.
pub type Result<T> = std::result::Result<T, GffError>;

/// Errors produced while building, addressing, and encoding GFF documents.
#[derive(Debug, Error)]
pub enum GffError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error(transparent)]
	Truncated(#[from] ShortRead),
	/// File header is malformed or too short.
	#[error("invalid header")]
	InvalidHeader,
	/// File version other than the supported `V3.2`.
	#[error("unsupported file version {version:?} (expected V3.2)")]
	UnsupportedVersion {
		/// Version string from the header.
		version: String,
	},
	/// Field type code outside the known tag set.
	#[error("unknown field type code {code}")]
	BadTypeCode {
		/// Offending wire code.
		code: u32,
	},
	/// Out-of-range index inside the file's tables.
	#[error("index out of range for {kind}: idx={idx}, max={max}")]
	IndexOutOfRange {
		/// Logical index kind being validated.
		kind: &'static str,
		/// Offending index value.
		idx: usize,
		/// Maximum valid index.
		max: usize,
	},
	/// Decoder recursion depth exceeded the fixed limit.
	#[error("struct nesting exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Label does not fit the 16-byte on-disk label slot.
	#[error("label too long: {label:?} ({len} bytes, max 16)")]
	LabelTooLong {
		/// Offending label.
		label: String,
		/// Its byte length.
		len: usize,
	},
	/// Resource reference string does not fit its length prefix.
	#[error("resref too long ({len} bytes, max {max})")]
	ResRefTooLong {
		/// Byte length of the value.
		len: usize,
		/// Maximum encodable length.
		max: usize,
	},
	/// Path expression syntax is invalid.
	#[error("invalid path: {path}")]
	InvalidPath {
		/// Original path expression.
		path: String,
	},
	/// A path segment did not resolve.
	#[error("path not found: {path}")]
	PathNotFound {
		/// Path prefix consumed up to and including the failing segment.
		path: String,
	},
	/// An indexed path segment landed on a non-list field.
	#[error("not a list: {path}")]
	NotAList {
		/// Path prefix consumed up to and including the failing segment.
		path: String,
	},
	/// Unrecognized dynamic field operation, or a field-only path modifier
	/// applied to a non-field node.
	#[error("invalid field operation: {op}")]
	InvalidFieldOperation {
		/// The attempted operation.
		op: String,
	},
	/// A field value whose shape does not match the requested type tag.
	#[error("value type mismatch for {label:?}: expected {expected}, got {got}")]
	ValueTypeMismatch {
		/// Label of the field being built.
		label: String,
		/// Requested type tag.
		expected: FieldType,
		/// Actual type tag of the supplied value.
		got: FieldType,
	},
	/// Underlying JSON parse or print failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Boxed document is not a JSON object.
	#[error("boxed struct is not an object")]
	JsonNotAnObject,
	/// Boxed field entry has a malformed shape.
	#[error("malformed boxed field {label:?}: {reason}")]
	JsonBadField {
		/// Label of the offending entry.
		label: String,
		/// What was wrong with it.
		reason: &'static str,
	},
	/// Unknown type-tag name in a boxed field or dynamic operation.
	#[error("unknown field type name {name:?}")]
	UnknownFieldType {
		/// Offending tag name.
		name: String,
	},
}
