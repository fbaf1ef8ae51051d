mod decode;
mod encode;
mod error;
mod json;
mod path;
mod tree;
mod value;

/// Binary document reader entry points.
pub use decode::{read, read_file};
/// Binary document writer entry points.
pub use encode::{write, write_file};
/// Error and result aliases.
pub use error::{GffError, Result};
/// Box/unbox transform and the JSON codec built on it.
pub use json::{box_struct, from_json_str, to_json_string, unbox};
/// Path resolution output.
pub use path::PathValue;
/// Document tree node types.
pub use tree::{Field, STRUCT_ID_NONE, Struct};
/// Field type tags and payloads.
pub use value::{FieldType, LocString, STR_REF_NONE, Value};
