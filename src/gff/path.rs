use std::fmt::Write as _;

use crate::gff::tree::{Field, Struct};
use crate::gff::value::STR_REF_NONE;
use crate::gff::{FieldType, GffError, Result, Value};

/// Result of evaluating a path expression, per trailing modifier.
#[derive(Debug)]
pub enum PathValue<'a> {
	/// A struct node (root, nested, or list element).
	Struct(&'a Struct),
	/// A field node.
	Field(&'a Field),
	/// The final field's payload (`$`).
	Value(&'a Value),
	/// The final field's type tag (`?`).
	Type(FieldType),
	/// The final field's talk-table reference, or the sentinel (`%`).
	StrRef(u32),
	/// One language's text, selected by a numeric final segment on a
	/// localized-string field.
	LocText(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum Modifier {
	Value,
	Type,
	StrRef,
}

impl Modifier {
	fn symbol(self) -> char {
		match self {
			Self::Value => '$',
			Self::Type => '?',
			Self::StrRef => '%',
		}
	}
}

#[derive(Debug)]
struct Segment {
	label: String,
	index: Option<usize>,
}

#[derive(Clone, Copy)]
enum Node<'a> {
	Struct(&'a Struct),
	Field(&'a Field),
	Text(&'a str),
}

/// Evaluate a path expression against `root`.
///
/// Grammar: `label('[' index ']')?` segments separated by `/`, surrounding
/// slashes and per-segment whitespace ignored, with at most one trailing
/// modifier (`$` value, `?` type tag, `%` talk-table reference). An empty
/// path resolves to `root` itself.
pub fn resolve<'a>(root: &'a Struct, input: &str) -> Result<PathValue<'a>> {
	let (segments, modifier) = parse(input)?;

	let mut node = Node::Struct(root);
	let mut consumed = String::new();
	let last = segments.len().saturating_sub(1);

	for (pos, segment) in segments.iter().enumerate() {
		consumed.push('/');
		consumed.push_str(&segment.label);

		// A purely numeric final segment selects one language's text when
		// the current node is a localized-string field.
		if pos == last && segment.index.is_none()
			&& let Node::Field(field) = node
			&& let Value::LocString(loc) = field.value()
			&& is_numeric(&segment.label)
		{
			let language: u32 = segment.label.parse().map_err(|_| GffError::InvalidPath { path: input.to_owned() })?;
			let Some(text) = loc.get(language) else {
				return Err(GffError::PathNotFound { path: consumed });
			};
			node = Node::Text(text);
			continue;
		}

		let current: &Struct = match node {
			Node::Struct(item) => item,
			Node::Field(field) => match field.value() {
				Value::Struct(item) => item,
				_ => return Err(GffError::PathNotFound { path: consumed }),
			},
			Node::Text(_) => return Err(GffError::PathNotFound { path: consumed }),
		};

		let Some(field) = current.field(&segment.label) else {
			return Err(GffError::PathNotFound { path: consumed });
		};

		node = match segment.index {
			None => Node::Field(field),
			Some(index) => {
				let _ = write!(consumed, "[{index}]");
				let Value::List(items) = field.value() else {
					return Err(GffError::NotAList { path: consumed });
				};
				let Some(item) = items.get(index) else {
					return Err(GffError::PathNotFound { path: consumed });
				};
				Node::Struct(item)
			}
		};
	}

	let Some(modifier) = modifier else {
		return Ok(match node {
			Node::Struct(item) => PathValue::Struct(item),
			Node::Field(field) => PathValue::Field(field),
			Node::Text(text) => PathValue::LocText(text),
		});
	};

	let field = match node {
		Node::Field(field) => field,
		Node::Struct(_) => {
			return Err(GffError::InvalidFieldOperation {
				op: format!("modifier {} on struct node", modifier.symbol()),
			});
		}
		Node::Text(_) => {
			return Err(GffError::InvalidFieldOperation {
				op: format!("modifier {} on locale text", modifier.symbol()),
			});
		}
	};

	Ok(match modifier {
		Modifier::Value => PathValue::Value(field.value()),
		Modifier::Type => PathValue::Type(field.field_type()),
		Modifier::StrRef => match field.value() {
			Value::LocString(loc) => PathValue::StrRef(loc.str_ref),
			_ => PathValue::StrRef(STR_REF_NONE),
		},
	})
}

fn parse(input: &str) -> Result<(Vec<Segment>, Option<Modifier>)> {
	let mut rest = input.trim();

	let modifier = match rest.as_bytes().last() {
		Some(b'$') => Some(Modifier::Value),
		Some(b'?') => Some(Modifier::Type),
		Some(b'%') => Some(Modifier::StrRef),
		_ => None,
	};
	if modifier.is_some() {
		rest = rest[..rest.len() - 1].trim_end();
	}

	let mut segments = Vec::new();
	for piece in rest.split('/') {
		let piece = piece.trim();
		if piece.is_empty() {
			continue;
		}

		let segment = match piece.find('[') {
			None => Segment {
				label: piece.to_owned(),
				index: None,
			},
			Some(open) => {
				let Some(inner) = piece[open + 1..].strip_suffix(']') else {
					return Err(GffError::InvalidPath { path: input.to_owned() });
				};
				let label = piece[..open].trim_end();
				if label.is_empty() || inner.is_empty() || !is_numeric(inner) {
					return Err(GffError::InvalidPath { path: input.to_owned() });
				}
				let index = inner.parse::<usize>().map_err(|_| GffError::InvalidPath { path: input.to_owned() })?;
				Segment {
					label: label.to_owned(),
					index: Some(index),
				}
			}
		};
		segments.push(segment);
	}

	Ok((segments, modifier))
}

fn is_numeric(text: &str) -> bool {
	!text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}
