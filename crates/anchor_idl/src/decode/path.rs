use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
	Root,
	Key(&'a str),
	Index(usize),
}

/// Location of a value inside the document, rendered like
/// `instructions[2].args[0].type`.
///
/// Segments borrow from their parent on the stack, so descending costs
/// nothing until an error needs the rendered string.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JsonPath<'a> {
	parent: Option<&'a JsonPath<'a>>,
	segment: Segment<'a>,
}

impl<'a> JsonPath<'a> {
	pub(crate) const ROOT: JsonPath<'static> = JsonPath {
		parent: None,
		segment: Segment::Root,
	};

	pub(crate) fn key(&'a self, key: &'a str) -> JsonPath<'a> {
		JsonPath {
			parent: Some(self),
			segment: Segment::Key(key),
		}
	}

	pub(crate) fn index(&'a self, index: usize) -> JsonPath<'a> {
		JsonPath {
			parent: Some(self),
			segment: Segment::Index(index),
		}
	}
}

impl fmt::Display for JsonPath<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut segments = Vec::new();
		let mut cursor = Some(self);
		while let Some(path) = cursor {
			segments.push(path.segment);
			cursor = path.parent;
		}

		let mut wrote_any = false;
		for segment in segments.iter().rev() {
			match segment {
				Segment::Root => {}
				Segment::Key(key) => {
					if wrote_any {
						f.write_str(".")?;
					}
					f.write_str(key)?;
					wrote_any = true;
				}
				Segment::Index(index) => {
					write!(f, "[{index}]")?;
					wrote_any = true;
				}
			}
		}

		if !wrote_any {
			f.write_str("<root>")?;
		}
		Ok(())
	}
}
