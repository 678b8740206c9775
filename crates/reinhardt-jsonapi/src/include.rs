//! Include paths for compound documents
//!
//! Parses the JSON:API `include` parameter (`"author,comments.author"`) into a
//! tree keyed by association name.

use std::collections::BTreeMap;

/// Associations to include, nested by relationship path.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::IncludeTree;
///
/// let tree = IncludeTree::parse("customer, items.product");
///
/// assert!(tree.contains("customer"));
/// assert!(tree.contains("items"));
/// assert!(tree.child("items").unwrap().contains("product"));
/// assert!(!tree.contains("product"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeTree {
	children: BTreeMap<String, IncludeTree>,
}

impl IncludeTree {
	/// An empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a comma separated list of dotted paths. Blank entries are skipped.
	pub fn parse(include: &str) -> Self {
		Self::from_paths(include.split(','))
	}

	/// Build from dotted paths.
	pub fn from_paths<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut tree = Self::new();
		for path in paths {
			tree.insert_path(path.as_ref());
		}
		tree
	}

	/// Add one dotted path.
	pub fn insert_path(&mut self, path: &str) {
		let mut node = self;
		for segment in path.split('.').map(str::trim) {
			if segment.is_empty() {
				break;
			}
			node = node.children.entry(segment.to_string()).or_default();
		}
	}

	/// Whether `name` is included at this level.
	pub fn contains(&self, name: &str) -> bool {
		self.children.contains_key(name)
	}

	/// Sub-tree for `name`.
	pub fn child(&self, name: &str) -> Option<&IncludeTree> {
		self.children.get(name)
	}

	/// Whether nothing is included.
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}
}
