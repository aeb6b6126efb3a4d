use std::ops::Range;
use std::sync::Arc;

/// Category of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineKind {
	/// The whole script or file.
	Root,
	Function,
	Class,
	Method,
	Property,
	/// Anything a grammar wants to surface that has no dedicated kind.
	Other,
}

/// One navigable entry of a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
	pub kind: OutlineKind,
	pub name: String,
	/// Byte span in the source text.
	pub span: Range<usize>,
	pub children: Vec<OutlineNode>,
}

impl OutlineNode {
	pub fn new(kind: OutlineKind, name: impl Into<String>, span: Range<usize>) -> Self {
		Self {
			kind,
			name: name.into(),
			span,
			children: Vec::new(),
		}
	}

	/// Builder: appends a child entry.
	pub fn with_child(mut self, child: OutlineNode) -> Self {
		self.children.push(child);
		self
	}

	/// Counts this node and every descendant.
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().map(OutlineNode::node_count).sum::<usize>()
	}
}

/// A recoverable error reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
	pub message: String,
	pub span: Range<usize>,
}

/// Immutable result of one completed parse.
///
/// Shared as `Arc<SyntaxTree>`; holders forward the reference and never copy
/// or mutate the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
	/// Buffer version the tree was parsed from.
	pub source_version: u64,
	pub root: OutlineNode,
	pub diagnostics: Vec<ParseDiagnostic>,
}

impl SyntaxTree {
	pub fn new(source_version: u64, root: OutlineNode) -> Self {
		Self {
			source_version,
			root,
			diagnostics: Vec::new(),
		}
	}

	/// Returns an empty tree covering `len` bytes.
	pub fn empty(source_version: u64, len: usize) -> Self {
		Self::new(source_version, OutlineNode::new(OutlineKind::Root, "", 0..len))
	}
}

/// Notification that a background parse finished.
#[derive(Debug, Clone)]
pub struct ParseCompletion {
	/// Buffer version the parse started from.
	pub source_version: u64,
	pub tree: Arc<SyntaxTree>,
}

impl ParseCompletion {
	pub fn new(tree: Arc<SyntaxTree>) -> Self {
		Self {
			source_version: tree.source_version,
			tree,
		}
	}
}
