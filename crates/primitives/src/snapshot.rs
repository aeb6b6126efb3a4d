use ropey::Rope;

/// Immutable view of a buffer's text at one version.
///
/// Cloning is cheap: the rope shares its chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSnapshot {
	/// Monotonic buffer version the text corresponds to.
	pub version: u64,
	pub text: Rope,
}

impl BufferSnapshot {
	pub fn new(version: u64, text: impl Into<Rope>) -> Self {
		Self { version, text: text.into() }
	}

	/// Returns the complete buffer contents as a contiguous string.
	pub fn full_text(&self) -> String {
		self.text.to_string()
	}

	pub fn len_bytes(&self) -> usize {
		self.text.len_bytes()
	}

	pub fn is_empty(&self) -> bool {
		self.text.len_bytes() == 0
	}
}
