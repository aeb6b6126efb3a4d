use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, stable identity of one open editor window.
///
/// Only used as a registry key; carries no behavior of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl WindowId {
	/// Generates a new unique window ID.
	pub fn next() -> Self {
		Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl fmt::Display for WindowId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "window#{}", self.0)
	}
}

/// A text view hosted inside a code window (primary or split secondary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

/// Host-side handle of an installed dropdown bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarSlotId(pub u64);
