use thiserror::Error;

/// Host operations whose status codes the controller inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
	PrimaryView,
	SecondaryView,
	GetBar,
	RemoveBar,
	AddBar,
	AttachFilter,
	Idle,
}

impl HostOp {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::PrimaryView => "primary_view",
			Self::SecondaryView => "secondary_view",
			Self::GetBar => "get_bar",
			Self::RemoveBar => "remove_bar",
			Self::AddBar => "add_bar",
			Self::AttachFilter => "attach_filter",
			Self::Idle => "idle",
		}
	}
}

/// Failure status returned by a host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("host operation {name} failed with status {code:#010x}", name = .op.as_str())]
pub struct HostError {
	pub op: HostOp,
	/// Raw host status code. Always a failure code (negative).
	pub code: i32,
}

impl HostError {
	/// Generic failure status.
	pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
	/// Requested element does not exist.
	pub const E_NOT_FOUND: i32 = 0x8002_0009_u32 as i32;

	pub const fn new(op: HostOp, code: i32) -> Self {
		Self { op, code }
	}

	/// Generic failure for `op`.
	pub const fn fail(op: HostOp) -> Self {
		Self::new(op, Self::E_FAIL)
	}
}

/// Result of a host operation.
pub type HostResult<T> = Result<T, HostError>;
