//! Host capabilities.
//!
//! The window shell and its bar manager are separate capabilities even when
//! one host object implements both: the controller receives each one
//! explicitly instead of probing the shell for the second interface.

use std::sync::Arc;

use navbar_primitives::{BarSlotId, HostResult, SyntaxTree, ViewId, WindowId};
use navbar_syntax::{BufferSource, TokenizerProvider};

use crate::error::MaintenanceError;
use crate::idle::IdleSource;

/// Code window shell hosting one or two text views.
pub trait CodeWindow: Send + Sync {
	fn primary_view(&self) -> HostResult<ViewId>;
	/// Fails when the window is not split.
	fn secondary_view(&self) -> HostResult<ViewId>;
}

/// Dropdown bar slot of a code window.
pub trait DropdownBarManager: Send + Sync {
	/// Returns the currently installed bar, if any.
	fn bar_slot(&self) -> HostResult<Option<BarSlotId>>;
	fn remove_bar(&self) -> HostResult<()>;
	fn add_bar(&self, priority: i32, client: Arc<dyn NavigationBarClient>) -> HostResult<()>;
}

/// Navigation bar renderer fed with syntax trees.
pub trait NavigationBarClient: Send + Sync {
	/// Replaces the displayed outline with `tree`.
	fn update(&self, tree: Arc<SyntaxTree>);
	/// Releases host registrations held by the client.
	fn unregister(&self);
}

/// Creates navigation bar clients for a window.
pub trait NavigationBarFactory: Send + Sync {
	fn create(&self, window: WindowId, tree: Arc<SyntaxTree>) -> Arc<dyn NavigationBarClient>;
}

/// Keystroke and view command filters of a text view.
pub trait InputFilters: Send + Sync {
	fn attach_keyboard_filter(&self, view: ViewId) -> HostResult<()>;
	fn attach_view_filter(&self, view: ViewId) -> HostResult<()>;

	/// Low-priority maintenance run on host idle ticks.
	fn on_idle(&self, _idle: &dyn IdleSource) -> Result<(), MaintenanceError> {
		Ok(())
	}
}

/// The editor view a controller is created for.
pub trait TextView: Send + Sync {
	fn window_id(&self) -> WindowId;
	fn view_id(&self) -> ViewId;
	fn buffer(&self) -> Arc<dyn BufferSource>;
}

/// Everything the host supplies to build one window's controller.
pub struct WindowParts {
	pub view: Arc<dyn TextView>,
	pub code_window: Arc<dyn CodeWindow>,
	pub bars: Arc<dyn DropdownBarManager>,
	pub factory: Arc<dyn NavigationBarFactory>,
	pub filters: Arc<dyn InputFilters>,
	pub tokenizers: Arc<dyn TokenizerProvider>,
}
