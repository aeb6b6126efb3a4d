use navbar_primitives::{HostError, WindowId};
use navbar_syntax::ResolveError;
use thiserror::Error;

/// Failure to build a window controller.
#[derive(Debug, Error)]
pub enum ControllerError {
	/// No tokenizer could be resolved or created for the window's buffer.
	///
	/// Fatal misconfiguration: the window can never produce navigation data.
	#[error("no tokenizer for {window}: {source}")]
	TokenizerUnavailable {
		window: WindowId,
		#[source]
		source: ResolveError,
	},
	/// The host refused to attach an input filter.
	#[error(transparent)]
	Host(#[from] HostError),
}

/// Failure of one window's idle maintenance.
#[derive(Debug, Error)]
pub enum MaintenanceError {
	#[error(transparent)]
	Host(#[from] HostError),
}

/// One or more windows failed to follow a global navigation-bar toggle.
///
/// Every registered window was attempted; `failures` lists those whose host
/// operation failed.
#[derive(Debug, Error)]
#[error(
	"failed to {action} the navigation bar in {count} window(s)",
	action = toggle_action(.enabled),
	count = .failures.len()
)]
pub struct ToggleError {
	pub enabled: bool,
	pub failures: Vec<(WindowId, HostError)>,
}

fn toggle_action(enabled: &bool) -> &'static str {
	if *enabled { "enable" } else { "disable" }
}
