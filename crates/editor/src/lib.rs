#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Navigation-bar synchronization for editor windows.
//!
//! One [`WindowController`] per editor window binds the window's buffer to a
//! tokenizer and forwards every completed parse to the navigation bar
//! currently attached to that window. A [`NavigationSession`] owns the
//! process-wide pieces: the [`WindowRegistry`] of adorned windows, the global
//! enable flag, and the [`IdleCoordinator`].
//!
//! # Architecture
//!
//! ```text
//! NavigationSession
//! ├── NavigationContext                       // shared by every controller
//! │   ├── registry: WindowRegistry            // WindowId -> ControllerHandle
//! │   ├── enabled: AtomicBool                 // global navigation-bar toggle
//! │   └── options: NavigationOptions
//! └── idle: IdleCoordinator                   // host idle tick -> per-window maintenance
//!
//! WindowController
//! ├── tokenizer: Arc<dyn Tokenizer>           // bound once at construction
//! ├── completions: CompletionReceiver         // drained on the UI context
//! └── client: Option<Arc<dyn NavigationBarClient>>
//! ```
//!
//! All controller methods are expected to run on the host's serialized UI
//! context. Background parses complete elsewhere; their results queue on the
//! completion channel until [`WindowController::drain_parse_completions`]
//! applies them.

/// Shared session state handed to every controller.
pub mod context;
/// Per-window controller and its lifecycle.
pub mod controller;
/// Error types for controller construction, maintenance, and toggling.
pub mod error;
/// Host capability traits consumed by the controller.
pub mod host;
/// Idle-time fan-out across registered windows.
pub mod idle;
/// Registry of adorned windows.
pub mod registry;
/// Session lifecycle and the global navigation-bar toggle.
pub mod session;
#[cfg(test)]
mod test_host;

pub use context::NavigationContext;
pub use controller::{AttachedBar, ControllerHandle, WindowController};
pub use error::{ControllerError, MaintenanceError, ToggleError};
pub use host::{CodeWindow, DropdownBarManager, InputFilters, NavigationBarClient, NavigationBarFactory, TextView, WindowParts};
pub use idle::{IdleCallback, IdleCoordinator, IdleHost, IdleReport, IdleSource, SubscriptionId};
pub use registry::WindowRegistry;
pub use session::NavigationSession;
