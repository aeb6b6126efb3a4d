use std::ops::ControlFlow;
use std::sync::Arc;

use navbar_config::NavigationOptions;

use crate::context::NavigationContext;
use crate::controller::{ControllerHandle, WindowController};
use crate::error::{ControllerError, ToggleError};
use crate::host::WindowParts;
use crate::idle::{IdleCoordinator, IdleHost, IdleReport, IdleSource};
use crate::registry::WindowRegistry;

/// One navigation-bar session: the registry, the global toggle, and the
/// idle subscription. Create one at startup and [`shutdown`](Self::shutdown)
/// it on exit.
pub struct NavigationSession {
	ctx: NavigationContext,
	idle: IdleCoordinator,
}

impl NavigationSession {
	/// Creates the registry and subscribes to the host's idle ticks.
	pub fn start(options: NavigationOptions, idle_host: Arc<dyn IdleHost>) -> Self {
		let ctx = NavigationContext::new(options);
		let idle = IdleCoordinator::install(ctx.registry().clone(), idle_host, &ctx.options().idle);
		tracing::info!(enabled = ctx.is_enabled(), "navbar.session.start");
		Self { ctx, idle }
	}

	pub fn context(&self) -> &NavigationContext {
		&self.ctx
	}

	pub fn registry(&self) -> &WindowRegistry {
		self.ctx.registry()
	}

	/// Builds the controller for a newly opened window.
	pub fn open_window(&self, parts: WindowParts) -> Result<ControllerHandle, ControllerError> {
		WindowController::new(parts, self.ctx.clone())
	}

	pub fn is_navigation_bar_enabled(&self) -> bool {
		self.ctx.is_enabled()
	}

	/// Attaches or detaches the navigation bar on every registered window.
	///
	/// Every window is attempted even when some fail; the failures are
	/// returned together.
	pub fn set_navigation_bar_enabled(&self, enabled: bool) -> Result<(), ToggleError> {
		self.ctx.set_enabled(enabled);
		let mut failures = Vec::new();
		let visited = self.registry().for_each(|handle| {
			let mut ctl = handle.lock();
			let status = if enabled { ctl.attach_ui() } else { ctl.detach_ui() };
			if let Err(error) = status {
				tracing::warn!(window = %handle.window_id(), enabled, %error, "navbar.toggle.failed");
				failures.push((handle.window_id(), error));
			}
			ControlFlow::Continue(())
		});
		tracing::info!(enabled, windows = visited, failed = failures.len(), "navbar.toggle");

		if failures.is_empty() {
			Ok(())
		} else {
			Err(ToggleError { enabled, failures })
		}
	}

	/// Applies queued parse completions for every registered window.
	///
	/// Returns the number of trees forwarded to navigation bars.
	pub fn dispatch_completions(&self) -> usize {
		let mut forwarded = 0;
		self.registry().for_each(|handle| {
			forwarded += handle.lock().drain_parse_completions();
			ControlFlow::Continue(())
		});
		forwarded
	}

	/// Runs one idle tick without waiting for the host.
	pub fn on_idle(&self, idle: &dyn IdleSource) -> IdleReport {
		self.idle.on_idle(idle)
	}

	/// Tears down every window's adornments and the idle subscription.
	///
	/// Returns the number of windows torn down. Host failures are logged;
	/// teardown always completes. Dropping the session does the same.
	pub fn shutdown(mut self) -> usize {
		self.teardown()
	}

	fn teardown(&mut self) -> usize {
		let handles = self.registry().drain();
		for handle in &handles {
			if let Err(error) = handle.lock().detach_ui() {
				tracing::warn!(window = %handle.window_id(), %error, "navbar.shutdown.detach_failed");
			}
		}
		self.idle.uninstall();
		tracing::info!(windows = handles.len(), "navbar.session.shutdown");
		handles.len()
	}
}

impl Drop for NavigationSession {
	fn drop(&mut self) {
		// Registered handles point back at the context; draining breaks the cycle.
		if self.idle.is_installed() {
			self.teardown();
		}
	}
}
