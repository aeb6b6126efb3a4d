//! Idle-time fan-out across registered windows.
//!
//! The host raises idle ticks when it has spare time. Each tick visits the
//! registered controllers one by one, asking the host before every visit
//! whether idle processing may continue. Maintenance is best-effort: a
//! failing or panicking controller is logged and skipped.

use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use navbar_config::IdleSection;

use crate::registry::WindowRegistry;

/// Host query for whether idle work may continue.
pub trait IdleSource {
	fn should_continue(&self) -> bool;
}

/// Callback invoked by the host on every idle tick.
pub type IdleCallback = Box<dyn Fn(&dyn IdleSource) + Send + Sync>;

/// Host-issued idle subscription handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Host source of idle ticks.
pub trait IdleHost: Send + Sync {
	fn subscribe(&self, callback: IdleCallback) -> SubscriptionId;
	fn unsubscribe(&self, id: SubscriptionId);
}

/// Outcome of one idle tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleReport {
	/// Controllers whose maintenance hook ran.
	pub visited: usize,
	/// Visited controllers whose hook failed or panicked.
	pub faulted: usize,
	/// The fan-out ended before every controller was visited.
	pub stopped_early: bool,
}

#[derive(Clone)]
struct IdleFanout {
	registry: WindowRegistry,
	window_cap: Option<usize>,
}

impl IdleFanout {
	fn run(&self, idle: &dyn IdleSource) -> IdleReport {
		let mut report = IdleReport::default();
		self.registry.for_each(|handle| {
			if !idle.should_continue() || self.window_cap.is_some_and(|cap| report.visited >= cap) {
				report.stopped_early = true;
				return ControlFlow::Break(());
			}
			report.visited += 1;

			let window = handle.window_id();
			match catch_unwind(AssertUnwindSafe(|| handle.lock().run_idle_maintenance(idle))) {
				Ok(Ok(())) => {}
				Ok(Err(error)) => {
					report.faulted += 1;
					tracing::warn!(%window, %error, "navbar.idle.fault");
				}
				Err(payload) => {
					report.faulted += 1;
					tracing::warn!(%window, panic = panic_message(payload.as_ref()), "navbar.idle.panic");
				}
			}
			ControlFlow::Continue(())
		});
		tracing::trace!(?report, "navbar.idle.tick");
		report
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		*msg
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.as_str()
	} else {
		"<non-string panic payload>"
	}
}

/// Subscribes the window registry to the host's idle ticks.
///
/// Installed once per session; unsubscribes on [`Self::uninstall`] or drop.
pub struct IdleCoordinator {
	fanout: IdleFanout,
	host: Arc<dyn IdleHost>,
	subscription: Option<SubscriptionId>,
}

impl IdleCoordinator {
	pub fn install(registry: WindowRegistry, host: Arc<dyn IdleHost>, options: &IdleSection) -> Self {
		let fanout = IdleFanout {
			registry,
			window_cap: options.window_cap(),
		};
		let tick = fanout.clone();
		let subscription = host.subscribe(Box::new(move |idle| {
			tick.run(idle);
		}));
		tracing::debug!(?subscription, "navbar.idle.installed");
		Self {
			fanout,
			host,
			subscription: Some(subscription),
		}
	}

	/// Runs one idle tick directly.
	pub fn on_idle(&self, idle: &dyn IdleSource) -> IdleReport {
		self.fanout.run(idle)
	}

	pub fn is_installed(&self) -> bool {
		self.subscription.is_some()
	}

	pub fn uninstall(&mut self) {
		if let Some(id) = self.subscription.take() {
			self.host.unsubscribe(id);
			tracing::debug!(subscription = ?id, "navbar.idle.uninstalled");
		}
	}
}

impl Drop for IdleCoordinator {
	fn drop(&mut self) {
		self.uninstall();
	}
}
