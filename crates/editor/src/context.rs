use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use navbar_config::NavigationOptions;

use crate::registry::WindowRegistry;

struct ContextInner {
	registry: WindowRegistry,
	enabled: AtomicBool,
	options: NavigationOptions,
}

/// Session-wide state shared by every controller of one session.
#[derive(Clone)]
pub struct NavigationContext {
	inner: Arc<ContextInner>,
}

impl NavigationContext {
	pub fn new(options: NavigationOptions) -> Self {
		Self::with_registry(options, WindowRegistry::new())
	}

	pub fn with_registry(options: NavigationOptions, registry: WindowRegistry) -> Self {
		Self {
			inner: Arc::new(ContextInner {
				registry,
				enabled: AtomicBool::new(options.navigation.enabled),
				options,
			}),
		}
	}

	pub fn registry(&self) -> &WindowRegistry {
		&self.inner.registry
	}

	pub fn options(&self) -> &NavigationOptions {
		&self.inner.options
	}

	/// Whether newly adorned windows get a navigation bar.
	pub fn is_enabled(&self) -> bool {
		self.inner.enabled.load(Ordering::Acquire)
	}

	pub(crate) fn set_enabled(&self, enabled: bool) {
		self.inner.enabled.store(enabled, Ordering::Release);
	}

	pub fn bar_priority(&self) -> i32 {
		self.inner.options.navigation.bar_priority
	}
}

impl std::fmt::Debug for NavigationContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationContext")
			.field("windows", &self.inner.registry.len())
			.field("enabled", &self.is_enabled())
			.finish()
	}
}
