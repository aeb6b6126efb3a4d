//! Per-window navigation-bar controller.
//!
//! Lifecycle:
//! - created when the host opens a window; binds the buffer's tokenizer once
//! - `add_adornments` registers the window and attaches the bar (if enabled)
//! - `attach_ui` / `detach_ui` may cycle any number of times (global toggle)
//! - `remove_adornments` detaches and unregisters; the handle is then dropped
//!
//! A registered window without an attached bar is a stable state: it stays
//! in the registry so a later global enable can attach it again.

use std::sync::Arc;

use navbar_primitives::{HostResult, ParseCompletion, ViewId, WindowId};
use navbar_syntax::{BufferSource, CompletionReceiver, Tokenizer};
use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;

use crate::context::NavigationContext;
use crate::error::{ControllerError, MaintenanceError};
use crate::host::{CodeWindow, DropdownBarManager, InputFilters, NavigationBarClient, NavigationBarFactory, TextView, WindowParts};
use crate::idle::IdleSource;

/// Buffer property referencing the navigation bar attached to the buffer's window.
#[derive(Clone)]
pub struct AttachedBar(pub Arc<dyn NavigationBarClient>);

/// Navigation-bar state of one editor window.
pub struct WindowController {
	window: WindowId,
	buffer: Arc<dyn BufferSource>,
	code_window: Arc<dyn CodeWindow>,
	bars: Arc<dyn DropdownBarManager>,
	factory: Arc<dyn NavigationBarFactory>,
	filters: Arc<dyn InputFilters>,
	tokenizer: Arc<dyn Tokenizer>,
	completions: CompletionReceiver,
	client: Option<Arc<dyn NavigationBarClient>>,
	/// Buffer version of the tree the attached client currently shows.
	///
	/// Completions older than this are stale and never reach the client.
	shown_version: Option<u64>,
	views: SmallVec<[ViewId; 2]>,
	priority: i32,
}

impl WindowController {
	/// Builds the controller for `parts.view`.
	///
	/// Resolves the buffer's tokenizer, attaches the input filters, and
	/// subscribes to parse completions. Nothing is registered yet; call
	/// [`ControllerHandle::add_adornments`] for that.
	pub fn new(parts: WindowParts, ctx: NavigationContext) -> Result<ControllerHandle, ControllerError> {
		let window = parts.view.window_id();
		let buffer = parts.view.buffer();

		let tokenizer = parts.tokenizers.resolve_or_create(buffer.as_ref()).map_err(|source| {
			tracing::error!(%window, content_type = buffer.content_type(), error = %source, "navbar.tokenizer_unavailable");
			ControllerError::TokenizerUnavailable { window, source }
		})?;

		let view = parts.view.view_id();
		parts.filters.attach_keyboard_filter(view)?;
		parts.filters.attach_view_filter(view)?;

		let completions = tokenizer.subscribe();
		tracing::debug!(%window, ?view, "navbar.controller.created");

		let controller = Self {
			window,
			buffer,
			code_window: parts.code_window,
			bars: parts.bars,
			factory: parts.factory,
			filters: parts.filters,
			tokenizer,
			completions,
			client: None,
			shown_version: None,
			views: SmallVec::new(),
			priority: ctx.bar_priority(),
		};
		Ok(ControllerHandle {
			window,
			ctx,
			inner: Arc::new(Mutex::new(controller)),
		})
	}

	pub fn window_id(&self) -> WindowId {
		self.window
	}

	pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
		&self.tokenizer
	}

	/// Whether a navigation bar client is currently attached.
	pub fn is_attached(&self) -> bool {
		self.client.is_some()
	}

	pub fn client(&self) -> Option<&Arc<dyn NavigationBarClient>> {
		self.client.as_ref()
	}

	/// Views reported by the code window when adornments were added.
	pub fn views(&self) -> &[ViewId] {
		&self.views
	}

	/// Records a view of this window.
	pub fn on_new_view(&mut self, view: ViewId) {
		if !self.views.contains(&view) {
			self.views.push(view);
		}
	}

	/// Installs a fresh navigation bar built from the current buffer text.
	///
	/// Any attached client is detached first, so repeated calls never stack
	/// clients. The new client is only recorded once the host accepted it;
	/// on failure nothing stays attached and the host status is returned.
	pub fn attach_ui(&mut self) -> HostResult<()> {
		if self.client.is_some()
			&& let Err(error) = self.detach_ui()
		{
			tracing::debug!(window = %self.window, %error, "navbar.attach.stale_bar_remove_failed");
		}

		if let Ok(Some(slot)) = self.bars.bar_slot() {
			self.bars.remove_bar().inspect_err(|error| {
				tracing::warn!(window = %self.window, ?slot, %error, "navbar.attach.remove_existing_failed");
			})?;
		}

		let snapshot = self.buffer.snapshot();
		let tree = self.tokenizer.parse_blocking(&snapshot);
		let client = self.factory.create(self.window, tree);

		if let Err(error) = self.bars.add_bar(self.priority, client.clone()) {
			client.unregister();
			tracing::warn!(window = %self.window, %error, "navbar.attach.failed");
			return Err(error);
		}

		self.buffer.properties().insert(AttachedBar(client.clone()));
		self.client = Some(client);
		self.shown_version = Some(snapshot.version);
		tracing::debug!(window = %self.window, version = snapshot.version, "navbar.attach");
		Ok(())
	}

	/// Removes the attached navigation bar, if any.
	///
	/// Controller state is cleared before the host removal, so a failed
	/// removal still leaves the controller ready for a clean re-attach.
	pub fn detach_ui(&mut self) -> HostResult<()> {
		let Some(client) = self.client.take() else {
			return Ok(());
		};
		client.unregister();
		self.shown_version = None;
		self.buffer.properties().remove::<AttachedBar>();
		tracing::debug!(window = %self.window, "navbar.detach");
		self.bars.remove_bar()
	}

	/// Forwards a completed parse to the attached client.
	///
	/// Returns whether the tree was forwarded. Completions arriving with no
	/// client attached, or older than the tree already shown, are dropped.
	pub fn on_parse_completed(&mut self, completion: ParseCompletion) -> bool {
		let Some(client) = &self.client else {
			tracing::trace!(window = %self.window, version = completion.source_version, "navbar.completion.detached");
			return false;
		};
		if self.shown_version.is_some_and(|shown| completion.source_version < shown) {
			tracing::trace!(
				window = %self.window,
				version = completion.source_version,
				shown = ?self.shown_version,
				"navbar.stale_completion"
			);
			return false;
		}
		self.shown_version = Some(completion.source_version);
		client.update(completion.tree);
		true
	}

	/// Applies every queued parse completion in arrival order.
	///
	/// Returns how many trees reached the client.
	pub fn drain_parse_completions(&mut self) -> usize {
		let mut forwarded = 0;
		while let Some(completion) = self.completions.try_next() {
			if self.on_parse_completed(completion) {
				forwarded += 1;
			}
		}
		forwarded
	}

	/// Schedules a background parse of the current buffer text.
	///
	/// The result arrives later through [`Self::drain_parse_completions`].
	pub fn request_reparse(&self) {
		self.tokenizer.request_parse(self.buffer.snapshot());
	}

	/// Idle-time maintenance hook.
	pub fn run_idle_maintenance(&mut self, idle: &dyn IdleSource) -> Result<(), MaintenanceError> {
		self.filters.on_idle(idle)
	}

	fn record_views(&mut self) {
		if let Ok(view) = self.code_window.primary_view() {
			self.on_new_view(view);
		}
		if let Ok(view) = self.code_window.secondary_view() {
			self.on_new_view(view);
		}
	}
}

/// Shared handle to a [`WindowController`], as stored in the registry.
#[derive(Clone)]
pub struct ControllerHandle {
	window: WindowId,
	ctx: NavigationContext,
	inner: Arc<Mutex<WindowController>>,
}

impl ControllerHandle {
	pub fn window_id(&self) -> WindowId {
		self.window
	}

	pub fn lock(&self) -> MutexGuard<'_, WindowController> {
		self.inner.lock()
	}

	/// Returns true if both handles refer to the same controller.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Inserts this controller into the session registry.
	pub fn register(&self) {
		self.ctx.registry().put(self.window, self.clone());
	}

	/// Removes this controller's registry entry. No-op if absent.
	pub fn unregister(&self) {
		self.ctx.registry().remove(self.window);
	}

	/// Host "add adornments": register, record views, attach the bar when
	/// navigation bars are enabled.
	pub fn add_adornments(&self) -> HostResult<()> {
		self.register();
		let mut ctl = self.lock();
		ctl.record_views();
		if !self.ctx.is_enabled() {
			tracing::debug!(window = %self.window, "navbar.adorn.disabled");
			return Ok(());
		}
		ctl.attach_ui()
	}

	/// Host "remove adornments": unregister and detach the bar.
	pub fn remove_adornments(&self) -> HostResult<()> {
		self.unregister();
		self.lock().detach_ui()
	}
}

impl std::fmt::Debug for ControllerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ControllerHandle").field("window", &self.window).finish_non_exhaustive()
	}
}
