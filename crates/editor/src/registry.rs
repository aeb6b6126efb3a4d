use std::ops::ControlFlow;
use std::sync::Arc;

use navbar_primitives::WindowId;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::controller::ControllerHandle;

/// Registry of adorned windows, keyed by window identity.
///
/// One registry exists per session. Cloning yields another handle to the
/// same map.
#[derive(Debug, Default, Clone)]
pub struct WindowRegistry {
	inner: Arc<RwLock<FxHashMap<WindowId, ControllerHandle>>>,
}

impl WindowRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a controller, returning the one it replaced.
	pub fn put(&self, id: WindowId, controller: ControllerHandle) -> Option<ControllerHandle> {
		let prev = self.inner.write().insert(id, controller);
		tracing::trace!(window = %id, replaced = prev.is_some(), "navbar.registry.put");
		prev
	}

	/// Removes one entry. Removing an unknown window is a no-op.
	pub fn remove(&self, id: WindowId) -> Option<ControllerHandle> {
		let prev = self.inner.write().remove(&id);
		tracing::trace!(window = %id, found = prev.is_some(), "navbar.registry.remove");
		prev
	}

	pub fn get(&self, id: WindowId) -> Option<ControllerHandle> {
		self.inner.read().get(&id).cloned()
	}

	pub fn contains(&self, id: WindowId) -> bool {
		self.inner.read().contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.inner.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().is_empty()
	}

	/// Returns registered window ids, sorted.
	pub fn window_ids(&self) -> Vec<WindowId> {
		let mut ids: Vec<_> = self.inner.read().keys().copied().collect();
		ids.sort();
		ids
	}

	/// Visits every registered controller until the visitor breaks.
	///
	/// Entries are snapshotted first and the lock is released before any
	/// visit, so visitors may register or unregister windows. Returns the
	/// number of controllers handed to the visitor.
	pub fn for_each<F>(&self, mut visitor: F) -> usize
	where
		F: FnMut(&ControllerHandle) -> ControlFlow<()>,
	{
		let entries: Vec<ControllerHandle> = self.inner.read().values().cloned().collect();
		let mut visited = 0;
		for handle in &entries {
			visited += 1;
			if visitor(handle).is_break() {
				break;
			}
		}
		visited
	}

	/// Removes and returns every entry.
	pub fn drain(&self) -> Vec<ControllerHandle> {
		self.inner.write().drain().map(|(_, handle)| handle).collect()
	}
}
