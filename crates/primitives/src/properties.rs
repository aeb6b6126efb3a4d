use std::any::{Any, TypeId};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Typed property collection attached to a text buffer.
///
/// Each value type occupies one slot; inserting a second value of the same
/// type replaces the first. Values are shared, so readers get an `Arc`
/// clone rather than a borrow.
#[derive(Default)]
pub struct PropertyBag {
	slots: RwLock<FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl PropertyBag {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value`, returning the previous value of the same type.
	pub fn insert<T: Any + Send + Sync>(&self, value: T) -> Option<Arc<T>> {
		self.insert_arc(Arc::new(value))
	}

	/// Stores an already shared value.
	pub fn insert_arc<T: Any + Send + Sync>(&self, value: Arc<T>) -> Option<Arc<T>> {
		let prev = self.slots.write().insert(TypeId::of::<T>(), value);
		prev.and_then(|p| p.downcast::<T>().ok())
	}

	pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		let slot = self.slots.read().get(&TypeId::of::<T>()).cloned()?;
		slot.downcast::<T>().ok()
	}

	pub fn remove<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		let prev = self.slots.write().remove(&TypeId::of::<T>())?;
		prev.downcast::<T>().ok()
	}

	pub fn contains<T: Any + Send + Sync>(&self) -> bool {
		self.slots.read().contains_key(&TypeId::of::<T>())
	}

	pub fn len(&self) -> usize {
		self.slots.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.read().is_empty()
	}
}

impl std::fmt::Debug for PropertyBag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PropertyBag").field("len", &self.len()).finish()
	}
}
