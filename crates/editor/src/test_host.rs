//! Scripted host, tokenizer, and navigation bar doubles for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use navbar_config::NavigationOptions;
use navbar_primitives::{
	BarSlotId, BufferSnapshot, HostError, HostOp, HostResult, OutlineKind, OutlineNode, ParseCompletion, PropertyBag, SyntaxTree,
	ViewId, WindowId,
};
use navbar_syntax::{BufferSource, CompletionReceiver, ResolveError, Tokenizer, TokenizerProvider};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::context::NavigationContext;
use crate::controller::{ControllerHandle, WindowController};
use crate::error::{ControllerError, MaintenanceError};
use crate::host::{CodeWindow, DropdownBarManager, InputFilters, NavigationBarClient, NavigationBarFactory, TextView, WindowParts};
use crate::idle::{IdleCallback, IdleHost, IdleSource, SubscriptionId};

pub(crate) struct MockBuffer {
	version: AtomicU64,
	text: Mutex<String>,
	pub(crate) props: PropertyBag,
}

impl MockBuffer {
	fn new(text: &str) -> Self {
		Self {
			version: AtomicU64::new(1),
			text: Mutex::new(text.to_string()),
			props: PropertyBag::new(),
		}
	}

	/// Replaces the text and bumps the version, returning the new version.
	pub(crate) fn set_text(&self, text: &str) -> u64 {
		*self.text.lock() = text.to_string();
		self.version.fetch_add(1, Ordering::SeqCst) + 1
	}

	pub(crate) fn version(&self) -> u64 {
		self.version.load(Ordering::SeqCst)
	}
}

impl BufferSource for MockBuffer {
	fn snapshot(&self) -> BufferSnapshot {
		let text = self.text.lock();
		BufferSnapshot::new(self.version(), text.as_str())
	}

	fn content_type(&self) -> &str {
		"powershell"
	}

	fn properties(&self) -> &PropertyBag {
		&self.props
	}
}

struct MockView {
	window: WindowId,
	buffer: Arc<MockBuffer>,
}

impl TextView for MockView {
	fn window_id(&self) -> WindowId {
		self.window
	}

	fn view_id(&self) -> ViewId {
		ViewId(self.window.0 * 10)
	}

	fn buffer(&self) -> Arc<dyn BufferSource> {
		self.buffer.clone()
	}
}

/// Host calls observed by [`MockShell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostCall {
	GetBar,
	RemoveBar,
	AddBar(i32),
}

/// Code window shell with a single dropdown bar slot.
///
/// `add_bar` fails when the slot is occupied, so a stacked bar shows up as
/// a host failure.
#[derive(Default)]
pub(crate) struct MockShell {
	window: u64,
	calls: Mutex<Vec<HostCall>>,
	bar: Mutex<Option<Arc<dyn NavigationBarClient>>>,
	pub(crate) fail_add: AtomicBool,
	pub(crate) fail_remove: AtomicBool,
	pub(crate) fail_views: AtomicBool,
	pub(crate) fail_slot_query: AtomicBool,
	pub(crate) split: AtomicBool,
}

impl MockShell {
	pub(crate) fn calls(&self) -> Vec<HostCall> {
		self.calls.lock().clone()
	}

	pub(crate) fn clear_calls(&self) {
		self.calls.lock().clear();
	}

	pub(crate) fn has_bar(&self) -> bool {
		self.bar.lock().is_some()
	}

	pub(crate) fn installed(&self) -> Option<Arc<dyn NavigationBarClient>> {
		self.bar.lock().clone()
	}

	/// Occupies the slot with a bar the controller did not create.
	pub(crate) fn install_foreign_bar(&self) -> Arc<MockClient> {
		let client = Arc::new(MockClient::new(usize::MAX, Arc::new(SyntaxTree::empty(0, 0))));
		*self.bar.lock() = Some(client.clone());
		client
	}
}

impl CodeWindow for MockShell {
	fn primary_view(&self) -> HostResult<ViewId> {
		if self.fail_views.load(Ordering::SeqCst) {
			return Err(HostError::fail(HostOp::PrimaryView));
		}
		Ok(ViewId(self.window * 10))
	}

	fn secondary_view(&self) -> HostResult<ViewId> {
		if self.split.load(Ordering::SeqCst) {
			Ok(ViewId(self.window * 10 + 1))
		} else {
			Err(HostError::new(HostOp::SecondaryView, HostError::E_NOT_FOUND))
		}
	}
}

impl DropdownBarManager for MockShell {
	fn bar_slot(&self) -> HostResult<Option<BarSlotId>> {
		self.calls.lock().push(HostCall::GetBar);
		if self.fail_slot_query.load(Ordering::SeqCst) {
			return Err(HostError::fail(HostOp::GetBar));
		}
		Ok(self.bar.lock().as_ref().map(|_| BarSlotId(self.window)))
	}

	fn remove_bar(&self) -> HostResult<()> {
		self.calls.lock().push(HostCall::RemoveBar);
		if self.fail_remove.load(Ordering::SeqCst) {
			return Err(HostError::fail(HostOp::RemoveBar));
		}
		*self.bar.lock() = None;
		Ok(())
	}

	fn add_bar(&self, priority: i32, client: Arc<dyn NavigationBarClient>) -> HostResult<()> {
		self.calls.lock().push(HostCall::AddBar(priority));
		let mut bar = self.bar.lock();
		if self.fail_add.load(Ordering::SeqCst) || bar.is_some() {
			return Err(HostError::fail(HostOp::AddBar));
		}
		*bar = Some(client);
		Ok(())
	}
}

pub(crate) struct MockClient {
	pub(crate) id: usize,
	pub(crate) initial: Arc<SyntaxTree>,
	pub(crate) updates: Mutex<Vec<Arc<SyntaxTree>>>,
	pub(crate) unregistered: AtomicUsize,
}

impl MockClient {
	fn new(id: usize, initial: Arc<SyntaxTree>) -> Self {
		Self {
			id,
			initial,
			updates: Mutex::new(Vec::new()),
			unregistered: AtomicUsize::new(0),
		}
	}

	pub(crate) fn update_versions(&self) -> Vec<u64> {
		self.updates.lock().iter().map(|t| t.source_version).collect()
	}

	pub(crate) fn is_unregistered(&self) -> bool {
		self.unregistered.load(Ordering::SeqCst) > 0
	}
}

impl NavigationBarClient for MockClient {
	fn update(&self, tree: Arc<SyntaxTree>) {
		self.updates.lock().push(tree);
	}

	fn unregister(&self) {
		self.unregistered.fetch_add(1, Ordering::SeqCst);
	}
}

#[derive(Default)]
pub(crate) struct MockFactory {
	created: Mutex<Vec<Arc<MockClient>>>,
}

impl MockFactory {
	pub(crate) fn created(&self) -> Vec<Arc<MockClient>> {
		self.created.lock().clone()
	}

	pub(crate) fn last(&self) -> Arc<MockClient> {
		self.created.lock().last().cloned().expect("no client created")
	}

	/// Clients created and not yet unregistered.
	pub(crate) fn live(&self) -> usize {
		self.created.lock().iter().filter(|c| !c.is_unregistered()).count()
	}
}

impl NavigationBarFactory for MockFactory {
	fn create(&self, _window: WindowId, tree: Arc<SyntaxTree>) -> Arc<dyn NavigationBarClient> {
		let mut created = self.created.lock();
		let client = Arc::new(MockClient::new(created.len(), tree));
		created.push(client.clone());
		client
	}
}

#[derive(Default)]
pub(crate) struct MockFilters {
	pub(crate) keyboard: Mutex<Vec<ViewId>>,
	pub(crate) view: Mutex<Vec<ViewId>>,
	pub(crate) fail_attach: AtomicBool,
	pub(crate) idle_runs: AtomicUsize,
	pub(crate) fail_idle: AtomicBool,
	pub(crate) panic_idle: AtomicBool,
}

impl MockFilters {
	pub(crate) fn idle_runs(&self) -> usize {
		self.idle_runs.load(Ordering::SeqCst)
	}
}

impl InputFilters for MockFilters {
	fn attach_keyboard_filter(&self, view: ViewId) -> HostResult<()> {
		if self.fail_attach.load(Ordering::SeqCst) {
			return Err(HostError::fail(HostOp::AttachFilter));
		}
		self.keyboard.lock().push(view);
		Ok(())
	}

	fn attach_view_filter(&self, view: ViewId) -> HostResult<()> {
		self.view.lock().push(view);
		Ok(())
	}

	fn on_idle(&self, _idle: &dyn IdleSource) -> Result<(), MaintenanceError> {
		self.idle_runs.fetch_add(1, Ordering::SeqCst);
		if self.panic_idle.load(Ordering::SeqCst) {
			panic!("filter idle exploded");
		}
		if self.fail_idle.load(Ordering::SeqCst) {
			return Err(HostError::fail(HostOp::Idle).into());
		}
		Ok(())
	}
}

/// Tokenizer whose background completions are raised by the test.
#[derive(Default)]
pub(crate) struct ScriptedTokenizer {
	subscribers: Mutex<Vec<UnboundedSender<ParseCompletion>>>,
	pub(crate) blocking_parses: AtomicUsize,
	pub(crate) requests: Mutex<Vec<u64>>,
}

impl ScriptedTokenizer {
	/// Publishes a completed parse of `version` to every listener.
	pub(crate) fn complete(&self, version: u64) -> Arc<SyntaxTree> {
		let tree = Arc::new(SyntaxTree::new(version, OutlineNode::new(OutlineKind::Root, format!("v{version}"), 0..0)));
		let completion = ParseCompletion::new(tree.clone());
		self.subscribers.lock().retain(|tx| tx.send(completion.clone()).is_ok());
		tree
	}

	pub(crate) fn listeners(&self) -> usize {
		self.subscribers.lock().iter().filter(|tx| !tx.is_closed()).count()
	}
}

impl Tokenizer for ScriptedTokenizer {
	fn parse_blocking(&self, snapshot: &BufferSnapshot) -> Arc<SyntaxTree> {
		self.blocking_parses.fetch_add(1, Ordering::SeqCst);
		let root = OutlineNode::new(OutlineKind::Root, snapshot.full_text(), 0..snapshot.len_bytes());
		Arc::new(SyntaxTree::new(snapshot.version, root))
	}

	fn request_parse(&self, snapshot: BufferSnapshot) {
		self.requests.lock().push(snapshot.version);
	}

	fn subscribe(&self) -> CompletionReceiver {
		let (tx, rx) = CompletionReceiver::channel();
		self.subscribers.lock().push(tx);
		rx
	}
}

struct FixedProvider(Option<Arc<dyn Tokenizer>>);

impl TokenizerProvider for FixedProvider {
	fn resolve_or_create(&self, buffer: &dyn BufferSource) -> Result<Arc<dyn Tokenizer>, ResolveError> {
		self.0.clone().ok_or_else(|| ResolveError::Missing {
			content_type: buffer.content_type().to_string(),
		})
	}
}

/// One window's worth of host doubles.
pub(crate) struct Fixture {
	pub(crate) window: WindowId,
	pub(crate) buffer: Arc<MockBuffer>,
	pub(crate) shell: Arc<MockShell>,
	pub(crate) factory: Arc<MockFactory>,
	pub(crate) filters: Arc<MockFilters>,
	pub(crate) tokenizer: Arc<ScriptedTokenizer>,
	resolvable: bool,
}

impl Fixture {
	pub(crate) fn new() -> Self {
		let window = WindowId::next();
		Self {
			window,
			buffer: Arc::new(MockBuffer::new("function Get-Thing {}\n")),
			shell: Arc::new(MockShell {
				window: window.0,
				..Default::default()
			}),
			factory: Arc::default(),
			filters: Arc::default(),
			tokenizer: Arc::default(),
			resolvable: true,
		}
	}

	/// Builder: the tokenizer provider fails for this window.
	pub(crate) fn without_tokenizer(mut self) -> Self {
		self.resolvable = false;
		self
	}

	pub(crate) fn context(enabled: bool) -> NavigationContext {
		let mut options = NavigationOptions::default();
		options.navigation.enabled = enabled;
		NavigationContext::new(options)
	}

	pub(crate) fn parts(&self) -> WindowParts {
		let tokenizer: Option<Arc<dyn Tokenizer>> = self.resolvable.then(|| self.tokenizer.clone() as Arc<dyn Tokenizer>);
		WindowParts {
			view: Arc::new(MockView {
				window: self.window,
				buffer: self.buffer.clone(),
			}),
			code_window: self.shell.clone(),
			bars: self.shell.clone(),
			factory: self.factory.clone(),
			filters: self.filters.clone(),
			tokenizers: Arc::new(FixedProvider(tokenizer)),
		}
	}

	pub(crate) fn try_build(&self, ctx: &NavigationContext) -> Result<ControllerHandle, ControllerError> {
		WindowController::new(self.parts(), ctx.clone())
	}

	pub(crate) fn build(&self, ctx: &NavigationContext) -> ControllerHandle {
		self.try_build(ctx).expect("controller should build")
	}
}

/// Idle source that allows a fixed number of continue checks.
pub(crate) struct ContinueFor(AtomicUsize);

impl ContinueFor {
	pub(crate) fn new(checks: usize) -> Self {
		Self(AtomicUsize::new(checks))
	}
}

impl IdleSource for ContinueFor {
	fn should_continue(&self) -> bool {
		self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok()
	}
}

pub(crate) struct AlwaysContinue;

impl IdleSource for AlwaysContinue {
	fn should_continue(&self) -> bool {
		true
	}
}

#[derive(Default)]
pub(crate) struct MockIdleHost {
	next: AtomicU64,
	callbacks: Mutex<Vec<(SubscriptionId, IdleCallback)>>,
}

impl MockIdleHost {
	/// Raises one idle tick on every subscriber.
	pub(crate) fn tick(&self, idle: &dyn IdleSource) {
		for (_, callback) in self.callbacks.lock().iter() {
			callback(idle);
		}
	}

	pub(crate) fn subscribers(&self) -> usize {
		self.callbacks.lock().len()
	}
}

impl IdleHost for MockIdleHost {
	fn subscribe(&self, callback: IdleCallback) -> SubscriptionId {
		let id = SubscriptionId(self.next.fetch_add(1, Ordering::SeqCst));
		self.callbacks.lock().push((id, callback));
		id
	}

	fn unsubscribe(&self, id: SubscriptionId) {
		self.callbacks.lock().retain(|(sub, _)| *sub != id);
	}
}
