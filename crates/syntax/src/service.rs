//! Background tokenization for one buffer.
//!
//! Goals:
//! - latest wins (a burst of edits parses only the newest snapshot)
//! - single flight (one parse at a time, so completions leave in request order)
//! - panics in the grammar never take the service down

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use navbar_primitives::{BufferSnapshot, ParseCompletion, SyntaxTree};
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::tokenizer::{CompletionReceiver, OutlineParser, Tokenizer};

struct Shared {
	parser: Arc<dyn OutlineParser>,
	subscribers: Mutex<Vec<mpsc::UnboundedSender<ParseCompletion>>>,
	completed: AtomicU64,
}

impl Shared {
	fn parse(parser: &dyn OutlineParser, snapshot: &BufferSnapshot) -> SyntaxTree {
		let mut tree = parser.parse(snapshot);
		tree.source_version = snapshot.version;
		tree
	}

	fn publish(&self, completion: ParseCompletion) {
		let mut subs = self.subscribers.lock();
		subs.retain(|tx| tx.send(completion.clone()).is_ok());
		self.completed.fetch_add(1, Ordering::Relaxed);
		tracing::debug!(
			version = completion.source_version,
			listeners = subs.len(),
			"syntax.parse.completed"
		);
	}
}

/// Tokenizer that parses on the blocking pool and broadcasts completions.
pub struct TokenizationService {
	shared: Arc<Shared>,
	requests: watch::Sender<Option<BufferSnapshot>>,
	cancel: CancellationToken,
}

impl TokenizationService {
	/// Creates the service and starts its parse loop.
	///
	/// The loop runs on the caller's tokio runtime. Outside of one, a shared
	/// single-worker parse runtime is started on first use; failing to start
	/// it is the only error.
	pub fn spawn(parser: Arc<dyn OutlineParser>) -> io::Result<Arc<Self>> {
		let runtime = parse_runtime()?;
		let shared = Arc::new(Shared {
			parser,
			subscribers: Mutex::new(Vec::new()),
			completed: AtomicU64::new(0),
		});
		let (requests, rx) = watch::channel(None);
		let cancel = CancellationToken::new();
		runtime.spawn(run_parse_loop(shared.clone(), rx, cancel.clone()));
		tracing::debug!("syntax.parse_loop.spawn");
		Ok(Arc::new(Self { shared, requests, cancel }))
	}

	/// Number of background parses published so far.
	pub fn completed_count(&self) -> u64 {
		self.shared.completed.load(Ordering::Relaxed)
	}

	/// Number of live completion listeners.
	pub fn listener_count(&self) -> usize {
		let mut subs = self.shared.subscribers.lock();
		subs.retain(|tx| !tx.is_closed());
		subs.len()
	}

	/// Stops the parse loop. In-flight work finishes but is not published.
	pub fn shutdown(&self) {
		self.cancel.cancel();
	}
}

impl Drop for TokenizationService {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

impl Tokenizer for TokenizationService {
	fn parse_blocking(&self, snapshot: &BufferSnapshot) -> Arc<SyntaxTree> {
		Arc::new(Shared::parse(self.shared.parser.as_ref(), snapshot))
	}

	fn request_parse(&self, snapshot: BufferSnapshot) {
		tracing::trace!(version = snapshot.version, "syntax.parse.requested");
		self.requests.send_replace(Some(snapshot));
	}

	fn subscribe(&self) -> CompletionReceiver {
		let (tx, rx) = CompletionReceiver::channel();
		self.shared.subscribers.lock().push(tx);
		rx
	}
}

fn parse_runtime() -> io::Result<Handle> {
	static SHARED: OnceLock<Runtime> = OnceLock::new();

	if let Ok(handle) = Handle::try_current() {
		return Ok(handle);
	}
	if let Some(runtime) = SHARED.get() {
		return Ok(runtime.handle().clone());
	}
	let runtime = Builder::new_multi_thread()
		.worker_threads(1)
		.thread_name("navbar-parse")
		.enable_all()
		.build()?;
	Ok(SHARED.get_or_init(|| runtime).handle().clone())
}

/// Describes why a blocking parse produced no tree.
fn panic_reason(err: JoinError) -> String {
	let Ok(payload) = err.try_into_panic() else {
		return "<cancelled>".to_string();
	};
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"<non-string panic payload>".to_string()
	}
}

async fn run_parse_loop(shared: Arc<Shared>, mut rx: watch::Receiver<Option<BufferSnapshot>>, cancel: CancellationToken) {
	let mut last_version: Option<u64> = None;
	loop {
		tokio::select! {
			_ = cancel.cancelled() => break,
			changed = rx.changed() => {
				if changed.is_err() {
					break;
				}
			}
		}

		let Some(snapshot) = rx.borrow_and_update().clone() else {
			continue;
		};
		if last_version.is_some_and(|v| snapshot.version < v) {
			tracing::trace!(version = snapshot.version, ?last_version, "syntax.parse.skip_older");
			continue;
		}

		let version = snapshot.version;
		let parser = shared.parser.clone();
		let handle = tokio::task::spawn_blocking(move || Shared::parse(parser.as_ref(), &snapshot));
		match handle.await {
			Ok(tree) => {
				if cancel.is_cancelled() {
					break;
				}
				last_version = Some(version);
				shared.publish(ParseCompletion::new(Arc::new(tree)));
			}
			Err(e) => {
				tracing::warn!(version, error = %panic_reason(e), "Background outline parse panicked");
			}
		}
	}
	tracing::debug!("syntax.parse_loop.exit");
}
