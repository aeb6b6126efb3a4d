use std::sync::Arc;

use navbar_primitives::{BufferSnapshot, ParseCompletion, SyntaxTree};
use tokio::sync::mpsc;

/// Grammar seam: turns buffer text into an outline tree.
///
/// Implementations run on the blocking pool and must not assume any
/// particular thread.
pub trait OutlineParser: Send + Sync {
	fn parse(&self, snapshot: &BufferSnapshot) -> SyntaxTree;
}

impl<F> OutlineParser for F
where
	F: Fn(&BufferSnapshot) -> SyntaxTree + Send + Sync,
{
	fn parse(&self, snapshot: &BufferSnapshot) -> SyntaxTree {
		self(snapshot)
	}
}

/// Incremental tokenizer bound to one buffer.
pub trait Tokenizer: Send + Sync {
	/// Parses `snapshot` on the calling thread.
	///
	/// Only used where a tree is needed before the first background parse
	/// can complete.
	fn parse_blocking(&self, snapshot: &BufferSnapshot) -> Arc<SyntaxTree>;

	/// Schedules a background parse. Pending requests are coalesced:
	/// only the newest snapshot is guaranteed to be parsed.
	fn request_parse(&self, snapshot: BufferSnapshot);

	/// Registers a new completion listener.
	///
	/// Each listener receives every parse completed after registration, in
	/// completion order. Dropping the receiver unregisters it.
	fn subscribe(&self) -> CompletionReceiver;
}

/// Listener end of a tokenizer's completion channel.
#[derive(Debug)]
pub struct CompletionReceiver {
	rx: mpsc::UnboundedReceiver<ParseCompletion>,
}

impl CompletionReceiver {
	/// Creates a connected sender/receiver pair.
	pub fn channel() -> (mpsc::UnboundedSender<ParseCompletion>, Self) {
		let (tx, rx) = mpsc::unbounded_channel();
		(tx, Self { rx })
	}

	/// Returns the next queued completion without waiting.
	pub fn try_next(&mut self) -> Option<ParseCompletion> {
		self.rx.try_recv().ok()
	}

	/// Waits for the next completion. `None` once the tokenizer is gone.
	pub async fn next(&mut self) -> Option<ParseCompletion> {
		self.rx.recv().await
	}
}
