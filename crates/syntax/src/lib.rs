//! Tokenizer binding for navigation bars.
//!
//! A [`Tokenizer`] parses a buffer into an outline [`SyntaxTree`] and reports
//! every completed background parse over a [`CompletionReceiver`]. The
//! grammar itself is supplied through [`OutlineParser`]; this crate only
//! schedules parses and delivers their results in completion order.
//!
//! [`SyntaxTree`]: navbar_primitives::SyntaxTree

mod provider;
mod service;
mod tokenizer;

pub use provider::{BufferSource, BufferTokenizerProvider, InstalledTokenizer, ResolveError, TokenizerProvider};
pub use service::TokenizationService;
pub use tokenizer::{CompletionReceiver, OutlineParser, Tokenizer};
