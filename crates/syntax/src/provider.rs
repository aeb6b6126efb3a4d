use std::sync::Arc;

use navbar_primitives::{BufferSnapshot, PropertyBag};
use thiserror::Error;

use crate::service::TokenizationService;
use crate::tokenizer::{OutlineParser, Tokenizer};

/// Host text buffer as seen by the tokenizer binding.
pub trait BufferSource: Send + Sync {
	/// Snapshot of the current buffer contents.
	fn snapshot(&self) -> BufferSnapshot;
	/// Content type name, compared case-insensitively.
	fn content_type(&self) -> &str;
	fn properties(&self) -> &PropertyBag;
}

/// Buffer property holding the tokenizer installed when the buffer was created.
#[derive(Clone)]
pub struct InstalledTokenizer(pub Arc<dyn Tokenizer>);

impl InstalledTokenizer {
	/// Installs `tokenizer` on `properties`, replacing any previous one.
	pub fn install(properties: &PropertyBag, tokenizer: Arc<dyn Tokenizer>) {
		properties.insert(Self(tokenizer));
	}

	pub fn get(properties: &PropertyBag) -> Option<Arc<dyn Tokenizer>> {
		properties.get::<Self>().map(|slot| slot.0.clone())
	}
}

/// Why no tokenizer could be bound to a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	/// A buffer of the tokenizer's own language was created without one.
	#[error("buffer of content type '{content_type}' has no installed tokenizer")]
	Missing { content_type: String },
	/// A foreign buffer needs a new tokenizer but no parser is configured.
	#[error("no parser available to create a tokenizer for content type '{content_type}'")]
	Unavailable { content_type: String },
	/// The background parse runtime could not be started.
	#[error("failed to start a tokenizer for content type '{content_type}': {reason}")]
	Spawn { content_type: String, reason: String },
}

/// Resolves an existing tokenizer for a buffer, or creates one.
pub trait TokenizerProvider: Send + Sync {
	fn resolve_or_create(&self, buffer: &dyn BufferSource) -> Result<Arc<dyn Tokenizer>, ResolveError>;
}

/// Provider following the buffer-property convention.
///
/// Buffers of `language` must already carry an [`InstalledTokenizer`].
/// Any other buffer (for example one embedded in a foreign document) gets a
/// private [`TokenizationService`] built from the configured parser.
pub struct BufferTokenizerProvider {
	language: String,
	parser: Option<Arc<dyn OutlineParser>>,
}

impl BufferTokenizerProvider {
	pub fn new(language: impl Into<String>) -> Self {
		Self {
			language: language.into(),
			parser: None,
		}
	}

	/// Builder: parser used for buffers without an installed tokenizer.
	pub fn with_parser(mut self, parser: Arc<dyn OutlineParser>) -> Self {
		self.parser = Some(parser);
		self
	}

	fn owns(&self, content_type: &str) -> bool {
		content_type.eq_ignore_ascii_case(&self.language)
	}
}

impl TokenizerProvider for BufferTokenizerProvider {
	fn resolve_or_create(&self, buffer: &dyn BufferSource) -> Result<Arc<dyn Tokenizer>, ResolveError> {
		let content_type = buffer.content_type();
		if self.owns(content_type) {
			return InstalledTokenizer::get(buffer.properties()).ok_or_else(|| ResolveError::Missing {
				content_type: content_type.to_string(),
			});
		}

		let parser = self.parser.clone().ok_or_else(|| ResolveError::Unavailable {
			content_type: content_type.to_string(),
		})?;
		tracing::debug!(content_type, "syntax.tokenizer.create");
		let service: Arc<dyn Tokenizer> = TokenizationService::spawn(parser).map_err(|error| ResolveError::Spawn {
			content_type: content_type.to_string(),
			reason: error.to_string(),
		})?;
		Ok(service)
	}
}
