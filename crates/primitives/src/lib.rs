//! Core types shared by the navigation-bar crates: identities, buffer and
//! syntax snapshots, host status codes, and typed buffer properties.

/// Host operation status codes.
pub mod host;
/// Identifier types for windows, views, and bar slots.
pub mod ids;
/// Typed per-buffer property collection.
pub mod properties;
/// Immutable buffer text snapshots.
pub mod snapshot;
/// Parse results handed from tokenizers to navigation bars.
pub mod tree;

pub use host::{HostError, HostOp, HostResult};
pub use ids::{BarSlotId, ViewId, WindowId};
pub use properties::PropertyBag;
pub use ropey::Rope;
pub use snapshot::BufferSnapshot;
pub use tree::{OutlineKind, OutlineNode, ParseCompletion, ParseDiagnostic, SyntaxTree};
