//! Template IR and the markup rewrite pass.
//!
//! A template front end lowers literal markup into opaque [`Node::Markup`]
//! runs interleaved with expression and control-flow nodes it owns. The
//! rewrite pass tokenizes those runs and rebuilds the real element structure
//! (elements, attributes, text) while keeping every foreign node in its
//! source position, so code generation sees a properly nested tree.

mod attribute;
mod builder;
mod config;
mod error;
mod node;
pub mod snapshot;
mod stats;
mod walk;

pub use crate::attribute::attribute_node;
pub use crate::builder::{TreeBuilder, rebuild_children};
pub use crate::config::{RewriteConfig, RootWhitespace};
pub use crate::error::RewriteError;
pub use crate::node::{AttributeValue, Node};
pub use crate::snapshot::{IrSnapshot, SNAPSHOT_FORMAT};
pub use crate::stats::RewriteStats;
pub use crate::walk::{RewritePass, rewrite_document};
