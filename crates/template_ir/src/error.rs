//! Fatal rewrite failures. Any of these aborts the pass for the whole
//! template; a partially rebuilt tree is never handed to codegen.

use markup::TokenKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// An end tag with no open element, or one naming a different element
    /// than the innermost open one.
    #[error("end tag </{found}> does not close {}", open_label(.expected))]
    UnbalancedClose {
        expected: Option<String>,
        found: String,
    },
    /// A structured attribute child arrived while no element was open.
    #[error("attribute `{name}` appears outside of an element")]
    AttributeOutsideElement { name: String },
    /// Content ended with elements still open.
    #[error("unclosed element(s) at end of content: {}", .open.join(", "))]
    UnbalancedTree { open: Vec<String> },
    /// The tokenizer reported something the rewrite pass cannot place.
    #[error("unsupported {kind} token in markup")]
    UnsupportedToken { kind: TokenKind },
}

impl RewriteError {
    /// Stable snake_case name of the failure, used by golden fixtures.
    pub fn kind(&self) -> &'static str {
        match self {
            RewriteError::UnbalancedClose { .. } => "unbalanced_close",
            RewriteError::AttributeOutsideElement { .. } => "attribute_outside_element",
            RewriteError::UnbalancedTree { .. } => "unbalanced_tree",
            RewriteError::UnsupportedToken { .. } => "unsupported_token",
        }
    }
}

fn open_label(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!("open element <{name}>"),
        None => "any open element".to_string(),
    }
}
