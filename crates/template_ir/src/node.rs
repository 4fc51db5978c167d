//! Template IR node model.
//!
//! Every container node exclusively owns its ordered child list. The rewrite
//! pass only ever replaces child lists wholesale; nodes are never shared.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Node {
    /// Root of one template.
    Document {
        #[cfg_attr(feature = "serde", serde(default))]
        children: Vec<Node>,
    },
    /// Generated-method boundary; the top level for whitespace policy.
    Method {
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        children: Vec<Node>,
    },
    /// Raw markup not yet structured. Its tokens are concatenated into one
    /// buffer before tokenizing; the rewrite pass consumes every instance.
    Markup { tokens: Vec<String> },
    Element {
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        children: Vec<Node>,
    },
    Attribute { name: String, value: AttributeValue },
    Text { text: String },
    /// Any node the rewrite pass does not own (expressions, control flow,
    /// ...). Carried through verbatim; only its children are walked.
    Foreign {
        label: String,
        #[cfg_attr(feature = "serde", serde(default))]
        payload: String,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Vec::is_empty")
        )]
        children: Vec<Node>,
    },
}

/// The single value owned by an attribute node. Parts are literal `Text`
/// leaves or foreign expression nodes, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeValue {
    pub parts: Vec<Node>,
}

impl AttributeValue {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Node::text(text)],
        }
    }
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document { children }
    }

    pub fn method(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Method {
            name: name.into(),
            children,
        }
    }

    pub fn markup(text: impl Into<String>) -> Self {
        Node::Markup {
            tokens: vec![text.into()],
        }
    }

    pub fn element(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            name: name.into(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn foreign(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Node::Foreign {
            label: label.into(),
            payload: payload.into(),
            children: Vec::new(),
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Node::Markup { .. })
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    /// Ordered children, for every node kind that has them. Attribute value
    /// parts count as the attribute's children.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children }
            | Node::Method { children, .. }
            | Node::Element { children, .. }
            | Node::Foreign { children, .. } => Some(children),
            Node::Attribute { value, .. } => Some(&value.parts),
            Node::Markup { .. } | Node::Text { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children }
            | Node::Method { children, .. }
            | Node::Element { children, .. }
            | Node::Foreign { children, .. } => Some(children),
            Node::Attribute { value, .. } => Some(&mut value.parts),
            Node::Markup { .. } | Node::Text { .. } => None,
        }
    }

    /// Concatenation of a markup node's literal tokens.
    pub fn markup_buffer(&self) -> Option<String> {
        match self {
            Node::Markup { tokens } => Some(tokens.concat()),
            _ => None,
        }
    }

    /// True if this node or any descendant is still unstructured markup.
    pub fn contains_markup(&self) -> bool {
        self.is_markup()
            || self
                .children()
                .is_some_and(|children| children.iter().any(Node::contains_markup))
    }
}
