use crate::node::{AttributeValue, Node};

/// Builds the canonical attribute node for a tokenizer-reported pair:
/// one attribute owning one value owning one literal text leaf.
///
/// A value-less attribute (`<input disabled>`) gets an empty literal.
pub fn attribute_node(name: impl Into<String>, value: Option<String>) -> Node {
    Node::Attribute {
        name: name.into(),
        value: AttributeValue::literal(value.unwrap_or_default()),
    }
}
