use crate::node::Node;
use std::fmt::{self, Write};

/// Format tag written into golden fixture headers.
pub const SNAPSHOT_FORMAT: &str = "ir-tree-v1";

/// Deterministic line-per-node rendering of an IR tree.
///
/// One node per line, two spaces of indent per depth:
/// - `#document`, `#method Name`
/// - `<name>` for elements, children below
/// - `@name` for attributes, value parts below
/// - `"text"` for text, escaped
/// - `{label payload}` for foreign nodes, children below
/// - `#markup "buffer"` for unconsumed markup
#[derive(Debug)]
pub struct IrSnapshot {
    lines: Vec<String>,
}

impl IrSnapshot {
    pub fn new(root: &Node) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for IrSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn walk_snapshot(node: &Node, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth * INDENT_STEP);
    write_node_line(&mut line, node);
    out.push(line);
    if let Some(children) = node.children() {
        for child in children {
            walk_snapshot(child, depth + 1, out);
        }
    }
}

fn write_node_line(out: &mut String, node: &Node) {
    match node {
        Node::Document { .. } => out.push_str("#document"),
        Node::Method { name, .. } => {
            let _ = write!(out, "#method {name}");
        }
        Node::Markup { tokens } => {
            out.push_str("#markup \"");
            write_escaped(out, &tokens.concat());
            out.push('"');
        }
        Node::Element { name, .. } => {
            let _ = write!(out, "<{name}>");
        }
        Node::Attribute { name, .. } => {
            let _ = write!(out, "@{name}");
        }
        Node::Text { text } => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
        Node::Foreign { label, payload, .. } => {
            out.push('{');
            out.push_str(label);
            if !payload.is_empty() {
                out.push(' ');
                write_escaped(out, payload);
            }
            out.push('}');
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attribute_node;

    #[test]
    fn renders_each_node_kind_on_its_own_line() {
        let tree = Node::document(vec![Node::method(
            "Render",
            vec![
                Node::element(
                    "p",
                    vec![
                        attribute_node("class", Some("a".to_string())),
                        Node::text("say \"hi\"\n"),
                        Node::foreign("expr", "Name"),
                    ],
                ),
                Node::markup("<b>"),
            ],
        )]);
        let expected = [
            "#document",
            "  #method Render",
            "    <p>",
            "      @class",
            "        \"a\"",
            "      \"say \\\"hi\\\"\\n\"",
            "      {expr Name}",
            "    #markup \"<b>\"",
        ];
        assert_eq!(IrSnapshot::new(&tree).as_lines(), expected);
    }

    #[test]
    fn foreign_without_payload_omits_the_space() {
        let snapshot = IrSnapshot::new(&Node::foreign("else", ""));
        assert_eq!(snapshot.render(), "{else}");
    }

    #[test]
    fn display_matches_render() {
        let tree = Node::method("M", vec![Node::text("x")]);
        let snapshot = IrSnapshot::new(&tree);
        assert_eq!(snapshot.to_string(), snapshot.render());
        assert_eq!(snapshot.render(), "#method M\n  \"x\"");
    }
}
