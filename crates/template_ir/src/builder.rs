//! Reconstruction engine.
//!
//! Given a node's flat child list (markup runs, structured attributes and
//! foreign nodes), replays the tokenized markup against a stack of insertion
//! points and produces the properly nested child list.
//!
//! Each stack entry owns the children appended to it so far. Popping an
//! element entry turns it into a `Node::Element` and appends it to the entry
//! below. Nothing else is appended to a parent while one of its elements is
//! open, so building children this way yields the same order as appending
//! the element at its start tag.

use markup::{Token, Tokenizer, is_void_element};

use crate::attribute::attribute_node;
use crate::config::{RewriteConfig, RootWhitespace};
use crate::error::RewriteError;
use crate::node::Node;
use crate::stats::RewriteStats;

const LOG_TARGET: &str = "template_ir.rewrite";

/// One entry of the reconstruction stack.
#[derive(Debug)]
struct OpenEntry {
    /// `None` for the rewrite root.
    element: Option<String>,
    children: Vec<Node>,
    /// The element's start tag has not seen its `>` yet; the next markup run
    /// continues it.
    start_tag_open: bool,
    /// The last child is text from the markup run being consumed.
    text_tail: bool,
}

impl OpenEntry {
    fn root() -> Self {
        Self {
            element: None,
            children: Vec::new(),
            start_tag_open: false,
            text_tail: false,
        }
    }

    fn element(name: String) -> Self {
        Self {
            element: Some(name),
            ..Self::root()
        }
    }

    fn push(&mut self, node: Node) {
        self.children.push(node);
        self.text_tail = false;
    }
}

/// Stack machine for one rewrite root.
pub struct TreeBuilder<'c> {
    config: &'c RewriteConfig,
    elide_root_whitespace: bool,
    stack: Vec<OpenEntry>,
}

impl<'c> TreeBuilder<'c> {
    /// `root` is the node whose children are being rebuilt; only its kind is
    /// inspected.
    pub fn new(config: &'c RewriteConfig, root: &Node) -> Self {
        let elide_root_whitespace = match config.root_whitespace {
            RootWhitespace::Elide => true,
            RootWhitespace::MethodScopeOnly => matches!(root, Node::Method { .. }),
            RootWhitespace::Preserve => false,
        };
        Self {
            config,
            elide_root_whitespace,
            stack: vec![OpenEntry::root()],
        }
    }

    /// Consumes the original children left to right, one child per step, and
    /// returns the rebuilt child list of the rewrite root.
    pub fn build(
        mut self,
        original: Vec<Node>,
        stats: &mut RewriteStats,
    ) -> Result<Vec<Node>, RewriteError> {
        for child in original {
            match child {
                Node::Markup { tokens } => self.push_markup(&tokens.concat(), stats)?,
                Node::Attribute { name, value } => {
                    if !self.top_is_element() {
                        log::debug!(target: LOG_TARGET, "attribute `{name}` outside element");
                        return Err(RewriteError::AttributeOutsideElement { name });
                    }
                    self.top_mut().push(Node::Attribute { name, value });
                }
                other => self.top_mut().push(other),
            }
        }
        self.finish()
    }

    fn top(&self) -> &OpenEntry {
        let last = self.stack.len() - 1;
        &self.stack[last]
    }

    fn top_mut(&mut self) -> &mut OpenEntry {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn top_is_element(&self) -> bool {
        self.top().element.is_some()
    }

    fn push_markup(&mut self, buffer: &str, stats: &mut RewriteStats) -> Result<(), RewriteError> {
        stats.markup_runs += 1;

        // A start tag split around a structured attribute resumes here: the
        // run is tokenized as the rest of that tag.
        let resumed = self.top_mut().start_tag_open;
        self.top_mut().start_tag_open = false;
        let continued;
        let source = match (&self.top().element, resumed) {
            (Some(name), true) => {
                continued = format!("<{name} {buffer}");
                continued.as_str()
            }
            _ => buffer,
        };

        let mut tokenizer = Tokenizer::new(source);
        let mut resuming = resumed;
        for token in tokenizer.by_ref() {
            stats.tokens_consumed += 1;
            let first = std::mem::take(&mut resuming);
            match token {
                Token::Text(text) => self.push_text(text, stats),
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    if first {
                        self.resume_start_tag(attributes, self_closing);
                    } else {
                        self.open_element(name, attributes, self_closing, stats);
                    }
                }
                Token::EndTag { name } => self.close_element(name)?,
                Token::Comment(_) => {}
                Token::Eof => break,
                unsupported @ Token::Doctype(_) => {
                    log::debug!(target: LOG_TARGET, "unsupported token {unsupported:?}");
                    return Err(RewriteError::UnsupportedToken {
                        kind: unsupported.kind(),
                    });
                }
            }
        }

        let top = self.top_mut();
        top.text_tail = false;
        if tokenizer.ended_inside_tag() {
            debug_assert!(top.element.is_some(), "unterminated tag must be open");
            top.start_tag_open = true;
        }
        Ok(())
    }

    fn push_text(&mut self, text: String, stats: &mut RewriteStats) {
        let at_root = self.stack.len() == 1;
        if at_root && self.elide_root_whitespace && text.chars().all(char::is_whitespace) {
            stats.whitespace_dropped += 1;
            return;
        }
        let coalesce = self.config.coalesce_text;
        let top = self.top_mut();
        if coalesce
            && top.text_tail
            && let Some(Node::Text { text: tail }) = top.children.last_mut()
        {
            tail.push_str(&text);
            return;
        }
        top.children.push(Node::Text { text });
        top.text_tail = true;
    }

    fn open_element(
        &mut self,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
        stats: &mut RewriteStats,
    ) {
        stats.elements_built += 1;
        let pop_now = self_closing && is_void_element(&name);
        let mut entry = OpenEntry::element(name);
        for (attr_name, value) in attributes {
            entry.push(attribute_node(attr_name, value));
        }
        self.stack.push(entry);
        stats.max_depth = stats.max_depth.max(self.stack.len() as u32);
        if pop_now {
            self.pop_into_parent();
        }
    }

    fn resume_start_tag(&mut self, attributes: Vec<(String, Option<String>)>, self_closing: bool) {
        let top = self.top_mut();
        for (attr_name, value) in attributes {
            top.push(attribute_node(attr_name, value));
        }
        let pop_now = self_closing && top.element.as_deref().is_some_and(is_void_element);
        if pop_now {
            self.pop_into_parent();
        }
    }

    fn close_element(&mut self, found: String) -> Result<(), RewriteError> {
        let expected = self.top().element.clone();
        match expected {
            Some(name) if name.eq_ignore_ascii_case(&found) => {
                self.pop_into_parent();
                Ok(())
            }
            expected => {
                log::debug!(
                    target: LOG_TARGET,
                    "end tag </{found}> with innermost open element {expected:?}"
                );
                Err(RewriteError::UnbalancedClose { expected, found })
            }
        }
    }

    fn pop_into_parent(&mut self) {
        debug_assert!(self.stack.len() > 1, "the rewrite root is never popped");
        if self.stack.len() < 2 {
            return;
        }
        let Some(OpenEntry {
            element: Some(name),
            children,
            ..
        }) = self.stack.pop()
        else {
            return;
        };
        self.top_mut().push(Node::Element { name, children });
    }

    fn finish(mut self) -> Result<Vec<Node>, RewriteError> {
        if self.stack.len() != 1 {
            let open: Vec<String> = self
                .stack
                .iter()
                .filter_map(|entry| entry.element.clone())
                .collect();
            log::debug!(target: LOG_TARGET, "unbalanced tree, still open: {open:?}");
            return Err(RewriteError::UnbalancedTree { open });
        }
        Ok(self
            .stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default())
    }
}

/// Rebuilds `node`'s child list in place.
///
/// On error the node's child list is left empty; the tree must be discarded.
pub fn rebuild_children(
    node: &mut Node,
    config: &RewriteConfig,
    stats: &mut RewriteStats,
) -> Result<(), RewriteError> {
    let builder = TreeBuilder::new(config, node);
    let Some(children) = node.children_mut() else {
        return Ok(());
    };
    let original = std::mem::take(children);
    *children = builder.build(original, stats)?;
    Ok(())
}
