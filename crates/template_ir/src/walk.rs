//! Post-order driver for the markup rewrite pass.

use crate::builder::rebuild_children;
use crate::config::RewriteConfig;
use crate::error::RewriteError;
use crate::node::Node;
use crate::stats::RewriteStats;

/// Runs the rewrite over whole templates with one configuration.
#[derive(Clone, Debug, Default)]
pub struct RewritePass {
    config: RewriteConfig,
}

impl RewritePass {
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrites every markup run under `root`.
    ///
    /// Children are finished before their parent is rebuilt, so foreign nodes
    /// carried into new elements already hold structured content. Running
    /// the pass on its own output changes nothing.
    pub fn run(&self, root: &mut Node) -> Result<RewriteStats, RewriteError> {
        let mut stats = RewriteStats::default();
        let result = visit(root, &self.config, &mut stats);
        match &result {
            Ok(()) => log::debug!(
                target: "template_ir.rewrite",
                "rewrite finished: {} node(s) visited, {} rebuilt, {} element(s) built",
                stats.nodes_visited,
                stats.nodes_rewritten,
                stats.elements_built
            ),
            Err(err) => log::debug!(target: "template_ir.rewrite", "rewrite failed: {err}"),
        }
        result.map(|()| stats)
    }
}

/// Convenience wrapper for a single run of [`RewritePass`].
pub fn rewrite_document(
    root: &mut Node,
    config: &RewriteConfig,
) -> Result<RewriteStats, RewriteError> {
    RewritePass::new(config.clone()).run(root)
}

fn visit(node: &mut Node, config: &RewriteConfig, stats: &mut RewriteStats) -> Result<(), RewriteError> {
    stats.nodes_visited += 1;
    let mut has_markup_child = false;
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            visit(child, config, stats)?;
            has_markup_child |= child.is_markup();
        }
    }
    if has_markup_child {
        rebuild_children(node, config, stats)?;
        stats.nodes_rewritten += 1;
        log::debug!(
            target: "template_ir.rewrite",
            "rebuilt {} child(ren) of {}",
            node.children().map_or(0, <[Node]>::len),
            node_label(node)
        );
    }
    Ok(())
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Document { .. } => "#document".to_string(),
        Node::Method { name, .. } => format!("#method {name}"),
        Node::Element { name, .. } => format!("<{name}>"),
        Node::Attribute { name, .. } => format!("@{name}"),
        Node::Foreign { label, .. } => format!("{{{label}}}"),
        Node::Markup { .. } => "#markup".to_string(),
        Node::Text { .. } => "#text".to_string(),
    }
}
