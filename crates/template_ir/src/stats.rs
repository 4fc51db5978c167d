//! Counters for one rewrite run.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub nodes_visited: u64,
    pub nodes_rewritten: u64,
    pub markup_runs: u64,
    pub tokens_consumed: u64,
    pub elements_built: u64,
    pub whitespace_dropped: u64,
    /// Deepest reconstruction stack seen, root entry included.
    pub max_depth: u32,
}
