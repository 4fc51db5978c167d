/// What to do with whitespace-only character data while no element is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RootWhitespace {
    /// Drop it whenever the reconstruction stack is back at the rewrite root.
    #[default]
    Elide,
    /// Drop it only when the rewrite root is a method-scope node; keep it
    /// at the top of control-flow blocks and other foreign containers.
    MethodScopeOnly,
    /// Always materialize it as a text node.
    Preserve,
}

#[derive(Clone, Debug, Default)]
pub struct RewriteConfig {
    pub root_whitespace: RootWhitespace,
    /// Merge adjacent text leaves produced from the same markup run.
    /// Never merges into text that was already present in the input.
    pub coalesce_text: bool,
}
