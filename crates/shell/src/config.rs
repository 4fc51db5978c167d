use std::path::PathBuf;

/// Inputs for one host page.
#[derive(Clone, Debug, Default)]
pub struct ShellConfig {
    /// Main application assembly; only its file stem is written.
    pub main_assembly: PathBuf,
    pub entry_point: Option<String>,
    /// Referenced assemblies, written by file name in list order.
    pub references: Vec<PathBuf>,
    /// Static files copied next to the page. `.css` and `.js` files also get
    /// a tag.
    pub resources: Vec<PathBuf>,
    pub linker_enabled: bool,
}
