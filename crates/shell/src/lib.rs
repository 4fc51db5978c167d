//! Host page ("shell") writer.
//!
//! Takes an HTML template, swaps its boot `<script>` placeholder for the
//! loader tag describing the compiled application, and copies static
//! resources next to the written page.

mod config;
mod error;
mod render;
mod resources;

use std::fs;
use std::path::{Path, PathBuf};

pub use crate::config::ShellConfig;
pub use crate::error::ShellError;
pub use crate::render::{RenderedShell, render_shell};
pub use crate::resources::{CONTENT_DIR, ResourceKind, content_url, copy_resources, resource_tag};

/// What [`write_shell`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellSummary {
    pub output: PathBuf,
    pub boot_tag_found: bool,
    pub copied_resources: Vec<PathBuf>,
}

/// Renders `template_path` into `output_path` and copies the configured
/// resources into the `_content` directory beside it.
pub fn write_shell(
    template_path: &Path,
    config: &ShellConfig,
    output_path: &Path,
) -> Result<ShellSummary, ShellError> {
    let template = fs::read_to_string(template_path).map_err(|source| ShellError::Read {
        path: template_path.to_path_buf(),
        source,
    })?;
    let rendered = render_shell(&template, config)?;

    let out_dir = output_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(out_dir).map_err(|source| ShellError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let copied_resources = copy_resources(&config.resources, out_dir)?;
    fs::write(output_path, rendered.html.as_bytes()).map_err(|source| ShellError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    log::info!(
        target: "shell",
        "wrote {} ({} resource(s))",
        output_path.display(),
        copied_resources.len()
    );

    Ok(ShellSummary {
        output: output_path.to_path_buf(),
        boot_tag_found: rendered.boot_tag_found,
        copied_resources,
    })
}

/// Reads a list file: one path per line, surrounding whitespace trimmed,
/// blank lines ignored.
pub fn read_list_file(path: &Path) -> Result<Vec<PathBuf>, ShellError> {
    let content = fs::read_to_string(path).map_err(|source| ShellError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_list(&content))
}

fn parse_list(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
