//! Static resources shipped next to the host page.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShellError;

/// Directory, relative to the page, that resources are copied into.
pub const CONTENT_DIR: &str = "_content";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Stylesheet,
    Script,
    /// Copied, but not referenced from the page.
    Other,
}

impl ResourceKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("css") => ResourceKind::Stylesheet,
            Some(ext) if ext.eq_ignore_ascii_case("js") => ResourceKind::Script,
            _ => ResourceKind::Other,
        }
    }
}

pub(crate) fn file_name(path: &Path) -> Result<&str, ShellError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ShellError::NoFileName {
            path: path.to_path_buf(),
        })
}

/// Page-relative URL of a copied resource.
pub fn content_url(file_name: &str) -> String {
    format!("{CONTENT_DIR}/{file_name}")
}

/// Tag referencing `resource` from the page, if its kind gets one.
pub fn resource_tag(resource: &Path) -> Result<Option<String>, ShellError> {
    let url = content_url(file_name(resource)?);
    let tag = match ResourceKind::from_path(resource) {
        ResourceKind::Stylesheet => Some(format!(
            r#"<link rel="stylesheet" href="{}" />"#,
            escape_attribute(&url)
        )),
        ResourceKind::Script => Some(format!(
            r#"<script src="{}" defer></script>"#,
            escape_attribute(&url)
        )),
        ResourceKind::Other => None,
    };
    Ok(tag)
}

/// Copies every resource into `<out_dir>/_content/`, returning the
/// destination paths in input order.
pub fn copy_resources(resources: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>, ShellError> {
    if resources.is_empty() {
        return Ok(Vec::new());
    }
    let content_dir = out_dir.join(CONTENT_DIR);
    fs::create_dir_all(&content_dir).map_err(|source| ShellError::Write {
        path: content_dir.clone(),
        source,
    })?;
    let mut copied = Vec::with_capacity(resources.len());
    for resource in resources {
        let to = content_dir.join(file_name(resource)?);
        fs::copy(resource, &to).map_err(|source| ShellError::CopyResource {
            from: resource.clone(),
            to: to.clone(),
            source,
        })?;
        log::debug!(target: "shell", "copied {} -> {}", resource.display(), to.display());
        copied.push(to);
    }
    Ok(copied)
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
