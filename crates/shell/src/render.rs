//! Boot tag replacement.
//!
//! The template is tokenized only to locate the boot `<script>` element; the
//! output is assembled from byte spans of the original text so everything
//! outside that element is copied unchanged.

use std::ops::Range;

use markup::{Token, Tokenizer};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::resources::{escape_attribute, file_name, resource_tag};

const BOOT_SCRIPT_TYPE: &str = "blazor-boot";
const LOADER_SRC: &str = "_framework/blazor.js";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedShell {
    pub html: String,
    /// False when the template had no boot tag and was copied unchanged.
    pub boot_tag_found: bool,
}

/// Byte range of the boot element in the template, plus the attributes to
/// carry over.
#[derive(Debug)]
struct BootTag {
    range: Range<usize>,
    extra_attributes: Vec<(String, Option<String>)>,
}

pub fn render_shell(template: &str, config: &ShellConfig) -> Result<RenderedShell, ShellError> {
    let Some(boot) = find_boot_tag(template) else {
        log::warn!(
            target: "shell",
            "no <script type=\"{BOOT_SCRIPT_TYPE}\"> tag found; template copied unchanged"
        );
        return Ok(RenderedShell {
            html: template.to_string(),
            boot_tag_found: false,
        });
    };

    let replacement = boot_replacement(config, &boot.extra_attributes)?;
    let mut html = String::with_capacity(template.len() + replacement.len());
    html.push_str(&template[..boot.range.start]);
    html.push_str(&replacement);
    html.push_str(&template[boot.range.end..]);
    Ok(RenderedShell {
        html,
        boot_tag_found: true,
    })
}

fn find_boot_tag(template: &str) -> Option<BootTag> {
    let mut tokenizer = Tokenizer::new(template);
    while let Some(token) = tokenizer.next() {
        let Token::StartTag {
            name,
            attributes,
            self_closing,
        } = token
        else {
            continue;
        };
        if name != "script" || !is_boot_type(&attributes) {
            continue;
        }
        let span = tokenizer.last_span();
        let mut end = span.end;
        if !self_closing {
            while let Some(token) = tokenizer.next() {
                match token {
                    Token::EndTag { name } if name == "script" => {
                        end = tokenizer.last_span().end;
                        break;
                    }
                    Token::Eof => break,
                    _ => {}
                }
            }
        }
        let extra_attributes = attributes
            .into_iter()
            .filter(|(name, _)| name != "type")
            .collect();
        return Some(BootTag {
            range: span.start..end,
            extra_attributes,
        });
    }
    None
}

fn is_boot_type(attributes: &[(String, Option<String>)]) -> bool {
    attributes.iter().any(|(name, value)| {
        name == "type"
            && value
                .as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(BOOT_SCRIPT_TYPE))
    })
}

fn boot_replacement(
    config: &ShellConfig,
    extra_attributes: &[(String, Option<String>)],
) -> Result<String, ShellError> {
    let main = file_name(&config.main_assembly)?;
    let main_stem = main.rsplit_once('.').map_or(main, |(stem, _)| stem);
    let references = config
        .references
        .iter()
        .map(|path| file_name(path))
        .collect::<Result<Vec<_>, _>>()?
        .join(",");

    let mut out = format!(r#"<script src="{LOADER_SRC}""#);
    push_attribute(&mut out, "main", Some(&format!("{main_stem}.dll")));
    if let Some(entry_point) = &config.entry_point {
        push_attribute(&mut out, "entrypoint", Some(entry_point));
    }
    push_attribute(&mut out, "references", Some(&references));
    if config.linker_enabled {
        push_attribute(&mut out, "linker-enabled", Some("true"));
    }
    for (name, value) in extra_attributes {
        push_attribute(&mut out, name, value.as_deref());
    }
    out.push_str("></script>");

    for resource in &config.resources {
        if let Some(tag) = resource_tag(resource)? {
            out.push('\n');
            out.push_str(&tag);
        }
    }
    Ok(out)
}

fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    out.push(' ');
    out.push_str(name);
    if let Some(value) = value {
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
}
