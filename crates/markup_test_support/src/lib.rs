//! Shared helpers for golden fixtures and randomized tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Expected-output file: `# key: value` headers followed by snapshot lines.
#[derive(Debug)]
pub struct ExpectedFile {
    pub headers: BTreeMap<String, String>,
    pub lines: Vec<String>,
}

impl ExpectedFile {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// Parses an expected-output file and checks its `format` header.
///
/// Blank lines are skipped. Header keys are lowercased; a repeated key
/// panics.
pub fn parse_expected_file(path: &Path, format: &str) -> ExpectedFile {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read expected file {path:?}: {err}"));
    parse_expected(&content, path, format)
}

pub fn parse_expected(content: &str, path: &Path, format: &str) -> ExpectedFile {
    let mut lines = Vec::new();
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        // Snapshot lines never start with "# " ("#document" and friends do not
        // have the space).
        if let Some(stripped) = line.strip_prefix("# ") {
            let (key, value) = stripped
                .split_once(':')
                .unwrap_or_else(|| panic!("invalid header in {path:?}: '{line}'"));
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if headers.insert(key.clone(), value).is_some() {
                panic!("duplicate header '{key}' in {path:?}");
            }
        } else {
            lines.push(line.to_string());
        }
    }

    let found = headers
        .get("format")
        .unwrap_or_else(|| panic!("missing format header in {path:?}"));
    assert_eq!(found, format, "unsupported format in {path:?}");

    ExpectedFile { headers, lines }
}

/// Fixture directories under `root`, sorted by name. Hidden entries are
/// skipped.
pub fn fixture_dirs(root: &Path) -> Vec<(String, PathBuf)> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());
    entries
        .into_iter()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name != name.trim() {
                panic!("fixture directory has leading/trailing whitespace: '{name}'");
            }
            (!name.starts_with('.')).then(|| (name, entry.path()))
        })
        .collect()
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    use std::fmt::Write;
    let missing = "<missing>";
    let mismatch = (0..max).find(|&i| {
        expected.get(i).map(String::as_str).unwrap_or(missing)
            != actual.get(i).map(String::as_str).unwrap_or(missing)
    });
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Small deterministic generator for randomized tests.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    pub fn gen_range(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() >> 32) as usize % upper
    }

    pub fn gen_bool(&mut self, percent: usize) -> bool {
        self.gen_range(100) < percent
    }
}

/// Reads an `u64` tuning knob from the environment.
pub fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .unwrap_or_else(|_| panic!("{name} must be a u64, got '{value}'")),
        Err(_) => default,
    }
}
