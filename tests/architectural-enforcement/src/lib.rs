//! Architectural Enforcement
//!
//! Source-level checks for rules the compiler cannot enforce:
//! - Rendering and update paths never panic
//! - Library code never blocks the caller's frame
//!
//! The helpers here walk a source tree and report offending lines; the
//! integration tests under `tests/` decide which rules apply where.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern and why it is forbidden
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub pattern: &'static str,
    pub reason: &'static str,
}

/// One offending line
#[derive(Clone, Debug)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub reason: &'static str,
    pub source: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.reason,
            self.source
        )
    }
}

/// Workspace-relative path resolved against this crate's manifest
pub fn workspace_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
}

/// Scan every `.rs` file under `dir`, skipping files named in `exclude`
pub fn scan_dir(dir: &Path, rules: &[Rule], exclude: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if exclude.contains(&name) {
            continue;
        }
        violations.extend(scan_file(path, rules));
    }

    violations
}

/// Scan production lines of one file
pub fn scan_file(path: &Path, rules: &[Rule]) -> Vec<Violation> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (idx, line) in production_lines(&content) {
        let code = code_part(line);
        for rule in rules {
            if code.contains(rule.pattern) {
                violations.push(Violation {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: rule.reason,
                    source: line.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Lines before the first `#[cfg(test)]`, with their zero-based index
///
/// Test modules sit at the bottom of each file in this workspace.
pub fn production_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
}

/// The part of a line before any `//` comment
pub fn code_part(line: &str) -> &str {
    if line.trim_start().starts_with("//") {
        return "";
    }
    line.split(" //").next().unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let src = "fn a() {}\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n";
        let lines: Vec<_> = production_lines(src).map(|(_, l)| l).collect();
        assert_eq!(lines, vec!["fn a() {}"]);
    }

    #[test]
    fn test_code_part_drops_comments() {
        assert_eq!(code_part("//! tree.add(..).unwrap();"), "");
        assert_eq!(code_part("let x = y; // z.unwrap()"), "let x = y;");
        assert_eq!(code_part("let x = y;"), "let x = y;");
    }
}
