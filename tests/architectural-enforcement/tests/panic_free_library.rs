//! Integration Test: Panic-Free Library Code
//!
//! Rendering and update cycles must be total: malformed graphs degrade to
//! skipped nodes or empty output, never to a panic. Production code in the
//! `arbor-tui` library therefore must not unwrap, expect, or panic.
//!
//! The demo binary (`main.rs`) is a host, not library code, and is exempt.

use architectural_enforcement::{scan_dir, workspace_path, Rule};

const PANIC_RULES: &[Rule] = &[
    Rule {
        pattern: ".unwrap()",
        reason: "unwrap in library code",
    },
    Rule {
        pattern: ".expect(",
        reason: "expect in library code",
    },
    Rule {
        pattern: "panic!(",
        reason: "explicit panic in library code",
    },
    Rule {
        pattern: "unreachable!(",
        reason: "unreachable in library code",
    },
];

#[test]
fn test_no_panics_in_library_code() {
    let violations = scan_dir(&workspace_path("tui/src"), PANIC_RULES, &["main.rs"]);

    if !violations.is_empty() {
        eprintln!("\nPanicking calls found in library code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nReturn a Result, fall back with unwrap_or/unwrap_or_default, or skip the item.");

        panic!(
            "\nFound {} panicking call(s) in library code.",
            violations.len()
        );
    }
}

#[test]
fn test_library_sources_are_scanned() {
    // guards against a wrong path silently passing the test above
    let root = workspace_path("tui/src");
    assert!(root.join("compositor/tree.rs").exists(), "missing {}", root.display());
}
