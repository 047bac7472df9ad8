//! Integration Test: Non-Blocking Library Code
//!
//! An update or render call is expected to finish within one host frame.
//! Library code must not sleep, touch the filesystem or network, or write
//! to the terminal; the host owns all of that.

use architectural_enforcement::{scan_dir, workspace_path, Rule};

const BLOCKING_RULES: &[Rule] = &[
    Rule {
        pattern: "thread::sleep",
        reason: "sleep in library code",
    },
    Rule {
        pattern: "std::fs::",
        reason: "filesystem I/O in library code",
    },
    Rule {
        pattern: "std::net::",
        reason: "network I/O in library code",
    },
    Rule {
        pattern: "println!(",
        reason: "direct terminal output in library code",
    },
    Rule {
        pattern: "stdout()",
        reason: "direct terminal output in library code",
    },
];

#[test]
fn test_no_blocking_calls_in_library_code() {
    let violations = scan_dir(&workspace_path("tui/src"), BLOCKING_RULES, &["main.rs"]);

    if !violations.is_empty() {
        eprintln!("\nBlocking calls found in library code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }

        panic!(
            "\nFound {} blocking call(s) in library code.",
            violations.len()
        );
    }
}
