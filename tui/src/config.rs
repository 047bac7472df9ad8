//! Tree Style Configuration
//!
//! Glyphs and layout flags for [`TreeCompositor`](crate::compositor::TreeCompositor).
//! A style is fixed once the compositor is built; use the `with_*` methods
//! to derive variants before construction.
//!
//! Styles can come from code, from TOML, or from environment variables:
//!
//! ```toml
//! [tree]
//! margin = "  "
//! vertical_pad_multiline = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Formatting options for tree rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeStyle {
    /// Prepended to every output line
    margin: String,
    /// Drawn for an ancestor level that has no later siblings
    indent: String,
    /// Drawn for an ancestor level that still has later siblings
    branch: String,
    /// Drawn before a node that has later visible siblings
    fork: String,
    /// Drawn before the last visible sibling
    leaf: String,
    /// Appended after every ancestor level
    padding: String,
    /// Add a spacer line after multi-line nodes
    vertical_pad_multiline: bool,
    /// Draw roots as bare headers
    roots_without_prefix: bool,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            margin: String::new(),
            indent: "   ".to_string(),
            branch: "│  ".to_string(),
            fork: "├──".to_string(),
            leaf: "└──".to_string(),
            padding: String::new(),
            vertical_pad_multiline: false,
            roots_without_prefix: false,
        }
    }
}

/// Wrapper for documents that nest the style under `[tree]`
#[derive(Deserialize)]
struct StyleDocument {
    tree: TreeStyle,
}

impl TreeStyle {
    /// Parse a style from TOML
    ///
    /// Accepts either top-level keys or a `[tree]` table. Missing keys keep
    /// their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let value: toml::Table = toml::from_str(input)?;
        if value.contains_key("tree") {
            let doc: StyleDocument = toml::from_str(input)?;
            return Ok(doc.tree);
        }
        Ok(toml::from_str(input)?)
    }

    /// Defaults overridden by environment variables
    ///
    /// Environment variables:
    /// - `ARBOR_TREE_MARGIN`: left margin string
    /// - `ARBOR_TREE_PADDING`: padding after each ancestor level
    /// - `ARBOR_TREE_VERTICAL_PAD`: "1"/"true" or "0"/"false"
    /// - `ARBOR_TREE_ROOTS_WITHOUT_PREFIX`: "1"/"true" or "0"/"false"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut style = Self::default();

        if let Some(margin) = lookup("ARBOR_TREE_MARGIN") {
            style.margin = margin;
        }
        if let Some(padding) = lookup("ARBOR_TREE_PADDING") {
            style.padding = padding;
        }
        if let Some(raw) = lookup("ARBOR_TREE_VERTICAL_PAD") {
            style.vertical_pad_multiline = parse_flag("ARBOR_TREE_VERTICAL_PAD", &raw)?;
        }
        if let Some(raw) = lookup("ARBOR_TREE_ROOTS_WITHOUT_PREFIX") {
            style.roots_without_prefix = parse_flag("ARBOR_TREE_ROOTS_WITHOUT_PREFIX", &raw)?;
        }

        Ok(style)
    }

    #[must_use]
    pub fn with_margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = margin.into();
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_fork(mut self, fork: impl Into<String>) -> Self {
        self.fork = fork.into();
        self
    }

    #[must_use]
    pub fn with_leaf(mut self, leaf: impl Into<String>) -> Self {
        self.leaf = leaf.into();
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = padding.into();
        self
    }

    #[must_use]
    pub fn with_vertical_pad_multiline(mut self, enabled: bool) -> Self {
        self.vertical_pad_multiline = enabled;
        self
    }

    #[must_use]
    pub fn with_roots_without_prefix(mut self, enabled: bool) -> Self {
        self.roots_without_prefix = enabled;
        self
    }

    pub fn margin(&self) -> &str {
        &self.margin
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn fork(&self) -> &str {
        &self.fork
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn padding(&self) -> &str {
        &self.padding
    }

    pub fn vertical_pad_multiline(&self) -> bool {
        self.vertical_pad_multiline
    }

    pub fn roots_without_prefix(&self) -> bool {
        self.roots_without_prefix
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
