//! Tree Compositor
//!
//! Renders a forest of elements as an indented tree drawn with box glyphs:
//!
//! ```text
//! ├──a
//! │  ├──a-a
//! │  └──a-b
//! └──b
//!    └──b-a
//! ```
//!
//! Nodes are registered under caller-chosen string ids and linked to at most
//! one parent. Rendering is a depth-first walk from each root in insertion
//! order. The walk keeps an observed set, so every id is drawn at most once
//! per pass and a malformed (cyclic) graph still terminates.
//!
//! # Visibility
//!
//! A hidden node hides its whole subtree. Whether a node is the last of its
//! siblings is decided against *visible* later siblings only, and is
//! recomputed on every pass since visibility changes between frames.
//!
//! # Locking
//!
//! The forest lives behind one `RwLock`. Mutations and update cycles take the
//! write lock; rendering and the read helpers take the read lock.

use std::collections::{HashMap, HashSet};
use std::fmt;

use parking_lot::RwLock;

use crate::config::TreeStyle;
use crate::element::{Command, Element, Event};
use crate::error::CompositorError;

/// Graph storage guarded by the compositor lock
#[derive(Default)]
struct Forest {
    /// Parentless ids in insertion order
    roots: Vec<String>,
    /// Registered elements by id
    nodes: HashMap<String, Box<dyn Element>>,
    /// Child ids per parent, in insertion order
    children: HashMap<String, Vec<String>>,
    /// Parent id per child
    parents: HashMap<String, String>,
}

impl Forest {
    /// Unregistered ids count as hidden
    fn is_visible(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| node.is_visible())
    }

    /// True when no sibling after `idx` is visible
    fn is_last_visible(&self, idx: usize, siblings: &[String]) -> bool {
        !siblings
            .iter()
            .skip(idx + 1)
            .any(|sibling| self.is_visible(sibling))
    }

    fn has_visible_children(&self, id: &str) -> bool {
        self.children
            .get(id)
            .is_some_and(|children| children.iter().any(|child| self.is_visible(child)))
    }

    /// Drop one id from every structure; returns whether it was registered
    fn remove_one(&mut self, id: &str) -> bool {
        let existed = self.nodes.remove(id).is_some();
        self.children.remove(id);
        self.parents.remove(id);

        for siblings in self.children.values_mut() {
            siblings.retain(|child| child != id);
        }
        self.roots.retain(|root| root != id);

        existed
    }

    /// `id` and everything reachable below it, each listed once
    fn subtree(&self, id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack = vec![id];
        let mut order = Vec::new();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current.to_string());
            if let Some(children) = self.children.get(current) {
                stack.extend(children.iter().rev().map(String::as_str));
            }
        }

        order
    }
}

/// Stands in for a node while its element is being updated
struct Vacant;

impl Element for Vacant {
    fn view(&self) -> String {
        String::new()
    }

    fn update(self: Box<Self>, _event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        (self, None)
    }

    fn is_visible(&self) -> bool {
        false
    }
}

/// Single render pass over a borrowed forest
struct Renderer<'a> {
    forest: &'a Forest,
    style: &'a TreeStyle,
    observed: HashSet<&'a str>,
}

impl<'a> Renderer<'a> {
    fn new(forest: &'a Forest, style: &'a TreeStyle) -> Self {
        Self {
            forest,
            style,
            observed: HashSet::new(),
        }
    }

    /// Render `id` and its subtree
    ///
    /// `path[level]` says whether the ancestor at `level` (or the node
    /// itself, at `depth`) is the last visible sibling on its level.
    fn render_node(&mut self, id: &'a str, depth: usize, path: &mut Vec<bool>) -> String {
        let forest = self.forest;

        if !self.observed.insert(id) {
            return String::new();
        }

        let Some(node) = forest.nodes.get(id) else {
            return String::new();
        };

        if !node.is_visible() {
            return String::new();
        }

        let prefix = self.prefix(depth, path);

        let mut out = String::new();
        let content = node.view();
        if !content.is_empty() {
            let rail = || forest.has_visible_children(id);
            out.push_str(&self.prefix_lines(&content, &prefix, rail));
            out.push('\n');
        }

        if let Some(children) = forest.children.get(id) {
            for (idx, child) in children.iter().enumerate() {
                if self.observed.contains(child.as_str()) || !forest.nodes.contains_key(child) {
                    continue;
                }
                path.push(forest.is_last_visible(idx, children));
                let subtree = self.render_node(child, depth + 1, path);
                path.pop();
                out.push_str(&subtree);
            }
        }

        out
    }

    fn prefix(&self, depth: usize, path: &[bool]) -> String {
        let style = self.style;
        let bare_roots = style.roots_without_prefix();
        let mut prefix = String::new();

        for level in 0..depth {
            if bare_roots && level == 0 {
                prefix.push_str(style.padding());
                continue;
            }
            if path.get(level).copied().unwrap_or(true) {
                prefix.push_str(style.indent());
            } else {
                prefix.push_str(style.branch());
            }
            prefix.push_str(style.padding());
        }

        if !(bare_roots && depth == 0) {
            if path.get(depth).copied().unwrap_or(true) {
                prefix.push_str(style.leaf());
            } else {
                prefix.push_str(style.fork());
            }
        }

        prefix
    }

    /// Prefix the first line with `prefix` and the rest with its continuation
    ///
    /// `has_children` is only consulted when a pad line is drawn.
    fn prefix_lines(
        &self,
        content: &str,
        prefix: &str,
        has_children: impl FnOnce() -> bool,
    ) -> String {
        let style = self.style;
        let lines: Vec<&str> = content.trim_end_matches('\n').split('\n').collect();
        let continuation = continuation_prefix(prefix, style);
        let pad = style.vertical_pad_multiline() && lines.len() > 1;

        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.push_str(prefix);
            } else {
                out.push_str(&continuation);
            }
            out.push_str(line);
            if pad || i + 1 != lines.len() {
                out.push('\n');
            }
        }

        if pad {
            out.push_str(&continuation);
            if has_children() {
                out.push_str(style.branch());
            }
        }

        out
    }
}

/// Fork becomes branch and leaf becomes indent, so wrapped lines sit on the rails
fn continuation_prefix(prefix: &str, style: &TreeStyle) -> String {
    let mut next = prefix.to_string();
    if !style.fork().is_empty() {
        next = next.replace(style.fork(), style.branch());
    }
    if !style.leaf().is_empty() {
        next = next.replace(style.leaf(), style.indent());
    }
    next
}

/// A forest of elements rendered as one tree drawing
pub struct TreeCompositor {
    forest: RwLock<Forest>,
    style: TreeStyle,
}

impl Default for TreeCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TreeCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let forest = self.forest.read();
        f.debug_struct("TreeCompositor")
            .field("roots", &forest.roots)
            .field("nodes", &forest.nodes.len())
            .field("style", &self.style)
            .finish()
    }
}

impl TreeCompositor {
    /// Create an empty compositor with the default style
    pub fn new() -> Self {
        Self::with_style(TreeStyle::default())
    }

    /// Create an empty compositor with a fixed style
    pub fn with_style(style: TreeStyle) -> Self {
        Self {
            forest: RwLock::new(Forest::default()),
            style,
        }
    }

    pub fn style(&self) -> &TreeStyle {
        &self.style
    }

    /// Register `element` under `id`
    ///
    /// An empty `parent` makes `id` a root. Re-adding an existing id replaces
    /// its element and appends another link; it does not clear the old one.
    /// Call [`remove`](Self::remove) first to re-parent.
    pub fn add<E>(&self, parent: &str, id: &str, element: E) -> Result<(), CompositorError>
    where
        E: Element + 'static,
    {
        self.add_boxed(parent, id, Box::new(element))
    }

    /// [`add`](Self::add) for an already boxed element
    pub fn add_boxed(
        &self,
        parent: &str,
        id: &str,
        element: Box<dyn Element>,
    ) -> Result<(), CompositorError> {
        if id.is_empty() {
            tracing::warn!(parent, "Rejected tree node with empty id");
            return Err(CompositorError::InvalidArgument(
                "id cannot be empty".to_string(),
            ));
        }

        let mut forest = self.forest.write();
        let replaced = forest.nodes.insert(id.to_string(), element).is_some();

        if parent.is_empty() {
            forest.roots.push(id.to_string());
        } else {
            forest
                .children
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
            forest.parents.insert(id.to_string(), parent.to_string());
        }

        tracing::debug!(id, parent, replaced, "Tree node added");
        Ok(())
    }

    /// Unregister `id` and unlink it from its parent or the root list
    ///
    /// Descendants are not removed. They stay registered (and keep receiving
    /// updates) but no longer render, since nothing reachable links to them.
    /// The link from `id` to its children is dropped too, so call
    /// [`remove_subtree`](Self::remove_subtree) *instead of* this method to
    /// drop them as well; calling it afterwards finds nothing to remove.
    pub fn remove(&self, id: &str) {
        let mut forest = self.forest.write();
        if forest.remove_one(id) {
            tracing::debug!(id, "Tree node removed");
        } else {
            tracing::debug!(id, "Ignoring removal of unknown tree node");
        }
    }

    /// Remove `id` together with every descendant
    ///
    /// Returns the number of registered nodes that were dropped.
    pub fn remove_subtree(&self, id: &str) -> usize {
        let mut forest = self.forest.write();
        let mut removed = 0;
        for each in forest.subtree(id) {
            if forest.remove_one(&each) {
                removed += 1;
            }
        }
        tracing::debug!(id, removed, "Tree subtree removed");
        removed
    }

    /// Deliver one event to every registered element
    ///
    /// Each element is replaced by the value it returns. Commands are
    /// flattened into one list; each element's commands stay in order, but
    /// the order across elements is unspecified.
    pub fn update(&self, event: Option<&Event>) -> Vec<Command> {
        let mut forest = self.forest.write();
        let mut commands = Vec::new();

        // at most one node is out of the map at a time
        for slot in forest.nodes.values_mut() {
            let node = std::mem::replace(slot, Box::new(Vacant));
            let (node, command) = node.update(event);
            *slot = node;
            if let Some(command) = command {
                commands.extend(command.flatten());
            }
        }

        tracing::trace!(
            nodes = forest.nodes.len(),
            commands = commands.len(),
            "Tree update cycle"
        );
        commands
    }

    /// Draw the forest
    ///
    /// Pure with respect to the compositor state: calling it twice without
    /// a mutation in between yields the same text.
    pub fn render(&self) -> String {
        let forest = self.forest.read();
        let mut renderer = Renderer::new(&forest, &self.style);
        let mut out = String::new();

        for (idx, id) in forest.roots.iter().enumerate() {
            let mut path = vec![forest.is_last_visible(idx, &forest.roots)];
            out.push_str(&renderer.render_node(id, 0, &mut path));
        }

        tracing::trace!(
            roots = forest.roots.len(),
            observed = renderer.observed.len(),
            "Tree rendered"
        );

        let body = out.trim_end_matches('\n');
        let margin = self.style.margin();
        if body.is_empty() || margin.is_empty() {
            return body.to_string();
        }

        body.split('\n')
            .map(|line| format!("{margin}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether `id` has a registered element
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.forest.read().nodes.contains_key(id)
    }

    /// Number of registered elements, reachable or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.forest.read().nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forest.read().nodes.is_empty()
    }

    /// Root ids in insertion order
    #[must_use]
    pub fn roots(&self) -> Vec<String> {
        self.forest.read().roots.clone()
    }

    /// Child ids of `id` in insertion order
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<String> {
        self.forest
            .read()
            .children
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, id: &str) -> Option<String> {
        self.forest.read().parents.get(id).cloned()
    }
}

impl Element for TreeCompositor {
    fn view(&self) -> String {
        self.render()
    }

    fn update(self: Box<Self>, event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        let commands = TreeCompositor::update(&self, event);
        (self, Command::batch(commands.into_iter().map(Some)))
    }
}
