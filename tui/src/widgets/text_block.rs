//! TextBlock Widget
//!
//! A plain text element that can be hidden and can wrap itself to the width
//! reported by the host.

use textwrap::{wrap, Options};
use unicode_width::UnicodeWidthStr;

use crate::element::{Command, Element, Event};

/// A static block of text
#[derive(Clone, Debug, Default)]
pub struct TextBlock {
    content: String,
    hidden: bool,
    /// Wrap to the last reported width
    wrap: bool,
    /// Columns reserved for prefixes drawn by the compositor
    gutter: usize,
    width: Option<u16>,
}

impl TextBlock {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Reserve `columns` of the reported width for tree prefixes
    pub fn gutter(mut self, columns: usize) -> Self {
        self.gutter = columns;
        self
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Display width of the widest unwrapped line
    pub fn max_line_width(&self) -> usize {
        self.content.lines().map(UnicodeWidthStr::width).max().unwrap_or(0)
    }

    fn wrap_width(&self) -> Option<usize> {
        if !self.wrap {
            return None;
        }
        self.width
            .map(|w| usize::from(w).saturating_sub(self.gutter).max(1))
    }
}

impl Element for TextBlock {
    fn view(&self) -> String {
        let Some(width) = self.wrap_width() else {
            return self.content.clone();
        };
        if self.max_line_width() <= width {
            return self.content.clone();
        }

        let options = Options::new(width);
        self.content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, &options)
                        .into_iter()
                        .map(|cow| cow.into_owned())
                        .collect()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn update(mut self: Box<Self>, event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        if let Some(Event::Resize { width, .. }) = event {
            self.width = Some(*width);
        }
        (self, None)
    }

    fn is_visible(&self) -> bool {
        !self.hidden
    }
}
