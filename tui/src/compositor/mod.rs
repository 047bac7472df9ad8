//! Compositors
//!
//! Two ways of composing [`Element`](crate::element::Element)s into text:
//!
//! - [`TreeCompositor`]: a forest of identified nodes drawn with box glyphs
//! - [`FrameCompositor`]: a flat stack with hide/expire/imprint lifecycle
//!
//! Both are elements themselves, so a tree can sit inside a frame.

mod frame;
mod tree;

pub use frame::FrameCompositor;
pub use tree::TreeCompositor;
