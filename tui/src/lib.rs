//! Arbor TUI - Live tree and frame composition for terminal status output
//!
//! This crate turns a changing set of independently rendered elements into
//! one block of text. It does not touch the terminal: the host delivers
//! events, runs the returned commands, and draws the text wherever it likes.
//!
//! # Architecture
//!
//! - **Element**: the capability contract every managed value implements
//! - **Compositor**: the tree compositor (box-drawn forest) and the frame
//!   compositor (flat stack with hide/expire/imprint lifecycle)
//! - **Config**: immutable tree styles, loadable from TOML or the environment
//! - **Widgets**: ready-made elements
//!
//! # Example
//!
//! ```
//! use arbor_tui::{TextBlock, TreeCompositor};
//!
//! let tree = TreeCompositor::new();
//! tree.add("", "a", TextBlock::new("a")).unwrap();
//! tree.add("a", "a-a", TextBlock::new("a-a")).unwrap();
//!
//! assert_eq!(tree.render(), "└──a\n   └──a-a");
//! ```

pub mod compositor;
pub mod config;
pub mod element;
pub mod error;
pub mod widgets;

pub use compositor::{FrameCompositor, TreeCompositor};
pub use config::TreeStyle;
pub use element::{Command, Element, Event};
pub use error::{CompositorError, ConfigError};
pub use widgets::TextBlock;
