//! Element Contract
//!
//! Everything a compositor manages is an [`Element`]: a value that can
//! render its own content, report a few optional capabilities, and replace
//! itself in response to an [`Event`].
//!
//! # Capabilities
//!
//! | Method | Default | Used by |
//! |--------|---------|---------|
//! | `view` | required | tree, frame |
//! | `update` | required | tree, frame |
//! | `is_visible` | `true` | tree, frame |
//! | `is_alive` | `true` | frame |
//! | `should_imprint` | `false` | frame |
//!
//! Elements opt into a capability by overriding the method; a compositor
//! that does not know about a capability simply never asks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;

/// Input delivered by the host on each update cycle
#[derive(Clone)]
pub enum Event {
    /// The rendering area changed size
    Resize {
        /// Columns available
        width: u16,
        /// Rows available
        height: u16,
    },
    /// Periodic frame tick
    Tick(Instant),
    /// A key press forwarded from the terminal
    Key(KeyEvent),
    /// Application-defined payload
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Event {
    /// Wrap an application payload
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Borrow the payload of a `Custom` event as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resize { width, height } => f
                .debug_struct("Resize")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Tick(at) => f.debug_tuple("Tick").field(at).finish(),
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Follow-up action requested by an element
#[derive(Debug, Clone)]
pub enum Command {
    /// Write a permanent line above the live region
    Print(String),
    /// Deliver an event on the next cycle
    Emit(Event),
    /// Stop the host loop
    Quit,
    /// Several commands, in emission order
    Batch(Vec<Command>),
}

impl Command {
    /// Combine optional commands into at most one
    ///
    /// `None`s are dropped and nested batches are flattened, so an empty
    /// batch is `None` and a batch of one is that command.
    pub fn batch<I>(commands: I) -> Option<Command>
    where
        I: IntoIterator<Item = Option<Command>>,
    {
        let mut flat: Vec<Command> = commands
            .into_iter()
            .flatten()
            .flat_map(Command::flatten)
            .collect();

        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Command::Batch(flat)),
        }
    }

    /// Expand nested batches into a flat list
    pub fn flatten(self) -> Vec<Command> {
        match self {
            Command::Batch(inner) => inner.into_iter().flat_map(Command::flatten).collect(),
            other => vec![other],
        }
    }
}

/// A visual element owned by a compositor
///
/// `update` consumes the element and returns its replacement; the
/// compositor stores whatever comes back, so an element may turn into a
/// different type entirely.
pub trait Element: Send + Sync {
    /// Current text for this element's own content, without descendants
    fn view(&self) -> String;

    /// Apply one input event
    fn update(self: Box<Self>, event: Option<&Event>) -> (Box<dyn Element>, Option<Command>);

    /// Whether the element (and, in a tree, its subtree) is drawn
    fn is_visible(&self) -> bool {
        true
    }

    /// Whether the element's lifecycle is still running
    fn is_alive(&self) -> bool {
        true
    }

    /// Whether the element asks to be frozen into scroll-back
    fn should_imprint(&self) -> bool {
        false
    }
}
