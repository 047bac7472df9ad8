//! Frame Compositor
//!
//! A flat, ordered stack of elements with a lifecycle. Each update cycle:
//!
//! 1. drops elements that report they are no longer alive
//! 2. drops elements imprinted on the previous cycle
//! 3. refreshes each element's hidden flag
//! 4. imprints elements that ask for it: their current view is emitted as a
//!    [`Command::Print`] and they are dropped on the next cycle
//!
//! and then forwards the event to every element that is still live.

use std::fmt;

use crate::element::{Command, Element, Event};

/// An element plus the frame's bookkeeping for it
struct Slot {
    element: Box<dyn Element>,
    /// Imprinted; removed on the next cycle
    expired: bool,
    hidden: bool,
}

/// Ordered collection of elements rendered one after another
#[derive(Default)]
pub struct FrameCompositor {
    slots: Vec<Slot>,
    /// Last size reported by the host
    size: Option<(u16, u16)>,
}

impl fmt::Debug for FrameCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCompositor")
            .field("elements", &self.slots.len())
            .field("size", &self.size)
            .finish()
    }
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element below the existing ones
    pub fn push<E>(&mut self, element: E)
    where
        E: Element + 'static,
    {
        self.push_boxed(Box::new(element));
    }

    pub fn push_boxed(&mut self, element: Box<dyn Element>) {
        self.slots.push(Slot {
            element,
            expired: false,
            hidden: false,
        });
    }

    /// Number of elements still held, including ones imprinted this cycle
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Width and height from the most recent `Resize` event
    #[must_use]
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    /// Run one lifecycle pass and deliver `event` to the live elements
    pub fn update(&mut self, event: Option<&Event>) -> Vec<Command> {
        if let Some(Event::Resize { width, height }) = event {
            self.size = Some((*width, *height));
        }

        let before = self.slots.len();
        self.slots
            .retain(|slot| slot.element.is_alive() && !slot.expired);
        let pruned = before - self.slots.len();

        let mut commands = Vec::new();
        for slot in &mut self.slots {
            slot.hidden = !slot.element.is_visible();

            if slot.element.should_imprint() {
                slot.expired = true;
                commands.push(Command::Print(slot.element.view()));
            }
        }

        let slots = std::mem::take(&mut self.slots);
        self.slots = slots
            .into_iter()
            .map(|slot| {
                if slot.expired {
                    return slot;
                }
                let (element, command) = slot.element.update(event);
                if let Some(command) = command {
                    commands.extend(command.flatten());
                }
                Slot { element, ..slot }
            })
            .collect();

        tracing::trace!(
            elements = self.slots.len(),
            pruned,
            commands = commands.len(),
            "Frame update cycle"
        );
        commands
    }

    /// Join the views of visible, unexpired elements
    pub fn render(&self) -> String {
        self.slots
            .iter()
            .filter(|slot| !slot.hidden && !slot.expired)
            .map(|slot| slot.element.view())
            .filter(|view| !view.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Element for FrameCompositor {
    fn view(&self) -> String {
        self.render()
    }

    fn update(mut self: Box<Self>, event: Option<&Event>) -> (Box<dyn Element>, Option<Command>) {
        let commands = FrameCompositor::update(&mut self, event);
        (self, Command::batch(commands.into_iter().map(Some)))
    }
}
