//! Run actions one after another

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Action, BoxedAction, Context, Status};
use crate::traits::OutputError;

/// Runs children in order, one at a time
///
/// A child is polled until it reports `Done`; the next child gets its first
/// poll on the following tick. Children after the current one are never
/// touched early, and finished children are never polled again.
pub struct Sequential {
    label: &'static str,
    children: Vec<BoxedAction>,
    index: usize,
}

impl Sequential {
    /// Create an empty sequence
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            children: Vec::new(),
            index: 0,
        }
    }

    /// Create a sequence from already boxed children
    pub fn from_actions(label: &'static str, children: Vec<BoxedAction>) -> Self {
        Self {
            label,
            children,
            index: 0,
        }
    }

    /// Append a child (builder style)
    pub fn then<A: Action + 'static>(mut self, action: A) -> Self {
        self.push(action);
        self
    }

    /// Append an already boxed child (builder style)
    pub fn then_boxed(mut self, action: BoxedAction) -> Self {
        self.push_boxed(action);
        self
    }

    /// Append a child
    pub fn push<A: Action + 'static>(&mut self, action: A) {
        self.children.push(Box::new(action));
    }

    /// Append an already boxed child
    pub fn push_boxed(&mut self, action: BoxedAction) {
        self.children.push(action);
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the sequence has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the child currently being polled
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if every child has finished
    pub fn is_finished(&self) -> bool {
        self.index >= self.children.len()
    }
}

impl Action for Sequential {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        let Some(child) = self.children.get_mut(self.index) else {
            return Ok(Status::Done);
        };

        if child.poll(ctx)?.is_done() {
            debug!(
                "{}: step {} ({}) done",
                self.label,
                self.index,
                child.label()
            );
            self.index += 1;
        }

        Ok(Status::from(!self.is_finished()))
    }

    fn cancel(&mut self, ctx: &mut Context<'_>) -> Result<(), OutputError> {
        let current = self.index;
        self.index = self.children.len();
        match self.children.get_mut(current) {
            Some(child) => child.cancel(ctx),
            None => Ok(()),
        }
    }

    fn label(&self) -> &'static str {
        self.label
    }
}
