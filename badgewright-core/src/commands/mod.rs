//! # Commands
//!
//! Commands are the record of every change made to a design through the store. Each one carries enough
//! information to be applied forwards ("do") or backwards ("undo") against the [`Document`].
//! They are written automatically by a [`crate::queue::writer::DesignWriter`].

use crate::state::{background::Background, Document, Element, ElementID};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("command constructed for a state that does not match the current state")]
    MismatchedState,
    #[error("resource referenced by the command is not found")]
    UnknownResource,
    #[error("command makes no changes")]
    NoOp,
}
pub trait CommandConsumer<C> {
    /// Apply a single command. If this generates an error,
    /// the state of `self` should *not* be observably changed.
    fn apply(&mut self, command: DoUndo<'_, C>) -> Result<(), CommandError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScopeType {
    /// Commands are grouped because they were individual parts of a single, larger operation.
    Atoms,
    /// A writer panicked mid write. The commands may be an incomplete operation, but they were applied
    /// so they are still recorded.
    WritePanic,
}
#[derive(Clone, Debug, PartialEq)]
pub enum MetaCommand {
    /// Many commands treated as one, as far as the user can tell.
    Scope(ScopeType, Box<[Command]>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Meta(MetaCommand),
    ElementAdded {
        index: usize,
        element: Element,
    },
    ElementUpdated {
        from: Box<Element>,
        to: Box<Element>,
    },
    ElementRemoved {
        index: usize,
        element: Element,
    },
    BackgroundChanged {
        from: Background,
        to: Background,
    },
}
impl From<MetaCommand> for Command {
    fn from(value: MetaCommand) -> Self {
        Self::Meta(value)
    }
}
impl Command {
    /// Collect the ids of every element this command (or its children) touches.
    pub fn touched(&self, into: &mut impl Extend<ElementID>) {
        match self {
            Self::Meta(MetaCommand::Scope(_, commands)) => {
                for command in commands.iter() {
                    command.touched(into);
                }
            }
            Self::ElementAdded { element, .. } | Self::ElementRemoved { element, .. } => {
                into.extend(std::iter::once(element.id));
            }
            Self::ElementUpdated { to, .. } => into.extend(std::iter::once(to.id)),
            Self::BackgroundChanged { .. } => (),
        }
    }
}

#[derive(PartialEq, Eq, Debug)]
pub enum DoUndo<'c, T> {
    Do(&'c T),
    Undo(&'c T),
}
impl<'c, T> DoUndo<'c, T> {
    #[must_use]
    pub fn inner(&self) -> &'c T {
        match self {
            Self::Do(c) | Self::Undo(c) => c,
        }
    }
}

impl CommandConsumer<Command> for Document {
    fn apply(&mut self, command: DoUndo<'_, Command>) -> Result<(), CommandError> {
        match command {
            DoUndo::Do(Command::Meta(MetaCommand::Scope(_, commands))) => {
                for (applied, command) in commands.iter().enumerate() {
                    if let Err(e) = self.apply(DoUndo::Do(command)) {
                        // Roll back what we did so far, keeping the no-change-on-error promise.
                        for done in commands[..applied].iter().rev() {
                            let _ = self.apply(DoUndo::Undo(done));
                        }
                        return Err(e);
                    }
                }
                Ok(())
            }
            DoUndo::Undo(Command::Meta(MetaCommand::Scope(_, commands))) => {
                for (applied, command) in commands.iter().rev().enumerate() {
                    if let Err(e) = self.apply(DoUndo::Undo(command)) {
                        for done in commands[commands.len() - applied..].iter() {
                            let _ = self.apply(DoUndo::Do(done));
                        }
                        return Err(e);
                    }
                }
                Ok(())
            }
            DoUndo::Do(Command::ElementAdded { index, element })
            | DoUndo::Undo(Command::ElementRemoved { index, element }) => {
                if self.contains(element.id) {
                    return Err(CommandError::MismatchedState);
                }
                self.insert(*index, element.clone())
                    .ok_or(CommandError::MismatchedState)
            }
            DoUndo::Undo(Command::ElementAdded { index, element })
            | DoUndo::Do(Command::ElementRemoved { index, element }) => {
                match self.elements().get(*index) {
                    None => Err(CommandError::UnknownResource),
                    Some(current) if current != element => Err(CommandError::MismatchedState),
                    Some(_) => {
                        self.remove_at(*index);
                        Ok(())
                    }
                }
            }
            DoUndo::Do(Command::ElementUpdated { from, to })
            | DoUndo::Undo(Command::ElementUpdated { from: to, to: from }) => {
                if from.id != to.id {
                    return Err(CommandError::MismatchedState);
                }
                let current = self.get_mut(from.id).ok_or(CommandError::UnknownResource)?;
                if *current != **from {
                    return Err(CommandError::MismatchedState);
                }
                current.clone_from(to);
                Ok(())
            }
            DoUndo::Do(Command::BackgroundChanged { from, to })
            | DoUndo::Undo(Command::BackgroundChanged { from: to, to: from }) => {
                if self.background != *from {
                    return Err(CommandError::MismatchedState);
                }
                self.background = to.clone();
                Ok(())
            }
        }
    }
}
