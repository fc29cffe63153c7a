//! Command History
//!
//! Every write to the design is recorded here, in order, so that it can be walked backwards and forwards.
//! The history is linear: writing after an undo discards whatever could have been redone.

use crate::commands::{self, CommandConsumer, CommandError, DoUndo};
use crate::state::Document;

pub mod writer;

#[derive(Default, Debug, Clone)]
pub struct CommandHistory {
    /// Applied commands, oldest first.
    done: Vec<commands::Command>,
    /// Undone commands, most recently undone last.
    undone: Vec<commands::Command>,
}
impl CommandHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Record a command that has already been applied.
    pub fn push(&mut self, command: commands::Command) {
        if !self.undone.is_empty() {
            log::trace!("Discarding {} redo-able commands", self.undone.len());
            self.undone.clear();
        }
        self.done.push(command);
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.done.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
    /// Undo the most recent command against `document`, returning it.
    ///
    /// On error the command stays where it was, and the document is unchanged.
    pub fn undo(&mut self, document: &mut Document) -> Result<&commands::Command, CommandError> {
        let command = self.done.pop().ok_or(CommandError::NoOp)?;
        if let Err(err) = document.apply(DoUndo::Undo(&command)) {
            self.done.push(command);
            return Err(err);
        }
        self.undone.push(command);
        self.undone.last().ok_or(CommandError::NoOp)
    }
    /// Re-apply the most recently undone command against `document`, returning it.
    ///
    /// On error the command stays where it was, and the document is unchanged.
    pub fn redo(&mut self, document: &mut Document) -> Result<&commands::Command, CommandError> {
        let command = self.undone.pop().ok_or(CommandError::NoOp)?;
        if let Err(err) = document.apply(DoUndo::Do(&command)) {
            self.undone.push(command);
            return Err(err);
        }
        self.done.push(command);
        self.done.last().ok_or(CommandError::NoOp)
    }
}

#[cfg(test)]
mod test {
    use super::CommandHistory;
    use crate::commands::{Command, CommandError};
    use crate::state::{background::Background, Document};
    use crate::Color;

    fn recolor(document: &mut Document, history: &mut CommandHistory, color: Color) {
        let to = Background::Color { color: Some(color) };
        let from = std::mem::replace(&mut document.background, to.clone());
        history.push(Command::BackgroundChanged { from, to });
    }

    #[test]
    fn undo_redo_walk() {
        let mut document = Document::default();
        let mut history = CommandHistory::new();
        let original = document.background.clone();

        recolor(&mut document, &mut history, Color::BLACK);
        recolor(&mut document, &mut history, Color::rgb(255, 0, 0));
        assert_eq!(history.len(), 2);

        history.undo(&mut document).unwrap();
        assert_eq!(document.background.resolve_color(), Color::BLACK);
        history.undo(&mut document).unwrap();
        assert_eq!(document.background, original);
        assert_eq!(history.undo(&mut document), Err(CommandError::NoOp));

        history.redo(&mut document).unwrap();
        assert_eq!(document.background.resolve_color(), Color::BLACK);
        assert!(history.can_redo());
    }
    #[test]
    fn write_discards_redo() {
        let mut document = Document::default();
        let mut history = CommandHistory::new();
        recolor(&mut document, &mut history, Color::BLACK);
        history.undo(&mut document).unwrap();
        assert!(history.can_redo());
        recolor(&mut document, &mut history, Color::rgb(0, 255, 0));
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut document), Err(CommandError::NoOp));
    }
    #[test]
    fn mismatched_undo_keeps_command() {
        let mut document = Document::default();
        let mut history = CommandHistory::new();
        recolor(&mut document, &mut history, Color::BLACK);
        // Change the document behind the history's back.
        document.background = Background::Gradient {
            from: Color::WHITE,
            to: Color::BLACK,
        };
        assert_eq!(
            history.undo(&mut document),
            Err(CommandError::MismatchedState)
        );
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }
}
