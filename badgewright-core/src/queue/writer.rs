use crate::commands::{self, Command};
use crate::state::{
    background::Background, Document, Element, ElementDraft, ElementID, ElementPatch, PatchError,
};

/// Any type which can sink commands.
pub trait CommandWrite<Command> {
    /// Inserts a command.
    fn write(&mut self, command: Command);
}
impl<Write, Command> CommandWrite<Command> for &mut Write
where
    Write: CommandWrite<Command>,
{
    fn write(&mut self, command: Command) {
        (**self).write(command);
    }
}
// Any command can be written into any smallvec of commands.
impl<Subcommand, Array> CommandWrite<Subcommand> for smallvec::SmallVec<Array>
where
    Subcommand: Into<Command>,
    Array: smallvec::Array<Item = Command>,
{
    fn write(&mut self, command: Subcommand) {
        self.push(command.into());
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("element {0} not found")]
    UnknownElement(ElementID),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Mutable access to a document, recording each change as it is made.
///
/// Everything written during the life of a writer becomes a single entry in the history once it is dropped.
pub struct DesignWriter<'a> {
    pub(crate) document: &'a mut Document,
    pub(crate) history: &'a mut super::CommandHistory,
    /// Elements whose surface representation must be rebuilt.
    pub(crate) stale: &'a mut hashbrown::HashSet<ElementID>,
    // Optimize for exactly one command (the most common case)
    pub(crate) commands: smallvec::SmallVec<[Command; 1]>,
}
impl std::ops::Deref for DesignWriter<'_> {
    type Target = Document;
    fn deref(&self) -> &Self::Target {
        self.document
    }
}
// Leak-safe, if a bit sad: a leaked writer leaves its changes applied but unrecorded.
impl Drop for DesignWriter<'_> {
    fn drop(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let mut commands = std::mem::take(&mut self.commands);
        let command = match (std::thread::panicking(), commands.len()) {
            (false, 1) => commands.remove(0),
            (panicking, _) => {
                let scope = if panicking {
                    commands::ScopeType::WritePanic
                } else {
                    commands::ScopeType::Atoms
                };
                commands::MetaCommand::Scope(scope, commands.into_boxed_slice()).into()
            }
        };
        log::trace!("Writing new command: {:#?}", command);
        self.history.push(command);
    }
}
impl DesignWriter<'_> {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.commands.is_empty()
    }
    /// Append a new element on top of all others, returning its new id.
    pub fn push_back(&mut self, draft: ElementDraft) -> ElementID {
        let element = Element::from_draft(draft);
        let id = element.id;
        let index = self.document.len();
        // Fresh ids can't collide and we're appending, so this always succeeds.
        let _ = self.document.insert(index, element.clone());
        self.commands.write(Command::ElementAdded { index, element });
        id
    }
    /// Merge a patch into an element. Patches that change nothing are not recorded.
    pub fn update(&mut self, id: ElementID, patch: &ElementPatch) -> Result<(), WriteError> {
        if self.update_with(id, |element| element.apply_patch(patch))? {
            self.stale.insert(id);
        }
        Ok(())
    }
    /// Write geometry reported by the rendering surface. Unlike [`Self::update`], the element is not marked
    /// for rebuilding, as the surface is already showing it.
    pub fn place(&mut self, id: ElementID, patch: &ElementPatch) -> Result<(), WriteError> {
        self.update_with(id, |element| element.apply_patch(patch))?;
        Ok(())
    }
    /// Returns whether anything changed.
    fn update_with(
        &mut self,
        id: ElementID,
        f: impl FnOnce(&mut Element) -> Result<(), PatchError>,
    ) -> Result<bool, WriteError> {
        let current = self
            .document
            .get_mut(id)
            .ok_or(WriteError::UnknownElement(id))?;
        let mut updated = current.clone();
        f(&mut updated)?;
        if updated == *current {
            return Ok(false);
        }
        let from = std::mem::replace(current, updated.clone());
        self.commands.write(Command::ElementUpdated {
            from: Box::new(from),
            to: Box::new(updated),
        });
        Ok(true)
    }
    pub fn remove(&mut self, id: ElementID) -> Result<Element, WriteError> {
        let (index, element) = self
            .document
            .remove(id)
            .ok_or(WriteError::UnknownElement(id))?;
        self.stale.remove(&id);
        self.commands.write(Command::ElementRemoved {
            index,
            element: element.clone(),
        });
        Ok(element)
    }
    pub fn set_background(&mut self, to: Background) {
        if self.document.background == to {
            return;
        }
        let from = std::mem::replace(&mut self.document.background, to.clone());
        self.commands.write(Command::BackgroundChanged { from, to });
    }
}
