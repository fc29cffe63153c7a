//! # Design Store
//!
//! The shared application state of one editor session: the current design, the selection, and the view
//! settings the topbar controls. The store is the single owner of the design. The canvas controller and the
//! side panels go through it for every change, and it records each change into the command history.

use either::Either;

use crate::commands::CommandError;
use crate::queue::{
    writer::{DesignWriter, WriteError},
    CommandHistory,
};
use crate::state::{
    background::Background, Dimensions, Document, Element, ElementDraft, ElementID, ElementPatch,
    PatchError, Template,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no design is loaded")]
    NoDesign,
    #[error("element {0} not found")]
    UnknownElement(ElementID),
    #[error("no element is selected")]
    NothingSelected,
    #[error(transparent)]
    Patch(#[from] PatchError),
}
impl From<WriteError> for StoreError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::UnknownElement(id) => Self::UnknownElement(id),
            WriteError::Patch(patch) => Self::Patch(patch),
        }
    }
}

/// Zoom and overlay state, as set by the topbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSettings {
    /// Percent, 100 = one surface pixel per screen pixel.
    pub zoom: u32,
    pub show_grid: bool,
    pub show_guides: bool,
}
impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom: 100,
            show_grid: false,
            show_guides: false,
        }
    }
}

#[derive(Default)]
pub struct DesignStore {
    design: Option<Document>,
    history: CommandHistory,
    selected: Option<ElementID>,
    view: ViewSettings,
    /// Bumped whenever the surface must be rebuilt from scratch (new template, new dimensions).
    generation: u64,
    /// Elements changed by something other than the surface since the controller last looked.
    stale: hashbrown::HashSet<ElementID>,
    /// Elements brought back or changed by undo and redo since the controller last looked.
    restored: hashbrown::HashSet<ElementID>,
}
impl DesignStore {
    #[must_use]
    pub fn new(view: ViewSettings) -> Self {
        Self {
            view,
            ..Default::default()
        }
    }
    /// Start a new design from a template, replacing whatever was loaded. History and selection are reset.
    pub fn initialize_design(&mut self, template: &Template) -> &Document {
        let document = template.instantiate();
        log::debug!(
            "Initialized {} from template {:?} with {} elements",
            document.id,
            template.name,
            document.len()
        );
        self.history.clear();
        self.stale.clear();
        self.restored.clear();
        self.selected = None;
        self.generation += 1;
        self.design.insert(document)
    }
    /// End the session's design.
    pub fn close_design(&mut self) -> Option<Document> {
        self.history.clear();
        self.stale.clear();
        self.restored.clear();
        self.selected = None;
        self.generation += 1;
        self.design.take()
    }
    #[must_use]
    pub fn current_design(&self) -> Option<&Document> {
        self.design.as_ref()
    }
    /// Change the card's size or resolution. Every primitive is rebuilt from the stored millimeters.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<(), StoreError> {
        let design = self.design.as_mut().ok_or(StoreError::NoDesign)?;
        if design.dimensions != dimensions {
            log::debug!(
                "Dimensions of {} changed to {}x{} @ {}",
                design.id,
                dimensions.width,
                dimensions.height,
                dimensions.resolution
            );
            design.dimensions = dimensions;
            self.generation += 1;
        }
        Ok(())
    }
    /// The selected element's id. A selection that no longer refers to an element reads as none.
    #[must_use]
    pub fn selected_element_id(&self) -> Option<ElementID> {
        let id = self.selected?;
        self.design.as_ref()?.contains(id).then_some(id)
    }
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.design.as_ref()?.get(self.selected?)
    }
    /// What the side panels should show: the selected element, or else the whole design.
    #[must_use]
    pub fn inspect(&self) -> Option<Either<&Element, &Document>> {
        let design = self.design.as_ref()?;
        Some(match self.selected.and_then(|id| design.get(id)) {
            Some(element) => Either::Left(element),
            None => Either::Right(design),
        })
    }
    /// Select an element, or clear the selection with `None`. Returns whether the selection changed.
    pub fn set_selected_element(&mut self, id: Option<ElementID>) -> Result<bool, StoreError> {
        if let Some(id) = id {
            let design = self.design.as_ref().ok_or(StoreError::NoDesign)?;
            if !design.contains(id) {
                return Err(StoreError::UnknownElement(id));
            }
        }
        if self.selected_element_id() == id {
            // Also drops a stale selection when clearing.
            self.selected = id;
            return Ok(false);
        }
        self.selected = id;
        Ok(true)
    }
    #[must_use]
    pub fn view(&self) -> ViewSettings {
        self.view
    }
    pub fn view_mut(&mut self) -> &mut ViewSettings {
        &mut self.view
    }
    /// Lock the design for writing during the span of the closure. Every modification is recorded, and
    /// if several are made they are undone and redone as one.
    pub fn write_with<F, T>(&mut self, write: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut DesignWriter<'_>) -> T,
    {
        let document = self.design.as_mut().ok_or(StoreError::NoDesign)?;
        let mut writer = DesignWriter {
            document,
            history: &mut self.history,
            stale: &mut self.stale,
            commands: smallvec::SmallVec::new(),
        };
        // Panic safe - the writer's drop records whatever was applied.
        Ok(write(&mut writer))
    }
    pub fn add_element(&mut self, draft: ElementDraft) -> Result<ElementID, StoreError> {
        self.write_with(|writer| writer.push_back(draft))
    }
    pub fn update_element(&mut self, id: ElementID, patch: &ElementPatch) -> Result<(), StoreError> {
        Ok(self.write_with(|writer| writer.update(id, patch))??)
    }
    pub fn remove_element(&mut self, id: ElementID) -> Result<Element, StoreError> {
        let removed = self.write_with(|writer| writer.remove(id))??;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }
    pub fn set_background(&mut self, background: Background) -> Result<(), StoreError> {
        self.write_with(|writer| writer.set_background(background))
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.design.is_some() && self.history.can_undo()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.design.is_some() && self.history.can_redo()
    }
    pub fn undo(&mut self) -> Result<(), CommandError> {
        let design = self.design.as_mut().ok_or(CommandError::UnknownResource)?;
        let mut touched = Vec::new();
        self.history.undo(design)?.touched(&mut touched);
        self.mark_restored(touched);
        Ok(())
    }
    pub fn redo(&mut self) -> Result<(), CommandError> {
        let design = self.design.as_mut().ok_or(CommandError::UnknownResource)?;
        let mut touched = Vec::new();
        self.history.redo(design)?.touched(&mut touched);
        self.mark_restored(touched);
        Ok(())
    }
    fn mark_restored(&mut self, touched: Vec<ElementID>) {
        self.stale.extend(touched.iter().copied());
        self.restored.extend(touched);
        self.drop_stale_selection();
    }
    fn drop_stale_selection(&mut self) {
        if self.selected.is_some() && self.selected_element_id().is_none() {
            self.selected = None;
        }
    }
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
    pub(crate) fn has_stale(&self) -> bool {
        !self.stale.is_empty()
    }
    /// Take the set of elements that need their primitive rebuilt.
    pub(crate) fn take_stale(&mut self) -> hashbrown::HashSet<ElementID> {
        std::mem::take(&mut self.stale)
    }
    /// Take the set of elements touched by undo or redo. These are never newly placed.
    pub(crate) fn take_restored(&mut self) -> hashbrown::HashSet<ElementID> {
        std::mem::take(&mut self.restored)
    }
}
