//! A headless surface, holding primitives in memory.
//!
//! Used by the command line front end and by tests. The `click`, `transform` and `delete` family
//! simulate a user, and are the only things that produce events.

use std::{cell::Cell, rc::Rc};

use super::{
    Overlays, Primitive, RenderSurface, SurfaceConfig, SurfaceEvent, SurfaceFactory,
    SurfaceGeometry,
};
use crate::color::Color;
use crate::state::ElementID;
use crate::units::Pixels;

pub struct MemorySurface {
    config: SurfaceConfig,
    primitives: Vec<Primitive>,
    active: Option<ElementID>,
    zoom: f64,
    overlays: Overlays,
    events: Vec<SurfaceEvent>,
    live: Rc<Cell<usize>>,
}
impl Drop for MemorySurface {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}
impl RenderSurface for MemorySurface {
    fn config(&self) -> &SurfaceConfig {
        &self.config
    }
    fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
    fn insert(&mut self, index: usize, primitive: Primitive) {
        let index = index.min(self.primitives.len());
        self.primitives.insert(index, primitive);
    }
    fn replace(&mut self, primitive: Primitive) -> bool {
        let Some(slot) = self.primitives.iter_mut().find(|p| p.tag == primitive.tag) else {
            return false;
        };
        let selectable = primitive.selectable;
        *slot = primitive;
        if !selectable && self.active == Some(slot.tag) {
            self.active = None;
        }
        true
    }
    fn remove(&mut self, tag: ElementID) -> Option<Primitive> {
        let index = self.primitives.iter().position(|p| p.tag == tag)?;
        if self.active == Some(tag) {
            self.active = None;
        }
        Some(self.primitives.remove(index))
    }
    fn set_background(&mut self, color: Color) {
        self.config.background = color;
    }
    fn active(&self) -> Option<ElementID> {
        self.active
    }
    fn set_active(&mut self, tag: Option<ElementID>) -> bool {
        match tag {
            None => {
                self.active = None;
                true
            }
            Some(tag) if self.primitive(tag).is_some_and(|p| p.selectable) => {
                self.active = Some(tag);
                true
            }
            Some(_) => {
                self.active = None;
                false
            }
        }
    }
    fn zoom(&self) -> f64 {
        self.zoom
    }
    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }
    fn overlays(&self) -> Overlays {
        self.overlays
    }
    fn set_overlays(&mut self, overlays: Overlays) {
        self.overlays = overlays;
    }
    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}
// User simulation
impl MemorySurface {
    /// Click on a primitive. Returns false if it can't be selected.
    pub fn click(&mut self, tag: ElementID) -> bool {
        if !self.primitive(tag).is_some_and(|p| p.selectable) {
            return false;
        }
        match self.active.replace(tag) {
            None => self.events.push(SurfaceEvent::SelectionCreated(Some(tag))),
            Some(previous) if previous != tag => {
                self.events.push(SurfaceEvent::SelectionUpdated(Some(tag)));
            }
            Some(_) => (),
        }
        true
    }
    /// Click at a point, hitting the topmost selectable primitive or else the empty canvas.
    pub fn click_at(&mut self, x: Pixels, y: Pixels) -> Option<ElementID> {
        let hit = self
            .primitives
            .iter()
            .rev()
            .find(|p| p.selectable && p.geometry.contains(x, y))
            .map(|p| p.tag);
        match hit {
            Some(tag) => {
                self.click(tag);
            }
            None => self.click_empty(),
        }
        hit
    }
    pub fn click_empty(&mut self) {
        if self.active.take().is_some() {
            self.events.push(SurfaceEvent::SelectionCleared);
        }
    }
    /// Move, scale, or rotate a selectable primitive. Returns false if it can't be.
    pub fn transform(&mut self, tag: ElementID, f: impl FnOnce(&mut SurfaceGeometry)) -> bool {
        let Some(primitive) = self
            .primitives
            .iter_mut()
            .find(|p| p.tag == tag && p.selectable)
        else {
            return false;
        };
        f(&mut primitive.geometry);
        self.events.push(SurfaceEvent::ObjectModified {
            tag,
            geometry: primitive.geometry,
        });
        true
    }
    pub fn drag(&mut self, tag: ElementID, left: Pixels, top: Pixels) -> bool {
        self.transform(tag, |geometry| {
            geometry.left = left;
            geometry.top = top;
        })
    }
    /// Delete a primitive, as with the delete key.
    pub fn delete(&mut self, tag: ElementID) -> bool {
        let was_active = self.active == Some(tag);
        if self.remove(tag).is_none() {
            return false;
        }
        if was_active {
            self.events.push(SurfaceEvent::SelectionCleared);
        }
        self.events.push(SurfaceEvent::ObjectRemoved { tag });
        true
    }
}

/// Creates [`MemorySurface`]s, keeping count of how many are alive.
#[derive(Default)]
pub struct MemorySurfaceFactory {
    live: Rc<Cell<usize>>,
    created: usize,
}
impl MemorySurfaceFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Surfaces created and not yet disposed.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.get()
    }
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }
}
impl SurfaceFactory for MemorySurfaceFactory {
    type Surface = MemorySurface;
    fn create(&mut self, config: SurfaceConfig) -> MemorySurface {
        self.created += 1;
        self.live.set(self.live.get() + 1);
        log::trace!(
            "Creating surface #{} ({}x{})",
            self.created,
            config.width,
            config.height
        );
        MemorySurface {
            config,
            primitives: Vec::new(),
            active: None,
            zoom: 1.0,
            overlays: Overlays::default(),
            events: Vec::new(),
            live: self.live.clone(),
        }
    }
}
