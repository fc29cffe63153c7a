//! # Canvas Controller
//!
//! Keeps a rendering surface in step with the design in a [`DesignStore`], in both directions.
//!
//! The design is the source of truth. The surface is a cache of it, one primitive per element tagged with
//! the element's id, which can be thrown away and rebuilt at any time. User interaction with the surface
//! arrives as [`SurfaceEvent`]s, which are queued as [`Intent`]s and applied to the store at the start of
//! the next [`CanvasController::tick`]. Everything the controller does to the surface is silent, so nothing
//! it does is ever reported back to it.
//!
//! Within a tick, in order:
//! 1. Surface intents are applied to the store, unless the design they refer to was replaced.
//! 2. Finished image loads are collected.
//! 3. The surface is rebuilt if the design or its dimensions changed, and otherwise reconciled
//!    element-by-element.
//! 4. Zoom, overlays and background are forwarded.
//! 5. Selection is mirrored from the store onto the surface.

use std::{collections::VecDeque, sync::Arc};

use crate::factory;
use crate::images::{ImageLoader, ImagePipeline};
use crate::state::{DocumentID, Element, ElementID, ElementKind};
use crate::store::{DesignStore, StoreError};
use crate::surface::{
    Overlays, Primitive, RenderSurface, SurfaceConfig, SurfaceEvent, SurfaceFactory,
    SurfaceGeometry,
};
use crate::units::Dpi;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No design is loaded. The front end shows a loading indicator.
    #[default]
    Uninitialized,
    /// One primitive per element, as of the last tick.
    Populated,
    /// Something is waiting to be materialized, or the surface must be rebuilt.
    DirtyPendingSync,
}

/// A surface-originated change, waiting to be applied to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Select a primitive's element, or clear the selection.
    Select(Option<ElementID>),
    Modify {
        tag: ElementID,
        geometry: SurfaceGeometry,
    },
    Remove {
        tag: ElementID,
    },
}
impl From<SurfaceEvent> for Intent {
    fn from(event: SurfaceEvent) -> Self {
        match event {
            SurfaceEvent::SelectionCreated(tag) | SurfaceEvent::SelectionUpdated(tag) => {
                Self::Select(tag)
            }
            SurfaceEvent::SelectionCleared => Self::Select(None),
            SurfaceEvent::ObjectModified { tag, geometry } => Self::Modify { tag, geometry },
            SurfaceEvent::ObjectRemoved { tag } => Self::Remove { tag },
        }
    }
}

/// What a tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// State after the tick.
    pub state: SyncState,
    /// A fresh surface was built.
    pub rebuilt: bool,
    pub added: usize,
    pub replaced: usize,
    pub removed: usize,
    /// Intents that changed the store.
    pub intents: usize,
}

pub struct CanvasController<Factory: SurfaceFactory> {
    factory: Factory,
    surface: Option<Factory::Surface>,
    /// Store generation the surface was built for.
    generation: Option<u64>,
    /// Design the surface was built for.
    design: Option<DocumentID>,
    /// Resolution the surface was built at. Surface geometry is read back in these pixels.
    built_dpi: Option<Dpi>,
    /// Elements the controller has seen, whether or not they made it onto the surface.
    known: hashbrown::HashSet<ElementID>,
    /// Elements with no primitive that have been reported as such.
    skipped: hashbrown::HashSet<ElementID>,
    intents: VecDeque<Intent>,
    images: Option<ImagePipeline>,
}
impl<Factory: SurfaceFactory> CanvasController<Factory> {
    #[must_use]
    pub fn new(factory: Factory) -> Self {
        Self {
            factory,
            surface: None,
            generation: None,
            design: None,
            built_dpi: None,
            known: hashbrown::HashSet::new(),
            skipped: hashbrown::HashSet::new(),
            intents: VecDeque::new(),
            images: None,
        }
    }
    /// Materialize image elements, loading them on the given runtime. Without this, images are skipped.
    #[must_use]
    pub fn with_images(
        mut self,
        loader: Arc<dyn ImageLoader>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        self.images = Some(ImagePipeline::new(loader, runtime));
        self
    }
    #[must_use]
    pub fn factory(&self) -> &Factory {
        &self.factory
    }
    #[must_use]
    pub fn surface(&self) -> Option<&Factory::Surface> {
        self.surface.as_ref()
    }
    /// Access to the surface, e.g. for the front end to forward user input.
    pub fn surface_mut(&mut self) -> Option<&mut Factory::Surface> {
        self.surface.as_mut()
    }
    /// Queue an intent, to be applied on the next tick.
    pub fn enqueue(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }
    /// Wait for every image load started so far. Call [`Self::tick`] afterwards to materialize them.
    pub async fn settle_images(&mut self) {
        if let Some(images) = &mut self.images {
            images.settle().await;
        }
    }
    #[must_use]
    pub fn state(&self, store: &DesignStore) -> SyncState {
        let Some(design) = store.current_design() else {
            return SyncState::Uninitialized;
        };
        let dirty = self.surface.is_none()
            || self.generation != Some(store.generation())
            || store.has_stale()
            || !self.intents.is_empty()
            || self.images.as_ref().is_some_and(ImagePipeline::is_pending)
            || design.iter().any(|element| !self.known.contains(&element.id));
        if dirty {
            SyncState::DirtyPendingSync
        } else {
            SyncState::Populated
        }
    }
    /// Run one synchronization pass.
    pub fn tick(&mut self, store: &mut DesignStore) -> SyncReport {
        let mut report = SyncReport::default();
        if let Some(surface) = &mut self.surface {
            self.intents
                .extend(surface.poll_events().into_iter().map(Intent::from));
        }
        let ready = self
            .images
            .as_mut()
            .map(ImagePipeline::drain)
            .unwrap_or_default();

        if store.current_design().is_none() {
            self.teardown();
            return report;
        }

        let appended = if self.generation == Some(store.generation()) && self.surface.is_some() {
            report.intents = self.apply_intents(store);
            self.reconcile(store, &ready, &mut report)
        } else {
            let design = store.current_design().map(|design| design.id);
            if self.surface.is_some() && self.design == design {
                // Same elements, only the dimensions changed. The old surface's intents still apply.
                report.intents = self.apply_intents(store);
            } else if !self.intents.is_empty() {
                // Intents refer to elements of a design that is gone.
                log::debug!("Discarding {} intents for outdated surface", self.intents.len());
                self.intents.clear();
            }
            self.rebuild(store, &mut report)
        };
        self.sync_view(store);
        self.sync_selection(store, appended);

        report.state = self.state(store);
        if report.rebuilt || report.added + report.replaced + report.removed + report.intents > 0 {
            log::debug!("Tick: {report:?}");
        }
        report
    }
    fn teardown(&mut self) {
        if let Some(surface) = self.surface.take() {
            log::debug!("Disposing surface, no design loaded");
            surface.dispose();
        }
        self.generation = None;
        self.design = None;
        self.built_dpi = None;
        self.known.clear();
        self.skipped.clear();
        self.intents.clear();
        if let Some(images) = &mut self.images {
            images.clear();
        }
    }
    /// Apply queued intents to the store, returning how many changed it.
    fn apply_intents(&mut self, store: &mut DesignStore) -> usize {
        let mut applied = 0;
        while let Some(intent) = self.intents.pop_front() {
            let result = match &intent {
                Intent::Select(tag) => {
                    // Compare first, a surface echoing the store's own selection is not a change.
                    if store.selected_element_id() == *tag {
                        continue;
                    }
                    store.set_selected_element(*tag).map(|_| ())
                }
                Intent::Modify { tag, geometry } => {
                    let Some(dpi) = self.built_dpi else {
                        continue;
                    };
                    let patch = factory::read_back(geometry, dpi);
                    store
                        .write_with(|writer| writer.place(*tag, &patch))
                        .and_then(|result| result.map_err(StoreError::from))
                }
                Intent::Remove { tag } => {
                    self.forget(*tag);
                    store.remove_element(*tag).map(|_| ())
                }
            };
            match result {
                Ok(()) => applied += 1,
                Err(err) => log::debug!("Ignoring {intent:?}: {err}"),
            }
        }
        applied
    }
    fn forget(&mut self, id: ElementID) {
        self.known.remove(&id);
        self.skipped.remove(&id);
        if let Some(images) = &mut self.images {
            images.forget(id);
        }
    }
    /// Dispose of the current surface and build a new one from scratch. When only the dimensions changed,
    /// returns the last element added since the previous tick, as [`Self::reconcile`] does.
    fn rebuild(&mut self, store: &mut DesignStore, report: &mut SyncReport) -> Option<ElementID> {
        if let Some(old) = self.surface.take() {
            old.dispose();
        }
        let previous = std::mem::take(&mut self.known);
        self.skipped.clear();
        // Everything is about to be built fresh anyway.
        store.take_stale();
        let restored = store.take_restored();
        let design = store.current_design()?;
        let same_design = self.design == Some(design.id);
        if !same_design {
            if let Some(images) = &mut self.images {
                images.clear();
            }
        }

        let dimensions = design.dimensions;
        let [width, height] = dimensions.size_pixels();
        let mut surface = self.factory.create(SurfaceConfig {
            width,
            height,
            background: design.background.resolve_color(),
        });
        let mut appended = None;
        for element in design.iter() {
            self.known.insert(element.id);
            if let Some(primitive) = materialize(
                &mut self.images,
                &mut self.skipped,
                element,
                dimensions.resolution,
            ) {
                if same_design
                    && primitive.selectable
                    && !previous.contains(&element.id)
                    && !restored.contains(&element.id)
                {
                    appended = Some(element.id);
                }
                let end = surface.primitives().len();
                surface.insert(end, primitive);
                report.added += 1;
            }
        }
        log::debug!(
            "Built surface for {} ({}x{} @ {}), {} of {} elements",
            design.id,
            width,
            height,
            dimensions.resolution,
            report.added,
            design.len()
        );
        self.surface = Some(surface);
        self.generation = Some(store.generation());
        self.design = Some(design.id);
        self.built_dpi = Some(dimensions.resolution);
        report.rebuilt = true;
        appended
    }
    /// Bring the existing surface in line with the design. Returns the last element that was added to the
    /// design since the previous tick, if it was materialized and can be selected.
    fn reconcile(
        &mut self,
        store: &mut DesignStore,
        ready: &[ElementID],
        report: &mut SyncReport,
    ) -> Option<ElementID> {
        let stale = store.take_stale();
        let restored = store.take_restored();
        let design = store.current_design()?;
        let dpi = design.dimensions.resolution;

        // Forget elements that left the design, taking their primitives with them.
        let gone: Vec<ElementID> = self
            .known
            .iter()
            .copied()
            .filter(|id| !design.contains(*id))
            .collect();
        for id in gone {
            self.forget(id);
        }
        let surface = self.surface.as_mut()?;
        let orphans: Vec<ElementID> = surface
            .primitives()
            .iter()
            .map(|primitive| primitive.tag)
            .filter(|tag| !design.contains(*tag))
            .collect();
        for tag in orphans {
            surface.remove(tag);
            report.removed += 1;
        }

        let mut appended = None;
        // Paint position of the next primitive.
        let mut position = 0;
        for element in design.iter() {
            let id = element.id;
            let fresh = self.known.insert(id);
            let changed = stale.contains(&id);
            if surface.contains(id) {
                if changed {
                    if let Some(primitive) =
                        materialize(&mut self.images, &mut self.skipped, element, dpi)
                    {
                        surface.replace(primitive);
                        report.replaced += 1;
                    } else {
                        // No longer representable, such as an image waiting on a new source.
                        surface.remove(id);
                        report.removed += 1;
                        continue;
                    }
                }
                position += 1;
                continue;
            }
            // Missing elements are only tried again when something about them changed.
            if !(fresh || changed || ready.contains(&id)) {
                continue;
            }
            if let Some(primitive) = materialize(&mut self.images, &mut self.skipped, element, dpi)
            {
                // Elements brought back by undo aren't newly added, and don't steal the selection.
                if fresh && !restored.contains(&id) && primitive.selectable {
                    appended = Some(id);
                }
                surface.insert(position, primitive);
                report.added += 1;
                position += 1;
            }
        }
        appended
    }
    fn sync_view(&mut self, store: &DesignStore) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        let view = store.view();
        let zoom = f64::from(view.zoom) / 100.0;
        if surface.zoom() != zoom {
            surface.set_zoom(zoom);
        }
        let overlays = Overlays {
            grid: view.show_grid,
            guides: view.show_guides,
        };
        if surface.overlays() != overlays {
            surface.set_overlays(overlays);
        }
        if let Some(design) = store.current_design() {
            let background = design.background.resolve_color();
            if surface.config().background != background {
                surface.set_background(background);
            }
        }
    }
    fn sync_selection(&mut self, store: &mut DesignStore, appended: Option<ElementID>) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        if let Some(id) = appended {
            if let Err(err) = store.set_selected_element(Some(id)) {
                log::debug!("Couldn't select new element {id}: {err}");
            }
        }
        let target = store.selected_element_id();
        if surface.active() != target && !surface.set_active(target) {
            // Locked, hidden, or never materialized.
            log::trace!("{target:?} can't be made active");
        }
    }
}

/// Build the primitive for an element. Elements that can't be built are reported once.
fn materialize(
    images: &mut Option<ImagePipeline>,
    skipped: &mut hashbrown::HashSet<ElementID>,
    element: &Element,
    dpi: Dpi,
) -> Option<Primitive> {
    let primitive = match (&element.kind, images) {
        (ElementKind::Image(properties), Some(images)) => {
            if let Some(image) = images.get(element.id, &properties.src) {
                return factory::create_image_primitive(element, dpi, image);
            }
            // Not an error, it'll show up once loaded.
            images.request(element.id, &properties.src);
            return None;
        }
        (_, _) => factory::create_primitive(element, dpi),
    };
    if primitive.is_none() && skipped.insert(element.id) {
        log::warn!(
            "Skipping {} {:?}: {:?} elements can't be shown",
            element.id,
            element.name,
            element.kind.type_name()
        );
    }
    primitive
}
