//! Zoom and overlay controls.

use crate::store::DesignStore;

/// Bounds and step of the zoom control, in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}
impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 10,
            max: 400,
            step: 10,
        }
    }
}
impl ZoomLimits {
    /// Clamp into `[min, max]`. Tolerates limits that were configured backwards.
    #[must_use]
    pub fn clamp(&self, percent: u32) -> u32 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        percent.clamp(low.max(1), high.max(1))
    }
}

pub struct Topbar {
    pub limits: ZoomLimits,
}
impl Topbar {
    #[must_use]
    pub fn new(limits: ZoomLimits) -> Self {
        Self { limits }
    }
    /// Set the zoom, clamped. Returns the zoom that was set.
    pub fn set_zoom(&self, store: &mut DesignStore, percent: u32) -> u32 {
        let zoom = self.limits.clamp(percent);
        store.view_mut().zoom = zoom;
        zoom
    }
    pub fn zoom_in(&self, store: &mut DesignStore) -> u32 {
        let current = store.view().zoom;
        self.set_zoom(store, current.saturating_add(self.limits.step))
    }
    pub fn zoom_out(&self, store: &mut DesignStore) -> u32 {
        let current = store.view().zoom;
        self.set_zoom(store, current.saturating_sub(self.limits.step))
    }
    /// Returns the new state.
    pub fn toggle_grid(&self, store: &mut DesignStore) -> bool {
        let view = store.view_mut();
        view.show_grid = !view.show_grid;
        view.show_grid
    }
    /// Returns the new state.
    pub fn toggle_guides(&self, store: &mut DesignStore) -> bool {
        let view = store.view_mut();
        view.show_guides = !view.show_guides;
        view.show_guides
    }
}
