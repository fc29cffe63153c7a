//! # Panels
//!
//! The controls around the canvas. None of these touch the surface. They only read and write the
//! [`DesignStore`](crate::store::DesignStore), and the canvas controller picks the changes up on its next tick.

pub mod properties;
pub mod tools;
pub mod topbar;
