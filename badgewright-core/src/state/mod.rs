//! # State
//!
//! The design document and everything it is built from. All of this is plain data: the rendering surface
//! is derived from it and never the other way around.

pub mod background;
pub mod document;
pub mod element;
pub mod patch;
pub mod template;

pub use background::Background;
pub use document::{Dimensions, Document, DocumentID};
pub use element::{Element, ElementDraft, ElementID, ElementKind};
pub use patch::{ElementPatch, PatchError};
pub use template::Template;
