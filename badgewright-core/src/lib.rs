pub mod color;
pub mod commands;
pub mod controller;
pub mod factory;
pub mod id;
pub mod images;
pub mod panels;
pub mod queue;
pub mod state;
pub mod store;
pub mod surface;
pub mod units;

pub use color::Color;
pub use id::LocalID;
