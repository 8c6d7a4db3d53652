//! Frame-driven engine for indicator pulses and tap ripples.
//!
//! The host supplies target bounds and a tick; the engine answers with one
//! [`DrawRecord`] per visible shape. Nothing here touches a drawing surface.

pub mod config;
pub mod constants;
pub mod effect;
pub mod geometry;
pub mod interpolate;
pub mod render;
pub mod shape;

pub use config::*;
pub use constants::*;
pub use effect::*;
pub use geometry::*;
pub use interpolate::*;
pub use render::*;
pub use shape::*;
