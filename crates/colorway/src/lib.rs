//! # Colorway
//!
//! A real-time surface-customization engine for 3D product models:
//! procedural texture synthesis plus flicker-free, leak-free material
//! mutation on a live render graph.
//!
//! ## Features
//!
//! - **Texture Synthesis**: flat fills, baked contact shading, brush-stroke
//!   gradients, stochastic splatter, and external raster images
//! - **Content-Addressed Caching**: identical parameters always resolve to
//!   the same texture object, so switching effects never re-synthesizes
//! - **Persistent Materials**: one material per mesh part for the whole
//!   session, mutated in place, rebound only on real identity changes
//! - **Pop-Free Logo Decals**: per-part canvases that are redrawn and
//!   re-uploaded, never reference-swapped
//! - **Deferred Disposal**: displaced GPU resources are freed after a delay
//!   with a liveness re-check, never out from under a frame in flight
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use colorway::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut studio = Studio::new(HeadlessDevice::new());
//!
//!     // The host hands over its already-loaded model
//!     studio.attach_model(ModelGraph::new(vec![
//!         MeshPart::new("upper_main", PartMaterial::new("upper_main", Rgba::rgb(215, 215, 215))),
//!         MeshPart::new("sole_main", PartMaterial::new("sole_main", Rgba::rgb(230, 230, 230))),
//!     ]));
//!
//!     // Edit the surface
//!     studio.set_base_color(PartZone::Upper, "#4A90D9")?;
//!     studio.set_splatter(PartZone::Sole, SplatterParams::single(Rgba::rgb(20, 20, 20)))?;
//!     studio.set_logo_colors("#C8102E", "#FFFFFF", "#1D1D1B")?;
//!
//!     // Drive deferred work from the host's render loop
//!     studio.update(Duration::from_millis(16));
//!
//!     // Dispose everything at unmount
//!     studio.teardown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod device;
pub mod foundation;
pub mod raster;
pub mod scene;
pub mod synthesis;

mod studio;

pub use studio::{Studio, StudioError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{GradientParams, LogoStyle, PartFinish, SplatterParams, StudioConfig},
        device::{HeadlessDevice, RenderDevice},
        foundation::color::Rgba,
        scene::{MeshPart, ModelGraph, PartMaterial},
        synthesis::PartZone,
        Studio, StudioError,
    };
}
