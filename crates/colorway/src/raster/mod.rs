//! Software raster surfaces and drawing primitives
//!
//! All procedural texture content is drawn into CPU-side RGBA surfaces with
//! a small set of imperative primitives: solid fills, organic bezier blob
//! fills, radial/linear gradient passes, full-bleed image draws, and a
//! sharpening convolution. Surfaces are uploaded to the render device by the
//! caller once drawing is complete.

pub mod blob;
pub mod filter;
pub mod gradient;
pub mod surface;

pub use blob::Blob;
pub use gradient::ColorStop;
pub use surface::{Blend, Surface};
