//! Mesh-part classification and the persistent-material update protocol
//!
//! The scene layer owns exactly one persistent material per touched mesh
//! part. Updates mutate those materials in place and rebind a part's
//! material slot only when the resolved object identity actually changes,
//! which is what keeps edits flicker-free on the live render graph.

pub mod binder;
pub mod category;
pub mod disposal;
pub mod logo;
pub mod material;
pub mod mesh;

pub use binder::MaterialBinder;
pub use category::{classify, PartCategory};
pub use logo::{LogoArtwork, LogoBank};
pub use material::{MaterialId, PartMaterial, TextureAttachment};
pub use mesh::{HostTexture, MeshPart, ModelGraph, UvTransform, WrapMode};
