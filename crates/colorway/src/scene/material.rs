//! Part materials and texture attachments
//!
//! A [`PartMaterial`] is the engine's persistent material for one mesh part:
//! cloned from the part's original material on first touch so unrelated
//! shading attributes survive, then mutated in place for the rest of the
//! session. Texture attachments compare by object identity, and the only way
//! to replace one is [`PartMaterial::set_map`], which reports the displaced
//! attachment so it can be scheduled for deferred disposal.

use std::sync::Arc;

use crate::device::{DeviceMaterialId, DeviceTextureId};
use crate::foundation::color::Rgba;
use crate::scene::mesh::HostTexture;
use crate::synthesis::SynthesizedTexture;

/// Unique identifier for engine materials
///
/// Id 0 is reserved for "not yet registered".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// A texture bound to a material's color slot
#[derive(Debug, Clone)]
pub enum TextureAttachment {
    /// A cached synthesized texture, shared by reference
    Synthesized(Arc<SynthesizedTexture>),
    /// A host-owned texture from the original asset
    Host(HostTexture),
    /// A persistent logo canvas, identified by its device texture
    Canvas(DeviceTextureId),
}

impl TextureAttachment {
    /// Device texture backing this attachment, where the engine owns one
    pub fn device_texture(&self) -> Option<DeviceTextureId> {
        match self {
            Self::Synthesized(texture) => Some(texture.device_texture()),
            Self::Canvas(id) => Some(*id),
            Self::Host(_) => None,
        }
    }
}

impl PartialEq for TextureAttachment {
    /// Identity comparison: synthesized textures compare by shared
    /// allocation, canvases by device handle, host textures structurally
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Synthesized(a), Self::Synthesized(b)) => Arc::ptr_eq(a, b),
            (Self::Canvas(a), Self::Canvas(b)) => a == b,
            (Self::Host(a), Self::Host(b)) => a == b,
            _ => false,
        }
    }
}

/// Persistent material for one mesh part
#[derive(Debug, Clone)]
pub struct PartMaterial {
    id: MaterialId,
    device: Option<DeviceMaterialId>,
    name: String,
    /// Base color multiplier; forced to white while a texture is attached
    pub base_color: Rgba,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Whether alpha blending is enabled
    pub transparent: bool,
    map: Option<TextureAttachment>,
}

impl PartMaterial {
    /// Create a plain material with sensible shading defaults
    pub fn new(name: impl Into<String>, base_color: Rgba) -> Self {
        Self {
            id: MaterialId(0),
            device: None,
            name: name.into(),
            base_color,
            roughness: 0.5,
            metallic: 0.0,
            transparent: false,
            map: None,
        }
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Set the metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    /// Attach a host texture (used when describing original materials)
    pub fn with_host_texture(mut self, texture: HostTexture) -> Self {
        self.map = Some(TextureAttachment::Host(texture));
        self
    }

    /// Engine material id; 0 until registered by the binder
    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// Device-side material resources, once registered
    pub fn device_id(&self) -> Option<DeviceMaterialId> {
        self.device
    }

    /// Material name (the part name it is bound to)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currently attached texture
    pub fn map(&self) -> Option<&TextureAttachment> {
        self.map.as_ref()
    }

    /// Replace the texture attachment, comparing by identity
    ///
    /// Returns the displaced attachment when the identity actually changed,
    /// `None` when the new attachment is the same object (no-op). This is
    /// the only mutation path for the attachment slot.
    pub fn set_map(&mut self, map: Option<TextureAttachment>) -> Option<TextureAttachment> {
        if self.map == map {
            return None;
        }
        std::mem::replace(&mut self.map, map)
    }

    pub(crate) fn assign_id(&mut self, id: MaterialId) {
        self.id = id;
    }

    pub(crate) fn assign_device(&mut self, device: DeviceMaterialId) {
        self.device = Some(device);
    }
}
