//! Render device abstraction
//!
//! The engine never talks to a GPU API directly; the host render graph is an
//! external collaborator behind this trait. The engine creates textures from
//! finished raster surfaces, re-uploads pixel data into textures it already
//! owns (identity preserved), and destroys what it created at teardown.

use std::collections::HashMap;

use crate::raster::Surface;

/// Opaque handle to a texture owned by the render device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceTextureId(pub u64);

/// Opaque handle to per-material GPU resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceMaterialId(pub u64);

/// Interface to the host's rendering backend
///
/// Implementations upload RGBA8 surfaces and manage their GPU lifetime. The
/// engine guarantees it destroys each id it created exactly once and never
/// touches an id after destroying it.
pub trait RenderDevice {
    /// Upload a surface as a new texture and return its handle
    fn create_texture(&mut self, surface: &Surface) -> DeviceTextureId;

    /// Re-upload pixel data into an existing texture
    ///
    /// The handle stays valid and bound wherever it is referenced; only the
    /// pixel contents change. This is the flicker-free update path.
    fn update_texture(&mut self, id: DeviceTextureId, surface: &Surface);

    /// Free a texture created by [`RenderDevice::create_texture`]
    fn destroy_texture(&mut self, id: DeviceTextureId);

    /// Allocate per-material GPU resources for a named material
    fn create_material(&mut self, name: &str) -> DeviceMaterialId;

    /// Free material resources created by [`RenderDevice::create_material`]
    fn destroy_material(&mut self, id: DeviceMaterialId);
}

/// Headless device for tests and server-side use
///
/// Tracks every handle it hands out, counts uploads, and flags invalid frees,
/// so resource-discipline properties (exactly-once disposal, no
/// use-after-free) are directly observable.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_id: u64,
    live_textures: HashMap<DeviceTextureId, TextureRecord>,
    live_materials: HashMap<DeviceMaterialId, String>,
    destroyed_textures: Vec<DeviceTextureId>,
    destroyed_materials: Vec<DeviceMaterialId>,
    invalid_operations: u32,
}

/// Bookkeeping for a live headless texture
#[derive(Debug)]
struct TextureRecord {
    width: u32,
    height: u32,
    update_count: u64,
    content_hash: u64,
}

impl HeadlessDevice {
    /// Create an empty headless device
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently live
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    /// Number of materials currently live
    pub fn live_material_count(&self) -> usize {
        self.live_materials.len()
    }

    /// Whether a texture id is currently live
    pub fn is_texture_live(&self, id: DeviceTextureId) -> bool {
        self.live_textures.contains_key(&id)
    }

    /// How many times a live texture has been re-uploaded
    pub fn texture_update_count(&self, id: DeviceTextureId) -> u64 {
        self.live_textures.get(&id).map_or(0, |r| r.update_count)
    }

    /// Content hash of the last upload for a live texture
    pub fn texture_content_hash(&self, id: DeviceTextureId) -> Option<u64> {
        self.live_textures.get(&id).map(|r| r.content_hash)
    }

    /// Dimensions of a live texture
    pub fn texture_dimensions(&self, id: DeviceTextureId) -> Option<(u32, u32)> {
        self.live_textures.get(&id).map(|r| (r.width, r.height))
    }

    /// Ids destroyed so far, in destruction order
    pub fn destroyed_textures(&self) -> &[DeviceTextureId] {
        &self.destroyed_textures
    }

    /// Materials destroyed so far, in destruction order
    pub fn destroyed_materials(&self) -> &[DeviceMaterialId] {
        &self.destroyed_materials
    }

    /// Count of operations on dead or unknown handles
    ///
    /// Stays zero in a correct session; any double free or use-after-free
    /// increments it.
    pub fn invalid_operation_count(&self) -> u32 {
        self.invalid_operations
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_texture(&mut self, surface: &Surface) -> DeviceTextureId {
        let id = DeviceTextureId(self.next());
        self.live_textures.insert(
            id,
            TextureRecord {
                width: surface.width(),
                height: surface.height(),
                update_count: 0,
                content_hash: surface.content_hash(),
            },
        );
        log::debug!(
            "created texture {:?} ({}x{})",
            id,
            surface.width(),
            surface.height()
        );
        id
    }

    fn update_texture(&mut self, id: DeviceTextureId, surface: &Surface) {
        match self.live_textures.get_mut(&id) {
            Some(record) => {
                record.update_count += 1;
                record.content_hash = surface.content_hash();
                record.width = surface.width();
                record.height = surface.height();
            }
            None => {
                log::warn!("update of dead texture {id:?}");
                self.invalid_operations += 1;
            }
        }
    }

    fn destroy_texture(&mut self, id: DeviceTextureId) {
        if self.live_textures.remove(&id).is_some() {
            self.destroyed_textures.push(id);
            log::debug!("destroyed texture {id:?}");
        } else {
            log::warn!("double free of texture {id:?}");
            self.invalid_operations += 1;
        }
    }

    fn create_material(&mut self, name: &str) -> DeviceMaterialId {
        let id = DeviceMaterialId(self.next());
        self.live_materials.insert(id, name.to_string());
        log::debug!("created material resources {id:?} for part '{name}'");
        id
    }

    fn destroy_material(&mut self, id: DeviceMaterialId) {
        if self.live_materials.remove(&id).is_some() {
            self.destroyed_materials.push(id);
            log::debug!("destroyed material resources {id:?}");
        } else {
            log::warn!("double free of material {id:?}");
            self.invalid_operations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Rgba;

    #[test]
    fn test_texture_lifecycle() {
        let mut device = HeadlessDevice::new();
        let surface = Surface::filled(4, 4, Rgba::WHITE);
        let id = device.create_texture(&surface);
        assert!(device.is_texture_live(id));

        device.update_texture(id, &Surface::filled(4, 4, Rgba::BLACK));
        assert_eq!(device.texture_update_count(id), 1);

        device.destroy_texture(id);
        assert!(!device.is_texture_live(id));
        assert_eq!(device.invalid_operation_count(), 0);
    }

    #[test]
    fn test_double_free_is_flagged() {
        let mut device = HeadlessDevice::new();
        let id = device.create_texture(&Surface::filled(1, 1, Rgba::WHITE));
        device.destroy_texture(id);
        device.destroy_texture(id);
        assert_eq!(device.invalid_operation_count(), 1);
    }

    #[test]
    fn test_update_tracks_content() {
        let mut device = HeadlessDevice::new();
        let before = Surface::filled(2, 2, Rgba::WHITE);
        let id = device.create_texture(&before);
        let initial_hash = device.texture_content_hash(id);

        device.update_texture(id, &Surface::filled(2, 2, Rgba::BLACK));
        assert_ne!(device.texture_content_hash(id), initial_hash);
    }
}
