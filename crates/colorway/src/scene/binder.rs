//! Persistent material binding
//!
//! Owns exactly one [`PartMaterial`] per touched part name for the life of
//! the session. An update pass classifies parts, clones the original
//! material on first touch, lets the caller mutate the persistent clone in
//! place, and rebinds the part's material slot only when the bound identity
//! actually changed. Displaced texture attachments go through the deferred
//! disposal queue rather than being freed immediately.

use std::collections::HashMap;

use crate::device::RenderDevice;
use crate::scene::category::{classify, PartCategory};
use crate::scene::disposal::DisposalQueue;
use crate::scene::material::{MaterialId, PartMaterial, TextureAttachment};
use crate::scene::mesh::ModelGraph;
use crate::synthesis::TextureCache;

/// Owner of the session's persistent part materials
#[derive(Debug, Default)]
pub struct MaterialBinder {
    materials: HashMap<String, PartMaterial>,
    next_id: u32,
    disposal: DisposalQueue,
}

impl MaterialBinder {
    /// Create a binder with no materials yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update to every part of the given category
    ///
    /// For each matching part the update closure receives the part name, its
    /// persistent material (cloned from the original on first touch), and
    /// the render device; it returns the attachment it displaced, if any.
    /// Returns the number of parts touched.
    pub fn apply_to_parts<D, F>(
        &mut self,
        model: &mut ModelGraph,
        category: PartCategory,
        device: &mut D,
        now: f64,
        mut update: F,
    ) -> usize
    where
        D: RenderDevice,
        F: FnMut(&str, &mut PartMaterial, &mut D) -> Option<TextureAttachment>,
    {
        let mut touched = 0;
        for part in model.parts_mut() {
            if classify(part.name()) != Some(category) {
                continue;
            }

            let next_id = &mut self.next_id;
            let material = self
                .materials
                .entry(part.name().to_string())
                .or_insert_with(|| {
                    *next_id += 1;
                    let mut material = part.original().clone();
                    material.assign_id(MaterialId(*next_id));
                    material.assign_device(device.create_material(part.name()));
                    log::debug!(
                        "cloned persistent material {:?} for part '{}'",
                        material.id(),
                        part.name()
                    );
                    material
                });

            if let Some(displaced) = update(part.name(), material, device) {
                self.disposal.schedule(displaced, now);
            }

            if part.bind_material(material.id()) {
                log::trace!("rebound part '{}' to material {:?}", part.name(), material.id());
            }
            touched += 1;
        }
        touched
    }

    /// Persistent material for a part, if it has been touched
    pub fn material(&self, part_name: &str) -> Option<&PartMaterial> {
        self.materials.get(part_name)
    }

    /// Mutable access to a part's persistent material
    pub fn material_mut(&mut self, part_name: &str) -> Option<&mut PartMaterial> {
        self.materials.get_mut(part_name)
    }

    /// Number of persistent materials created so far
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of displaced attachments awaiting disposal
    pub fn pending_disposal_count(&self) -> usize {
        self.disposal.pending_count()
    }

    /// Free displaced resources whose disposal delay has elapsed
    ///
    /// Each candidate is re-checked for liveness right before freeing: an
    /// attachment still owned by the texture cache, or still referenced by
    /// any persistent material, is left alone. Host textures and logo
    /// canvases are never freed here (the host and the logo bank own them).
    pub fn pump_disposals<D: RenderDevice>(
        &mut self,
        cache: &TextureCache,
        device: &mut D,
        now: f64,
    ) {
        for attachment in self.disposal.drain_due(now) {
            let TextureAttachment::Synthesized(texture) = attachment else {
                continue;
            };
            let id = texture.device_texture();
            if cache.owns_device_texture(id) {
                log::trace!("disposal skipped: {id:?} still cache-owned");
                continue;
            }
            if self
                .materials
                .values()
                .any(|m| m.map().and_then(TextureAttachment::device_texture) == Some(id))
            {
                log::trace!("disposal skipped: {id:?} still referenced by a material");
                continue;
            }
            device.destroy_texture(id);
            log::debug!("freed displaced texture {id:?}");
        }
    }

    /// Destroy every persistent material and drop pending disposals
    ///
    /// Texture disposal happens at the owning side (cache drain, logo bank
    /// teardown); here only the per-material device resources go away.
    pub fn teardown<D: RenderDevice>(&mut self, model: Option<&mut ModelGraph>, device: &mut D) {
        for (name, material) in self.materials.drain() {
            if let Some(id) = material.device_id() {
                device.destroy_material(id);
            }
            log::debug!("disposed persistent material for part '{name}'");
        }
        self.disposal.clear();
        if let Some(model) = model {
            for part in model.parts_mut() {
                part.unbind();
            }
        }
    }
}
