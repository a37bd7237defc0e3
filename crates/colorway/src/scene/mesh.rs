//! Mesh-graph handle types
//!
//! The geometry pipeline is out of scope; the host hands the engine a
//! [`ModelGraph`] describing the already-loaded model: named parts, each
//! with the material the asset shipped with. The engine mutates material
//! bindings on these parts and nothing else.

use crate::scene::material::{MaterialId, PartMaterial};

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Repeat the texture
    #[default]
    Repeat,
    /// Mirror the texture
    MirroredRepeat,
    /// Clamp to edge
    ClampToEdge,
}

/// UV-transform parameters carried by a texture binding
///
/// Copied from a part's original texture onto the persistent logo canvas so
/// the decal lands exactly where the asset's texture did.
#[derive(Debug, Clone, PartialEq)]
pub struct UvTransform {
    /// Wrapping mode
    pub wrap_mode: WrapMode,
    /// Repeat factor per axis
    pub repeat: [f32; 2],
    /// UV offset
    pub offset: [f32; 2],
    /// Rotation center
    pub center: [f32; 2],
    /// Rotation in radians
    pub rotation: f32,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            wrap_mode: WrapMode::Repeat,
            repeat: [1.0, 1.0],
            offset: [0.0, 0.0],
            center: [0.0, 0.0],
            rotation: 0.0,
        }
    }
}

/// Descriptor of a host-owned texture on an original material
///
/// The engine never creates or destroys these; it only reads their
/// resolution and UV transform when allocating a persistent logo canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct HostTexture {
    /// Texture width in pixels
    pub width: u32,
    /// Texture height in pixels
    pub height: u32,
    /// UV transform to carry over
    pub uv: UvTransform,
}

/// A named part of the loaded model
#[derive(Debug)]
pub struct MeshPart {
    name: String,
    original: PartMaterial,
    material: Option<MaterialId>,
}

impl MeshPart {
    /// Describe a part by name and the material the asset shipped with
    pub fn new(name: impl Into<String>, original: PartMaterial) -> Self {
        Self {
            name: name.into(),
            original,
            material: None,
        }
    }

    /// Part name, as authored in the asset
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The material the asset shipped with
    pub fn original(&self) -> &PartMaterial {
        &self.original
    }

    /// Currently bound engine material, if any
    pub fn bound_material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Bind an engine material; returns whether the binding actually changed
    ///
    /// Rebinding the already-bound id is a no-op, which is what keeps
    /// repeated updates from churning the render graph.
    pub fn bind_material(&mut self, id: MaterialId) -> bool {
        if self.material == Some(id) {
            false
        } else {
            self.material = Some(id);
            true
        }
    }

    /// Drop the engine binding, restoring the part to its original material
    pub(crate) fn unbind(&mut self) {
        self.material = None;
    }
}

/// Handle to the loaded model's named parts
#[derive(Debug, Default)]
pub struct ModelGraph {
    parts: Vec<MeshPart>,
}

impl ModelGraph {
    /// Build a graph from the host's part list
    pub fn new(parts: Vec<MeshPart>) -> Self {
        Self { parts }
    }

    /// All parts in asset order
    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    /// Mutable access to all parts
    pub fn parts_mut(&mut self) -> &mut [MeshPart] {
        &mut self.parts
    }

    /// Look up a part by name
    pub fn part(&self, name: &str) -> Option<&MeshPart> {
        self.parts.iter().find(|p| p.name() == name)
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the graph has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Rgba;

    #[test]
    fn test_bind_material_reports_identity_changes() {
        let mut part = MeshPart::new("upper", PartMaterial::new("upper", Rgba::WHITE));
        assert!(part.bind_material(MaterialId(1)));
        assert!(!part.bind_material(MaterialId(1)));
        assert!(part.bind_material(MaterialId(2)));
        assert_eq!(part.bound_material(), Some(MaterialId(2)));
    }

    #[test]
    fn test_graph_lookup() {
        let graph = ModelGraph::new(vec![
            MeshPart::new("upper", PartMaterial::new("upper", Rgba::WHITE)),
            MeshPart::new("sole", PartMaterial::new("sole", Rgba::BLACK)),
        ]);
        assert_eq!(graph.len(), 2);
        assert!(graph.part("sole").is_some());
        assert!(graph.part("missing").is_none());
    }
}
