//! Mesh-part classification
//!
//! Part categories are inferred from mesh names with case-insensitive
//! substring rules. Parts matching no category are simply left untouched by
//! every update pass; that is expected for helper meshes (ground planes,
//! collision proxies) and is not an error.

use crate::synthesis::PartZone;

/// Name markers identifying sole parts
const SOLE_MARKERS: [&str; 2] = ["bottom", "sole"];

/// Name markers identifying upper parts
const UPPER_MARKERS: [&str; 2] = ["top", "upper"];

/// Name markers identifying lace parts
const LACE_MARKERS: [&str; 6] = ["lace", "string", "shoelace", "cord", "tie", "eyelet"];

/// Name markers identifying logo parts
const LOGO_MARKERS: [&str; 6] = ["logo", "brand", "emblem", "swoosh", "mark", "badge"];

/// Semantic grouping of mesh parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartCategory {
    /// Upper body of the model
    Upper,
    /// Sole / bottom of the model
    Sole,
    /// Laces, cords, and eyelets
    Lace,
    /// Logo decal carriers
    Logo,
}

impl PartCategory {
    /// The synthesis zone for categories that receive part finishes
    pub fn zone(self) -> Option<PartZone> {
        match self {
            Self::Upper => Some(PartZone::Upper),
            Self::Sole => Some(PartZone::Sole),
            Self::Lace | Self::Logo => None,
        }
    }
}

fn matches_any(name: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| name.contains(marker))
}

/// Classify a mesh name into a part category
///
/// Upper markers yield to logo markers: a part named `top_logo` carries the
/// logo decal, not the upper finish.
pub fn classify(name: &str) -> Option<PartCategory> {
    let name = name.to_ascii_lowercase();
    if matches_any(&name, &SOLE_MARKERS) {
        Some(PartCategory::Sole)
    } else if matches_any(&name, &UPPER_MARKERS) && !matches_any(&name, &LOGO_MARKERS) {
        Some(PartCategory::Upper)
    } else if matches_any(&name, &LACE_MARKERS) {
        Some(PartCategory::Lace)
    } else if matches_any(&name, &LOGO_MARKERS) {
        Some(PartCategory::Logo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sole_names() {
        assert_eq!(classify("shoe_bottom"), Some(PartCategory::Sole));
        assert_eq!(classify("Sole_Left"), Some(PartCategory::Sole));
    }

    #[test]
    fn test_upper_names() {
        assert_eq!(classify("upper_mesh"), Some(PartCategory::Upper));
        assert_eq!(classify("TOP_PANEL"), Some(PartCategory::Upper));
    }

    #[test]
    fn test_logo_wins_over_upper() {
        assert_eq!(classify("top_logo"), Some(PartCategory::Logo));
        assert_eq!(classify("upper_swoosh"), Some(PartCategory::Logo));
    }

    #[test]
    fn test_lace_names() {
        for name in ["lace_l", "shoestring", "cord01", "tie", "eyelet_ring"] {
            assert_eq!(classify(name), Some(PartCategory::Lace), "{name}");
        }
    }

    #[test]
    fn test_logo_names() {
        for name in ["side_logo", "brand_plate", "emblem", "trademark", "badge2"] {
            assert_eq!(classify(name), Some(PartCategory::Logo), "{name}");
        }
    }

    #[test]
    fn test_unmatched_names_pass_through() {
        assert_eq!(classify("ground_plane"), None);
        assert_eq!(classify("collision_proxy"), None);
    }

    #[test]
    fn test_zone_mapping() {
        assert_eq!(PartCategory::Upper.zone(), Some(PartZone::Upper));
        assert_eq!(PartCategory::Sole.zone(), Some(PartZone::Sole));
        assert_eq!(PartCategory::Lace.zone(), None);
        assert_eq!(PartCategory::Logo.zone(), None);
    }
}
