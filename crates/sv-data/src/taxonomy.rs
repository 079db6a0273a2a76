//! Closed lookup tables for species names and family colors

use ahash::AHashMap;
use once_cell::sync::Lazy;
use sv_core::ColorTag;
use thiserror::Error;

/// Link target used when no species was recorded
pub const FALLBACK_DETAIL_LINK: &str = "cetacea";

/// Keys outside the closed tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("species '{0}' has no common name mapping")]
    UnmappedSpecies(String),

    #[error("family '{0}' has no color mapping")]
    UnmappedFamily(String),
}

static COMMON_NAMES: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    AHashMap::from_iter([
        ("Megaptera novaeangliae", "humpback whale"),
        ("Physeter macrocephalus", "cachalot"),
        ("Orcinus orca", "killer whale"),
        ("Pseudorca crassidens", "false killer whale"),
        ("Stenella coeruleoalba", "striped dolphin"),
        ("Tursiops truncatus", "common bottlenose dolphin"),
        ("Stenella longirostris", "spinner dolphin"),
        ("Peponocephala electra", "electra dolphin"),
        ("Dugong dugon", "dugong"),
        ("Balaenoptera acutorostrata", "common minke whale"),
        ("Eubalaena australis", "southern right whale"),
        ("Globicephala melas", "long-finned pilot whale"),
        ("Balaenoptera musculus", "blue whale"),
        ("Balaenoptera physalus", "fin whale"),
        ("Globicephala macrorhynchus", "short-finned pilot whale"),
        ("Balaenoptera borealis", "sei whale"),
        ("Delphinus delphis", "short-beaked common dolphin"),
        ("Balaenoptera edeni", "bryde's whale"),
        ("Grampus griseus", "risso's dolphin"),
        ("Feresa attenuata", "pygmy killer whale"),
        ("Hyperoodon planifrons", "southern bottlenose whale"),
        ("Caperea marginata", "pygmy right whale"),
    ])
});

static FAMILY_COLORS: Lazy<AHashMap<&'static str, ColorTag>> = Lazy::new(|| {
    AHashMap::from_iter([
        ("Balaenopteridae", ColorTag::Blue),
        ("Physeteridae", ColorTag::Yellow),
        ("Delphinidae", ColorTag::Red),
        ("Dugongidae", ColorTag::Purple),
        ("Balaenidae", ColorTag::Blue),
        ("Hyperoodontidae", ColorTag::Green),
        ("Neobalaenidae", ColorTag::Blue),
    ])
});

/// Common name for a species; no species recorded maps to `""`
pub fn common_name_for(species: Option<&str>) -> Result<&'static str, TaxonomyError> {
    match species {
        None => Ok(""),
        Some(name) => COMMON_NAMES
            .get(name)
            .copied()
            .ok_or_else(|| TaxonomyError::UnmappedSpecies(name.to_string())),
    }
}

/// Display color for a family
pub fn color_tag_for(family: &str) -> Result<ColorTag, TaxonomyError> {
    FAMILY_COLORS
        .get(family)
        .copied()
        .ok_or_else(|| TaxonomyError::UnmappedFamily(family.to_string()))
}

/// Encyclopedia slug for a species
pub fn detail_link_for(species: Option<&str>) -> String {
    match species {
        Some(name) => name.replace(' ', "_"),
        None => FALLBACK_DETAIL_LINK.to_string(),
    }
}

/// Every family with a color mapping, sorted
pub fn known_families() -> Vec<&'static str> {
    let mut families: Vec<&'static str> = FAMILY_COLORS.keys().copied().collect();
    families.sort_unstable();
    families
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_has_exactly_one_color() {
        let families = known_families();
        assert_eq!(families.len(), 7);
        for family in families {
            assert!(color_tag_for(family).is_ok(), "{}", family);
        }
        assert_eq!(color_tag_for("Balaenopteridae"), Ok(ColorTag::Blue));
        assert_eq!(color_tag_for("Dugongidae"), Ok(ColorTag::Purple));
    }

    #[test]
    fn test_unmapped_family_is_an_error() {
        assert_eq!(
            color_tag_for("Ziphiidae"),
            Err(TaxonomyError::UnmappedFamily("Ziphiidae".into()))
        );
        // Lookup is exact
        assert!(color_tag_for("delphinidae").is_err());
    }

    #[test]
    fn test_common_names() {
        assert_eq!(common_name_for(Some("Orcinus orca")), Ok("killer whale"));
        assert_eq!(common_name_for(None), Ok(""));
        assert_eq!(
            common_name_for(Some("Monodon monoceros")),
            Err(TaxonomyError::UnmappedSpecies("Monodon monoceros".into()))
        );
    }

    #[test]
    fn test_detail_links() {
        assert_eq!(detail_link_for(Some("Megaptera novaeangliae")), "Megaptera_novaeangliae");
        assert_eq!(detail_link_for(None), FALLBACK_DETAIL_LINK);
    }
}
