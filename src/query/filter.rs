use serde::{Deserialize, Serialize};

/// Which taxonomy a genus/species filter addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenusDimension {
    Botanical,
    Common,
}

impl GenusDimension {
    /// Query parameter carrying the genus value for this dimension
    pub fn genus_field(&self) -> &'static str {
        match self {
            GenusDimension::Botanical => "botanical_genus",
            GenusDimension::Common => "common_genus",
        }
    }

    /// Query parameter carrying the species value for this dimension
    pub fn species_field(&self) -> &'static str {
        match self {
            GenusDimension::Botanical => "botanical_species",
            GenusDimension::Common => "common_species",
        }
    }

    /// Key under which the overview service enumerates this dimension
    pub fn overview_key(&self) -> &'static str {
        self.genus_field()
    }
}

impl std::fmt::Display for GenusDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenusDimension::Botanical => write!(f, "botanical"),
            GenusDimension::Common => write!(f, "common"),
        }
    }
}

/// Active taxonomic filter selections. Owned by the UI layer; the scheduler
/// reads a snapshot at cycle start, and that snapshot travels with the cycle
/// so requests and their responses always agree even if the UI changes the
/// selection mid-flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub dimension: Option<GenusDimension>,
    pub genus: Option<String>,
    pub species: Option<String>,
}

impl FilterState {
    /// The effective genus filter: present only when both a dimension and a
    /// genus value are selected
    pub fn genus_selection(&self) -> Option<(GenusDimension, &str)> {
        match (self.dimension, self.genus.as_deref()) {
            (Some(dimension), Some(genus)) if !genus.is_empty() => Some((dimension, genus)),
            _ => None,
        }
    }

    /// The effective species filter. A species selection is only meaningful
    /// under a chosen genus; without one it is ignored.
    pub fn species_selection(&self) -> Option<(GenusDimension, &str)> {
        let (dimension, _) = self.genus_selection()?;
        match self.species.as_deref() {
            Some(species) if !species.is_empty() => Some((dimension, species)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_per_dimension() {
        assert_eq!(GenusDimension::Botanical.genus_field(), "botanical_genus");
        assert_eq!(
            GenusDimension::Botanical.species_field(),
            "botanical_species"
        );
        assert_eq!(GenusDimension::Common.genus_field(), "common_genus");
        assert_eq!(GenusDimension::Common.species_field(), "common_species");
    }

    #[test]
    fn test_species_requires_genus() {
        let orphan_species = FilterState {
            dimension: None,
            genus: None,
            species: Some("Acer pseudoplatanus".to_string()),
        };
        assert_eq!(orphan_species.genus_selection(), None);
        assert_eq!(orphan_species.species_selection(), None);

        // A dimension alone is not a genus selection either.
        let dimension_only = FilterState {
            dimension: Some(GenusDimension::Botanical),
            genus: None,
            species: Some("Acer pseudoplatanus".to_string()),
        };
        assert_eq!(dimension_only.species_selection(), None);
    }

    #[test]
    fn test_full_selection() {
        let filter = FilterState {
            dimension: Some(GenusDimension::Common),
            genus: Some("Maple".to_string()),
            species: Some("Sugar Maple".to_string()),
        };
        assert_eq!(
            filter.genus_selection(),
            Some((GenusDimension::Common, "Maple"))
        );
        assert_eq!(
            filter.species_selection(),
            Some((GenusDimension::Common, "Sugar Maple"))
        );
    }
}
