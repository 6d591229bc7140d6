//! Species catalog.
//!
//! The built-in catalog holds Colombian river fish. Custom catalogs go
//! through [`FishCatalog::new`], which rejects malformed entries up front so
//! the sampler never has to.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::types::{FishRarity, FishSpecies, SizeRange};

/// Errors raised when building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no species")]
    Empty,
    #[error("catalog needs at least one common species to fall back on")]
    NoCommonSpecies,
    #[error("duplicate species id `{0}`")]
    DuplicateId(String),
    #[error("species `{id}` has difficulty {difficulty}, expected 1-10")]
    Difficulty { id: String, difficulty: u8 },
    #[error("species `{id}` has an invalid {field} range ({min:.2}..{max:.2})")]
    Range {
        id: String,
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("species `{0}` must be worth at least one point")]
    BasePoints(String),
}

/// Immutable set of species, bucketed by rarity.
#[derive(Debug, Clone)]
pub struct FishCatalog {
    species: Vec<FishSpecies>,
    by_rarity: [Vec<usize>; 4],
}

impl FishCatalog {
    pub fn new(species: Vec<FishSpecies>) -> Result<Self, CatalogError> {
        if species.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for entry in &species {
            validate_species(entry)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }

        let catalog = Self::bucketed(species);
        if catalog.count_by_rarity(FishRarity::Common) == 0 {
            return Err(CatalogError::NoCommonSpecies);
        }
        Ok(catalog)
    }

    /// The built-in river catalog.
    pub fn colombian_rivers() -> Self {
        Self::bucketed(colombian_species())
    }

    fn bucketed(species: Vec<FishSpecies>) -> Self {
        let mut by_rarity: [Vec<usize>; 4] = Default::default();
        for (index, entry) in species.iter().enumerate() {
            by_rarity[entry.rarity as usize].push(index);
        }
        Self { species, by_rarity }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn species(&self) -> &[FishSpecies] {
        &self.species
    }

    pub fn get(&self, id: &str) -> Option<&FishSpecies> {
        self.species.iter().find(|s| s.id == id)
    }

    /// Species of one rarity, in catalog order.
    pub fn by_rarity(&self, rarity: FishRarity) -> impl Iterator<Item = &FishSpecies> + '_ {
        self.by_rarity[rarity as usize]
            .iter()
            .map(move |&index| &self.species[index])
    }

    pub fn count_by_rarity(&self, rarity: FishRarity) -> usize {
        self.by_rarity[rarity as usize].len()
    }

    /// Picks the `n`th species of a rarity bucket.
    pub(crate) fn nth_of_rarity(&self, rarity: FishRarity, n: usize) -> Option<&FishSpecies> {
        self.by_rarity[rarity as usize]
            .get(n)
            .map(|&index| &self.species[index])
    }
}

impl Default for FishCatalog {
    fn default() -> Self {
        Self::colombian_rivers()
    }
}

fn validate_species(entry: &FishSpecies) -> Result<(), CatalogError> {
    if !(1..=10).contains(&entry.difficulty) {
        return Err(CatalogError::Difficulty {
            id: entry.id.clone(),
            difficulty: entry.difficulty,
        });
    }
    for (field, range) in [("weight", entry.weight), ("length", entry.length)] {
        if !(range.min > 0.0 && range.min <= range.max && range.max.is_finite()) {
            return Err(CatalogError::Range {
                id: entry.id.clone(),
                field,
                min: range.min,
                max: range.max,
            });
        }
    }
    if entry.base_points == 0 {
        return Err(CatalogError::BasePoints(entry.id.clone()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn species(
    id: &str,
    name: &str,
    scientific_name: &str,
    rarity: FishRarity,
    difficulty: u8,
    weight: (f64, f64),
    length: (f64, f64),
    base_points: u32,
    habitat: &str,
    description: &str,
    color: &str,
) -> FishSpecies {
    FishSpecies {
        id: id.to_string(),
        name: name.to_string(),
        scientific_name: scientific_name.to_string(),
        rarity,
        difficulty,
        weight: SizeRange::new(weight.0, weight.1),
        length: SizeRange::new(length.0, length.1),
        base_points,
        habitat: habitat.to_string(),
        description: description.to_string(),
        metadata: BTreeMap::from([("color".to_string(), color.to_string())]),
    }
}

fn colombian_species() -> Vec<FishSpecies> {
    vec![
        species(
            "bocachico",
            "Bocachico",
            "Prochilodus magdalenae",
            FishRarity::Common,
            2,
            (0.8, 2.5),
            (25.0, 45.0),
            150,
            "Magdalena, Cauca and Sinú rivers",
            "Migratory staple of artisanal fishing along the Magdalena.",
            "#DAA520",
        ),
        species(
            "sabalo",
            "Sábalo",
            "Brycon moorei",
            FishRarity::Common,
            4,
            (1.2, 5.0),
            (30.0, 70.0),
            400,
            "Magdalena, Atrato and Cauca rivers",
            "Fast-water fish prized by sport anglers for its strength.",
            "#C0C0C0",
        ),
        species(
            "sabaleta",
            "Sabaleta",
            "Brycon henni",
            FishRarity::Common,
            3,
            (0.5, 2.0),
            (20.0, 40.0),
            250,
            "Cauca river and Andean mountain streams",
            "Endemic to Colombia and elusive on the line.",
            "#F0E68C",
        ),
        species(
            "nicuro",
            "Nicuro",
            "Pimelodus grosskopfii",
            FishRarity::Common,
            3,
            (0.8, 4.0),
            (25.0, 60.0),
            300,
            "Magdalena and Cauca rivers, marshes",
            "Mid-sized catfish and a stubborn fighter.",
            "#708090",
        ),
        species(
            "corroncho",
            "Corroncho",
            "Chaetostoma fischeri",
            FishRarity::Common,
            1,
            (0.3, 1.0),
            (15.0, 30.0),
            150,
            "Rocky Magdalena tributaries",
            "Small bottom dweller that keeps the algae in check.",
            "#A0522D",
        ),
        species(
            "azulejo",
            "Azulejo",
            "Crenicichla lugubris",
            FishRarity::Common,
            2,
            (0.4, 1.5),
            (18.0, 35.0),
            200,
            "Orinoco, Meta and Guaviare rivers",
            "Territorial cichlid with vivid colours.",
            "#4169E1",
        ),
        species(
            "mojarra",
            "Mojarra Amarilla",
            "Caquetaia kraussii",
            FishRarity::Common,
            2,
            (0.6, 2.5),
            (22.0, 45.0),
            280,
            "Magdalena and Cauca rivers, coastal marshes",
            "Hardy endemic cichlid that adapts to most waters.",
            "#FFE4B5",
        ),
        species(
            "bagre",
            "Bagre Rayado",
            "Pseudoplatystoma fasciatum",
            FishRarity::Rare,
            6,
            (3.0, 25.0),
            (60.0, 140.0),
            900,
            "Magdalena, Orinoco and Meta rivers",
            "Striped nocturnal predator that gives a long fight.",
            "#696969",
        ),
        species(
            "pavon",
            "Pavón",
            "Cichla orinocensis",
            FishRarity::Epic,
            7,
            (2.0, 12.0),
            (40.0, 90.0),
            1500,
            "Orinoco, Guaviare and Vichada rivers",
            "Aggressive predator known for spectacular jumps.",
            "#FFD700",
        ),
        species(
            "arapaima",
            "Arapaima",
            "Arapaima gigas",
            FishRarity::Legendary,
            9,
            (15.0, 120.0),
            (120.0, 250.0),
            2500,
            "Amazon, Putumayo and Caquetá rivers",
            "The largest freshwater giant in South America.",
            "#8B0000",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, rarity: FishRarity) -> FishSpecies {
        species(
            id,
            id,
            "Testus fishus",
            rarity,
            3,
            (1.0, 2.0),
            (20.0, 30.0),
            100,
            "Test pond",
            "A fish for tests.",
            "#000000",
        )
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = FishCatalog::colombian_rivers();
        let rebuilt = FishCatalog::new(catalog.species().to_vec()).unwrap();

        assert_eq!(rebuilt.len(), 10);
        for rarity in FishRarity::ALL {
            assert!(
                catalog.count_by_rarity(rarity) > 0,
                "{} bucket should not be empty",
                rarity.name()
            );
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = FishCatalog::default();
        let bocachico = catalog.get("bocachico").unwrap();
        assert_eq!(bocachico.rarity, FishRarity::Common);
        assert_eq!(bocachico.base_points, 150);
        assert!(catalog.get("trucha").is_none());
    }

    #[test]
    fn test_by_rarity_filters() {
        let catalog = FishCatalog::default();
        let legendary: Vec<&str> = catalog
            .by_rarity(FishRarity::Legendary)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(legendary, vec!["arapaima"]);
        assert_eq!(catalog.count_by_rarity(FishRarity::Common), 7);
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert_eq!(FishCatalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_rejects_catalog_without_common() {
        let result = FishCatalog::new(vec![sample("rare-one", FishRarity::Rare)]);
        assert_eq!(result.unwrap_err(), CatalogError::NoCommonSpecies);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = FishCatalog::new(vec![
            sample("twin", FishRarity::Common),
            sample("twin", FishRarity::Rare),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateId("twin".to_string())
        );
    }

    #[test]
    fn test_rejects_bad_difficulty() {
        let mut entry = sample("wild", FishRarity::Common);
        entry.difficulty = 11;
        assert!(matches!(
            FishCatalog::new(vec![entry]),
            Err(CatalogError::Difficulty { difficulty: 11, .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut entry = sample("odd", FishRarity::Common);
        entry.weight = SizeRange::new(5.0, 1.0);
        assert!(matches!(
            FishCatalog::new(vec![entry]),
            Err(CatalogError::Range {
                field: "weight",
                ..
            })
        ));
    }
}
