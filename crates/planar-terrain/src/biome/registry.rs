//! Biome registry: ordered cyclic list of [`BiomeDefinition`]s with name lookup.

use hashbrown::HashMap;

use super::BiomeDefinition;

/// Discrete index into the cyclic biome list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u32);

/// Errors that can occur when registering biomes.
#[derive(Debug, thiserror::Error)]
pub enum BiomeRegistryError {
    /// A biome with this name is already registered.
    #[error("duplicate biome name: {0}")]
    DuplicateName(String),
}

/// Stores the biome cycle in order, with O(1) lookup by id and by name.
///
/// Flora and fauna consumers use this to map the id returned by the
/// classifier back to the assets they should show.
#[derive(Clone, Debug, Default)]
pub struct BiomeRegistry {
    biomes: Vec<BiomeDefinition>,
    name_to_id: HashMap<String, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from an ordered list, preserving its order.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateName`] on the first repeated name.
    pub fn from_definitions(defs: &[BiomeDefinition]) -> Result<Self, BiomeRegistryError> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def.clone())?;
        }
        Ok(registry)
    }

    /// Appends a biome to the end of the cycle, returning its [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateName`] if a biome with the same name exists.
    pub fn register(&mut self, def: BiomeDefinition) -> Result<BiomeId, BiomeRegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(BiomeRegistryError::DuplicateName(def.name.clone()));
        }
        let id = BiomeId(self.biomes.len() as u32);
        self.name_to_id.insert(def.name.clone(), id);
        self.biomes.push(def);
        Ok(id)
    }

    /// Returns the definition for `id`, wrapping around the cycle.
    pub fn get(&self, id: BiomeId) -> Option<&BiomeDefinition> {
        if self.biomes.is_empty() {
            return None;
        }
        self.biomes.get(id.0 as usize % self.biomes.len())
    }

    /// Looks up a biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Iterates definitions in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomeDefinition> {
        self.biomes.iter()
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Landform, default_biomes};

    #[test]
    fn test_registry_preserves_cycle_order() {
        let reg = BiomeRegistry::from_definitions(&default_biomes()).unwrap();
        assert_eq!(reg.len(), 5);
        assert_eq!(reg.lookup_by_name("meadow"), Some(BiomeId(0)));
        assert_eq!(reg.lookup_by_name("shimmer"), Some(BiomeId(4)));
        let names: Vec<&str> = reg.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["meadow", "steppe", "mesa", "badlands", "shimmer"]);
    }

    #[test]
    fn test_get_wraps_around_cycle() {
        let reg = BiomeRegistry::from_definitions(&default_biomes()).unwrap();
        assert_eq!(reg.get(BiomeId(5)).unwrap().name, "meadow");
        assert_eq!(reg.get(BiomeId(7)).unwrap().name, "mesa");
    }

    #[test]
    fn test_empty_registry_returns_none() {
        let reg = BiomeRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.get(BiomeId(0)).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reg = BiomeRegistry::new();
        let def = BiomeDefinition::new("dunes", [[0.9, 0.8, 0.5]; 3], Landform::Natural);
        reg.register(def.clone()).unwrap();
        let result = reg.register(def);
        assert!(matches!(result, Err(BiomeRegistryError::DuplicateName(name)) if name == "dunes"));
    }
}
