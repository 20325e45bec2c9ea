//! Table of creature kinds, built explicitly and handed to the world.

use std::collections::BTreeMap;

use colony_creatures::Stats;
use colony_task::Category;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, KindConfig};

/// Which decision loop a kind runs when idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MindKind {
    None,
    Wanderer,
    Necromancer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KindSpec {
    pub name: String,
    pub health: f32,
    pub stats: Stats,
    pub categories: Category,
    pub mind: MindKind,
}

impl KindSpec {
    pub fn from_config(name: &str, config: &KindConfig) -> Result<Self, ConfigError> {
        let mut categories = Category::NONE;
        for category in &config.categories {
            categories |= Category::from_name(category).ok_or_else(|| {
                ConfigError::UnknownCategory {
                    kind: name.to_owned(),
                    category: category.clone(),
                }
            })?;
        }
        Ok(Self {
            name: name.to_owned(),
            health: config.health,
            stats: Stats {
                speed: config.speed,
                dig_rate: config.dig_rate,
                damage: config.damage,
                attack_range: config.attack_range,
                attack_period: config.attack_period,
            },
            categories,
            mind: config.mind,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<String, KindSpec>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(kinds: &BTreeMap<String, KindConfig>) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (name, config) in kinds {
            registry.insert(KindSpec::from_config(name, config)?);
        }
        Ok(registry)
    }

    /// Add or replace a kind.
    pub fn insert(&mut self, spec: KindSpec) -> Option<KindSpec> {
        self.kinds.insert(spec.name.clone(), spec)
    }

    pub fn get(&self, name: &str) -> Option<&KindSpec> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
