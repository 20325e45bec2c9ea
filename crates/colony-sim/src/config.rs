//! Scenario configuration, loaded from YAML.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use colony_creatures::{NecromancerConfig, Relationship, SpawnError};
use colony_task::{AssignConfig, Category};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::MindKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("dt_seconds must be positive and finite, got {0}")]
    BadTimeStep(f32),
    #[error("duplicate faction '{0}'")]
    DuplicateFaction(String),
    #[error("unknown faction '{0}'")]
    UnknownFaction(String),
    #[error("unknown creature kind '{0}'")]
    UnknownKind(String),
    #[error("kind '{kind}' lists unknown category '{category}'")]
    UnknownCategory { kind: String, category: String },
    #[error("failed to place initial creature: {0}")]
    Spawn(#[from] SpawnError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to set up and run one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,

    /// Fixed simulation time step in seconds.
    pub dt_seconds: f32,

    /// Ticks to run when no count is given on the command line.
    pub ticks: u64,

    /// Upper bound on live entities; spawns beyond it fail.
    pub max_entities: usize,

    /// How long a wandering creature ambles before picking new work.
    pub wander_seconds: f32,

    pub assignment: AssignmentConfig,

    pub factions: Vec<String>,

    pub relationships: Vec<RelationshipConfig>,

    pub kinds: BTreeMap<String, KindConfig>,

    pub creatures: Vec<CreatureConfig>,

    pub graves: Vec<GraveConfig>,

    pub voxels: Vec<VoxelConfig>,

    pub necromancer: NecromancerTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    pub max_per_agent: usize,
    pub load_weight: f32,
    pub max_queue_len: Option<usize>,
    /// Keep tasks nobody could take for the next batch phase instead of dropping them.
    pub retry_unassigned: bool,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_per_agent: 1,
            load_weight: 1.0,
            max_queue_len: None,
            retry_unassigned: true,
        }
    }
}

impl AssignmentConfig {
    pub fn to_assign_config(&self) -> AssignConfig {
        AssignConfig {
            max_per_agent: self.max_per_agent,
            load_weight: self.load_weight,
            max_queue_len: self.max_queue_len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Hateful,
    Neutral,
    Friendly,
}

impl From<RelationshipKind> for Relationship {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Hateful => Relationship::Hateful,
            RelationshipKind::Neutral => Relationship::Neutral,
            RelationshipKind::Friendly => Relationship::Friendly,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipConfig {
    pub a: String,
    pub b: String,
    pub relationship: RelationshipKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KindConfig {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub dig_rate: f32,
    pub attack_range: f32,
    pub attack_period: f32,
    pub categories: Vec<String>,
    pub mind: MindKind,
}

impl Default for KindConfig {
    fn default() -> Self {
        Self {
            health: 50.0,
            speed: 2.0,
            damage: 10.0,
            dig_rate: 10.0,
            attack_range: 1.5,
            attack_period: 1.0,
            categories: vec!["move".to_owned()],
            mind: MindKind::Wanderer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureConfig {
    pub kind: String,
    pub faction: String,
    pub position: [f32; 3],
    /// War party the creature starts in.
    #[serde(default)]
    pub party: Option<u32>,
    /// Trade envoy the creature travels with.
    #[serde(default)]
    pub envoy: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraveConfig {
    pub faction: String,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelConfig {
    pub at: [i32; 3],
    #[serde(default = "default_voxel_hp")]
    pub hp: f32,
    #[serde(default)]
    pub designated: bool,
}

fn default_voxel_hp() -> f32 {
    20.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NecromancerTuning {
    pub max_skeletons: usize,
    pub summon_cooldown: f32,
    pub wander_period: f32,
    pub attack_period: f32,
    pub attack_range: f32,
    pub skeleton_kind: String,
}

impl Default for NecromancerTuning {
    fn default() -> Self {
        let base = NecromancerConfig::default();
        Self {
            max_skeletons: base.max_skeletons,
            summon_cooldown: base.summon_cooldown,
            wander_period: base.wander_period,
            attack_period: base.attack_period,
            attack_range: base.attack_range,
            skeleton_kind: base.skeleton_kind,
        }
    }
}

impl NecromancerTuning {
    pub fn to_necromancer_config(&self) -> NecromancerConfig {
        NecromancerConfig {
            max_skeletons: self.max_skeletons,
            summon_cooldown: self.summon_cooldown,
            wander_period: self.wander_period,
            attack_period: self.attack_period,
            attack_range: self.attack_range,
            skeleton_kind: self.skeleton_kind.clone(),
            ..NecromancerConfig::default()
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            dt_seconds: 0.5,
            ticks: 120,
            max_entities: 256,
            wander_seconds: 2.0,
            assignment: AssignmentConfig::default(),
            factions: Vec::new(),
            relationships: Vec::new(),
            kinds: BTreeMap::new(),
            creatures: Vec::new(),
            graves: Vec::new(),
            voxels: Vec::new(),
            necromancer: NecromancerTuning::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load and validate a scenario from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid scenario in {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The built-in skirmish: a necromancer camp next to a small dwarf dig site.
    pub fn skirmish() -> Self {
        let mut kinds = BTreeMap::new();
        kinds.insert(
            "necromancer".to_owned(),
            KindConfig {
                health: 80.0,
                speed: 1.5,
                categories: vec!["move".into(), "summon".into()],
                mind: MindKind::Necromancer,
                ..KindConfig::default()
            },
        );
        kinds.insert(
            "skeleton".to_owned(),
            KindConfig {
                health: 30.0,
                speed: 2.5,
                damage: 8.0,
                categories: vec!["move".into(), "attack".into()],
                ..KindConfig::default()
            },
        );
        kinds.insert(
            "dwarf".to_owned(),
            KindConfig {
                health: 60.0,
                speed: 2.0,
                dig_rate: 12.0,
                categories: vec!["move".into(), "dig".into(), "attack".into()],
                ..KindConfig::default()
            },
        );

        let creature = |kind: &str, faction: &str, position: [f32; 3]| CreatureConfig {
            kind: kind.to_owned(),
            faction: faction.to_owned(),
            position,
            party: None,
            envoy: None,
        };

        Self {
            seed: 7,
            factions: vec!["undead".to_owned(), "dwarves".to_owned()],
            relationships: vec![RelationshipConfig {
                a: "undead".to_owned(),
                b: "dwarves".to_owned(),
                relationship: RelationshipKind::Hateful,
            }],
            kinds,
            creatures: vec![
                CreatureConfig {
                    party: Some(1),
                    ..creature("necromancer", "undead", [0.0, 0.0, 0.0])
                },
                creature("dwarf", "dwarves", [8.0, 0.0, 0.0]),
                creature("dwarf", "dwarves", [9.0, 0.0, 2.0]),
                creature("dwarf", "dwarves", [14.0, 0.0, -2.0]),
            ],
            graves: vec![GraveConfig {
                faction: "dwarves".to_owned(),
                position: [5.0, 0.0, 5.0],
            }],
            voxels: (0..4)
                .map(|i| VoxelConfig {
                    at: [12 + i, 0, 4],
                    hp: 20.0,
                    designated: true,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt_seconds.is_finite() && self.dt_seconds > 0.0) {
            return Err(ConfigError::BadTimeStep(self.dt_seconds));
        }
        if self.assignment.max_per_agent == 0 {
            return Err(ConfigError::Invalid(
                "assignment.max_per_agent must be at least 1".to_owned(),
            ));
        }

        let mut factions = BTreeSet::new();
        for name in &self.factions {
            if !factions.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFaction(name.clone()));
            }
        }
        let known_faction = |name: &str| -> Result<(), ConfigError> {
            if factions.contains(name) {
                Ok(())
            } else {
                Err(ConfigError::UnknownFaction(name.to_owned()))
            }
        };
        let known_kind = |name: &str| -> Result<(), ConfigError> {
            if self.kinds.contains_key(name) {
                Ok(())
            } else {
                Err(ConfigError::UnknownKind(name.to_owned()))
            }
        };

        for rel in &self.relationships {
            known_faction(&rel.a)?;
            known_faction(&rel.b)?;
        }
        for (kind, spec) in &self.kinds {
            for category in &spec.categories {
                if Category::from_name(category).is_none() {
                    return Err(ConfigError::UnknownCategory {
                        kind: kind.clone(),
                        category: category.clone(),
                    });
                }
            }
            if !(spec.speed >= 0.0 && spec.health > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "kind '{kind}' needs positive health and non-negative speed"
                )));
            }
        }
        for creature in &self.creatures {
            known_kind(&creature.kind)?;
            known_faction(&creature.faction)?;
        }
        for grave in &self.graves {
            known_faction(&grave.faction)?;
        }

        let summons = self
            .kinds
            .values()
            .any(|k| k.mind == MindKind::Necromancer);
        if summons {
            known_kind(&self.necromancer.skeleton_kind)?;
        }
        if self.creatures.len() > self.max_entities {
            return Err(ConfigError::Invalid(format!(
                "{} creatures exceed max_entities {}",
                self.creatures.len(),
                self.max_entities
            )));
        }
        Ok(())
    }
}
