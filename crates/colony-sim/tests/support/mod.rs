#![allow(dead_code)]

use std::collections::BTreeMap;

use colony_sim::config::{CreatureConfig, KindConfig, VoxelConfig};
use colony_sim::{MindKind, ScenarioConfig};

pub fn kind(categories: &[&str], mind: MindKind) -> KindConfig {
    KindConfig {
        categories: categories.iter().map(|c| (*c).to_owned()).collect(),
        mind,
        ..KindConfig::default()
    }
}

pub fn creature(kind: &str, faction: &str, position: [f32; 3]) -> CreatureConfig {
    CreatureConfig {
        kind: kind.to_owned(),
        faction: faction.to_owned(),
        position,
        party: None,
        envoy: None,
    }
}

/// One faction, one mindless digger at the origin, nothing else.
pub fn dig_site() -> ScenarioConfig {
    let mut kinds = BTreeMap::new();
    kinds.insert("miner".to_owned(), kind(&["move", "dig"], MindKind::None));
    kinds.insert("idler".to_owned(), kind(&["move"], MindKind::None));
    ScenarioConfig {
        seed: 5,
        factions: vec!["dwarves".to_owned()],
        kinds,
        creatures: vec![creature("miner", "dwarves", [0.0, 0.0, 0.0])],
        ..ScenarioConfig::default()
    }
}

pub fn voxel(at: [i32; 3], designated: bool) -> VoxelConfig {
    VoxelConfig {
        at,
        hp: 20.0,
        designated,
    }
}
