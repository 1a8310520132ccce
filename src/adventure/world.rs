//! Read-only world context: templates loaded once and looked up by name.
//!
//! The JSON document keeps every collection as an array of named objects so
//! declaration order survives loading (exit numbering, quest scan order).

use crate::adventure::errors::GameError;
use crate::adventure::types::{
    ItemTemplate, LocationTemplate, MonsterTemplate, NpcTemplate, PlayerStats, QuestTemplate,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// On-disk world document, as authored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDocument {
    #[serde(default)]
    pub player: PlayerStats,
    pub player_start: String,
    #[serde(default)]
    pub items: Vec<ItemTemplate>,
    #[serde(default)]
    pub monsters: Vec<MonsterTemplate>,
    #[serde(default)]
    pub locations: Vec<LocationTemplate>,
    #[serde(default)]
    pub npcs: Vec<NpcTemplate>,
    #[serde(default)]
    pub quests: Vec<QuestTemplate>,
}

impl WorldDocument {
    /// Read and parse a world document without indexing it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let document: WorldDocument = serde_json::from_str(&contents)?;
        debug!(
            "parsed world document {} ({} locations, {} quests)",
            path.display(),
            document.locations.len(),
            document.quests.len()
        );
        Ok(document)
    }
}

#[derive(Debug, Clone)]
pub struct World {
    starting_stats: PlayerStats,
    player_start: String,
    items: HashMap<String, ItemTemplate>,
    monsters: HashMap<String, MonsterTemplate>,
    locations: HashMap<String, LocationTemplate>,
    npcs: HashMap<String, NpcTemplate>,
    quests: HashMap<String, QuestTemplate>,
    quest_order: Vec<String>,
    npc_quests: HashSet<String>,
}

impl World {
    /// Load, parse, and index the world file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let world = Self::from_document(WorldDocument::load(path)?)?;
        info!(
            "loaded world from {}: {} locations, {} items, {} monsters, {} npcs, {} quests",
            path.display(),
            world.locations.len(),
            world.items.len(),
            world.monsters.len(),
            world.npcs.len(),
            world.quests.len()
        );
        Ok(world)
    }

    /// Parse a world from an in-memory JSON string (fixtures, tests).
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Index a parsed document. Fails only when the start location is absent,
    /// since no session can begin without it; other dangling references are
    /// left for the offline validator.
    pub fn from_document(document: WorldDocument) -> Result<Self, GameError> {
        let WorldDocument {
            player,
            player_start,
            items,
            monsters,
            locations,
            npcs,
            quests,
        } = document;

        let npc_quests: HashSet<String> = npcs
            .iter()
            .flat_map(|npc| npc.quests.iter().cloned())
            .collect();
        let quest_order: Vec<String> = quests.iter().map(|q| q.name.clone()).collect();

        let world = Self {
            starting_stats: player,
            player_start,
            items: items.into_iter().map(|i| (i.name.clone(), i)).collect(),
            monsters: monsters.into_iter().map(|m| (m.name.clone(), m)).collect(),
            locations: locations.into_iter().map(|l| (l.name.clone(), l)).collect(),
            npcs: npcs.into_iter().map(|n| (n.name.clone(), n)).collect(),
            quests: quests.into_iter().map(|q| (q.name.clone(), q)).collect(),
            quest_order,
            npc_quests,
        };

        if !world.locations.contains_key(&world.player_start) {
            return Err(GameError::InvalidWorld(format!(
                "player_start '{}' is not a location",
                world.player_start
            )));
        }
        Ok(world)
    }

    pub fn starting_stats(&self) -> &PlayerStats {
        &self.starting_stats
    }

    pub fn player_start(&self) -> &str {
        &self.player_start
    }

    pub fn get_location(&self, name: &str) -> Result<&LocationTemplate, GameError> {
        self.locations
            .get(name)
            .ok_or_else(|| GameError::not_found("location", name))
    }

    pub fn get_item(&self, name: &str) -> Result<&ItemTemplate, GameError> {
        self.items
            .get(name)
            .ok_or_else(|| GameError::not_found("item", name))
    }

    pub fn get_monster_template(&self, name: &str) -> Result<&MonsterTemplate, GameError> {
        self.monsters
            .get(name)
            .ok_or_else(|| GameError::not_found("monster", name))
    }

    pub fn get_npc(&self, name: &str) -> Result<&NpcTemplate, GameError> {
        self.npcs
            .get(name)
            .ok_or_else(|| GameError::not_found("npc", name))
    }

    pub fn get_quest_template(&self, name: &str) -> Result<&QuestTemplate, GameError> {
        self.quests
            .get(name)
            .ok_or_else(|| GameError::not_found("quest", name))
    }

    pub fn locations(&self) -> impl Iterator<Item = &LocationTemplate> {
        self.locations.values()
    }

    /// Quest templates in declaration order.
    pub fn quest_templates(&self) -> impl Iterator<Item = &QuestTemplate> {
        self.quest_order
            .iter()
            .filter_map(move |name| self.quests.get(name))
    }

    /// True when some NPC lists this quest; such quests are only offered through dialogue.
    pub fn is_npc_sourced(&self, quest_name: &str) -> bool {
        self.npc_quests.contains(quest_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_WORLD: &str = r#"{
        "player_start": "Gate",
        "items": [{"name": "Key", "type": "plain"}],
        "locations": [
            {"name": "Gate", "description": "A gate.", "exits": [{"direction": "north", "destination": "Yard"}]},
            {"name": "Yard", "description": "A yard."}
        ],
        "npcs": [{"name": "Warden", "dialogue": {"default": "Move along."}, "quests": ["Find the Key"]}],
        "quests": [
            {"name": "Find the Key", "goal": {"type": "collect", "targets": ["Key"], "count": 1}},
            {"name": "Walk Around", "goal": {"type": "collect", "targets": ["Key"]}}
        ]
    }"#;

    #[test]
    fn lookups_resolve_and_report_missing_names() {
        let world = World::from_json_str(TINY_WORLD).unwrap();
        assert_eq!(world.player_start(), "Gate");
        assert_eq!(world.get_location("Gate").unwrap().exits[0].destination, "Yard");
        assert!(world.get_item("Key").is_ok());

        match world.get_monster_template("Dragon") {
            Err(GameError::NotFound { kind, name }) => {
                assert_eq!(kind, "monster");
                assert_eq!(name, "Dragon");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn quest_order_and_npc_sourcing_are_kept() {
        let world = World::from_json_str(TINY_WORLD).unwrap();
        let names: Vec<&str> = world.quest_templates().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["Find the Key", "Walk Around"]);
        assert!(world.is_npc_sourced("Find the Key"));
        assert!(!world.is_npc_sourced("Walk Around"));
    }

    #[test]
    fn missing_start_location_is_rejected() {
        let err = World::from_json_str(r#"{"player_start": "Nowhere"}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidWorld(_)));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = World::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }
}
