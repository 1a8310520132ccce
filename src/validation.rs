//! Offline integrity checks for world documents, plus player-name validation.
//!
//! [`validate_world`] is a pre-flight check (`shademire validate`); it never
//! runs during play. Each problem becomes one human-readable line.

use crate::adventure::types::{Goal, TriggerKind};
use crate::adventure::world::WorldDocument;
use std::collections::HashSet;

/// Player name validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlayerNameError {
    #[error("Name is too short (minimum 2 characters)")]
    TooShort,

    #[error("Name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Name contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },
}

pub const MAX_PLAYER_NAME: usize = 24;

/// Validate and normalise a player name: letters, digits, spaces, `-`, `_`, `'`.
pub fn validate_player_name(name: &str) -> Result<String, PlayerNameError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return Err(PlayerNameError::TooShort);
    }
    if trimmed.chars().count() > MAX_PLAYER_NAME {
        return Err(PlayerNameError::TooLong {
            max: MAX_PLAYER_NAME,
        });
    }

    let invalid: HashSet<char> = trimmed
        .chars()
        .filter(|c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '\'')))
        .collect();
    if !invalid.is_empty() {
        let mut chars: Vec<char> = invalid.into_iter().collect();
        chars.sort_unstable();
        return Err(PlayerNameError::InvalidCharacters {
            chars: chars
                .iter()
                .map(|c| if c.is_control() { format!("\\u{{{:04x}}}", *c as u32) } else { c.to_string() })
                .collect(),
        });
    }
    Ok(trimmed.to_string())
}

fn duplicates<'a>(kind: &str, names: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            errors.push(format!("Duplicate {} name: '{}'.", kind, name));
        }
    }
    seen
}

/// Check a world document for dangling references. Returns one message per problem.
pub fn validate_world(doc: &WorldDocument) -> Vec<String> {
    let mut errors = Vec::new();

    let items = duplicates("item", doc.items.iter().map(|i| i.name.as_str()), &mut errors);
    let monsters = duplicates("monster", doc.monsters.iter().map(|m| m.name.as_str()), &mut errors);
    let locations = duplicates("location", doc.locations.iter().map(|l| l.name.as_str()), &mut errors);
    let npcs = duplicates("NPC", doc.npcs.iter().map(|n| n.name.as_str()), &mut errors);
    let quests = duplicates("quest", doc.quests.iter().map(|q| q.name.as_str()), &mut errors);

    if !locations.contains(doc.player_start.as_str()) {
        errors.push(format!(
            "Undefined player_start location: '{}'.",
            doc.player_start
        ));
    }

    for location in &doc.locations {
        for exit in &location.exits {
            if !locations.contains(exit.destination.as_str()) {
                errors.push(format!(
                    "Broken exit in '{}': '{}' does not exist.",
                    location.name, exit.destination
                ));
            }
        }
        for item in &location.items {
            if !items.contains(item.as_str()) {
                errors.push(format!("Undefined item in '{}': '{}'.", location.name, item));
            }
        }
        for monster in &location.monsters {
            if !monsters.contains(monster.as_str()) {
                errors.push(format!(
                    "Undefined monster in '{}': '{}'.",
                    location.name, monster
                ));
            }
        }
        for npc in &location.npcs {
            if !npcs.contains(npc.as_str()) {
                errors.push(format!("Undefined NPC in '{}': '{}'.", location.name, npc));
            }
        }
    }

    for monster in &doc.monsters {
        for item in &monster.loot {
            if !items.contains(item.as_str()) {
                errors.push(format!(
                    "Undefined loot item for '{}': '{}'.",
                    monster.name, item
                ));
            }
        }
        for drop in &monster.drop_table {
            if !items.contains(drop.item.as_str()) {
                errors.push(format!(
                    "Undefined drop_table item for '{}': '{}'.",
                    monster.name, drop.item
                ));
            }
        }
    }

    for quest in &doc.quests {
        if let Some(item) = &quest.reward.item {
            if !items.contains(item.as_str()) {
                errors.push(format!(
                    "Undefined reward item for quest '{}': '{}'.",
                    quest.name, item
                ));
            }
        }
        if let Some(item) = &quest.on_accept.item {
            if !items.contains(item.as_str()) {
                errors.push(format!(
                    "Undefined on_accept item for quest '{}': '{}'.",
                    quest.name, item
                ));
            }
        }

        let goals = std::iter::once(&quest.goal).chain(quest.alternate_goal.as_ref());
        for goal in goals {
            for target in goal.kill_targets() {
                if !monsters.contains(target) {
                    errors.push(format!(
                        "Undefined kill target for quest '{}': '{}'.",
                        quest.name, target
                    ));
                }
            }
            if let Goal::Collect { targets, .. } = goal {
                for target in targets {
                    if !items.contains(target.as_str()) {
                        errors.push(format!(
                            "Undefined collect target for quest '{}': '{}'.",
                            quest.name, target
                        ));
                    }
                }
            }
        }

        if let Some(prereq) = &quest.prerequisite {
            if !quests.contains(prereq.as_str()) {
                errors.push(format!(
                    "Undefined prerequisite for quest '{}': '{}'.",
                    quest.name, prereq
                ));
            }
        }
        for unlocked in &quest.unlocks {
            if !quests.contains(unlocked.as_str()) {
                errors.push(format!(
                    "Undefined unlocked quest for '{}': '{}'.",
                    quest.name, unlocked
                ));
            }
        }

        if let Some(start) = &quest.start {
            let (known, kind) = match start.trigger {
                TriggerKind::LocationEnter => (Some(&locations), "location"),
                TriggerKind::ItemPickup => (Some(&items), "item"),
                TriggerKind::NpcTalk => (Some(&npcs), "NPC"),
                // "npc:topic" keys are checked against NPC topics below.
                TriggerKind::AskTopic => (None, "topic"),
            };
            for target in start.target.names() {
                let exists = match known {
                    Some(set) => set.contains(target),
                    None => topic_exists(doc, target),
                };
                if !exists {
                    errors.push(format!(
                        "Undefined start {} for quest '{}': '{}'.",
                        kind, quest.name, target
                    ));
                }
            }
        }
    }

    for npc in &doc.npcs {
        for quest in &npc.quests {
            if !quests.contains(quest.as_str()) {
                errors.push(format!("Undefined quest for NPC '{}': '{}'.", npc.name, quest));
            }
        }
    }

    errors
}

fn topic_exists(doc: &WorldDocument, key: &str) -> bool {
    let Some((npc_name, topic)) = key.split_once(':') else {
        return false;
    };
    doc.npcs
        .iter()
        .find(|npc| npc.name == npc_name)
        .map(|npc| npc.topics.contains_key(topic))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: serde_json::Value) -> WorldDocument {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn clean_document_has_no_errors() {
        let doc = document(serde_json::json!({
            "player_start": "Gate",
            "items": [{"name": "Key", "type": "plain"}],
            "monsters": [{"name": "Rat", "hp": 2, "attack_power": 1, "loot": ["Key"]}],
            "locations": [{"name": "Gate", "items": ["Key"], "monsters": ["Rat"], "npcs": ["Warden"]}],
            "npcs": [{"name": "Warden", "quests": ["Rats"], "topics": {"rats": "Vermin."}}],
            "quests": [
                {"name": "Rats", "goal": {"type": "kill", "target": "Rat", "count": 1}},
                {"name": "Ask", "start": {"trigger": "ask_topic", "target": "Warden:rats"},
                 "goal": {"type": "collect_or_talk", "targets": ["Warden:rats"]}}
            ]
        }));
        assert!(validate_world(&doc).is_empty(), "{:?}", validate_world(&doc));
    }

    #[test]
    fn dangling_references_are_reported() {
        let doc = document(serde_json::json!({
            "player_start": "Nowhere",
            "items": [{"name": "Key", "type": "plain"}, {"name": "Key", "type": "plain"}],
            "monsters": [{"name": "Rat", "hp": 2, "attack_power": 1, "drop_table": [{"item": "Gem", "chance": 0.5}]}],
            "locations": [{"name": "Gate", "exits": [{"direction": "north", "destination": "Tower"}], "monsters": ["Bat"]}],
            "npcs": [{"name": "Warden", "quests": ["Ghost"]}],
            "quests": [{
                "name": "Rats",
                "start": {"trigger": "item_pickup", "target": "Scroll"},
                "goal": {"type": "kill", "target": "Wolf", "count": 1},
                "alternate_goal": {"type": "kill_multi", "requirements": [{"target": "Bear", "count": 1}]},
                "reward": {"item": "Crown"},
                "on_accept": {"item": "Badge"},
                "prerequisite": "Missing",
                "unlocks": ["Also Missing"]
            }]
        }));
        let errors = validate_world(&doc);
        let expected = [
            "Duplicate item name: 'Key'.",
            "Undefined player_start location: 'Nowhere'.",
            "Broken exit in 'Gate': 'Tower' does not exist.",
            "Undefined monster in 'Gate': 'Bat'.",
            "Undefined drop_table item for 'Rat': 'Gem'.",
            "Undefined reward item for quest 'Rats': 'Crown'.",
            "Undefined on_accept item for quest 'Rats': 'Badge'.",
            "Undefined kill target for quest 'Rats': 'Wolf'.",
            "Undefined kill target for quest 'Rats': 'Bear'.",
            "Undefined prerequisite for quest 'Rats': 'Missing'.",
            "Undefined unlocked quest for 'Rats': 'Also Missing'.",
            "Undefined start item for quest 'Rats': 'Scroll'.",
            "Undefined quest for NPC 'Warden': 'Ghost'.",
        ];
        for message in expected {
            assert!(errors.iter().any(|e| e == message), "missing {:?} in {:?}", message, errors);
        }
        assert_eq!(errors.len(), expected.len());
    }

    #[test]
    fn player_names() {
        assert_eq!(validate_player_name("  Ash Vale ").unwrap(), "Ash Vale");
        assert_eq!(validate_player_name("A"), Err(PlayerNameError::TooShort));
        assert!(matches!(
            validate_player_name(&"x".repeat(30)),
            Err(PlayerNameError::TooLong { max: MAX_PLAYER_NAME })
        ));
        assert_eq!(
            validate_player_name("bad/name"),
            Err(PlayerNameError::InvalidCharacters { chars: "/".to_string() })
        );
    }
}
