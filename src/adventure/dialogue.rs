//! NPC dialogue branching driven by quest state.

use crate::adventure::errors::GameError;
use crate::adventure::player::Player;
use crate::adventure::quest::prerequisite_met;
use crate::adventure::types::NpcTemplate;
use crate::adventure::world::World;

const FALLBACK_OFFER: &str = "I could use your help with something.";
const FALLBACK_ACTIVE: &str = "How goes the task I gave you?";

/// What an NPC says, and which quest (if any) they are offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueResolution {
    pub line: String,
    pub offered: Option<String>,
}

impl DialogueResolution {
    fn say(line: &str) -> Self {
        Self {
            line: line.to_string(),
            offered: None,
        }
    }
}

/// Pick an NPC's line from the player's quest state. Reads only.
///
/// The NPC's quests are walked in order: completed ones are skipped, an
/// active one yields its "active" line, one with an unmet prerequisite is
/// skipped, and the first remaining one is offered. With every quest done the
/// NPC gives their closing line; otherwise their default line.
pub fn resolve_npc_dialogue(
    npc: &NpcTemplate,
    player: &Player,
    world: &World,
) -> Result<DialogueResolution, GameError> {
    for quest_name in &npc.quests {
        let template = world.get_quest_template(quest_name)?;
        if player.is_quest_completed(quest_name) {
            continue;
        }
        if player.is_quest_active(quest_name) {
            let line = npc
                .dialogue
                .quest_active
                .get(quest_name)
                .map(String::as_str)
                .unwrap_or(FALLBACK_ACTIVE);
            return Ok(DialogueResolution::say(line));
        }
        if !prerequisite_met(player, template.prerequisite.as_deref()) {
            continue;
        }
        let line = npc
            .dialogue
            .quest_offer
            .get(quest_name)
            .map(String::as_str)
            .unwrap_or(FALLBACK_OFFER);
        return Ok(DialogueResolution {
            line: line.to_string(),
            offered: Some(template.name.clone()),
        });
    }

    let all_done = !npc.quests.is_empty() && npc.quests.iter().all(|q| player.is_quest_completed(q));
    if all_done {
        if let Some(closing) = &npc.dialogue.after_all_quests {
            return Ok(DialogueResolution::say(closing));
        }
    }
    Ok(DialogueResolution::say(&npc.dialogue.default))
}
