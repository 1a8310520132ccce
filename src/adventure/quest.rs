/// Quest progression: availability triggers, acceptance, goal evaluation,
/// and completion with its rewards and unlocks.
///
/// Templates stay in the [`World`]; acceptance instantiates a
/// [`QuestProgress`] owned by the player.
use crate::adventure::errors::GameError;
use crate::adventure::inventory::add_item;
use crate::adventure::io::GameIo;
use crate::adventure::player::{LevelUp, Player};
use crate::adventure::types::{QuestProgress, TriggerKind};
use crate::adventure::world::World;
use crate::config::ProgressionConfig;
use chrono::Utc;
use log::{debug, info};

/// Gameplay event inspected by the availability evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    LocationEnter(String),
    ItemPickup(String),
    /// Dialogue key in `"npc:topic"` form.
    AskTopic(String),
    NpcTalk(String),
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::LocationEnter(_) => TriggerKind::LocationEnter,
            Trigger::ItemPickup(_) => TriggerKind::ItemPickup,
            Trigger::AskTopic(_) => TriggerKind::AskTopic,
            Trigger::NpcTalk(_) => TriggerKind::NpcTalk,
        }
    }

    pub fn reference(&self) -> &str {
        match self {
            Trigger::LocationEnter(name)
            | Trigger::ItemPickup(name)
            | Trigger::AskTopic(name)
            | Trigger::NpcTalk(name) => name,
        }
    }
}

// ============================================================================
// Acceptance
// ============================================================================

/// Check if the player can take on a quest (not active, not completed, prerequisite met)
pub fn can_accept_quest(world: &World, player: &Player, quest_name: &str) -> Result<bool, GameError> {
    let template = world.get_quest_template(quest_name)?;
    if player.is_quest_active(quest_name) || player.is_quest_completed(quest_name) {
        return Ok(false);
    }
    Ok(prerequisite_met(player, template.prerequisite.as_deref()))
}

pub fn prerequisite_met(player: &Player, prerequisite: Option<&str>) -> bool {
    prerequisite
        .map(|prereq| player.is_quest_completed(prereq))
        .unwrap_or(true)
}

/// Accept a quest: instantiate its progress record, grant the on-accept item,
/// then re-check completion since existing inventory or history may already
/// satisfy it. Returns false when the quest cannot be accepted.
pub fn accept_quest(
    world: &World,
    player: &mut Player,
    progression: &ProgressionConfig,
    io: &mut dyn GameIo,
    quest_name: &str,
) -> Result<bool, GameError> {
    if !can_accept_quest(world, player, quest_name)? {
        return Ok(false);
    }
    let template = world.get_quest_template(quest_name)?;
    let grant = match &template.on_accept.item {
        Some(item) => Some(world.get_item(item)?.name.clone()),
        None => None,
    };

    player
        .active_quests
        .insert(template.name.clone(), QuestProgress::from_template(template));
    info!("{} accepted quest '{}'", player.name, template.name);
    io.say(&format!("Quest accepted: {}", template.name));

    if let Some(item) = grant {
        add_item(player, &item);
        io.say(&format!("You receive: {}.", item));
    }

    evaluate_completions(world, player, progression, io)?;
    Ok(true)
}

/// Present a quest with a yes/no confirmation and accept it on "yes".
/// Declining leaves it available for the next matching trigger.
pub fn offer_quest(
    world: &World,
    player: &mut Player,
    progression: &ProgressionConfig,
    io: &mut dyn GameIo,
    quest_name: &str,
) -> Result<bool, GameError> {
    let template = world.get_quest_template(quest_name)?;
    io.say(&format!("Quest available: {}", template.name));
    if !template.description.is_empty() {
        io.say(&format!("  {}", template.description));
    }
    if io.confirm(&format!("Accept '{}'? (yes/no) ", template.name)) {
        accept_quest(world, player, progression, io, quest_name)
    } else {
        debug!("{} declined quest '{}'", player.name, template.name);
        io.say(&format!("You decline '{}' for now.", template.name));
        Ok(false)
    }
}

// ============================================================================
// Availability
// ============================================================================

/// Offer every trigger-started quest that matches `trigger` and is eligible.
/// Quests listed by an NPC are skipped here; dialogue offers those.
pub fn check_quest_availability(
    world: &World,
    player: &mut Player,
    progression: &ProgressionConfig,
    io: &mut dyn GameIo,
    trigger: &Trigger,
) -> Result<(), GameError> {
    let candidates: Vec<String> = world
        .quest_templates()
        .filter(|quest| !world.is_npc_sourced(&quest.name))
        .filter(|quest| {
            quest
                .start
                .as_ref()
                .map(|start| {
                    start.trigger == trigger.kind() && start.target.contains(trigger.reference())
                })
                .unwrap_or(false)
        })
        .map(|quest| quest.name.clone())
        .collect();

    for quest_name in candidates {
        // An earlier offer in this pass may have changed eligibility.
        if can_accept_quest(world, player, &quest_name)? {
            debug!("trigger {:?} offers quest '{}'", trigger, quest_name);
            offer_quest(world, player, progression, io, &quest_name)?;
        }
    }
    Ok(())
}

// ============================================================================
// Progress and completion
// ============================================================================

/// Count a kill against every active quest. Returns true if any quest advanced.
pub fn record_kill(player: &mut Player, monster: &str) -> bool {
    let mut advanced = false;
    for progress in player.active_quests.values_mut() {
        if progress.record_kill(monster) {
            debug!("kill of {} advanced quest '{}'", monster, progress.name);
            advanced = true;
        }
    }
    advanced
}

/// Complete an active quest and apply its effects. Returns false if the quest
/// is already complete or not active, in which case nothing changes.
pub fn complete_quest(
    world: &World,
    player: &mut Player,
    progression: &ProgressionConfig,
    io: &mut dyn GameIo,
    quest_name: &str,
) -> Result<bool, GameError> {
    if player.is_quest_completed(quest_name) || !player.is_quest_active(quest_name) {
        return Ok(false);
    }
    let template = world.get_quest_template(quest_name)?;
    let reward_item = match &template.reward.item {
        Some(item) => Some(world.get_item(item)?.name.clone()),
        None => None,
    };

    if let Some(progress) = player.active_quests.remove(quest_name) {
        debug!(
            "quest '{}' held for {}s",
            progress.name,
            (Utc::now() - progress.accepted_at).num_seconds()
        );
    }
    player.completed_quests.push(template.name.clone());
    info!("{} completed quest '{}'", player.name, template.name);
    io.say(&format!("Quest complete: {}!", template.name));

    if let Some(xp) = template.reward.xp.filter(|xp| *xp > 0) {
        io.say(&format!("You gain {} XP.", xp));
        let level_ups = player.gain_xp(xp, progression);
        announce_level_ups(io, &level_ups);
    }
    if let Some(item) = reward_item {
        add_item(player, &item);
        io.say(&format!("You receive: {}.", item));
    }
    for unlocked in &template.unlocks {
        info!("quest '{}' unlocked '{}'", template.name, unlocked);
        io.say(&format!("New quest unlocked: {}", unlocked));
    }
    Ok(true)
}

pub fn announce_level_ups(io: &mut dyn GameIo, level_ups: &[LevelUp]) {
    for up in level_ups {
        io.say(&format!(
            "You reached level {}! Max HP is now {} and attack power {}.",
            up.level, up.max_hp, up.attack_power
        ));
    }
}

/// Complete every active quest whose goal (or alternate goal) is satisfied.
/// Runs until nothing more completes, since rewards can satisfy other quests.
pub fn evaluate_completions(
    world: &World,
    player: &mut Player,
    progression: &ProgressionConfig,
    io: &mut dyn GameIo,
) -> Result<Vec<String>, GameError> {
    let mut completed = Vec::new();
    loop {
        let ready = player
            .active_quests
            .values()
            .find(|progress| progress.is_satisfied(&player.inventory, &player.dialogue_history))
            .map(|progress| progress.name.clone());
        match ready {
            Some(name) => {
                if !complete_quest(world, player, progression, io, &name)? {
                    break;
                }
                completed.push(name);
            }
            None => break,
        }
    }
    Ok(completed)
}

// ============================================================================
// Display
// ============================================================================

pub fn format_quest_log(player: &Player) -> Vec<String> {
    let mut lines = Vec::new();
    if player.active_quests.is_empty() {
        lines.push("Active quests: none".to_string());
    } else {
        lines.push("Active quests:".to_string());
        for progress in player.active_quests.values() {
            let mut line = format!("  - {}: {}", progress.name, progress.primary.describe());
            if let Some(alt) = &progress.alternate {
                line.push_str(&format!(" (or {})", alt.describe()));
            }
            lines.push(line);
        }
    }
    if player.completed_quests.is_empty() {
        lines.push("Completed quests: none".to_string());
    } else {
        lines.push("Completed quests:".to_string());
        for name in &player.completed_quests {
            lines.push(format!("  - {}", name));
        }
    }
    lines
}
