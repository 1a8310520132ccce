//! Shademire game engine: world templates, player state, combat, and the
//! quest and dialogue progression that ties them together.

pub mod combat;
pub mod commands;
pub mod dialogue;
pub mod errors;
pub mod inventory;
pub mod io;
pub mod player;
pub mod quest;
pub mod session;
pub mod types;
pub mod world;

pub use combat::{roll_drops, CombatOutcome, MonsterInstance};
pub use commands::{parse_command, Command};
pub use dialogue::{resolve_npc_dialogue, DialogueResolution};
pub use errors::GameError;
pub use inventory::{equip_item, unequip_slot, EquipResult, EquipSlot};
pub use io::{GameIo, ScriptedIo, StdConsole};
pub use player::{LevelUp, Player};
pub use quest::{
    accept_quest, can_accept_quest, check_quest_availability, complete_quest,
    evaluate_completions, format_quest_log, offer_quest, record_kill, Trigger,
};
pub use session::{GameSession, LocationState, SessionStatus};
pub use types::{
    Goal, GoalProgress, GoalTracker, ItemKind, ItemTemplate, LocationTemplate, MonsterTemplate,
    NpcTemplate, QuestProgress, QuestTemplate, TriggerKind,
};
pub use world::{World, WorldDocument};
