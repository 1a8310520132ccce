use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// Items
// ============================================================================

/// Kind-specific item data; dispatch on equip/use/examine matches on this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Plain,
    Weapon { damage: u32 },
    Armor { defense: u32 },
    Potion { heal_amount: u32 },
    Readable { lore_text: String },
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Plain => "item",
            ItemKind::Weapon { .. } => "weapon",
            ItemKind::Armor { .. } => "armor",
            ItemKind::Potion { .. } => "potion",
            ItemKind::Readable { .. } => "readable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

// ============================================================================
// Monsters
// ============================================================================

/// Chance-based extra drop rolled once per defeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropChance {
    pub item: String,
    pub chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonsterTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub hp: i32,
    pub attack_power: i32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub loot: Vec<String>,
    #[serde(default)]
    pub drop_table: Vec<DropChance>,
}

// ============================================================================
// Locations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exit {
    pub direction: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealingStation {
    #[serde(default = "default_station_name")]
    pub name: String,
    pub heal_amount: i32,
    pub uses: u32,
}

fn default_station_name() -> String {
    "healing shrine".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declaration order is the numbering shown to the player.
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub monsters: Vec<String>,
    #[serde(default)]
    pub npcs: Vec<String>,
    #[serde(default)]
    pub healing_station: Option<HealingStation>,
}

// ============================================================================
// NPCs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NpcDialogue {
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub quest_offer: HashMap<String, String>,
    #[serde(default)]
    pub quest_active: HashMap<String, String>,
    #[serde(default)]
    pub after_all_quests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NpcTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dialogue: NpcDialogue,
    /// Quests this NPC offers, in the order they are handed out.
    #[serde(default)]
    pub quests: Vec<String>,
    /// Topic key -> response for `ask <npc> <topic>`.
    #[serde(default)]
    pub topics: HashMap<String, String>,
}

impl NpcTemplate {
    /// Resolve a free-text topic to the declared key (case-insensitive).
    pub fn find_topic(&self, topic: &str) -> Option<(&String, &String)> {
        let wanted = topic.trim();
        self.topics
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
    }
}

// ============================================================================
// Quests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KillRequirement {
    pub target: String,
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Goal specification, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Goal {
    /// Kill `count` of `target` while the quest is active.
    Kill {
        target: String,
        #[serde(default = "default_count")]
        count: u32,
    },
    /// Every listed target reaches its own count.
    KillMulti { requirements: Vec<KillRequirement> },
    /// Any one target present in inventory (first match wins, count not summed).
    Collect {
        targets: Vec<String>,
        #[serde(default = "default_count")]
        count: u32,
    },
    /// Inventory possession of any target, or a matching dialogue history key.
    CollectOrTalk {
        targets: Vec<String>,
        #[serde(default = "default_count")]
        count: u32,
    },
}

impl Goal {
    /// Monster names this goal counts kills for.
    pub fn kill_targets(&self) -> Vec<&str> {
        match self {
            Goal::Kill { target, .. } => vec![target.as_str()],
            Goal::KillMulti { requirements } => {
                requirements.iter().map(|r| r.target.as_str()).collect()
            }
            Goal::Collect { .. } | Goal::CollectOrTalk { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    LocationEnter,
    ItemPickup,
    AskTopic,
    NpcTalk,
}

/// A start condition may name one reference or a set of acceptable ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NameSet {
    One(String),
    Many(Vec<String>),
}

impl NameSet {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            NameSet::One(only) => only == name,
            NameSet::Many(names) => names.iter().any(|n| n == name),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            NameSet::One(only) => vec![only.as_str()],
            NameSet::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartCondition {
    pub trigger: TriggerKind,
    pub target: NameSet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuestReward {
    #[serde(default)]
    pub xp: Option<u32>,
    #[serde(default)]
    pub item: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OnAccept {
    #[serde(default)]
    pub item: Option<String>,
}

/// Immutable quest definition loaded once with the world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start: Option<StartCondition>,
    pub goal: Goal,
    /// Secondary goal that completes the quest on its own.
    #[serde(default)]
    pub alternate_goal: Option<Goal>,
    #[serde(default)]
    pub reward: QuestReward,
    #[serde(default)]
    pub on_accept: OnAccept,
    #[serde(default)]
    pub prerequisite: Option<String>,
    #[serde(default)]
    pub unlocks: Vec<String>,
}

// ============================================================================
// Quest progress records (per player)
// ============================================================================

/// Progress shape depends on the goal kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalProgress {
    /// Scalar kill counter for `Goal::Kill`.
    Counter(u32),
    /// Independent per-target counters for `Goal::KillMulti`.
    PerTarget(BTreeMap<String, u32>),
    /// Collection goals are evaluated against inventory and dialogue history.
    Untracked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalTracker {
    pub goal: Goal,
    pub progress: GoalProgress,
}

impl GoalTracker {
    pub fn new(goal: &Goal) -> Self {
        let progress = match goal {
            Goal::Kill { .. } => GoalProgress::Counter(0),
            Goal::KillMulti { requirements } => GoalProgress::PerTarget(
                requirements
                    .iter()
                    .map(|r| (r.target.clone(), 0))
                    .collect(),
            ),
            Goal::Collect { .. } | Goal::CollectOrTalk { .. } => GoalProgress::Untracked,
        };
        Self {
            goal: goal.clone(),
            progress,
        }
    }

    /// Count a kill; returns true if this tracker cared about the monster.
    pub fn record_kill(&mut self, monster: &str) -> bool {
        match (&self.goal, &mut self.progress) {
            (Goal::Kill { target, .. }, GoalProgress::Counter(kills)) if target == monster => {
                *kills = kills.saturating_add(1);
                true
            }
            (Goal::KillMulti { .. }, GoalProgress::PerTarget(per_target)) => {
                match per_target.get_mut(monster) {
                    Some(kills) => {
                        *kills = kills.saturating_add(1);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    pub fn is_satisfied(&self, inventory: &[String], dialogue_history: &BTreeSet<String>) -> bool {
        match (&self.goal, &self.progress) {
            (Goal::Kill { count, .. }, GoalProgress::Counter(kills)) => kills >= count,
            (Goal::KillMulti { requirements }, GoalProgress::PerTarget(per_target)) => {
                requirements.iter().all(|req| {
                    per_target.get(&req.target).copied().unwrap_or(0) >= req.count
                })
            }
            (Goal::Collect { targets, .. }, _) => {
                targets.iter().any(|t| inventory.contains(t))
            }
            (Goal::CollectOrTalk { targets, .. }, _) => targets
                .iter()
                .any(|t| inventory.contains(t) || dialogue_history.contains(t)),
            // Progress shape out of step with the goal: nothing can satisfy it.
            _ => false,
        }
    }

    /// Short progress summary for the quest log.
    pub fn describe(&self) -> String {
        match (&self.goal, &self.progress) {
            (Goal::Kill { target, count }, GoalProgress::Counter(kills)) => {
                format!("defeat {} [{}/{}]", target, kills.min(count), count)
            }
            (Goal::KillMulti { requirements }, GoalProgress::PerTarget(per_target)) => {
                let parts: Vec<String> = requirements
                    .iter()
                    .map(|req| {
                        let kills = per_target.get(&req.target).copied().unwrap_or(0);
                        format!("{} [{}/{}]", req.target, kills.min(req.count), req.count)
                    })
                    .collect();
                format!("defeat {}", parts.join(", "))
            }
            (Goal::Collect { targets, .. }, _) => {
                format!("find any of: {}", targets.join(", "))
            }
            (Goal::CollectOrTalk { targets, .. }, _) => {
                format!("find or learn about any of: {}", targets.join(", "))
            }
            _ => "progress unknown".to_string(),
        }
    }
}

/// Per-player copy of a quest's goal tracking, instantiated on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestProgress {
    pub name: String,
    pub primary: GoalTracker,
    #[serde(default)]
    pub alternate: Option<GoalTracker>,
    pub accepted_at: DateTime<Utc>,
}

impl QuestProgress {
    pub fn from_template(template: &QuestTemplate) -> Self {
        Self {
            name: template.name.clone(),
            primary: GoalTracker::new(&template.goal),
            alternate: template.alternate_goal.as_ref().map(GoalTracker::new),
            accepted_at: Utc::now(),
        }
    }

    pub fn record_kill(&mut self, monster: &str) -> bool {
        let primary = self.primary.record_kill(monster);
        let alternate = self
            .alternate
            .as_mut()
            .map(|alt| alt.record_kill(monster))
            .unwrap_or(false);
        primary || alternate
    }

    pub fn is_satisfied(&self, inventory: &[String], dialogue_history: &BTreeSet<String>) -> bool {
        self.primary.is_satisfied(inventory, dialogue_history)
            || self
                .alternate
                .as_ref()
                .map(|alt| alt.is_satisfied(inventory, dialogue_history))
                .unwrap_or(false)
    }
}

// ============================================================================
// Player starting stats
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub attack_power: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: 30,
            max_hp: 30,
            attack_power: 3,
            level: 1,
            xp: 0,
        }
    }
}
