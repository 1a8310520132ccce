use crate::adventure::combat::MonsterInstance;
use crate::adventure::types::{PlayerStats, QuestProgress};
use crate::config::ProgressionConfig;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Mutable per-session player state.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack_power: i32,
    pub level: u32,
    pub xp: u32,
    pub current_location: String,
    pub previous_location: Option<String>,
    /// Item names in pickup order; duplicates allowed.
    pub inventory: Vec<String>,
    pub equipped_weapon: Option<String>,
    pub equipped_armor: Option<String>,
    pub active_quests: BTreeMap<String, QuestProgress>,
    /// Completion order, kept for display.
    pub completed_quests: Vec<String>,
    /// NPC names and `"npc:topic"` keys already triggered.
    pub dialogue_history: BTreeSet<String>,
    /// Presence means the player is in combat.
    pub current_combat_target: Option<MonsterInstance>,
}

/// Stats after a single level-up, for narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub max_hp: i32,
    pub attack_power: i32,
}

impl Player {
    pub fn new(name: &str, stats: &PlayerStats, start_location: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hp: stats.hp,
            max_hp: stats.max_hp,
            attack_power: stats.attack_power,
            level: stats.level.max(1),
            xp: stats.xp,
            current_location: start_location.to_string(),
            previous_location: None,
            inventory: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
            active_quests: BTreeMap::new(),
            completed_quests: Vec::new(),
            dialogue_history: BTreeSet::new(),
            current_combat_target: None,
        }
    }

    pub fn in_combat(&self) -> bool {
        self.current_combat_target.is_some()
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.iter().any(|i| i == name)
    }

    pub fn is_quest_active(&self, quest: &str) -> bool {
        self.active_quests.contains_key(quest)
    }

    pub fn is_quest_completed(&self, quest: &str) -> bool {
        self.completed_quests.iter().any(|q| q == quest)
    }

    /// Restore up to `amount` HP without exceeding max. Returns HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount.max(0));
    }

    /// Add XP and apply every level-up it pays for.
    ///
    /// The threshold is re-checked after each level so one large grant can
    /// advance several levels.
    pub fn gain_xp(&mut self, amount: u32, progression: &ProgressionConfig) -> Vec<LevelUp> {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = Vec::new();
        loop {
            let threshold = progression.threshold(self.level);
            if threshold == 0 || self.xp < threshold {
                break;
            }
            self.xp -= threshold;
            self.level += 1;
            self.max_hp += progression.hp_per_level;
            self.attack_power += progression.attack_per_level;
            self.hp = self.max_hp;
            info!(
                "{} reached level {} (max hp {}, attack {})",
                self.name, self.level, self.max_hp, self.attack_power
            );
            gained.push(LevelUp {
                level: self.level,
                max_hp: self.max_hp,
                attack_power: self.attack_power,
            });
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Player {
        Player::new("Tester", &PlayerStats::default(), "Luminaris")
    }

    #[test]
    fn exact_threshold_levels_once_and_heals() {
        let mut player = fresh();
        player.hp = 4;
        let ups = player.gain_xp(100, &ProgressionConfig::default());
        assert_eq!(ups.len(), 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        assert_eq!(player.max_hp, 35);
        assert_eq!(player.hp, 35);
        assert_eq!(player.attack_power, 4);
    }

    #[test]
    fn large_grant_levels_multiple_times() {
        let mut player = fresh();
        // 100 + 200 + 300 crosses three thresholds, 50 left over.
        let ups = player.gain_xp(650, &ProgressionConfig::default());
        assert_eq!(ups.iter().map(|u| u.level).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(player.level, 4);
        assert_eq!(player.xp, 50);
        assert_eq!(player.max_hp, 45);
        assert_eq!(player.attack_power, 6);
    }

    #[test]
    fn below_threshold_only_accumulates() {
        let mut player = fresh();
        assert!(player.gain_xp(60, &ProgressionConfig::default()).is_empty());
        assert!(player.gain_xp(39, &ProgressionConfig::default()).is_empty());
        assert_eq!(player.xp, 99);
        assert_eq!(player.level, 1);
        assert_eq!(player.gain_xp(1, &ProgressionConfig::default()).len(), 1);
    }

    #[test]
    fn heal_is_capped_at_max() {
        let mut player = fresh();
        player.take_damage(5);
        assert_eq!(player.heal(10), 5);
        assert_eq!(player.hp, player.max_hp);
        player.take_damage(-3);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn huge_heal_amount_saturates_at_max() {
        let mut player = fresh();
        player.hp = 1;
        assert_eq!(player.heal(i32::MAX), player.max_hp - 1);
        assert_eq!(player.hp, player.max_hp);
    }
}
