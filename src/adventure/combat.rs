//! Turn-based combat between the player and a monster instance.
//!
//! - Engaging clones the monster template into a [`MonsterInstance`] held in
//!   the player's combat slot; the template is never touched.
//! - Each attack is one exchange: the player strikes, then a surviving
//!   monster retaliates.
//! - Defeat grants XP, drops loot into the location, and notifies quests.

use crate::adventure::errors::GameError;
use crate::adventure::inventory::{armor_defense, weapon_damage};
use crate::adventure::io::GameIo;
use crate::adventure::player::Player;
use crate::adventure::quest::{announce_level_ups, evaluate_completions, record_kill};
use crate::adventure::session::LocationState;
use crate::adventure::types::{DropChance, MonsterTemplate};
use crate::adventure::world::World;
use crate::config::ProgressionConfig;
use log::{debug, info};
use rand::Rng;

/// A live, mutable copy of a monster for one encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterInstance {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack_power: i32,
}

impl MonsterInstance {
    pub fn spawn(template: &MonsterTemplate) -> Self {
        Self {
            name: template.name.clone(),
            hp: template.hp,
            max_hp: template.hp,
            attack_power: template.attack_power,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Both sides still standing.
    Continue,
    /// The monster fell; the player is out of combat.
    Victory,
    /// Player HP reached zero. Terminal.
    PlayerDefeated,
}

/// Damage dealt by the player: base attack plus equipped weapon.
pub fn player_damage(player: &Player, world: &World) -> Result<i32, GameError> {
    Ok(player.attack_power.saturating_add(weapon_damage(player, world)?))
}

/// Damage a monster deals through the player's armor, floored at zero.
pub fn incoming_damage(monster_attack: i32, defense: i32) -> i32 {
    (monster_attack - defense).max(0)
}

/// Roll each drop-table entry once. Chance at or above 1 always drops,
/// at or below 0 never does.
pub fn roll_drops<R: Rng + ?Sized>(table: &[DropChance], rng: &mut R) -> Vec<String> {
    table
        .iter()
        .filter(|entry| {
            if entry.chance >= 1.0 {
                true
            } else if entry.chance <= 0.0 || entry.chance.is_nan() {
                false
            } else {
                rng.gen_bool(entry.chance)
            }
        })
        .map(|entry| entry.item.clone())
        .collect()
}

/// Start a fight with a monster from the location's active list.
pub fn engage(world: &World, player: &mut Player, monster_name: &str) -> Result<(), GameError> {
    let template = world.get_monster_template(monster_name)?;
    debug!("{} engages {}", player.name, template.name);
    player.current_combat_target = Some(MonsterInstance::spawn(template));
    Ok(())
}

/// Resolve one attack exchange against the current combat target.
pub fn resolve_attack<R: Rng + ?Sized>(
    world: &World,
    player: &mut Player,
    location: &mut LocationState,
    progression: &ProgressionConfig,
    rng: &mut R,
    io: &mut dyn GameIo,
) -> Result<CombatOutcome, GameError> {
    let target_name = match &player.current_combat_target {
        Some(target) => target.name.clone(),
        None => return Ok(CombatOutcome::Continue),
    };
    let template = world.get_monster_template(&target_name)?;
    let damage = player_damage(player, world)?;

    let remaining = match player.current_combat_target.as_mut() {
        Some(target) => {
            target.hp -= damage;
            target.hp
        }
        None => return Ok(CombatOutcome::Continue),
    };
    io.say(&format!("You attack the {} for {} damage.", target_name, damage));

    if remaining <= 0 {
        defeat_monster(world, player, location, progression, template, rng, io)?;
        return Ok(CombatOutcome::Victory);
    }
    io.say(&format!("{} has {} HP left.", target_name, remaining));
    monster_turn(world, player, io)
}

/// The current target strikes back once.
pub fn monster_turn(
    world: &World,
    player: &mut Player,
    io: &mut dyn GameIo,
) -> Result<CombatOutcome, GameError> {
    let (name, attack) = match &player.current_combat_target {
        Some(target) => (target.name.clone(), target.attack_power),
        None => return Ok(CombatOutcome::Continue),
    };
    let damage = incoming_damage(attack, armor_defense(player, world)?);
    player.take_damage(damage);
    io.say(&format!("{} attacks you for {} damage.", name, damage));
    io.say(&format!("You have {} HP left.", player.hp.max(0)));

    if player.is_defeated() {
        info!("{} was defeated by {}", player.name, name);
        io.say("You have been defeated. Game over.");
        return Ok(CombatOutcome::PlayerDefeated);
    }
    Ok(CombatOutcome::Continue)
}

fn defeat_monster<R: Rng + ?Sized>(
    world: &World,
    player: &mut Player,
    location: &mut LocationState,
    progression: &ProgressionConfig,
    template: &MonsterTemplate,
    rng: &mut R,
    io: &mut dyn GameIo,
) -> Result<(), GameError> {
    player.current_combat_target = None;
    debug!("{} defeated {}", player.name, template.name);
    io.say(&format!("You defeated the {}!", template.name));

    if template.xp > 0 {
        io.say(&format!("You gain {} XP.", template.xp));
        let level_ups = player.gain_xp(template.xp, progression);
        announce_level_ups(io, &level_ups);
    }

    let mut drops = template.loot.clone();
    drops.extend(roll_drops(&template.drop_table, rng));
    for item in drops {
        io.say(&format!("The {} dropped a {}.", template.name, item));
        location.items.push(item);
    }

    record_kill(player, &template.name);
    location.remove_monster(&template.name);
    evaluate_completions(world, player, progression, io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn drop(item: &str, chance: f64) -> DropChance {
        DropChance {
            item: item.to_string(),
            chance,
        }
    }

    #[test]
    fn certain_and_impossible_drops_ignore_the_roll() {
        let mut rng = StdRng::seed_from_u64(1);
        let table = vec![drop("Note", 1.0), drop("Charm", 0.0), drop("Relic", 1.5), drop("Dust", -0.2)];
        for _ in 0..20 {
            assert_eq!(roll_drops(&table, &mut rng), vec!["Note".to_string(), "Relic".to_string()]);
        }
    }

    #[test]
    fn seeded_rolls_are_repeatable() {
        let table = vec![drop("Note", 0.5), drop("Potion", 0.3)];
        let first: Vec<Vec<String>> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| roll_drops(&table, &mut rng)).collect()
        };
        let second: Vec<Vec<String>> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| roll_drops(&table, &mut rng)).collect()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn armor_floors_incoming_damage_at_zero() {
        assert_eq!(incoming_damage(4, 2), 2);
        assert_eq!(incoming_damage(2, 4), 0);
    }

    #[test]
    fn spawn_copies_template_stats() {
        let template = MonsterTemplate {
            name: "Skeleton".to_string(),
            description: String::new(),
            hp: 10,
            attack_power: 4,
            xp: 25,
            loot: vec![],
            drop_table: vec![],
        };
        let mut instance = MonsterInstance::spawn(&template);
        instance.hp -= 12;
        assert!(instance.is_dead());
        assert_eq!(template.hp, 10);
        assert_eq!(MonsterInstance::spawn(&template).hp, 10);
    }
}
