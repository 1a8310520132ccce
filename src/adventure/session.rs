//! Single-player game session: owns the mutable state and routes commands
//! into the inventory, combat, quest, and dialogue modules.

use crate::adventure::combat::{self, CombatOutcome};
use crate::adventure::commands::{help_lines, parse_command, Command};
use crate::adventure::dialogue::resolve_npc_dialogue;
use crate::adventure::errors::GameError;
use crate::adventure::inventory::{
    self, armor_defense, equip_item, format_inventory, match_name, unequip_slot, weapon_damage,
    EquipResult, EquipSlot,
};
use crate::adventure::io::GameIo;
use crate::adventure::player::Player;
use crate::adventure::quest::{
    check_quest_availability, evaluate_completions, format_quest_log, offer_quest, Trigger,
};
use crate::adventure::types::{ItemKind, LocationTemplate};
use crate::adventure::world::World;
use crate::config::ProgressionConfig;
use crate::logutil::escape_log;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Per-session mutable view of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationState {
    /// Items on the ground; persists across visits.
    pub items: Vec<String>,
    /// Monsters not yet defeated since the last entry.
    pub active_monsters: Vec<String>,
    /// Remaining healing-station charges, if the location has a station.
    pub healing_uses: Option<u32>,
}

impl LocationState {
    pub fn from_template(template: &LocationTemplate) -> Self {
        Self {
            items: template.items.clone(),
            active_monsters: template.monsters.clone(),
            healing_uses: template.healing_station.as_ref().map(|s| s.uses),
        }
    }

    /// Remove one monster of this name. Returns false if none was listed.
    pub fn remove_monster(&mut self, name: &str) -> bool {
        match self.active_monsters.iter().position(|m| m == name) {
            Some(idx) => {
                self.active_monsters.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Quit,
    Defeated,
}

pub struct GameSession {
    world: World,
    progression: ProgressionConfig,
    player: Player,
    locations: HashMap<String, LocationState>,
    rng: StdRng,
    status: SessionStatus,
}

fn state_mut<'a>(
    locations: &'a mut HashMap<String, LocationState>,
    name: &str,
) -> Result<&'a mut LocationState, GameError> {
    locations
        .get_mut(name)
        .ok_or_else(|| GameError::not_found("location", name))
}

impl GameSession {
    pub fn new(
        world: World,
        player_name: &str,
        progression: ProgressionConfig,
        seed: Option<u64>,
    ) -> Self {
        let player = Player::new(player_name, world.starting_stats(), world.player_start());
        let locations = world
            .locations()
            .map(|template| (template.name.clone(), LocationState::from_template(template)))
            .collect();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world,
            progression,
            player,
            locations,
            rng,
            status: SessionStatus::Running,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn location_state(&self, name: &str) -> Option<&LocationState> {
        self.locations.get(name)
    }

    pub fn location_state_mut(&mut self, name: &str) -> Option<&mut LocationState> {
        self.locations.get_mut(name)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Greet the player and describe the starting location.
    pub fn start(&mut self, io: &mut dyn GameIo) {
        info!(
            "session started for {} ({}) at {}",
            self.player.name, self.player.id, self.player.current_location
        );
        io.say(&format!(
            "Welcome, {}! Type 'help' for a list of commands.",
            self.player.name
        ));
        let start = self.player.current_location.clone();
        if let Err(e) = self.arrive(&start, io) {
            self.report(&e, io);
        }
    }

    /// Parse and run one line of input.
    pub fn execute_line(&mut self, line: &str, io: &mut dyn GameIo) -> SessionStatus {
        debug!("input from {}: {}", self.player.name, escape_log(line));
        self.execute(parse_command(line), io)
    }

    pub fn execute(&mut self, command: Command, io: &mut dyn GameIo) -> SessionStatus {
        if self.status != SessionStatus::Running {
            return self.status;
        }
        if self.player.in_combat() && !command.allowed_in_combat() {
            io.say("You cannot do that in combat.");
            return self.status;
        }
        if let Err(e) = self.dispatch(command, io) {
            self.report(&e, io);
        }
        self.status
    }

    fn report(&self, error: &GameError, io: &mut dyn GameIo) {
        warn!("command aborted: {}", error);
        io.say(&error.player_message());
    }

    fn dispatch(&mut self, command: Command, io: &mut dyn GameIo) -> Result<(), GameError> {
        match command {
            Command::Move(number) => self.handle_move(number, io),
            Command::Look => self.handle_look(io),
            Command::Flee => self.handle_flee(io),
            Command::Get(target) => self.handle_get(&target, io),
            Command::Drop(target) => self.handle_drop(&target, io),
            Command::Inventory => {
                for line in format_inventory(&self.player) {
                    io.say(&line);
                }
                Ok(())
            }
            Command::Equip(target) => self.handle_equip(&target, io),
            Command::Unequip(slot) => self.handle_unequip(&slot, io),
            Command::Use(target) => self.handle_use(&target, io),
            Command::Examine(target) => self.handle_examine(&target, io),
            Command::Rest => self.handle_rest(io),
            Command::Attack(target) => self.handle_attack(&target, io),
            Command::Talk(target) => self.handle_talk(&target, io),
            Command::Ask(rest) => self.handle_ask(&rest, io),
            Command::Status => self.handle_status(io),
            Command::Quests => {
                for line in format_quest_log(&self.player) {
                    io.say(&line);
                }
                Ok(())
            }
            Command::Help => {
                for line in help_lines() {
                    io.say(line);
                }
                Ok(())
            }
            Command::Quit => {
                info!("{} quit the session", self.player.name);
                io.say("Thanks for playing!");
                self.status = SessionStatus::Quit;
                Ok(())
            }
            Command::Empty => Ok(()),
            Command::MissingTarget(prompt) => {
                io.say(prompt);
                Ok(())
            }
            Command::Unknown(_) => {
                io.say("Unknown command. Type 'help' for a list of commands.");
                Ok(())
            }
        }
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Move the player into `name`: respawn its monsters, describe it, and
    /// fire the location-enter trigger.
    pub fn enter_location(&mut self, name: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        self.world.get_location(name)?;
        self.player.previous_location = Some(self.player.current_location.clone());
        self.arrive(name, io)
    }

    fn arrive(&mut self, name: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let template = self.world.get_location(name)?;
        let state = self
            .locations
            .entry(template.name.clone())
            .or_insert_with(|| LocationState::from_template(template));
        state.active_monsters = template.monsters.clone();
        self.player.current_location = template.name.clone();
        debug!("{} entered {}", self.player.name, template.name);

        io.clear();
        self.handle_look(io)?;
        check_quest_availability(
            &self.world,
            &mut self.player,
            &self.progression,
            io,
            &Trigger::LocationEnter(name.to_string()),
        )
    }

    fn handle_move(&mut self, number: usize, io: &mut dyn GameIo) -> Result<(), GameError> {
        let location = self.world.get_location(&self.player.current_location)?;
        let destination = match number.checked_sub(1).and_then(|idx| location.exits.get(idx)) {
            Some(exit) => exit.destination.clone(),
            None => {
                io.say("Invalid exit number.");
                return Ok(());
            }
        };
        self.enter_location(&destination, io)
    }

    fn handle_look(&self, io: &mut dyn GameIo) -> Result<(), GameError> {
        let location = self.world.get_location(&self.player.current_location)?;
        let state = self
            .locations
            .get(&location.name)
            .ok_or_else(|| GameError::not_found("location", &location.name))?;

        io.say(&format!("== {} ==", location.name));
        io.say(&location.description);
        io.say("Exits:");
        if location.exits.is_empty() {
            io.say("  None");
        }
        for (idx, exit) in location.exits.iter().enumerate() {
            io.say(&format!(
                "  {}. {} -> {}",
                idx + 1,
                capitalize(&exit.direction),
                exit.destination
            ));
        }
        io.say(&format!("Items: {}", list_or_none(&state.items)));
        io.say(&format!("Monsters: {}", list_or_none(&state.active_monsters)));
        if !location.npcs.is_empty() {
            io.say(&format!("People: {}", location.npcs.join(", ")));
        }
        if let (Some(station), Some(uses)) = (&location.healing_station, state.healing_uses) {
            io.say(&format!("A {} is here ({} uses left).", station.name, uses));
        }
        if let Some(target) = &self.player.current_combat_target {
            io.say(&format!(
                "You are fighting the {} ({}/{} HP).",
                target.name, target.hp.max(0), target.max_hp
            ));
        }
        Ok(())
    }

    fn handle_flee(&mut self, io: &mut dyn GameIo) -> Result<(), GameError> {
        let target = match &self.player.current_combat_target {
            Some(target) => target.name.clone(),
            None => {
                io.say("You are not in combat.");
                return Ok(());
            }
        };
        self.player.current_combat_target = None;
        debug!("{} fled from {}", self.player.name, target);
        io.say(&format!("You flee from the {}!", target));
        match self.player.previous_location.clone() {
            Some(previous) => self.enter_location(&previous, io),
            // Nowhere to go back to; the fight still ends.
            None => self.handle_look(io),
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    fn handle_get(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let state = state_mut(&mut self.locations, &self.player.current_location)?;
        let item = match match_name(&state.items, target) {
            Some(item) => item.clone(),
            None => {
                io.say(&format!("You don't see a {} here.", target));
                return Ok(());
            }
        };
        if let Some(idx) = state.items.iter().position(|i| *i == item) {
            state.items.remove(idx);
        }
        inventory::add_item(&mut self.player, &item);
        io.say(&format!("You pick up the {}.", item));

        evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
        check_quest_availability(
            &self.world,
            &mut self.player,
            &self.progression,
            io,
            &Trigger::ItemPickup(item),
        )
    }

    fn handle_drop(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let item = match match_name(&self.player.inventory, target) {
            Some(item) => item.clone(),
            None => {
                io.say(&format!("You don't have a {}.", target));
                return Ok(());
            }
        };
        let state = state_mut(&mut self.locations, &self.player.current_location)?;
        inventory::remove_item(&mut self.player, &item);
        state.items.push(item.clone());
        io.say(&format!("You drop the {}.", item));
        evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
        Ok(())
    }

    fn handle_equip(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        match equip_item(&mut self.player, &self.world, target)? {
            EquipResult::Equipped { item, slot, replaced } => {
                io.say(&format!("You equip the {} as your {}.", item, slot.label()));
                if let Some(previous) = replaced {
                    io.say(&format!("You put the {} back in your pack.", previous));
                    evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
                }
            }
            EquipResult::NotCarried => io.say(&format!("You don't have a {}.", target)),
            EquipResult::NotEquippable => io.say(&format!("You can't equip the {}.", target)),
        }
        Ok(())
    }

    fn handle_unequip(&mut self, slot: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let slot = match EquipSlot::parse(slot) {
            Some(slot) => slot,
            None => {
                io.say("Unequip weapon or armor?");
                return Ok(());
            }
        };
        match unequip_slot(&mut self.player, slot) {
            Some(item) => {
                io.say(&format!("You unequip the {}.", item));
                evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
            }
            None => io.say(&format!("You have no {} equipped.", slot.label())),
        }
        Ok(())
    }

    fn handle_use(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let item = match match_name(&self.player.inventory, target) {
            Some(item) => item.clone(),
            None => {
                io.say(&format!("You don't have a {}.", target));
                return Ok(());
            }
        };
        let template = self.world.get_item(&item)?;
        match &template.kind {
            ItemKind::Potion { heal_amount } => {
                inventory::remove_item(&mut self.player, &item);
                let healed = self.player.heal(i32::try_from(*heal_amount).unwrap_or(i32::MAX));
                io.say(&format!(
                    "You drink the {} and recover {} HP. ({}/{})",
                    item, healed, self.player.hp, self.player.max_hp
                ));
                evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
            }
            ItemKind::Readable { lore_text } => {
                io.say(&format!("You read the {}:", item));
                io.say(lore_text);
            }
            ItemKind::Weapon { .. } | ItemKind::Armor { .. } => {
                io.say(&format!("Try equipping the {} instead.", item));
                return Ok(());
            }
            ItemKind::Plain => {
                io.say(&format!("You can't use the {}.", item));
                return Ok(());
            }
        }

        // Using an item in a fight costs the turn.
        if self.player.in_combat() {
            if combat::monster_turn(&self.world, &mut self.player, io)? == CombatOutcome::PlayerDefeated {
                self.status = SessionStatus::Defeated;
            }
        }
        Ok(())
    }

    fn handle_examine(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let carried = match_name(&self.player.inventory, target).cloned();
        let equipped = [&self.player.equipped_weapon, &self.player.equipped_armor]
            .into_iter()
            .flatten()
            .find(|name| name.eq_ignore_ascii_case(target.trim()))
            .cloned();
        let on_ground = self
            .locations
            .get(&self.player.current_location)
            .and_then(|state| match_name(&state.items, target).cloned());

        let item = match carried.clone().or(equipped).or(on_ground) {
            Some(item) => item,
            None => {
                io.say(&format!("You don't see a {} here.", target));
                return Ok(());
            }
        };
        let template = self.world.get_item(&item)?;
        io.say(&format!("{} ({})", template.name, template.kind.label()));
        if !template.description.is_empty() {
            io.say(&template.description);
        }
        match &template.kind {
            ItemKind::Weapon { damage } => io.say(&format!("Damage: +{}", damage)),
            ItemKind::Armor { defense } => io.say(&format!("Defense: +{}", defense)),
            ItemKind::Potion { heal_amount } => io.say(&format!("Restores up to {} HP.", heal_amount)),
            ItemKind::Readable { .. } => io.say("There is writing on it."),
            ItemKind::Plain => {}
        }

        if let Some(item) = carried {
            check_quest_availability(
                &self.world,
                &mut self.player,
                &self.progression,
                io,
                &Trigger::ItemPickup(item),
            )?;
        }
        Ok(())
    }

    fn handle_rest(&mut self, io: &mut dyn GameIo) -> Result<(), GameError> {
        let location = self.world.get_location(&self.player.current_location)?;
        let state = state_mut(&mut self.locations, &location.name)?;
        let (station, uses) = match (&location.healing_station, state.healing_uses) {
            (Some(station), Some(uses)) => (station, uses),
            _ => {
                io.say("There is nowhere to rest here.");
                return Ok(());
            }
        };
        if uses == 0 {
            io.say(&format!("The {} has no power left.", station.name));
            return Ok(());
        }
        if self.player.hp >= self.player.max_hp {
            io.say("You are already at full health.");
            return Ok(());
        }
        state.healing_uses = Some(uses - 1);
        let healed = self.player.heal(station.heal_amount);
        io.say(&format!(
            "You rest at the {} and recover {} HP. ({}/{})",
            station.name, healed, self.player.hp, self.player.max_hp
        ));
        Ok(())
    }

    // ========================================================================
    // Combat
    // ========================================================================

    fn handle_attack(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let state = state_mut(&mut self.locations, &self.player.current_location)?;
        match &self.player.current_combat_target {
            Some(current) if !current.name.eq_ignore_ascii_case(target.trim()) => {
                debug!("{} tried to switch target away from {}", self.player.name, current.name);
                io.say("You cannot do that in combat.");
                return Ok(());
            }
            Some(_) => {}
            None => match match_name(&state.active_monsters, target) {
                Some(monster) => {
                    let monster = monster.clone();
                    combat::engage(&self.world, &mut self.player, &monster)?;
                }
                None => {
                    io.say(&format!("You don't see a {} here.", target));
                    return Ok(());
                }
            },
        }

        let outcome = combat::resolve_attack(
            &self.world,
            &mut self.player,
            state,
            &self.progression,
            &mut self.rng,
            io,
        )?;
        if outcome == CombatOutcome::PlayerDefeated {
            self.status = SessionStatus::Defeated;
        }
        Ok(())
    }

    // ========================================================================
    // NPCs
    // ========================================================================

    fn handle_talk(&mut self, target: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let location = self.world.get_location(&self.player.current_location)?;
        let npc_name = match match_name(&location.npcs, target) {
            Some(name) => name.clone(),
            None => {
                io.say(&format!("There is no {} here.", target));
                return Ok(());
            }
        };
        let npc = self.world.get_npc(&npc_name)?;
        self.player.dialogue_history.insert(npc.name.clone());
        evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;

        let resolution = resolve_npc_dialogue(npc, &self.player, &self.world)?;
        io.say(&format!("{} says: \"{}\"", npc.name, resolution.line));
        if let Some(quest) = resolution.offered {
            offer_quest(&self.world, &mut self.player, &self.progression, io, &quest)?;
        }
        check_quest_availability(
            &self.world,
            &mut self.player,
            &self.progression,
            io,
            &Trigger::NpcTalk(npc_name),
        )
    }

    fn handle_ask(&mut self, rest: &str, io: &mut dyn GameIo) -> Result<(), GameError> {
        let location = self.world.get_location(&self.player.current_location)?;
        let rest = rest.trim();
        let matched = location
            .npcs
            .iter()
            .filter(|npc| {
                rest.get(..npc.len())
                    .map(|head| head.eq_ignore_ascii_case(npc))
                    .unwrap_or(false)
            })
            .max_by_key(|npc| npc.len());
        let npc_name = match matched {
            Some(name) => name.clone(),
            None => {
                io.say("There is no one like that here.");
                return Ok(());
            }
        };
        let topic = rest.get(npc_name.len()..).unwrap_or("").trim();
        if topic.is_empty() {
            io.say(&format!("Ask {} about what?", npc_name));
            return Ok(());
        }

        let npc = self.world.get_npc(&npc_name)?;
        let (key, response) = match npc.find_topic(topic) {
            Some((key, response)) => (key.clone(), response.clone()),
            None => {
                io.say(&format!("{} has nothing to say about {}.", npc.name, topic));
                return Ok(());
            }
        };
        io.say(&format!("{} says: \"{}\"", npc.name, response));

        let dialogue_key = format!("{}:{}", npc.name, key);
        self.player.dialogue_history.insert(dialogue_key.clone());
        evaluate_completions(&self.world, &mut self.player, &self.progression, io)?;
        check_quest_availability(
            &self.world,
            &mut self.player,
            &self.progression,
            io,
            &Trigger::AskTopic(dialogue_key),
        )
    }

    // ========================================================================
    // Information
    // ========================================================================

    fn handle_status(&mut self, io: &mut dyn GameIo) -> Result<(), GameError> {
        let weapon = weapon_damage(&self.player, &self.world)?;
        let defense = armor_defense(&self.player, &self.world)?;
        let player = &self.player;
        io.say(&format!("{} - Level {}", player.name, player.level));
        io.say(&format!("HP: {}/{}", player.hp, player.max_hp));
        io.say(&format!(
            "XP: {}/{}",
            player.xp,
            self.progression.threshold(player.level)
        ));
        io.say(&format!(
            "Attack: {} (base {} + weapon {})",
            player.attack_power + weapon,
            player.attack_power,
            weapon
        ));
        io.say(&format!("Defense: {}", defense));
        io.say(&format!(
            "Weapon: {}",
            player.equipped_weapon.as_deref().unwrap_or("none")
        ));
        io.say(&format!(
            "Armor: {}",
            player.equipped_armor.as_deref().unwrap_or("none")
        ));
        Ok(())
    }
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
