/// Inventory and equipment handling.
///
/// Inventories hold item names; the world's templates are the single source
/// of item data. Equipped items live in their slot, never in the inventory.
use crate::adventure::errors::GameError;
use crate::adventure::player::Player;
use crate::adventure::types::ItemKind;
use crate::adventure::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "weapon" => Some(EquipSlot::Weapon),
            "armor" | "armour" => Some(EquipSlot::Armor),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
        }
    }
}

/// Outcome of an equip request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipResult {
    Equipped {
        item: String,
        slot: EquipSlot,
        replaced: Option<String>,
    },
    NotCarried,
    NotEquippable,
}

/// Case-insensitive name match against a list, returning the canonical entry.
pub fn match_name<'a>(candidates: &'a [String], wanted: &str) -> Option<&'a String> {
    let wanted = wanted.trim();
    candidates.iter().find(|c| c.eq_ignore_ascii_case(wanted))
}

pub fn add_item(player: &mut Player, item: &str) {
    player.inventory.push(item.to_string());
}

/// Remove one copy of `item`. Returns false if the player did not carry it.
pub fn remove_item(player: &mut Player, item: &str) -> bool {
    match player.inventory.iter().position(|i| i == item) {
        Some(idx) => {
            player.inventory.remove(idx);
            true
        }
        None => false,
    }
}

fn slot_for(kind: &ItemKind) -> Option<EquipSlot> {
    match kind {
        ItemKind::Weapon { .. } => Some(EquipSlot::Weapon),
        ItemKind::Armor { .. } => Some(EquipSlot::Armor),
        ItemKind::Plain | ItemKind::Potion { .. } | ItemKind::Readable { .. } => None,
    }
}

fn slot_mut(player: &mut Player, slot: EquipSlot) -> &mut Option<String> {
    match slot {
        EquipSlot::Weapon => &mut player.equipped_weapon,
        EquipSlot::Armor => &mut player.equipped_armor,
    }
}

/// Equip a carried item, returning any previous occupant of the slot to inventory.
pub fn equip_item(player: &mut Player, world: &World, wanted: &str) -> Result<EquipResult, GameError> {
    let item_name = match match_name(&player.inventory, wanted) {
        Some(name) => name.clone(),
        None => return Ok(EquipResult::NotCarried),
    };
    let template = world.get_item(&item_name)?;
    let slot = match slot_for(&template.kind) {
        Some(slot) => slot,
        None => return Ok(EquipResult::NotEquippable),
    };

    remove_item(player, &item_name);
    let replaced = slot_mut(player, slot).replace(item_name.clone());
    if let Some(previous) = &replaced {
        add_item(player, previous);
    }
    Ok(EquipResult::Equipped {
        item: item_name,
        slot,
        replaced,
    })
}

/// Empty a slot back into inventory. Returns the item that was removed, if any.
pub fn unequip_slot(player: &mut Player, slot: EquipSlot) -> Option<String> {
    let removed = slot_mut(player, slot).take();
    if let Some(item) = &removed {
        add_item(player, item);
    }
    removed
}

/// Damage bonus from the equipped weapon (0 when unarmed).
pub fn weapon_damage(player: &Player, world: &World) -> Result<i32, GameError> {
    match &player.equipped_weapon {
        Some(name) => match world.get_item(name)?.kind {
            ItemKind::Weapon { damage } => Ok(i32::try_from(damage).unwrap_or(i32::MAX)),
            _ => Ok(0),
        },
        None => Ok(0),
    }
}

pub fn armor_defense(player: &Player, world: &World) -> Result<i32, GameError> {
    match &player.equipped_armor {
        Some(name) => match world.get_item(name)?.kind {
            ItemKind::Armor { defense } => Ok(i32::try_from(defense).unwrap_or(i32::MAX)),
            _ => Ok(0),
        },
        None => Ok(0),
    }
}

pub fn format_inventory(player: &Player) -> Vec<String> {
    let mut lines = Vec::new();
    if player.inventory.is_empty() {
        lines.push("You are not carrying anything.".to_string());
    } else {
        lines.push("You are carrying:".to_string());
        for item in &player.inventory {
            lines.push(format!("  - {}", item));
        }
    }
    if let Some(weapon) = &player.equipped_weapon {
        lines.push(format!("Weapon: {}", weapon));
    }
    if let Some(armor) = &player.equipped_armor {
        lines.push(format!("Armor: {}", armor));
    }
    lines
}
