/// Text command parsing.
///
/// Verbs match case-insensitively; arguments keep the player's typing and
/// are resolved against world names by the session.

/// Parsed player command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation
    Move(usize),   // 1, 2, ... - exit number as listed by look
    Look,          // look, l
    Flee,          // flee - leave combat to previous location

    // Items
    Get(String),       // get/take item
    Drop(String),      // drop item
    Inventory,         // inventory, inv, i
    Equip(String),     // equip item
    Unequip(String),   // unequip weapon|armor
    Use(String),       // use/read item
    Examine(String),   // examine/x item
    Rest,              // rest at a healing station

    // Combat
    Attack(String),    // attack monster

    // NPCs
    Talk(String),      // talk npc
    Ask(String),       // ask <npc> <topic>, split against known NPC names later

    // Information
    Status,
    Quests,
    Help,
    Quit,

    Empty,
    /// Verb recognised but its argument is missing; carries the prompt to show.
    MissingTarget(&'static str),
    Unknown(String),
}

impl Command {
    /// Commands that may be issued while fighting.
    pub fn allowed_in_combat(&self) -> bool {
        matches!(
            self,
            Command::Attack(_)
                | Command::Use(_)
                | Command::Flee
                | Command::Look
                | Command::Inventory
                | Command::Status
                | Command::Quests
                | Command::Help
                | Command::Quit
                | Command::Empty
                | Command::MissingTarget(_)
                | Command::Unknown(_)
        )
    }
}

fn with_target(rest: &str, make: fn(String) -> Command, prompt: &'static str) -> Command {
    if rest.is_empty() {
        Command::MissingTarget(prompt)
    } else {
        make(rest.to_string())
    }
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if let Ok(number) = trimmed.parse::<usize>() {
        return Command::Move(number);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "look" | "l" => Command::Look,
        "get" | "take" => with_target(rest, Command::Get, "Get what?"),
        "drop" => with_target(rest, Command::Drop, "Drop what?"),
        "inventory" | "inv" | "i" => Command::Inventory,
        "attack" => with_target(rest, Command::Attack, "Attack what?"),
        "status" => Command::Status,
        "equip" => with_target(rest, Command::Equip, "Equip what?"),
        "unequip" => with_target(rest, Command::Unequip, "Unequip weapon or armor?"),
        "use" | "read" => with_target(rest, Command::Use, "Use what?"),
        "examine" | "x" => with_target(rest, Command::Examine, "Examine what?"),
        "talk" => with_target(rest, Command::Talk, "Talk to whom?"),
        "ask" => with_target(rest, Command::Ask, "Ask whom about what?"),
        "quests" => Command::Quests,
        "help" | "h" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "flee" => Command::Flee,
        "rest" => Command::Rest,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub fn help_lines() -> Vec<&'static str> {
    vec![
        "Available commands:",
        "  - look: Show your current location and surroundings",
        "  - [number]: Move to another location using the exit list",
        "  - get [item]: Pick up an item",
        "  - drop [item]: Drop an item",
        "  - inventory: Show what you are carrying",
        "  - equip [item] / unequip weapon|armor: Manage your gear",
        "  - use [item]: Drink a potion or read something",
        "  - examine [item]: Look closely at an item",
        "  - attack [monster]: Fight a monster",
        "  - flee: Run back the way you came during a fight",
        "  - rest: Recover at a healing station",
        "  - talk [npc]: Speak with someone",
        "  - ask [npc] [topic]: Ask someone about a topic",
        "  - status: Show your stats",
        "  - quests: Show your quest log",
        "  - help: Show this help screen",
        "  - quit: Exit the game",
    ]
}
