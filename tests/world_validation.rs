/// World data integrity: the offline validator and runtime handling of
/// references the validator would have caught.
mod common;

use shademire::adventure::{GameSession, ScriptedIo, SessionStatus, World, WorldDocument};
use shademire::config::ProgressionConfig;
use shademire::validation::validate_world;
use std::fs;

#[test]
fn shipped_world_is_clean() {
    let errors = validate_world(&common::load_document());
    assert!(errors.is_empty(), "unexpected integrity errors: {:#?}", errors);
}

#[test]
fn broken_exit_and_npc_quest_are_reported() {
    let mut document = common::load_document();
    document.locations[0].exits[0].destination = "Shademire Forest".to_string();
    document.npcs[0].quests.push("Slay the Dragon".to_string());

    let errors = validate_world(&document);
    assert_eq!(
        errors,
        vec![
            "Broken exit in 'Luminaris': 'Shademire Forest' does not exist.".to_string(),
            "Undefined quest for NPC 'Guard Captain': 'Slay the Dragon'.".to_string(),
        ]
    );
}

#[test]
fn world_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");
    let document = common::load_document();
    fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

    let reloaded = WorldDocument::load(&path).unwrap();
    assert_eq!(reloaded.quests, document.quests);
    assert!(validate_world(&reloaded).is_empty());
}

#[test]
fn malformed_world_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");
    fs::write(&path, "{ \"player_start\": ").unwrap();
    assert!(World::load(&path).is_err());
}

const BROKEN_WORLD: &str = r#"{
    "player_start": "Yard",
    "items": [],
    "monsters": [],
    "locations": [{
        "name": "Yard",
        "description": "A muddy yard.",
        "monsters": ["Phantom"],
        "npcs": ["Keeper"]
    }],
    "npcs": [{
        "name": "Keeper",
        "dialogue": {"default": "Hm.", "quest_offer": {"Light the Way": "Take this lantern."}},
        "quests": ["Light the Way"]
    }],
    "quests": [{
        "name": "Light the Way",
        "goal": {"type": "collect", "targets": ["Ghost Lantern"]},
        "on_accept": {"item": "Ghost Lantern"}
    }]
}"#;

#[test]
fn missing_templates_abort_only_the_current_action() {
    let world = World::from_json_str(BROKEN_WORLD).unwrap();
    let mut session = GameSession::new(world, "Tester", ProgressionConfig::default(), Some(1));
    let mut io = ScriptedIo::new(["yes"]);
    session.start(&mut io);

    let status = session.execute_line("talk keeper", &mut io);
    assert_eq!(status, SessionStatus::Running);
    assert!(io.transcript_contains(
        "Something is wrong with the world data: item 'Ghost Lantern' is missing."
    ));
    assert!(!session.player().is_quest_active("Light the Way"));

    let status = session.execute_line("attack phantom", &mut io);
    assert_eq!(status, SessionStatus::Running);
    assert!(io.transcript_contains(
        "Something is wrong with the world data: monster 'Phantom' is missing."
    ));
    assert!(!session.player().in_combat());

    assert_eq!(session.execute_line("look", &mut io), SessionStatus::Running);
}
