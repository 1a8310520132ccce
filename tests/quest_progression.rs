/// Integration tests for quest progression on the shipped world.
///
/// Drives whole sessions through scripted input: trigger-based offers,
/// NPC offers, kill / collect / dialogue goals, alternate goals, unlocks,
/// and completion idempotence.
mod common;

use common::{load_world, new_session, run};
use shademire::adventure::{complete_quest, evaluate_completions, ScriptedIo};
use shademire::config::ProgressionConfig;

#[test]
fn catacombs_complete_through_the_wight() {
    let (mut session, mut io) = new_session(&["yes"]);

    session.execute_line("2", &mut io);
    assert_eq!(session.player().current_location, "Crumbling Catacombs");
    assert!(session.player().is_quest_active("Clear the Catacombs"));

    session.execute_line("2", &mut io);
    assert_eq!(session.player().current_location, "Crumbling Catacombs - Depths");
    session.player_mut().attack_power = 50;
    session.execute_line("attack undead wight", &mut io);

    let player = session.player();
    assert!(player.is_quest_completed("Clear the Catacombs"));
    assert!(!player.is_quest_active("Clear the Catacombs"));
    assert!(player.has_item("Leather Armor"));
    // 60 from the wight plus 75 from the quest
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 35);
    assert!(io.transcript_contains("Quest complete: Clear the Catacombs!"));
    assert!(session
        .location_state("Crumbling Catacombs - Depths")
        .unwrap()
        .active_monsters
        .is_empty());
}

#[test]
fn picking_up_the_letter_completes_the_swamp_quest() {
    let (mut session, mut io) = new_session(&["yes"]);

    session.execute_line("3", &mut io);
    assert!(session.player().is_quest_active("Investigate the Sunken Swamp"));

    session.execute_line("2", &mut io);
    session.execute_line("get captured letter", &mut io);

    let player = session.player();
    assert!(player.is_quest_completed("Investigate the Sunken Swamp"));
    assert!(player.has_item("Captured Letter"));
    assert!(player.has_item("Chainmail Vest"));
}

#[test]
fn asking_the_hermit_completes_the_swamp_quest_and_opens_the_next() {
    let (mut session, mut io) = new_session(&["yes", "yes"]);

    run(&mut session, &mut io, &["3", "ask swamp hermit letter"]);
    assert!(session.player().dialogue_history.contains("Swamp Hermit:letter"));
    assert!(session.player().is_quest_completed("Investigate the Sunken Swamp"));

    session.execute_line("talk swamp hermit", &mut io);
    assert!(io.transcript_contains("Swamp Hermit says: \"Mind the water. It bites.\""));
    assert!(session.player().is_quest_active("The Hermit's Warning"));
}

#[test]
fn hermits_warning_needs_both_kills() {
    let (mut session, mut io) = new_session(&["yes"]);
    session
        .player_mut()
        .completed_quests
        .push("Investigate the Sunken Swamp".to_string());

    run(&mut session, &mut io, &["3", "talk swamp hermit"]);
    assert!(session.player().is_quest_active("The Hermit's Warning"));

    session.player_mut().attack_power = 50;
    run(&mut session, &mut io, &["2", "attack bog horror"]);
    assert!(session.player().is_quest_active("The Hermit's Warning"));
    assert!(session
        .location_state("Sunken Swamp")
        .unwrap()
        .items
        .contains(&"Lore Fragment".to_string()));

    run(&mut session, &mut io, &["1", "1", "1", "attack cultist"]);
    assert_eq!(session.player().current_location, "Shademire Woods");
    assert!(session.player().is_quest_completed("The Hermit's Warning"));
    assert!(session.player().has_item("Healing Potion"));
}

#[test]
fn guard_captain_offers_clear_the_woods_with_a_potion() {
    let (mut session, mut io) = new_session(&["yes"]);
    session.execute_line("talk guard captain", &mut io);

    assert!(session.player().is_quest_active("Clear the Woods"));
    assert!(session.player().has_item("Healing Potion"));
    assert!(session.player().dialogue_history.contains("Guard Captain"));
    assert!(io.transcript_contains("Goblins have been creeping out of the woods"));

    session.execute_line("talk guard captain", &mut io);
    assert!(io.transcript_contains("Three goblins, that's all I ask."));
    assert_eq!(io.confirmations_asked(), 1);
}

#[test]
fn declined_offer_returns_on_reentry() {
    let (mut session, mut io) = new_session(&["no", "yes"]);

    session.execute_line("2", &mut io);
    assert!(!session.player().is_quest_active("Clear the Catacombs"));
    assert!(io.transcript_contains("You decline 'Clear the Catacombs' for now."));

    run(&mut session, &mut io, &["1", "2"]);
    assert!(session.player().is_quest_active("Clear the Catacombs"));
    assert_eq!(io.confirmations_asked(), 2);
}

#[test]
fn goblin_kills_complete_the_woods_and_unlock_the_scholar() {
    let (mut session, mut io) = new_session(&["yes", "yes"]);
    session.execute_line("talk guard captain", &mut io);
    session.execute_line("1", &mut io);
    session.player_mut().attack_power = 50;

    run(&mut session, &mut io, &["attack shadow-touched goblin", "attack shadow-touched goblin"]);
    assert!(session.player().is_quest_active("Clear the Woods"));
    session.execute_line("attack shadow-touched goblin", &mut io);

    assert!(session.player().is_quest_completed("Clear the Woods"));
    assert!(io.transcript_contains("New quest unlocked: Investigate the Hollow Clues"));
    // Unlocking alone does not start the quest.
    assert!(!session.player().is_quest_active("Investigate the Hollow Clues"));
    assert_eq!(
        session
            .location_state("Shademire Woods")
            .unwrap()
            .items
            .iter()
            .filter(|i| *i == "Goblin Ear")
            .count(),
        3
    );

    run(&mut session, &mut io, &["1", "talk wandering scholar"]);
    assert!(session.player().is_quest_active("Investigate the Hollow Clues"));
}

#[test]
fn scholar_offers_second_quest_once_first_is_done() {
    let (mut session, mut io) = new_session(&["no"]);
    {
        let player = session.player_mut();
        player.completed_quests.push("Clear the Woods".to_string());
        player.completed_quests.push("Investigate the Hollow Clues".to_string());
    }
    session.execute_line("talk wandering scholar", &mut io);

    assert!(io.transcript_contains("The note names a Lieutenant"));
    assert!(!io.transcript_contains("Fascinating place, Luminaris."));
    assert_eq!(io.prompts().len(), 1);
    assert!(io.prompts()[0].contains("Defeat the Cultist Lieutenant"));
}

#[test]
fn held_clue_completes_hollow_clues_on_acceptance() {
    let (mut session, mut io) = new_session(&["yes"]);
    {
        let player = session.player_mut();
        player.completed_quests.push("Clear the Woods".to_string());
        player.inventory.push("Lore Fragment".to_string());
    }
    session.execute_line("talk wandering scholar", &mut io);

    assert!(session.player().is_quest_completed("Investigate the Hollow Clues"));
    assert!(io.transcript_contains("New quest unlocked: Defeat the Cultist Lieutenant"));
}

#[test]
fn old_scroll_is_deciphered_by_asking_the_scholar() {
    let (mut session, mut io) = new_session(&["yes"]);

    run(&mut session, &mut io, &["1", "get old scroll"]);
    assert!(session.player().is_quest_active("Decipher the Old Scroll"));

    run(&mut session, &mut io, &["1", "ask Wandering Scholar SCROLL"]);
    assert!(session
        .player()
        .dialogue_history
        .contains("Wandering Scholar:scroll"));
    assert!(session.player().is_quest_completed("Decipher the Old Scroll"));
}

#[test]
fn examining_a_carried_item_repeats_the_pickup_offer() {
    let (mut session, mut io) = new_session(&["no", "yes"]);

    run(&mut session, &mut io, &["1", "get old scroll"]);
    assert!(!session.player().is_quest_active("Decipher the Old Scroll"));

    session.execute_line("examine old scroll", &mut io);
    assert!(io.transcript_contains("Old Scroll (readable)"));
    assert!(session.player().is_quest_active("Decipher the Old Scroll"));
}

#[test]
fn asking_about_the_swamp_starts_whispers_of_the_bog() {
    let (mut session, mut io) = new_session(&["yes"]);
    session.execute_line("ask wandering scholar swamp", &mut io);
    assert!(session.player().is_quest_active("Whispers of the Bog"));

    session.execute_line("ask wandering scholar weather", &mut io);
    assert!(io.transcript_contains("Wandering Scholar has nothing to say about weather."));
    session.execute_line("ask nobody here", &mut io);
    assert!(io.transcript_contains("There is no one like that here."));
}

#[test]
fn completion_is_idempotent_and_states_stay_disjoint() {
    let (mut session, mut io) = new_session(&["yes"]);
    run(&mut session, &mut io, &["3", "ask swamp hermit letter"]);
    assert!(session.player().is_quest_completed("Investigate the Sunken Swamp"));

    let world = load_world();
    let progression = ProgressionConfig::default();
    let mut player = session.player().clone();
    let mut quiet = ScriptedIo::new(Vec::<String>::new());
    let before = (player.inventory.clone(), player.xp, player.level, player.completed_quests.clone());

    assert!(!complete_quest(&world, &mut player, &progression, &mut quiet, "Investigate the Sunken Swamp").unwrap());
    assert!(evaluate_completions(&world, &mut player, &progression, &mut quiet)
        .unwrap()
        .is_empty());
    assert_eq!(
        before,
        (player.inventory.clone(), player.xp, player.level, player.completed_quests.clone())
    );

    for quest in world.quest_templates() {
        assert!(
            !(player.is_quest_active(&quest.name) && player.is_quest_completed(&quest.name)),
            "{} is both active and completed",
            quest.name
        );
    }
}

#[test]
fn quest_log_shows_progress() {
    let (mut session, mut io) = new_session(&["yes"]);
    run(&mut session, &mut io, &["talk guard captain", "quests"]);
    assert!(io.transcript_contains("  - Clear the Woods: defeat Shadow-Touched Goblin [0/3]"));
    assert!(io.transcript_contains("Completed quests: none"));
}
