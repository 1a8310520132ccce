//! Test utilities & fixtures.
//! Loads the shipped world under `data/` and builds seeded sessions over it.

use shademire::adventure::{GameSession, ScriptedIo, World, WorldDocument};
use shademire::config::ProgressionConfig;
use std::path::{Path, PathBuf};

/// Path to the world file shipped with the crate.
pub fn world_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("world.json")
}

#[allow(dead_code)]
pub fn load_document() -> WorldDocument {
    WorldDocument::load(world_path()).expect("world document")
}

pub fn load_world() -> World {
    World::load(world_path()).expect("world loads")
}

/// Fresh session on the shipped world with a fixed RNG seed, already started.
/// `answers` feed quest-offer confirmations in order.
#[allow(dead_code)]
pub fn new_session(answers: &[&str]) -> (GameSession, ScriptedIo) {
    let mut io = ScriptedIo::new(answers.iter().copied());
    let mut session = GameSession::new(load_world(), "Tester", ProgressionConfig::default(), Some(7));
    session.start(&mut io);
    (session, io)
}

/// Run each line through the session in order.
#[allow(dead_code)]
pub fn run(session: &mut GameSession, io: &mut ScriptedIo, lines: &[&str]) {
    for line in lines {
        session.execute_line(line, io);
    }
}
