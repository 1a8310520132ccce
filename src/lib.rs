//! # Shademire - a text adventure with a quest and progression engine
//!
//! The player walks between named locations, picks up and equips gear, fights
//! monsters turn by turn, talks to townsfolk, and works through a quest graph
//! with prerequisites, unlocks, and alternate completion paths.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shademire::adventure::{GameSession, ScriptedIo, World};
//! use shademire::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml")?;
//!     let world = World::load(&config.game.world_file)?;
//!
//!     let mut io = ScriptedIo::new(["yes"]);
//!     let mut session = GameSession::new(world, "Wanderer", config.progression, Some(7));
//!     session.start(&mut io);
//!     session.execute_line("talk guard captain", &mut io);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - world templates, player state, combat, quests, dialogue, and the session
//! - [`config`] - TOML configuration
//! - [`validation`] - offline world checks and player-name rules
//! - [`logutil`] - log line sanitising
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  GameSession    │ ← command dispatch, owns player + location state
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ quest / dialogue│ ← availability, goals, completion, NPC lines
//! │ combat / items  │
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │     World       │ ← read-only templates loaded from JSON
//! └─────────────────┘
//! ```

pub mod adventure;
pub mod config;
pub mod logutil;
pub mod validation;
