//! BDD step definitions for cmk-discord

pub mod delivery_steps;
