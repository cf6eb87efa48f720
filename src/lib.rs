//! Terminal Space Invaders: a pure simulation core (`entities`, `compute`,
//! `collision`), a screen state machine (`session`), JSON high scores
//! (`scores`) and a crossterm renderer (`display`).

pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod scores;
pub mod session;
