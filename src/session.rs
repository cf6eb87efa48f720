//! Screen-level state machine.
//!
//! `Session` owns the current round and the high-score table and turns
//! input into transitions.  It knows nothing about the terminal: the frame
//! loop feeds it `Command`s and `HeldKeys`, then draws whatever it holds.

use log::{info, warn};
use rand::Rng;

use crate::compute::{
    init_state, move_player_left, move_player_right, player_shoot, restart, skip_wave_clear, tick,
};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::scores::HighScores;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    HighScores,
    /// A round is running; its `GameStatus` says which phase.
    Round,
}

/// Discrete key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Confirm,
    ShowHighScores,
    Back,
    Quit,
}

/// Keys held down during this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    pub screen: Screen,
    pub game: GameState,
    pub scores: HighScores,
    pub player_name: String,
    /// Rank earned by the round that just ended, once recorded.
    pub last_rank: Option<usize>,
    recorded: bool,
}

impl Session {
    pub fn new(
        config: GameConfig,
        scores: HighScores,
        player_name: impl Into<String>,
        rng: &mut impl Rng,
    ) -> Session {
        let game = init_state(config, scores.best(), rng);
        Session {
            screen: Screen::Start,
            game,
            scores,
            player_name: player_name.into(),
            last_rank: None,
            recorded: false,
        }
    }

    /// Apply one discrete command.
    pub fn handle(&mut self, command: Command, rng: &mut impl Rng) -> Flow {
        if command == Command::Quit {
            info!("quit requested");
            return Flow::Quit;
        }
        match (self.screen, command) {
            (Screen::Start, Command::Confirm) => self.begin_round(rng),
            (Screen::Start, Command::ShowHighScores) => self.screen = Screen::HighScores,
            (Screen::HighScores, Command::Back) => self.screen = Screen::Start,
            (Screen::Round, Command::Confirm) => match self.game.status {
                GameStatus::WaveClear => self.game = skip_wave_clear(&self.game, rng),
                GameStatus::GameOver => self.begin_round(rng),
                GameStatus::Playing => {}
            },
            (Screen::Round, Command::Back) if self.game.status == GameStatus::GameOver => {
                self.screen = Screen::Start;
            }
            _ => {}
        }
        Flow::Continue
    }

    /// One frame: held keys, then the simulation tick.  Outside a running
    /// round this does nothing.
    pub fn update(&mut self, keys: HeldKeys, rng: &mut impl Rng) {
        if self.screen != Screen::Round {
            return;
        }
        if self.game.status == GameStatus::Playing {
            if keys.left {
                self.game = move_player_left(&self.game);
            }
            if keys.right {
                self.game = move_player_right(&self.game);
            }
            if keys.fire {
                self.game = player_shoot(&self.game);
            }
        }
        self.game = tick(&self.game, rng);

        if self.game.status == GameStatus::GameOver && !self.recorded {
            self.record_score();
        }
    }

    fn begin_round(&mut self, rng: &mut impl Rng) {
        self.game = restart(&self.game, rng);
        self.game.high_score = self.game.high_score.max(self.scores.best());
        self.screen = Screen::Round;
        self.last_rank = None;
        self.recorded = false;
        info!("round started");
    }

    fn record_score(&mut self) {
        self.recorded = true;
        self.last_rank = self.scores.insert(&self.player_name, self.game.score);
        if self.last_rank.is_some() {
            if let Err(err) = self.scores.save() {
                warn!("high scores not saved: {err:#}");
            }
        }
        info!(
            "game over: score {}, wave {}, rank {:?}",
            self.game.score, self.game.wave, self.last_rank
        );
    }
}
