//! Screen state machine
//!
//! ```text
//! Loading --AssetsReady--> Start --Start--> Playing <--Pause/Resume--> Paused
//!                                              |
//!                                   Collide    |    Win
//!                               +--------------+--------------+
//!                               v                             v
//!                           GameOver --Restart--> Playing <-- Victory
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Waiting for assets before the start screen can be shown
    Loading,
    Start,
    Playing,
    Paused,
    GameOver,
    Victory,
}

/// Requests that move between screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenAction {
    AssetsReady,
    Start,
    Pause,
    Resume,
    Collide,
    Win,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal screen transition: {action:?} from {from:?}")]
pub struct TransitionError {
    pub from: Screen,
    pub action: ScreenAction,
}

impl Screen {
    /// `GameOver` or `Victory`
    pub fn is_terminal(self) -> bool {
        matches!(self, Screen::GameOver | Screen::Victory)
    }

    /// Only `Playing` mutates entities
    pub fn is_simulating(self) -> bool {
        self == Screen::Playing
    }

    /// Overlay element id the host shows for this screen
    pub fn overlay_id(self) -> &'static str {
        match self {
            Screen::Loading => "loading-screen",
            Screen::Start => "start-screen",
            Screen::Playing => "game-play-screen",
            Screen::Paused => "pause-screen",
            Screen::GameOver | Screen::Victory => "game-over-screen",
        }
    }

    /// Next screen for `action`, or an error naming the illegal pair
    pub fn transition(self, action: ScreenAction) -> Result<Screen, TransitionError> {
        use Screen::*;
        use ScreenAction as A;

        match (self, action) {
            (Loading, A::AssetsReady) | (Start, A::AssetsReady) => Ok(Start),
            (Start, A::Start) => Ok(Playing),
            (Playing, A::Pause) => Ok(Paused),
            (Paused, A::Resume) => Ok(Playing),
            (Playing, A::Collide) => Ok(GameOver),
            (Playing, A::Win) => Ok(Victory),
            (GameOver, A::Restart) | (Victory, A::Restart) => Ok(Playing),
            (from, action) => Err(TransitionError { from, action }),
        }
    }
}
