//! Scenario progress and victory detection

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::config::GameConfig;

/// Absorbs float drift so 500 steps of 0.2 reliably complete a scenario
const PROGRESS_EPSILON: f64 = 1e-9;

/// Cosmetic rating shown on the victory screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryGrade {
    /// Barely needed to jump
    Legendary,
    Great,
    Completed,
}

impl VictoryGrade {
    /// Grade from the average number of jumps per scenario (fewer is better)
    pub fn from_jumps(jumps: u32, scenarios: usize) -> Self {
        let average = jumps as f64 / scenarios.max(1) as f64;
        if average <= 10.0 {
            VictoryGrade::Legendary
        } else if average <= 25.0 {
            VictoryGrade::Great
        } else {
            VictoryGrade::Completed
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            VictoryGrade::Legendary => {
                "Legendary! You found the Chapada Diamantina treasure with barely a hop!"
            }
            VictoryGrade::Great => "Great run! You found the Chapada Diamantina treasure!",
            VictoryGrade::Completed => "Congratulations! You found the Chapada Diamantina treasure!",
        }
    }
}

/// What a progress step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    Continue,
    ScenarioAdvanced { index: usize },
    /// Every scenario is done; the caller ends the session
    Victory { grade: VictoryGrade },
}

/// Add `delta_percent` to the current scenario's progress.
///
/// Crossing 100 moves to the next scenario, resets progress, scales difficulty
/// and re-arms the spawn deadline with the new interval. Past the last
/// scenario it reports victory instead.
pub fn advance_progress(
    state: &mut GameState,
    config: &GameConfig,
    delta_percent: f64,
) -> ProgressOutcome {
    state.progress += delta_percent;
    if state.progress + PROGRESS_EPSILON < 100.0 {
        return ProgressOutcome::Continue;
    }

    state.scenario_index += 1;
    state.progress = 0.0;

    if state.scenario_index >= config.scenarios.len() {
        let grade = VictoryGrade::from_jumps(state.stats.jumps, config.scenarios.len());
        return ProgressOutcome::Victory { grade };
    }

    state.difficulty = config.difficulty.next_config(&state.difficulty);
    let now = state.now_ms();
    state.spawn.rearm(now, state.difficulty.spawn_interval_ms);

    ProgressOutcome::ScenarioAdvanced {
        index: state.scenario_index,
    }
}
