//! Simulation events and host-side lifecycle hooks
//!
//! The simulation never plays audio or touches the DOM. It records what
//! happened as [`GameEvent`]s; the host drains them once per frame and fans them
//! out to whatever implements [`GameHooks`].

use serde::{Deserialize, Serialize};

use super::progression::VictoryGrade;
use super::state::ObstacleKind;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Collided,
    Victory(VictoryGrade),
}

impl SessionOutcome {
    /// End-of-game message shown on the final screen
    pub fn message(&self) -> &'static str {
        match self {
            SessionOutcome::Collided => "Game Over! You ran into an obstacle.",
            SessionOutcome::Victory(grade) => grade.message(),
        }
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, SessionOutcome::Victory(_))
    }
}

/// Something observable that happened during a tick or input call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStart { session: u32 },
    /// `airborne` is true for the reduced mid-air impulse
    Jump { airborne: bool },
    ObstacleSpawned { id: u32, kind: ObstacleKind, forced: bool },
    Collision { obstacle_id: u32, kind: ObstacleKind },
    ScenarioAdvanced { index: usize },
    Victory { grade: VictoryGrade },
    SessionEnd { outcome: SessionOutcome },
}

/// Lifecycle hooks an audio (or analytics, or UI) subsystem can bind to.
///
/// All methods default to no-ops.
pub trait GameHooks {
    fn on_session_start(&mut self) {}
    fn on_jump(&mut self, _airborne: bool) {}
    fn on_collision(&mut self, _kind: ObstacleKind) {}
    fn on_scenario_advance(&mut self, _index: usize) {}
    fn on_victory(&mut self, _grade: VictoryGrade) {}
    fn on_session_end(&mut self, _outcome: SessionOutcome) {}
}

/// Route each event to the matching hook, in order
pub fn dispatch<H: GameHooks + ?Sized>(events: &[GameEvent], hooks: &mut H) {
    for event in events {
        match *event {
            GameEvent::SessionStart { .. } => hooks.on_session_start(),
            GameEvent::Jump { airborne } => hooks.on_jump(airborne),
            GameEvent::ObstacleSpawned { .. } => {}
            GameEvent::Collision { kind, .. } => hooks.on_collision(kind),
            GameEvent::ScenarioAdvanced { index } => hooks.on_scenario_advance(index),
            GameEvent::Victory { grade } => hooks.on_victory(grade),
            GameEvent::SessionEnd { outcome } => hooks.on_session_end(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl GameHooks for Recorder {
        fn on_session_start(&mut self) {
            self.calls.push("start");
        }
        fn on_jump(&mut self, airborne: bool) {
            self.calls.push(if airborne { "air_jump" } else { "jump" });
        }
        fn on_collision(&mut self, _kind: ObstacleKind) {
            self.calls.push("collision");
        }
        fn on_session_end(&mut self, _outcome: SessionOutcome) {
            self.calls.push("end");
        }
    }

    #[test]
    fn test_dispatch_preserves_order_and_skips_unbound() {
        let events = [
            GameEvent::SessionStart { session: 1 },
            GameEvent::Jump { airborne: false },
            GameEvent::ObstacleSpawned {
                id: 1,
                kind: ObstacleKind::Rock,
                forced: false,
            },
            GameEvent::Jump { airborne: true },
            GameEvent::ScenarioAdvanced { index: 1 },
            GameEvent::Collision {
                obstacle_id: 1,
                kind: ObstacleKind::Rock,
            },
            GameEvent::SessionEnd {
                outcome: SessionOutcome::Collided,
            },
        ];
        let mut rec = Recorder::default();
        dispatch(&events, &mut rec);
        assert_eq!(rec.calls, ["start", "jump", "air_jump", "collision", "end"]);
    }
}
