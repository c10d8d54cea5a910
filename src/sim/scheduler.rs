//! Frame-driven fixed timestep loop
//!
//! The host calls [`FixedStepLoop::advance`] once per animation frame with the
//! wall-clock delta. Each `arm` hands out a new [`LoopToken`]; a frame callback
//! carrying an older token must not reschedule itself, so a restart never ends
//! up with two loops feeding the same session.

use super::tick::Simulation;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Generation of an armed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

#[derive(Debug, Clone, Default)]
pub struct FixedStepLoop {
    generation: u64,
    armed: bool,
    accumulator: f32,
}

impl FixedStepLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new loop generation, invalidating every earlier token
    pub fn arm(&mut self) -> LoopToken {
        self.generation += 1;
        self.armed = true;
        self.accumulator = 0.0;
        log::debug!("Loop armed (generation {})", self.generation);
        LoopToken(self.generation)
    }

    pub fn cancel(&mut self) {
        if self.armed {
            log::debug!("Loop cancelled (generation {})", self.generation);
        }
        self.armed = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.armed
    }

    /// Whether a frame callback holding `token` should keep running
    pub fn is_current(&self, token: LoopToken) -> bool {
        self.armed && token.0 == self.generation
    }

    /// Run as many whole ticks as `frame_dt` (seconds) covers.
    ///
    /// Returns the number of ticks run. Outside `Playing` nothing accumulates,
    /// so resuming from pause does not replay the paused time. The loop
    /// cancels itself once the session reaches a terminal screen.
    pub fn advance(&mut self, sim: &mut Simulation, frame_dt: f32) -> u32 {
        self.advance_with(sim, frame_dt, |_| {})
    }

    /// Like [`advance`](Self::advance), calling `before_tick` ahead of every
    /// tick so scripted input lands on exact tick boundaries
    pub fn advance_with(
        &mut self,
        sim: &mut Simulation,
        frame_dt: f32,
        mut before_tick: impl FnMut(&mut Simulation),
    ) -> u32 {
        if !self.armed {
            return 0;
        }
        if !sim.screen().is_simulating() {
            self.accumulator = 0.0;
            if sim.screen().is_terminal() {
                self.cancel();
            }
            return 0;
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            before_tick(sim);
            sim.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;

            if sim.screen().is_terminal() {
                self.cancel();
                return substeps;
            }
            // Paused from a hook or input mid-frame
            if !sim.screen().is_simulating() {
                self.accumulator = 0.0;
                return substeps;
            }
        }

        // Drop the backlog the substep cap left behind
        self.accumulator = self.accumulator.min(SIM_DT);
        substeps
    }
}
