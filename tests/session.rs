//! Whole sessions driven through the frame loop, the way the host runs them

use treasure_run::consts::SIM_DT;
use treasure_run::sim::{FixedStepLoop, GameEvent, Screen, Simulation, autopilot};
use treasure_run::GameConfig;

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.assets.preload = false;
    config
}

/// Feed 60 fps frames until the loop stops or `max_frames` pass
fn run_frames(sim: &mut Simulation, lp: &mut FixedStepLoop, max_frames: u32, bot: bool) -> u32 {
    let mut frames = 0;
    while lp.is_running() && frames < max_frames {
        lp.advance_with(sim, SIM_DT, |sim| {
            if bot && autopilot::wants_jump(sim.state(), sim.config()) {
                sim.jump();
            }
        });
        frames += 1;
    }
    frames
}

#[test]
fn test_loop_cancels_on_victory() {
    let mut config = config();
    config.progress.per_tick = 50.0;
    config.spawn.idle.enabled = false;
    let mut sim = Simulation::with_seed(config, 1);
    assert!(sim.start());

    let mut lp = FixedStepLoop::new();
    let token = lp.arm();
    run_frames(&mut sim, &mut lp, 100, false);

    assert_eq!(sim.screen(), Screen::Victory);
    assert!(!lp.is_running());
    assert!(!lp.is_current(token));
    assert_eq!(sim.state().scenario_index, sim.config().scenarios.len());
    assert_eq!(lp.advance(&mut sim, 1.0), 0);
}

#[test]
fn test_restart_gets_fresh_token() {
    let mut sim = Simulation::with_seed(config(), 2);
    sim.start();
    let mut lp = FixedStepLoop::new();
    let first = lp.arm();

    // Stand still until something hits
    run_frames(&mut sim, &mut lp, 60 * 60, false);
    assert_eq!(sim.screen(), Screen::GameOver);
    assert!(!lp.is_running());

    assert!(sim.restart());
    let second = lp.arm();
    assert!(!lp.is_current(first));
    assert!(lp.is_current(second));
    assert_eq!(sim.state().time_ticks, 0);
    assert_eq!(lp.advance(&mut sim, SIM_DT), 1);
}

#[test]
fn test_nothing_moves_while_paused() {
    let mut sim = Simulation::with_seed(config(), 3);
    sim.start();
    let mut lp = FixedStepLoop::new();
    lp.arm();
    run_frames(&mut sim, &mut lp, 200, true);
    sim.jump();

    assert!(sim.pause());
    let before = sim.state().clone();
    run_frames(&mut sim, &mut lp, 120, true);
    assert!(lp.is_running());
    assert_eq!(sim.state().time_ticks, before.time_ticks);
    assert_eq!(sim.state().obstacles, before.obstacles);
    assert_eq!(sim.state().character, before.character);
    assert!(!sim.jump());

    assert!(sim.resume());
    assert_eq!(lp.advance(&mut sim, SIM_DT), 1);
}

#[test]
fn test_no_spawns_after_game_over() {
    let mut sim = Simulation::with_seed(config(), 4);
    sim.start();
    let mut lp = FixedStepLoop::new();
    lp.arm();
    run_frames(&mut sim, &mut lp, 60 * 60, false);
    assert_eq!(sim.screen(), Screen::GameOver);
    assert!(!sim.state().spawn.is_armed());
    sim.drain_events();

    for _ in 0..600 {
        sim.tick();
    }
    assert!(sim.drain_events().is_empty());
}

#[test]
fn test_idle_player_gets_forced_obstacle() {
    let mut config = config();
    // Push the regular schedule out of reach
    config.difficulty.initial.spawn_interval_ms = 100_000.0;
    let mut sim = Simulation::with_seed(config, 5);
    sim.start();
    sim.drain_events();

    for _ in 0..479 {
        sim.tick();
    }
    assert!(sim.state().obstacles.is_empty());

    sim.tick();
    assert_eq!(sim.state().obstacles.len(), 1);
    assert_eq!(sim.state().obstacles[0].pos.y, sim.config().ground_obstacle_y());
    assert!(
        sim.drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ObstacleSpawned { forced: true, .. }))
    );
}

#[test]
fn test_autopilot_session_is_reproducible() {
    let play = |seed| {
        let mut sim = Simulation::with_seed(config(), seed);
        sim.start();
        let mut lp = FixedStepLoop::new();
        lp.arm();
        let mut max_y: f32 = 0.0;
        let mut frames = 0;
        while lp.is_running() && frames < 60 * 60 {
            lp.advance_with(&mut sim, SIM_DT, |sim| {
                if autopilot::wants_jump(sim.state(), sim.config()) {
                    sim.jump();
                }
            });
            max_y = max_y.max(sim.state().character.y);
            frames += 1;
        }
        (sim, max_y)
    };

    let (a, a_max) = play(77);
    let (b, _) = play(77);
    assert_eq!(a.screen(), b.screen());
    assert_eq!(a.state().time_ticks, b.state().time_ticks);
    assert_eq!(a.state().stats, b.state().stats);
    assert!(a.state().stats.jumps > 0);
    assert!(a_max <= a.config().character.max_height);
}
