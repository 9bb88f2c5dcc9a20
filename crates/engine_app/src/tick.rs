//! Fixed-timestep tick loop.
//!
//! Drives an [`Engine`] at the configured tick rate. Every tick advances the
//! simulation by exactly `1 / tick_rate` seconds regardless of wall-clock
//! time; in realtime mode the loop additionally sleeps off whatever is left of
//! each tick's budget.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use engine_component::EcsError;

use crate::config::TickConfig;
use crate::engine::{Engine, TickReport};

/// An engine plus the loop that drives it.
#[derive(Debug)]
pub struct TickLoop {
    engine: Engine,
    config: TickConfig,
}

impl TickLoop {
    /// Create a new tick loop around `engine`.
    #[must_use]
    pub fn new(engine: Engine, config: TickConfig) -> Self {
        Self { engine, config }
    }

    /// The driven engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Give the engine back.
    #[must_use]
    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Run a single tick with the configured time step.
    pub fn step(&mut self) -> Result<TickReport, EcsError> {
        self.engine.tick(self.config.delta())
    }

    /// Wall-clock time one tick may take, in realtime mode only.
    fn budget(&self) -> Option<Duration> {
        self.config.realtime.then(|| {
            Duration::try_from_secs_f64(self.config.delta()).unwrap_or(Duration::MAX)
        })
    }

    /// Run for the configured number of ticks, or until a tick fails.
    ///
    /// Returns the number of ticks completed.
    pub fn run(&mut self) -> Result<u64, EcsError> {
        self.run_with(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_tick` after every completed tick.
    pub fn run_with(
        &mut self,
        mut on_tick: impl FnMut(&mut Engine, &TickReport),
    ) -> Result<u64, EcsError> {
        let budget = self.budget();
        let mut completed = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            realtime = self.config.realtime,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let report = self.step()?;
            on_tick(&mut self.engine, &report);

            completed += 1;
            if self.config.max_ticks > 0 && completed >= self.config.max_ticks {
                info!(ticks = completed, elapsed = self.engine.elapsed(), "tick loop complete");
                return Ok(completed);
            }

            let Some(budget) = budget else {
                continue;
            };
            let spent = start.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            } else {
                warn!(
                    tick_id = report.tick_id,
                    elapsed_ms = spent.as_millis() as u64,
                    budget_ms = budget.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{Component, EntityBuilder, Query};
    use engine_system::{FnSystem, SystemContext};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Seed;

    impl Component for Seed {
        fn type_name() -> &'static str {
            "Seed"
        }
    }

    fn headless(max_ticks: u64) -> TickConfig {
        TickConfig {
            tick_rate: 4.0,
            max_ticks,
            realtime: false,
        }
    }

    #[test]
    fn test_step_uses_fixed_delta() {
        let mut tick_loop = TickLoop::new(Engine::new(), headless(0));
        tick_loop.step().unwrap();
        tick_loop.step().unwrap();
        assert_eq!(tick_loop.engine().tick_id(), 2);
        assert_eq!(tick_loop.engine().elapsed(), 0.5);
    }

    #[test]
    fn test_run_stops_after_max_ticks() {
        let mut tick_loop = TickLoop::new(Engine::new(), headless(5));
        assert_eq!(tick_loop.run().unwrap(), 5);
        assert_eq!(tick_loop.engine().tick_id(), 5);
    }

    #[test]
    fn test_run_with_sees_every_report() {
        let mut engine = Engine::new();
        engine
            .register(FnSystem::new("grow", |ctx: &mut SystemContext<'_>| {
                ctx.spawn(EntityBuilder::new().with(Seed));
                Ok(())
            }))
            .unwrap();

        let mut tick_loop = TickLoop::new(engine, headless(3));
        let mut seen = Vec::new();
        tick_loop
            .run_with(|engine, report| seen.push((report.tick_id, engine.entity_count())))
            .unwrap();

        assert_eq!(seen, vec![(1, 1), (2, 2), (3, 3)]);
        let engine = tick_loop.into_engine();
        assert_eq!(engine.select(&Query::of::<Seed>()).len(), 3);
    }

    #[test]
    fn test_run_stops_on_first_error() {
        let mut engine = Engine::new();
        engine
            .register(FnSystem::new("fragile", |ctx: &mut SystemContext<'_>| {
                if ctx.tick_id() == 2 {
                    Err(EcsError::DuplicateRegistration("boom".to_string()))
                } else {
                    Ok(())
                }
            }))
            .unwrap();

        let mut tick_loop = TickLoop::new(engine, headless(10));
        assert!(tick_loop.run().is_err());
        assert_eq!(tick_loop.engine().tick_id(), 2);
    }

    #[test]
    fn test_headless_loop_accepts_huge_time_step() {
        let config = TickConfig {
            tick_rate: 1e-20,
            max_ticks: 2,
            realtime: false,
        };
        let mut tick_loop = TickLoop::new(Engine::new(), config);
        assert_eq!(tick_loop.run().unwrap(), 2);
        assert!((tick_loop.engine().elapsed() / 2e20 - 1.0).abs() < 1e-9);
    }
}
