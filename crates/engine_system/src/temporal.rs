//! Timer-driven systems.
//!
//! A [`TemporalSystem`] wraps another [`System`] and only lets its whole-frame
//! hook through once per elapsed interval. Time that overshoots the interval is
//! carried into the next one, so a long run never drifts by more than one tick.

use tracing::debug;

use engine_component::{EcsError, Entity, Query};

use crate::context::SystemContext;
use crate::system::{FnSystem, System};

/// Fires the wrapped system's [`System::update`] every `interval` seconds.
///
/// The wrapped system's [`System::update_entity`] still runs every tick for
/// its own query.
#[derive(Debug)]
pub struct TemporalSystem<S> {
    inner: S,
    interval: f64,
    elapsed: f64,
    fired: u64,
}

impl<S: System> TemporalSystem<S> {
    /// Wrap `inner` so its whole-frame hook fires every `interval` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is not strictly positive and finite.
    #[must_use]
    pub fn new(interval: f64, inner: S) -> Self {
        assert!(
            interval.is_finite() && interval > 0.0,
            "temporal interval must be positive, got {interval}"
        );
        Self {
            inner,
            interval,
            elapsed: 0.0,
            fired: 0,
        }
    }

    /// The firing interval, in seconds.
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Time accumulated towards the next firing.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// How many times the wrapped hook has fired.
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }

}

impl<F> TemporalSystem<FnSystem<F>>
where
    F: FnMut(&mut SystemContext<'_>) -> Result<(), EcsError>,
{
    /// A temporal system whose callback is a closure and whose query matches
    /// nothing.
    #[must_use]
    pub fn from_fn(name: impl Into<String>, interval: f64, callback: F) -> Self {
        Self::new(interval, FnSystem::new(name, callback))
    }
}

impl<S: System> System for TemporalSystem<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn query(&self) -> &Query {
        self.inner.query()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        let delta = ctx.delta();
        if !delta.is_finite() || delta < 0.0 {
            return Err(EcsError::InvalidDelta(delta));
        }
        self.elapsed += delta;
        // One firing per whole interval elapsed; a delta larger than the
        // interval fires more than once.
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.fired += 1;
            debug!(
                system = self.inner.name(),
                tick_id = ctx.tick_id(),
                fired = self.fired,
                carry = self.elapsed,
                "temporal system fired"
            );
            self.inner.update(ctx)?;
        }
        Ok(())
    }

    fn update_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EcsError> {
        self.inner.update_entity(ctx, entity)
    }

    fn teardown(&mut self) {
        self.inner.teardown();
    }
}
