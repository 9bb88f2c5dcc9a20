//! The [`System`] trait and the closure adapter [`FnSystem`].

use engine_component::{EcsError, Entity, Query};

use crate::context::SystemContext;

/// A unit of per-tick logic bound to a [`Query`].
///
/// Each tick, in registration order, the engine selects the entities matching
/// [`System::query`], calls [`System::update`] once, then
/// [`System::update_entity`] once per match in creation order. Returning an
/// error aborts the tick.
pub trait System {
    /// Name used for registration and logs. Must be unique per engine.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// The entities this system iterates.
    fn query(&self) -> &Query;

    /// Whole-frame hook, called once per tick before any per-entity call.
    fn update(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        Ok(())
    }

    /// Per-entity hook, called once for every entity matched this tick.
    fn update_entity(
        &mut self,
        _ctx: &mut SystemContext<'_>,
        _entity: Entity,
    ) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called once when the owning scene is torn down.
    fn teardown(&mut self) {}
}

impl<S: System + ?Sized> System for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn query(&self) -> &Query {
        (**self).query()
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        (**self).update(ctx)
    }

    fn update_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EcsError> {
        (**self).update_entity(ctx, entity)
    }

    fn teardown(&mut self) {
        (**self).teardown();
    }
}

/// A whole-frame system made from a closure. Its query matches nothing.
pub struct FnSystem<F> {
    name: String,
    query: Query,
    run: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut SystemContext<'_>) -> Result<(), EcsError>,
{
    /// Wrap `run` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, run: F) -> Self {
        Self {
            name: name.into(),
            query: Query::none(),
            run,
        }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut SystemContext<'_>) -> Result<(), EcsError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        (self.run)(ctx)
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish()
    }
}

/// `screens::spaceship::TerrainMove` → `TerrainMove`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TerrainMove {
        query: Query,
    }

    impl System for TerrainMove {
        fn query(&self) -> &Query {
            &self.query
        }
    }

    #[test]
    fn test_default_name_is_short_type_name() {
        let system = TerrainMove {
            query: Query::none(),
        };
        assert_eq!(system.name(), "TerrainMove");
    }

    #[test]
    fn test_short_type_name_strips_generics() {
        assert_eq!(short_type_name("a::b::Temporal<c::D>"), "Temporal");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_fn_system_uses_given_name_and_empty_query() {
        let system = FnSystem::new("spawner", |_ctx: &mut SystemContext<'_>| Ok(()));
        assert_eq!(system.name(), "spawner");
        assert!(system.query().is_empty());
    }

    #[test]
    fn test_boxed_system_forwards_name() {
        let boxed: Box<dyn System> =
            Box::new(FnSystem::new("boxed", |_ctx: &mut SystemContext<'_>| Ok(())));
        assert_eq!(boxed.name(), "boxed");
    }
}
