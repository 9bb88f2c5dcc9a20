//! Screens and the runner that mounts them on an engine.

use tracing::info;

use engine_app::Engine;
use engine_system::System;

use crate::error::DemoError;

/// One demo: the entities it starts with and the systems that drive them.
pub trait Screen {
    /// Short name, used in logs.
    fn name(&self) -> &str;

    /// Create the initial entities.
    fn create_entities(&mut self, engine: &mut Engine) -> Result<(), DemoError>;

    /// The systems to register, in execution order.
    fn create_systems(&mut self) -> Result<Vec<Box<dyn System>>, DemoError> {
        Ok(Vec::new())
    }
}

/// Counts from mounting a screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mounted {
    /// Entities alive after setup.
    pub entities: usize,
    /// Systems registered by the screen.
    pub systems: usize,
}

/// Sets a [`Screen`] up on an engine and tears it down again.
pub struct GameScreen {
    screen: Box<dyn Screen>,
}

impl GameScreen {
    /// Wrap `screen`.
    #[must_use]
    pub fn new(screen: Box<dyn Screen>) -> Self {
        Self { screen }
    }

    /// The wrapped screen's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.screen.name()
    }

    /// Create the screen's entities, then register its systems.
    pub fn mount(&mut self, engine: &mut Engine) -> Result<Mounted, DemoError> {
        self.screen.create_entities(engine)?;
        let systems = self.screen.create_systems()?;
        let count = systems.len();
        for system in systems {
            engine.register_boxed(system)?;
        }
        let mounted = Mounted {
            entities: engine.entity_count(),
            systems: count,
        };
        info!(
            screen = self.screen.name(),
            entities = mounted.entities,
            systems = mounted.systems,
            "screen mounted"
        );
        Ok(mounted)
    }

    /// Tear the engine down.
    pub fn unmount(&mut self, engine: &mut Engine) {
        engine.teardown();
        info!(screen = self.screen.name(), "screen unmounted");
    }
}

impl std::fmt::Debug for GameScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameScreen")
            .field("screen", &self.screen.name())
            .finish()
    }
}
