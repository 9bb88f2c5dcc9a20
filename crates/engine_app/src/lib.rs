//! # engine_app
//!
//! The top of the ECS core: an [`Engine`] that owns the world and its
//! systems, and a [`TickLoop`] that drives it at a fixed rate.
//!
//! ```
//! use engine_app::{Engine, TickConfig, TickLoop};
//! use engine_system::{FnSystem, SystemContext};
//!
//! let mut engine = Engine::new();
//! engine
//!     .register(FnSystem::new("hello", |ctx: &mut SystemContext<'_>| {
//!         assert!(ctx.delta() > 0.0);
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let config = TickConfig { max_ticks: 3, realtime: false, ..TickConfig::default() };
//! let mut tick_loop = TickLoop::new(engine, config);
//! assert_eq!(tick_loop.run().unwrap(), 3);
//! ```

pub mod config;
pub mod engine;
pub mod registry;
pub mod tick;

pub use config::{ConfigError, MAX_TICKS_ENV, TICK_RATE_ENV, TickConfig};
pub use engine::{Engine, TickReport};
pub use registry::SystemRegistry;
pub use tick::TickLoop;
