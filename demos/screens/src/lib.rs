//! # screens
//!
//! Headless demo screens built on the ECS core.
//!
//! A [`Screen`] loads a scene through a [`SceneProvider`], turns it into
//! entities, and hands the engine the systems that animate them. Collaborators
//! (scenes, compiled meshes, keyboard) are injected at construction.
//!
//! - [`spaceship`]: steer, shoot pooled bullets, dodge spawning monsters.
//! - [`animation`]: a looping keyframe animation.
//! - [`camera`]: a static scene seen through a chosen camera.

pub mod animation;
pub mod camera;
pub mod error;
pub mod input;
pub mod prefab;
pub mod resources;
pub mod scene;
pub mod screen;
pub mod spaceship;

pub use animation::{AnimationScreen, AnimationSystem};
pub use camera::CameraScreen;
pub use error::DemoError;
pub use input::{Autopilot, InputProvider, Key, KeyboardState};
pub use prefab::NamedScene;
pub use resources::{MeshCache, ResourceClient};
pub use scene::{BuiltinScenes, JsonSceneProvider, SceneProvider};
pub use screen::{GameScreen, Mounted, Screen};
pub use spaceship::SpaceshipScreen;
