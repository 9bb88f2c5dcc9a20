//! Errors raised while setting up or running a demo screen.

use std::path::PathBuf;

use engine_component::EcsError;

/// Everything that can go wrong in a demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// An ECS operation failed.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// A scene file could not be read.
    #[error("failed to read scene file {}: {source}", path.display())]
    SceneIo {
        /// The scene file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A scene file is not a valid scene.
    #[error("failed to parse scene {name}: {source}")]
    SceneParse {
        /// Scene name.
        name: String,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// No scene with this name is available.
    #[error("unknown scene {0}")]
    UnknownScene(String),

    /// A primitive references a material the scene does not define.
    #[error("scene {scene} has no material with id {id}")]
    MissingMaterial {
        /// Scene name.
        scene: String,
        /// The dangling material id.
        id: u32,
    },

    /// The scene has fewer cameras of a kind than the screen needs.
    #[error("scene {scene} has {found} {kind} cameras, need at least {needed}")]
    MissingCamera {
        /// Scene name.
        scene: String,
        /// `"perspective"` or `"orthographic"`.
        kind: &'static str,
        /// How many the screen needs.
        needed: usize,
        /// How many the scene has.
        found: usize,
    },

    /// The scene has no animation for its first armature.
    #[error("scene {0} has no animation")]
    MissingAnimation(String),
}
