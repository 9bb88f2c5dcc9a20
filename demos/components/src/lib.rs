//! Component definitions and scene data for the demo screens.
//!
//! - [`scene`]: the serde data model of a scene asset.
//! - [`gameplay`]: spaceship game components.
//! - [`render`]: what a renderer would draw (meshes, animations, cameras).

pub mod gameplay;
pub mod render;
pub mod scene;

pub use gameplay::{Bullet, Monster, Player, Terrain};
pub use render::{AnimatedMeshPrimitive, AnimatedModel, Camera, MeshHandle, MeshPrimitive};
pub use scene::{
    Animation, Armature, CameraSpec, Frame, Joint, Material, Mesh, Model, Primitive, Projection,
    Scene, Transformation,
};
