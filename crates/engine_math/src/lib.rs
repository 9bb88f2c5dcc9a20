//! # engine_math
//!
//! Math types for the ECS core. Re-exports [`glam`] for linear algebra and
//! defines the [`Position`] component shared by every demo screen.

pub mod position;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat4, Quat, Vec3};

pub use position::Position;
