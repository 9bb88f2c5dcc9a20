//! The [`Position`] component.
//!
//! Scene assets describe placement as a column-major 4×4 matrix. `Position`
//! keeps it decomposed into translation, rotation and scale so systems can
//! nudge one part without re-deriving the others.

use engine_component::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// World-space placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Position {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// A position at `translation` with no rotation and unit scale.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Decompose an affine transformation matrix.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Decompose a column-major matrix as stored in scene assets.
    #[must_use]
    pub fn from_cols_array(cols: &[f32; 16]) -> Self {
        Self::from_matrix(Mat4::from_cols_array(cols))
    }

    /// The 4×4 model matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Move by `offset` in world space.
    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.translation += offset;
        self
    }

    /// Replace the translation.
    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self
    }

    /// Set the Z Euler angle to `angle` radians, keeping X and Y.
    pub fn set_rotation_z(&mut self, angle: f32) -> &mut Self {
        let (x, y, _) = self.rotation.to_euler(EulerRot::XYZ);
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, angle);
        self
    }

    /// The translation multiplied component-wise by the scale.
    #[must_use]
    pub fn scaled_translation(&self) -> Vec3 {
        self.translation * self.scale
    }

    /// A copy moved by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}
