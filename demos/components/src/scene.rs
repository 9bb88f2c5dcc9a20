//! Scene asset data model.
//!
//! A scene is what an exporter hands the engine: named models with their
//! meshes, materials, cameras, armatures and animations. Every type here is
//! plain data and (de)serialises with serde; scene files are JSON.

use std::collections::BTreeMap;

use engine_math::{Mat4, Position};
use serde::{Deserialize, Serialize};

/// A column-major 4×4 affine transformation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Transformation {
    /// Matrix elements, column by column.
    pub matrix: [f32; 16],
}

impl Transformation {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        matrix: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// A pure translation.
    #[must_use]
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::IDENTITY;
        t.matrix[12] = x;
        t.matrix[13] = y;
        t.matrix[14] = z;
        t
    }

    /// The transformation as a `glam` matrix.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array(&self.matrix)
    }

    /// The transformation decomposed into a [`Position`] component.
    #[must_use]
    pub fn to_position(&self) -> Position {
        Position::from_cols_array(&self.matrix)
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface appearance, referenced by primitives through its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// Identifier referenced by [`Primitive::material_id`].
    pub id: u32,
    /// Exporter-side name.
    pub name: String,
    /// Base colour, RGBA.
    #[serde(default = "Material::white")]
    pub color: [f32; 4],
}

impl Material {
    fn white() -> [f32; 4] {
        [1.0; 4]
    }
}

/// One drawable chunk of a mesh, with a single material.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Primitive {
    /// The [`Material`] this primitive is drawn with.
    pub material_id: u32,
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Triangle list indices into `vertices`.
    #[serde(default)]
    pub indices: Vec<u32>,
}

/// A named list of primitives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mesh {
    /// Mesh name.
    pub name: String,
    /// Primitives, in draw order.
    pub primitives: Vec<Primitive>,
}

/// A placed mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Model name; also its key in [`Scene::models`].
    pub name: String,
    /// The geometry.
    pub mesh: Mesh,
    /// Placement in the scene.
    #[serde(default)]
    pub transformation: Transformation,
}

/// How a camera projects the scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view, in degrees.
        fov: f32,
        /// Near clip plane.
        near: f32,
        /// Far clip plane.
        far: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Half-height of the view volume.
        scale: f32,
        /// Near clip plane.
        near: f32,
        /// Far clip plane.
        far: f32,
    },
}

impl Projection {
    /// Returns `true` for [`Projection::Perspective`].
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        matches!(self, Self::Perspective { .. })
    }
}

/// A camera as exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraSpec {
    /// Camera name.
    pub name: String,
    /// Projection parameters.
    pub projection: Projection,
    /// Placement in the scene.
    #[serde(default)]
    pub transformation: Transformation,
}

/// A joint of an armature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Joint {
    /// Joint name.
    pub name: String,
    /// Index of the parent joint, `None` for the root.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Rest-pose transformation.
    #[serde(default)]
    pub transformation: Transformation,
}

/// A skeleton; its joints define the reference pose animations deform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Armature {
    /// Identifier, the key animations are grouped under.
    pub id: u32,
    /// Armature name.
    pub name: String,
    /// Joints, parents before children.
    pub joints: Vec<Joint>,
}

/// One keyframe: a pose for every joint at `time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    /// Seconds from the start of the animation.
    pub time: f32,
    /// Joint transformations, indexed like [`Armature::joints`].
    pub transformations: Vec<Transformation>,
}

/// A named keyframe animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animation {
    /// Animation name.
    pub name: String,
    /// Keyframes, sorted by time.
    pub frames: Vec<Frame>,
}

impl Animation {
    /// The time of the latest keyframe, or zero without keyframes.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|f| f.time).fold(0.0, f32::max)
    }
}

/// A complete scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scene {
    /// Models by name.
    pub models: BTreeMap<String, Model>,
    /// Materials, looked up by [`Material::id`].
    pub materials: Vec<Material>,
    /// Cameras, in export order.
    pub cameras: Vec<CameraSpec>,
    /// Armatures, looked up by [`Armature::id`].
    pub armatures: Vec<Armature>,
    /// Animations grouped by armature id.
    pub animations: BTreeMap<u32, Vec<Animation>>,
}

impl Scene {
    /// The model called `name`.
    #[must_use]
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// The material with identifier `id`.
    #[must_use]
    pub fn material(&self, id: u32) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Perspective cameras, in export order.
    pub fn perspective_cameras(&self) -> impl Iterator<Item = &CameraSpec> {
        self.cameras.iter().filter(|c| c.projection.is_perspective())
    }

    /// Orthographic cameras, in export order.
    pub fn orthographic_cameras(&self) -> impl Iterator<Item = &CameraSpec> {
        self.cameras.iter().filter(|c| !c.projection.is_perspective())
    }
}
