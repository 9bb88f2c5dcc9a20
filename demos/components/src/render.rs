//! Components describing what to draw.
//!
//! Nothing is rendered headless; these are what a renderer would read.

use engine_component::Component;
use serde::{Deserialize, Serialize};

use crate::scene::{Armature, Frame, Projection};

/// Handle to a compiled mesh held by a resource client.
///
/// Entities built from the same model share one handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// One static primitive of a compiled mesh. An entity holds one per
/// primitive of its model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeshPrimitive {
    /// The compiled mesh.
    pub mesh: MeshHandle,
    /// Index of the primitive within the mesh.
    pub primitive: usize,
    /// Material the primitive is drawn with.
    pub material_id: u32,
}

impl Component for MeshPrimitive {
    const MULTIPLE: bool = true;

    fn type_name() -> &'static str {
        "MeshPrimitive"
    }
}

/// One skinned primitive, deformed by the entity's [`AnimatedModel`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnimatedMeshPrimitive {
    /// The compiled mesh.
    pub mesh: MeshHandle,
    /// Index of the primitive within the mesh.
    pub primitive: usize,
    /// Material the primitive is drawn with.
    pub material_id: u32,
}

impl Component for AnimatedMeshPrimitive {
    const MULTIPLE: bool = true;

    fn type_name() -> &'static str {
        "AnimatedMeshPrimitive"
    }
}

/// Playback state of a looping keyframe animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedModel {
    /// Keyframes, sorted by time.
    pub frames: Vec<Frame>,
    /// The armature the frames pose.
    pub reference_pose: Armature,
    /// Playback position, in `[0, duration)`.
    pub time: f32,
    /// Loop length: the time of the latest keyframe.
    pub duration: f32,
    /// Index of the keyframe at or before `time`.
    pub current_frame: usize,
}

impl AnimatedModel {
    /// Start playing `frames` from the beginning.
    #[must_use]
    pub fn new(frames: Vec<Frame>, reference_pose: Armature) -> Self {
        let duration = frames.iter().map(|f| f.time).fold(0.0, f32::max);
        Self {
            frames,
            reference_pose,
            time: 0.0,
            duration,
            current_frame: 0,
        }
    }

    /// Move the playhead forward by `delta` seconds, wrapping at `duration`.
    pub fn advance(&mut self, delta: f32) {
        if self.duration <= 0.0 {
            return;
        }
        self.time = (self.time + delta) % self.duration;
        self.current_frame = self
            .frames
            .iter()
            .rposition(|f| f.time <= self.time)
            .unwrap_or(0);
    }
}

impl Component for AnimatedModel {
    fn type_name() -> &'static str {
        "AnimatedModel"
    }
}

/// A camera entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    /// Name from the scene.
    pub name: String,
    /// Projection parameters.
    pub projection: Projection,
}

impl Component for Camera {
    fn type_name() -> &'static str {
        "Camera"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(time: f32) -> Frame {
        Frame {
            time,
            transformations: Vec::new(),
        }
    }

    fn armature() -> Armature {
        Armature {
            id: 0,
            name: "rig".to_string(),
            joints: Vec::new(),
        }
    }

    #[test]
    fn test_duration_is_latest_frame() {
        let model = AnimatedModel::new(vec![frame(0.0), frame(0.5), frame(1.0)], armature());
        assert_eq!(model.duration, 1.0);
        assert_eq!(model.time, 0.0);
    }

    #[test]
    fn test_advance_wraps_and_tracks_frame() {
        let mut model = AnimatedModel::new(vec![frame(0.0), frame(0.5), frame(1.0)], armature());
        model.advance(0.75);
        assert_eq!(model.current_frame, 1);
        model.advance(0.5);
        assert_eq!(model.time, 0.25);
        assert_eq!(model.current_frame, 0);
    }

    #[test]
    fn test_advance_without_frames_is_noop() {
        let mut model = AnimatedModel::new(Vec::new(), armature());
        model.advance(1.0);
        assert_eq!(model.time, 0.0);
    }
}
