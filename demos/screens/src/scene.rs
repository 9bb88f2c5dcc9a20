//! Where screens get their scenes from.
//!
//! Two providers: [`JsonSceneProvider`] reads `<dir>/<name>.json`, and
//! [`BuiltinScenes`] serves the small scenes compiled into the binary so the
//! demos run without any asset on disk.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use components::{
    Animation, Armature, CameraSpec, Frame, Joint, Material, Mesh, Model, Primitive, Projection,
    Scene, Transformation,
};

use crate::error::DemoError;

/// Loads scenes by name.
pub trait SceneProvider {
    /// Load the scene called `name`.
    fn load(&self, name: &str) -> Result<Scene, DemoError>;
}

/// Reads scenes from JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonSceneProvider {
    dir: PathBuf,
}

impl JsonSceneProvider {
    /// Serve `<dir>/<name>.json`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SceneProvider for JsonSceneProvider {
    fn load(&self, name: &str) -> Result<Scene, DemoError> {
        let path = self.dir.join(format!("{name}.json"));
        let json = std::fs::read_to_string(&path).map_err(|source| DemoError::SceneIo {
            path: path.clone(),
            source,
        })?;
        let scene: Scene = serde_json::from_str(&json).map_err(|source| DemoError::SceneParse {
            name: name.to_string(),
            source,
        })?;
        info!(
            scene = name,
            path = %path.display(),
            models = scene.models.len(),
            cameras = scene.cameras.len(),
            "scene loaded"
        );
        Ok(scene)
    }
}

/// Scenes built in code: `spaceship`, `bird` and `cameras`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinScenes;

impl BuiltinScenes {
    /// Names of the available scenes.
    pub const NAMES: [&'static str; 3] = ["spaceship", "bird", "cameras"];

    /// Player ship, bullet, terrain tile and monster, seen from above.
    #[must_use]
    pub fn spaceship() -> Scene {
        let mut scene = Scene {
            materials: vec![
                material(0, "hull", [0.8, 0.8, 0.9, 1.0]),
                material(1, "glow", [1.0, 0.9, 0.2, 1.0]),
                material(2, "ground", [0.2, 0.6, 0.3, 1.0]),
            ],
            cameras: vec![CameraSpec {
                name: "top".to_string(),
                projection: Projection::Orthographic {
                    scale: 25.0,
                    near: 0.1,
                    far: 300.0,
                },
                transformation: Transformation::from_translation(0.0, 50.0, 0.0),
            }],
            ..Scene::default()
        };
        insert(&mut scene, model("Player", &[0, 1], Transformation::IDENTITY));
        insert(
            &mut scene,
            model("Bullet", &[1], Transformation::from_translation(0.0, 0.0, -5.0)),
        );
        insert(
            &mut scene,
            model("Terrain", &[2], Transformation::from_translation(0.0, -2.0, 0.0)),
        );
        insert(&mut scene, model("Monster", &[0], Transformation::IDENTITY));
        scene
    }

    /// A bird with a two-joint armature and two animations.
    #[must_use]
    pub fn bird() -> Scene {
        let pose = |lift: f32| {
            vec![
                Transformation::IDENTITY,
                Transformation::from_translation(0.0, lift, 0.0),
            ]
        };
        let frames = |times: &[f32]| {
            times
                .iter()
                .enumerate()
                .map(|(i, &time)| Frame {
                    time,
                    transformations: pose(if i % 2 == 0 { 0.0 } else { 0.5 }),
                })
                .collect::<Vec<_>>()
        };

        let mut scene = Scene {
            materials: vec![
                material(0, "feathers", [0.3, 0.4, 0.9, 1.0]),
                material(1, "beak", [1.0, 0.6, 0.1, 1.0]),
            ],
            cameras: vec![CameraSpec {
                name: "front".to_string(),
                projection: Projection::Perspective {
                    fov: 60.0,
                    near: 0.1,
                    far: 100.0,
                },
                transformation: Transformation::from_translation(0.0, 1.0, 10.0),
            }],
            armatures: vec![Armature {
                id: 0,
                name: "bird_rig".to_string(),
                joints: vec![
                    Joint {
                        name: "body".to_string(),
                        parent: None,
                        transformation: Transformation::IDENTITY,
                    },
                    Joint {
                        name: "wing".to_string(),
                        parent: Some(0),
                        transformation: Transformation::from_translation(0.5, 0.0, 0.0),
                    },
                ],
            }],
            animations: BTreeMap::from([(
                0,
                vec![
                    Animation {
                        name: "idle".to_string(),
                        frames: frames(&[0.0, 1.0, 2.0]),
                    },
                    Animation {
                        name: "flap".to_string(),
                        frames: frames(&[0.0, 0.25, 0.5, 0.75]),
                    },
                ],
            )]),
            ..Scene::default()
        };
        insert(&mut scene, model("Bird", &[0, 1], Transformation::IDENTITY));
        scene
    }

    /// Three cubes and three perspective cameras looking at them.
    #[must_use]
    pub fn cameras() -> Scene {
        let perspective = |name: &str, z: f32| CameraSpec {
            name: name.to_string(),
            projection: Projection::Perspective {
                fov: 45.0,
                near: 0.1,
                far: 100.0,
            },
            transformation: Transformation::from_translation(0.0, 2.0, z),
        };

        let mut scene = Scene {
            materials: vec![material(0, "cube", [0.9, 0.2, 0.2, 1.0])],
            cameras: vec![
                perspective("near", 5.0),
                perspective("middle", 10.0),
                perspective("far", 20.0),
            ],
            ..Scene::default()
        };
        for (i, name) in ["CubeA", "CubeB", "CubeC"].into_iter().enumerate() {
            let x = (i as f32 - 1.0) * 3.0;
            insert(&mut scene, model(name, &[0], Transformation::from_translation(x, 0.0, 0.0)));
        }
        scene
    }
}

impl SceneProvider for BuiltinScenes {
    fn load(&self, name: &str) -> Result<Scene, DemoError> {
        let scene = match name {
            "spaceship" => Self::spaceship(),
            "bird" => Self::bird(),
            "cameras" => Self::cameras(),
            _ => return Err(DemoError::UnknownScene(name.to_string())),
        };
        debug!(scene = name, models = scene.models.len(), "builtin scene served");
        Ok(scene)
    }
}

fn material(id: u32, name: &str, color: [f32; 4]) -> Material {
    Material {
        id,
        name: name.to_string(),
        color,
    }
}

/// A model with one unit quad per material id.
fn model(name: &str, material_ids: &[u32], transformation: Transformation) -> Model {
    let primitives = material_ids
        .iter()
        .map(|&material_id| Primitive {
            material_id,
            vertices: vec![
                [-0.5, 0.0, -0.5],
                [0.5, 0.0, -0.5],
                [0.5, 0.0, 0.5],
                [-0.5, 0.0, 0.5],
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        })
        .collect();
    Model {
        name: name.to_string(),
        mesh: Mesh {
            name: name.to_lowercase(),
            primitives,
        },
        transformation,
    }
}

fn insert(scene: &mut Scene, model: Model) {
    scene.models.insert(model.name.clone(), model);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenes_are_consistent() {
        for name in BuiltinScenes::NAMES {
            let scene = BuiltinScenes.load(name).unwrap();
            for model in scene.models.values() {
                for primitive in &model.mesh.primitives {
                    assert!(
                        scene.material(primitive.material_id).is_some(),
                        "{name}/{} references a missing material",
                        model.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_builtin_scene() {
        let err = BuiltinScenes.load("castle").unwrap_err();
        assert!(matches!(err, DemoError::UnknownScene(name) if name == "castle"));
    }

    #[test]
    fn test_json_provider_reads_directory() {
        let dir = std::env::temp_dir().join(format!("screens-scene-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let scene = BuiltinScenes::cameras();
        std::fs::write(dir.join("cameras.json"), serde_json::to_string(&scene).unwrap()).unwrap();

        let provider = JsonSceneProvider::new(&dir);
        assert_eq!(provider.load("cameras").unwrap(), scene);
        assert!(matches!(
            provider.load("missing").unwrap_err(),
            DemoError::SceneIo { .. }
        ));

        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            provider.load("broken").unwrap_err(),
            DemoError::SceneParse { .. }
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
