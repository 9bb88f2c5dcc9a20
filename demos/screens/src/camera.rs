//! The camera screen: the `cameras` scene seen through its third perspective
//! camera. Nothing moves.

use std::rc::Rc;

use tracing::info;

use engine_app::Engine;

use crate::error::DemoError;
use crate::prefab::{NamedScene, camera_builder};
use crate::resources::ResourceClient;
use crate::scene::SceneProvider;
use crate::screen::Screen;

/// Index of the perspective camera the screen looks through.
pub const ACTIVE_CAMERA: usize = 2;

/// Shows the `cameras` scene.
pub struct CameraScreen {
    scenes: Rc<dyn SceneProvider>,
    resources: Rc<dyn ResourceClient>,
}

impl CameraScreen {
    /// Scene name the screen loads.
    pub const SCENE: &'static str = "cameras";

    #[must_use]
    pub fn new(scenes: Rc<dyn SceneProvider>, resources: Rc<dyn ResourceClient>) -> Self {
        Self { scenes, resources }
    }
}

impl Screen for CameraScreen {
    fn name(&self) -> &str {
        "camera"
    }

    fn create_entities(&mut self, engine: &mut Engine) -> Result<(), DemoError> {
        let scene = NamedScene::new(Self::SCENE, self.scenes.load(Self::SCENE)?);

        let perspective: Vec<_> = scene.scene.perspective_cameras().collect();
        let camera = perspective
            .get(ACTIVE_CAMERA)
            .ok_or_else(|| DemoError::MissingCamera {
                scene: Self::SCENE.to_string(),
                kind: "perspective",
                needed: ACTIVE_CAMERA + 1,
                found: perspective.len(),
            })?;

        for model in scene.scene.models.values() {
            engine.create(scene.model_builder(model, self.resources.as_ref())?)?;
        }
        engine.create(camera_builder(camera))?;

        info!(camera = %camera.name, models = scene.scene.models.len(), "camera scene created");
        Ok(())
    }
}
