//! The animation screen: every model of the `bird` scene plays the last
//! animation of the scene's first armature, looping.

use std::rc::Rc;

use tracing::{info, trace};

use components::AnimatedModel;
use engine_app::Engine;
use engine_component::{EcsError, Entity, EntityBuilder, Query};
use engine_system::{System, SystemContext};

use crate::error::DemoError;
use crate::prefab::{NamedScene, camera_builder};
use crate::resources::ResourceClient;
use crate::scene::SceneProvider;
use crate::screen::Screen;

/// Advances every [`AnimatedModel`] by the tick's delta.
pub struct AnimationSystem {
    query: Query,
}

impl AnimationSystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::of::<AnimatedModel>(),
        }
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &str {
        "animation"
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn update_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EcsError> {
        let dt = ctx.delta_f32();
        let model = ctx.get_mut::<AnimatedModel>(entity)?;
        model.advance(dt);
        trace!(%entity, time = model.time, frame = model.current_frame, "animation advanced");
        Ok(())
    }
}

/// Plays the `bird` scene.
pub struct AnimationScreen {
    scenes: Rc<dyn SceneProvider>,
    resources: Rc<dyn ResourceClient>,
}

impl AnimationScreen {
    /// Scene name the screen loads.
    pub const SCENE: &'static str = "bird";

    #[must_use]
    pub fn new(scenes: Rc<dyn SceneProvider>, resources: Rc<dyn ResourceClient>) -> Self {
        Self { scenes, resources }
    }
}

impl Screen for AnimationScreen {
    fn name(&self) -> &str {
        "animation"
    }

    fn create_entities(&mut self, engine: &mut Engine) -> Result<(), DemoError> {
        let scene = NamedScene::new(Self::SCENE, self.scenes.load(Self::SCENE)?);
        let missing = || DemoError::MissingAnimation(Self::SCENE.to_string());

        let armature = scene.scene.armatures.first().ok_or_else(missing)?;
        let animation = scene
            .scene
            .animations
            .get(&armature.id)
            .and_then(|animations| animations.last())
            .ok_or_else(missing)?;

        for model in scene.scene.models.values() {
            info!(model = %model.name, animation = %animation.name, "create animated model");
            let mut builder = EntityBuilder::new().with(AnimatedModel::new(
                animation.frames.clone(),
                armature.clone(),
            ));
            for primitive in scene.animated_primitives(model, self.resources.as_ref())? {
                builder.add(primitive);
            }
            engine.create(builder.with(model.transformation.to_position()))?;
        }

        for camera in scene.scene.perspective_cameras() {
            info!(camera = %camera.name, "create camera");
            engine.create(camera_builder(camera))?;
        }
        Ok(())
    }

    fn create_systems(&mut self) -> Result<Vec<Box<dyn System>>, DemoError> {
        let systems: Vec<Box<dyn System>> = vec![Box::new(AnimationSystem::new())];
        Ok(systems)
    }
}

#[cfg(test)]
mod tests {
    use components::{AnimatedMeshPrimitive, Camera, Scene};

    use super::*;
    use crate::resources::MeshCache;
    use crate::scene::BuiltinScenes;
    use crate::screen::GameScreen;

    fn mount() -> Engine {
        let screen = AnimationScreen::new(Rc::new(BuiltinScenes), Rc::new(MeshCache::new()));
        let mut engine = Engine::new();
        GameScreen::new(Box::new(screen)).mount(&mut engine).unwrap();
        engine
    }

    #[test]
    fn test_uses_last_animation() {
        let engine = mount();
        let birds = engine.select(&Query::of::<AnimatedModel>());
        assert_eq!(birds.len(), 1);

        let model = engine.store().get::<AnimatedModel>(birds[0]).unwrap();
        // "flap" is the last animation of the rig.
        assert_eq!(model.frames.len(), 4);
        assert_eq!(model.duration, 0.75);
        assert_eq!(model.reference_pose.name, "bird_rig");
        assert_eq!(
            engine.store().find_all::<AnimatedMeshPrimitive>(birds[0]).unwrap().len(),
            2
        );
        assert_eq!(engine.select(&Query::of::<Camera>()).len(), 1);
    }

    #[test]
    fn test_animation_loops() {
        let mut engine = mount();
        let bird = engine.select(&Query::of::<AnimatedModel>())[0];

        engine.tick(0.5).unwrap();
        let model = engine.store().get::<AnimatedModel>(bird).unwrap();
        assert_eq!(model.time, 0.5);
        assert_eq!(model.current_frame, 2);

        engine.tick(0.5).unwrap();
        let model = engine.store().get::<AnimatedModel>(bird).unwrap();
        assert_eq!(model.time, 0.25);
        assert_eq!(model.current_frame, 1);
    }

    #[test]
    fn test_scene_without_animation_fails() {
        struct Bare;

        impl SceneProvider for Bare {
            fn load(&self, _name: &str) -> Result<Scene, DemoError> {
                let mut scene = BuiltinScenes::bird();
                scene.animations.clear();
                Ok(scene)
            }
        }

        let mut screen = AnimationScreen::new(Rc::new(Bare), Rc::new(MeshCache::new()));
        let err = screen.create_entities(&mut Engine::new()).unwrap_err();
        assert!(matches!(err, DemoError::MissingAnimation(name) if name == "bird"));
    }
}
