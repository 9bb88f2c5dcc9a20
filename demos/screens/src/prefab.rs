//! Turning scene data into entity builders.

use tracing::debug;

use components::{
    AnimatedMeshPrimitive, Camera, CameraSpec, MeshPrimitive, Model, Scene,
};
use engine_component::EntityBuilder;

use crate::error::DemoError;
use crate::resources::ResourceClient;

/// A scene together with the name it was loaded under.
#[derive(Debug, Clone)]
pub struct NamedScene {
    /// Name passed to the scene provider.
    pub name: String,
    /// The scene itself.
    pub scene: Scene,
}

impl NamedScene {
    /// Pair `scene` with `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, scene: Scene) -> Self {
        Self {
            name: name.into(),
            scene,
        }
    }

    /// Compile `model`'s mesh and describe each primitive as a
    /// [`MeshPrimitive`].
    ///
    /// Fails if a primitive references a material the scene lacks.
    pub fn mesh_primitives(
        &self,
        model: &Model,
        resources: &dyn ResourceClient,
    ) -> Result<Vec<MeshPrimitive>, DemoError> {
        let mesh = resources.compile(&model.name, &model.mesh.primitives);
        model
            .mesh
            .primitives
            .iter()
            .enumerate()
            .map(|(primitive, p)| {
                let material = self.scene.material(p.material_id).ok_or_else(|| {
                    DemoError::MissingMaterial {
                        scene: self.name.clone(),
                        id: p.material_id,
                    }
                })?;
                Ok(MeshPrimitive {
                    mesh,
                    primitive,
                    material_id: material.id,
                })
            })
            .collect()
    }

    /// Like [`mesh_primitives`](Self::mesh_primitives), for skinned meshes.
    pub fn animated_primitives(
        &self,
        model: &Model,
        resources: &dyn ResourceClient,
    ) -> Result<Vec<AnimatedMeshPrimitive>, DemoError> {
        Ok(self
            .mesh_primitives(model, resources)?
            .into_iter()
            .map(|p| AnimatedMeshPrimitive {
                mesh: p.mesh,
                primitive: p.primitive,
                material_id: p.material_id,
            })
            .collect())
    }

    /// A static mesh entity: one [`MeshPrimitive`] per primitive plus the
    /// model's [`Position`](engine_math::Position).
    pub fn model_builder(
        &self,
        model: &Model,
        resources: &dyn ResourceClient,
    ) -> Result<EntityBuilder, DemoError> {
        let mut builder = EntityBuilder::new();
        for primitive in self.mesh_primitives(model, resources)? {
            builder.add(primitive);
        }
        builder.add(model.transformation.to_position());
        debug!(scene = %self.name, model = %model.name, components = builder.len(), "model prefab");
        Ok(builder)
    }
}

/// A camera entity: [`Camera`] plus its [`Position`](engine_math::Position).
#[must_use]
pub fn camera_builder(spec: &CameraSpec) -> EntityBuilder {
    EntityBuilder::new()
        .with(Camera {
            name: spec.name.clone(),
            projection: spec.projection,
        })
        .with(spec.transformation.to_position())
}

#[cfg(test)]
mod tests {
    use engine_component::ComponentStore;
    use engine_math::Position;

    use super::*;
    use crate::resources::MeshCache;
    use crate::scene::BuiltinScenes;

    #[test]
    fn test_model_builder_adds_every_primitive() {
        let scene = NamedScene::new("spaceship", BuiltinScenes::spaceship());
        let cache = MeshCache::new();
        let player = scene.scene.model("Player").unwrap();

        let mut store = ComponentStore::new();
        let e = scene.model_builder(player, &cache).unwrap().build(&mut store).unwrap();

        let primitives = store.find_all::<MeshPrimitive>(e).unwrap();
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[1].primitive, 1);
        assert_eq!(primitives[1].material_id, 1);
        assert_eq!(store.get::<Position>(e).unwrap(), &Position::IDENTITY);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_dangling_material_is_reported() {
        let mut scene = BuiltinScenes::spaceship();
        scene.materials.clear();
        let scene = NamedScene::new("bare", scene);
        let bullet = scene.scene.model("Bullet").unwrap();

        let err = scene.mesh_primitives(bullet, &MeshCache::new()).unwrap_err();
        assert!(matches!(
            err,
            DemoError::MissingMaterial { ref scene, id: 1 } if scene == "bare"
        ));
    }
}
