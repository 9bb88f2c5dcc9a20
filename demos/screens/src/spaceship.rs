//! The spaceship game.
//!
//! The player steers left and right over scrolling terrain and fires pooled
//! bullets at monsters that spawn ahead every couple of seconds. Forward is
//! `+z`; terrain and monsters travel towards `-z`.

use std::rc::Rc;

use tracing::{debug, info, warn};

use components::{Bullet, MeshPrimitive, Monster, Player, Terrain};
use engine_app::Engine;
use engine_component::{EcsError, Entity, EntityBuilder, Query};
use engine_math::{Position, Vec3};
use engine_system::{System, SystemContext, TemporalSystem};

use crate::error::DemoError;
use crate::input::{InputProvider, Key};
use crate::prefab::{NamedScene, camera_builder};
use crate::resources::ResourceClient;
use crate::scene::SceneProvider;
use crate::screen::Screen;

/// Sideways speed of the player, units per second.
pub const PLAYER_SPEED: f32 = 50.0;
/// The player stays within `[-PLAYER_BOUND, PLAYER_BOUND]` on x.
pub const PLAYER_BOUND: f32 = 20.0;
/// Per-tick factor pulling the player's tilt back to level.
pub const TILT_DECAY: f32 = 0.9;

/// Terrain scroll speed, units per second.
pub const TERRAIN_SPEED: f32 = 20.0;
/// Number of terrain tiles.
pub const TERRAIN_TILES: usize = 11;
/// Distance between consecutive tiles on z.
pub const TERRAIN_SPACING: f32 = 20.0;
/// A tile behind this z is recycled to the far end.
pub const TERRAIN_RECYCLE_Z: f32 = -20.0;
/// How far a recycled tile jumps ahead.
pub const TERRAIN_WRAP: f32 = 200.0;

/// Number of pooled bullets.
pub const BULLET_POOL: usize = 101;
/// Bullet speed, units per second.
pub const BULLET_SPEED: f32 = 120.0;
/// A bullet at or past this z returns to the pool.
pub const BULLET_RANGE: f32 = 100.0;

/// Seconds between monster spawns.
pub const MONSTER_INTERVAL: f64 = 2.0;
/// Where monsters appear on z.
pub const MONSTER_SPAWN_Z: f32 = 100.0;
/// Lateral spacing of the lanes monsters spawn in.
pub const MONSTER_LANE: f32 = 4.0;
/// A monster this far behind the player is gone.
pub const MONSTER_PASS_MARGIN: f32 = 10.0;
/// A fired bullet this close to a monster hits it.
pub const HIT_RANGE: f32 = 3.0;

fn player_query() -> Query {
    Query::of::<Player>().with::<Position>()
}

/// Steers the player with the arrow keys and tilts the ship into the turn.
pub struct PlayerControl {
    query: Query,
    input: Rc<dyn InputProvider>,
}

impl PlayerControl {
    /// Read keys from `input`.
    #[must_use]
    pub fn new(input: Rc<dyn InputProvider>) -> Self {
        Self {
            query: player_query(),
            input,
        }
    }
}

impl System for PlayerControl {
    fn name(&self) -> &str {
        "player_control"
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
        let mut player = ctx.entity_mut(entity)?;
        let mut tilt = player.get::<Player>()?.rotation;

        let position = player.get_mut::<Position>()?;
        if self.input.is_key_pressed(Key::ArrowLeft) {
            position.translate(Vec3::X * PLAYER_SPEED * dt);
            tilt = (tilt - dt).max(-1.0);
        } else if self.input.is_key_pressed(Key::ArrowRight) {
            position.translate(Vec3::X * -PLAYER_SPEED * dt);
            tilt = (tilt + dt).min(1.0);
        }
        position.translation.x = position.translation.x.clamp(-PLAYER_BOUND, PLAYER_BOUND);
        position.set_rotation_z((tilt * 180.0).to_radians());

        player.get_mut::<Player>()?.rotation = tilt * TILT_DECAY;
        Ok(())
    }
}

/// Scrolls terrain tiles towards the camera, recycling the ones left behind.
pub struct TerrainMove {
    query: Query,
}

impl TerrainMove {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::of::<Terrain>().with::<Position>(),
        }
    }
}

impl Default for TerrainMove {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TerrainMove {
    fn name(&self) -> &str {
        "terrain_move"
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
        let position = ctx.get_mut::<Position>(entity)?;
        position.translate(Vec3::Z * -TERRAIN_SPEED * dt);
        if position.translation.z < TERRAIN_RECYCLE_Z {
            position.translate(Vec3::Z * TERRAIN_WRAP);
        }
        Ok(())
    }
}

/// Fires a pooled bullet on Space and flies the ones in the air.
pub struct BulletMove {
    query: Query,
    players: Query,
    input: Rc<dyn InputProvider>,
}

impl BulletMove {
    /// Read the fire key from `input`.
    #[must_use]
    pub fn new(input: Rc<dyn InputProvider>) -> Self {
        Self {
            query: Query::of::<Bullet>().with::<Position>(),
            players: player_query(),
            input,
        }
    }
}

impl System for BulletMove {
    fn name(&self) -> &str {
        "bullet_move"
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        if !self.input.is_key_just_pressed(Key::Space) {
            return Ok(());
        }
        let Some(player) = ctx.first(&self.players) else {
            return Ok(());
        };
        // The bullet starts from where the player is now and does not follow.
        let origin = ctx.get::<Position>(player)?.scaled_translation();

        for &bullet in ctx.entities() {
            if ctx.get::<Bullet>(bullet)?.fired {
                continue;
            }
            let mut handle = ctx.entity_mut(bullet)?;
            handle.get_mut::<Position>()?.set_translation(origin);
            handle.get_mut::<Bullet>()?.fired = true;
            debug!(%bullet, x = origin.x, z = origin.z, "bullet fired");
            return Ok(());
        }
        debug!("bullet pool exhausted");
        Ok(())
    }

    fn update_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EcsError> {
        let dt = ctx.delta_f32();
        let mut bullet = ctx.entity_mut(entity)?;
        if !bullet.get::<Bullet>()?.fired {
            return Ok(());
        }
        let position = bullet.get_mut::<Position>()?;
        if position.translation.z < BULLET_RANGE {
            position.translate(Vec3::Z * BULLET_SPEED * dt);
        } else {
            bullet.get_mut::<Bullet>()?.fired = false;
        }
        Ok(())
    }
}

/// Spawns one monster ahead of the player each time it fires. Meant to be
/// wrapped in a [`TemporalSystem`]; see [`MonsterSpawner::every`].
pub struct MonsterSpawner {
    query: Query,
    players: Query,
    mesh: Vec<MeshPrimitive>,
    spawned: u64,
}

impl MonsterSpawner {
    /// Spawn monsters drawn with `mesh`.
    #[must_use]
    pub fn new(mesh: Vec<MeshPrimitive>) -> Self {
        Self {
            query: Query::none(),
            players: player_query(),
            mesh,
            spawned: 0,
        }
    }

    /// A spawner firing every `interval` seconds.
    #[must_use]
    pub fn every(interval: f64, mesh: Vec<MeshPrimitive>) -> TemporalSystem<Self> {
        TemporalSystem::new(interval, Self::new(mesh))
    }

    /// Monsters requested so far.
    #[must_use]
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

impl System for MonsterSpawner {
    fn name(&self) -> &str {
        "monster_spawner"
    }

    fn query(&self) -> &Query {
        &self.query
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), EcsError> {
        let player_x = match ctx.first(&self.players) {
            Some(player) => ctx.get::<Position>(player)?.translation.x,
            None => 0.0,
        };
        // Cycle through five lanes centred on the player.
        let lane = (self.spawned % 5) as f32 - 2.0;
        let x = (player_x + lane * MONSTER_LANE).clamp(-PLAYER_BOUND, PLAYER_BOUND);

        let mut monster = EntityBuilder::new()
            .with(Monster::default())
            .with(Position::from_translation(Vec3::new(x, 0.0, MONSTER_SPAWN_Z)));
        for primitive in &self.mesh {
            monster.add(*primitive);
        }
        ctx.spawn(monster);
        self.spawned += 1;
        debug!(tick_id = ctx.tick_id(), x, spawned = self.spawned, "monster queued");
        Ok(())
    }
}

/// Moves monsters towards the player; removes the ones that got past or got
/// shot, returning the bullet to the pool.
pub struct MonsterMove {
    query: Query,
    players: Query,
    bullets: Query,
}

impl MonsterMove {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::of::<Monster>().with::<Position>(),
            players: player_query(),
            bullets: Query::of::<Bullet>().with::<Position>(),
        }
    }
}

impl Default for MonsterMove {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MonsterMove {
    fn name(&self) -> &str {
        "monster_move"
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
        let speed = ctx.get::<Monster>(entity)?.speed;
        let position = ctx.get_mut::<Position>(entity)?;
        position.translate(Vec3::Z * -speed * dt);
        let at = position.translation;

        let player_z = match ctx.first(&self.players) {
            Some(player) => ctx.get::<Position>(player)?.translation.z,
            None => 0.0,
        };
        if at.z < player_z - MONSTER_PASS_MARGIN {
            ctx.despawn(entity);
            debug!(monster = %entity, "monster escaped");
            return Ok(());
        }

        for bullet in ctx.select(&self.bullets) {
            if !ctx.get::<Bullet>(bullet)?.fired {
                continue;
            }
            if ctx.get::<Position>(bullet)?.translation.distance(at) <= HIT_RANGE {
                ctx.get_mut::<Bullet>(bullet)?.fired = false;
                ctx.despawn(entity);
                debug!(monster = %entity, %bullet, "monster hit");
                return Ok(());
            }
        }
        Ok(())
    }
}

/// The spaceship screen, built from the `spaceship` scene.
pub struct SpaceshipScreen {
    scenes: Rc<dyn SceneProvider>,
    resources: Rc<dyn ResourceClient>,
    input: Rc<dyn InputProvider>,
    monster_mesh: Vec<MeshPrimitive>,
}

impl SpaceshipScreen {
    /// Scene name the screen loads.
    pub const SCENE: &'static str = "spaceship";

    #[must_use]
    pub fn new(
        scenes: Rc<dyn SceneProvider>,
        resources: Rc<dyn ResourceClient>,
        input: Rc<dyn InputProvider>,
    ) -> Self {
        Self {
            scenes,
            resources,
            input,
            monster_mesh: Vec::new(),
        }
    }
}

impl Screen for SpaceshipScreen {
    fn name(&self) -> &str {
        "spaceship"
    }

    fn create_entities(&mut self, engine: &mut Engine) -> Result<(), DemoError> {
        let scene = NamedScene::new(Self::SCENE, self.scenes.load(Self::SCENE)?);
        let resources = self.resources.as_ref();

        match scene.scene.model("Player") {
            Some(player) => {
                let builder = scene.model_builder(player, resources)?.with(Player::default());
                engine.create(builder)?;
            }
            None => warn!(scene = Self::SCENE, "no Player model"),
        }

        if let Some(bullet) = scene.scene.model("Bullet") {
            let primitives = scene.mesh_primitives(bullet, resources)?;
            let position = bullet.transformation.to_position();
            for _ in 0..BULLET_POOL {
                let mut builder = EntityBuilder::new();
                for primitive in &primitives {
                    builder.add(*primitive);
                }
                engine.create(builder.with(Bullet::default()).with(position))?;
            }
        }

        if let Some(terrain) = scene.scene.model("Terrain") {
            let primitives = scene.mesh_primitives(terrain, resources)?;
            let origin = terrain.transformation.to_position();
            for index in 0..TERRAIN_TILES {
                let offset = Vec3::Z * (index as f32 * TERRAIN_SPACING);
                let mut builder = EntityBuilder::new();
                for primitive in &primitives {
                    builder.add(*primitive);
                }
                engine.create(builder.with(Terrain).with(origin.translated(offset)))?;
            }
        }

        if let Some(monster) = scene.scene.model("Monster") {
            self.monster_mesh = scene.mesh_primitives(monster, resources)?;
        }

        for camera in scene.scene.orthographic_cameras() {
            engine.create(camera_builder(camera))?;
        }

        info!(scene = Self::SCENE, entities = engine.entity_count(), "spaceship created");
        Ok(())
    }

    fn create_systems(&mut self) -> Result<Vec<Box<dyn System>>, DemoError> {
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(PlayerControl::new(Rc::clone(&self.input))),
            Box::new(TerrainMove::new()),
            Box::new(BulletMove::new(Rc::clone(&self.input))),
            Box::new(MonsterSpawner::every(MONSTER_INTERVAL, self.monster_mesh.clone())),
            Box::new(MonsterMove::new()),
        ];
        Ok(systems)
    }
}
