//! Components for the spaceship game.

use engine_component::Component;
use serde::{Deserialize, Serialize};

/// The ship the player steers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Player {
    /// Current tilt in `[-1, 1]`; negative while steering left.
    pub rotation: f32,
}

impl Component for Player {
    fn type_name() -> &'static str {
        "Player"
    }
}

/// A scrolling ground tile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Terrain;

impl Component for Terrain {
    fn type_name() -> &'static str {
        "Terrain"
    }
}

/// A pooled projectile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Bullet {
    /// `true` while in flight; unfired bullets wait in the pool.
    pub fired: bool,
}

impl Component for Bullet {
    fn type_name() -> &'static str {
        "Bullet"
    }
}

/// An enemy flying towards the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Monster {
    /// Approach speed, in world units per second.
    pub speed: f32,
}

impl Default for Monster {
    fn default() -> Self {
        Self { speed: 30.0 }
    }
}

impl Component for Monster {
    fn type_name() -> &'static str {
        "Monster"
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{ComponentStore, EntityBuilder, Query};

    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let mut store = ComponentStore::new();
        let bullet = EntityBuilder::new()
            .with(Bullet::default())
            .build(&mut store)
            .unwrap();
        let monster = EntityBuilder::new()
            .with(Monster::default())
            .build(&mut store)
            .unwrap();

        let bullets: Vec<_> = Query::of::<Bullet>().select(&store, store.entities()).collect();
        assert_eq!(bullets, vec![bullet]);
        assert_eq!(store.get::<Monster>(monster).unwrap().speed, 30.0);
        assert!(!store.get::<Bullet>(bullet).unwrap().fired);
    }

    #[test]
    fn test_player_round_trips_through_json() {
        let player = Player { rotation: -0.5 };
        let json = serde_json::to_string(&player).unwrap();
        assert_eq!(json, r#"{"rotation":-0.5}"#);
        assert_eq!(serde_json::from_str::<Player>(&json).unwrap(), player);
    }
}
