//! The world atlas: every map in the game as static geometry.
//!
//! Coordinates are map pixels. The demo world has one overworld with two
//! entrances and two local maps behind them: a town hosting the trader and
//! the wizard, and a cave holding the encounters.

use jrpg_core::{
    EncounterId, MapDefinition, MapId, MapOracle, NpcKind, NpcSpawn, Rect, SpawnKind, TeleportDef,
    WorldKind,
};

pub const OVERWORLD: &str = "overworld";
pub const TOWN: &str = "town";
pub const CAVE: &str = "cave";

/// Spawn point for a brand-new game, on the overworld.
pub const START_X: i32 = 400;
pub const START_Y: i32 = 400;

/// Static map oracle over the built-in world.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorldAtlas;

impl WorldAtlas {
    pub fn new() -> Self {
        Self
    }
}

impl MapOracle for WorldAtlas {
    fn map(&self, id: &MapId) -> Option<MapDefinition> {
        match id.as_str() {
            OVERWORLD => Some(overworld()),
            TOWN => Some(town()),
            CAVE => Some(cave()),
            _ => None,
        }
    }
}

fn overworld() -> MapDefinition {
    MapDefinition {
        id: MapId::new(OVERWORLD),
        world: WorldKind::Overworld,
        bounds: Rect::new(0, 0, 1600, 1200),
        colliders: vec![
            // Mountain range across the north edge.
            Rect::new(0, 0, 1600, 96),
            // Lake in the middle of the plain.
            Rect::new(640, 520, 320, 200),
        ],
        teleports: vec![
            TeleportDef {
                trigger: Rect::new(288, 192, 64, 64),
                dest_x: 400,
                dest_y: 540,
                dest_map: MapId::new(TOWN),
                dest_world: WorldKind::Localworld,
            },
            TeleportDef {
                trigger: Rect::new(1216, 704, 64, 64),
                dest_x: 96,
                dest_y: 96,
                dest_map: MapId::new(CAVE),
                dest_world: WorldKind::Localworld,
            },
        ],
        spawns: Vec::new(),
    }
}

fn town() -> MapDefinition {
    MapDefinition {
        id: MapId::new(TOWN),
        world: WorldKind::Localworld,
        bounds: Rect::new(0, 0, 800, 600),
        colliders: vec![
            // Houses along the main street.
            Rect::new(96, 96, 160, 128),
            Rect::new(544, 96, 160, 128),
        ],
        teleports: vec![TeleportDef {
            // Town gate, back out to the overworld.
            trigger: Rect::new(368, 568, 64, 32),
            dest_x: 320,
            dest_y: 288,
            dest_map: MapId::new(OVERWORLD),
            dest_world: WorldKind::Overworld,
        }],
        spawns: vec![
            NpcSpawn {
                rect: Rect::new(128, 240, 48, 48),
                kind: SpawnKind::Trader,
            },
            NpcSpawn {
                rect: Rect::new(576, 240, 48, 48),
                kind: SpawnKind::Wizard,
            },
        ],
    }
}

fn cave() -> MapDefinition {
    MapDefinition {
        id: MapId::new(CAVE),
        world: WorldKind::Localworld,
        bounds: Rect::new(0, 0, 800, 600),
        colliders: vec![
            // Stalagmite clusters narrowing the passage.
            Rect::new(240, 160, 96, 96),
            Rect::new(480, 352, 96, 96),
        ],
        teleports: vec![
            TeleportDef {
                // Cave mouth, back out to the overworld.
                trigger: Rect::new(32, 32, 48, 48),
                dest_x: 1248,
                dest_y: 800,
                dest_map: MapId::new(OVERWORLD),
                dest_world: WorldKind::Overworld,
            },
            TeleportDef {
                // Crawl tunnel dropping into the lower chamber.
                trigger: Rect::new(752, 128, 48, 48),
                dest_x: 608,
                dest_y: 416,
                dest_map: MapId::new(CAVE),
                dest_world: WorldKind::Localworld,
            },
        ],
        spawns: vec![
            NpcSpawn {
                rect: Rect::new(352, 256, 48, 48),
                kind: SpawnKind::Encounter {
                    party: vec![NpcKind::Slime, NpcKind::Slime],
                    background: "cave".into(),
                    encounter: Some(EncounterId(1)),
                },
            },
            NpcSpawn {
                rect: Rect::new(640, 480, 48, 48),
                kind: SpawnKind::Encounter {
                    party: vec![NpcKind::FireElemental, NpcKind::Slime],
                    background: "cave".into(),
                    encounter: Some(EncounterId(2)),
                },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_map_resolves() {
        let atlas = WorldAtlas::new();
        for name in [OVERWORLD, TOWN, CAVE] {
            let map = atlas.map(&MapId::new(name)).unwrap();
            assert_eq!(map.id.as_str(), name);
        }
        assert!(atlas.map(&MapId::new("nowhere")).is_none());
    }

    #[test]
    fn teleports_land_inside_destination_bounds() {
        let atlas = WorldAtlas::new();
        for name in [OVERWORLD, TOWN, CAVE] {
            let map = atlas.map(&MapId::new(name)).unwrap();
            for teleport in &map.teleports {
                let dest = atlas.map(&teleport.dest_map).unwrap();
                assert!(
                    teleport.dest_x >= dest.bounds.x && teleport.dest_x < dest.bounds.right(),
                    "{name}: teleport lands outside {}",
                    dest.id
                );
                assert!(
                    teleport.dest_y >= dest.bounds.y && teleport.dest_y < dest.bounds.bottom()
                );
                assert_eq!(dest.world, teleport.dest_world);
            }
        }
    }

    #[test]
    fn spawns_do_not_overlap_colliders() {
        let atlas = WorldAtlas::new();
        for name in [TOWN, CAVE] {
            let map = atlas.map(&MapId::new(name)).unwrap();
            for spawn in &map.spawns {
                for collider in &map.colliders {
                    assert!(!spawn.rect.intersects(collider), "{name}: blocked spawn");
                }
            }
        }
    }
}
