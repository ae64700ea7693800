//! Map data types returned by the map oracle.
//!
//! A map is a set of axis-aligned rectangles: solid colliders, teleport
//! triggers with destination metadata, and NPC spawn descriptors. How the
//! data is produced (tile maps, editors, fixtures) is out of scope; the
//! engine consumes only these shapes.

use crate::item::EncounterId;
use crate::npc::NpcKind;

/// Identifier of a map known to the map oracle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapId(String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which map family a location belongs to. Teleports between worlds switch
/// the active map state variant; teleports within a world just relocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldKind {
    Overworld,
    Localworld,
}

/// Axis-aligned rectangle in map pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    /// True when the two rectangles overlap by at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// On-map teleport trigger with its destination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeleportDef {
    /// Trigger rectangle; entering it fires the teleport.
    pub trigger: Rect,
    /// Avatar coordinates on the destination map.
    pub dest_x: i32,
    pub dest_y: i32,
    /// Destination map identifier.
    pub dest_map: MapId,
    /// World the destination map belongs to.
    pub dest_world: WorldKind,
}

/// What an on-map NPC spawn is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnKind {
    /// Opens a goods window; no state push.
    Trader,
    /// Opens a spell-shop window; no state push.
    Wizard,
    /// Walking into it starts a battle with the listed NPC party.
    Encounter {
        party: Vec<NpcKind>,
        /// Battle background resource name, passed through to the scene.
        background: String,
        /// Stable id for one-time encounters; defeated ids never respawn.
        encounter: Option<EncounterId>,
    },
}

/// NPC spawn descriptor: where it stands and what it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcSpawn {
    pub rect: Rect,
    pub kind: SpawnKind,
}

/// Complete static description of one map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub id: MapId,
    pub world: WorldKind,
    /// Playable area; the avatar is kept inside it.
    pub bounds: Rect,
    pub colliders: Vec<Rect>,
    pub teleports: Vec<TeleportDef>,
    pub spawns: Vec<NpcSpawn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(10, 0, 5, 5);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Touching edges do not overlap.
        assert!(!a.intersects(&c));
    }
}
