//! NPC template lookup.

use crate::npc::{NpcKind, NpcTemplate};

/// Maps an NPC kind tag to its template.
///
/// Map data stores only the tag; the registry behind this trait is populated
/// at startup, so no executable content ever lives in map data.
pub trait NpcOracle {
    /// Returns the template for a kind, or `None` if the kind is not
    /// registered. An unregistered kind referenced by map data is a content
    /// wiring bug and is treated as fatal by callers.
    fn template(&self, kind: NpcKind) -> Option<NpcTemplate>;
}
