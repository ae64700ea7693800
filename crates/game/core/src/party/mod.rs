//! Player party model: members, classes, leveling, and the shared roster.
mod class;
mod member;
mod roster;

pub use class::ClassId;
pub use member::PartyMember;
pub use roster::{PARTY_SIZE, PlayerParty};
