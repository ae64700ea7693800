//! Typed events emitted by the battle machine.
//!
//! Every command and NPC step returns the batch of events it produced; the
//! scene drains them synchronously within the same frame. Rule violations
//! (not enough mana, ineligible target, blocked flee) surface as `Status`
//! lines only and never advance the turn.

use super::BattleAction;

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    /// NPC party emptied; rewards are paid out.
    Won,
    /// Party escaped; no rewards, encounter stays on the map.
    Fled,
    /// All four members knocked out; stack resets to the root.
    GameOver,
}

/// Something observable happened inside the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    /// Human-readable status line for the battle log.
    Status(String),
    /// The current member committed to an action from the menu.
    ActionChosen { member: usize, action: BattleAction },
    /// A player member fully dodged an incoming attack.
    Dodged { member: usize },
    /// A player member was knocked out.
    MemberKo { member: usize },
    /// An NPC was knocked out and removed from the NPC party.
    NpcKo { name: String },
    /// The turn moved on to the next combatant.
    TurnPassed,
    /// The battle reached a terminal state.
    Finished(BattleOutcome),
}
