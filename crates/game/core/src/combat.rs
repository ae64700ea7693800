//! Action-resolution math and the shared combatant surface.
//!
//! Pure functions resolve damage; the [`Combatant`] trait gives spells and
//! usable items one surface over player members and NPCs. Side-specific
//! intake rules stay with the implementors: players roll evasion and
//! subtract defense, NPCs take flat damage.

/// Result of applying damage to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    /// The attack was fully evaded; no effect.
    Dodged,
    /// Damage landed.
    Hit {
        /// Points actually removed from HP.
        damage: u32,
        /// True when this hit knocked the target out.
        knocked_out: bool,
    },
}

impl HitOutcome {
    pub fn knocked_out(&self) -> bool {
        matches!(self, HitOutcome::Hit { knocked_out: true, .. })
    }
}

/// Physical damage after defense reduction, floored at `minimum`.
///
/// Armor can never absorb a hit completely; the floor keeps evasion as the
/// only path to taking zero damage. Intentional game balance, do not "fix".
pub fn physical_damage_taken(incoming: u32, defense: u32, minimum: u32) -> u32 {
    incoming.saturating_sub(defense).max(minimum)
}

/// True when a permille roll in [0, 1000) falls under the evasion chance.
pub fn is_dodge(roll_permille: u32, evasion_permille: u32) -> bool {
    roll_permille < evasion_permille
}

/// Common surface of player members and NPC combatants.
///
/// Spells and usable items target `dyn Combatant`, so effect application
/// and `check_appliable` work identically on both sides.
pub trait Combatant {
    fn name(&self) -> &str;
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
    fn mp(&self) -> u32;
    fn max_mp(&self) -> u32;

    /// Knocked out. Equivalent to `hp() == 0` for every implementor.
    fn is_ko(&self) -> bool {
        self.hp() == 0
    }

    /// Restores HP up to the maximum. Must not revive: callers gate healing
    /// of KO'd targets through `check_appliable`.
    fn heal(&mut self, amount: u32);

    /// Restores MP up to the maximum.
    fn restore_mp(&mut self, amount: u32);

    /// Spends MP; caller has already verified the cost is affordable.
    fn spend_mp(&mut self, amount: u32);

    /// Brings a KO'd combatant back with the given HP (clamped to max).
    fn revive(&mut self, hp: u32);

    /// Flat damage ignoring evasion and defense entirely. Used by breath
    /// and elemental attacks.
    fn take_magic_damage(&mut self, amount: u32) -> HitOutcome;

    /// Damage with no evasion roll, reduced by whatever intake rule the
    /// side uses. For NPCs this is plain subtraction.
    fn take_flat_damage(&mut self, amount: u32) -> HitOutcome;
}
