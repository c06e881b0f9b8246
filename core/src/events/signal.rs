/// Game events the trigger router reacts to.
///
/// These are "interesting things that happened" at a higher level than the raw
/// host notifications they are derived from (see `signal_processor`). Each one
/// is consumed once by the router and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The local player was knocked unconscious
    PlayerDowned,
    /// A duty/encounter was completed
    EnemyEncounterCleared,
    /// A crafting attempt failed
    CraftingFailed,
    /// The player entered combat
    CombatEngaged,
    /// A boss-intro music change; `repeat` is the host-side occurrence count
    BossIntroThreshold { repeat: i64 },
    /// A new dungeon run began; zeroes the boss-intro counter
    EncounterReset,
}

impl GameEvent {
    /// Short stable name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerDowned => "player_downed",
            GameEvent::EnemyEncounterCleared => "enemy_encounter_cleared",
            GameEvent::CraftingFailed => "crafting_failed",
            GameEvent::CombatEngaged => "combat_engaged",
            GameEvent::BossIntroThreshold { .. } => "boss_intro_threshold",
            GameEvent::EncounterReset => "encounter_reset",
        }
    }
}
