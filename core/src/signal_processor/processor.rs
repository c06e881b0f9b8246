use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::events::GameEvent;
use crate::probes::{EncounterProbe, ProbeError};

use super::director::{ContentType, DirectorUpdate, category};

/// Chat line the game prints when a synthesis fails
pub const DEFAULT_CRAFT_FAILED_TEXT: &str = "Your synthesis fails!";

/// Condition flags the processor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Unconscious,
    InCombat,
    BoundByDuty,
    Other(u32),
}

/// Raw notification delivered by the host layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// ActorControlSelf packet: category plus the director update type
    DirectorUpdate { category: u16, update_type: u32 },
    ChatMessage { text: String },
    ConditionChanged { flag: ConditionFlag, value: bool },
    /// Player moved to a new territory; `None` when it has no content finder entry
    TerritoryChanged { content_type: Option<u32> },
}

/// Content type of the current territory, shared with probes.
#[derive(Debug, Default)]
pub struct TerritoryState {
    /// Raw content type code, 0 = none
    content_type: AtomicU32,
}

impl TerritoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, content_type: Option<u32>) {
        self.content_type
            .store(content_type.unwrap_or(0), Ordering::SeqCst);
    }

    /// Raw content type code, if any
    pub fn raw(&self) -> Option<u32> {
        match self.content_type.load(Ordering::SeqCst) {
            0 => None,
            code => Some(code),
        }
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.raw().and_then(ContentType::from_code)
    }

    pub fn is_dungeon(&self) -> bool {
        self.content_type() == Some(ContentType::Dungeon)
    }
}

/// Qualifies eight-player trials and raids for the combat-intro cue.
#[derive(Debug, Clone)]
pub struct ContentEncounterProbe {
    territory: Arc<TerritoryState>,
}

impl ContentEncounterProbe {
    pub fn new(territory: Arc<TerritoryState>) -> Self {
        Self { territory }
    }
}

impl EncounterProbe for ContentEncounterProbe {
    fn is_qualifying_encounter(&self) -> Result<bool, ProbeError> {
        Ok(self
            .territory
            .content_type()
            .is_some_and(ContentType::is_eight_player))
    }
}

/// Converts raw host notifications into game events.
#[derive(Debug)]
pub struct EventProcessor {
    territory: Arc<TerritoryState>,
    bound_by_duty: bool,
    /// Music changes since the last dungeon commence
    music_changes: i64,
    craft_failed_text: String,
    debug: bool,
}

impl EventProcessor {
    pub fn new(territory: Arc<TerritoryState>) -> Self {
        Self {
            territory,
            bound_by_duty: false,
            music_changes: 0,
            craft_failed_text: DEFAULT_CRAFT_FAILED_TEXT.to_string(),
            debug: false,
        }
    }

    /// Override the synthesis failure chat text (client language dependent).
    pub fn with_craft_failed_text(mut self, text: impl Into<String>) -> Self {
        self.craft_failed_text = text.into();
        self
    }

    /// Share a different territory state, keeping the rest of the context.
    pub fn with_territory(mut self, territory: Arc<TerritoryState>) -> Self {
        self.territory = territory;
        self
    }

    /// Log every director update at info level.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn territory(&self) -> &Arc<TerritoryState> {
        &self.territory
    }

    /// Interpret one host notification.
    pub fn process(&mut self, event: &HostEvent) -> Option<GameEvent> {
        match event {
            HostEvent::DirectorUpdate {
                category,
                update_type,
            } => self.on_director_update(*category, *update_type),
            HostEvent::ChatMessage { text } => self.on_chat_message(text),
            HostEvent::ConditionChanged { flag, value } => self.on_condition(*flag, *value),
            HostEvent::TerritoryChanged { content_type } => {
                self.territory.set(*content_type);
                tracing::debug!(content_type = ?content_type, "Territory changed");
                None
            }
        }
    }

    fn on_director_update(&mut self, cat: u16, update_type: u32) -> Option<GameEvent> {
        match cat {
            category::DIRECTOR_UPDATE => {}
            category::SET_BGM => {
                if self.debug {
                    tracing::info!("SetBgm");
                }
                return None;
            }
            _ => return None,
        }

        let Some(update) = DirectorUpdate::from_code(update_type) else {
            if self.debug {
                tracing::info!("Director update: unknown ({update_type:08x})");
            }
            return None;
        };
        if self.debug {
            tracing::info!("Director update: {update:?} ({update_type:08x})");
        }

        match update {
            DirectorUpdate::DutyComplete => Some(GameEvent::EnemyEncounterCleared),
            DirectorUpdate::MusicChange if self.territory.is_dungeon() => {
                self.music_changes += 1;
                Some(GameEvent::BossIntroThreshold {
                    repeat: self.music_changes,
                })
            }
            DirectorUpdate::DutyCommence if self.territory.is_dungeon() => {
                self.music_changes = 0;
                tracing::debug!(content_type = ?self.territory.content_type(), "Dungeon commenced");
                Some(GameEvent::EncounterReset)
            }
            _ => None,
        }
    }

    fn on_chat_message(&self, text: &str) -> Option<GameEvent> {
        if self.craft_failed_text.is_empty() || !text.contains(&self.craft_failed_text) {
            return None;
        }
        Some(GameEvent::CraftingFailed)
    }

    fn on_condition(&mut self, flag: ConditionFlag, value: bool) -> Option<GameEvent> {
        match flag {
            ConditionFlag::BoundByDuty => {
                self.bound_by_duty = value;
                None
            }
            ConditionFlag::Unconscious if value => Some(GameEvent::PlayerDowned),
            ConditionFlag::InCombat if value && self.bound_by_duty => {
                Some(GameEvent::CombatEngaged)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director(update: DirectorUpdate) -> HostEvent {
        HostEvent::DirectorUpdate {
            category: category::DIRECTOR_UPDATE,
            update_type: update.code(),
        }
    }

    fn enter(content: ContentType) -> HostEvent {
        HostEvent::TerritoryChanged {
            content_type: Some(content as u32),
        }
    }

    fn processor() -> EventProcessor {
        EventProcessor::new(Arc::new(TerritoryState::new()))
    }

    #[test]
    fn duty_complete_clears_encounter_anywhere() {
        let mut p = processor();
        assert_eq!(
            p.process(&director(DirectorUpdate::DutyComplete)),
            Some(GameEvent::EnemyEncounterCleared)
        );
    }

    #[test]
    fn music_changes_count_only_in_dungeons() {
        let mut p = processor();
        assert_eq!(p.process(&director(DirectorUpdate::MusicChange)), None);

        p.process(&enter(ContentType::Dungeon));
        assert_eq!(
            p.process(&director(DirectorUpdate::MusicChange)),
            Some(GameEvent::BossIntroThreshold { repeat: 1 })
        );
        assert_eq!(
            p.process(&director(DirectorUpdate::MusicChange)),
            Some(GameEvent::BossIntroThreshold { repeat: 2 })
        );

        assert_eq!(
            p.process(&director(DirectorUpdate::DutyCommence)),
            Some(GameEvent::EncounterReset)
        );
        assert_eq!(
            p.process(&director(DirectorUpdate::MusicChange)),
            Some(GameEvent::BossIntroThreshold { repeat: 1 })
        );
    }

    #[test]
    fn duty_commence_outside_dungeon_is_ignored() {
        let mut p = processor();
        p.process(&enter(ContentType::Raid));
        assert_eq!(p.process(&director(DirectorUpdate::DutyCommence)), None);
    }

    #[test]
    fn other_categories_and_unknown_codes_are_ignored() {
        let mut p = processor();
        p.set_debug(true);
        let bgm = HostEvent::DirectorUpdate {
            category: category::SET_BGM,
            update_type: DirectorUpdate::DutyComplete.code(),
        };
        assert_eq!(p.process(&bgm), None);

        let unknown = HostEvent::DirectorUpdate {
            category: category::DIRECTOR_UPDATE,
            update_type: 0xdead_beef,
        };
        assert_eq!(p.process(&unknown), None);
    }

    #[test]
    fn unconscious_downs_the_player() {
        let mut p = processor();
        let down = HostEvent::ConditionChanged {
            flag: ConditionFlag::Unconscious,
            value: true,
        };
        let up = HostEvent::ConditionChanged {
            flag: ConditionFlag::Unconscious,
            value: false,
        };
        assert_eq!(p.process(&down), Some(GameEvent::PlayerDowned));
        assert_eq!(p.process(&up), None);
    }

    #[test]
    fn combat_requires_bound_by_duty() {
        let mut p = processor();
        let combat = HostEvent::ConditionChanged {
            flag: ConditionFlag::InCombat,
            value: true,
        };
        assert_eq!(p.process(&combat), None);

        p.process(&HostEvent::ConditionChanged {
            flag: ConditionFlag::BoundByDuty,
            value: true,
        });
        assert_eq!(p.process(&combat), Some(GameEvent::CombatEngaged));
        assert_eq!(
            p.process(&HostEvent::ConditionChanged {
                flag: ConditionFlag::InCombat,
                value: false,
            }),
            None
        );
    }

    #[test]
    fn craft_failure_chat_line() {
        let mut p = processor();
        let fail = HostEvent::ChatMessage {
            text: "Your synthesis fails! The materials are lost.".into(),
        };
        assert_eq!(p.process(&fail), Some(GameEvent::CraftingFailed));
        let ok = HostEvent::ChatMessage {
            text: "You synthesize a bronze ingot.".into(),
        };
        assert_eq!(p.process(&ok), None);
    }

    #[test]
    fn empty_craft_text_never_matches() {
        let mut p = processor().with_craft_failed_text("");
        let msg = HostEvent::ChatMessage {
            text: "anything".into(),
        };
        assert_eq!(p.process(&msg), None);
    }

    #[test]
    fn encounter_probe_tracks_territory() {
        let p = processor();
        let probe = ContentEncounterProbe::new(Arc::clone(p.territory()));
        assert!(!probe.is_qualifying_encounter().unwrap());

        p.territory().set(Some(ContentType::Trial as u32));
        assert!(probe.is_qualifying_encounter().unwrap());

        p.territory().set(Some(ContentType::Dungeon as u32));
        assert!(!probe.is_qualifying_encounter().unwrap());

        p.territory().set(None);
        assert_eq!(p.territory().raw(), None);
    }
}
