//! Host protocol codes carried by raw notifications.

/// ActorControlSelf categories
pub mod category {
    /// Director (duty/instance) update
    pub const DIRECTOR_UPDATE: u16 = 0x6D;
    /// Background music switched
    pub const SET_BGM: u16 = 0xA1;
}

/// Director update types (category `0x6D`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DirectorUpdate {
    DutyCommence = 0x4000_0001,
    DutyComplete = 0x4000_0003,
    DutyWipe = 0x4000_0005,
    DutyRecommence = 0x4000_0006,
    DutyUpdate = 0x4000_0007,
    DutyBarrierUp = 0x4000_0012,
    DungeonSetup = 0x8000_0000,
    MusicChange = 0x8000_0001,
    DungeonBossStartEnd15 = 0x8000_0015,
    DungeonBossStartEnd16 = 0x8000_0016,
}

impl DirectorUpdate {
    pub fn from_code(code: u32) -> Option<Self> {
        let update = match code {
            0x4000_0001 => DirectorUpdate::DutyCommence,
            0x4000_0003 => DirectorUpdate::DutyComplete,
            0x4000_0005 => DirectorUpdate::DutyWipe,
            0x4000_0006 => DirectorUpdate::DutyRecommence,
            0x4000_0007 => DirectorUpdate::DutyUpdate,
            0x4000_0012 => DirectorUpdate::DutyBarrierUp,
            0x8000_0000 => DirectorUpdate::DungeonSetup,
            0x8000_0001 => DirectorUpdate::MusicChange,
            0x8000_0015 => DirectorUpdate::DungeonBossStartEnd15,
            0x8000_0016 => DirectorUpdate::DungeonBossStartEnd16,
            _ => return None,
        };
        Some(update)
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Content finder content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ContentType {
    Dungeon = 2,
    Trial = 4,
    Raid = 5,
    Ultimate = 28,
}

impl ContentType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            2 => Some(ContentType::Dungeon),
            4 => Some(ContentType::Trial),
            5 => Some(ContentType::Raid),
            28 => Some(ContentType::Ultimate),
            _ => None,
        }
    }

    /// Eight-player duties where the combat-intro cue applies
    pub fn is_eight_player(self) -> bool {
        matches!(self, ContentType::Trial | ContentType::Raid)
    }
}
