use serde::{Deserialize, Serialize};

/// Map PK/behaviour type stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapType {
    #[default]
    Default,
    Unknown1,
    Unknown2,
    PK,
    /// A code this editor has no name for, kept so the file re-saves unchanged.
    Unrecognized(u8),
}

impl MapType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Default,
            1 => Self::Unknown1,
            2 => Self::Unknown2,
            3 => Self::PK,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Unknown1 => 1,
            Self::Unknown2 => 2,
            Self::PK => 3,
            Self::Unrecognized(code) => code,
        }
    }
}

/// Environmental effect applied to players on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapEffect {
    #[default]
    None,
    HPDrain,
    TPDrain,
    Quake,
    Unrecognized(u8),
}

impl MapEffect {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::HPDrain,
            2 => Self::TPDrain,
            3 => Self::Quake,
            other => Self::Unrecognized(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::HPDrain => 1,
            Self::TPDrain => 2,
            Self::Quake => 3,
            Self::Unrecognized(code) => code,
        }
    }
}

/// Special behaviour attached to a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileSpec {
    Wall,
    ChairDown,
    ChairLeft,
    ChairRight,
    ChairUp,
    ChairDownRight,
    ChairUpLeft,
    ChairAll,
    UnknownDoor,
    Chest,
    SpecUnknown1,
    SpecUnknown2,
    SpecUnknown3,
    SpecUnknown4,
    SpecUnknown5,
    SpecUnknown6,
    BankVault,
    NPCBoundary,
    MapEdge,
    FakeWall,
    Board1,
    Board2,
    Board3,
    Board4,
    Board5,
    Board6,
    Board7,
    Board8,
    Jukebox,
    Jump,
    Water,
    SpecUnknown7,
    Arena,
    AmbientSource,
    Spikes1,
    Spikes2,
    Spikes3,
    Unrecognized(u8),
}

/// Named tile specs in code order (index == code).
pub const NAMED_TILE_SPECS: [TileSpec; 37] = [
    TileSpec::Wall,
    TileSpec::ChairDown,
    TileSpec::ChairLeft,
    TileSpec::ChairRight,
    TileSpec::ChairUp,
    TileSpec::ChairDownRight,
    TileSpec::ChairUpLeft,
    TileSpec::ChairAll,
    TileSpec::UnknownDoor,
    TileSpec::Chest,
    TileSpec::SpecUnknown1,
    TileSpec::SpecUnknown2,
    TileSpec::SpecUnknown3,
    TileSpec::SpecUnknown4,
    TileSpec::SpecUnknown5,
    TileSpec::SpecUnknown6,
    TileSpec::BankVault,
    TileSpec::NPCBoundary,
    TileSpec::MapEdge,
    TileSpec::FakeWall,
    TileSpec::Board1,
    TileSpec::Board2,
    TileSpec::Board3,
    TileSpec::Board4,
    TileSpec::Board5,
    TileSpec::Board6,
    TileSpec::Board7,
    TileSpec::Board8,
    TileSpec::Jukebox,
    TileSpec::Jump,
    TileSpec::Water,
    TileSpec::SpecUnknown7,
    TileSpec::Arena,
    TileSpec::AmbientSource,
    TileSpec::Spikes1,
    TileSpec::Spikes2,
    TileSpec::Spikes3,
];

impl TileSpec {
    pub fn from_code(code: u8) -> Self {
        NAMED_TILE_SPECS
            .get(code as usize)
            .copied()
            .unwrap_or(Self::Unrecognized(code))
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unrecognized(code) => code,
            named => NAMED_TILE_SPECS
                .iter()
                .position(|&s| s == named)
                .map_or(0, |i| i as u8),
        }
    }
}

/// One of the nine graphics planes. Index order matches the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GfxLayer {
    Ground = 0,
    Object = 1,
    Overlay = 2,
    DownWall = 3,
    RightWall = 4,
    Roof = 5,
    Top = 6,
    Shadow = 7,
    Overlay2 = 8,
}

/// All layers in file order.
pub const ALL_LAYERS: [GfxLayer; 9] = [
    GfxLayer::Ground,
    GfxLayer::Object,
    GfxLayer::Overlay,
    GfxLayer::DownWall,
    GfxLayer::RightWall,
    GfxLayer::Roof,
    GfxLayer::Top,
    GfxLayer::Shadow,
    GfxLayer::Overlay2,
];

impl GfxLayer {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        ALL_LAYERS.get(index).copied()
    }
}

/// Door state of a warp tile: 0 = no door, 1 = unlocked door, n = locked with key n - 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Door(pub u16);

impl Door {
    pub const NONE: Door = Door(0);
    pub const UNLOCKED: Door = Door(1);

    /// A door that opens with the given key item.
    pub fn locked(key: u16) -> Self {
        Door(key.saturating_add(1))
    }

    pub fn has_door(self) -> bool {
        self.0 != 0
    }

    /// Key needed to open the door, if it is locked.
    pub fn key(self) -> Option<u16> {
        (self.0 > 1).then(|| self.0 - 1)
    }
}

/// An NPC spawn point. Several may share a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub x: u8,
    pub y: u8,
    pub npc_id: u16,
    pub spawn_type: u8,
    /// Respawn delay in seconds.
    pub spawn_time: u16,
    pub amount: u8,
}

/// An item spawn inside a chest. Several may share a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChestSpawn {
    pub x: u8,
    pub y: u8,
    /// Key item needed to open the chest; 0 = none.
    pub key: u16,
    pub slot: u8,
    pub item: u16,
    /// Respawn delay in minutes.
    pub time: u16,
    /// Stored in a 3-byte field.
    pub amount: u32,
}

/// Four opaque bytes carried through load/save untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnknownBlock(pub [u8; 4]);

/// Tile spec entry within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSpecCell {
    pub x: u8,
    pub spec: TileSpec,
}

/// Warp entry within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warp {
    pub x: u8,
    pub warp_map: u16,
    pub warp_x: u8,
    pub warp_y: u8,
    pub level: u8,
    pub door: Door,
}

/// Graphics entry within a layer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GfxCell {
    pub x: u8,
    pub tile: i16,
}

/// A readable sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sign {
    pub x: u8,
    pub y: u8,
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_spec_codes_are_positional() {
        for (i, spec) in NAMED_TILE_SPECS.iter().enumerate() {
            assert_eq!(spec.code() as usize, i);
            assert_eq!(TileSpec::from_code(i as u8), *spec);
        }
        assert_eq!(TileSpec::from_code(9), TileSpec::Chest);
        assert_eq!(TileSpec::from_code(36), TileSpec::Spikes3);
    }

    #[test]
    fn test_unrecognized_codes_are_preserved() {
        assert_eq!(TileSpec::from_code(200), TileSpec::Unrecognized(200));
        assert_eq!(TileSpec::Unrecognized(200).code(), 200);
        assert_eq!(MapType::from_code(7).code(), 7);
        assert_eq!(MapEffect::from_code(9), MapEffect::Unrecognized(9));
    }

    #[test]
    fn test_header_enum_codes() {
        assert_eq!(MapType::from_code(3), MapType::PK);
        assert_eq!(MapType::default().code(), 0);
        assert_eq!(MapEffect::from_code(2), MapEffect::TPDrain);
        assert_eq!(MapEffect::Quake.code(), 3);
    }

    #[test]
    fn test_door_states() {
        assert!(!Door::NONE.has_door());
        assert!(Door::UNLOCKED.has_door());
        assert_eq!(Door::UNLOCKED.key(), None);
        let door = Door::locked(12);
        assert_eq!(door.0, 13);
        assert_eq!(door.key(), Some(12));
    }

    #[test]
    fn test_layer_index_round_trip() {
        for (i, layer) in ALL_LAYERS.iter().enumerate() {
            assert_eq!(layer.index(), i);
            assert_eq!(GfxLayer::from_index(i), Some(*layer));
        }
        assert_eq!(GfxLayer::from_index(9), None);
    }
}
