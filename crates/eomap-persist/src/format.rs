use std::fmt;

/// Magic bytes identifying an EMF file.
pub const MAGIC: [u8; 3] = *b"EMF";

/// Size of the fixed header, magic included.
pub const HEADER_SIZE: usize = 0x2E;

/// Offset of the 4-byte checksum written on save.
pub const CHECKSUM_OFFSET: usize = 0x03;

/// OR-ed into the checksum so none of its bytes is zero.
pub const CHECKSUM_MASK: u32 = 0x0101_0101;

/// Offset of the 24-byte name field.
pub const NAME_OFFSET: usize = 0x07;

/// Offset of the first 1-byte field after the name (map type).
pub const FIELDS_OFFSET: usize = 0x1F;

pub const NPC_RECORD_SIZE: usize = 8;
pub const UNKNOWN_RECORD_SIZE: usize = 4;
pub const CHEST_RECORD_SIZE: usize = 12;
pub const TILE_SPEC_CELL_SIZE: usize = 2;
pub const WARP_CELL_SIZE: usize = 8;
pub const GFX_CELL_SIZE: usize = 3;

/// Size of a row header: y, cell count.
pub const ROW_HEADER_SIZE: usize = 2;

/// Size of a sign header: x, y, 2-byte payload length.
pub const SIGN_HEADER_SIZE: usize = 4;

/// File section being read, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    NpcSpawns,
    Unknowns,
    ChestSpawns,
    TileSpecs,
    Warps,
    GfxLayer(u8),
    Signs,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => write!(f, "header"),
            Section::NpcSpawns => write!(f, "NPC spawns"),
            Section::Unknowns => write!(f, "unknown blocks"),
            Section::ChestSpawns => write!(f, "chest spawns"),
            Section::TileSpecs => write!(f, "tile specs"),
            Section::Warps => write!(f, "warps"),
            Section::GfxLayer(layer) => write!(f, "graphics layer {layer}"),
            Section::Signs => write!(f, "signs"),
        }
    }
}

/// Which generation of the format a file belongs to, judged by where it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVintage {
    /// Ends after graphics layer 7: no layer 8, no signs.
    EightLayers,
    /// Has all nine graphics layers but no sign section.
    NineLayers,
    /// Has the sign section (possibly with zero signs).
    WithSigns,
}

impl FormatVintage {
    pub fn has_layer_8(self) -> bool {
        !matches!(self, FormatVintage::EightLayers)
    }

    pub fn has_signs(self) -> bool {
        matches!(self, FormatVintage::WithSigns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        // magic + checksum + name + 15 single/double-byte fields
        assert_eq!(NAME_OFFSET, MAGIC.len() + 4);
        assert_eq!(FIELDS_OFFSET, NAME_OFFSET + 24);
        assert_eq!(HEADER_SIZE, FIELDS_OFFSET + 15);
    }

    #[test]
    fn test_vintage_flags() {
        assert!(!FormatVintage::EightLayers.has_layer_8());
        assert!(FormatVintage::NineLayers.has_layer_8());
        assert!(!FormatVintage::NineLayers.has_signs());
        assert!(FormatVintage::WithSigns.has_signs());
    }
}
