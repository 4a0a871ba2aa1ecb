use std::path::Path;

use eomap_core::constants::{GFX_LAYER_COUNT, NAME_LENGTH, STRING_TERMINATOR};
use eomap_core::number::{decode_char, decode_int, decode_short, decode_three};
use eomap_core::text::from_latin1;
use eomap_core::{
    ChestSpawn, Door, GfxCell, MapEffect, MapType, NpcSpawn, Sign, StringTransform, TileSpec,
    TileSpecCell, UnknownBlock, Warp,
};
use eomap_map::{Map, Row, RowCell, Rows};

use crate::compat;
use crate::error::PersistError;
use crate::format::*;
use crate::source::ByteSource;

/// A successfully parsed EMF file.
#[derive(Debug)]
pub struct MapData {
    pub map: Map,
    /// Which optional trailing sections the file had.
    pub vintage: FormatVintage,
    /// Non-fatal oddities (old format, dropped empty signs, trailing bytes).
    pub warnings: Vec<String>,
}

/// Parse an EMF file held in memory.
///
/// Either every section parses and a loaded map is returned, or nothing is.
pub fn load(bytes: &[u8], text: &dyn StringTransform) -> Result<MapData, PersistError> {
    let mut src = ByteSource::new(bytes);
    let mut map = Map::new();
    let mut warnings = Vec::new();

    read_header(&mut src, &mut map, text)?;

    src.enter(Section::NpcSpawns);
    map.npcs = read_npcs(&mut src)?;
    src.enter(Section::Unknowns);
    map.unknowns = read_unknowns(&mut src)?;
    src.enter(Section::ChestSpawns);
    map.chests = read_chests(&mut src)?;

    src.enter(Section::TileSpecs);
    let count = src.char()?;
    map.tile_specs = read_rows(&mut src, count, TILE_SPEC_CELL_SIZE, |c| TileSpecCell {
        x: decode_char(c[0]),
        spec: TileSpec::from_code(decode_char(c[1])),
    })?;

    src.enter(Section::Warps);
    let count = src.char()?;
    map.warps = read_rows(&mut src, count, WARP_CELL_SIZE, |c| Warp {
        x: decode_char(c[0]),
        warp_map: decode_short(c[1], c[2]),
        warp_x: decode_char(c[3]),
        warp_y: decode_char(c[4]),
        level: decode_char(c[5]),
        door: Door(decode_short(c[6], c[7])),
    })?;

    let mut layer_8_present = true;
    for layer in 0..GFX_LAYER_COUNT {
        src.enter(Section::GfxLayer(layer as u8));
        let count = if layer == GFX_LAYER_COUNT - 1 {
            match src.try_char()? {
                Some(count) => count,
                None => {
                    layer_8_present = false;
                    0
                }
            }
        } else {
            src.char()?
        };
        map.gfx[layer] = read_rows(&mut src, count, GFX_CELL_SIZE, |c| GfxCell {
            x: decode_char(c[0]),
            tile: decode_short(c[1], c[2]) as i16,
        })?;
    }

    src.enter(Section::Signs);
    let signs_present = match src.try_char()? {
        Some(count) => {
            let (signs, skipped) = read_signs(&mut src, count, text)?;
            if skipped > 0 {
                log::warn!("dropped {skipped} sign slot(s) with empty text");
                warnings.push(format!(
                    "{skipped} of {count} sign slot(s) had empty text and were dropped."
                ));
            }
            map.signs = signs;
            true
        }
        None => false,
    };

    if !src.is_exhausted() {
        log::warn!(
            "{} trailing byte(s) after sign section at offset {}",
            src.remaining(),
            src.position()
        );
        warnings.push(format!(
            "{} unrecognised trailing byte(s) will not be preserved.",
            src.remaining()
        ));
    }

    let vintage = compat::classify(layer_8_present, signs_present);
    warnings.extend(compat::vintage_warnings(vintage));

    log::debug!(
        "loaded {:?} map {}x{}: {} npcs, {} chests, {} tile specs, {} warps, {} signs",
        vintage,
        map.width,
        map.height,
        map.npcs.len(),
        map.chests.len(),
        map.tile_specs.cell_count(),
        map.warps.cell_count(),
        map.signs.len()
    );

    map.mark_loaded();
    Ok(MapData {
        map,
        vintage,
        warnings,
    })
}

/// Read and parse an EMF file from disk.
pub fn load_file(path: &Path, text: &dyn StringTransform) -> Result<MapData, PersistError> {
    let bytes = std::fs::read(path)?;
    log::info!("loading {} ({} bytes)", path.display(), bytes.len());
    load(&bytes, text)
}

fn read_header(
    src: &mut ByteSource<'_>,
    map: &mut Map,
    text: &dyn StringTransform,
) -> Result<(), PersistError> {
    src.enter(Section::Header);
    let h = src.read(HEADER_SIZE)?;
    compat::validate_magic(h)?;

    // The revision is the checksum stamped by the last save. It is not verified.
    map.revision = decode_int(h[0x03], h[0x04], h[0x05], h[0x06]);

    let mut name = text.decode(&h[NAME_OFFSET..NAME_OFFSET + NAME_LENGTH]);
    if let Some(end) = name.iter().position(|&b| b == STRING_TERMINATOR) {
        name.truncate(end);
    }
    map.name = from_latin1(&name);

    let f = &h[FIELDS_OFFSET..];
    map.map_type = MapType::from_code(decode_char(f[0]));
    map.effect = MapEffect::from_code(decode_char(f[1]));
    map.music = decode_char(f[2]);
    map.music_extra = decode_char(f[3]);
    map.ambient_noise = decode_short(f[4], f[5]);
    map.width = decode_char(f[6]);
    map.height = decode_char(f[7]);
    map.fill_tile = decode_short(f[8], f[9]);
    map.map_available = decode_char(f[10]);
    map.can_scroll = decode_char(f[11]);
    map.relog_x = decode_char(f[12]);
    map.relog_y = decode_char(f[13]);
    map.reserved = decode_char(f[14]);
    Ok(())
}

fn read_npcs(src: &mut ByteSource<'_>) -> Result<Vec<NpcSpawn>, PersistError> {
    let count = src.char()? as usize;
    let block = src.read(count * NPC_RECORD_SIZE)?;
    Ok(block
        .chunks_exact(NPC_RECORD_SIZE)
        .map(|r| NpcSpawn {
            x: decode_char(r[0]),
            y: decode_char(r[1]),
            npc_id: decode_short(r[2], r[3]),
            spawn_type: decode_char(r[4]),
            spawn_time: decode_short(r[5], r[6]),
            amount: decode_char(r[7]),
        })
        .collect())
}

fn read_unknowns(src: &mut ByteSource<'_>) -> Result<Vec<UnknownBlock>, PersistError> {
    let count = src.char()? as usize;
    let block = src.read(count * UNKNOWN_RECORD_SIZE)?;
    Ok(block
        .chunks_exact(UNKNOWN_RECORD_SIZE)
        .map(|r| {
            UnknownBlock([
                decode_char(r[0]),
                decode_char(r[1]),
                decode_char(r[2]),
                decode_char(r[3]),
            ])
        })
        .collect())
}

fn read_chests(src: &mut ByteSource<'_>) -> Result<Vec<ChestSpawn>, PersistError> {
    let count = src.char()? as usize;
    let block = src.read(count * CHEST_RECORD_SIZE)?;
    Ok(block
        .chunks_exact(CHEST_RECORD_SIZE)
        .map(|r| ChestSpawn {
            x: decode_char(r[0]),
            y: decode_char(r[1]),
            key: decode_short(r[2], r[3]),
            slot: decode_char(r[4]),
            item: decode_short(r[5], r[6]),
            time: decode_short(r[7], r[8]),
            amount: decode_three(r[9], r[10], r[11]),
        })
        .collect())
}

/// Read `row_count` rows of `(y, cell_count, cells)`.
fn read_rows<T, F>(
    src: &mut ByteSource<'_>,
    row_count: u8,
    cell_size: usize,
    decode: F,
) -> Result<Rows<T>, PersistError>
where
    T: RowCell,
    F: Fn(&[u8]) -> T,
{
    let mut rows = Rows::new();
    for _ in 0..row_count {
        let head = src.read(ROW_HEADER_SIZE)?;
        let y = decode_char(head[0]);
        let cell_count = decode_char(head[1]) as usize;
        let block = src.read(cell_count * cell_size)?;
        rows.push_row(Row {
            y,
            cells: block.chunks_exact(cell_size).map(&decode).collect(),
        });
    }
    Ok(rows)
}

/// Read the sign records. Returns the signs and how many slots were skipped
/// for having an empty payload.
fn read_signs(
    src: &mut ByteSource<'_>,
    count: u8,
    text: &dyn StringTransform,
) -> Result<(Vec<Sign>, usize), PersistError> {
    let mut signs = Vec::with_capacity(count as usize);
    let mut skipped = 0;

    for _ in 0..count {
        let offset = src.position();
        let head = src.read(SIGN_HEADER_SIZE)?;
        let x = decode_char(head[0]);
        let y = decode_char(head[1]);
        // The stored length counts one byte more than the payload.
        let len = decode_short(head[2], head[3]) as usize;
        if len == 0 {
            return Err(PersistError::InvalidSignLength { offset });
        }
        let raw = src.read(len - 1)?;
        let decoded = text.decode(raw);

        // No title length follows an empty payload.
        if decoded.is_empty() {
            skipped += 1;
            continue;
        }

        let title_len = (src.char()? as usize).min(decoded.len());
        let (title, message) = decoded.split_at(title_len);
        signs.push(Sign {
            x,
            y,
            title: from_latin1(title),
            message: from_latin1(message),
        });
    }

    Ok((signs, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eomap_core::number::encode;
    use eomap_core::{GfxLayer, PlainText};

    /// Header with an empty name, every field 0 except width/height.
    fn header(width: u8, height: u8) -> Vec<u8> {
        let mut out = b"EMF".to_vec();
        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&[0xFF; 24]);
        out.extend_from_slice(&[1, 1, 1, 1, 1, 1]);
        out.push(encode(width as u32)[0]);
        out.push(encode(height as u32)[0]);
        out.extend_from_slice(&[1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(out.len(), HEADER_SIZE);
        out
    }

    /// Minimal file ending right after graphics layer 7.
    fn eight_layer_file() -> Vec<u8> {
        let mut out = header(0, 0);
        // npcs, unknowns, chests, tile rows, warp rows, layers 0..=7
        out.extend_from_slice(&[1; 5 + 8]);
        out
    }

    #[test]
    fn test_minimal_old_file_loads() {
        let data = load(&eight_layer_file(), &PlainText).expect("load should succeed");
        let map = &data.map;
        assert!(map.is_loaded());
        assert_eq!(map.width, 0);
        assert_eq!(map.height, 0);
        assert_eq!(map.name, "");
        assert_eq!(map.map_type, MapType::Default);
        assert!(map.npcs.is_empty());
        assert!(map.chests.is_empty());
        assert!(map.gfx.iter().all(|l| l.is_empty()));
        assert!(map.signs.is_empty());
        assert_eq!(data.vintage, FormatVintage::EightLayers);
    }

    #[test]
    fn test_layer_8_without_signs() {
        let mut file = eight_layer_file();
        // layer 8: one row at y=2 with one cell x=3 tile=300
        file.extend_from_slice(&[1 + 1, 2 + 1, 1 + 1, 3 + 1]);
        file.extend_from_slice(&encode(300)[..2]);

        let data = load(&file, &PlainText).expect("load should succeed");
        assert_eq!(data.vintage, FormatVintage::NineLayers);
        assert_eq!(data.map.gfx(GfxLayer::Overlay2, 3, 2), Some(300));
        assert!(data.map.signs.is_empty());
    }

    #[test]
    fn test_truncated_layer_8_rows_fail() {
        let mut file = eight_layer_file();
        // layer 8 claims one row, then the row header is cut short
        file.extend_from_slice(&[2, 3]);
        let err = load(&file, &PlainText).expect_err("should fail");
        assert!(err.is_format_error());
        assert!(matches!(
            err,
            PersistError::Truncated {
                section: Section::GfxLayer(8),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_mandatory_layer_fails() {
        let mut file = eight_layer_file();
        file.pop();
        let err = load(&file, &PlainText).expect_err("should fail");
        assert!(matches!(
            err,
            PersistError::Truncated {
                section: Section::GfxLayer(7),
                ..
            }
        ));
    }

    #[test]
    fn test_sign_title_split() {
        let mut file = eight_layer_file();
        file.push(1); // layer 8: no rows
        file.push(2); // one sign
        let payload = b"TitleMessage";
        file.extend_from_slice(&[4 + 1, 6 + 1]);
        file.extend_from_slice(&encode(payload.len() as u32 + 1)[..2]);
        file.extend_from_slice(payload);
        file.push(5 + 1);

        let data = load(&file, &PlainText).expect("load should succeed");
        assert_eq!(data.vintage, FormatVintage::WithSigns);
        let sign = data.map.sign(4, 6).expect("sign should exist");
        assert_eq!(sign.title, "Title");
        assert_eq!(sign.message, "Message");
        assert!(data.warnings.is_empty());
    }

    #[test]
    fn test_empty_sign_slot_dropped_without_title_byte() {
        let mut file = eight_layer_file();
        file.push(1); // layer 8
        file.push(3); // two sign slots
        // slot 1: length 1 => empty payload, no title byte follows
        file.extend_from_slice(&[1, 1, 2, 254]);
        // slot 2: "ab" with title "a"
        file.extend_from_slice(&[2, 2, 4, 254]);
        file.extend_from_slice(b"ab");
        file.push(2);

        let data = load(&file, &PlainText).expect("load should succeed");
        assert_eq!(data.map.signs.len(), 1);
        assert_eq!(data.map.signs[0].title, "a");
        assert_eq!(data.map.signs[0].message, "b");
        assert_eq!(data.warnings.len(), 1);
    }

    #[test]
    fn test_zero_sign_length_rejected() {
        let mut file = eight_layer_file();
        file.push(1); // layer 8
        file.push(2); // one sign
        let sign_offset = file.len();
        file.extend_from_slice(&[1, 1, 0, 0]);

        let err = load(&file, &PlainText).expect_err("should fail");
        assert!(err.is_format_error());
        assert!(matches!(
            err,
            PersistError::InvalidSignLength { offset } if offset == sign_offset
        ));
    }

    #[test]
    fn test_title_length_clamped_to_payload() {
        let mut file = eight_layer_file();
        file.push(1); // layer 8
        file.push(2); // one sign
        file.extend_from_slice(&[3, 3, 4, 254]); // payload "Hi"
        file.extend_from_slice(b"Hi");
        file.push(10 + 1); // title length 10, longer than the payload

        let data = load(&file, &PlainText).expect("load should succeed");
        let sign = data.map.sign(2, 2).expect("sign should exist");
        assert_eq!(sign.title, "Hi");
        assert_eq!(sign.message, "");
    }

    #[test]
    fn test_truncated_sign_fails() {
        let mut file = eight_layer_file();
        file.push(1);
        file.push(2); // one sign, then nothing
        let err = load(&file, &PlainText).expect_err("should fail");
        assert!(matches!(
            err,
            PersistError::Truncated {
                section: Section::Signs,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut file = eight_layer_file();
        file[0] = b'X';
        assert!(matches!(
            load(&file, &PlainText),
            Err(PersistError::InvalidMagic)
        ));
    }

    #[test]
    fn test_short_header_is_truncation() {
        let err = load(b"EMF", &PlainText).expect_err("should fail");
        assert!(matches!(
            err,
            PersistError::Truncated {
                section: Section::Header,
                needed: HEADER_SIZE,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_header_fields_decoded() {
        let mut file = eight_layer_file();
        file[0x03..0x07].copy_from_slice(&encode(70_000));
        file[NAME_OFFSET..NAME_OFFSET + 4].copy_from_slice(b"Aeve");
        file[FIELDS_OFFSET] = 3 + 1;
        file[FIELDS_OFFSET + 1] = 1 + 1;
        file[FIELDS_OFFSET + 4..FIELDS_OFFSET + 6].copy_from_slice(&encode(1000)[..2]);
        file[FIELDS_OFFSET + 8..FIELDS_OFFSET + 10].copy_from_slice(&encode(42)[..2]);

        let map = load(&file, &PlainText).expect("load should succeed").map;
        assert_eq!(map.revision, 70_000);
        assert_eq!(map.name, "Aeve");
        assert_eq!(map.map_type, MapType::PK);
        assert_eq!(map.effect, MapEffect::HPDrain);
        assert_eq!(map.ambient_noise, 1000);
        assert_eq!(map.fill_tile, 42);
    }

    #[test]
    fn test_trailing_bytes_warn() {
        let mut file = eight_layer_file();
        file.push(1); // layer 8
        file.push(1); // zero signs
        file.push(9);
        let data = load(&file, &PlainText).expect("load should succeed");
        assert_eq!(data.vintage, FormatVintage::WithSigns);
        assert!(data.warnings[0].contains("trailing"));
    }
}
