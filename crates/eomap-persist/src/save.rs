use std::fs::File;
use std::io::Write;
use std::path::Path;

use crc32fast::Hasher;
use eomap_core::constants::{
    MAX_CHAR, MAX_INT, MAX_SHORT, MAX_THREE, NAME_LENGTH, STRING_TERMINATOR,
};
use eomap_core::number::encode;
use eomap_core::text::to_latin1;
use eomap_core::StringTransform;
use eomap_map::{Map, RowCell, Rows};

use crate::error::PersistError;
use crate::format::*;

/// Accumulates the output file and a CRC over everything after the checksum slot.
struct EmfWriter {
    out: Vec<u8>,
    hasher: Hasher,
}

impl EmfWriter {
    fn new() -> Self {
        let mut out = Vec::with_capacity(HEADER_SIZE + 64);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&[0; 4]);
        Self {
            out,
            hasher: Hasher::new(),
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.out.extend_from_slice(bytes);
    }

    /// Write `value` as an EO number `width` bytes wide, refusing values the
    /// field cannot hold.
    fn number(&mut self, field: &'static str, value: u32, width: usize) -> Result<(), PersistError> {
        check(field, value as usize, max_for_width(width))?;
        self.raw(&encode(value)[..width]);
        Ok(())
    }

    fn char(&mut self, field: &'static str, value: u8) -> Result<(), PersistError> {
        self.number(field, value as u32, 1)
    }

    fn short(&mut self, field: &'static str, value: u16) -> Result<(), PersistError> {
        self.number(field, value as u32, 2)
    }

    /// Write a 1-byte count.
    fn count(&mut self, field: &'static str, value: usize) -> Result<(), PersistError> {
        check(field, value, MAX_CHAR)?;
        self.number(field, value as u32, 1)
    }

    /// Patch the checksum slot and return the finished file.
    fn finish(mut self) -> Vec<u8> {
        let crc = self.hasher.finalize() | CHECKSUM_MASK;
        self.out[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 4].copy_from_slice(&crc.to_be_bytes());
        self.out
    }
}

fn max_for_width(width: usize) -> u32 {
    match width {
        1 => MAX_CHAR,
        2 => MAX_SHORT,
        3 => MAX_THREE,
        _ => MAX_INT,
    }
}

fn check(field: &'static str, value: usize, max: u32) -> Result<(), PersistError> {
    if value > max as usize {
        return Err(PersistError::FieldOverflow { field, value, max });
    }
    Ok(())
}

/// Serialize a map into the EMF binary format.
///
/// Always writes the newest layout: nine graphics layers and a sign section.
pub fn save(map: &Map, text: &dyn StringTransform) -> Result<Vec<u8>, PersistError> {
    if !map.is_loaded() {
        return Err(PersistError::NotLoaded);
    }

    let mut w = EmfWriter::new();

    let mut name = to_latin1(&map.name);
    name.resize(NAME_LENGTH, STRING_TERMINATOR);
    let mut name = text.encode(&name);
    name.resize(NAME_LENGTH, STRING_TERMINATOR);
    w.raw(&name);

    w.char("map type", map.map_type.code())?;
    w.char("effect", map.effect.code())?;
    w.char("music", map.music)?;
    w.char("music extra", map.music_extra)?;
    w.short("ambient noise", map.ambient_noise)?;
    w.char("width", map.width)?;
    w.char("height", map.height)?;
    w.short("fill tile", map.fill_tile)?;
    w.char("map available", map.map_available)?;
    w.char("can scroll", map.can_scroll)?;
    w.char("relog x", map.relog_x)?;
    w.char("relog y", map.relog_y)?;
    w.char("reserved", map.reserved)?;

    w.count("NPC spawn count", map.npcs.len())?;
    for npc in &map.npcs {
        w.char("NPC spawn x", npc.x)?;
        w.char("NPC spawn y", npc.y)?;
        w.short("NPC id", npc.npc_id)?;
        w.char("NPC spawn type", npc.spawn_type)?;
        w.short("NPC spawn time", npc.spawn_time)?;
        w.char("NPC amount", npc.amount)?;
    }

    w.count("unknown block count", map.unknowns.len())?;
    for block in &map.unknowns {
        for &b in &block.0 {
            w.char("unknown block byte", b)?;
        }
    }

    w.count("chest spawn count", map.chests.len())?;
    for chest in &map.chests {
        w.char("chest x", chest.x)?;
        w.char("chest y", chest.y)?;
        w.short("chest key", chest.key)?;
        w.char("chest slot", chest.slot)?;
        w.short("chest item", chest.item)?;
        w.short("chest time", chest.time)?;
        w.number("chest amount", chest.amount, 3)?;
    }

    write_rows(&mut w, &map.tile_specs, |w, cell| {
        w.char("tile spec x", cell.x)?;
        w.char("tile spec code", cell.spec.code())
    })?;

    write_rows(&mut w, &map.warps, |w, warp| {
        w.char("warp x", warp.x)?;
        w.short("warp map", warp.warp_map)?;
        w.char("warp destination x", warp.warp_x)?;
        w.char("warp destination y", warp.warp_y)?;
        w.char("warp level", warp.level)?;
        w.short("warp door", warp.door.0)
    })?;

    // Ids are stored by their u16 bit pattern, so 32768..=64008 read back as negative.
    for layer in &map.gfx {
        write_rows(&mut w, layer, |w, cell| {
            w.char("graphic x", cell.x)?;
            w.short("graphic id", cell.tile as u16)
        })?;
    }

    write_signs(&mut w, map, text)?;

    let bytes = w.finish();
    log::debug!("serialized map {:?} into {} bytes", map.name, bytes.len());
    Ok(bytes)
}

/// Serialize a map and write it to `path`.
///
/// The data goes to a temporary sibling first and is renamed into place, so
/// a failed write never leaves a partial file under the target name.
pub fn save_file(map: &Map, path: &Path, text: &dyn StringTransform) -> Result<(), PersistError> {
    let bytes = save(map, text)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()
    })();
    if let Err(e) = written {
        let _ = std::fs::remove_file(tmp_path);
        return Err(e.into());
    }

    if let Err(e) = std::fs::rename(tmp_path, path) {
        let _ = std::fs::remove_file(tmp_path);
        return Err(e.into());
    }
    log::info!("saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn write_rows<T, F>(w: &mut EmfWriter, rows: &Rows<T>, mut write_cell: F) -> Result<(), PersistError>
where
    T: RowCell,
    F: FnMut(&mut EmfWriter, &T) -> Result<(), PersistError>,
{
    w.count("row count", rows.rows().len())?;
    for row in rows.rows() {
        w.char("row y", row.y)?;
        w.count("cell count", row.cells.len())?;
        for cell in &row.cells {
            write_cell(w, cell)?;
        }
    }
    Ok(())
}

fn write_signs(
    w: &mut EmfWriter,
    map: &Map,
    text: &dyn StringTransform,
) -> Result<(), PersistError> {
    let mut records = Vec::with_capacity(map.signs.len());
    for sign in &map.signs {
        let title = to_latin1(&sign.title);
        let mut plain = title.clone();
        plain.extend_from_slice(&to_latin1(&sign.message));
        let payload = text.encode(&plain);

        // An empty payload cannot be read back: the reader takes no title byte after it.
        if payload.is_empty() {
            log::warn!("skipping sign at ({}, {}) with no text", sign.x, sign.y);
            continue;
        }
        check("sign text length", payload.len() + 1, MAX_SHORT)?;
        check("sign title length", title.len(), MAX_CHAR)?;
        records.push((sign, payload, title.len()));
    }

    w.count("sign count", records.len())?;
    for (sign, payload, title_len) in records {
        w.char("sign x", sign.x)?;
        w.char("sign y", sign.y)?;
        w.number("sign text length", payload.len() as u32 + 1, 2)?;
        w.raw(&payload);
        w.number("sign title length", title_len as u32, 1)?;
    }
    Ok(())
}
