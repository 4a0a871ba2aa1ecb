use eomap_core::constants::GFX_LAYER_COUNT;
use eomap_core::{
    ChestSpawn, GfxCell, GfxLayer, MapEffect, MapType, NpcSpawn, Sign, TileSpec, TileSpecCell,
    UnknownBlock, Warp,
};
use serde::Serialize;

use crate::rows::Rows;

/// An EMF map: header fields plus every entity collection.
///
/// Width and height are the largest valid x and y, so a map spans
/// `(width + 1) x (height + 1)` tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Map {
    /// Decoded from the checksum bytes of the file this map was read from.
    /// Saving stamps a new checksum in its place.
    pub revision: u32,
    pub name: String,
    pub map_type: MapType,
    pub effect: MapEffect,
    pub music: u8,
    pub music_extra: u8,
    pub ambient_noise: u16,
    pub width: u8,
    pub height: u8,
    /// Ground graphic drawn wherever layer 0 has no entry.
    pub fill_tile: u16,
    pub map_available: u8,
    pub can_scroll: u8,
    pub relog_x: u8,
    pub relog_y: u8,
    pub reserved: u8,

    pub npcs: Vec<NpcSpawn>,
    pub unknowns: Vec<UnknownBlock>,
    pub chests: Vec<ChestSpawn>,
    pub tile_specs: Rows<TileSpecCell>,
    pub warps: Rows<Warp>,
    pub gfx: [Rows<GfxCell>; GFX_LAYER_COUNT],
    pub signs: Vec<Sign>,

    #[serde(skip)]
    loaded: bool,
}

/// What `Map::erase_special_at` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErasedSpecial {
    TileSpec(TileSpec),
    Warp(Warp),
    Sign(Sign),
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    /// A map with default header values and no content. Not loaded, so it
    /// cannot be saved until populated by a reader or created via `blank`.
    pub fn new() -> Self {
        Self {
            revision: 0,
            name: String::new(),
            map_type: MapType::Default,
            effect: MapEffect::None,
            music: 0,
            music_extra: 0,
            ambient_noise: 0,
            width: 0,
            height: 0,
            fill_tile: 0,
            map_available: 1,
            can_scroll: 1,
            relog_x: 0,
            relog_y: 0,
            reserved: 0,
            npcs: Vec::new(),
            unknowns: Vec::new(),
            chests: Vec::new(),
            tile_specs: Rows::new(),
            warps: Rows::new(),
            gfx: std::array::from_fn(|_| Rows::new()),
            signs: Vec::new(),
            loaded: false,
        }
    }

    /// A new, empty map of the given size, ready to edit and save.
    pub fn blank(width: u8, height: u8) -> Self {
        let mut map = Self::new();
        map.width = width;
        map.height = height;
        map.loaded = true;
        map
    }

    /// Whether this map came from a complete read or from `blank`.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Called by a reader once every section has been parsed.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn in_bounds(&self, x: u8, y: u8) -> bool {
        x <= self.width && y <= self.height
    }

    pub fn layer(&self, layer: GfxLayer) -> &Rows<GfxCell> {
        &self.gfx[layer.index()]
    }

    pub fn layer_mut(&mut self, layer: GfxLayer) -> &mut Rows<GfxCell> {
        &mut self.gfx[layer.index()]
    }

    pub fn gfx(&self, layer: GfxLayer, x: u8, y: u8) -> Option<i16> {
        self.layer(layer).get(x, y).map(|c| c.tile)
    }

    pub fn set_gfx(&mut self, layer: GfxLayer, x: u8, y: u8, tile: i16) {
        self.layer_mut(layer).insert(y, GfxCell { x, tile });
    }

    pub fn remove_gfx(&mut self, layer: GfxLayer, x: u8, y: u8) -> Option<i16> {
        self.layer_mut(layer).remove(x, y).map(|c| c.tile)
    }

    pub fn tile_spec(&self, x: u8, y: u8) -> Option<TileSpec> {
        self.tile_specs.get(x, y).map(|c| c.spec)
    }

    pub fn set_tile_spec(&mut self, x: u8, y: u8, spec: TileSpec) {
        self.tile_specs.insert(y, TileSpecCell { x, spec });
    }

    pub fn remove_tile_spec(&mut self, x: u8, y: u8) -> Option<TileSpec> {
        self.tile_specs.remove(x, y).map(|c| c.spec)
    }

    pub fn warp(&self, x: u8, y: u8) -> Option<&Warp> {
        self.warps.get(x, y)
    }

    pub fn warp_mut(&mut self, x: u8, y: u8) -> Option<&mut Warp> {
        self.warps.get_mut(x, y)
    }

    /// Place `warp` at `(warp.x, y)`, replacing any warp already there.
    pub fn set_warp(&mut self, y: u8, warp: Warp) -> Option<Warp> {
        self.warps.insert(y, warp)
    }

    pub fn remove_warp(&mut self, x: u8, y: u8) -> Option<Warp> {
        self.warps.remove(x, y)
    }

    pub fn sign(&self, x: u8, y: u8) -> Option<&Sign> {
        self.signs.iter().find(|s| s.x == x && s.y == y)
    }

    /// Replace the sign at `(x, y)` in place, or append a new one.
    pub fn set_sign(&mut self, x: u8, y: u8, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        match self.signs.iter_mut().find(|s| s.x == x && s.y == y) {
            Some(sign) => {
                sign.title = title;
                sign.message = message;
            }
            None => self.signs.push(Sign {
                x,
                y,
                title,
                message,
            }),
        }
    }

    pub fn remove_sign(&mut self, x: u8, y: u8) -> Option<Sign> {
        let idx = self.signs.iter().position(|s| s.x == x && s.y == y)?;
        Some(self.signs.remove(idx))
    }

    /// Every NPC spawn at `(x, y)`, in insertion order.
    pub fn npc_spawns_at(&self, x: u8, y: u8) -> impl Iterator<Item = &NpcSpawn> + '_ {
        self.npcs.iter().filter(move |n| n.x == x && n.y == y)
    }

    /// First spawn equal to `spawn` in every field.
    pub fn find_npc_spawn(&mut self, spawn: &NpcSpawn) -> Option<&mut NpcSpawn> {
        self.npcs.iter_mut().find(|n| *n == spawn)
    }

    pub fn push_npc_spawn(&mut self, spawn: NpcSpawn) {
        self.npcs.push(spawn);
    }

    /// Remove one spawn equal to `spawn` in every field.
    pub fn remove_npc_spawn(&mut self, spawn: &NpcSpawn) -> bool {
        match self.npcs.iter().position(|n| n == spawn) {
            Some(idx) => {
                self.npcs.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Every chest spawn at `(x, y)`, in insertion order.
    pub fn chest_spawns_at(&self, x: u8, y: u8) -> impl Iterator<Item = &ChestSpawn> + '_ {
        self.chests.iter().filter(move |c| c.x == x && c.y == y)
    }

    pub fn find_chest_spawn(&mut self, spawn: &ChestSpawn) -> Option<&mut ChestSpawn> {
        self.chests.iter_mut().find(|c| *c == spawn)
    }

    pub fn push_chest_spawn(&mut self, spawn: ChestSpawn) {
        self.chests.push(spawn);
    }

    pub fn remove_chest_spawn(&mut self, spawn: &ChestSpawn) -> bool {
        match self.chests.iter().position(|c| c == spawn) {
            Some(idx) => {
                self.chests.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether any entity of any kind occupies `(x, y)`.
    pub fn has_anything_at(&self, x: u8, y: u8) -> bool {
        self.npcs.iter().any(|n| n.x == x && n.y == y)
            || self.chests.iter().any(|c| c.x == x && c.y == y)
            || self.tile_specs.contains(x, y)
            || self.warps.contains(x, y)
            || self.gfx.iter().any(|layer| layer.contains(x, y))
            || self.sign(x, y).is_some()
    }

    /// Graphic on the Object layer at `(x, y)`.
    pub fn object_at(&self, x: u8, y: u8) -> Option<i16> {
        self.gfx(GfxLayer::Object, x, y)
    }

    /// Remove the tile spec at `(x, y)`; failing that the warp, failing that the sign.
    pub fn erase_special_at(&mut self, x: u8, y: u8) -> Option<ErasedSpecial> {
        if let Some(spec) = self.remove_tile_spec(x, y) {
            return Some(ErasedSpecial::TileSpec(spec));
        }
        if let Some(warp) = self.remove_warp(x, y) {
            return Some(ErasedSpecial::Warp(warp));
        }
        self.remove_sign(x, y).map(ErasedSpecial::Sign)
    }
}
