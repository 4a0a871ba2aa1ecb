use eomap_core::types::ALL_LAYERS;
use eomap_core::{MapEffect, MapType};
use eomap_map::Map;
use eomap_persist::MapData;
use serde::Serialize;

/// Entity counts and header values printed by `emf-tool info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub name: String,
    pub revision: u32,
    pub vintage: String,
    pub map_type: MapType,
    pub effect: MapEffect,
    pub width: u8,
    pub height: u8,
    pub fill_tile: u16,
    pub npc_spawns: usize,
    pub chest_spawns: usize,
    pub unknown_blocks: usize,
    pub tile_specs: usize,
    pub warps: usize,
    pub doors: usize,
    pub signs: usize,
    /// Cell count per graphics layer, indexed by layer number.
    pub gfx_cells: Vec<usize>,
    pub warnings: Vec<String>,
}

impl MapSummary {
    pub fn new(data: &MapData) -> Self {
        let map = &data.map;
        Self {
            name: map.name.clone(),
            revision: map.revision,
            vintage: format!("{:?}", data.vintage),
            map_type: map.map_type,
            effect: map.effect,
            width: map.width,
            height: map.height,
            fill_tile: map.fill_tile,
            npc_spawns: map.npcs.len(),
            chest_spawns: map.chests.len(),
            unknown_blocks: map.unknowns.len(),
            tile_specs: map.tile_specs.cell_count(),
            warps: map.warps.cell_count(),
            doors: count_doors(map),
            signs: map.signs.len(),
            gfx_cells: ALL_LAYERS
                .iter()
                .map(|&layer| map.layer(layer).cell_count())
                .collect(),
            warnings: data.warnings.clone(),
        }
    }
}

fn count_doors(map: &Map) -> usize {
    map.warps.iter().filter(|(_, w)| w.door.has_door()).count()
}

pub fn summary_json(data: &MapData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&MapSummary::new(data))
}

pub fn dump_json(map: &Map) -> serde_json::Result<String> {
    serde_json::to_string_pretty(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eomap_core::{Door, GfxLayer, PlainText, Warp};

    fn warp(x: u8, door: Door) -> Warp {
        Warp {
            x,
            warp_map: 2,
            warp_x: 0,
            warp_y: 0,
            level: 0,
            door,
        }
    }

    fn loaded(map: &Map) -> MapData {
        let bytes = eomap_persist::save(map, &PlainText).expect("save should succeed");
        eomap_persist::load(&bytes, &PlainText).expect("load should succeed")
    }

    #[test]
    fn test_summary_counts() {
        let mut map = Map::blank(10, 10);
        map.name = "Vault".to_string();
        map.set_warp(1, warp(1, Door::UNLOCKED));
        map.set_warp(2, warp(1, Door::NONE));
        map.set_gfx(GfxLayer::DownWall, 3, 3, 7);
        map.set_sign(4, 4, "A", "B");

        let summary = MapSummary::new(&loaded(&map));
        assert_eq!(summary.name, "Vault");
        assert_eq!(summary.vintage, "WithSigns");
        assert_eq!(summary.warps, 2);
        assert_eq!(summary.doors, 1);
        assert_eq!(summary.signs, 1);
        assert_eq!(summary.gfx_cells.len(), 9);
        assert_eq!(summary.gfx_cells[GfxLayer::DownWall.index()], 1);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_json_output() {
        let data = loaded(&Map::blank(2, 2));
        let json = summary_json(&data).expect("serialize summary");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["width"], 2);
        assert_eq!(value["map_type"], "Default");

        let dump = dump_json(&data.map).expect("serialize map");
        let value: serde_json::Value = serde_json::from_str(&dump).expect("valid JSON");
        assert!(value["gfx"].is_array());
        assert!(value.get("loaded").is_none());
    }
}
