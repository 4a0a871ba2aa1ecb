use serde::Serialize;

use crate::map::Map;

/// Number of entities of each kind removed by a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CleanupReport {
    pub npcs: usize,
    pub chests: usize,
    pub tile_specs: usize,
    pub warps: usize,
    pub gfx: usize,
    pub signs: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.npcs + self.chests + self.tile_specs + self.warps + self.gfx + self.signs
    }
}

impl Map {
    /// Remove every entity lying outside the current width/height.
    ///
    /// Idempotent. Rows left without cells are dropped.
    pub fn cleanup(&mut self) -> CleanupReport {
        let (width, height) = (self.width, self.height);
        let inside = |x: u8, y: u8| x <= width && y <= height;

        let mut report = CleanupReport::default();

        let before = self.npcs.len();
        self.npcs.retain(|n| inside(n.x, n.y));
        report.npcs = before - self.npcs.len();

        let before = self.chests.len();
        self.chests.retain(|c| inside(c.x, c.y));
        report.chests = before - self.chests.len();

        report.tile_specs = self.tile_specs.retain_in_bounds(width, height);
        report.warps = self.warps.retain_in_bounds(width, height);
        report.gfx = self
            .gfx
            .iter_mut()
            .map(|layer| layer.retain_in_bounds(width, height))
            .sum();

        let before = self.signs.len();
        self.signs.retain(|s| inside(s.x, s.y));
        report.signs = before - self.signs.len();

        if report.total() > 0 {
            log::debug!(
                "cleanup to {}x{} removed {} entities: {:?}",
                width,
                height,
                report.total(),
                report
            );
        }

        report
    }

    /// Resize the map and drop whatever no longer fits.
    pub fn set_dimensions(&mut self, width: u8, height: u8) -> CleanupReport {
        self.width = width;
        self.height = height;
        self.cleanup()
    }
}
