use eomap_core::{GfxCell, TileSpecCell, Warp};
use serde::Serialize;

/// A value that lives at some x within a row.
pub trait RowCell {
    fn x(&self) -> u8;
}

impl RowCell for TileSpecCell {
    fn x(&self) -> u8 {
        self.x
    }
}

impl RowCell for Warp {
    fn x(&self) -> u8 {
        self.x
    }
}

impl RowCell for GfxCell {
    fn x(&self) -> u8 {
        self.x
    }
}

/// All cells sharing one y coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row<T> {
    pub y: u8,
    pub cells: Vec<T>,
}

/// Sparse row/cell store used by the tile spec, warp and graphics sections.
///
/// Rows keep the order they were loaded or created in so that an unmodified
/// map re-saves byte for byte. Each y appears in at most one row and each x at
/// most once within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rows<T> {
    rows: Vec<Row<T>>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: RowCell> Rows<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row as read from a file. The caller guarantees `y` is not present yet.
    pub fn push_row(&mut self, row: Row<T>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn row(&self, y: u8) -> Option<&Row<T>> {
        self.rows.iter().find(|r| r.y == y)
    }

    pub fn get(&self, x: u8, y: u8) -> Option<&T> {
        self.row(y)?.cells.iter().find(|c| c.x() == x)
    }

    pub fn get_mut(&mut self, x: u8, y: u8) -> Option<&mut T> {
        self.rows
            .iter_mut()
            .find(|r| r.y == y)?
            .cells
            .iter_mut()
            .find(|c| c.x() == x)
    }

    pub fn contains(&self, x: u8, y: u8) -> bool {
        self.get(x, y).is_some()
    }

    /// Put `cell` at `(cell.x(), y)`. Returns the cell it replaced, if any.
    ///
    /// A missing row is appended; a new cell is appended to its row.
    pub fn insert(&mut self, y: u8, cell: T) -> Option<T> {
        let x = cell.x();
        let Some(row_idx) = self.rows.iter().position(|r| r.y == y) else {
            self.rows.push(Row {
                y,
                cells: vec![cell],
            });
            return None;
        };

        let row = &mut self.rows[row_idx];
        match row.cells.iter_mut().find(|c| c.x() == x) {
            Some(existing) => Some(std::mem::replace(existing, cell)),
            None => {
                row.cells.push(cell);
                None
            }
        }
    }

    /// Remove the cell at `(x, y)`. A row left without cells is dropped.
    pub fn remove(&mut self, x: u8, y: u8) -> Option<T> {
        let row_idx = self.rows.iter().position(|r| r.y == y)?;
        let row = &mut self.rows[row_idx];
        let cell_idx = row.cells.iter().position(|c| c.x() == x)?;
        let cell = row.cells.remove(cell_idx);
        if row.cells.is_empty() {
            self.rows.remove(row_idx);
        }
        Some(cell)
    }

    /// Iterate every cell together with its row's y.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> + '_ {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().map(move |c| (r.y, c)))
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Drop every cell with x > `width` or y > `height`, and any row left empty.
    /// Returns the number of cells removed.
    pub fn retain_in_bounds(&mut self, width: u8, height: u8) -> usize {
        let before = self.cell_count();
        self.rows.retain_mut(|row| {
            if row.y > height {
                return false;
            }
            row.cells.retain(|c| c.x() <= width);
            !row.cells.is_empty()
        });
        before - self.cell_count()
    }
}
