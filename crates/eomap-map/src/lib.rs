pub mod cleanup;
pub mod map;
pub mod rows;

pub use cleanup::CleanupReport;
pub use map::{ErasedSpecial, Map};
pub use rows::{Row, RowCell, Rows};
