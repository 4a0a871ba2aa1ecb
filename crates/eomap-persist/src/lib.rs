pub mod compat;
pub mod error;
pub mod format;
pub mod load;
pub mod save;
pub mod source;

pub use error::PersistError;
pub use format::{FormatVintage, Section};
pub use load::{load, load_file, MapData};
pub use save::{save, save_file};
