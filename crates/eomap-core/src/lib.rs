pub mod constants;
pub mod number;
pub mod text;
pub mod types;

pub use text::{PlainText, StringTransform};
pub use types::{
    ChestSpawn, Door, GfxCell, GfxLayer, MapEffect, MapType, NpcSpawn, Sign, TileSpec,
    TileSpecCell, UnknownBlock, Warp,
};
