use crate::format::Section;

/// Errors that can occur while loading or saving an EMF file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid magic bytes (expected EMF)")]
    InvalidMagic,

    #[error("truncated file in {section}: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        section: Section,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("sign at offset {offset} has a zero length field (minimum is 1)")]
    InvalidSignLength { offset: usize },

    #[error("map was neither loaded nor created as new")]
    NotLoaded,

    #[error("{field} is {value}, more than the field can encode ({max})")]
    FieldOverflow {
        field: &'static str,
        value: usize,
        max: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistError {
    /// Whether the bytes themselves are malformed (as opposed to a device or caller error).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic | Self::Truncated { .. } | Self::InvalidSignLength { .. }
        )
    }
}
