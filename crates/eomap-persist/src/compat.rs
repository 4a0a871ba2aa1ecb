use crate::error::PersistError;
use crate::format::{FormatVintage, MAGIC};

/// Check the magic bytes at the start of a header.
pub fn validate_magic(header: &[u8]) -> Result<(), PersistError> {
    if header.get(..MAGIC.len()) != Some(&MAGIC[..]) {
        return Err(PersistError::InvalidMagic);
    }
    Ok(())
}

/// Work out the file generation from which optional sections were present.
pub fn classify(layer_8_present: bool, signs_present: bool) -> FormatVintage {
    match (layer_8_present, signs_present) {
        (false, _) => FormatVintage::EightLayers,
        (true, false) => FormatVintage::NineLayers,
        (true, true) => FormatVintage::WithSigns,
    }
}

/// Compatibility notes for a loaded file.
///
/// Older files load fine; saving always writes the newest layout, which the
/// game clients that produced them may not read.
pub fn vintage_warnings(vintage: FormatVintage) -> Vec<String> {
    match vintage {
        FormatVintage::EightLayers => vec![
            "File predates graphics layer 8 and signs; saving will write both sections."
                .to_string(),
        ],
        FormatVintage::NineLayers => {
            vec!["File predates signs; saving will write a sign section.".to_string()]
        }
        FormatVintage::WithSigns => Vec::new(),
    }
}
