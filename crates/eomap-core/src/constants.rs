//! Single source of truth for EO number and map format constants.

/// Place value of the second digit of an EO number.
pub const BASE_2: u32 = 253;

/// Place value of the third digit (253^2).
pub const BASE_3: u32 = 64_009;

/// Place value of the fourth digit (253^3).
pub const BASE_4: u32 = 16_194_277;

/// Marks an unused high digit when encoding. Decodes the same as 0.
pub const DIGIT_ABSENT: u8 = 254;

/// Terminates and pads the map name.
pub const STRING_TERMINATOR: u8 = 0xFF;

/// Largest value an encoded 1-byte field can carry.
pub const MAX_CHAR: u32 = BASE_2 - 1;

/// Largest value an encoded 2-byte field can carry.
pub const MAX_SHORT: u32 = BASE_3 - 1;

/// Largest value an encoded 3-byte field can carry.
pub const MAX_THREE: u32 = BASE_4 - 1;

/// Largest value an encoded 4-byte field can carry (252 * 253^3 + MAX_THREE).
pub const MAX_INT: u32 = MAX_CHAR * BASE_4 + MAX_THREE;

/// Number of parallel graphics layers in a map.
pub const GFX_LAYER_COUNT: usize = 9;

/// Encoded length of the map name field.
pub const NAME_LENGTH: usize = 24;
