//! EO numbers: the mixed-radix integer encoding used by every numeric EMF field.
//!
//! Each byte carries one base-253 digit stored as `digit + 1`, least
//! significant first. Bytes 0 and 254 both decode as a zero digit; the encoder
//! writes 254 for high digits the value does not reach.

use crate::constants::{BASE_2, BASE_3, BASE_4, DIGIT_ABSENT};

#[inline]
fn digit(b: u8) -> u32 {
    let b = if b == 0 || b == DIGIT_ABSENT { 1 } else { b };
    (b - 1) as u32
}

/// Decode up to four bytes. Missing high bytes count as zero digits.
pub fn decode(bytes: &[u8]) -> u32 {
    debug_assert!(bytes.len() <= 4, "EO numbers are at most 4 bytes");
    let bases = [1, BASE_2, BASE_3, BASE_4];
    bytes
        .iter()
        .zip(bases)
        .map(|(&b, base)| digit(b) * base)
        .sum()
}

/// Decode a 1-byte field.
#[inline]
pub fn decode_char(b1: u8) -> u8 {
    digit(b1) as u8
}

/// Decode a 2-byte field.
#[inline]
pub fn decode_short(b1: u8, b2: u8) -> u16 {
    (digit(b2) * BASE_2 + digit(b1)) as u16
}

/// Decode a 3-byte field.
#[inline]
pub fn decode_three(b1: u8, b2: u8, b3: u8) -> u32 {
    decode(&[b1, b2, b3])
}

/// Decode a 4-byte field.
#[inline]
pub fn decode_int(b1: u8, b2: u8, b3: u8, b4: u8) -> u32 {
    decode(&[b1, b2, b3, b4])
}

/// Encode a value into four bytes, least significant digit first.
///
/// Fields narrower than four bytes take a prefix of the result. Values above
/// the field's maximum (see `constants::MAX_*`) do not round-trip.
pub fn encode(number: u32) -> [u8; 4] {
    let mut bytes = [DIGIT_ABSENT; 4];
    let mut rest = number;

    if number >= BASE_4 {
        bytes[3] = (rest / BASE_4 + 1) as u8;
        rest %= BASE_4;
    }

    if number >= BASE_3 {
        bytes[2] = (rest / BASE_3 + 1) as u8;
        rest %= BASE_3;
    }

    if number >= BASE_2 {
        bytes[1] = (rest / BASE_2 + 1) as u8;
        rest %= BASE_2;
    }

    bytes[0] = (rest + 1) as u8;
    bytes
}
