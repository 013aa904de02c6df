//! Grayscale shades and the `#rrggbb` color codec.
//!
//! Every color in the shimmer background is a neutral gray: the red, green and
//! blue channels always carry the same byte. A [`Gray`] stores that single
//! byte; its textual form is the familiar CSS hex notation with the byte
//! repeated three times (`#2a2a2a`).
//!
//! ## Conversions
//!
//! - [`encode`] / [`Gray::to_code`]: brightness → `#rrggbb` (`heapless::String<7>`)
//! - [`decode`] / [`str::parse`]: `#rrggbb` → brightness, rejecting anything
//!   that is not a 7-character grayscale hex string
//! - `Rgb888::from(gray)`: for drawing through `embedded-graphics`; any color
//!   type implementing `From<Rgb888>` (such as `Rgb565`) follows from there
//!
//! ## Random Shades
//!
//! [`random_brighter`] picks a shade near a base brightness by scaling it with
//! a uniform factor in `[0.8, 1.2]`. The scaled value is not clamped: a base
//! brighter than 213 can overflow a byte, which is reported as
//! [`ColorError::OutOfRange`]. Callers keep the base in range.

use core::fmt::{self, Write};
use core::str::FromStr;

use embedded_graphics::pixelcolor::Rgb888;
use heapless::String;
use rand::Rng;
use thiserror::Error;

use crate::config::{BRIGHTNESS_HIGH_FACTOR, BRIGHTNESS_LOW_FACTOR};

/// Length of an encoded color: `#` plus three two-digit hex bytes.
pub const COLOR_CODE_LEN: usize = 7;

/// Encoded `#rrggbb` color string. Fixed capacity, no heap allocation.
pub type ColorCode = String<COLOR_CODE_LEN>;

/// Errors produced by the color codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string is not a 7-character `#rrggbb` grayscale color.
    #[error("malformed grayscale color string")]
    Format,
    /// A scaled brightness no longer fits in a byte.
    #[error("brightness {0} exceeds 255")]
    OutOfRange(u32),
    /// The lower scaling factor is above the upper one (or not a number).
    #[error("brightness factor range is empty")]
    FactorRange,
}

// =============================================================================
// Gray Shade
// =============================================================================

/// A neutral gray shade (R = G = B).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gray(pub u8);

impl Gray {
    /// Pure black.
    pub const BLACK: Self = Self(0);

    /// Pure white.
    pub const WHITE: Self = Self(0xFF);

    /// Create a shade from its brightness byte.
    #[inline]
    pub const fn new(brightness: u8) -> Self { Self(brightness) }

    /// Brightness byte shared by all three channels.
    #[inline]
    pub const fn brightness(self) -> u8 { self.0 }

    /// Encode as a `#rrggbb` string.
    #[inline]
    pub fn to_code(self) -> ColorCode { encode(self.0) }
}

impl fmt::Display for Gray {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let b = self.0;
        write!(f, "#{b:02x}{b:02x}{b:02x}")
    }
}

impl FromStr for Gray {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { decode(s).map(Self) }
}

impl From<Gray> for Rgb888 {
    fn from(gray: Gray) -> Self { Self::new(gray.0, gray.0, gray.0) }
}

// =============================================================================
// Codec
// =============================================================================

/// Encode a brightness byte as a `#rrggbb` grayscale string.
///
/// Single-digit values are zero-padded, so the output is always 7 characters.
pub fn encode(brightness: u8) -> ColorCode {
    let mut code = ColorCode::new();
    // 7 bytes always fit the 7-byte buffer
    let _ = write!(code, "#{brightness:02x}{brightness:02x}{brightness:02x}");
    code
}

/// Decode a `#rrggbb` grayscale string back to its brightness byte.
///
/// Hex digits may be upper or lower case. Colors whose three channels differ
/// are rejected: they cannot have come from [`encode`].
pub fn decode(code: &str) -> Result<u8, ColorError> {
    let bytes = code.as_bytes();
    if bytes.len() != COLOR_CODE_LEN || bytes[0] != b'#' || !bytes[1..].iter().all(u8::is_ascii_hexdigit) {
        return Err(ColorError::Format);
    }

    // All-ASCII from here on, so byte offsets are char boundaries
    let channel = |start: usize| u8::from_str_radix(&code[start..start + 2], 16).map_err(|_| ColorError::Format);
    let r = channel(1)?;
    let g = channel(3)?;
    let b = channel(5)?;

    if r == g && g == b { Ok(r) } else { Err(ColorError::Format) }
}

// =============================================================================
// Random Shades
// =============================================================================

/// Pick a shade around `base` using the default `[0.8, 1.2]` factor range.
pub fn random_brighter<R: Rng + ?Sized>(
    base: u8,
    rng: &mut R,
) -> Result<Gray, ColorError> {
    random_brighter_within(base, BRIGHTNESS_LOW_FACTOR, BRIGHTNESS_HIGH_FACTOR, rng)
}

/// Pick a shade by scaling `base` with a uniform factor in `[low, high]`.
///
/// The product is floored. No clamping happens: results above 255 are
/// returned as [`ColorError::OutOfRange`].
pub fn random_brighter_within<R: Rng + ?Sized>(
    base: u8,
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<Gray, ColorError> {
    // Also rejects NaN bounds
    if !(low <= high) || low < 0.0 {
        return Err(ColorError::FactorRange);
    }

    let factor = if low == high { low } else { rng.random_range(low..=high) };
    // Non-negative, so truncation is floor
    let scaled = (factor * f32::from(base)) as u32;

    u8::try_from(scaled).map(Gray).map_err(|_| ColorError::OutOfRange(scaled))
}

/// Largest base brightness that can never overflow when scaled by `high`.
pub fn max_base_for(high: f32) -> u8 {
    if high <= 1.0 {
        return u8::MAX;
    }
    let mut base = u8::MAX;
    while base > 0 && (high * f32::from(base)) as u32 > u32::from(u8::MAX) {
        base -= 1;
    }
    base
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_encode_pads_single_digit() {
        assert_eq!(encode(0).as_str(), "#000000");
        assert_eq!(encode(0x0a).as_str(), "#0a0a0a");
        assert_eq!(encode(42).as_str(), "#2a2a2a");
        assert_eq!(encode(255).as_str(), "#ffffff");
    }

    #[test]
    fn test_decode_accepts_encoded_values() {
        for b in [0u8, 1, 15, 16, 42, 128, 254, 255] {
            assert_eq!(decode(&encode(b)), Ok(b), "byte {b}");
        }
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("#2A2a2A"), Ok(42));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode(""), Err(ColorError::Format));
        assert_eq!(decode("2a2a2a"), Err(ColorError::Format));
        assert_eq!(decode("#2a2a2"), Err(ColorError::Format));
        assert_eq!(decode("#2a2a2a2a"), Err(ColorError::Format));
        assert_eq!(decode("#2g2a2a"), Err(ColorError::Format));
        assert_eq!(decode("#+a2a2a"), Err(ColorError::Format));
        assert_eq!(decode("#ééé"), Err(ColorError::Format));
    }

    #[test]
    fn test_decode_rejects_non_gray() {
        assert_eq!(decode("#2a2a2b"), Err(ColorError::Format));
        assert_eq!(decode("#ff0000"), Err(ColorError::Format));
    }

    #[test]
    fn test_gray_display_and_parse() {
        let gray: Gray = "#101010".parse().unwrap();
        assert_eq!(gray, Gray(16));
        assert_eq!(gray.to_code().as_str(), "#101010");

        let mut text: String<16> = String::new();
        write!(text, "{}", Gray(9)).unwrap();
        assert_eq!(text.as_str(), "#090909");
    }

    #[test]
    fn test_gray_into_rgb888() {
        assert_eq!(Rgb888::from(Gray(42)), Rgb888::new(42, 42, 42));
    }

    #[test]
    fn test_random_brighter_stays_in_factor_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let gray = random_brighter(100, &mut rng).unwrap();
            assert!((80..=120).contains(&gray.brightness()), "got {gray}");
        }
    }

    #[test]
    fn test_random_brighter_zero_base() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(random_brighter(0, &mut rng), Ok(Gray::BLACK));
    }

    #[test]
    fn test_random_brighter_reports_overflow() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(random_brighter_within(250, 1.2, 1.2, &mut rng), Err(ColorError::OutOfRange(300)));
    }

    #[test]
    fn test_random_brighter_rejects_inverted_factors() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(random_brighter_within(42, 1.2, 0.8, &mut rng), Err(ColorError::FactorRange));
        assert_eq!(random_brighter_within(42, f32::NAN, 1.0, &mut rng), Err(ColorError::FactorRange));
    }

    #[test]
    fn test_max_base_for() {
        assert_eq!(max_base_for(1.0), 255);
        assert_eq!(max_base_for(1.2), 213);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert!(random_brighter(213, &mut rng).is_ok());
        }
    }
}
