//! Default color derivation from the page background.
//!
//! The shimmer is centered on the page's own background color, so the tiles
//! blend into it. The host hands over whatever computed background color it
//! has, as a CSS color string, and this module extracts one brightness byte
//! from it. Parsing is best effort:
//!
//! | Input | Brightness |
//! |-------|------------|
//! | `#rrggbb` | `rr` |
//! | `#rgb` | `rr` (first digit doubled) |
//! | `rgb(r, g, b)` / `rgba(r, g, b, a)` | `r`, clamped to 255 |
//! | anything else | [`FALLBACK_BRIGHTNESS`] (42) |
//!
//! Only the first channel is read; the background is assumed to be gray.

use shimmer_common::Gray;
use shimmer_common::config::FALLBACK_BRIGHTNESS;
use tracing::debug;

/// Brightness byte of a CSS background color, or the fallback.
pub fn base_brightness(css_color: &str) -> u8 {
    let color = css_color.trim();
    let parsed = if let Some(hex) = color.strip_prefix('#') {
        parse_hex(hex)
    } else {
        parse_rgb_function(color)
    };

    parsed.unwrap_or_else(|| {
        debug!(color = css_color, fallback = FALLBACK_BRIGHTNESS, "Unrecognized background color");
        FALLBACK_BRIGHTNESS
    })
}

/// Default tile color for a CSS background color.
pub fn default_color(css_color: &str) -> Gray { Gray(base_brightness(css_color)) }

/// `rrggbb` or `rgb` hex digits after the `#`.
fn parse_hex(hex: &str) -> Option<u8> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => u8::from_str_radix(&hex[..2], 16).ok(),
        3 => u8::from_str_radix(&hex[..1], 16).ok().map(|digit| digit * 0x11),
        _ => None,
    }
}

/// `rgb(r, g, b)` or `rgba(r, g, b, a)`; returns the red channel.
fn parse_rgb_function(color: &str) -> Option<u8> {
    let lower = color.to_ascii_lowercase();
    let args = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut channels = args.split(',').map(str::trim);
    let red = channels.next()?;
    // Green and blue must be present too, even though only red is used
    if channels.next()?.is_empty() || channels.next()?.is_empty() {
        return None;
    }

    let value: f32 = red.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round().min(255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_function() {
        assert_eq!(base_brightness("rgb(42, 42, 42)"), 42);
        assert_eq!(base_brightness("rgb(0,0,0)"), 0);
        assert_eq!(base_brightness("RGB(200, 200, 200)"), 200);
        assert_eq!(base_brightness("rgba(17, 17, 17, 0.5)"), 17);
    }

    #[test]
    fn test_rgb_function_clamps() {
        assert_eq!(base_brightness("rgb(300, 300, 300)"), 255);
        assert_eq!(base_brightness("rgb(41.6, 41.6, 41.6)"), 42);
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(base_brightness("#2a2a2a"), 42);
        assert_eq!(base_brightness("#FFFFFF"), 255);
        assert_eq!(base_brightness("#333"), 0x33);
        assert_eq!(base_brightness("  #101010  "), 16);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(base_brightness(""), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("transparent"), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("#12345"), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("#zzzzzz"), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("rgb(42, 42)"), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("rgb(-1, 0, 0)"), FALLBACK_BRIGHTNESS);
        assert_eq!(base_brightness("rgb(a, b, c)"), FALLBACK_BRIGHTNESS);
    }

    #[test]
    fn test_default_color_from_rgb() {
        let color = default_color("rgb(42, 42, 42)");
        assert_eq!(color, Gray(42));
        assert_eq!(color.to_code().as_str(), "#2a2a2a");
    }
}
