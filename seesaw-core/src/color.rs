//! Pixel colors and channel ordering
//!
//! Addressable LED strips differ in the order they expect color channels
//! on the wire. [`ColorOrder`] maps a logical [`Color`] onto the byte
//! layout of one pixel and back.

use core::iter;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
pub use smart_leds::RGB8;

use crate::config::ConfigError;

/// Logical pixel color: an RGB triple plus a white channel
///
/// `w` is only transmitted for four-channel (RGBW) strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub rgb: RGB8,
    pub w: u8,
}

impl Color {
    /// All channels off
    pub const OFF: Self = Self::rgbw(0, 0, 0, 0);

    /// Create an RGB color (white channel off)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgbw(r, g, b, 0)
    }

    /// Create an RGBW color
    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self {
            rgb: RGB8 { r, g, b },
            w,
        }
    }

    /// Check if every channel is off
    pub const fn is_off(&self) -> bool {
        self.rgb.r == 0 && self.rgb.g == 0 && self.rgb.b == 0 && self.w == 0
    }

    /// Scale every channel by `brightness`
    ///
    /// Uses the `smart-leds` brightness curve: 255 is identity, 0 is off.
    pub fn scaled(self, brightness: u8) -> Self {
        // White rides along as the red channel of a second pixel
        let mut out = smart_leds::brightness(
            iter::once(self.rgb).chain(iter::once(RGB8::new(self.w, 0, 0))),
            brightness,
        );
        let rgb = out.next().unwrap_or_default();
        let w = out.next().map_or(0, |white| white.r);
        Self { rgb, w }
    }

    /// Drop the white channel
    pub const fn without_white(self) -> Self {
        Self { rgb: self.rgb, w: 0 }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Color {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Color({}, {}, {}, w {})",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            self.w
        )
    }
}

impl From<RGB8> for Color {
    fn from(rgb: RGB8) -> Self {
        Self { rgb, w: 0 }
    }
}

impl From<Color> for RGB8 {
    fn from(color: Color) -> Self {
        color.rgb
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

/// Color channels a light is driven with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorMode {
    /// Red, green, blue
    #[default]
    Rgb,
    /// Red, green, blue plus a dedicated white LED
    RgbWhite,
}

impl ColorMode {
    /// Number of channels (bytes per pixel on the wire)
    pub const fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::RgbWhite => 4,
        }
    }
}

/// Wire order of color channels within one pixel
///
/// Discriminants match the Seesaw configuration enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ColorOrder {
    Rgb = 0,
    Rbg = 1,
    /// NeoKey 1x4 and most WS2812 strips
    #[default]
    Grb = 2,
    Gbr = 3,
    Brg = 4,
    Bgr = 5,
    Rgbw = 6,
    Rbgw = 7,
    Grbw = 8,
    Gbrw = 9,
    Brgw = 10,
    Bgrw = 11,
}

impl ColorOrder {
    /// Every supported order
    pub const ALL: [ColorOrder; 12] = [
        ColorOrder::Rgb,
        ColorOrder::Rbg,
        ColorOrder::Grb,
        ColorOrder::Gbr,
        ColorOrder::Brg,
        ColorOrder::Bgr,
        ColorOrder::Rgbw,
        ColorOrder::Rbgw,
        ColorOrder::Grbw,
        ColorOrder::Gbrw,
        ColorOrder::Brgw,
        ColorOrder::Bgrw,
    ];

    /// Byte offset of each channel within one wire pixel, indexed `[r, g, b, w]`
    ///
    /// White always trails the color channels.
    pub const fn offsets(self) -> [usize; 4] {
        match self {
            ColorOrder::Rgb | ColorOrder::Rgbw => [0, 1, 2, 3],
            ColorOrder::Rbg | ColorOrder::Rbgw => [0, 2, 1, 3],
            ColorOrder::Grb | ColorOrder::Grbw => [1, 0, 2, 3],
            ColorOrder::Gbr | ColorOrder::Gbrw => [2, 0, 1, 3],
            ColorOrder::Brg | ColorOrder::Brgw => [1, 2, 0, 3],
            ColorOrder::Bgr | ColorOrder::Bgrw => [2, 1, 0, 3],
        }
    }

    /// Check if this order carries a white channel
    pub const fn has_white(self) -> bool {
        (self as u8) >= (ColorOrder::Rgbw as u8)
    }

    /// Color mode implied by this order
    pub const fn mode(self) -> ColorMode {
        if self.has_white() {
            ColorMode::RgbWhite
        } else {
            ColorMode::Rgb
        }
    }

    /// Bytes per pixel on the wire
    pub const fn bytes_per_pixel(self) -> usize {
        self.mode().channels()
    }

    /// Write `color` into one wire pixel
    ///
    /// `out` must hold at least [`bytes_per_pixel`](Self::bytes_per_pixel)
    /// bytes. The white channel is dropped for three-channel orders.
    pub fn encode(self, color: Color, out: &mut [u8]) {
        let [r, g, b, w] = self.offsets();
        out[r] = color.rgb.r;
        out[g] = color.rgb.g;
        out[b] = color.rgb.b;
        if self.has_white() {
            out[w] = color.w;
        }
    }

    /// Read one wire pixel back into a logical color
    pub fn decode(self, wire: &[u8]) -> Color {
        let [r, g, b, w] = self.offsets();
        Color::rgbw(
            wire[r],
            wire[g],
            wire[b],
            if self.has_white() { wire[w] } else { 0 },
        )
    }

    /// Configuration name
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorOrder::Rgb => "RGB",
            ColorOrder::Rbg => "RBG",
            ColorOrder::Grb => "GRB",
            ColorOrder::Gbr => "GBR",
            ColorOrder::Brg => "BRG",
            ColorOrder::Bgr => "BGR",
            ColorOrder::Rgbw => "RGBW",
            ColorOrder::Rbgw => "RBGW",
            ColorOrder::Grbw => "GRBW",
            ColorOrder::Gbrw => "GBRW",
            ColorOrder::Brgw => "BRGW",
            ColorOrder::Bgrw => "BGRW",
        }
    }
}

impl FromStr for ColorOrder {
    type Err = ConfigError;

    /// Parse a configuration name such as `"GRB"` (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorOrder::ALL
            .iter()
            .copied()
            .find(|order| order.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(ConfigError::UnknownColorOrder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grb_encoding() {
        let mut wire = [0u8; 3];
        ColorOrder::Grb.encode(Color::rgb(255, 0, 0), &mut wire);
        assert_eq!(wire, [0, 255, 0]);

        ColorOrder::Grb.encode(Color::rgb(1, 2, 3), &mut wire);
        assert_eq!(wire, [2, 1, 3]);
    }

    #[test]
    fn test_rgbw_encoding_keeps_white_last() {
        let mut wire = [0u8; 4];
        ColorOrder::Bgrw.encode(Color::rgbw(1, 2, 3, 4), &mut wire);
        assert_eq!(wire, [3, 2, 1, 4]);
    }

    #[test]
    fn test_rgb_encoding_drops_white() {
        let mut wire = [0xEEu8; 4];
        ColorOrder::Rgb.encode(Color::rgbw(1, 2, 3, 4), &mut wire);
        assert_eq!(wire, [1, 2, 3, 0xEE]);
        assert_eq!(ColorOrder::Rgb.decode(&wire).w, 0);
    }

    #[test]
    fn test_channel_counts() {
        for order in ColorOrder::ALL {
            let expected = if (order as u8) < 6 { 3 } else { 4 };
            assert_eq!(order.bytes_per_pixel(), expected);
        }
    }

    #[test]
    fn test_offsets_are_permutations() {
        for order in ColorOrder::ALL {
            let offsets = order.offsets();
            let n = order.bytes_per_pixel();
            let mut seen = [false; 4];
            for &o in &offsets[..n] {
                assert!(o < n);
                assert!(!seen[o], "{:?} maps two channels to byte {}", order, o);
                seen[o] = true;
            }
        }
    }

    #[test]
    fn test_parse_color_order() {
        assert_eq!("GRB".parse::<ColorOrder>(), Ok(ColorOrder::Grb));
        assert_eq!("bgrw".parse::<ColorOrder>(), Ok(ColorOrder::Bgrw));
        assert_eq!(" RGB ".parse::<ColorOrder>(), Ok(ColorOrder::Rgb));
        assert_eq!(
            "RGBX".parse::<ColorOrder>(),
            Err(ConfigError::UnknownColorOrder)
        );
    }

    #[test]
    fn test_scaled() {
        let c = Color::rgbw(255, 128, 0, 10);
        assert_eq!(c.scaled(255), c);
        assert_eq!(c.scaled(0), Color::OFF);
        assert_eq!(c.scaled(128).rgb.r, 128);
        assert_eq!(c.scaled(128).w, 5);
    }

    #[test]
    fn test_rgb8_conversions() {
        let c = Color::from(RGB8::new(1, 2, 3));
        assert_eq!(c, Color::rgb(1, 2, 3));
        assert_eq!(RGB8::from(Color::rgbw(4, 5, 6, 7)), RGB8::new(4, 5, 6));
    }

    fn any_order() -> impl Strategy<Value = ColorOrder> {
        prop::sample::select(ColorOrder::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            order in any_order(),
            r in any::<u8>(),
            g in any::<u8>(),
            b in any::<u8>(),
            w in any::<u8>(),
        ) {
            let color = Color::rgbw(r, g, b, w);
            let mut wire = [0u8; 4];
            order.encode(color, &mut wire);

            let expected = if order.has_white() { color } else { color.without_white() };
            prop_assert_eq!(order.decode(&wire), expected);
        }

        #[test]
        fn prop_strip_roundtrip(
            order in any_order(),
            pixels in prop::collection::vec(any::<[u8; 4]>(), 1..16),
        ) {
            let bpp = order.bytes_per_pixel();
            let colors: Vec<Color> = pixels
                .iter()
                .map(|p| {
                    let c = Color::rgbw(p[0], p[1], p[2], p[3]);
                    if order.has_white() { c } else { c.without_white() }
                })
                .collect();

            let mut wire = vec![0u8; colors.len() * bpp];
            for (chunk, color) in wire.chunks_mut(bpp).zip(&colors) {
                order.encode(*color, chunk);
            }

            let decoded: Vec<Color> = wire.chunks(bpp).map(|px| order.decode(px)).collect();
            prop_assert_eq!(decoded, colors);
        }
    }
}
