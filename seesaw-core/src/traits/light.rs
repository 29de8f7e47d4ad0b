//! Addressable light trait

use core::ops::Range;

use crate::color::Color;

/// Strip of individually addressable LEDs
///
/// Writes only touch the local buffer; [`show`](Self::show) pushes the
/// latest buffer contents to the LEDs.
pub trait AddressableLight {
    /// Error returned when flushing fails
    type Error;

    /// Number of LEDs
    fn size(&self) -> usize;

    /// Set one LED
    ///
    /// Out-of-range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Read back one LED from the local buffer
    fn pixel(&self, index: usize) -> Option<Color>;

    /// Flush the buffer to the LEDs if it changed since the last flush
    fn show(&mut self) -> Result<(), Self::Error>;

    /// Set every LED in `range`, clipped to the strip
    fn set_range(&mut self, range: Range<usize>, color: Color) {
        let end = range.end.min(self.size());
        for index in range.start..end {
            self.set_pixel(index, color);
        }
    }

    /// Set every LED
    fn fill(&mut self, color: Color) {
        self.set_range(0..self.size(), color);
    }

    /// Turn every LED off
    fn clear(&mut self) {
        self.fill(Color::OFF);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory strip counting flushes
    struct MemoryStrip {
        pixels: [Color; 4],
        shows: usize,
    }

    impl AddressableLight for MemoryStrip {
        type Error = ();

        fn size(&self) -> usize {
            self.pixels.len()
        }

        fn set_pixel(&mut self, index: usize, color: Color) {
            if let Some(p) = self.pixels.get_mut(index) {
                *p = color;
            }
        }

        fn pixel(&self, index: usize) -> Option<Color> {
            self.pixels.get(index).copied()
        }

        fn show(&mut self) -> Result<(), ()> {
            self.shows += 1;
            Ok(())
        }
    }

    #[test]
    fn test_set_range_clips() {
        let mut strip = MemoryStrip {
            pixels: [Color::OFF; 4],
            shows: 0,
        };

        strip.set_range(2..10, Color::rgb(1, 2, 3));
        assert_eq!(strip.pixel(1), Some(Color::OFF));
        assert_eq!(strip.pixel(2), Some(Color::rgb(1, 2, 3)));
        assert_eq!(strip.pixel(3), Some(Color::rgb(1, 2, 3)));
        assert_eq!(strip.pixel(4), None);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut strip = MemoryStrip {
            pixels: [Color::OFF; 4],
            shows: 0,
        };

        strip.fill(Color::rgb(9, 9, 9));
        assert!(strip.pixels.iter().all(|p| *p == Color::rgb(9, 9, 9)));

        strip.clear();
        assert!(strip.pixels.iter().all(|p| p.is_off()));

        strip.show().unwrap();
        assert_eq!(strip.shows, 1);
    }
}
