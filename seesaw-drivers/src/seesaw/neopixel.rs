//! NeoPixel strip driven through the Seesaw NeoPixel module
//!
//! Pixel writes only touch a local buffer and mark it dirty. A flush
//! uploads the whole buffer in chunks and latches it with SHOW; the dirty
//! flag is cleared only when every write of the flush succeeded, so a
//! failed flush is retried on the next tick.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use seesaw_core::color::{Color, ColorMode};
use seesaw_core::config::{NeoPixelConfig, MAX_LEDS};
use seesaw_core::traits::AddressableLight;
use seesaw_hal::{I2cBus, TransportError};

use super::bus::SeesawBus;
use super::device::{Capabilities, DeviceState, SeesawError};
use super::registers::{module, neopixel, NEOPIXEL_CHUNK_LEN};
use super::SetupState;

/// Largest wire buffer (RGBW at [`MAX_LEDS`])
const MAX_BUFFER_LEN: usize = MAX_LEDS * 4;

/// Pixel buffer and upload state of the chip's NeoPixel output
pub struct NeoPixelStrip {
    config: NeoPixelConfig,
    pixels: Vec<Color, MAX_LEDS>,
    brightness: u8,
    dirty: bool,
    setup: SetupState,
}

impl NeoPixelStrip {
    pub(crate) fn new(config: NeoPixelConfig) -> Self {
        let mut pixels = Vec::new();
        // Length is bounded by validation; clamp anyway
        pixels
            .resize((config.num_leds as usize).min(MAX_LEDS), Color::OFF)
            .ok();

        Self {
            config,
            pixels,
            brightness: u8::MAX,
            dirty: false,
            setup: SetupState::Pending,
        }
    }

    pub fn config(&self) -> &NeoPixelConfig {
        &self.config
    }

    /// Number of LEDs
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Buffered color of one LED
    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    /// Check if the buffer changed since the last successful flush
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn setup_state(&self) -> SetupState {
        self.setup
    }

    /// Set one LED in the buffer
    ///
    /// Out-of-range indices are logged and ignored. The white channel is
    /// dropped for RGB strips.
    pub fn set_pixel(&mut self, index: usize, color: Color) {
        let len = self.pixels.len();
        let Some(slot) = self.pixels.get_mut(index) else {
            warn!("neopixel: index {} out of range ({} LEDs)", index, len);
            return;
        };

        *slot = match self.config.color_mode {
            ColorMode::Rgb => color.without_white(),
            ColorMode::RgbWhite => color,
        };
        self.dirty = true;
    }

    /// Set the global brightness applied when the buffer is uploaded
    pub fn set_brightness(&mut self, brightness: u8) {
        if brightness != self.brightness {
            self.brightness = brightness;
            self.dirty = true;
        }
    }

    /// Encode the buffer in wire order with brightness applied
    ///
    /// Returns the number of bytes written to `out`.
    pub fn encode(&self, out: &mut [u8]) -> usize {
        let bpp = self.config.bytes_per_pixel();
        let order = self.config.color_order;
        let mut len = 0;

        for (pixel, wire) in self.pixels.iter().zip(out.chunks_exact_mut(bpp)) {
            order.encode(pixel.scaled(self.brightness), wire);
            len += bpp;
        }
        len
    }

    pub(crate) fn reset_setup(&mut self) {
        self.setup = SetupState::Pending;
    }

    /// Select the output pin, data rate and buffer length
    ///
    /// A lit buffer is marked dirty since the chip starts dark. An already
    /// dirty buffer stays dirty: the LEDs keep their last latched colors
    /// through a chip reset.
    pub(crate) fn configure<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        if !capabilities.has(module::NEOPIXEL) {
            if self.setup != SetupState::Unsupported {
                warn!(
                    "seesaw@{:#x}: no NeoPixel module, light disabled",
                    bus.address()
                );
            }
            self.setup = SetupState::Unsupported;
            return Ok(());
        }

        let buffer_len = self.config.buffer_len() as u16;
        bus.write_register(module::NEOPIXEL, neopixel::PIN, &[self.config.pin])?;
        bus.write_register(
            module::NEOPIXEL,
            neopixel::SPEED,
            &[neopixel::SPEED_800KHZ],
        )?;
        bus.write_register(
            module::NEOPIXEL,
            neopixel::BUF_LENGTH,
            &buffer_len.to_be_bytes(),
        )?;

        self.setup = SetupState::Configured;
        self.dirty |= self.pixels.iter().any(|p| !p.is_off());
        debug!(
            "seesaw@{:#x}: neopixel on pin {}, {} LEDs {}",
            bus.address(),
            self.config.pin,
            self.pixels.len(),
            self.config.color_order.as_str()
        );
        Ok(())
    }

    /// Upload the buffer and latch it, if dirty
    pub(crate) fn flush<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
    ) -> Result<(), TransportError> {
        if !self.dirty {
            return Ok(());
        }

        let mut wire = [0u8; MAX_BUFFER_LEN];
        let len = self.encode(&mut wire);

        let mut frame = [0u8; 2 + NEOPIXEL_CHUNK_LEN];
        for (i, chunk) in wire[..len].chunks(NEOPIXEL_CHUNK_LEN).enumerate() {
            let offset = (i * NEOPIXEL_CHUNK_LEN) as u16;
            frame[..2].copy_from_slice(&offset.to_be_bytes());
            frame[2..2 + chunk.len()].copy_from_slice(chunk);
            bus.write_register(module::NEOPIXEL, neopixel::BUF, &frame[..2 + chunk.len()])?;
        }
        bus.write_register(module::NEOPIXEL, neopixel::SHOW, &[])?;

        self.dirty = false;
        trace!("seesaw@{:#x}: neopixel flushed {} bytes", bus.address(), len);
        Ok(())
    }

    /// Finish setup if pending, then flush
    pub(crate) fn tick<B: I2cBus, D: DelayNs>(
        &mut self,
        bus: &mut SeesawBus<B, D>,
        capabilities: Capabilities,
    ) -> Result<(), TransportError> {
        if self.setup == SetupState::Pending {
            self.configure(bus, capabilities)?;
        }
        if self.setup != SetupState::Configured {
            return Ok(());
        }
        self.flush(bus)
    }
}

/// Borrowed handle to a device's light
///
/// Lends the device bus to the strip so [`show`](AddressableLight::show)
/// can flush immediately instead of waiting for the next tick.
pub struct LightView<'a, B, D> {
    pub(crate) strip: &'a mut NeoPixelStrip,
    pub(crate) bus: &'a mut SeesawBus<B, D>,
    pub(crate) capabilities: Capabilities,
    pub(crate) state: &'a mut DeviceState,
}

impl<B: I2cBus, D: DelayNs> LightView<'_, B, D> {
    /// Underlying strip
    pub fn strip(&self) -> &NeoPixelStrip {
        &*self.strip
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.strip.set_brightness(brightness);
    }

    pub fn is_dirty(&self) -> bool {
        self.strip.is_dirty()
    }
}

impl<B: I2cBus, D: DelayNs> AddressableLight for LightView<'_, B, D> {
    type Error = SeesawError;

    fn size(&self) -> usize {
        self.strip.len()
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        self.strip.set_pixel(index, color);
    }

    fn pixel(&self, index: usize) -> Option<Color> {
        self.strip.pixel(index)
    }

    fn show(&mut self) -> Result<(), SeesawError> {
        if !self.state.is_operational() {
            return Err(SeesawError::NotReady);
        }
        if let Err(e) = self.strip.tick(&mut *self.bus, self.capabilities) {
            if *self.state == DeviceState::Ready {
                warn!(
                    "seesaw@{:#x}: degraded, neopixel show failed: {:?}",
                    self.bus.address(),
                    e
                );
                *self.state = DeviceState::Degraded;
            }
            return Err(e.into());
        }
        if self.strip.setup_state() == SetupState::Unsupported {
            return Err(SeesawError::Unsupported);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seesaw_core::color::ColorOrder;

    use crate::seesaw::mock::{MockBus, NoopDelay, NEOKEY_OPTIONS};

    fn chip() -> SeesawBus<MockBus, NoopDelay> {
        SeesawBus::new(MockBus::neokey(), NoopDelay::default(), 0x30)
    }

    fn configured(config: NeoPixelConfig, bus: &mut SeesawBus<MockBus, NoopDelay>) -> NeoPixelStrip {
        let mut strip = NeoPixelStrip::new(config);
        strip
            .configure(bus, Capabilities::from_bits(NEOKEY_OPTIONS))
            .unwrap();
        bus.transport_mut().writes.clear();
        strip
    }

    #[test]
    fn test_configure_sequence() {
        let mut bus = chip();
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(4));
        strip
            .configure(&mut bus, Capabilities::from_bits(NEOKEY_OPTIONS))
            .unwrap();

        assert_eq!(
            bus.transport_mut().writes,
            vec![
                vec![0x0E, neopixel::PIN, 3],
                vec![0x0E, neopixel::SPEED, 0x01],
                vec![0x0E, neopixel::BUF_LENGTH, 0x00, 12],
            ]
        );
        assert_eq!(strip.setup_state(), SetupState::Configured);
        assert!(!strip.is_dirty());
    }

    #[test]
    fn test_set_pixel_out_of_range_ignored() {
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(4));
        strip.set_pixel(4, Color::rgb(255, 255, 255));

        assert!(!strip.is_dirty());
        assert!((0..4).all(|i| strip.pixel(i) == Some(Color::OFF)));
        assert_eq!(strip.pixel(4), None);
    }

    #[test]
    fn test_rgb_strip_drops_white() {
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(1));
        strip.set_pixel(0, Color::rgbw(1, 2, 3, 4));
        assert_eq!(strip.pixel(0), Some(Color::rgb(1, 2, 3)));

        let mut rgbw =
            NeoPixelStrip::new(NeoPixelConfig::new(1).with_color_order(ColorOrder::Grbw));
        rgbw.set_pixel(0, Color::rgbw(1, 2, 3, 4));
        assert_eq!(rgbw.pixel(0), Some(Color::rgbw(1, 2, 3, 4)));
    }

    #[test]
    fn test_writes_coalesce_until_flush() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(2), &mut bus);

        strip.set_pixel(1, Color::rgb(10, 0, 0));
        strip.set_pixel(1, Color::rgb(0, 0, 20));
        assert!(bus.transport_mut().writes.is_empty());

        strip.flush(&mut bus).unwrap();
        let mock = bus.transport_mut();
        assert_eq!(
            mock.writes_to(module::NEOPIXEL, neopixel::BUF),
            [[0u8, 0, 0, 0, 0, 0, 0, 20].as_slice()]
        );
        assert_eq!(mock.writes_to(module::NEOPIXEL, neopixel::SHOW).len(), 1);
        assert!(!strip.is_dirty());
    }

    #[test]
    fn test_clean_flush_is_silent() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(4), &mut bus);

        strip.flush(&mut bus).unwrap();
        assert!(bus.transport_mut().writes.is_empty());
    }

    #[test]
    fn test_chunked_upload() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(20), &mut bus);
        for i in 0..20 {
            strip.set_pixel(i, Color::rgb(i as u8, i as u8, i as u8));
        }
        strip.flush(&mut bus).unwrap();

        let mock = bus.transport_mut();
        let chunks = mock.writes_to(module::NEOPIXEL, neopixel::BUF);
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[0][..2], &[0, 0]);
        assert_eq!(chunks[0].len(), 2 + 30);
        assert_eq!(&chunks[1][..2], &[0, 30]);
        assert_eq!(chunks[1].len(), 2 + 30);
        // Pixel 10 starts the second chunk
        assert_eq!(&chunks[1][2..5], &[10, 10, 10]);
    }

    #[test]
    fn test_largest_rgbw_upload() {
        let mut bus = chip();
        let config = NeoPixelConfig::new(MAX_LEDS as u16).with_color_order(ColorOrder::Rgbw);
        let mut strip = configured(config, &mut bus);
        strip.set_pixel(MAX_LEDS - 1, Color::rgbw(1, 2, 3, 4));
        strip.flush(&mut bus).unwrap();

        let mock = bus.transport_mut();
        let chunks = mock.writes_to(module::NEOPIXEL, neopixel::BUF);
        // 256 bytes: eight full chunks and a 16-byte tail at offset 240
        assert_eq!(chunks.len(), 9);
        let tail = chunks[8];
        assert_eq!(&tail[..2], &[0, 240]);
        assert_eq!(tail.len(), 2 + 16);
        assert_eq!(&tail[tail.len() - 4..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_failed_show_stays_dirty() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(4), &mut bus);
        strip.set_pixel(0, Color::rgb(255, 0, 0));

        bus.transport_mut()
            .nack_next_write(module::NEOPIXEL, neopixel::SHOW);
        assert_eq!(strip.flush(&mut bus), Err(TransportError::Nack));
        assert!(strip.is_dirty());

        strip.flush(&mut bus).unwrap();
        assert!(!strip.is_dirty());
        assert_eq!(
            bus.transport_mut()
                .writes_to(module::NEOPIXEL, neopixel::BUF)
                .len(),
            2
        );
    }

    #[test]
    fn test_failed_chunk_stays_dirty() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(4), &mut bus);
        strip.set_pixel(3, Color::rgb(1, 1, 1));

        bus.transport_mut().nack_next_write(module::NEOPIXEL, neopixel::BUF);
        assert_eq!(strip.flush(&mut bus), Err(TransportError::Nack));
        assert!(strip.is_dirty());
        assert!(bus.transport_mut().writes.is_empty());
    }

    #[test]
    fn test_brightness_scales_wire_bytes() {
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(1));
        strip.set_pixel(0, Color::rgb(255, 0, 0));
        strip.set_brightness(128);

        let mut wire = [0u8; 3];
        assert_eq!(strip.encode(&mut wire), 3);
        assert_eq!(wire, [0, 128, 0]);
        // Buffer keeps the unscaled color
        assert_eq!(strip.pixel(0), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_configure_marks_lit_buffer_dirty() {
        let mut bus = chip();
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(4));
        strip.set_pixel(2, Color::rgb(0, 9, 0));
        strip
            .configure(&mut bus, Capabilities::from_bits(NEOKEY_OPTIONS))
            .unwrap();
        assert!(strip.is_dirty());
    }

    #[test]
    fn test_reconfigure_keeps_pending_clear() {
        let mut bus = chip();
        let mut strip = configured(NeoPixelConfig::new(2), &mut bus);
        strip.set_pixel(0, Color::rgb(50, 50, 50));
        strip.flush(&mut bus).unwrap();
        strip.set_pixel(0, Color::OFF);

        strip.reset_setup();
        strip
            .configure(&mut bus, Capabilities::from_bits(NEOKEY_OPTIONS))
            .unwrap();
        assert!(strip.is_dirty());
    }

    #[test]
    fn test_missing_neopixel_module() {
        let mut bus = chip();
        let mut strip = NeoPixelStrip::new(NeoPixelConfig::new(4));
        strip.set_pixel(0, Color::rgb(1, 1, 1));

        strip
            .tick(&mut bus, Capabilities::from_bits(1 << module::GPIO))
            .unwrap();
        assert_eq!(strip.setup_state(), SetupState::Unsupported);
        assert!(bus.transport_mut().writes.is_empty());
    }
}
