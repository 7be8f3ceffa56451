use std::fmt;

use image::{ImageBuffer, Rgb, RgbImage};

/// Opaque packed `0xRRGGBB` color.
///
/// The renderer never blends or converts these, it only hands them back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);
    /// Default scene background.
    pub const SKY: Color = Color(0x87CEEB);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Keeps the low 24 bits; anything above (e.g. an alpha byte) is dropped.
    pub const fn from_packed(packed: u32) -> Self {
        Color(packed & 0x00FF_FFFF)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Self {
        Rgb([c.r(), c.g(), c.b()])
    }
}

/// Copies a row-major frame into an RGB image. `None` when the buffer does
/// not hold exactly `width * height` pixels.
pub fn to_rgb_image(pixels: &[Color], width: u32, height: u32) -> Option<RgbImage> {
    if pixels.len() != width as usize * height as usize {
        return None;
    }
    Some(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb::from(pixels[(y * width + x) as usize])
    }))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_unpack() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.packed(), 0x123456);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
        assert_eq!(Rgb::from(Color::SKY), Rgb([0x87, 0xCE, 0xEB]));
    }

    #[test]
    fn frame_converts_row_major() {
        let pixels = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let img = to_rgb_image(&pixels, 2, 2).unwrap();
        assert_eq!(*img.get_pixel(1, 0), Rgb([0, 255, 0]));
        assert_eq!(*img.get_pixel(0, 1), Rgb([0, 0, 255]));
        assert!(to_rgb_image(&pixels, 3, 2).is_none());
    }

    #[test]
    fn packed_drops_alpha() {
        assert_eq!(Color::from_packed(0xFF87CEEB), Color::SKY);
        assert_eq!(Color::SKY.to_string(), "#87CEEB");
    }
}
