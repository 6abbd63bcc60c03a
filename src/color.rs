use image::{Rgb, RgbImage};

/// An 8-bit RGB color. Colors are compared by Manhattan distance only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Color(pub [u8; 3]);

impl Color {
    pub(crate) const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color([red, green, blue])
    }

    /// Sum of absolute per-channel differences, in `0..=765`.
    pub(crate) fn distance(&self, other: &Color) -> u32 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| u32::from(a.abs_diff(b)))
            .sum()
    }
}

impl From<Rgb<u8>> for Color {
    fn from(Rgb([red, green, blue]): Rgb<u8>) -> Self {
        Color::new(red, green, blue)
    }
}

impl From<&Rgb<u8>> for Color {
    fn from(pixel: &Rgb<u8>) -> Self {
        Color::from(*pixel)
    }
}

pub(crate) trait ImageColorExt {
    fn average_color(&self) -> Color;
}

impl ImageColorExt for RgbImage {
    /// Per-channel mean over every pixel, truncated. An empty image averages
    /// to black.
    fn average_color(&self) -> Color {
        let pixel_count = u64::from(self.width()) * u64::from(self.height());
        let sums = self.pixels().fold([0u64; 3], |mut acc, Rgb(rgb)| {
            for (sum, &c) in acc.iter_mut().zip(rgb) {
                *sum += u64::from(c);
            }
            acc
        });
        // each mean is at most 255, so the narrowing cast is lossless
        Color(sums.map(|sum| sum.checked_div(pixel_count).unwrap_or(0) as u8))
    }
}
