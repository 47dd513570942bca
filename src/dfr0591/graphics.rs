//! [`embedded_graphics`] support: draw text and primitives straight into the frame buffer

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::dfr0591::driver::Epaper;
use crate::error::Error;

impl<T> OriginDimensions for Epaper<T> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.width()).unwrap_or(u32::MAX),
            u32::try_from(self.height()).unwrap_or(u32::MAX),
        )
    }
}

/// `BinaryColor::On` sets the pixel bit. Pixels outside `0..width` ×
/// `0..height` are dropped, as `DrawTarget` implementations are expected to clip.
impl<T> DrawTarget for Epaper<T> {
    type Color = BinaryColor;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= self.width() || y >= self.height() {
                continue;
            }
            self.set_pixel(x, y, color.is_on())?;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
