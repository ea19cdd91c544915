//! embedded-graphics support
//!
//! [`Ssd1306`] is a [`DrawTarget`] with [`BinaryColor`] pixels. Drawing goes
//! into the framebuffer through the same dirty tracking as the native
//! primitives; call [`Ssd1306::show`] to push it to the panel.

use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    Pixel,
};
use monoled_core::{Canvas, Color};

use crate::ssd1306::Ssd1306;

impl<T> DrawTarget for Ssd1306<T> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            self.set_pixel(x, y, Color::from(color.is_on()));
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(Color::from(color.is_on()));
        Ok(())
    }
}

impl<T> OriginDimensions for Ssd1306<T> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.config().width), u32::from(self.config().height))
    }
}
