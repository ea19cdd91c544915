//! Drawing surface trait and shape primitives
//!
//! Every shape is expressed as repeated [`Canvas::set_pixel`] calls. There is
//! no bulk path for lines or rectangles, so dirty tracking sees exactly the
//! pixels that were touched.

/// Pixel state of a monochrome display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Pixel dark (bit clear)
    #[default]
    Off,
    /// Pixel lit (bit set)
    On,
}

impl Color {
    /// Byte value that sets all 8 pixels of a page column to this color
    pub const fn fill_byte(self) -> u8 {
        match self {
            Color::Off => 0x00,
            Color::On => 0xFF,
        }
    }

    /// The opposite color
    pub const fn inverted(self) -> Self {
        match self {
            Color::Off => Color::On,
            Color::On => Color::Off,
        }
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on {
            Color::On
        } else {
            Color::Off
        }
    }
}

/// Whether a drawing operation landed entirely on the display
///
/// Drawing never fails; clipping is reported so callers and tests can tell
/// a full draw from a partial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Clip {
    /// Every pixel was inside the display
    #[default]
    Complete,
    /// At least one pixel fell outside and was dropped
    Clipped,
}

impl Clip {
    /// Clip status from a "pixel landed" flag
    pub const fn from_landed(landed: bool) -> Self {
        if landed {
            Clip::Complete
        } else {
            Clip::Clipped
        }
    }

    /// Check if anything was dropped
    pub const fn is_clipped(self) -> bool {
        matches!(self, Clip::Clipped)
    }

    /// Combine the status of two operations
    pub const fn and(self, other: Clip) -> Clip {
        match (self, other) {
            (Clip::Complete, Clip::Complete) => Clip::Complete,
            _ => Clip::Clipped,
        }
    }
}

/// A monochrome pixel surface
pub trait Canvas {
    /// Width in pixels
    fn width(&self) -> u16;

    /// Height in pixels
    fn height(&self) -> u16;

    /// Set or clear a single pixel
    ///
    /// Out-of-range coordinates are ignored. Returns `true` if the pixel was
    /// inside the surface.
    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool;

    /// Draw a horizontal line of `length` pixels starting at `(x, y)`
    fn h_line(&mut self, x: u16, y: u16, length: u16, color: Color) -> Clip {
        let mut landed = true;
        for i in 0..length {
            landed &= match x.checked_add(i) {
                Some(px) => self.set_pixel(px, y, color),
                None => false,
            };
        }
        Clip::from_landed(landed)
    }

    /// Draw a vertical line of `length` pixels starting at `(x, y)`
    fn v_line(&mut self, x: u16, y: u16, length: u16, color: Color) -> Clip {
        let mut landed = true;
        for i in 0..length {
            landed &= match y.checked_add(i) {
                Some(py) => self.set_pixel(x, py, color),
                None => false,
            };
        }
        Clip::from_landed(landed)
    }

    /// Draw a rectangle outline
    ///
    /// A zero width or height draws nothing.
    fn rect(&mut self, x: u16, y: u16, width: u16, height: u16, color: Color) -> Clip {
        if width == 0 || height == 0 {
            return Clip::Complete;
        }

        let top = self.h_line(x, y, width, color);
        let bottom = match y.checked_add(height - 1) {
            Some(bottom_y) => self.h_line(x, bottom_y, width, color),
            None => Clip::Clipped,
        };
        let left = self.v_line(x, y, height, color);
        let right = match x.checked_add(width - 1) {
            Some(right_x) => self.v_line(right_x, y, height, color),
            None => Clip::Clipped,
        };

        top.and(bottom).and(left).and(right)
    }

    /// Draw a filled rectangle, one row at a time
    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, color: Color) -> Clip {
        let mut clip = Clip::Complete;
        for i in 0..height {
            clip = clip.and(match y.checked_add(i) {
                Some(row) => self.h_line(x, row, width, color),
                None => Clip::Clipped,
            });
        }
        clip
    }
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn width(&self) -> u16 {
        (**self).width()
    }

    fn height(&self) -> u16 {
        (**self).height()
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool {
        (**self).set_pixel(x, y, color)
    }
}
