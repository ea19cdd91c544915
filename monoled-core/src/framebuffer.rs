//! Page-organized monochrome framebuffer
//!
//! The buffer mirrors the controller's display RAM: `pages * width` bytes,
//! one byte per column per page. Every write goes through [`Framebuffer::set_pixel`]
//! or [`Framebuffer::fill`], which keep the [`DirtyTracker`] in sync.

use alloc::vec::Vec;
use core::fmt;

use crate::canvas::{Canvas, Color};
use crate::config::{validate_dimensions, ConfigError, PAGE_HEIGHT};
use crate::dirty::{ColumnSpan, DirtyTracker};

/// Errors creating a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramebufferError {
    /// Dimensions cannot be addressed by the controller
    Dimensions(ConfigError),
    /// Buffer memory could not be reserved
    Allocation,
}

impl From<ConfigError> for FramebufferError {
    fn from(e: ConfigError) -> Self {
        FramebufferError::Dimensions(e)
    }
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimensions(e) => write!(f, "{}", e),
            Self::Allocation => write!(f, "failed to allocate framebuffer"),
        }
    }
}

/// In-memory copy of display RAM with dirty tracking
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u16,
    height: u16,
    pages: u16,
    buffer: Vec<u8>,
    dirty: DirtyTracker,
}

impl Framebuffer {
    /// Allocate a cleared framebuffer
    ///
    /// All pages start clean: the buffer matches a freshly reset controller
    /// only after the first [`fill`](Self::fill) and flush.
    pub fn new(width: u16, height: u16) -> Result<Self, FramebufferError> {
        validate_dimensions(width, height)?;

        let pages = height / PAGE_HEIGHT;
        let len = pages as usize * width as usize;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| FramebufferError::Allocation)?;
        buffer.resize(len, 0);

        Ok(Self {
            width,
            height,
            pages,
            buffer,
            dirty: DirtyTracker::new(pages, width)?,
        })
    }

    /// Number of 8-row pages
    pub fn pages(&self) -> u16 {
        self.pages
    }

    /// Byte offset and bit mask of a pixel, `None` when out of bounds
    fn locate(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y / PAGE_HEIGHT) as usize * self.width as usize + x as usize;
        Some((offset, 1 << (y % PAGE_HEIGHT)))
    }

    /// Read back one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        let (offset, mask) = self.locate(x, y)?;
        self.buffer
            .get(offset)
            .map(|byte| Color::from(byte & mask != 0))
    }

    /// Set every pixel and mark the whole display dirty
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color.fill_byte());
        self.dirty.mark_all();
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(Color::Off);
    }

    /// Raw display RAM contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes of one page covering `span`, in column order
    ///
    /// Returns an empty slice if the page or span is outside the buffer.
    pub fn page_columns(&self, page: u16, span: ColumnSpan) -> &[u8] {
        if page >= self.pages || span.end >= self.width || span.start > span.end {
            return &[];
        }
        let base = page as usize * self.width as usize;
        self.buffer
            .get(base + span.start as usize..=base + span.end as usize)
            .unwrap_or(&[])
    }

    /// Dirty state
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Check if anything changed since the last flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Mark one page as transmitted
    pub fn mark_page_clean(&mut self, page: u16) {
        self.dirty.mark_clean(page);
    }

    /// Mark the whole buffer as transmitted
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }
}

impl Canvas for Framebuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool {
        let Some((offset, mask)) = self.locate(x, y) else {
            return false;
        };
        let Some(byte) = self.buffer.get_mut(offset) else {
            return false;
        };

        match color {
            Color::On => *byte |= mask,
            Color::Off => *byte &= !mask,
        }
        self.dirty.mark(y / PAGE_HEIGHT, x);
        true
    }
}
