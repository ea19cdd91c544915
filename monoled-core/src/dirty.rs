//! Per-page dirty column tracking
//!
//! Each page is either clean or carries one inclusive column span covering
//! every column written since the page was last flushed. Spans only grow
//! until the page is marked clean again.

use alloc::vec::Vec;

use crate::framebuffer::FramebufferError;

/// Inclusive range of dirty columns within one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnSpan {
    /// First dirty column
    pub start: u16,
    /// Last dirty column (inclusive)
    pub end: u16,
}

impl ColumnSpan {
    /// Span covering a single column
    pub const fn single(column: u16) -> Self {
        Self {
            start: column,
            end: column,
        }
    }

    /// Number of columns covered, zero for a reversed span
    pub const fn columns(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (self.end - self.start) as usize + 1
    }

    /// Grow the span to cover `column`
    pub fn include(&mut self, column: u16) {
        self.start = self.start.min(column);
        self.end = self.end.max(column);
    }
}

/// Dirty state for every page of a framebuffer
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    /// `None` is the clean marker
    pages: Vec<Option<ColumnSpan>>,
    width: u16,
    any: bool,
}

impl DirtyTracker {
    /// Create a tracker with every page clean
    pub fn new(pages: u16, width: u16) -> Result<Self, FramebufferError> {
        let mut table = Vec::new();
        table
            .try_reserve_exact(pages as usize)
            .map_err(|_| FramebufferError::Allocation)?;
        table.resize(pages as usize, None);

        Ok(Self {
            pages: table,
            width,
            any: false,
        })
    }

    /// Record a write to `column` of `page`
    ///
    /// Out-of-range pages or columns are ignored.
    pub fn mark(&mut self, page: u16, column: u16) {
        if column >= self.width {
            return;
        }
        let Some(slot) = self.pages.get_mut(page as usize) else {
            return;
        };

        match slot {
            Some(span) => span.include(column),
            None => *slot = Some(ColumnSpan::single(column)),
        }
        self.any = true;
    }

    /// Mark every page dirty across its full width
    pub fn mark_all(&mut self) {
        if self.width == 0 {
            return;
        }
        let full = ColumnSpan {
            start: 0,
            end: self.width - 1,
        };
        for slot in &mut self.pages {
            *slot = Some(full);
        }
        self.any = !self.pages.is_empty();
    }

    /// Reset one page to clean
    pub fn mark_clean(&mut self, page: u16) {
        if let Some(slot) = self.pages.get_mut(page as usize) {
            *slot = None;
        }
        self.any = self.pages.iter().any(Option::is_some);
    }

    /// Reset every page to clean
    pub fn clear(&mut self) {
        for slot in &mut self.pages {
            *slot = None;
        }
        self.any = false;
    }

    /// Check if any page is dirty
    pub fn is_dirty(&self) -> bool {
        self.any
    }

    /// Dirty span of one page, `None` when clean or out of range
    pub fn page(&self, page: u16) -> Option<ColumnSpan> {
        self.pages.get(page as usize).copied().flatten()
    }

    /// Iterate dirty pages in ascending order
    pub fn dirty_pages(&self) -> impl Iterator<Item = (u16, ColumnSpan)> + '_ {
        self.pages
            .iter()
            .enumerate()
            .filter_map(|(page, span)| span.map(|span| (page as u16, span)))
    }

    /// Number of tracked pages
    pub fn page_count(&self) -> u16 {
        self.pages.len() as u16
    }
}
