//! Property-based tests for framebuffer pixel addressing, dirty tracking and
//! text layout.

use monoled_core::{Canvas, Color, ColumnSpan, Framebuffer, TextExt, WrapMode};

/// Heights the controller can address: multiples of 8 up to 128
fn height_strategy() -> impl proptest::strategy::Strategy<Value = u16> {
    use proptest::strategy::Strategy;
    (1u16..=16).prop_map(|pages| pages * 8)
}

proptest::proptest! {
    /// A pixel written inside the buffer reads back with the same color.
    #[test]
    fn set_pixel_reads_back(x in 0u16..128, y in 0u16..64, on in proptest::bool::ANY) {
        let mut fb = Framebuffer::new(128, 64).unwrap();
        fb.fill(Color::from(!on));

        assert!(fb.set_pixel(x, y, Color::from(on)));
        assert_eq!(fb.pixel(x, y), Some(Color::from(on)));
    }

    /// Writing one pixel never changes any other bit of the buffer.
    #[test]
    fn set_pixel_touches_one_bit(x in 0u16..128, y in 0u16..64) {
        let mut fb = Framebuffer::new(128, 64).unwrap();
        fb.set_pixel(x, y, Color::On);

        let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 1);
        assert_eq!(fb.as_bytes()[(y / 8) as usize * 128 + x as usize], 1u8 << (y % 8));
    }

    /// Out-of-bounds writes leave buffer and dirty state untouched.
    #[test]
    fn out_of_bounds_is_noop(x in 128u16..=u16::MAX, y in 0u16..=u16::MAX) {
        let mut fb = Framebuffer::new(128, 64).unwrap();

        assert!(!fb.set_pixel(x, y, Color::On));
        assert!(!fb.set_pixel(y % 128, 64u16.saturating_add(y % 1000), Color::On));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert!(!fb.is_dirty());
    }

    /// Every dirty span stays inside the width and covers every written column.
    #[test]
    fn dirty_spans_cover_writes(points in proptest::collection::vec((0u16..96, 0u16..32), 1..40)) {
        let mut fb = Framebuffer::new(96, 32).unwrap();
        for &(x, y) in &points {
            fb.set_pixel(x, y, Color::On);
        }

        for (page, span) in fb.dirty().dirty_pages() {
            assert!(span.start <= span.end);
            assert!(span.end < 96);
            let columns: Vec<u16> = points
                .iter()
                .filter(|&&(_, y)| y / 8 == page)
                .map(|&(x, _)| x)
                .collect();
            assert_eq!(span.start, *columns.iter().min().unwrap());
            assert_eq!(span.end, *columns.iter().max().unwrap());
        }
    }

    /// `fill` marks every page dirty across the full width for any geometry.
    #[test]
    fn fill_marks_everything(width in 1u16..=256, height in height_strategy(), on in proptest::bool::ANY) {
        let mut fb = Framebuffer::new(width, height).unwrap();
        fb.fill(Color::from(on));

        let expected = if on { 0xFF } else { 0x00 };
        assert!(fb.as_bytes().iter().all(|&b| b == expected));
        assert_eq!(fb.dirty().dirty_pages().count(), (height / 8) as usize);
        for (_, span) in fb.dirty().dirty_pages() {
            assert_eq!(span, ColumnSpan { start: 0, end: width - 1 });
        }
    }

    /// Text layout never panics and never writes outside the canvas.
    #[test]
    fn text_never_escapes_canvas(
        bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..80),
        x in 0u16..200,
        y in 0u16..100,
        wrap in proptest::bool::ANY,
    ) {
        let mut fb = Framebuffer::new(128, 32).unwrap();
        let mode = if wrap { WrapMode::Wrap } else { WrapMode::Truncate };
        let outcome = fb.draw_bytes(&bytes, x, y, Color::On, mode);

        assert_eq!(fb.as_bytes().len(), 512);
        assert!(outcome.glyphs as usize + outcome.skipped as usize <= bytes.len());
    }
}
