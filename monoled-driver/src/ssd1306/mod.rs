//! SSD1306 OLED controller driver
//!
//! Drives SSD1306-class controllers in horizontal addressing mode. Drawing
//! only touches the in-memory framebuffer; [`Ssd1306::show`] sends the dirty
//! column span of each dirty page:
//!
//! ```text
//! for each dirty page p (ascending):
//!     0x21 min max        column window
//!     0x22 p p            page window
//!     data[min..=max]     one data write (chunked by the transport)
//!     mark p clean
//! ```
//!
//! A failed write stops the flush. Pages already sent stay clean, the
//! failing page and everything after it stay dirty, so calling `show` again
//! resumes where it stopped.

pub mod command;

use monoled_core::text::render_bytes;
use monoled_core::{Canvas, Color, DisplayConfig, Framebuffer, TextOutcome, WrapMode};
use monoled_hal::DisplayTransport;

use crate::error::Error;
use command::{cmd, column_window, init_sequence, page_window, INIT_LEN};

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Framebuffer allocated, controller not configured
    Uninitialized,
    /// Init sequence sent, display on
    Ready,
}

/// SSD1306 display handle
pub struct Ssd1306<T> {
    transport: T,
    config: DisplayConfig,
    framebuffer: Framebuffer,
    state: DriverState,
}

impl<T: DisplayTransport> Ssd1306<T> {
    /// Validate `config` and allocate the framebuffer
    ///
    /// No bus traffic. The handle starts [`DriverState::Uninitialized`].
    pub fn new(transport: T, config: DisplayConfig) -> Result<Self, Error<T::Error>> {
        config.validate()?;
        let framebuffer = Framebuffer::new(config.width, config.height)?;

        Ok(Self {
            transport,
            config,
            framebuffer,
            state: DriverState::Uninitialized,
        })
    }

    /// Create a handle and run [`init`](Self::init)
    ///
    /// Nothing is returned unless the display is ready.
    pub fn initialize(transport: T, config: DisplayConfig) -> Result<Self, Error<T::Error>> {
        let mut display = Self::new(transport, config)?;
        display.init()?;
        Ok(display)
    }

    /// Configure the controller, clear the screen and switch it on
    ///
    /// Calling this on a ready display does nothing. On failure the state
    /// stays [`DriverState::Uninitialized`]; commands already sent are not
    /// rolled back.
    pub fn init(&mut self) -> Result<(), Error<T::Error>> {
        if self.state == DriverState::Ready {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SSD1306 init: {}x{} @ {:#x}",
            self.config.width,
            self.config.height,
            self.config.address
        );

        let result = self.run_init();

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("SSD1306 init failed");
        }

        result?;
        self.state = DriverState::Ready;
        Ok(())
    }

    fn run_init(&mut self) -> Result<(), Error<T::Error>> {
        self.transport
            .write_commands(&init_sequence(&self.config))
            .map_err(Error::Transport)?;

        self.framebuffer.clear();
        self.show()
    }

    /// Commands [`init`](Self::init) sends, in order
    pub fn init_commands(&self) -> [u8; INIT_LEN] {
        init_sequence(&self.config)
    }

    /// Send every dirty page to the display
    pub fn show(&mut self) -> Result<(), Error<T::Error>> {
        if !self.framebuffer.is_dirty() {
            return Ok(());
        }

        for page in 0..self.framebuffer.pages() {
            let Some(span) = self.framebuffer.dirty().page(page) else {
                continue;
            };

            let sent = self
                .transport
                .write_commands(&column_window(span.start, span.end))
                .and_then(|()| self.transport.write_commands(&page_window(page)))
                .and_then(|()| {
                    self.transport
                        .write_data(self.framebuffer.page_columns(page, span))
                });

            if let Err(e) = sent {
                #[cfg(feature = "defmt")]
                defmt::warn!("SSD1306 flush failed at page {}", page);
                return Err(Error::Transport(e));
            }

            self.framebuffer.mark_page_clean(page);
        }

        Ok(())
    }

    /// Switch the panel on
    pub fn power_on(&mut self) -> Result<(), Error<T::Error>> {
        self.command(cmd::DISPLAY_ON)
    }

    /// Switch the panel off (display RAM is retained)
    pub fn power_off(&mut self) -> Result<(), Error<T::Error>> {
        self.command(cmd::DISPLAY_OFF)
    }

    /// Set contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<T::Error>> {
        self.transport
            .write_commands(&[cmd::SET_CONTRAST, contrast])
            .map_err(Error::Transport)
    }

    /// Select inverse video
    pub fn invert(&mut self, inverted: bool) -> Result<(), Error<T::Error>> {
        self.command(if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        })
    }

    fn command(&mut self, command: u8) -> Result<(), Error<T::Error>> {
        self.transport
            .write_command(command)
            .map_err(Error::Transport)
    }
}

impl<T> Ssd1306<T> {
    /// Drop the framebuffer and hand back the transport
    ///
    /// The controller is left as it is.
    pub fn release(self) -> T {
        self.transport
    }

    /// Panel configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Check if the init sequence has completed
    pub fn is_ready(&self) -> bool {
        self.state == DriverState::Ready
    }

    /// Borrow the framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Set every pixel
    pub fn fill(&mut self, color: Color) {
        self.framebuffer.fill(color);
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    /// Read back one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        self.framebuffer.pixel(x, y)
    }

    /// Draw a string with the built-in 5x8 font
    pub fn draw_text(
        &mut self,
        text: &str,
        x: u16,
        y: u16,
        color: Color,
        wrap: WrapMode,
    ) -> TextOutcome {
        render_bytes(&mut self.framebuffer, text.as_bytes(), x, y, color, wrap)
    }

    /// Draw 8-bit data, skipping anything that is not printable ASCII
    pub fn draw_bytes(
        &mut self,
        bytes: &[u8],
        x: u16,
        y: u16,
        color: Color,
        wrap: WrapMode,
    ) -> TextOutcome {
        render_bytes(&mut self.framebuffer, bytes, x, y, color, wrap)
    }
}

impl<T> Canvas for Ssd1306<T> {
    fn width(&self) -> u16 {
        self.config.width
    }

    fn height(&self) -> u16 {
        self.config.height
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> bool {
        self.framebuffer.set_pixel(x, y, color)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use super::*;
    use monoled_core::{Clip, ConfigError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Write {
        Command(u8),
        Data(Vec<u8>),
    }

    /// Transport recording every write, optionally failing the Nth one
    #[derive(Default)]
    struct RecordingTransport {
        writes: Vec<Write>,
        fail_at: Option<usize>,
    }

    impl RecordingTransport {
        fn failing_at(index: usize) -> Self {
            Self {
                writes: Vec::new(),
                fail_at: Some(index),
            }
        }

        fn check(&mut self) -> Result<(), ()> {
            if self.fail_at == Some(self.writes.len()) {
                self.fail_at = None;
                return Err(());
            }
            Ok(())
        }

        fn commands(&self) -> Vec<u8> {
            self.writes
                .iter()
                .filter_map(|w| match w {
                    Write::Command(c) => Some(*c),
                    Write::Data(_) => None,
                })
                .collect()
        }

        fn data(&self) -> Vec<&Vec<u8>> {
            self.writes
                .iter()
                .filter_map(|w| match w {
                    Write::Data(d) => Some(d),
                    Write::Command(_) => None,
                })
                .collect()
        }
    }

    impl DisplayTransport for RecordingTransport {
        type Error = ();

        fn write_command(&mut self, command: u8) -> Result<(), ()> {
            self.check()?;
            self.writes.push(Write::Command(command));
            Ok(())
        }

        fn write_data(&mut self, data: &[u8]) -> Result<(), ()> {
            self.check()?;
            self.writes.push(Write::Data(data.to_vec()));
            Ok(())
        }
    }

    fn ready_display() -> Ssd1306<RecordingTransport> {
        let mut display =
            Ssd1306::initialize(RecordingTransport::default(), DisplayConfig::default()).unwrap();
        display.transport.writes.clear();
        display
    }

    #[test]
    fn test_new_sends_nothing() {
        let display = Ssd1306::new(RecordingTransport::default(), DisplayConfig::default()).unwrap();
        assert!(display.transport().writes.is_empty());
        assert_eq!(display.state(), DriverState::Uninitialized);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = DisplayConfig {
            height: 30,
            ..DisplayConfig::default()
        };
        let result = Ssd1306::new(RecordingTransport::default(), config);
        assert!(matches!(
            result,
            Err(Error::InvalidConfig(ConfigError::InvalidHeight(30)))
        ));
    }

    #[test]
    fn test_init_sequence_then_full_clear() {
        let display =
            Ssd1306::initialize(RecordingTransport::default(), DisplayConfig::default()).unwrap();
        let writes = &display.transport().writes;

        let init: Vec<Write> = display
            .init_commands()
            .iter()
            .map(|&c| Write::Command(c))
            .collect();
        assert_eq!(writes[..INIT_LEN], init[..]);

        // 8 pages x (6 window commands + 1 data burst)
        assert_eq!(writes.len(), INIT_LEN + 8 * 7);
        let data = display.transport().data();
        assert_eq!(data.len(), 8);
        assert!(data.iter().all(|d| d.len() == 128 && d.iter().all(|&b| b == 0)));
        assert!(display.is_ready());
        assert!(!display.framebuffer().is_dirty());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut display = ready_display();
        display.set_pixel(3, 3, Color::On);

        assert!(display.init().is_ok());
        assert!(display.transport().writes.is_empty());
        // Framebuffer untouched
        assert_eq!(display.pixel(3, 3), Some(Color::On));
    }

    #[test]
    fn test_init_failure_stays_uninitialized() {
        let mut display =
            Ssd1306::new(RecordingTransport::failing_at(5), DisplayConfig::default()).unwrap();

        assert_eq!(display.init(), Err(Error::Transport(())));
        assert_eq!(display.state(), DriverState::Uninitialized);
        assert_eq!(display.transport().writes.len(), 5);

        // Retry runs the full sequence
        assert!(display.init().is_ok());
        assert!(display.is_ready());
    }

    #[test]
    fn test_initialize_failure_returns_no_handle() {
        let result =
            Ssd1306::initialize(RecordingTransport::failing_at(0), DisplayConfig::default());
        assert!(matches!(result, Err(Error::Transport(()))));
    }

    #[test]
    fn test_second_show_sends_nothing() {
        let mut display = ready_display();
        display.fill(Color::On);

        display.show().unwrap();
        assert_eq!(display.transport().data().len(), 8);

        display.transport.writes.clear();
        display.show().unwrap();
        assert!(display.transport().writes.is_empty());
    }

    #[test]
    fn test_columns_on_one_page_flush_as_one_burst() {
        let mut display = ready_display();
        display.set_pixel(10, 0, Color::On);
        display.set_pixel(50, 0, Color::On);

        display.show().unwrap();

        assert_eq!(display.transport().commands(), [0x21, 10, 50, 0x22, 0, 0]);
        let data = display.transport().data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].len(), 41);
        assert_eq!(data[0][0], 0x01);
        assert_eq!(data[0][40], 0x01);
    }

    #[test]
    fn test_pages_flushed_in_ascending_order() {
        let mut display = ready_display();
        display.set_pixel(5, 60, Color::On);
        display.set_pixel(7, 12, Color::On);

        display.show().unwrap();

        assert_eq!(
            display.transport().commands(),
            [0x21, 7, 7, 0x22, 1, 1, 0x21, 5, 5, 0x22, 7, 7]
        );
        assert_eq!(display.transport().data(), [&vec![0x10], &vec![0x10]]);
    }

    #[test]
    fn test_failed_flush_resumes_from_failing_page() {
        let mut display = ready_display();
        display.set_pixel(0, 0, Color::On);
        display.set_pixel(0, 8, Color::On);
        display.set_pixel(0, 16, Color::On);

        // Page 0 takes 7 writes, fail the data burst of page 1
        display.transport.fail_at = Some(13);
        assert_eq!(display.show(), Err(Error::Transport(())));

        assert_eq!(display.framebuffer().dirty().page(0), None);
        assert!(display.framebuffer().dirty().page(1).is_some());
        assert!(display.framebuffer().dirty().page(2).is_some());

        display.transport.writes.clear();
        display.show().unwrap();

        let commands = display.transport().commands();
        assert_eq!(commands, [0x21, 0, 0, 0x22, 1, 1, 0x21, 0, 0, 0x22, 2, 2]);
        assert!(!display.framebuffer().is_dirty());
    }

    #[test]
    fn test_show_uses_configured_geometry() {
        let transport = RecordingTransport::default();
        let mut display = Ssd1306::initialize(transport, DisplayConfig::SSD1306_128X32).unwrap();
        assert_eq!(display.transport().data().len(), 4);

        display.transport.writes.clear();
        display.set_pixel(127, 31, Color::On);
        display.show().unwrap();
        assert_eq!(display.transport().commands(), [0x21, 127, 127, 0x22, 3, 3]);
    }

    #[test]
    fn test_tall_panel_tracks_all_pages() {
        let config = DisplayConfig {
            width: 128,
            height: 128,
            ..DisplayConfig::default()
        };
        let mut display = Ssd1306::initialize(RecordingTransport::default(), config).unwrap();
        assert_eq!(display.transport().data().len(), 16);

        display.transport.writes.clear();
        display.set_pixel(0, 127, Color::On);
        display.show().unwrap();
        assert_eq!(display.transport().commands(), [0x21, 0, 0, 0x22, 15, 15]);
    }

    #[test]
    fn test_control_commands() {
        let mut display = ready_display();
        display.set_contrast(0x42).unwrap();
        display.invert(true).unwrap();
        display.invert(false).unwrap();
        display.power_off().unwrap();
        display.power_on().unwrap();

        assert_eq!(
            display.transport().commands(),
            [0x81, 0x42, 0xA7, 0xA6, 0xAE, 0xAF]
        );
    }

    #[test]
    fn test_control_command_error_propagates() {
        let mut display = ready_display();
        display.transport.fail_at = Some(0);
        assert_eq!(display.power_off(), Err(Error::Transport(())));
    }

    #[test]
    fn test_drawing_passthroughs() {
        let mut display = ready_display();

        assert_eq!(display.fill_rect(0, 0, 4, 4, Color::On), Clip::Complete);
        assert_eq!(display.pixel(3, 3), Some(Color::On));
        assert!(display.h_line(120, 0, 10, Color::On).is_clipped());

        let outcome = display.draw_text("Hi", 0, 8, Color::On, WrapMode::Truncate);
        assert_eq!(outcome.glyphs, 2);

        display.clear();
        assert_eq!(display.pixel(3, 3), Some(Color::Off));
        // Drawing never talks to the bus
        assert!(display.transport().writes.is_empty());
    }

    #[test]
    fn test_release_returns_transport() {
        let display = ready_display();
        let transport = display.release();
        assert!(transport.writes.is_empty());
    }
}
