//! Display shared between tasks
//!
//! The display handle and the refresh governor live behind one async mutex.
//! A render clears the framebuffer, draws the screen and flushes while
//! holding the lock once; the guard is dropped on every return path.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration, Instant};
use monoled_core::TextOutcome;
use monoled_driver::{Error, Ssd1306};
use monoled_hal::DisplayTransport;

use crate::config::PanelConfig;
use crate::governor::RefreshGovernor;
use crate::screen::Screen;

/// Result of one render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome<E> {
    /// Drawn and flushed
    Rendered(TextOutcome),
    /// Drawn, flush skipped by the governor; goes out with the next flush
    RateLimited(TextOutcome),
    /// Lock not acquired in time, nothing drawn
    Busy,
    /// Drawn, flush failed; dirty pages are retried by the next flush
    Failed(Error<E>),
}

impl<E> RenderOutcome<E> {
    /// Check if the frame reached the panel
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }
}

struct PanelState<T> {
    display: Ssd1306<T>,
    governor: RefreshGovernor,
}

impl<T: DisplayTransport> PanelState<T> {
    /// `clock` is read under the lock: once for the governor check and once
    /// after the flush completes
    fn render(
        &mut self,
        screen: &Screen<'_>,
        clock: impl Fn() -> Instant,
    ) -> RenderOutcome<T::Error> {
        self.display.clear();
        let text = screen.draw(&mut self.display);

        if screen.kind().is_throttled() && !self.governor.ready(clock()) {
            return RenderOutcome::RateLimited(text);
        }

        match self.flush(clock) {
            Ok(()) => RenderOutcome::Rendered(text),
            Err(e) => RenderOutcome::Failed(e),
        }
    }

    /// Only a flush that reached the bus moves the governor window
    fn flush(&mut self, clock: impl Fn() -> Instant) -> Result<(), Error<T::Error>> {
        if !self.display.framebuffer().is_dirty() {
            return Ok(());
        }
        self.display.show()?;
        self.governor.record(clock());
        Ok(())
    }
}

/// Display handle shared between tasks
pub struct SharedDisplay<M: RawMutex, T> {
    state: Mutex<M, PanelState<T>>,
    config: PanelConfig,
}

impl<M: RawMutex, T: DisplayTransport> SharedDisplay<M, T> {
    /// Take ownership of an initialized display
    pub fn new(display: Ssd1306<T>, config: PanelConfig) -> Self {
        Self {
            state: Mutex::new(PanelState {
                display,
                governor: RefreshGovernor::new(config.min_refresh_interval()),
            }),
            config,
        }
    }

    /// Timing configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Render `screen` now
    ///
    /// Waits for the lock at most the screen kind's lock timeout. The
    /// governor sees the time after the lock is taken and records the time
    /// the flush finished.
    pub async fn render(&self, screen: &Screen<'_>) -> RenderOutcome<T::Error> {
        self.render_with(screen, Instant::now).await
    }

    /// Render `screen` with a fixed timestamp for the governor check and
    /// record
    pub async fn render_at(&self, screen: &Screen<'_>, now: Instant) -> RenderOutcome<T::Error> {
        self.render_with(screen, || now).await
    }

    async fn render_with(
        &self,
        screen: &Screen<'_>,
        clock: impl Fn() -> Instant,
    ) -> RenderOutcome<T::Error> {
        let timeout = self.config.lock_timeout(screen.kind());
        let Ok(mut state) = with_timeout(timeout, self.state.lock()).await else {
            #[cfg(feature = "defmt")]
            defmt::warn!("display busy, {} screen skipped", screen.kind());
            return RenderOutcome::Busy;
        };

        let outcome = state.render(screen, clock);

        #[cfg(feature = "defmt")]
        if let RenderOutcome::Failed(_) = outcome {
            defmt::warn!("display flush failed, {} screen", screen.kind());
        }

        outcome
    }

    /// Render `screen` only if the lock is free right now
    pub fn try_render(&self, screen: &Screen<'_>) -> RenderOutcome<T::Error> {
        match self.state.try_lock() {
            Ok(mut state) => state.render(screen, Instant::now),
            Err(_) => RenderOutcome::Busy,
        }
    }

    /// Push anything left dirty by a rate-limited or failed render
    ///
    /// Returns [`RenderOutcome::Rendered`] with an empty text outcome when
    /// the panel is up to date.
    pub async fn flush_pending(&self) -> RenderOutcome<T::Error> {
        let timeout = Duration::from_millis(u64::from(self.config.status_lock_ms));
        let Ok(mut state) = with_timeout(timeout, self.state.lock()).await else {
            return RenderOutcome::Busy;
        };

        match state.flush(Instant::now) {
            Ok(()) => RenderOutcome::Rendered(TextOutcome::default()),
            Err(e) => RenderOutcome::Failed(e),
        }
    }

    /// Run `f` with exclusive access to the display
    ///
    /// Returns `None` if the lock was not acquired within the content lock
    /// timeout. Nothing is flushed automatically.
    pub async fn with_display<R>(&self, f: impl FnOnce(&mut Ssd1306<T>) -> R) -> Option<R> {
        let timeout = Duration::from_millis(u64::from(self.config.content_lock_ms));
        let mut state = with_timeout(timeout, self.state.lock()).await.ok()?;
        Some(f(&mut state.display))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::Timer;
    use monoled_core::{Color, DisplayConfig};

    use super::*;

    /// Transport counting data bursts through a shared log
    #[derive(Clone, Default)]
    struct LogTransport {
        bursts: Rc<RefCell<Vec<usize>>>,
        fail: Rc<RefCell<bool>>,
    }

    impl DisplayTransport for LogTransport {
        type Error = ();

        fn write_command(&mut self, _command: u8) -> Result<(), ()> {
            if *self.fail.borrow() {
                return Err(());
            }
            Ok(())
        }

        fn write_data(&mut self, data: &[u8]) -> Result<(), ()> {
            if *self.fail.borrow() {
                return Err(());
            }
            self.bursts.borrow_mut().push(data.len());
            Ok(())
        }
    }

    fn shared() -> (SharedDisplay<NoopRawMutex, LogTransport>, LogTransport) {
        let transport = LogTransport::default();
        let display = Ssd1306::initialize(transport.clone(), DisplayConfig::default()).unwrap();
        transport.bursts.borrow_mut().clear();
        (SharedDisplay::new(display, PanelConfig::default()), transport)
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_render_flushes_and_reports_text() {
        let (panel, transport) = shared();
        let outcome = block_on(panel.render_at(&Screen::status("Up", "", ""), at(0)));

        match outcome {
            RenderOutcome::Rendered(text) => assert_eq!(text.glyphs, 2),
            other => panic!("unexpected {:?}", other),
        }
        // Clear marks every page, so all eight go out
        assert_eq!(transport.bursts.borrow().len(), 8);
    }

    #[test]
    fn test_status_within_interval_is_rate_limited() {
        let (panel, transport) = shared();
        block_on(panel.render_at(&Screen::status("one", "", ""), at(1000)));
        transport.bursts.borrow_mut().clear();

        let outcome = block_on(panel.render_at(&Screen::status("two", "", ""), at(1050)));
        assert!(matches!(outcome, RenderOutcome::RateLimited(_)));
        assert!(transport.bursts.borrow().is_empty());

        // Drawn anyway, waiting for the next flush
        let dirty = block_on(panel.with_display(|d| d.framebuffer().is_dirty()));
        assert_eq!(dirty, Some(true));

        let outcome = block_on(panel.render_at(&Screen::status("three", "", ""), at(1100)));
        assert!(outcome.is_rendered());
        assert!(!transport.bursts.borrow().is_empty());
    }

    #[test]
    fn test_non_status_screens_ignore_governor() {
        let (panel, _) = shared();
        block_on(panel.render_at(&Screen::status("a", "", ""), at(0)));

        let outcome = block_on(panel.render_at(&Screen::joke("knock knock"), at(10)));
        assert!(outcome.is_rendered());

        // The joke refresh restarts the window for status screens
        let outcome = block_on(panel.render_at(&Screen::blank(), at(105)));
        assert!(matches!(outcome, RenderOutcome::RateLimited(_)));
    }

    #[test]
    fn test_flush_pending_sends_rate_limited_frame() {
        let (panel, transport) = shared();
        block_on(panel.render_at(&Screen::status("a", "", ""), at(0)));
        block_on(panel.render_at(&Screen::status("b", "", ""), at(1)));
        transport.bursts.borrow_mut().clear();

        assert!(block_on(panel.flush_pending()).is_rendered());
        assert_eq!(transport.bursts.borrow().len(), 8);

        transport.bursts.borrow_mut().clear();
        assert!(block_on(panel.flush_pending()).is_rendered());
        assert!(transport.bursts.borrow().is_empty());
    }

    #[test]
    fn test_clean_flush_pending_keeps_window() {
        let (panel, _) = shared();
        block_on(panel.render_at(&Screen::status("a", "", ""), at(0)));
        let recorded = panel.state.try_lock().unwrap().governor.last_refresh();

        assert!(block_on(panel.flush_pending()).is_rendered());
        assert_eq!(panel.state.try_lock().unwrap().governor.last_refresh(), recorded);
    }

    #[test]
    fn test_refresh_recorded_after_lock_wait() {
        let (panel, _) = shared();
        let started = Instant::now();

        let first = block_on(async {
            let hold = async {
                let _guard = panel.state.lock().await;
                Timer::after(Duration::from_millis(80)).await;
            };
            let (_, outcome) = join(hold, panel.render(&Screen::status("one", "", ""))).await;
            outcome
        });
        assert!(first.is_rendered());

        let recorded = panel.state.try_lock().unwrap().governor.last_refresh().unwrap();
        assert!(recorded.duration_since(started) >= Duration::from_millis(80));

        // 30 ms after the real flush, well past 100 ms since the request
        block_on(Timer::after(Duration::from_millis(30)));
        let second = block_on(panel.render(&Screen::status("two", "", "")));
        assert!(matches!(second, RenderOutcome::RateLimited(_)));
    }

    #[test]
    fn test_failed_flush_is_retried() {
        let (panel, transport) = shared();
        *transport.fail.borrow_mut() = true;

        let outcome = block_on(panel.render_at(&Screen::error("disk full"), at(0)));
        assert_eq!(outcome, RenderOutcome::Failed(Error::Transport(())));

        *transport.fail.borrow_mut() = false;
        assert!(block_on(panel.flush_pending()).is_rendered());
        assert_eq!(transport.bursts.borrow().len(), 8);
    }

    #[test]
    fn test_locked_display_reports_busy() {
        let (panel, _) = shared();

        let outcome = block_on(async {
            let _guard = panel.state.lock().await;
            panel.render(&Screen::connecting()).await
        });
        assert_eq!(outcome, RenderOutcome::Busy);
    }

    #[test]
    fn test_try_render_does_not_wait() {
        let (panel, _) = shared();

        let outcome = block_on(async {
            let _guard = panel.state.lock().await;
            panel.try_render(&Screen::connecting())
        });
        assert_eq!(outcome, RenderOutcome::Busy);

        assert!(panel.try_render(&Screen::connecting()).is_rendered());
    }

    #[test]
    fn test_with_display_gives_exclusive_access() {
        let (panel, transport) = shared();

        let lit = block_on(panel.with_display(|display| {
            display.fill(Color::On);
            display.show().unwrap();
            display.pixel(0, 0)
        }));
        assert_eq!(lit, Some(Some(Color::On)));
        assert_eq!(transport.bursts.borrow().len(), 8);
    }
}
