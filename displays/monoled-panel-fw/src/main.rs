//! monoled panel demo firmware
//!
//! SSD1306 128x64 OLED on I2C1 (PB6=SCL, PB7=SDA) of an STM32F042K6.
//! Shows a boot screen, refreshes an uptime status screen once a second and
//! toggles inverse video on each button press (PA1).

#![no_std]
#![no_main]

extern crate alloc;

use core::fmt::Write as _;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::Pull;
use embassy_stm32::i2c::{self, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Instant, Ticker, Timer};
use embedded_alloc::LlffHeap as Heap;
use heapless::String;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use monoled_core::DisplayConfig;
use monoled_driver::Ssd1306;
use monoled_hal::{EmbeddedHalBus, I2cConfig, I2cInterface};
use monoled_panel::{PanelConfig, RenderOutcome, Screen, SharedDisplay};

bind_interrupts!(struct Irqs {
    EXTI0_1 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI0_1>;
});

// Framebuffer (1 KiB for 128x64) plus dirty table
#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 2 * 1024;

type Transport = I2cInterface<EmbeddedHalBus<I2c<'static, Blocking, Master>>>;
type Panel = SharedDisplay<CriticalSectionRawMutex, Transport>;

static PANEL: StaticCell<Panel> = StaticCell::new();

/// Status refresh period
const STATUS_PERIOD_MS: u64 = 1000;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("monoled panel firmware starting...");

    init_heap();

    let p = embassy_stm32::init(Default::default());

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz(I2cConfig::FAST.frequency);
    i2c_config.timeout = Duration::from_millis(100);

    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);

    let display_config = DisplayConfig::SSD1306_128X64;
    let transport = I2cInterface::new(EmbeddedHalBus::new(i2c), display_config.address);

    let display = match Ssd1306::initialize(transport, display_config) {
        Ok(display) => display,
        Err(e) => {
            error!("Failed to initialize display: {:?}", e);
            return;
        }
    };
    info!("OLED initialized");

    let panel: &'static Panel = PANEL.init(SharedDisplay::new(display, PanelConfig::default()));

    report(panel.render(&Screen::status("monoled", "Panel v0.1", "")).await);

    let button = ExtiInput::new(p.PA1, p.EXTI1, Pull::Up, Irqs);

    spawner.spawn(status_task(panel)).unwrap();
    spawner.spawn(button_task(button, panel)).unwrap();

    info!("All tasks spawned");
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

fn report<E: Format>(outcome: RenderOutcome<E>) {
    match outcome {
        RenderOutcome::Rendered(text) if !text.is_complete() => {
            debug!("Screen rendered with clipped text: {:?}", text);
        }
        RenderOutcome::Rendered(_) => {}
        RenderOutcome::RateLimited(_) => trace!("Refresh rate limited"),
        RenderOutcome::Busy => warn!("Display busy"),
        RenderOutcome::Failed(e) => warn!("Display update failed: {:?}", e),
    }
}

/// Periodic status screen
#[embassy_executor::task]
async fn status_task(panel: &'static Panel) {
    info!("Status task started");

    let mut ticker = Ticker::every(Duration::from_millis(STATUS_PERIOD_MS));

    loop {
        ticker.next().await;

        let mut uptime: String<21> = String::new();
        let _ = write!(uptime, "Uptime: {}s", Instant::now().as_secs());

        report(panel.render(&Screen::status("monoled", "Panel v0.1", &uptime)).await);
    }
}

/// Inverse video toggle
#[embassy_executor::task]
async fn button_task(mut btn: ExtiInput<'static>, panel: &'static Panel) {
    info!("Button task started");

    let mut inverted = false;

    loop {
        btn.wait_for_falling_edge().await;

        // Debounce
        Timer::after(Duration::from_millis(20)).await;

        if btn.is_low() {
            inverted = !inverted;
            match panel.with_display(|display| display.invert(inverted)).await {
                Some(Ok(())) => debug!("Inverse video: {}", inverted),
                Some(Err(e)) => warn!("Invert failed: {:?}", e),
                None => warn!("Display busy, invert skipped"),
            }

            btn.wait_for_rising_edge().await;

            // Debounce after release
            Timer::after(Duration::from_millis(50)).await;
        }
    }
}
