//! Gauge firmware entry point for the Raspberry Pi Pico 2 W
//!
//! Board wiring:
//! - DS3231 on I2C0 (SDA GP4, SCL GP5), INT/SQW on GP6 (pull-up, active low)
//! - HC-SR04 trigger on GP14, echo on GP15
//! - SD card on SPI0 (MISO GP16, CS GP17, SCK GP18, MOSI GP19)
//! - Status LED on GP25 (external on the Pico 2 W, whose onboard LED hangs
//!   off the radio chip)
//!
//! The interrupt handler only clears the pin interrupt and raises the wake
//! flag; everything else happens in the main loop, which sleeps between
//! alarms.

#![cfg_attr(feature = "pico2_w", no_std)]
#![cfg_attr(feature = "pico2_w", no_main)]

#[cfg(feature = "pico2_w")]
mod firmware {
    use core::cell::RefCell;

    use critical_section::Mutex;
    use defmt_rtt as _;
    use panic_probe as _;
    use rp235x_hal as hal;

    use hal::fugit::RateExtU32;
    use hal::gpio::{self, bank0, FunctionSio, PullUp, SioInput};
    use hal::pac::{self, interrupt};
    use hal::Clock;

    use embedded_hal_bus::spi::ExclusiveDevice;
    use embedded_sdmmc::SdCard;

    use pico_gauge::core::config;
    use pico_gauge::core::logger::{DataLogger, State};
    use pico_gauge::core::wake::WakeFlag;
    use pico_gauge::devices::ds3231::Ds3231;
    use pico_gauge::devices::hcsr04::Hcsr04;
    use pico_gauge::platform::rp2350::{Rp2350Gpio, Rp2350I2c, Rp2350Timer};
    use pico_gauge::platform::traits::GpioMode;
    use pico_gauge::storage::sdcard::SdCardStorage;
    use pico_gauge::{log_error, log_info, log_warn};

    /// Tell the boot ROM about our application
    #[link_section = ".start_block"]
    #[used]
    pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

    /// External crystal frequency on the Pico 2 W
    const XTAL_FREQ_HZ: u32 = 12_000_000;

    /// DS3231 INT/SQW line, parked in a static so the handler can ack it
    type AlarmPin = gpio::Pin<bank0::Gpio6, FunctionSio<SioInput>, PullUp>;
    static ALARM_LINE: Mutex<RefCell<Option<AlarmPin>>> = Mutex::new(RefCell::new(None));

    /// Wake signal from the alarm interrupt to the main loop
    static WAKE: WakeFlag = WakeFlag::new();

    #[hal::entry]
    fn main() -> ! {
        let mut pac = pac::Peripherals::take().unwrap();
        let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
        let clocks = hal::clocks::init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);
        let sio = hal::Sio::new(pac.SIO);
        let pins = hal::gpio::Pins::new(pac.IO_BANK0, pac.PADS_BANK0, sio.gpio_bank0, &mut pac.RESETS);

        log_info!("pico_gauge starting");

        // DS3231 on I2C0
        let sda_pin: gpio::Pin<_, gpio::FunctionI2c, PullUp> = pins.gpio4.reconfigure();
        let scl_pin: gpio::Pin<_, gpio::FunctionI2c, PullUp> = pins.gpio5.reconfigure();
        let i2c = hal::I2C::i2c0(
            pac.I2C0,
            sda_pin,
            scl_pin,
            400.kHz(),
            &mut pac.RESETS,
            &clocks.system_clock,
        );
        let mut rtc = Ds3231::new(Rp2350I2c::new(i2c));
        match rtc.begin() {
            Ok(()) => {
                // A dead backup battery leaves the clock meaningless; seed it
                // from the build timestamp so logging can resume.
                if rtc.lost_power().unwrap_or(true) {
                    if let Some(build_time) = chrono::DateTime::from_timestamp(config::BUILD_UNIX, 0)
                    {
                        log_warn!("rtc lost power, seeding from build time");
                        let _ = rtc.set_time(&build_time.naive_utc());
                    }
                }
            }
            // start() probes the clock again and goes fatal with the LED
            Err(e) => log_error!("rtc probe failed: {:?}", e),
        }

        // SD card on SPI0
        let spi_mosi = pins.gpio19.into_function::<gpio::FunctionSpi>();
        let spi_miso = pins.gpio16.into_function::<gpio::FunctionSpi>();
        let spi_sclk = pins.gpio18.into_function::<gpio::FunctionSpi>();
        let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI0, (spi_mosi, spi_miso, spi_sclk));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            400.kHz(),
            embedded_hal_1::spi::MODE_0,
        );
        let sd_cs = pins.gpio17.into_push_pull_output_in_state(gpio::PinState::High);
        let spi_device = ExclusiveDevice::new(spi, sd_cs, timer).unwrap();
        let storage = SdCardStorage::new(SdCard::new(spi_device, timer), config::LOG_FILENAME);

        // HC-SR04
        let sensor = Hcsr04::new(
            Rp2350Gpio::new(pins.gpio14.into_push_pull_output(), GpioMode::OutputPushPull),
            Rp2350Gpio::new(pins.gpio15.into_pull_down_input(), GpioMode::InputPullDown),
            Rp2350Timer::new(timer),
        );

        // Status LED
        let led = Rp2350Gpio::new(pins.gpio25.into_push_pull_output(), GpioMode::OutputPushPull);

        // Alarm line: falling edge raises the wake flag
        let alarm_line: AlarmPin = pins.gpio6.reconfigure();
        alarm_line.set_interrupt_enabled(gpio::Interrupt::EdgeLow, true);
        critical_section::with(|cs| ALARM_LINE.borrow(cs).replace(Some(alarm_line)));
        unsafe {
            cortex_m::peripheral::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0);
        }

        let mut gauge = DataLogger::new(rtc, sensor, storage, led, Rp2350Timer::new(timer));

        // On fatal init errors the loop below just keeps the LED blinking
        let _ = gauge.start();

        loop {
            if let State::Fatal(_) = gauge.state() {
                gauge.poll(&WAKE);
                continue;
            }
            if WAKE.is_set() {
                gauge.poll(&WAKE);
            } else {
                // An alarm edge between the check and here still wakes us:
                // the handler's exception return sets the event register.
                cortex_m::asm::wfe();
            }
        }
    }

    #[interrupt]
    fn IO_IRQ_BANK0() {
        critical_section::with(|cs| {
            if let Some(pin) = ALARM_LINE.borrow(cs).borrow_mut().as_mut() {
                if pin.interrupt_status(gpio::Interrupt::EdgeLow) {
                    pin.clear_interrupt(gpio::Interrupt::EdgeLow);
                    WAKE.signal();
                }
            }
        });
    }
}

#[cfg(not(feature = "pico2_w"))]
fn main() {
    // Firmware target only; host builds exist for the test suite.
}
