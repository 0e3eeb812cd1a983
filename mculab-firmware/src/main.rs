//! mculab - Microcontroller Lab Exercise Firmware
//!
//! Runs one of the lab exercises (LEDs, DAC waveforms, character LCD,
//! buttons, buzzer timer, UART echo/console, ADC readout) on an RP2040
//! board. The exercise and its pins come from `lab.toml`, validated and
//! encoded at build time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::BufferedInterruptHandler;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mculab_core::buzzer::BuzzerMode;
use mculab_core::config::{Exercise, LabConfig};
use mculab_core::led::{
    BinaryCounter, Blink, FixedPattern, HexDigits, LedProgram, PatternShow, SingleBlink,
    BLINK_HOLD_MS,
};
use mculab_core::timing::{baud_error_permille, timer_period_us};
use mculab_hal_rp2040::uart::{self, UartBuffers, UartPeripherals};
use mculab_hal_rp2040::{gpio_to_uart, PinBank, PinBankPeripherals, RemainingPeripherals, RpAdc};

use crate::board::{Lcd, SetupError};

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Configuration image written by build.rs from lab.toml
static LAB_IMAGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/lab.bin"));

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Tick used when a buzzer timer setting works out to zero
const FALLBACK_TICK_US: u32 = 1000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("mculab firmware starting...");

    let p = embassy_rp::init(Default::default());
    let config = load_config();
    info!(
        "Exercise '{}' on {}",
        config.exercise.name(),
        config.device_name.as_str()
    );

    let (mut pins, remaining) = PinBankPeripherals::from_peripherals(p);
    match start(&spawner, &config, &mut pins, remaining) {
        Ok(()) => info!("Exercise running"),
        Err(e) => error!("Failed to start '{}': {:?}", config.exercise.name(), e),
    }
}

/// Decode the built-in configuration, or fall back to the LED blink
fn load_config() -> LabConfig {
    let config = match postcard::from_bytes::<LabConfig>(LAB_IMAGE) {
        Ok(config) => config,
        Err(_) => {
            error!("Configuration image unreadable, running defaults");
            return LabConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            error!("Configuration rejected ({:?}), running defaults", e);
            LabConfig::default()
        }
    }
}

/// Claim the exercise's pins and spawn its tasks
fn start(
    spawner: &Spawner,
    config: &LabConfig,
    pins: &mut PinBankPeripherals,
    remaining: RemainingPeripherals,
) -> Result<(), SetupError> {
    let map = &config.pins;

    // Typed pins first; the bank takes whatever is left
    match config.exercise {
        Exercise::UartEcho | Exercise::UartConsole => {
            let (tx_pin, rx_pin) = (map.uart_tx, map.uart_rx);
            info!("UART {:?} on GPIO{}/GPIO{}", gpio_to_uart(tx_pin), tx_pin, rx_pin);

            let settings = &config.uart;
            match baud_error_permille(config.clock, settings.baud_rate, settings.high_speed) {
                Ok(permille) => info!(
                    "{} baud, lab board divisor error {} permille",
                    settings.baud_rate, permille
                ),
                Err(_) => warn!("{} baud has no lab board divisor", settings.baud_rate),
            }

            let rp_config =
                uart::rp_config(&config.uart.to_uart_config()).map_err(|_| SetupError::Uart)?;
            let buffers = UartBuffers {
                tx: TX_BUF.init([0u8; 256]),
                rx: RX_BUF.init([0u8; 256]),
            };
            let uarts = UartPeripherals {
                uart0: remaining.uart0,
                uart1: remaining.uart1,
            };
            let serial =
                uart::open_buffered(pins, uarts, Irqs, (tx_pin, rx_pin), rp_config, buffers)?;
            let (tx, rx) = serial.split();

            let mut bank = PinBank::new(pins);
            if config.exercise == Exercise::UartEcho {
                let port = board::data_port(&mut bank, map)?;
                spawner.spawn(tasks::uart_echo_task(tx, rx, port))?;
            } else {
                let led = board::switch(&mut bank, &map.status_led)?;
                spawner.spawn(tasks::console_rx_task(rx))?;
                spawner.spawn(tasks::console_task(tx, led, config.device_name.clone()))?;
            }
        }
        Exercise::AdcLcd => {
            let adc = RpAdc::new(remaining.adc, pins, map.adc)?;
            let mut bank = PinBank::new(pins);
            let lcd = Lcd::take(&mut bank, map, config.lcd_bus)?;
            spawner.spawn(tasks::adc_lcd_task(lcd, adc, config.adc_layout, config.adc_vref_mv))?;
        }
        exercise => {
            let mut bank = PinBank::new(pins);
            start_gpio(spawner, config, exercise, &mut bank)?;
        }
    }
    Ok(())
}

/// Exercises that only need plain GPIO
fn start_gpio(
    spawner: &Spawner,
    config: &LabConfig,
    exercise: Exercise,
    bank: &mut PinBank,
) -> Result<(), SetupError> {
    let map = &config.pins;

    if let Some(program) = led_program(config) {
        let port = if exercise == Exercise::LedSingleBlink {
            board::single_led_port(bank, map)?
        } else {
            board::data_port(bank, map)?
        };
        spawner.spawn(tasks::led_task(port, program))?;
        return Ok(());
    }

    if let Some(waveform) = config.waveform().map_err(|_| SetupError::Config)? {
        let port = board::data_port(bank, map)?;
        spawner.spawn(tasks::dac_task(port, waveform))?;
        return Ok(());
    }

    match exercise {
        Exercise::Lcd => {
            let lcd = Lcd::take(bank, map, config.lcd_bus)?;
            spawner.spawn(tasks::lcd_task(lcd, config.lcd_lines.clone()))?;
        }
        Exercise::ButtonControl => {
            let button1 = board::button(bank, &map.button1)?;
            let button2 = board::button(bank, &map.button2)?;
            let relay = board::switch(bank, &map.relay)?;
            let buzzer = board::switch(bank, &map.buzzer)?;
            let leds = board::data_port(bank, map)?;
            spawner.spawn(tasks::button_task(
                button1,
                button2,
                relay,
                buzzer,
                leds,
                config.button_rotate,
            ))?;
        }
        Exercise::BuzzerTimer => {
            let mode = config.buzzer_mode;
            let buzzer = board::switch(bank, &map.buzzer)?;
            let tick_us = match timer_period_us(config.clock, mode.prescaler(), mode.preload()) {
                0 => FALLBACK_TICK_US,
                us => us,
            };
            spawner.spawn(tasks::buzzer_tick_task(buzzer, mode, tick_us))?;
            if mode == BuzzerMode::Gated {
                spawner.spawn(tasks::buzzer_gate_task())?;
            }
        }
        _ => return Err(SetupError::Config),
    }
    Ok(())
}

/// LED pattern for the LED exercises
fn led_program(config: &LabConfig) -> Option<LedProgram> {
    let program = match config.exercise {
        Exercise::LedBlink => LedProgram::Blink(Blink::new(BLINK_HOLD_MS)),
        Exercise::LedSingleBlink => LedProgram::SingleBlink(SingleBlink::new(
            config.pins.single_led_bit,
            true,
            BLINK_HOLD_MS,
        )),
        Exercise::LedCounter if config.counter_flash => {
            LedProgram::Counter(BinaryCounter::with_flash())
        }
        Exercise::LedCounter => LedProgram::Counter(BinaryCounter::new(config.counter_hold_ms)),
        Exercise::LedFixed => LedProgram::Fixed(FixedPattern::new(config.fixed_pattern)),
        Exercise::LedHexDigits => LedProgram::HexDigits(HexDigits::new()),
        Exercise::LedPatternShow => LedProgram::PatternShow(PatternShow::new()),
        _ => return None,
    };
    Some(program)
}
