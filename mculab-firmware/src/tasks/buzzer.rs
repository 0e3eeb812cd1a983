//! Timer-driven buzzer
//!
//! A ticker task stands in for the timer interrupt: on every tick it asks
//! the shared buzzer state what to do with the pin. In gated mode a second
//! task plays the main loop, switching the buzzer on and off every 2 s.

use defmt::*;
use embassy_time::{Duration, Ticker, Timer};

use mculab_core::buzzer::{BuzzerMode, GATE_PERIOD_MS};
use mculab_drivers::switch::GpioSwitch;
use mculab_hal_rp2040::RpOutput;

use crate::channels::{AUTO_GATED_BUZZER, GATED_BUZZER, TIMER1_DIVIDER};

/// Timer tick: apply the mode's pin action every `tick_us`
#[embassy_executor::task]
pub async fn buzzer_tick_task(mut buzzer: GpioSwitch<RpOutput>, mode: BuzzerMode, tick_us: u32) {
    info!("Buzzer tick started: {:?}, {} us", mode, tick_us);

    let mut ticker = Ticker::every(Duration::from_micros(tick_us as u64));
    loop {
        ticker.next().await;
        let action = match mode {
            BuzzerMode::Divider => TIMER1_DIVIDER.on_tick(),
            BuzzerMode::Gated => GATED_BUZZER.on_tick(),
            BuzzerMode::AutoGated => AUTO_GATED_BUZZER.on_tick(),
        };
        buzzer.apply(action);
    }
}

/// Main-loop gate for [`BuzzerMode::Gated`]
#[embassy_executor::task]
pub async fn buzzer_gate_task() {
    info!("Buzzer gate started");

    loop {
        GATED_BUZZER.set_enabled(true);
        debug!("Buzzer on, {} ticks so far", GATED_BUZZER.ticks());
        Timer::after_millis(GATE_PERIOD_MS as u64).await;

        GATED_BUZZER.set_enabled(false);
        debug!("Buzzer off");
        Timer::after_millis(GATE_PERIOD_MS as u64).await;
    }
}
