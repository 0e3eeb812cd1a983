//! State shared between tasks
//!
//! The lab programs shared a flag or a received byte between an interrupt
//! handler and the main loop. Here the UART receive side feeds the console
//! through a channel, and the buzzer tick reads its gate from atomics.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use mculab_core::buzzer::{
    AutoGatedBuzzer, GatedBuzzer, Timer1Divider, AUTO_GATE_TICKS, DIVIDER_OVERFLOWS,
};
use mculab_hal::UartError;

/// Channel capacity for received bytes
const RX_CHANNEL_SIZE: usize = 32;

/// What the UART receive task saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum RxEvent {
    Byte(u8),
    Error(UartError),
}

/// Console input, UART RX task to console task
pub static RX_CHANNEL: Channel<CriticalSectionRawMutex, RxEvent, RX_CHANNEL_SIZE> = Channel::new();

/// Buzzer gated by the main loop every 2 s
pub static GATED_BUZZER: GatedBuzzer = GatedBuzzer::new();

/// Buzzer that gates itself from the tick count
pub static AUTO_GATED_BUZZER: AutoGatedBuzzer = AutoGatedBuzzer::new(AUTO_GATE_TICKS);

/// Buzzer toggled once per 1000 timer overflows
pub static TIMER1_DIVIDER: Timer1Divider = Timer1Divider::new(DIVIDER_OVERFLOWS);
