//! Embassy tasks, one set per exercise
//!
//! Only the tasks for the exercise selected in `lab.toml` are spawned.

pub mod button;
pub mod buzzer;
pub mod dac;
pub mod lcd;
pub mod led;
pub mod uart;

pub use button::button_task;
pub use buzzer::{buzzer_gate_task, buzzer_tick_task};
pub use dac::dac_task;
pub use lcd::{adc_lcd_task, lcd_task, LcdText};
pub use led::led_task;
pub use uart::{console_rx_task, console_task, uart_echo_task};
