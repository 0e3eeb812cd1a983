//! Buffered UART on configurable pins
//!
//! RP2040 has two UART peripherals, each reachable from a handful of pin
//! pairs. The pair comes from `lab.toml`, picks the peripheral, and is
//! opened with interrupt-driven ring buffers.

use embassy_rp::interrupt::typelevel::{Binding, UART0_IRQ, UART1_IRQ};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{
    self, BufferedInterruptHandler, BufferedUart, BufferedUartTx, Config, DataBits as RpDataBits,
    Parity as RpParity, StopBits as RpStopBits,
};
use embassy_rp::Peri;
use mculab_hal::uart::{DataBits, Parity, StopBits};
use mculab_hal::{UartConfig, UartError, UartTx};

use crate::pins::{PinBankPeripherals, PinError};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
pub fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Translate a driver error
pub fn map_error(error: uart::Error) -> UartError {
    match error {
        uart::Error::Framing => UartError::Framing,
        uart::Error::Overrun => UartError::Overrun,
        uart::Error::Parity => UartError::Parity,
        // A break is a frame of zeros with no stop bit
        uart::Error::Break => UartError::Framing,
        _ => UartError::Other,
    }
}

/// embassy-rp line settings for a frame format
///
/// The RP2040 UART has no 9-bit mode.
pub fn rp_config(config: &UartConfig) -> Result<Config, UartError> {
    let mut rp = Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => RpDataBits::DataBits7,
        DataBits::Eight => RpDataBits::DataBits8,
        DataBits::Nine => return Err(UartError::Other),
    };
    rp.parity = match config.parity {
        Parity::None => RpParity::ParityNone,
        Parity::Even => RpParity::ParityEven,
        Parity::Odd => RpParity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => RpStopBits::STOP1,
        StopBits::Two => RpStopBits::STOP2,
    };
    Ok(rp)
}

/// Both UART peripherals; the one the pins select is used
pub struct UartPeripherals {
    pub uart0: Peri<'static, UART0>,
    pub uart1: Peri<'static, UART1>,
}

/// Ring buffers for a buffered UART
pub struct UartBuffers {
    pub tx: &'static mut [u8],
    pub rx: &'static mut [u8],
}

/// Open the UART behind a TX/RX pin pair
pub fn open_buffered<I>(
    pins: &mut PinBankPeripherals,
    uarts: UartPeripherals,
    irqs: I,
    (tx, rx): (u8, u8),
    config: Config,
    buffers: UartBuffers,
) -> Result<BufferedUart, PinError>
where
    I: Binding<UART0_IRQ, BufferedInterruptHandler<UART0>>
        + Binding<UART1_IRQ, BufferedInterruptHandler<UART1>>,
{
    macro_rules! open {
        ($uart:expr, $tx:ident, $rx:ident) => {{
            let tx_pin = pins.$tx.take().ok_or(PinError::AlreadyTaken)?;
            let rx_pin = pins.$rx.take().ok_or(PinError::AlreadyTaken)?;
            Ok(BufferedUart::new(
                $uart, tx_pin, rx_pin, irqs, buffers.tx, buffers.rx, config,
            ))
        }};
    }

    match (tx, rx) {
        (0, 1) => open!(uarts.uart0, pin0, pin1),
        (12, 13) => open!(uarts.uart0, pin12, pin13),
        (16, 17) => open!(uarts.uart0, pin16, pin17),
        (4, 5) => open!(uarts.uart1, pin4, pin5),
        (8, 9) => open!(uarts.uart1, pin8, pin9),
        (20, 21) => open!(uarts.uart1, pin20, pin21),
        (24, 25) => open!(uarts.uart1, pin24, pin25),
        _ if tx > 29 || rx > 29 => Err(PinError::InvalidPin),
        _ => Err(PinError::WrongFunction),
    }
}

/// Blocking [`UartTx`] over the buffered transmitter
pub struct RpUartTx(pub BufferedUartTx);

impl UartTx for RpUartTx {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
        embedded_io::Write::write_all(&mut self.0, data).map_err(map_error)
    }

    fn flush(&mut self) -> Result<(), UartError> {
        embedded_io::Write::flush(&mut self.0).map_err(map_error)
    }
}
