//! Serial exercises: byte echo and the LED console

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::Read;
use heapless::String;

use mculab_core::config::MAX_NAME_LEN;
use mculab_drivers::switch::GpioSwitch;
use mculab_hal::UartTx;
use mculab_hal_rp2040::uart::map_error;
use mculab_hal_rp2040::{GpioPort, RpOutput, RpUartTx};
use mculab_protocol::{Console, EchoSession, ErrorAction};

use crate::channels::{RxEvent, RX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 16;

/// Echo every byte, show it on the port, and confirm
#[embassy_executor::task]
pub async fn uart_echo_task(tx: BufferedUartTx, mut rx: BufferedUartRx, port: GpioPort) {
    info!("UART echo task started");

    let mut tx = RpUartTx(tx);
    let mut session = EchoSession::new(port);
    if let Err(e) = session.greet(&mut tx) {
        warn!("Greeting failed: {:?}", e);
    }

    let mut buf = [0u8; 1];
    loop {
        match rx.read(&mut buf).await {
            Ok(0) => {}
            Ok(_) => {
                trace!("RX {=u8:#x}", buf[0]);
                if let Err(e) = session.on_byte(buf[0], &mut tx) {
                    warn!("Echo failed: {:?}", e);
                }
            }
            Err(e) => {
                let e = map_error(e);
                session.on_error(e);
                warn!("RX error {:?}, {} bytes dropped", e, session.discarded());
            }
        }
    }
}

/// Receive side of the console: forward bytes and line errors
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                for &byte in &buf[..n] {
                    RX_CHANNEL.send(RxEvent::Byte(byte)).await;
                }
            }
            Err(e) => RX_CHANNEL.send(RxEvent::Error(map_error(e))).await,
        }
    }
}

/// Console main loop: echo, assemble lines, run commands
#[embassy_executor::task]
pub async fn console_task(
    tx: BufferedUartTx,
    mut led: GpioSwitch<RpOutput>,
    device: String<MAX_NAME_LEN>,
) {
    info!("Console task started");

    let mut tx = RpUartTx(tx);
    let mut console = Console::new(&device);
    if let Err(e) = console.write_banner(&mut tx) {
        warn!("Banner failed: {:?}", e);
    }

    loop {
        match RX_CHANNEL.receive().await {
            RxEvent::Byte(byte) => {
                let feed = console.feed(byte);
                if let Err(e) = tx.write_byte(feed.echo) {
                    warn!("Echo failed: {:?}", e);
                }
                if let Some(command) = feed.command {
                    info!("Command: {}", command.as_str());
                    if let Err(e) = console.reply(&command, &mut led, &mut tx) {
                        warn!("Reply failed: {:?}", e);
                    }
                }
            }
            RxEvent::Error(e) => match console.on_error(e) {
                ErrorAction::Discard => debug!("Discarded byte: {:?}", e),
                ErrorAction::ResetReceiver => {
                    // The buffered driver clears the overrun when it reports it
                    warn!("RX overrun: {:?}", console.stats());
                }
            },
        }
    }
}
