//! DAC0808 waveform output

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Delay;

use mculab_core::waveform::Waveform;
use mculab_drivers::dac::Dac0808;
use mculab_drivers::delay::HalDelay;
use mculab_hal_rp2040::GpioPort;

/// Play a waveform on the DAC data port forever
///
/// Sample holds are a few microseconds, too short to hand back to the
/// executor, so each period is played with a blocking delay and the
/// executor runs between periods.
#[embassy_executor::task]
pub async fn dac_task(port: GpioPort, mut waveform: Waveform) {
    info!(
        "DAC task started: {:?}, period {} us",
        waveform.kind(),
        waveform.period_us()
    );

    let mut dac = Dac0808::new(port);
    let mut delay = HalDelay(Delay);
    let per_period = waveform.samples_per_period();

    loop {
        let played = dac.play(&mut waveform, &mut delay, per_period);
        if played < per_period {
            warn!("Waveform ended after {} samples", played);
            break;
        }
        yield_now().await;
    }
}
