//! DAC0808 on an 8-bit data port
//!
//! The DAC0808 is a parallel-input 8-bit current DAC: whatever byte sits on
//! its data lines is converted continuously, so "writing a sample" is just
//! latching the port. Waveform timing comes from how long each code is held.

use embedded_hal_async::delay::DelayNs;
use mculab_core::waveform::Sample;
use mculab_hal::{DelayMs, ParallelPort};

/// Reference voltage of the lab board's DAC stage, in mV
pub const DEFAULT_VREF_MV: u32 = 5000;

/// DAC0808 driven from a port
pub struct Dac0808<P> {
    port: P,
    vref_mv: u32,
}

impl<P: ParallelPort> Dac0808<P> {
    /// Take the port and park the output at zero
    pub fn new(port: P) -> Self {
        Self::with_vref(port, DEFAULT_VREF_MV)
    }

    pub fn with_vref(mut port: P, vref_mv: u32) -> Self {
        port.write(0x00);
        Self { port, vref_mv }
    }

    /// Latch a code on the data lines
    pub fn write(&mut self, code: u8) {
        self.port.write(code);
    }

    /// Code currently on the data lines
    pub fn code(&self) -> u8 {
        self.port.latched()
    }

    /// Nominal output for a code, in mV
    pub fn output_mv(&self, code: u8) -> u32 {
        code as u32 * self.vref_mv / 255
    }

    /// Play `count` samples with a blocking delay, returning how many were
    /// played (fewer if the generator ran dry).
    pub fn play<I, D>(&mut self, samples: &mut I, delay: &mut D, count: usize) -> usize
    where
        I: Iterator<Item = Sample>,
        D: DelayMs,
    {
        let mut played = 0;
        for sample in samples.take(count) {
            self.port.write(sample.code);
            delay.delay_us(sample.hold_us);
            played += 1;
        }
        played
    }

    /// Same as [`play`](Self::play), yielding to the executor while each
    /// sample is held.
    pub async fn play_async<I, D>(&mut self, samples: &mut I, delay: &mut D, count: usize) -> usize
    where
        I: Iterator<Item = Sample>,
        D: DelayNs,
    {
        let mut played = 0;
        for sample in samples.take(count) {
            self.port.write(sample.code);
            delay.delay_us(sample.hold_us).await;
            played += 1;
        }
        played
    }

    /// Release the port
    pub fn release(self) -> P {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockPort};
    use mculab_core::waveform::{Sawtooth, Square, Triangular};

    #[test]
    fn test_new_parks_at_zero() {
        let dac = Dac0808::new(MockPort {
            value: 0x55,
            ..Default::default()
        });
        assert_eq!(dac.code(), 0);
    }

    #[test]
    fn test_output_voltage() {
        let dac = Dac0808::new(MockPort::default());
        assert_eq!(dac.output_mv(0), 0);
        assert_eq!(dac.output_mv(255), 5000);
        assert_eq!(dac.output_mv(128), 2509);
    }

    #[test]
    fn test_square_wave_on_port() {
        let mut dac = Dac0808::new(MockPort::default());
        let mut delay = MockDelay::default();
        let played = dac.play(&mut Square::default(), &mut delay, 4);
        assert_eq!(played, 4);

        let port = dac.release();
        assert_eq!(&port.writes[1..], &[0xFF, 0x00, 0xFF, 0x00]);
        assert_eq!(delay.calls, vec![500, 500, 500, 500]);
    }

    #[test]
    fn test_sawtooth_period_on_port() {
        let mut dac = Dac0808::new(MockPort::default());
        let mut delay = MockDelay::default();
        dac.play(&mut Sawtooth::default(), &mut delay, 257);
        assert_eq!(delay.total_us, 256 * 4 + 10);
        assert_eq!(dac.code(), 0x00);
    }

    #[test]
    fn test_play_async() {
        struct Counter(u64);
        impl DelayNs for Counter {
            async fn delay_ns(&mut self, ns: u32) {
                self.0 += ns as u64;
            }
        }

        let mut dac = Dac0808::new(MockPort::default());
        let mut delay = Counter(0);
        let played =
            embassy_futures::block_on(dac.play_async(&mut Triangular::default(), &mut delay, 510));
        assert_eq!(played, 510);
        assert_eq!(delay.0, 510_000);
    }
}
