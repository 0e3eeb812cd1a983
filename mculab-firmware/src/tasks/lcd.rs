//! LCD exercises: fixed text and ADC readout

use defmt::*;
use embassy_time::Timer;
use heapless::String;

use mculab_core::adc::{title_lines, AdcReading, ReadoutLayout, REFRESH_MS, TITLE_MS};
use mculab_core::config::MAX_LINE_LEN;
use mculab_core::display::CharacterDisplay;
use mculab_hal::AnalogInput;
use mculab_hal_rp2040::RpAdc;

use crate::board::Lcd;

/// Two lines of LCD text
pub type LcdText = [String<MAX_LINE_LEN>; 2];

/// Write two lines once and leave them
#[embassy_executor::task]
pub async fn lcd_task(mut lcd: Lcd, text: LcdText) {
    info!("LCD task started");

    for (row, line) in (0u8..).zip(text.iter()) {
        if let Err(e) = lcd.write_line(row, line) {
            error!("LCD write failed on row {}: {:?}", row, e);
        }
    }
    info!("LCD text written");
}

/// Title screen, then the ADC reading refreshed every 500 ms
#[embassy_executor::task]
pub async fn adc_lcd_task(mut lcd: Lcd, mut adc: RpAdc, layout: ReadoutLayout, vref_mv: u32) {
    info!("ADC task started: vref {} mV, {:?} layout", vref_mv, layout);

    for (row, line) in (0u8..).zip(title_lines()) {
        if let Err(e) = lcd.write_line(row, line) {
            warn!("LCD title failed: {:?}", e);
        }
    }
    Timer::after_millis(TITLE_MS as u64).await;
    if let Err(e) = lcd.clear() {
        warn!("LCD clear failed: {:?}", e);
    }

    loop {
        match adc.read_raw() {
            Ok(raw) => {
                let reading = AdcReading::new(raw, adc.resolution_bits());
                debug!("ADC raw {} = {} mV", raw, reading.millivolts(vref_mv));
                for (row, line) in (0u8..).zip(reading.lines(layout, vref_mv).iter()) {
                    if let Err(e) = lcd.write_line(row, line) {
                        warn!("LCD update failed: {:?}", e);
                    }
                }
            }
            Err(e) => warn!("ADC conversion failed: {:?}", e),
        }
        Timer::after_millis(REFRESH_MS as u64).await;
    }
}
