//! Analog input abstractions

/// Errors from an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// The converter reported a failed conversion
    ConversionFailed,
}

/// A single analog input channel
///
/// Takes `&mut self` because starting a conversion mutates the converter.
pub trait AnalogInput {
    /// Start a conversion and return the right-justified raw result
    fn read_raw(&mut self) -> Result<u16, AdcError>;

    /// Converter resolution in bits (10 on the PIC18F4550)
    fn resolution_bits(&self) -> u8;

    /// Largest raw value the converter can return
    fn full_scale(&self) -> u16 {
        ((1u32 << self.resolution_bits()) - 1) as u16
    }
}
