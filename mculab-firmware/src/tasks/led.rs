//! LED exercises

use defmt::*;
use embassy_time::Delay;

use mculab_core::led::LedProgram;
use mculab_drivers::led_bank::LedBank;
use mculab_hal_rp2040::GpioPort;

/// Show an LED pattern on the port until it ends, then hold the last value
#[embassy_executor::task]
pub async fn led_task(port: GpioPort, program: LedProgram) {
    info!("LED task started");

    let mut bank = LedBank::new(port);
    let mut delay = Delay;

    // An active-low LED must start dark, not lit by the all-zero reset
    if let LedProgram::SingleBlink(blink) = &program {
        bank.apply(&blink.off_step());
    }

    for step in program {
        trace!("LED {=u8:#x} for {} ms", step.pattern, step.hold_ms);
        bank.show_async(&step, &mut delay).await;
    }

    info!("LED pattern done, holding {=u8:#x}", bank.pattern());
    core::future::pending::<()>().await;
}
