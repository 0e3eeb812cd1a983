//! Push buttons driving the relay, buzzer and LED chase

use defmt::*;
use embassy_time::{Delay, Timer};

use mculab_core::button::{ButtonController, DEBOUNCE_MS};
use mculab_drivers::button::PushButton;
use mculab_drivers::led_bank::LedBank;
use mculab_drivers::switch::GpioSwitch;
use mculab_hal_rp2040::{GpioPort, RpInput, RpOutput};

/// Poll both buttons, apply the outputs, run the chase, repeat
#[embassy_executor::task]
pub async fn button_task(
    button1: PushButton<RpInput>,
    button2: PushButton<RpInput>,
    mut relay: GpioSwitch<RpOutput>,
    mut buzzer: GpioSwitch<RpOutput>,
    leds: GpioPort,
    rotate: bool,
) {
    let mut controller = if rotate {
        ButtonController::rotating()
    } else {
        ButtonController::sweep()
    };
    info!("Button task started: {:?} chase", controller.mode());

    let mut bank = LedBank::new(leds);
    let mut delay = Delay;

    loop {
        let decision = controller.decide(button1.is_pressed(), button2.is_pressed());

        if decision.needs_debounce() {
            Timer::after_millis(DEBOUNCE_MS as u64).await;
            if !controller.confirm(&decision, button1.is_pressed(), button2.is_pressed()) {
                trace!("Bounce on {:?} ignored", decision.selection);
                continue;
            }
        }

        if relay.is_on() != decision.relay_on {
            debug!("{:?}: relay {}", decision.selection, decision.relay_on);
        }
        relay.set_on(decision.relay_on);
        buzzer.set_on(decision.buzzer_on);

        for step in controller.chase(&decision) {
            bank.show_async(&step, &mut delay).await;
        }
    }
}
