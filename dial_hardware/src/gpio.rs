//! Raspberry Pi GPIO backends (rppal).

use dial_traits::{ButtonPanel, ButtonState, CoilDriver};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::debug;

use crate::error::{HwError, Result};

fn gpio_err(e: rppal::gpio::Error) -> HwError {
    HwError::Gpio(e.to_string())
}

/// Four coil outputs in mask bit order A1, A2, B1, B2.
pub struct GpioCoils {
    pins: [OutputPin; 4],
}

impl GpioCoils {
    pub fn new(a1: u8, a2: u8, b1: u8, b2: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(gpio_err)?;
        let out = |pin: u8| -> Result<OutputPin> {
            let mut p = gpio.get(pin).map_err(gpio_err)?.into_output_low();
            // Restore the pin mode when the process lets go of it.
            p.set_reset_on_drop(true);
            Ok(p)
        };
        let pins = [out(a1)?, out(a2)?, out(b1)?, out(b2)?];
        debug!(a1, a2, b1, b2, "coil outputs ready");
        Ok(Self { pins })
    }
}

impl CoilDriver for GpioCoils {
    fn write_pattern(&mut self, mask: u8) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            if mask & (1 << bit) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        Ok(())
    }

    fn release(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for pin in self.pins.iter_mut() {
            pin.set_low();
        }
        debug!("coil outputs released");
        Ok(())
    }
}

/// Active-high push buttons.
pub struct GpioButtons {
    left: InputPin,
    right: InputPin,
}

impl GpioButtons {
    pub fn new(left: u8, right: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(gpio_err)?;
        Ok(Self {
            left: gpio.get(left).map_err(gpio_err)?.into_input(),
            right: gpio.get(right).map_err(gpio_err)?.into_input(),
        })
    }
}

impl ButtonPanel for GpioButtons {
    fn read(&mut self) -> std::result::Result<ButtonState, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ButtonState {
            left: self.left.is_high(),
            right: self.right.is_high(),
        })
    }
}
