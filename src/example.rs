//! # Mock dummy structures for doc examples
//!
//! A scripted SPI bus plus no-op chip select and delay implementations, just
//! enough chip behavior to drive the documentation examples without
//! hardware.
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

/// Emulates the mode behavior of the chip: reset enters configuration mode,
/// bit-modify on CANCTRL switches it, CANSTAT reads report it back.
#[derive(Debug)]
pub struct ExampleSPIBus {
    canctrl: RefCell<u8>,
}

impl Default for ExampleSPIBus {
    fn default() -> Self {
        Self {
            canctrl: RefCell::new(0x80),
        }
    }
}

impl Transfer<u8> for ExampleSPIBus {
    type Error = Infallible;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Infallible> {
        match words[0] {
            // Reset instruction, drops into configuration mode
            0xC0 => *self.canctrl.borrow_mut() = 0x80,
            // Bit modify on CANCTRL
            0x05 if words[1] == 0x0F => {
                let mut canctrl = self.canctrl.borrow_mut();
                *canctrl = (*canctrl & !words[2]) | (words[3] & words[2]);
            }
            // Single register reads
            0x03 if words.len() == 3 => match words[1] {
                // CANSTAT reports the requested mode
                0x0E => words[2] = *self.canctrl.borrow() & 0xE0,
                // CANINTE reads back as written by configure
                0x2B => words[2] = 0x03,
                _ => {}
            },
            _ => {}
        }

        Ok(words)
    }
}

/// Chip select stand-in, ignores all state changes
pub struct ExampleCSPin {}

impl OutputPin for ExampleCSPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Delay stand-in returning immediately
pub struct ExampleDelay {}

impl DelayMs<u16> for ExampleDelay {
    fn delay_ms(&mut self, _ms: u16) {}
}
