//!# CAN controller device
//!
//! [MCP2515] drives the chip over its SPI instruction set and splits into the
//! three paths of the system: one-time configuration, the interrupt-driven
//! receive path feeding a [crate::queue::FrameQueue], and the transmit path.
//!
//! ```
//! use mcp2515::can::MCP2515;
//! use mcp2515::config::Configuration;
//! use mcp2515::example::{ExampleCSPin, ExampleDelay, ExampleSPIBus};
//!
//! let mut controller = MCP2515::new(ExampleSPIBus::default(), ExampleCSPin {});
//!
//! controller
//!     .configure(&Configuration::default(), &mut ExampleDelay {})
//!     .unwrap();
//! ```
use crate::config::Configuration;
use crate::frame::{CanFrame, REGISTER_IMAGE_LEN};
use crate::queue::Producer;
use crate::registers::{BfpCtrlReg, DlcReg, Instruction, IntFlags, Register, SidlReg};
use crate::status::{OperationMode, Status};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use log::{debug, warn};

pub use crate::registers::{RxBuffer, TxBuffer};

/// Mask of the REQOP bits in CANCTRL
const OP_MODE_MASK: u8 = 0xE0;

/// Settle time after a reset instruction before the chip is addressable
const RESET_SETTLE_MS: u16 = 10;

/// CANSTAT polls before giving up on a requested mode change
const MODE_CHANGE_RETRIES: usize = 20;

/// Possible errors during configuration, reception and transmission
#[derive(Debug, PartialEq)]
pub enum CanError<B, P> {
    /// SPI bus transfer error
    Bus(B),
    /// Chip select pin error
    Pin(P),
    /// Chip did not report configuration mode after reset; the serial bus is
    /// not actually talking to it
    HardwareInit,
    /// Receive interrupt enable bits did not stick
    InterruptSetup,
    /// Chip did not reach the requested operation mode
    RequestModeTimeout,
}

/// MCP2515 CAN controller on a shared SPI bus.
///
/// All register access is synchronous. The serial bus is a single shared
/// resource: transport calls are made either from the control loop during
/// one-time configuration or from inside [Self::on_interrupt], never
/// concurrently. A platform adding steady-state register access from the
/// control loop after startup must add its own mutual exclusion.
pub struct MCP2515<B: Transfer<u8>, CS: OutputPin> {
    /// Shared SPI bus
    bus: B,

    /// Chip select pin, active low
    cs: CS,
}

impl<B, CS> MCP2515<B, CS>
where
    B: Transfer<u8>,
    CS: OutputPin,
{
    pub fn new(bus: B, cs: CS) -> Self {
        Self { bus, cs }
    }

    /// Configures the controller with the given settings.
    ///
    /// Every step is fatal on failure: a misconfigured chip must not be
    /// operated, so there is no retry. On success the chip is in the
    /// requested operation mode with both receive interrupts enabled;
    /// the platform wires the chip's interrupt line (falling edge) to
    /// [Self::on_interrupt].
    pub fn configure<D: DelayMs<u16>>(
        &mut self,
        config: &Configuration,
        delay: &mut D,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        self.reset(delay)?;

        // Reset leaves the chip in configuration mode; anything else means
        // the bus is not wired to a responding chip.
        let canstat = self.read_register(Register::CANSTAT as u8)?;
        if OperationMode::from_register(canstat) != Some(OperationMode::Configuration) {
            return Err(CanError::HardwareInit);
        }
        debug!("chip reset, in configuration mode");

        self.write_register(Register::CNF1 as u8, config.bit_timing.cnf1)?;
        self.write_register(Register::CNF2 as u8, config.bit_timing.cnf2)?;
        self.write_register(Register::CNF3 as u8, config.bit_timing.cnf3)?;

        self.write_register(Register::RXB0CTRL as u8, config.rx0_mode.as_rx0_register())?;
        self.write_register(Register::RXB1CTRL as u8, config.rx1_mode.as_rx1_register())?;

        // Buffer-ready pins as plain digital outputs, not extra interrupt lines
        let bfpctrl = BfpCtrlReg::new().with_b1bfe(true).with_b0bfe(true);
        self.write_register(Register::BFPCTRL as u8, bfpctrl.into())?;

        self.set_mode(config.mode)?;

        self.enable_receive_interrupts()
    }

    /// Resets the chip and waits for it to settle.
    ///
    /// No register access is valid before the settle time has passed.
    pub fn reset<D: DelayMs<u16>>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        self.transfer(&mut [Instruction::Reset as u8])?;
        delay.delay_ms(RESET_SETTLE_MS);

        Ok(())
    }

    /// Requests the given operation mode and polls CANSTAT until the chip
    /// reports it
    pub fn set_mode(&mut self, mode: OperationMode) -> Result<(), CanError<B::Error, CS::Error>> {
        self.bit_modify(Register::CANCTRL as u8, OP_MODE_MASK, mode.as_register())?;

        for _ in 0..MODE_CHANGE_RETRIES {
            let canstat = self.read_register(Register::CANSTAT as u8)?;

            if OperationMode::from_register(canstat) == Some(mode) {
                return Ok(());
            }
        }

        debug!("chip did not reach mode {mode:?} within {MODE_CHANGE_RETRIES} polls");
        Err(CanError::RequestModeTimeout)
    }

    /// Enables the receive-buffer-full interrupts and verifies the enable
    /// bits stuck
    fn enable_receive_interrupts(&mut self) -> Result<(), CanError<B::Error, CS::Error>> {
        let enable: u8 = IntFlags::new().with_rx0if(true).with_rx1if(true).into();

        self.write_register(Register::CANINTE as u8, enable)?;

        let readback = self.read_register(Register::CANINTE as u8)?;
        if readback != enable {
            warn!("CANINTE readback {readback:#04x}, expected {enable:#04x}");
            return Err(CanError::InterruptSetup);
        }

        Ok(())
    }

    /// Drains every receive buffer the chip reports full into the hand-off
    /// queue and clears the corresponding interrupt flags.
    ///
    /// This is the body of the receive interrupt handler. It performs no
    /// allocation and no blocking I/O beyond the register reads needed to
    /// drain the chip, and it must be the only code issuing transport calls
    /// while interrupts are live (see [MCP2515]). When the queue is full the
    /// frame is dropped (counted by the queue) and the flag cleared anyway,
    /// otherwise the interrupt line would never deassert.
    pub fn on_interrupt<const N: usize>(
        &mut self,
        producer: &mut Producer<'_, N>,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        let status = self.read_status()?;

        if status.rx0_full {
            self.drain_rx_buffer(RxBuffer::B0, producer)?;
        }
        if status.rx1_full {
            self.drain_rx_buffer(RxBuffer::B1, producer)?;
        }

        Ok(())
    }

    fn drain_rx_buffer<const N: usize>(
        &mut self,
        buffer: RxBuffer,
        producer: &mut Producer<'_, N>,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        if let Some(slot) = producer.reserve() {
            *slot = self.read_rx_buffer(buffer)?;
            producer.commit();
        }

        // Clear only this buffer's flag; a plain write would clobber other
        // pending flags
        self.bit_modify(Register::CANINTF as u8, buffer.interrupt_mask(), 0)
    }

    /// Reads and decodes the frame held by the given receive buffer.
    ///
    /// The extended identifier bytes and the payload are only read when the
    /// identifier flags call for them.
    pub fn read_rx_buffer(
        &mut self,
        buffer: RxBuffer,
    ) -> Result<CanFrame, CanError<B::Error, CS::Error>> {
        let mut image = [0u8; REGISTER_IMAGE_LEN];

        self.read(buffer.sidh(), &mut image[0..2])?;
        let sidl = SidlReg::from(image[1]);

        if sidl.ide() {
            self.read(buffer.eid8(), &mut image[2..4])?;
        }

        image[4] = self.read_register(buffer.dlc())?;
        let dlc_reg = DlcReg::from(image[4]);

        let remote = if sidl.ide() { dlc_reg.rtr() } else { sidl.srr() };
        let length = dlc_reg.dlc().min(8) as usize;

        if !remote && length > 0 {
            self.read(buffer.data(), &mut image[5..5 + length])?;
        }

        Ok(CanFrame::from_registers(&image))
    }

    /// Transmits the frame via transmit buffer 0.
    ///
    /// The caller is responsible for not re-submitting while the buffer is
    /// still pending; [Self::read_status] exposes the pending bits.
    pub fn transmit(&mut self, frame: &CanFrame) -> Result<(), CanError<B::Error, CS::Error>> {
        self.load_tx_buffer(TxBuffer::B0, frame)?;
        self.request_to_send(TxBuffer::B0)
    }

    /// Loads identifier, DLC and payload bytes into the given transmit
    /// buffer block without triggering a send
    pub fn load_tx_buffer(
        &mut self,
        buffer: TxBuffer,
        frame: &CanFrame,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        use embedded_can::Frame;

        let registers = frame.to_registers();
        let length = 5 + if frame.is_remote_frame() { 0 } else { frame.dlc() };

        self.write(buffer.sidh(), &registers[..length])
    }

    /// Sets the transmit-request bit of the given buffer via the dedicated
    /// request-to-send instruction
    pub fn request_to_send(
        &mut self,
        buffer: TxBuffer,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        self.transfer(&mut [buffer.rts_instruction() as u8])?;

        Ok(())
    }

    /// Reads the buffer status flags via the single-instruction status poll
    pub fn read_status(&mut self) -> Result<Status, CanError<B::Error, CS::Error>> {
        let status = self.transfer(&mut [Instruction::ReadStatus as u8, 0x00])?;

        Ok(Status::from_register(status))
    }

    /// Reads `buffer.len()` register bytes starting at `address`, relying on
    /// the chip's address auto-increment
    fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        let mut scratch = [0u8; 8];
        let length = buffer.len();

        self.with_cs(|bus| {
            bus.transfer(&mut [Instruction::Read as u8, address])?;
            let response = bus.transfer(&mut scratch[..length])?;
            buffer.copy_from_slice(response);

            Ok(())
        })
    }

    /// Reads a single register byte
    fn read_register(&mut self, address: u8) -> Result<u8, CanError<B::Error, CS::Error>> {
        self.transfer(&mut [Instruction::Read as u8, address, 0x00])
    }

    /// Writes a single register byte
    fn write_register(
        &mut self,
        address: u8,
        value: u8,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        self.transfer(&mut [Instruction::Write as u8, address, value])?;

        Ok(())
    }

    /// Writes consecutive register bytes starting at `address` in a single
    /// chip select window
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), CanError<B::Error, CS::Error>> {
        let mut buffer = [0u8; 2 + REGISTER_IMAGE_LEN];
        buffer[0] = Instruction::Write as u8;
        buffer[1] = address;
        buffer[2..2 + data.len()].copy_from_slice(data);

        self.transfer(&mut buffer[..2 + data.len()])?;

        Ok(())
    }

    /// Updates only the bits selected by `mask`, leaving the others
    /// untouched.
    ///
    /// This exists because some registers are read-modify-write hazardous
    /// when done as separate read and write steps.
    fn bit_modify(
        &mut self,
        address: u8,
        mask: u8,
        value: u8,
    ) -> Result<(), CanError<B::Error, CS::Error>> {
        self.transfer(&mut [Instruction::BitModify as u8, address, mask, value])?;

        Ok(())
    }

    /// Executes one SPI transfer inside a chip select window and returns the
    /// last byte received
    fn transfer(&mut self, buffer: &mut [u8]) -> Result<u8, CanError<B::Error, CS::Error>> {
        self.with_cs(|bus| {
            let response = bus.transfer(buffer)?;

            Ok(response.last().copied().unwrap_or(0))
        })
    }

    /// Runs `f` with the chip select pin pulled low, restoring it afterwards
    fn with_cs<T>(
        &mut self,
        f: impl FnOnce(&mut B) -> Result<T, B::Error>,
    ) -> Result<T, CanError<B::Error, CS::Error>> {
        self.cs.set_low().map_err(CanError::Pin)?;
        let result = f(&mut self.bus);
        self.cs.set_high().map_err(CanError::Pin)?;

        result.map_err(CanError::Bus)
    }
}
