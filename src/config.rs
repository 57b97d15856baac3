use crate::registers::{Rxb0CtrlReg, Rxb1CtrlReg};
use crate::status::OperationMode;

/// Entire configuration currently supported
#[derive(Copy, Clone, Debug)]
pub struct Configuration {
    /// Bit timing register values
    pub bit_timing: BitTiming,

    /// Filtering mode of receive buffer 0
    pub rx0_mode: RxMode,

    /// Filtering mode of receive buffer 1
    pub rx1_mode: RxMode,

    /// Operation mode requested once configuration is done
    pub mode: OperationMode,
}

impl Default for Configuration {
    /// 1 Mbit/s bus speed, buffer 0 accepting everything, buffer 1 accepting
    /// extended identifiers only, normal operation.
    ///
    /// The buffer asymmetry keeps standard-identifier traffic and
    /// extended-identifier administrative traffic apart by which buffer
    /// filled; both buffers feed the same decode path.
    fn default() -> Self {
        Self {
            bit_timing: BitTiming::MEGABIT_20MHZ,
            rx0_mode: RxMode::AcceptAny,
            rx1_mode: RxMode::ExtendedOnly,
            mode: OperationMode::Normal,
        }
    }
}

/// Values for the CNF1/CNF2/CNF3 bit timing registers.
///
/// Derived once from the oscillator frequency and the target bus speed;
/// the chip only accepts them in configuration mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitTiming {
    pub cnf1: u8,
    pub cnf2: u8,
    pub cnf3: u8,
}

impl BitTiming {
    /// 1 Mbit/s with a 20 MHz oscillator: SJW=1, BRP=0, triple sampling,
    /// PRSEG=2, PHSEG1=3, PHSEG2=3
    pub const MEGABIT_20MHZ: Self = Self {
        cnf1: 0x00,
        cnf2: 0xD1,
        cnf3: 0x03,
    };
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::MEGABIT_20MHZ
    }
}

/// Receive buffer operating mode (RXM bits of RXBnCTRL)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RxMode {
    /// Receive valid frames matching the acceptance filters
    Filtered = 0b00,
    /// Receive only standard-identifier frames matching the filters
    StandardOnly = 0b01,
    /// Receive only extended-identifier frames matching the filters
    ExtendedOnly = 0b10,
    /// Masks and filters off, receive any frame
    AcceptAny = 0b11,
}

impl RxMode {
    /// Encodes the mode as an RXB0CTRL register value
    pub(crate) fn as_rx0_register(self) -> u8 {
        Rxb0CtrlReg::new().with_rxm(self as u8).into()
    }

    /// Encodes the mode as an RXB1CTRL register value
    pub(crate) fn as_rx1_register(self) -> u8 {
        Rxb1CtrlReg::new().with_rxm(self as u8).into()
    }
}
