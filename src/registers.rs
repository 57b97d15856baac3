#![allow(unused_braces)]
use modular_bitfield_msb::prelude::*;

/// SPI instruction opcodes of the MCP2515
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    Write = 0x02,
    Read = 0x03,
    BitModify = 0x05,
    LoadTx0 = 0x40,
    RtsTx0 = 0x81,
    RtsTx1 = 0x82,
    RtsTx2 = 0x84,
    ReadStatus = 0xA0,
    RxStatus = 0xB0,
    Reset = 0xC0,
}

/// Control and status register addresses (flat 0x00-0x7F space)
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Register {
    BFPCTRL = 0x0C,
    TXRTSCTRL = 0x0D,
    CANSTAT = 0x0E,
    CANCTRL = 0x0F,
    TEC = 0x1C,
    REC = 0x1D,
    CNF3 = 0x28,
    CNF2 = 0x29,
    CNF1 = 0x2A,
    CANINTE = 0x2B,
    CANINTF = 0x2C,
    EFLG = 0x2D,
    TXB0CTRL = 0x30,
    RXB0CTRL = 0x60,
    RXB1CTRL = 0x70,
}

/// Receive buffer register blocks.
///
/// Each block holds a control byte, the split identifier bytes, the DLC byte
/// and up to eight data bytes at fixed offsets. The addresses returned here
/// are the wire contract of the chip and must match it exactly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RxBuffer {
    B0,
    B1,
}

impl RxBuffer {
    /// Base address of the block (SIDH byte)
    pub(crate) fn sidh(&self) -> u8 {
        match self {
            Self::B0 => 0x61,
            Self::B1 => 0x71,
        }
    }

    /// Address of the upper extended identifier byte
    pub(crate) fn eid8(&self) -> u8 {
        self.sidh() + 2
    }

    /// Address of the DLC byte
    pub(crate) fn dlc(&self) -> u8 {
        self.sidh() + 4
    }

    /// Address of the first data byte
    pub(crate) fn data(&self) -> u8 {
        self.sidh() + 5
    }

    /// CANINTF mask of the buffer's receive interrupt flag
    pub(crate) fn interrupt_mask(&self) -> u8 {
        match self {
            Self::B0 => IntFlags::new().with_rx0if(true).into(),
            Self::B1 => IntFlags::new().with_rx1if(true).into(),
        }
    }
}

/// Transmit buffer register blocks
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxBuffer {
    B0,
    B1,
    B2,
}

impl TxBuffer {
    /// Base address of the block (SIDH byte, one past the control byte)
    pub(crate) fn sidh(&self) -> u8 {
        match self {
            Self::B0 => 0x31,
            Self::B1 => 0x41,
            Self::B2 => 0x51,
        }
    }

    /// Request-to-send instruction for this buffer
    pub(crate) fn rts_instruction(&self) -> Instruction {
        match self {
            Self::B0 => Instruction::RtsTx0,
            Self::B1 => Instruction::RtsTx1,
            Self::B2 => Instruction::RtsTx2,
        }
    }
}

#[bitfield]
#[derive(Default, Copy, Clone)]
#[repr(u8)]
/// SIDL byte of an identifier block (RXBnSIDL/TXBnSIDL)
pub struct SidlReg {
    /// Low three bits of the standard identifier
    pub sid_low: B3,
    /// Standard frame remote request bit
    pub srr: bool,
    /// Extended identifier flag
    pub ide: bool,
    #[skip]
    __: B1,
    /// Top two bits of the extended identifier
    pub eid_high: B2,
}

#[bitfield]
#[derive(Default, Copy, Clone)]
#[repr(u8)]
/// DLC byte of a buffer block (RXBnDLC/TXBnDLC)
pub struct DlcReg {
    #[skip]
    __: B1,
    /// Remote transmission request bit, meaningful for extended frames
    pub rtr: bool,
    #[skip]
    __: B2,
    /// Data length code (0-8)
    pub dlc: B4,
}

#[bitfield]
#[derive(Default, Copy, Clone)]
#[repr(u8)]
/// Interrupt flag/enable bits, same layout for CANINTF and CANINTE
pub struct IntFlags {
    /// Message error
    pub merrf: bool,
    /// Wakeup
    pub wakif: bool,
    /// Error state (EFLG)
    pub errif: bool,
    /// TXB2 empty
    pub tx2if: bool,
    /// TXB1 empty
    pub tx1if: bool,
    /// TXB0 empty
    pub tx0if: bool,
    /// RXB1 full
    pub rx1if: bool,
    /// RXB0 full
    pub rx0if: bool,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// RXB0CTRL register
pub struct Rxb0CtrlReg {
    #[skip]
    __: B1,
    /// Receive buffer operating mode
    pub rxm: B2,
    #[skip]
    __: B1,
    /// Remote transfer request received (read only)
    pub rxrtr: bool,
    /// Rollover to RXB1 enable
    pub bukt: bool,
    /// Read-only copy of BUKT
    pub bukt1: bool,
    /// Acceptance filter hit (read only)
    pub filhit0: bool,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// RXB1CTRL register
pub struct Rxb1CtrlReg {
    #[skip]
    __: B1,
    /// Receive buffer operating mode
    pub rxm: B2,
    #[skip]
    __: B1,
    /// Remote transfer request received (read only)
    pub rxrtr: bool,
    /// Acceptance filter hit (read only)
    pub filhit: B3,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// BFPCTRL register, controls the RXnBF buffer-ready pins
pub struct BfpCtrlReg {
    #[skip]
    __: B2,
    /// RX1BF pin state in digital output mode
    pub b1bfs: bool,
    /// RX0BF pin state in digital output mode
    pub b0bfs: bool,
    /// RX1BF pin function enable
    pub b1bfe: bool,
    /// RX0BF pin function enable
    pub b0bfe: bool,
    /// RX1BF mode (interrupt when set, digital output when clear)
    pub b1bfm: bool,
    /// RX0BF mode (interrupt when set, digital output when clear)
    pub b0bfm: bool,
}
