/// Buffer flags decoded from the READ STATUS instruction
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// RXB0 holds a new frame
    pub rx0_full: bool,
    /// RXB1 holds a new frame
    pub rx1_full: bool,
    /// TXB0 transmission still pending
    pub tx0_pending: bool,
    /// TXB0 finished transmitting
    pub tx0_sent: bool,
    /// TXB1 transmission still pending
    pub tx1_pending: bool,
    /// TXB1 finished transmitting
    pub tx1_sent: bool,
    /// TXB2 transmission still pending
    pub tx2_pending: bool,
    /// TXB2 finished transmitting
    pub tx2_sent: bool,
}

impl Status {
    pub(crate) fn from_register(register: u8) -> Self {
        Self {
            rx0_full: register & (1 << 0) != 0,
            rx1_full: register & (1 << 1) != 0,
            tx0_pending: register & (1 << 2) != 0,
            tx0_sent: register & (1 << 3) != 0,
            tx1_pending: register & (1 << 4) != 0,
            tx1_sent: register & (1 << 5) != 0,
            tx2_pending: register & (1 << 6) != 0,
            tx2_sent: register & (1 << 7) != 0,
        }
    }
}

/// Operation mode as requested via CANCTRL and reported by CANSTAT
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperationMode {
    /// Normal operation, frames are received and transmitted
    Normal = 0b000,
    /// Module is in sleep mode
    Sleep = 0b001,
    /// Transmitted frames loop back internally, nothing reaches the bus
    Loopback = 0b010,
    /// Frames are received but never acknowledged or transmitted
    ListenOnly = 0b011,
    /// Configuration mode, entered automatically after reset
    Configuration = 0b100,
}

impl OperationMode {
    /// Maps the mode bits of CANSTAT, `None` for reserved encodings
    pub(crate) fn from_register(register: u8) -> Option<Self> {
        match register >> 5 {
            0b000 => Some(Self::Normal),
            0b001 => Some(Self::Sleep),
            0b010 => Some(Self::Loopback),
            0b011 => Some(Self::ListenOnly),
            0b100 => Some(Self::Configuration),
            _ => None,
        }
    }

    /// Encodes the mode into the REQOP bits of CANCTRL
    pub(crate) fn as_register(self) -> u8 {
        (self as u8) << 5
    }
}
