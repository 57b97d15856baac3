//!# CAN frame and register codec
//!
//! [CanFrame] is the unit of exchange between the chip and application code.
//! It implements [embedded_can::Frame] and converts to and from the packed
//! register representation used by the chip's receive and transmit buffer
//! blocks (split identifier bytes, DLC byte with embedded remote-request
//! flag, data bytes).
//!
//! ```
//! use mcp2515::frame::CanFrame;
//! use embedded_can::{Frame, Id, StandardId};
//!
//! let id = Id::Standard(StandardId::new(0x100).unwrap());
//! let frame = CanFrame::new(id, &[0xAB, 0xCD]).unwrap();
//!
//! let registers = frame.to_registers();
//! assert_eq!(registers[0], 0x20);
//! assert_eq!(CanFrame::from_registers(&registers), frame);
//! ```
use crate::registers::{DlcReg, SidlReg};
use embedded_can::{ExtendedId, Frame, Id, StandardId};

/// Maximum payload size of a classic CAN frame
pub const MAX_PAYLOAD: usize = 8;

/// Size of a buffer register block image: SIDH, SIDL, EID8, EID0, DLC
/// followed by up to eight data bytes
pub const REGISTER_IMAGE_LEN: usize = 13;

/// A classic CAN 2.0 frame
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanFrame {
    id: Id,
    remote: bool,
    dlc: u8,
    data: [u8; MAX_PAYLOAD],
}

impl CanFrame {
    pub(crate) const EMPTY: CanFrame = CanFrame {
        id: Id::Standard(StandardId::ZERO),
        remote: false,
        dlc: 0,
        data: [0; MAX_PAYLOAD],
    };

    /// Decodes a receive buffer register image.
    ///
    /// The remote-request flag is taken from the SRR bit of the SIDL byte for
    /// standard frames and from the RTR bit of the DLC byte for extended
    /// frames. Data length codes above eight are clamped to eight.
    pub fn from_registers(bytes: &[u8; REGISTER_IMAGE_LEN]) -> Self {
        let sidl = SidlReg::from(bytes[1]);
        let sid = (bytes[0] as u16) << 3 | sidl.sid_low() as u16;

        let mut remote = sidl.srr();
        let dlc_reg = DlcReg::from(bytes[4]);

        let id = if sidl.ide() {
            let eid = (sid as u32) << 18
                | (sidl.eid_high() as u32) << 16
                | (bytes[2] as u32) << 8
                | bytes[3] as u32;
            remote = dlc_reg.rtr();
            Id::Extended(ExtendedId::new(eid).unwrap())
        } else {
            Id::Standard(StandardId::new(sid).unwrap())
        };

        let dlc = dlc_reg.dlc().min(MAX_PAYLOAD as u8);
        let mut data = [0u8; MAX_PAYLOAD];
        if !remote && dlc > 0 {
            data[..dlc as usize].copy_from_slice(&bytes[5..5 + dlc as usize]);
        }

        Self { id, remote, dlc, data }
    }

    /// Encodes the frame into a transmit buffer register image, the exact
    /// inverse of [Self::from_registers].
    pub fn to_registers(&self) -> [u8; REGISTER_IMAGE_LEN] {
        let mut bytes = [0u8; REGISTER_IMAGE_LEN];

        match self.id {
            Id::Standard(sid) => {
                let raw = sid.as_raw();
                bytes[0] = (raw >> 3) as u8;
                bytes[1] = SidlReg::new()
                    .with_sid_low((raw & 0x7) as u8)
                    .with_srr(self.remote)
                    .into();
                bytes[4] = DlcReg::new().with_dlc(self.dlc).into();
            }
            Id::Extended(eid) => {
                let raw = eid.as_raw();
                bytes[0] = (raw >> 21) as u8;
                bytes[1] = SidlReg::new()
                    .with_sid_low((raw >> 18) as u8 & 0x7)
                    .with_ide(true)
                    .with_eid_high((raw >> 16) as u8 & 0x3)
                    .into();
                bytes[2] = (raw >> 8) as u8;
                bytes[3] = raw as u8;
                bytes[4] = DlcReg::new().with_dlc(self.dlc).with_rtr(self.remote).into();
            }
        }

        if !self.remote {
            bytes[5..5 + self.dlc as usize].copy_from_slice(&self.data[..self.dlc as usize]);
        }

        bytes
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_PAYLOAD {
            return None;
        }

        let mut payload = [0u8; MAX_PAYLOAD];
        payload[..data.len()].copy_from_slice(data);

        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data: payload,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_PAYLOAD {
            return None;
        }

        Some(Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: [0; MAX_PAYLOAD],
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// Payload bytes. Empty for remote frames, whose data bytes carry no
    /// meaning even if present in the chip's registers.
    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.dlc as usize]
        }
    }
}
