//!# Module administration protocol
//!
//! Consumer-side dispatch for the administrative traffic carried in extended
//! identifier frames. Modules that just joined the bus announce themselves
//! with an identity request carrying their unique hardware identifier as the
//! frame identifier; the [ModuleManager] answers on the well-known
//! administrative identifier, echoing that identifier and appending the
//! freshly assigned module identifier byte.
//!
//! The manager is a pure consumer of decoded frames. Transmission goes
//! through a caller-supplied closure so it composes with whatever loop polls
//! [crate::queue::Consumer::try_take].
//!
//! ```
//! use mcp2515::admin::{ModuleManager, OPCODE_IDENTITY_REQUEST};
//! use mcp2515::frame::CanFrame;
//! use embedded_can::{ExtendedId, Frame, Id};
//!
//! let mut manager = ModuleManager::new(0x03);
//! let mut sent = Vec::new();
//!
//! let request = CanFrame::new(
//!     Id::Extended(ExtendedId::new(0x00C0FFEE).unwrap()),
//!     &[OPCODE_IDENTITY_REQUEST],
//! )
//! .unwrap();
//!
//! manager
//!     .handle_frame(&request, |response| -> Result<(), ()> {
//!         sent.push(response);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(sent[0].data(), [0x01, 0x00, 0xC0, 0xFF, 0xEE, 0x03]);
//! ```
use crate::frame::CanFrame;
use embedded_can::{Frame, Id, StandardId};
use log::warn;

/// Well-known standard identifier administrative responses are sent to
pub const ADMIN_RESPONSE_ID: u16 = 0x700;

/// First payload byte of a request for a module identifier
pub const OPCODE_IDENTITY_REQUEST: u8 = 0x00;

/// Response opcode carrying a freshly assigned module identifier
pub const OPCODE_ASSIGN_MODULE_ID: u8 = 0x01;

/// Assigns module identifiers to modules announcing themselves on the bus.
///
/// Identifiers are handed out sequentially from a caller-seeded counter.
/// Nothing tracks which modules are still alive, so identifiers are not
/// reclaimed.
pub struct ModuleManager {
    next_module_id: u8,
}

impl ModuleManager {
    pub fn new(first_module_id: u8) -> Self {
        Self {
            next_module_id: first_module_id,
        }
    }

    /// Dispatches one decoded frame.
    ///
    /// Only extended, non-remote frames with a payload are administrative;
    /// everything else is ignored. Unsupported opcodes are reported and
    /// ignored. `send` is invoked for each response frame to transmit.
    pub fn handle_frame<E, F>(&mut self, frame: &CanFrame, send: F) -> Result<(), E>
    where
        F: FnOnce(CanFrame) -> Result<(), E>,
    {
        if !frame.is_extended() || frame.is_remote_frame() || frame.dlc() == 0 {
            return Ok(());
        }

        match frame.data()[0] {
            OPCODE_IDENTITY_REQUEST => send(self.assign_module_id(frame)),
            opcode => {
                warn!("unsupported administrative opcode {opcode:#04x}");
                Ok(())
            }
        }
    }

    fn assign_module_id(&mut self, request: &CanFrame) -> CanFrame {
        let unique_id = match request.id() {
            Id::Extended(eid) => eid.as_raw(),
            Id::Standard(sid) => sid.as_raw() as u32,
        };

        let module_id = self.next_module_id;
        self.next_module_id = self.next_module_id.wrapping_add(1);

        let payload = [
            OPCODE_ASSIGN_MODULE_ID,
            (unique_id >> 24) as u8,
            (unique_id >> 16) as u8,
            (unique_id >> 8) as u8,
            unique_id as u8,
            module_id,
        ];

        let id = Id::Standard(StandardId::new(ADMIN_RESPONSE_ID).unwrap());
        CanFrame::new(id, &payload).unwrap()
    }
}
