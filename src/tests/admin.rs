use crate::admin::{ADMIN_RESPONSE_ID, ModuleManager, OPCODE_IDENTITY_REQUEST};
use crate::frame::CanFrame;
use embedded_can::{ExtendedId, Frame, Id, StandardId};

fn identity_request(unique_id: u32) -> CanFrame {
    let id = Id::Extended(ExtendedId::new(unique_id).unwrap());
    CanFrame::new(id, &[OPCODE_IDENTITY_REQUEST]).unwrap()
}

fn collect(sent: &mut Vec<CanFrame>) -> impl FnOnce(CanFrame) -> Result<(), ()> + '_ {
    |frame| {
        sent.push(frame);
        Ok(())
    }
}

#[test]
fn test_identity_request_assigns_module_id() {
    let mut manager = ModuleManager::new(0x03);
    let mut sent = Vec::new();

    manager.handle_frame(&identity_request(0x00C0FFEE), collect(&mut sent)).unwrap();

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id(), Id::Standard(StandardId::new(ADMIN_RESPONSE_ID).unwrap()));
    assert_eq!(sent[0].dlc(), 6);
    assert_eq!(sent[0].data(), [0x01, 0x00, 0xC0, 0xFF, 0xEE, 0x03]);
}

#[test]
fn test_module_ids_assigned_sequentially() {
    let mut manager = ModuleManager::new(0x10);
    let mut sent = Vec::new();

    manager.handle_frame(&identity_request(0x1), collect(&mut sent)).unwrap();
    manager.handle_frame(&identity_request(0x2), collect(&mut sent)).unwrap();
    manager.handle_frame(&identity_request(0x3), collect(&mut sent)).unwrap();

    assert_eq!(sent[0].data()[5], 0x10);
    assert_eq!(sent[1].data()[5], 0x11);
    assert_eq!(sent[2].data()[5], 0x12);
}

#[test]
fn test_unsupported_opcode_ignored() {
    let mut manager = ModuleManager::new(0x03);
    let mut sent = Vec::new();

    let id = Id::Extended(ExtendedId::new(0x123).unwrap());
    let frame = CanFrame::new(id, &[0x7F, 0x01]).unwrap();

    manager.handle_frame(&frame, collect(&mut sent)).unwrap();
    assert!(sent.is_empty());
}

#[test]
fn test_non_administrative_frames_ignored() {
    let mut manager = ModuleManager::new(0x03);
    let mut sent = Vec::new();

    // Standard identifier
    let standard = CanFrame::new(Id::Standard(StandardId::new(0x100).unwrap()), &[0x00]).unwrap();
    manager.handle_frame(&standard, collect(&mut sent)).unwrap();

    // Remote frame
    let extended_id = Id::Extended(ExtendedId::new(0x123).unwrap());
    let remote = CanFrame::new_remote(extended_id, 1).unwrap();
    manager.handle_frame(&remote, collect(&mut sent)).unwrap();

    // Empty payload
    let empty = CanFrame::new(extended_id, &[]).unwrap();
    manager.handle_frame(&empty, collect(&mut sent)).unwrap();

    assert!(sent.is_empty());

    // The counter did not advance
    manager.handle_frame(&identity_request(0x1), collect(&mut sent)).unwrap();
    assert_eq!(sent[0].data()[5], 0x03);
}

#[test]
fn test_send_error_propagated() {
    let mut manager = ModuleManager::new(0x03);

    let result = manager.handle_frame(&identity_request(0x1), |_| Err(42));
    assert_eq!(result, Err(42));
}
