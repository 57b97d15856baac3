#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
#![allow(dead_code)]
#![allow(clippy::identity_op)]

//! # Library for MCP2515 CAN controller
//!
//! Crate currently offer the following features:
//! * Frame reception via interrupt-driven receive path and lock-free hand-off queue
//! * Frame transmission via transmit buffer 0
//! * Standard and extended ID formats for CAN frames, data and remote frames
//! * Module identifier assignment protocol on top of the frame layer
//! * no_std support
//!
//!## CAN Tx/Rx example
//!
//!```
//!use mcp2515::can::MCP2515;
//!use mcp2515::config::Configuration;
//!use mcp2515::example::{ExampleCSPin, ExampleDelay, ExampleSPIBus};
//!use mcp2515::frame::CanFrame;
//!use mcp2515::queue::FrameQueue;
//!use embedded_can::{Frame, Id, StandardId};
//!
//!let cs_pin = ExampleCSPin {};
//!let spi_bus = ExampleSPIBus::default();
//!let mut delay = ExampleDelay {};
//!
//!let mut controller = MCP2515::new(spi_bus, cs_pin);
//! // configure bit timing, receive buffers and operation mode
//!controller.configure(&Configuration::default(), &mut delay).unwrap();
//!
//! // hand-off queue between the interrupt handler and the control loop
//!let mut queue: FrameQueue<16> = FrameQueue::new();
//!let (mut producer, mut consumer) = queue.split();
//!
//! // called by the platform on the falling edge of the interrupt line
//!controller.on_interrupt(&mut producer).unwrap();
//!assert!(consumer.try_take().is_none());
//!
//! // Transmit CAN message
//!let can_id = Id::Standard(StandardId::new(0x55).unwrap());
//!let message = CanFrame::new(can_id, &[1, 2, 3, 4]).unwrap();
//!controller.transmit(&message).unwrap();
//!```

pub mod can;
pub mod config;
pub mod status;

pub mod admin;
pub mod frame;
pub mod queue;

pub mod example;
#[cfg(test)]
pub(crate) mod mocks;
mod registers;
#[cfg(test)]
mod tests;
