//!# Receive hand-off queue
//!
//! A fixed-capacity single-producer/single-consumer ring buffer bridging the
//! receive interrupt handler to the consuming control loop without blocking
//! synchronization. The producer half is meant to live in interrupt context,
//! the consumer half in the control loop; no operation blocks or allocates.
//!
//! The producer populates the slot returned by [Producer::reserve] and makes
//! it visible with [Producer::commit]. The two-step split guarantees the
//! consumer never observes a partially written frame. When the queue is full,
//! [Producer::reserve] returns `None` and the frame is counted as dropped
//! instead of overwriting frames not yet consumed.
//!
//! ```
//! use mcp2515::frame::CanFrame;
//! use mcp2515::queue::FrameQueue;
//! use embedded_can::{Frame, Id, StandardId};
//!
//! let mut queue: FrameQueue<16> = FrameQueue::new();
//! let (mut producer, mut consumer) = queue.split();
//!
//! let frame = CanFrame::new(Id::Standard(StandardId::ZERO), &[1, 2, 3]).unwrap();
//!
//! *producer.reserve().unwrap() = frame;
//! producer.commit();
//!
//! assert_eq!(consumer.try_take(), Some(frame));
//! assert!(consumer.is_empty());
//! ```
use crate::frame::CanFrame;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Ring buffer of `N` frame slots with wrapping read and write indices.
///
/// Empty when the indices are equal; full when advancing the write index
/// would make it equal the read index, so one of the `N` slots always stays
/// free. Only the producer advances the write index and only the consumer
/// advances the read index, which is what permits lock-free operation.
pub struct FrameQueue<const N: usize> {
    slots: [UnsafeCell<CanFrame>; N],
    read: AtomicUsize,
    write: AtomicUsize,
    dropped: AtomicU32,
}

// The producer only writes the slot at the write index and publishes it with
// a release store; the consumer only reads a slot after an acquire load has
// shown the write index past it. No slot is ever accessed by both halves at
// the same time.
unsafe impl<const N: usize> Sync for FrameQueue<N> {}

impl<const N: usize> FrameQueue<N> {
    const EMPTY_SLOT: UnsafeCell<CanFrame> = UnsafeCell::new(CanFrame::EMPTY);

    pub const fn new() -> Self {
        Self {
            slots: [Self::EMPTY_SLOT; N],
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Splits the queue into its producer and consumer halves.
    ///
    /// The producer half is handed to the interrupt handler, the consumer
    /// half stays with the control loop. Both halves are `Send`.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let queue = &*self;
        (Producer { queue }, Consumer { queue })
    }

    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    /// Number of committed frames not yet taken
    pub fn len(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        (write + N - read) % N
    }

    /// Number of frames dropped because the queue was full
    pub fn dropped_frames(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn indices(&self) -> (usize, usize) {
        (
            self.read.load(Ordering::Relaxed),
            self.write.load(Ordering::Relaxed),
        )
    }
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Writing half of a [FrameQueue], owned by the interrupt context
pub struct Producer<'a, const N: usize> {
    queue: &'a FrameQueue<N>,
}

impl<const N: usize> Producer<'_, N> {
    /// Returns the slot at the current write index without advancing it.
    ///
    /// Returns `None` when the queue is full; the lost frame is accounted in
    /// [FrameQueue::dropped_frames].
    pub fn reserve(&mut self) -> Option<&mut CanFrame> {
        let write = self.queue.write.load(Ordering::Relaxed);

        if (write + 1) % N == self.queue.read.load(Ordering::Acquire) {
            self.queue.dropped.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        Some(unsafe { &mut *self.queue.slots[write].get() })
    }

    /// Publishes the reserved slot to the consumer.
    ///
    /// Must only be called once the slot is fully populated.
    pub fn commit(&mut self) {
        let write = self.queue.write.load(Ordering::Relaxed);
        self.queue.write.store((write + 1) % N, Ordering::Release);
    }
}

/// Reading half of a [FrameQueue], owned by the control loop
pub struct Consumer<'a, const N: usize> {
    queue: &'a FrameQueue<N>,
}

impl<const N: usize> Consumer<'_, N> {
    /// Takes the oldest committed frame, or `None` if the queue is empty.
    pub fn try_take(&mut self) -> Option<CanFrame> {
        let read = self.queue.read.load(Ordering::Relaxed);

        if read == self.queue.write.load(Ordering::Acquire) {
            return None;
        }

        let frame = unsafe { *self.queue.slots[read].get() };
        self.queue.read.store((read + 1) % N, Ordering::Release);

        Some(frame)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of frames dropped by the producer because the queue was full
    pub fn dropped_frames(&self) -> u32 {
        self.queue.dropped_frames()
    }
}
