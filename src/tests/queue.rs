use crate::frame::CanFrame;
use crate::queue::FrameQueue;
use embedded_can::{Frame, Id, StandardId};

fn frame(marker: u8) -> CanFrame {
    let id = Id::Standard(StandardId::new(0x100).unwrap());
    CanFrame::new(id, &[marker]).unwrap()
}

#[test]
fn test_empty_queue() {
    let mut queue: FrameQueue<4> = FrameQueue::new();

    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);

    let (_, mut consumer) = queue.split();
    assert_eq!(consumer.try_take(), None);
}

#[test]
fn test_fifo_order() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let (mut producer, mut consumer) = queue.split();

    for marker in 0..3 {
        *producer.reserve().unwrap() = frame(marker);
        producer.commit();
    }

    assert_eq!(consumer.try_take(), Some(frame(0)));
    assert_eq!(consumer.try_take(), Some(frame(1)));
    assert_eq!(consumer.try_take(), Some(frame(2)));
    assert_eq!(consumer.try_take(), None);
}

#[test]
fn test_reserve_without_commit_stays_invisible() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let (mut producer, mut consumer) = queue.split();

    *producer.reserve().unwrap() = frame(7);

    assert_eq!(consumer.try_take(), None);

    producer.commit();
    assert_eq!(consumer.try_take(), Some(frame(7)));
}

#[test]
fn test_full_queue_drops_new_frames() {
    let mut queue: FrameQueue<4> = FrameQueue::new();
    let (mut producer, mut consumer) = queue.split();

    // One slot always stays free, so capacity is three
    for marker in 0..3 {
        *producer.reserve().unwrap() = frame(marker);
        producer.commit();
    }

    assert!(producer.reserve().is_none());
    assert!(producer.reserve().is_none());
    assert_eq!(consumer.dropped_frames(), 2);

    // Queued frames stay untouched
    assert_eq!(consumer.try_take(), Some(frame(0)));

    // One slot free again
    *producer.reserve().unwrap() = frame(9);
    producer.commit();
    assert_eq!(consumer.try_take(), Some(frame(1)));
}

#[test]
fn test_indices_wrap_around() {
    let mut queue: FrameQueue<4> = FrameQueue::new();

    {
        let (mut producer, mut consumer) = queue.split();

        for marker in 0..10 {
            *producer.reserve().unwrap() = frame(marker);
            producer.commit();
            assert_eq!(consumer.try_take(), Some(frame(marker)));
        }
    }

    assert_eq!(queue.indices(), (2, 2));
    assert!(queue.is_empty());
    assert_eq!(queue.dropped_frames(), 0);
}

#[test]
fn test_concurrent_producer_consumer() {
    let mut queue: FrameQueue<8> = FrameQueue::new();
    let (mut producer, mut consumer) = queue.split();

    std::thread::scope(|scope| {
        scope.spawn(move || {
            for marker in 0..200u8 {
                loop {
                    if let Some(slot) = producer.reserve() {
                        *slot = frame(marker);
                        producer.commit();
                        break;
                    }

                    std::thread::yield_now();
                }
            }
        });

        for marker in 0..200u8 {
            let received = loop {
                if let Some(received) = consumer.try_take() {
                    break received;
                }

                std::thread::yield_now();
            };

            assert_eq!(received, frame(marker));
        }
    });
}
