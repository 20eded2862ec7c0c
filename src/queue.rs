//! Bounded single-producer / single-consumer command ring.
//!
//! The ring is a `ringbuf` heap ring allocated once by [`command_queue`] and
//! split into a [`CommandSender`] for the control thread and a
//! [`CommandReceiver`] for the render thread. Neither half is `Clone`, so
//! there is never more than one of each. `push` and `pop` are wait-free: a
//! bounded number of atomic loads and stores, no locks, no allocation.

use std::sync::Arc;

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::command::Command;

/// Largest ring [`command_queue`] will allocate.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 16;

/// Create a command ring holding up to `capacity` commands, clamped to
/// `1..=MAX_QUEUE_CAPACITY`.
pub fn command_queue(capacity: usize) -> (CommandSender, CommandReceiver) {
    let capacity = capacity.clamp(1, MAX_QUEUE_CAPACITY);
    let ring = Arc::new(HeapRb::<Command>::new(capacity));
    let (producer, consumer) = ring.clone().split();
    (
        CommandSender { producer, ring },
        CommandReceiver { consumer, capacity },
    )
}

/// Producer half, owned by the control thread.
pub struct CommandSender {
    producer: HeapProd<Command>,
    ring: Arc<HeapRb<Command>>,
}

impl CommandSender {
    /// Queue a command. Returns `false` and drops it when the ring is full;
    /// already-queued commands are untouched.
    pub fn push(&mut self, command: Command) -> bool {
        self.producer.try_push(command).is_ok()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity().get()
    }

    /// Commands currently waiting. A snapshot; the receiver may be draining.
    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer half, owned by the render thread.
pub struct CommandReceiver {
    consumer: HeapCons<Command>,
    capacity: usize,
}

impl CommandReceiver {
    /// Take the oldest queued command, or `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<Command> {
        self.consumer.try_pop()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.consumer.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn freq(position: usize) -> Command {
        Command::SetVoiceFrequency {
            position,
            frequency: position as f64,
        }
    }

    #[test]
    fn pop_empty_returns_none() {
        let (_tx, mut rx) = command_queue(4);
        assert_eq!(rx.pop(), None);
        assert_eq!(rx.pop(), None);
        assert!(rx.is_empty());
    }

    #[test]
    fn fifo_order() {
        let (mut tx, mut rx) = command_queue(8);
        for i in 0..5 {
            assert!(tx.push(freq(i)));
        }
        for i in 0..5 {
            assert_eq!(rx.pop(), Some(freq(i)));
        }
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn full_ring_rejects_without_clobbering() {
        let (mut tx, mut rx) = command_queue(3);
        assert_eq!(tx.capacity(), 3);
        assert!(tx.push(freq(0)));
        assert!(tx.push(freq(1)));
        assert!(tx.push(freq(2)));
        assert!(!tx.push(freq(99)));
        assert_eq!(tx.len(), 3);

        assert_eq!(rx.pop(), Some(freq(0)));
        assert_eq!(rx.pop(), Some(freq(1)));
        assert_eq!(rx.pop(), Some(freq(2)));
        assert_eq!(rx.pop(), None);
        assert!(tx.is_empty());
    }

    #[test]
    fn wraps_around_many_times() {
        let (mut tx, mut rx) = command_queue(2);
        for i in 0..1000 {
            assert!(tx.push(freq(i)));
            if i % 2 == 1 {
                assert_eq!(rx.pop(), Some(freq(i - 1)));
                assert_eq!(rx.pop(), Some(freq(i)));
            }
        }
        assert!(rx.is_empty());
    }

    #[test]
    fn zero_capacity_holds_one() {
        let (mut tx, mut rx) = command_queue(0);
        assert_eq!(rx.capacity(), 1);
        assert!(tx.push(Command::AddVoice));
        assert!(!tx.push(Command::AddVoice));
        assert_eq!(rx.pop(), Some(Command::AddVoice));
    }

    #[test]
    fn huge_capacity_is_clamped() {
        let (tx, rx) = command_queue(usize::MAX);
        assert_eq!(tx.capacity(), MAX_QUEUE_CAPACITY);
        assert_eq!(rx.capacity(), MAX_QUEUE_CAPACITY);
    }

    #[test]
    fn cross_thread_delivery_in_order() {
        const COUNT: usize = 100_000;
        let (mut tx, mut rx) = command_queue(64);

        let producer = thread::spawn(move || {
            let mut i = 0;
            while i < COUNT {
                if tx.push(freq(i)) {
                    i += 1;
                } else {
                    thread::yield_now();
                }
            }
        });

        let mut expected = 0;
        while expected < COUNT {
            match rx.pop() {
                Some(cmd) => {
                    assert_eq!(cmd, freq(expected));
                    expected += 1;
                }
                None => thread::yield_now(),
            }
        }
        producer.join().unwrap();
        assert_eq!(rx.pop(), None);
    }
}
