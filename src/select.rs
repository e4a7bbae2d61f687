//! Multi-way select over a set of prospective send/receive operations.
//!
//! `select` registers one [`Notifier`] in every channel an op spans, scans
//! the ops in order for the first that is not `WouldBlock`, and — if none
//! is — blocks on the notifier until some channel's state change might have
//! made one ready, then scans again. The scan order is the tie-break: if
//! two ops are simultaneously ready, the lowest index wins.
//!
//! A single `select` call can span channels of different element types,
//! because each op is boxed behind the [`SelectCase`] trait rather than
//! `select` itself being generic over one `T`.

use crate::channel::Channel;
use crate::error::{RecvError, SelectError, SendError};
use crate::loom_exports::sync::Arc;
use crate::waiter::Notifier;

enum CaseOutcome {
    Success,
    Closed,
    WouldBlock,
}

/// One op in a `select` call: a channel plus a direction and payload slot.
///
/// Implemented by [`SendCase`] and [`RecvCase`]; not meant to be
/// implemented outside this crate.
pub trait SelectCase {
    #[doc(hidden)]
    fn register(&self, token: &Arc<Notifier>);
    #[doc(hidden)]
    fn deregister(&self, token: &Arc<Notifier>);
    #[doc(hidden)]
    fn try_execute(&mut self) -> CaseOutcome;
}

/// A prospective send of `item` on `channel`.
pub struct SendCase<'a, T> {
    channel: &'a Channel<T>,
    item: Option<T>,
}

impl<'a, T> SendCase<'a, T> {
    pub fn new(channel: &'a Channel<T>, item: T) -> Self {
        Self {
            channel,
            item: Some(item),
        }
    }
}

impl<'a, T> SelectCase for SendCase<'a, T> {
    fn register(&self, token: &Arc<Notifier>) {
        self.channel.senders_waiting.insert(token);
    }

    fn deregister(&self, token: &Arc<Notifier>) {
        self.channel.senders_waiting.remove(token);
    }

    fn try_execute(&mut self) -> CaseOutcome {
        let item = self.item.take().expect("SendCase polled after it resolved");
        match self.channel.try_send(item) {
            Ok(()) => CaseOutcome::Success,
            // A WouldBlock attempt must not corrupt the payload for a later
            // attempt at this same index, so the item goes straight back.
            Err(SendError::WouldBlock(item)) => {
                self.item = Some(item);
                CaseOutcome::WouldBlock
            }
            Err(SendError::Closed(_)) => CaseOutcome::Closed,
        }
    }
}

/// A prospective receive on `channel`, writing into `slot` on success.
pub struct RecvCase<'a, T> {
    channel: &'a Channel<T>,
    slot: &'a mut Option<T>,
}

impl<'a, T> RecvCase<'a, T> {
    pub fn new(channel: &'a Channel<T>, slot: &'a mut Option<T>) -> Self {
        Self { channel, slot }
    }
}

impl<'a, T> SelectCase for RecvCase<'a, T> {
    fn register(&self, token: &Arc<Notifier>) {
        self.channel.receivers_waiting.insert(token);
    }

    fn deregister(&self, token: &Arc<Notifier>) {
        self.channel.receivers_waiting.remove(token);
    }

    fn try_execute(&mut self) -> CaseOutcome {
        match self.channel.try_receive() {
            Ok(item) => {
                *self.slot = Some(item);
                CaseOutcome::Success
            }
            Err(RecvError::WouldBlock) => CaseOutcome::WouldBlock,
            Err(RecvError::Closed) => CaseOutcome::Closed,
        }
    }
}

/// Waits on an arbitrary set of prospective send/receive operations and
/// completes the first that becomes ready.
///
/// Returns the index of the op that ran. If that op's channel turned out
/// closed, returns [`SelectError::Closed`] carrying the same index; the
/// caller is expected to drop that case before selecting again.
///
/// When multiple ops are ready at once, the lowest index wins — this is
/// part of the contract, not an implementation accident.
pub fn select(ops: &mut [&mut dyn SelectCase]) -> Result<usize, SelectError> {
    let token = Notifier::new();

    for op in ops.iter() {
        op.register(&token);
    }

    log::debug!("select: blocking on {} ops", ops.len());

    loop {
        let mut ready = None;
        for (i, op) in ops.iter_mut().enumerate() {
            match op.try_execute() {
                CaseOutcome::WouldBlock => continue,
                outcome => {
                    ready = Some((i, outcome));
                    break;
                }
            }
        }

        if let Some((i, outcome)) = ready {
            for op in ops.iter() {
                op.deregister(&token);
            }
            log::debug!("select: op {i} ready, waking");
            return match outcome {
                CaseOutcome::Success => Ok(i),
                CaseOutcome::Closed => Err(SelectError::Closed(i)),
                CaseOutcome::WouldBlock => unreachable!("filtered out above"),
            };
        }

        token.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_picks_first_ready_op() {
        let c1 = Channel::new(1);
        let c2: Channel<char> = Channel::new(1);
        c1.try_send('X').unwrap();

        let mut slot1 = None;
        let mut slot2 = None;
        let mut op1 = RecvCase::new(&c1, &mut slot1);
        let mut op2 = RecvCase::new(&c2, &mut slot2);

        let idx = select(&mut [&mut op1, &mut op2]).unwrap();

        assert_eq!(idx, 0);
        assert_eq!(slot1, Some('X'));
        assert_eq!(slot2, None);
    }

    #[test]
    fn select_tie_break_favors_lowest_index() {
        let c1 = Channel::new(1);
        let c2 = Channel::new(1);
        c1.try_send(1).unwrap();
        c2.try_send(2).unwrap();

        let mut slot1 = None;
        let mut slot2 = None;
        let mut op1 = RecvCase::new(&c1, &mut slot1);
        let mut op2 = RecvCase::new(&c2, &mut slot2);

        let idx = select(&mut [&mut op1, &mut op2]).unwrap();

        assert_eq!(idx, 0);
        assert_eq!(slot1, Some(1));
        assert_eq!(slot2, None);
    }

    #[test]
    fn select_wakes_and_reports_closed_on_close() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let c1: Arc<Channel<i32>> = Arc::new(Channel::new(0));
        let c2: Arc<Channel<i32>> = Arc::new(Channel::new(0));
        let c2_closer = c2.clone();

        let closer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            c2_closer.close().unwrap();
        });

        let mut slot1 = None;
        let mut slot2 = None;
        let mut op1 = RecvCase::new(&*c1, &mut slot1);
        let mut op2 = RecvCase::new(&*c2, &mut slot2);

        let result = select(&mut [&mut op1, &mut op2]);

        closer.join().unwrap();
        assert_eq!(result, Err(SelectError::Closed(1)));
    }

    #[test]
    fn select_over_the_same_channel_twice_registers_token_once() {
        // Two receive ops on one channel both land in its receivers
        // registry; identity-deduplication (covered directly in
        // `waiter::tests`) must keep that registry at one entry, not two.
        let c = Channel::new(1);
        c.try_send(7).unwrap();

        let mut slot_a = None;
        let mut slot_b = None;
        let mut op_a = RecvCase::new(&c, &mut slot_a);
        let mut op_b = RecvCase::new(&c, &mut slot_b);

        let idx = select(&mut [&mut op_a, &mut op_b]).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(slot_a, Some(7));
        assert_eq!(slot_b, None);
    }
}
