//! Bounded and rendezvous synchronous channels for in-process communication
//! between concurrent actors, with a multi-way `select` over an arbitrary
//! set of prospective send/receive operations.
//!
//! Flavors of channel, distinguished only by the `capacity` passed to
//! [`Channel::new`]:
//!
//! - **Bounded**: `capacity > 0`. `send` can block when the buffer is full;
//!   `receive` can block when it is empty.
//! - **Rendezvous**: `capacity == 0`. There is no buffering at all — a
//!   `send` blocks until a `receive` is there to hand the item to directly,
//!   and vice versa.
//!
//! Every channel supports graceful [`Channel::close`]: once closed, no
//! further `send`/`receive`/`select` on it ever succeeds, and every thread
//! currently blocked on it wakes with a `Closed` error in finite time.
//!
//! This crate does not provide separate sender/receiver handles the way an
//! MPSC channel does — the channel itself is the shared object. Share it
//! across threads the ordinary way, with `Arc::new(Channel::new(capacity))`.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use chansel::Channel;
//!
//! let channel = Arc::new(Channel::new(1));
//! let sender = channel.clone();
//!
//! let handle = thread::spawn(move || sender.send(42, true));
//!
//! assert_eq!(channel.receive(true), Ok(42));
//! handle.join().unwrap().unwrap();
//! ```

mod buffer;
mod channel;
mod error;
mod loom_exports;
mod select;
mod waiter;

pub use channel::Channel;
pub use error::{CloseError, DestroyError, RecvError, SelectError, SendError};
pub use select::{RecvCase, SelectCase, SendCase, select};
