//! Swaps `std::sync` for `loom::sync` under `#[cfg(loom)]`, the way
//! `tachyonix`'s own `loom_exports` module does, so the same `channel.rs`
//! and `waiter.rs` code is exercised by loom's model checker without a
//! second, hand-maintained implementation to keep in sync.

#[cfg(loom)]
pub(crate) mod sync {
    pub(crate) use loom::sync::{Arc, Condvar, Mutex};
}
#[cfg(not(loom))]
pub(crate) mod sync {
    pub(crate) use std::sync::{Arc, Condvar, Mutex};
}
