//! Error and status types.
//!
//! Small enums implementing [`std::error::Error`] by hand, in the style of
//! the channel's own [`crate::channel`] module rather than via a derive
//! macro: there is little boilerplate a macro would save here, and the
//! corpus's own channel crates (`tachyonix`) do the same.

use std::fmt;

/// Returned by [`crate::channel::Channel::send`] and `try_send`.
///
/// The failed item is carried back inside the error so the caller never
/// loses ownership of a value that was not actually enqueued.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SendError<T> {
    /// Non-blocking send found the channel full.
    WouldBlock(T),
    /// The channel is closed; nothing was enqueued.
    Closed(T),
}

impl<T> SendError<T> {
    /// Recovers the item that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            SendError::WouldBlock(item) | SendError::Closed(item) => item,
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::WouldBlock(_) => write!(f, "send would block"),
            SendError::Closed(_) => write!(f, "send on a closed channel"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for SendError<T> {}

/// Returned by [`crate::channel::Channel::receive`] and `try_receive`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecvError {
    /// Non-blocking receive found the channel empty.
    WouldBlock,
    /// The channel is closed and drained; nothing to receive.
    Closed,
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecvError::WouldBlock => write!(f, "receive would block"),
            RecvError::Closed => write!(f, "receive on a closed channel"),
        }
    }
}

impl std::error::Error for RecvError {}

/// Returned by [`crate::channel::Channel::close`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CloseError {
    /// `close` was called on a channel that was already closed.
    AlreadyClosed,
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseError::AlreadyClosed => write!(f, "channel already closed"),
        }
    }
}

impl std::error::Error for CloseError {}

/// Returned by [`crate::channel::Channel::destroy`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DestroyError;

impl fmt::Display for DestroyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "destroy called on a channel that is still open")
    }
}

impl std::error::Error for DestroyError {}

/// Returned by [`crate::select::select`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SelectError {
    /// The op at this index resolved against a closed channel.
    Closed(usize),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::Closed(i) => write!(f, "select op {i} resolved against a closed channel"),
        }
    }
}

impl std::error::Error for SelectError {}
