//! File manager and fetch policy traits.

use crate::iterator::SharedIterator;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use vf_error::Result;
use vf_types::LogContent;

/// Binding between a download strategy and the stream reader.
///
/// The reader asks the manager for the next consumable content and hands
/// consumed content back for cleanup.
pub trait FileManager: Send {
    /// Polls for the next ready content.
    ///
    /// Resolves to:
    /// - `Ok(Some(content))` when a file is ready
    /// - `Err(error)` when an error was reported since the last call
    /// - `Ok(None)` once every file has been delivered
    fn poll_get(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<LogContent>>>;

    /// Returns consumed content to the manager.
    fn put(&mut self, content: LogContent);

    /// Waits for the next ready content. See [`poll_get`](Self::poll_get).
    fn get(&mut self) -> Get<'_, Self>
    where
        Self: Sized,
    {
        Get { manager: self }
    }
}

impl<M: FileManager + ?Sized> FileManager for Box<M> {
    fn poll_get(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<LogContent>>> {
        (**self).poll_get(cx)
    }

    fn put(&mut self, content: LogContent) {
        (**self).put(content)
    }
}

/// Future returned by [`FileManager::get`].
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Get<'a, M: ?Sized> {
    manager: &'a mut M,
}

impl<M: FileManager + ?Sized> Future for Get<'_, M> {
    type Output = Result<Option<LogContent>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.manager.poll_get(cx)
    }
}

/// Builds a [`FileManager`] over an enumerator.
///
/// Called once by the stream reader on its first read. Implementations may
/// start background work before returning.
pub trait FetchPolicy: Send + Sync {
    /// Create (and start) a manager draining `iterator`.
    fn start(&self, iterator: SharedIterator) -> Box<dyn FileManager>;
}

impl<F> FetchPolicy for F
where
    F: Fn(SharedIterator) -> Box<dyn FileManager> + Send + Sync,
{
    fn start(&self, iterator: SharedIterator) -> Box<dyn FileManager> {
        self(iterator)
    }
}
