//! Eager prefetching.
//!
//! [`PrefetchFileManager`] overlaps downloads with consumption:
//!
//! - a dispatch loop drains the enumerator and starts one fetch task per file
//! - a [`Semaphore`](crate::Semaphore) bounds concurrent downloads
//! - an in-flight byte budget bounds data fetched but not yet handed back
//! - finished content goes to a bounded ready queue, failures to an error
//!   channel of the same capacity
//!
//! The ready queue closes once the enumerator is exhausted and every fetch
//! task has finished.

mod budget;
mod manager;
mod prefetcher;

pub use manager::{PrefetchFileManager, PrefetchStats};
