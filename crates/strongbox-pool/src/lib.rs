// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded-concurrency worker pool.
//!
//! A fixed set of executor tasks pulls jobs from a shared bounded queue, so
//! at most `size` jobs run at once no matter how many requests arrive.
//! [`WorkerPool::run`] wraps a job in a per-call completion signal and lets
//! the caller give up early through a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! without interrupting the job itself.

pub mod pool;

pub use pool::{Job, PoolStats, WorkerPool};
