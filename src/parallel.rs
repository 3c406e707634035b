//! Worker pool.
//!
//! `processes == 0` means sequential processing in the calling thread,
//! otherwise work is mapped on a dedicated rayon pool of that many threads.
//! Results always come back in input order.
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Error;

/// Items handed to each worker per batch.
const ITEMS_PER_WORKER: usize = 64;

/// Build a pool of `processes` threads, or [None] for sequential processing.
pub fn pool(processes: usize) -> Result<Option<ThreadPool>, Error> {
    if processes == 0 {
        return Ok(None);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(processes)
        .thread_name(|idx| format!("strephit-worker-{}", idx))
        .build()?;
    Ok(Some(pool))
}

/// Batch size to pull from lazy inputs.
pub fn batch_size(processes: usize) -> usize {
    if processes == 0 {
        1
    } else {
        processes * ITEMS_PER_WORKER
    }
}

/// Map `f` over `items`, on `pool` if there's one.
pub fn map<T, R, F>(pool: Option<&ThreadPool>, items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    match pool {
        Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
        None => items.into_iter().map(f).collect(),
    }
}
