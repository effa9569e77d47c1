use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the strips of an image are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run the strips one after another on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    #[default]
    Serial,

    /// Use the global Rayon thread pool, one task per strip.
    ParallelStrips,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    fn run<R: Send>(self, op: impl FnOnce(bool) -> R + Send) -> Result<R, ParallelError> {
        match self {
            ExecutionStrategy::Serial => Ok(op(false)),
            ExecutionStrategy::ParallelStrips => Ok(op(true)),
            ExecutionStrategy::Fixed(n) => {
                if n == 0 {
                    return Err(ParallelError::InvalidThreadCount(n));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?;
                Ok(pool.install(|| op(true)))
            }
        }
    }
}

/// Map a fallible function over the items with the given strategy.
///
/// The results keep the order of `items`. If any call fails, one of the errors is returned.
pub fn map_strips<T, R, E, F>(
    strategy: ExecutionStrategy,
    items: &[T],
    f: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: From<ParallelError> + Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    strategy.run(|parallel| {
        if parallel {
            items.par_iter().map(&f).collect()
        } else {
            items.iter().map(&f).collect()
        }
    })?
}

/// Apply a fallible function to every item and its exclusive chunk with the given strategy.
pub fn for_each_strip<T, E, F>(
    strategy: ExecutionStrategy,
    jobs: Vec<(&T, &mut [u8])>,
    f: F,
) -> Result<(), E>
where
    T: Sync,
    E: From<ParallelError> + Send,
    F: Fn(&T, &mut [u8]) -> Result<(), E> + Sync + Send,
{
    strategy.run(|parallel| {
        if parallel {
            jobs.into_par_iter()
                .try_for_each(|(item, chunk)| f(item, chunk))
        } else {
            jobs.into_iter()
                .try_for_each(|(item, chunk)| f(item, chunk))
        }
    })?
}
