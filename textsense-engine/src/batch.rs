//! Execution mode selection for batch analysis

/// How a batch of documents is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One document after another on the calling thread
    Sequential,
    /// Documents spread over the rayon pool
    Parallel,
}

/// Number of worker threads available to a parallel batch
pub fn available_workers() -> usize {
    #[cfg(feature = "parallel")]
    return num_cpus::get().max(1);

    #[cfg(not(feature = "parallel"))]
    1
}

/// Pick the execution mode for a batch of `documents`
pub fn auto_select(documents: usize) -> ExecutionMode {
    if documents < 2 || available_workers() < 2 {
        // nothing to spread out
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}
