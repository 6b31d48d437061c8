use zpipe_io::StepError;

/// Terminal failures for a [`StreamDriver`](crate::StreamDriver) run.
///
/// Nothing here is retried — the only transparently retried condition is an
/// interrupted OS read or write, which never surfaces as an error at all.
/// Offsets are global stream positions (input side), for diagnostics.
///
/// ```text
///   DriverError
///   ├── Read(io::Error)        ← OS input failure
///   ├── Write(io::Error)       ← OS output failure (fatal by policy)
///   ├── Decode(StepError)      ← decoder-reported fault, carries its message
///   ├── TruncatedInput         ← source closed mid-frame
///   └── Stalled                ← contract violation: no progress possible
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The OS input read failed (other than interruption, which is retried).
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    /// The OS output write failed or came up short. Fatal by policy: a
    /// filter must never silently drop decoded bytes. Note that some output
    /// may already have been flushed before the failure — an inherent
    /// property of streaming decode.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),

    /// The decoder reported an unrecoverable fault in the compressed data.
    #[error("decode failed: {0}")]
    Decode(#[from] StepError),

    /// The source reached end-of-stream in the middle of a frame.
    #[error("truncated input: stream ended mid-frame at offset {offset}")]
    TruncatedInput { offset: u64 },

    /// The decoder requested a suspension it can never be resumed from —
    /// more input with an already-full source buffer, or more output space
    /// into an already-empty destination. Indicates a decoder contract
    /// violation; failing here is what keeps the driver from spinning.
    #[error("decoder stalled: no progress possible at offset {offset}")]
    Stalled { offset: u64 },
}
