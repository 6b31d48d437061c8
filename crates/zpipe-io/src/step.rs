use crate::buffer::IoBuffer;

/// Outcome of one decoder step.
///
/// These are ordinary return values consumed by the driver's explicit state
/// machine — "suspension" means returning control to the loop, not a
/// language-level coroutine yield.
///
/// ```text
///   Finished        ← the whole logical stream is decoded; stop calling step
///   NeedMoreInput   ← src is (effectively) drained; append more source bytes
///   DestinationFull ← dst hit capacity; flush/compact dst, then resume
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// The entire logical stream has been fully decoded. No further calls
    /// to `step` are valid.
    Finished,

    /// The decoder consumed all available unread bytes in `src` (or cannot
    /// proceed without more). The caller must append more source bytes —
    /// or, if the source is already closed, treat this as truncation.
    NeedMoreInput,

    /// The decoder filled `dst` to capacity before finishing and must be
    /// resumed after the caller drains the destination.
    DestinationFull,
}

/// Unrecoverable decoding fault. Terminal for the stream.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Corrupt stream, unsupported feature, or version mismatch — carries
    /// the decoder-supplied message.
    #[error("{0}")]
    Malformed(String),
}

/// An incremental transform driven one step at a time through a pair of
/// bounded buffers.
///
/// Implementations persist their state across calls and are re-entrant with
/// exactly the same `dst`/`src` instances: each call resumes where the last
/// left off, consuming strictly from `[ri, wi)` of `src` and writing
/// strictly to `[wi, capacity)` of `dst`, advancing both cursors
/// monotonically.
///
/// Progress requirement: whenever neither "source drained" nor "destination
/// full" holds on entry, a call must advance at least one cursor or return
/// `Finished`/`Err` — it must never report a suspension on unchanged
/// buffers forever. The driver treats a violation as a stall and fails
/// deterministically rather than spinning.
///
/// The trait has exactly one method on purpose: any incremental transform
/// with this suspend/resume shape (decompression, streaming decryption,
/// incremental parsing) can sit behind it.
pub trait StepDecode {
    /// Advance the transform by one step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Malformed`] on an unrecoverable decoding fault.
    fn step(&mut self, dst: &mut IoBuffer, src: &mut IoBuffer) -> Result<StepStatus, StepError>;
}
