#![warn(clippy::pedantic)]

//! Shared fixtures for the zpipe integration tests and benches: a reference
//! compressor, adversarial readers, and a one-call drive helper.

use std::io::{self, Cursor, Read};

use zpipe_driver::{DriveReport, DriverConfig, DriverError, StreamDriver};
use zpipe_zstd::ZstdDecoder;

/// Compress `data` with the reference compressor (libzstd, level 3).
///
/// # Panics
///
/// Panics if the reference compressor fails, which only happens on
/// allocation failure.
#[must_use]
pub fn compress(data: &[u8]) -> Vec<u8> {
    zstd::stream::encode_all(data, 3).expect("reference compressor failed")
}

/// Decode `payload` through a full driver run with the given buffer
/// capacities, collecting the output.
///
/// # Errors
///
/// Propagates any [`DriverError`] from the run.
///
/// # Panics
///
/// Panics if the decoder cannot be constructed.
pub fn drive(
    payload: &[u8],
    src_capacity: usize,
    dst_capacity: usize,
) -> Result<(Vec<u8>, DriveReport), DriverError> {
    drive_from(Cursor::new(payload.to_vec()), src_capacity, dst_capacity)
}

/// Like [`drive`], but over an arbitrary reader.
///
/// # Errors
///
/// Propagates any [`DriverError`] from the run.
///
/// # Panics
///
/// Panics if the decoder cannot be constructed.
pub fn drive_from<R: Read>(
    input: R,
    src_capacity: usize,
    dst_capacity: usize,
) -> Result<(Vec<u8>, DriveReport), DriverError> {
    let mut out = Vec::new();
    let report = StreamDriver::new(
        DriverConfig::new(src_capacity, dst_capacity),
        ZstdDecoder::new().expect("decoder construction failed"),
        input,
        &mut out,
    )
    .run()?;
    Ok((out, report))
}

/// Reader adapter that yields at most `chunk` bytes per `read` call, however
/// much space the caller offers. Simulates a slow pipe.
pub struct TrickleReader<R> {
    inner: R,
    chunk: usize,
}

impl<R> TrickleReader<R> {
    /// # Panics
    ///
    /// Panics if `chunk` is zero, which would turn every read into EOF.
    pub fn new(inner: R, chunk: usize) -> Self {
        assert!(chunk > 0, "trickle chunk must be non-zero");
        Self { inner, chunk }
    }
}

impl<R: Read> Read for TrickleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let cap = self.chunk.min(buf.len());
        self.inner.read(&mut buf[..cap])
    }
}
