use std::io::{ErrorKind, Read, Write};

use zpipe_io::{IoBuffer, StepDecode, StepStatus};

use crate::config::DriverConfig;
use crate::error::DriverError;

/// Counters from a completed run. Diagnostics only — `--verbose` surfaces
/// them on stderr; nothing in the decode path depends on them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveReport {
    /// Raw bytes read from the source.
    pub bytes_in: u64,
    /// Decoded bytes flushed to the sink.
    pub bytes_out: u64,
    /// Decoder step calls made.
    pub steps: u64,
    /// Source-buffer compactions that actually moved bytes.
    pub src_compactions: u64,
    /// Destination-buffer flushes to the sink.
    pub dst_flushes: u64,
}

/// Internal phase of the drive loop.
///
/// ```text
///   Fill ──▶ Step ──▶ Fill        (NeedMoreInput)
///             │ ╲────▶ Step       (DestinationFull, output flushed)
///             ├──────▶ return Ok  (Finished)
///             └──────▶ return Err (decode fault / truncation / stall / I/O)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Fill,
    Step,
}

/// Orchestrates repeated read → decode-step → write cycles over one pair of
/// bounded buffers until the decoder finishes or a terminal error occurs.
///
/// The driver exclusively owns the decoder, both buffers, the input, and
/// the output for the whole run — single-threaded, purely synchronous, no
/// shared mutability. Suspension statuses from the decoder are ordinary
/// return values interpreted here:
///
/// - any step that produced output gets that output flushed to the sink in
///   production order, then the destination is drained back to empty, so
///   destination memory stays bounded by its capacity;
/// - `NeedMoreInput` compacts the source and goes back to reading, unless
///   the source is already full (a contract violation, reported as
///   [`DriverError::Stalled`]) or closed (truncation);
/// - `Finished` flushes any residual output and returns the report.
///
/// Interrupted OS reads are retried transparently and never surface as
/// errors. Failed or short writes are fatal.
pub struct StreamDriver<D, R, W> {
    decoder: D,
    input: R,
    output: W,
    src: IoBuffer,
    dst: IoBuffer,
    report: DriveReport,
}

impl<D: StepDecode, R: Read, W: Write> StreamDriver<D, R, W> {
    /// Create a driver with buffers sized per `config`.
    #[must_use]
    pub fn new(config: DriverConfig, decoder: D, input: R, output: W) -> Self {
        Self {
            decoder,
            input,
            output,
            src: IoBuffer::new(config.src_capacity),
            dst: IoBuffer::new(config.dst_capacity),
            report: DriveReport::default(),
        }
    }

    /// Drive the stream to completion.
    ///
    /// Consumes the driver: one decoder and one buffer pair serve exactly
    /// one stream, with no reuse.
    ///
    /// # Errors
    ///
    /// See [`DriverError`]. All errors are terminal; output flushed before
    /// the failure has already reached the sink.
    pub fn run(mut self) -> Result<DriveReport, DriverError> {
        let mut phase = Phase::Fill;
        loop {
            match phase {
                Phase::Fill => {
                    self.fill()?;
                    phase = Phase::Step;
                }
                Phase::Step => {
                    let status = self.decoder.step(&mut self.dst, &mut self.src)?;
                    self.report.steps += 1;
                    let flushed = self.flush()?;

                    match status {
                        StepStatus::Finished => return Ok(self.report),
                        StepStatus::DestinationFull => {
                            // The destination was just drained; a decoder
                            // that filled it produced at least one byte.
                            if flushed == 0 {
                                return Err(DriverError::Stalled {
                                    offset: self.input_offset(),
                                });
                            }
                            // Resume immediately — no new input needed.
                        }
                        StepStatus::NeedMoreInput => {
                            if self.src.read_index() > 0 {
                                self.report.src_compactions += 1;
                            }
                            self.src.compact();
                            if self.src.free_len() == 0 {
                                // A full buffer of the same unread bytes can
                                // never satisfy the decoder. Fail instead of
                                // spinning.
                                return Err(DriverError::Stalled {
                                    offset: self.input_offset(),
                                });
                            }
                            if self.src.is_closed() {
                                return Err(DriverError::TruncatedInput {
                                    offset: self.input_offset(),
                                });
                            }
                            phase = Phase::Fill;
                        }
                    }
                }
            }
        }
    }

    /// One blocking read from the source into the free region of `src`.
    /// End-of-stream closes the buffer; an interrupted call is retried
    /// without consuming any buffer state.
    fn fill(&mut self) -> Result<(), DriverError> {
        if self.src.is_closed() || self.src.free_len() == 0 {
            return Ok(());
        }
        loop {
            match self.input.read(self.src.writable()) {
                Ok(0) => {
                    self.src.mark_closed();
                    return Ok(());
                }
                Ok(n) => {
                    self.src.advance_write(n);
                    self.report.bytes_in += n as u64;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(DriverError::Read(e)),
            }
        }
    }

    /// Flush the unread region of `dst` to the sink in production order,
    /// then drain the buffer back to empty. Returns the byte count flushed.
    /// (`write_all` already retries interrupted writes internally.)
    fn flush(&mut self) -> Result<usize, DriverError> {
        let n = self.dst.unread_len();
        if n == 0 {
            return Ok(0);
        }
        self.output
            .write_all(self.dst.readable())
            .map_err(DriverError::Write)?;
        self.dst.drain();
        self.report.bytes_out += n as u64;
        self.report.dst_flushes += 1;
        Ok(n)
    }

    /// Global input offset of the next unconsumed source byte.
    fn input_offset(&self) -> u64 {
        self.src.position() + self.src.read_index() as u64
    }
}
