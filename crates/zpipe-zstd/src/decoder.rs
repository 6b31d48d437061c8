use zpipe_io::{IoBuffer, StepDecode, StepError, StepStatus};
use zstd::zstd_safe::{self, DCtx, InBuffer, OutBuffer};

use crate::error::ZstdInitError;

/// Minimum libzstd version this decoder accepts, in libzstd's
/// `MAJOR*10000 + MINOR*100 + PATCH` encoding. v1.4.0 is where the modern
/// streaming decompression API stabilised.
pub const MIN_LIBZSTD_VERSION: u32 = 10400;

/// Incremental zstd decoder implementing the [`StepDecode`] contract.
///
/// Wraps a libzstd streaming decompression context. One `step` call drives
/// `ZSTD_decompressStream` until the source buffer's unread region is
/// drained, the destination buffer is full, or the stream completes —
/// whichever comes first. All suspend/resume state beyond the buffer
/// cursors lives inside the libzstd context, which persists for the
/// decoder's whole lifetime.
///
/// Stream semantics are those of a filter: the input may concatenate any
/// number of zstd frames (skippable frames are consumed transparently), and
/// the stream is finished only when the source is exhausted, closed, and
/// positioned at a frame boundary. An empty input is the concatenation of
/// zero frames and finishes immediately with no output.
pub struct ZstdDecoder {
    ctx: DCtx<'static>,
    /// True between frames (and before the first one). A closed, exhausted
    /// source is a completed stream only at a frame boundary — anywhere
    /// else it is truncation, which the driver reports.
    at_frame_boundary: bool,
}

impl ZstdDecoder {
    /// Create a decoder, validating the linked libzstd version first.
    ///
    /// # Errors
    ///
    /// - [`ZstdInitError::UnsupportedVersion`] if the linked libzstd is
    ///   older than [`MIN_LIBZSTD_VERSION`].
    /// - [`ZstdInitError::ContextAllocation`] if the decompression context
    ///   cannot be allocated.
    pub fn new() -> Result<Self, ZstdInitError> {
        let found = zstd_safe::version_number();
        if found < MIN_LIBZSTD_VERSION {
            return Err(ZstdInitError::UnsupportedVersion {
                found,
                required: MIN_LIBZSTD_VERSION,
            });
        }
        let ctx = DCtx::try_create().ok_or(ZstdInitError::ContextAllocation)?;
        Ok(Self {
            ctx,
            at_frame_boundary: true,
        })
    }
}

impl StepDecode for ZstdDecoder {
    fn step(&mut self, dst: &mut IoBuffer, src: &mut IoBuffer) -> Result<StepStatus, StepError> {
        loop {
            if self.at_frame_boundary && src.is_source_exhausted() {
                if src.is_closed() {
                    return Ok(StepStatus::Finished);
                }
                return Ok(StepStatus::NeedMoreInput);
            }
            if dst.is_destination_full() {
                return Ok(StepStatus::DestinationFull);
            }

            let (consumed, produced, hint) = {
                let mut input = InBuffer::around(src.readable());
                let mut output = OutBuffer::around(dst.writable());
                let hint = self
                    .ctx
                    .decompress_stream(&mut output, &mut input)
                    .map_err(|code| {
                        StepError::Malformed(zstd_safe::get_error_name(code).to_owned())
                    })?;
                (input.pos, output.pos(), hint)
            };
            src.advance_read(consumed);
            dst.advance_write(produced);
            self.at_frame_boundary = hint == 0;

            // Mid-frame the loop keeps calling even with an exhausted
            // source: libzstd may still hold decoded output it could not
            // fit last time, and an empty-input call flushes it. Neither
            // cursor moving means the context genuinely needs more bytes —
            // suspend and let the driver read more or fail deterministically.
            if consumed == 0 && produced == 0 {
                return Ok(StepStatus::NeedMoreInput);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(data: &[u8]) -> Vec<u8> {
        zstd::stream::encode_all(data, 3).expect("reference compressor failed")
    }

    /// Drive a decoder by hand, feeding `payload` in `chunk`-byte slices
    /// through small buffers, collecting all output.
    fn decode_chunked(payload: &[u8], chunk: usize) -> Result<Vec<u8>, StepError> {
        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(64);
        let mut dst = IoBuffer::new(64);
        let mut fed = 0;
        let mut out = Vec::new();

        loop {
            match dec.step(&mut dst, &mut src)? {
                StepStatus::Finished => {
                    out.extend_from_slice(dst.readable());
                    return Ok(out);
                }
                StepStatus::DestinationFull => {
                    out.extend_from_slice(dst.readable());
                    dst.drain();
                }
                StepStatus::NeedMoreInput => {
                    assert!(
                        !(src.is_closed() && src.is_source_exhausted()),
                        "decoder reported truncation on a payload the test expected to be whole"
                    );
                    src.compact();
                    let take = chunk.min(payload.len() - fed);
                    fed += src.append(&payload[fed..fed + take]);
                    if fed == payload.len() {
                        src.mark_closed();
                    }
                }
            }
        }
    }

    #[test]
    fn version_gate_accepts_linked_library() {
        // The crate links a current libzstd; construction must succeed.
        assert!(ZstdDecoder::new().is_ok());
    }

    #[test]
    fn single_frame_roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let decoded = decode_chunked(&compress(&data), 16).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn empty_stream_finishes_with_no_output() {
        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(8);
        let mut dst = IoBuffer::new(8);
        src.mark_closed();
        assert_eq!(dec.step(&mut dst, &mut src).unwrap(), StepStatus::Finished);
        assert_eq!(dst.unread_len(), 0);
    }

    #[test]
    fn concatenated_frames_decode_as_one_stream() {
        let mut payload = compress(b"first frame ");
        payload.extend_from_slice(&compress(b"second frame"));
        let decoded = decode_chunked(&payload, 7).unwrap();
        assert_eq!(decoded, b"first frame second frame");
    }

    #[test]
    fn skippable_frame_is_consumed_transparently() {
        // Skippable frame: magic 0x184D2A50 (LE) + u32 size + payload.
        let mut payload = Vec::new();
        payload.extend_from_slice(&0x184D_2A50u32.to_le_bytes());
        payload.extend_from_slice(&4u32.to_le_bytes());
        payload.extend_from_slice(b"junk");
        payload.extend_from_slice(&compress(b"real content"));
        let decoded = decode_chunked(&payload, 5).unwrap();
        assert_eq!(decoded, b"real content");
    }

    #[test]
    fn bad_magic_is_malformed() {
        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(64);
        let mut dst = IoBuffer::new(64);
        src.append(b"this is not a zstd frame at all!");
        src.mark_closed();
        let err = dec.step(&mut dst, &mut src).unwrap_err();
        assert!(matches!(err, StepError::Malformed(_)));
    }

    #[test]
    fn truncated_frame_reports_need_more_input_on_closed_source() {
        let payload = compress(&b"some reasonably long content to truncate".repeat(8));
        let cut = &payload[..payload.len() / 2];

        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(payload.len());
        let mut dst = IoBuffer::new(4096);
        src.append(cut);
        src.mark_closed();

        // The driver maps this (closed + exhausted + NeedMoreInput) to a
        // truncation error; the decoder itself just suspends.
        loop {
            match dec.step(&mut dst, &mut src).unwrap() {
                StepStatus::NeedMoreInput => {
                    assert!(src.is_source_exhausted());
                    break;
                }
                StepStatus::DestinationFull => dst.drain(),
                StepStatus::Finished => panic!("truncated frame must not finish"),
            }
        }
    }

    #[test]
    fn destination_full_suspends_and_resumes() {
        let data = vec![0xABu8; 1024];
        let payload = compress(&data);

        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(payload.len());
        let mut dst = IoBuffer::new(32); // forces many suspensions
        src.append(&payload);
        src.mark_closed();

        let mut out = Vec::new();
        let mut saw_full = false;
        loop {
            match dec.step(&mut dst, &mut src).unwrap() {
                StepStatus::Finished => {
                    out.extend_from_slice(dst.readable());
                    break;
                }
                StepStatus::DestinationFull => {
                    saw_full = true;
                    assert!(dst.is_destination_full());
                    out.extend_from_slice(dst.readable());
                    dst.drain();
                }
                StepStatus::NeedMoreInput => panic!("whole payload was supplied up front"),
            }
        }
        assert!(saw_full, "a 32-byte destination must fill at least once");
        assert_eq!(out, data);
    }

    #[test]
    fn step_makes_progress_when_neither_side_is_blocked() {
        let payload = compress(b"progress check payload");

        let mut dec = ZstdDecoder::new().unwrap();
        let mut src = IoBuffer::new(payload.len());
        let mut dst = IoBuffer::new(4096);
        src.append(&payload);
        src.mark_closed();

        let before = (src.read_index(), dst.write_index());
        let status = dec.step(&mut dst, &mut src).unwrap();
        let after = (src.read_index(), dst.write_index());
        assert!(
            after != before || status == StepStatus::Finished,
            "step with available input and space must advance a cursor or finish"
        );
    }
}
