#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zpipe_io::IoBuffer;

// Fuzz target: arbitrary operation sequences against one IoBuffer.
//
// Catches bugs in:
// - Cursor invariant (0 <= ri <= wi <= capacity) after any operation mix
// - Compaction byte preservation and position accounting
// - Append clipping at capacity
#[derive(Arbitrary, Debug)]
enum Op {
    Append(Vec<u8>),
    AdvanceRead(usize),
    Compact,
    Drain,
    Close,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buf = IoBuffer::new(64);
    let mut consumed_total = 0u64;

    for op in ops {
        match op {
            Op::Append(bytes) => {
                let n = buf.append(&bytes);
                assert!(n <= bytes.len());
            }
            Op::AdvanceRead(n) => {
                let n = n % (buf.unread_len() + 1);
                let before = buf.readable().to_vec();
                buf.advance_read(n);
                assert_eq!(buf.readable(), &before[n..]);
            }
            Op::Compact => {
                let before = buf.readable().to_vec();
                consumed_total += buf.read_index() as u64;
                buf.compact();
                assert_eq!(buf.readable(), before.as_slice());
                assert_eq!(buf.read_index(), 0);
                assert_eq!(buf.position(), consumed_total);
            }
            Op::Drain => {
                consumed_total += buf.write_index() as u64;
                buf.drain();
                assert_eq!(buf.unread_len(), 0);
            }
            Op::Close => buf.mark_closed(),
        }
        assert!(buf.read_index() <= buf.write_index());
        assert!(buf.write_index() <= buf.capacity());
    }
});
