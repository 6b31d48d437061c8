/// A fixed-capacity byte region with explicit read/write cursors.
///
/// `IoBuffer` is the unit of exchange between the stream driver and a
/// decoder: the driver appends raw bytes into a *source* buffer, the decoder
/// consumes them from `[ri, wi)` and produces into `[wi, capacity)` of a
/// *destination* buffer. The same type serves both roles.
///
/// ```text
///   0         ri          wi         capacity
///   ├─────────┼───────────┼──────────┤
///   │ consumed│  unread   │   free   │
///   └─────────┴───────────┴──────────┘
/// ```
///
/// Cursor invariant, maintained by every operation:
/// `0 <= read_index <= write_index <= capacity`.
///
/// The buffer owns its storage and never grows — bounding memory to the
/// capacity chosen at construction is the whole point of the design.
#[derive(Debug)]
pub struct IoBuffer {
    data: Box<[u8]>,
    /// Offset up to which bytes have been consumed.
    ri: usize,
    /// Offset up to which bytes are valid.
    wi: usize,
    /// Global stream offset of `ri == 0` in this buffer. Advances on
    /// compaction. Diagnostics only — never consulted by decoding logic.
    position: u64,
    /// Set once the producing side will never append again. Meaningful for
    /// source buffers only.
    closed: bool,
}

impl IoBuffer {
    /// Create an empty buffer with the given fixed capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. A zero-capacity buffer can never make
    /// progress on any unit of work, so constructing one is a programming
    /// error rather than a runtime condition.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "IoBuffer capacity must be non-zero");
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            ri: 0,
            wi: 0,
            position: 0,
            closed: false,
        }
    }

    /// The fixed capacity chosen at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn read_index(&self) -> usize {
        self.ri
    }

    #[must_use]
    pub fn write_index(&self) -> usize {
        self.wi
    }

    /// Global stream offset corresponding to offset 0 of this buffer.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of valid-but-unconsumed bytes (`wi - ri`).
    #[must_use]
    pub fn unread_len(&self) -> usize {
        self.wi - self.ri
    }

    /// Number of bytes that can still be appended (`capacity - wi`).
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.data.len() - self.wi
    }

    /// True once [`mark_closed`](Self::mark_closed) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when every valid byte has been consumed (`ri == wi`).
    #[must_use]
    pub fn is_source_exhausted(&self) -> bool {
        self.ri == self.wi
    }

    /// True when no more bytes can be written (`wi == capacity`).
    #[must_use]
    pub fn is_destination_full(&self) -> bool {
        self.wi == self.data.len()
    }

    /// The unread region `[ri, wi)`.
    #[must_use]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.ri..self.wi]
    }

    /// The free region `[wi, capacity)`, for the producing side to fill.
    /// Bytes written here only become valid after
    /// [`advance_write`](Self::advance_write).
    pub fn writable(&mut self) -> &mut [u8] {
        let wi = self.wi;
        &mut self.data[wi..]
    }

    /// Copy as many of `bytes` as fit into the free region, advancing the
    /// write cursor. Returns the number of bytes copied — `0` when the
    /// buffer is already full. Never blocks, never errors.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.free_len());
        self.data[self.wi..self.wi + n].copy_from_slice(&bytes[..n]);
        self.wi += n;
        n
    }

    /// Record that `n` bytes of the unread region have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`unread_len`](Self::unread_len) — the cursor
    /// invariant `ri <= wi` must hold after every operation.
    pub fn advance_read(&mut self, n: usize) {
        assert!(n <= self.unread_len(), "read cursor would pass write cursor");
        self.ri += n;
    }

    /// Record that `n` bytes of the free region now hold valid data.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`free_len`](Self::free_len) — the cursor
    /// invariant `wi <= capacity` must hold after every operation.
    pub fn advance_write(&mut self, n: usize) {
        assert!(n <= self.free_len(), "write cursor would pass capacity");
        self.wi += n;
    }

    /// Signal that no more bytes will ever be appended. Idempotent.
    pub fn mark_closed(&mut self) {
        self.closed = true;
    }

    /// Move the unread region `[ri, wi)` to offset 0, reclaiming the space
    /// behind the read cursor. Byte contents and relative order are
    /// preserved exactly; `position` advances by the old `ri` so global
    /// offsets stay meaningful.
    pub fn compact(&mut self) {
        if self.ri == 0 {
            return;
        }
        self.data.copy_within(self.ri..self.wi, 0);
        self.position += self.ri as u64;
        self.wi -= self.ri;
        self.ri = 0;
    }

    /// Discard the entire unread region and return the buffer to empty
    /// (`ri == wi == 0`). Used by the driver after flushing a destination
    /// buffer to the sink.
    pub fn drain(&mut self) {
        self.ri = self.wi;
        self.compact();
    }
}
