/// Construction-time failures for [`ZstdDecoder`](crate::ZstdDecoder).
///
/// Both variants are fatal: a decoder that cannot be constructed against a
/// compatible library has nothing meaningful to retry.
#[derive(Debug, thiserror::Error)]
pub enum ZstdInitError {
    /// The linked libzstd predates the stable streaming decompression API.
    ///
    /// Versions are libzstd's `MAJOR*10000 + MINOR*100 + PATCH` encoding,
    /// so `10400` reads as v1.4.0.
    #[error("libzstd version {found} is older than required {required}")]
    UnsupportedVersion { found: u32, required: u32 },

    /// libzstd failed to allocate a decompression context.
    #[error("failed to allocate a zstd decompression context")]
    ContextAllocation,
}
