use crate::Checksum;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the adapters around the checksum engine
///
/// Computing a CRC never fails; these come from decoding text input or comparing against a received value.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Text is not a whole number of hex encoded bytes
    #[error("malformed input: {0}")]
    MalformedInput(#[from] hex::FromHexError),

    #[error("checksum mismatch: expected {expected}, calculated {calculated}")]
    ChecksumMismatch {
        expected: Checksum,
        calculated: Checksum,
    },
}
