#![doc = include_str!("../README.md")]
mod checksum;
mod error;
pub mod parser;
mod stream;
mod text;

pub use checksum::*;
pub use error::*;
pub use stream::*;
pub use text::*;

/// EN 13757-4 CRC16
///
/// Bit-serial long division by [`POLYNOMIAL`], most significant bit first, starting from a zero register.
/// The remainder is complemented with [`XOR_OUT`] before being returned.
pub const fn crc16(data: &[u8]) -> u16 {
    const TOP_BIT: u16 = 1 << (WIDTH - 1);

    let mut crc: u16 = 0;
    let mut i = 0;
    while i < data.len() {
        crc ^= (data[i] as u16) << (WIDTH - 8);
        let mut bit = 0;
        while bit < 8 {
            let carry = crc & TOP_BIT;
            crc <<= 1;
            if carry != 0 {
                crc ^= POLYNOMIAL;
            }
            bit += 1;
        }
        i += 1;
    }
    crc ^ XOR_OUT
}

/// CRC bytes of `message` in transmission order (low byte first)
pub const fn compute_crc(message: &[u8]) -> [u8; 2] {
    crc16(message).to_le_bytes()
}

/// Same as [`crc16`], wrapped in a [`Checksum`]
pub const fn checksum(message: &[u8]) -> Checksum {
    Checksum::new(crc16(message))
}

/// Recomputes the CRC of `message` and compares it against `expected`
///
/// # Errors
///
/// [`Error::ChecksumMismatch`] carrying both values when they differ.
pub fn verify(message: &[u8], expected: Checksum) -> Result<()> {
    let calculated = checksum(message);
    if calculated != expected {
        log::debug!(
            "crc mismatch over {} bytes: expected {expected}, calculated {calculated}",
            message.len()
        );
        return Err(Error::ChecksumMismatch {
            expected,
            calculated,
        });
    }
    Ok(())
}

// Catalogue check value for "123456789"
const _: () = assert!(crc16(b"123456789") == 0xC2B7);
