use crate::{compute_crc, verify, Checksum, Result};

/// Decodes a hex encoded message into raw bytes
///
/// Both digit cases are accepted. Nothing else is, whitespace included.
///
/// # Errors
///
/// [`Error::MalformedInput`][crate::Error::MalformedInput] on an odd number of digits or a non-hex character.
pub fn decode_message(message: &str) -> Result<Vec<u8>> {
    hex::decode(message).map_err(|e| {
        log::debug!("rejected hex message of {} chars: {e}", message.len());
        e.into()
    })
}

/// CRC of a hex encoded message, returned as lowercase hex in transmission order
///
/// ```
/// assert_eq!(wmbus_crc::crc16_hex("1444AE0C7856341201078C2027780B13436587").unwrap(), "c57a");
/// ```
pub fn crc16_hex(message: &str) -> Result<String> {
    let message = decode_message(message)?;
    Ok(hex::encode(compute_crc(&message)))
}

/// Checks a hex encoded message against a hex encoded CRC in the form [`crc16_hex`] returns
pub fn verify_hex(message: &str, expected: &str) -> Result<()> {
    let expected: Checksum = expected.parse()?;
    let message = decode_message(message)?;
    verify(&message, expected)
}
