use nom::{
    bytes::streaming::take,
    combinator::verify,
    number::streaming::{be_u16, le_u16},
    IResult,
};

use crate::{checksum, Checksum, CrcOrder};

/// Parse a CRC field
///
/// Takes 2 bytes and reads them as a [`Checksum`] in the given `order`
pub fn crc_field<'a>(order: CrcOrder) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Checksum> {
    move |input| {
        let (input, value) = match order {
            CrcOrder::Little => le_u16(input)?,
            CrcOrder::Big => be_u16(input)?,
        };
        Ok((input, Checksum::new(value)))
    }
}

/// Parse a CRC protected block
///
/// Takes `len` data bytes followed by a CRC field and returns the data.
/// Fails with [`nom::error::ErrorKind::Verify`] when the field does not match the computed CRC.
pub fn checked_block<'a>(
    len: usize,
    order: CrcOrder,
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    move |input| {
        let (input, data) = take(len)(input)?;
        let calculated = checksum(data);
        let (input, _crc) = verify(crc_field(order), |received: &Checksum| {
            if *received != calculated {
                log::debug!(
                    "block of {len} bytes: received crc {received}, calculated {calculated}"
                );
            }
            *received == calculated
        })(input)?;
        Ok((input, data))
    }
}

/// Parse a message with a trailing CRC field
///
/// Everything but the last 2 bytes is data, the input is always fully consumed.
pub fn checked_message<'a>(order: CrcOrder) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    move |input: &'a [u8]| match input.len().checked_sub(2) {
        Some(len) => checked_block(len, order)(input),
        None => Err(nom::Err::Incomplete(nom::Needed::new(2 - input.len()))),
    }
}
