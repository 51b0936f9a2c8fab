use std::{fmt, str::FromStr};

use crate::Error;

/// Generator polynomial of EN 13757-4
///
/// g(x) = x^16 + x^13 + x^12 + x^11 + x^10 + x^8 + x^6 + x^5 + x^2 + 1,
/// with the x^16 term implicit.
pub const POLYNOMIAL: u16 = 0x3D65;

/// Register width in bits
pub const WIDTH: u32 = 16;

/// Final complement applied to the remainder
pub const XOR_OUT: u16 = 0xFFFF;

/// Byte order of a CRC field inside a buffer
///
/// [`compute_crc`][crate::compute_crc] always yields [`CrcOrder::Little`].
/// Data-link blocks of a telegram carry the field high byte first, read those with [`CrcOrder::Big`].
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrcOrder {
    /// Low byte first
    #[default]
    Little,
    /// High byte first
    Big,
}

/// A complemented EN 13757-4 CRC
///
/// Holds the natural 16-bit value, the byte order only matters once it is serialized.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checksum(u16);

impl Checksum {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// Transmission order, as returned by [`compute_crc`][crate::compute_crc]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    pub const fn to_bytes(self, order: CrcOrder) -> [u8; 2] {
        match order {
            CrcOrder::Little => self.to_le_bytes(),
            CrcOrder::Big => self.to_be_bytes(),
        }
    }

    pub const fn from_bytes(order: CrcOrder, bytes: [u8; 2]) -> Self {
        match order {
            CrcOrder::Little => Self::from_le_bytes(bytes),
            CrcOrder::Big => Self::from_be_bytes(bytes),
        }
    }
}

impl From<u16> for Checksum {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Checksum> for u16 {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

/// Lowercase hex of the little-endian bytes, e.g. `c57a` for `0x7AC5`
impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [low, high] = self.to_le_bytes();
        write!(f, "{low:02x}{high:02x}")
    }
}

/// Parses the [`Display`][fmt::Display] form back, exactly four hex digits
impl FromStr for Checksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 2];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self::from_le_bytes(bytes))
    }
}
