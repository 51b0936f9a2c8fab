use std::io::{self, Read, Write};

#[cfg(feature = "tokio")]
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{checksum, CrcOrder};

const DEFAULT_BUF_CAPACITY: usize = 256;

/// A wrapper around a byte stream for reading and writing CRC protected blocks.
pub struct CrcStream<S> {
    inner: S,
    order: CrcOrder,
    buf_capacity: usize,
    pending: Vec<u8>,
}

impl<S> CrcStream<S> {
    /// Creates a new [`CrcStream`] using little-endian CRC fields.
    pub fn new(inner: S) -> Self {
        Self::with_order(inner, CrcOrder::default())
    }

    /// Creates a new [`CrcStream`] using CRC fields in the given byte order.
    pub fn with_order(inner: S, order: CrcOrder) -> Self {
        Self::with_capacity(inner, order, DEFAULT_BUF_CAPACITY)
    }

    /// Creates a new [`CrcStream`] with a custom receive buffer capacity.
    pub fn with_capacity(inner: S, order: CrcOrder, buf_capacity: usize) -> Self {
        Self {
            inner,
            order,
            buf_capacity: buf_capacity.max(1),
            pending: Vec::with_capacity(buf_capacity),
        }
    }

    pub fn order(&self) -> CrcOrder {
        self.order
    }

    /// Unwraps the stream, dropping any bytes read past the last block.
    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Takes one verified block off the front of the buffered bytes, `None` if more are needed.
    fn take_block(&mut self, len: usize) -> io::Result<Option<Vec<u8>>> {
        let block_parser_result = crate::parser::checked_block(len, self.order)(&self.pending[..]);

        match block_parser_result {
            Ok((rest, data)) => {
                let consumed = self.pending.len() - rest.len();
                let block = data.to_vec();
                self.pending.drain(..consumed);
                log::trace!("read block of {len} bytes, {} bytes buffered", self.pending.len());
                Ok(Some(block))
            }
            Err(nom::Err::Incomplete(_)) => Ok(None),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                let err = io::Error::new(
                    io::ErrorKind::InvalidData,
                    nom::Err::Failure(nom::error::Error::new(e.input.to_owned(), e.code)),
                );
                // Drop the rejected block so the next read starts after it
                let rejected = (len + 2).min(self.pending.len());
                self.pending.drain(..rejected);
                Err(err)
            }
        }
    }

    fn received(&mut self, recv_buf: &[u8]) -> io::Result<()> {
        if recv_buf.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Stream ended inside a block",
            ));
        }
        self.pending.extend_from_slice(recv_buf);
        Ok(())
    }

    /// Data followed by its CRC field.
    fn encode_block(&self, data: &[u8]) -> Vec<u8> {
        let mut block = Vec::with_capacity(data.len() + 2);
        block.extend_from_slice(data);
        block.extend(checksum(data).to_bytes(self.order));
        block
    }
}

impl<S: Read> CrcStream<S> {
    /// Reads a block of `len` data bytes and its CRC field from the stream.
    /// Returns the data once the CRC has been verified.
    ///
    /// # Errors
    ///
    /// If this function encounters any form of I/O or other error, an error variant will be returned as in [`Read::read`].
    ///
    /// If the stream ends before a whole block is read, an error kind of [`std::io::ErrorKind::UnexpectedEof`] is returned.
    /// If the CRC does not match, an error kind of [`std::io::ErrorKind::InvalidData`] is returned.
    pub fn read_block(&mut self, len: usize) -> io::Result<Vec<u8>> {
        loop {
            if let Some(block) = self.take_block(len)? {
                return Ok(block);
            }

            let mut recv_buf = vec![0u8; self.buf_capacity];
            let bytes_read = self.inner.read(&mut recv_buf)?;
            self.received(&recv_buf[..bytes_read])?;
        }
    }
}

impl<S: Write> CrcStream<S> {
    /// Writes `data` followed by its CRC field, then flushes.
    pub fn write_block(&mut self, data: &[u8]) -> io::Result<()> {
        let block = self.encode_block(data);
        self.inner.write_all(&block)?;
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(feature = "tokio")]
impl<S: AsyncRead + Unpin> CrcStream<S> {
    /// Async version of [`CrcStream::read_block`].
    pub async fn read_block_async(&mut self, len: usize) -> io::Result<Vec<u8>> {
        loop {
            if let Some(block) = self.take_block(len)? {
                return Ok(block);
            }

            let mut recv_buf = vec![0u8; self.buf_capacity];
            let bytes_read = self.inner.read(&mut recv_buf).await?;
            self.received(&recv_buf[..bytes_read])?;
        }
    }
}

#[cfg(feature = "tokio")]
impl<S: AsyncWrite + Unpin> CrcStream<S> {
    /// Async version of [`CrcStream::write_block`].
    pub async fn write_block_async(&mut self, data: &[u8]) -> io::Result<()> {
        let block = self.encode_block(data);
        self.inner.write_all(&block).await?;
        self.inner.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn writing_blocks() {
        let mut stream = CrcStream::new(Vec::new());
        stream
            .write_block(&hex::decode("1444AE0C7856341201078C2027780B13436587").unwrap())
            .unwrap();
        assert_eq!(
            stream.into_inner(),
            hex::decode("1444AE0C7856341201078C2027780B13436587C57A").unwrap()
        );

        let mut stream = CrcStream::with_order(Vec::new(), CrcOrder::Big);
        stream.write_block(&[]).unwrap();
        assert_eq!(stream.into_inner(), [0xFF, 0xFF]);
    }

    #[test]
    fn reading_blocks_across_small_reads() {
        let mut bytes = hex::decode("79138C7976CE000000000000000400000000000000BB52").unwrap();
        bytes.extend(hex::decode("79138C4491CE0000000000000003000000000000001170").unwrap());

        // Reads of 5 bytes split both blocks and their CRC fields
        let mut stream = CrcStream::with_capacity(Cursor::new(bytes.clone()), CrcOrder::Little, 5);
        assert_eq!(stream.read_block(21).unwrap(), &bytes[..21]);
        assert_eq!(stream.read_block(21).unwrap(), &bytes[23..44]);

        let err = stream.read_block(21).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn reading_corrupted_block() {
        let mut bytes = hex::decode("79138C7976CE000000000000000400000000000000BB52").unwrap();
        bytes[7] ^= 0x01;
        let mut stream = CrcStream::new(Cursor::new(bytes));
        let err = stream.read_block(21).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn reading_past_corrupted_block() {
        let mut bytes = hex::decode("79138C7976CE000000000000000400000000000000BB52").unwrap();
        bytes[7] ^= 0x01;
        bytes.extend(hex::decode("79138C4491CE0000000000000003000000000000001170").unwrap());

        // Both blocks arrive in the same read
        let mut stream = CrcStream::new(Cursor::new(bytes.clone()));
        assert_eq!(
            stream.read_block(21).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
        assert_eq!(stream.read_block(21).unwrap(), &bytes[23..44]);
        assert_eq!(
            stream.read_block(21).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );

        // The corrupted block is split across reads
        let mut stream = CrcStream::with_capacity(Cursor::new(bytes.clone()), CrcOrder::Little, 7);
        assert!(stream.read_block(21).is_err());
        assert_eq!(stream.read_block(21).unwrap(), &bytes[23..44]);
    }

    #[test]
    fn write_then_read_big_endian() {
        let mut stream = CrcStream::with_order(Vec::new(), CrcOrder::Big);
        stream.write_block(b"metering").unwrap();
        stream.write_block(b"").unwrap();
        let bytes = stream.into_inner();
        assert_eq!(bytes.len(), 12);

        let mut stream = CrcStream::with_order(Cursor::new(bytes), CrcOrder::Big);
        assert_eq!(stream.order(), CrcOrder::Big);
        assert_eq!(stream.read_block(8).unwrap(), b"metering");
        assert_eq!(stream.inner().position(), 12);
        assert_eq!(stream.read_block(0).unwrap(), b"");

        stream.inner_mut().set_position(0);
        assert_eq!(stream.read_block(8).unwrap(), b"metering");
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn async_blocks() {
        let mut stream = CrcStream::new(Vec::new());
        stream
            .write_block_async(&hex::decode("79138C4491CE000000000000000300000000000000").unwrap())
            .await
            .unwrap();
        let bytes = stream.into_inner();
        assert_eq!(&bytes[21..], [0x11, 0x70]);

        let mut stream = CrcStream::with_capacity(&bytes[..], CrcOrder::Little, 4);
        assert_eq!(stream.read_block_async(21).await.unwrap(), &bytes[..21]);
        assert_eq!(
            stream.read_block_async(1).await.unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
