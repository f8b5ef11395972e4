//! One-shot image transfer over a byte stream: a fixed 12-byte header
//! followed by `width * height` raw samples, row-major. The stream may
//! deliver fewer bytes than requested per read (normal pipe behavior), so
//! both directions loop until the exact count has moved.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::core::buffer::PixelBuffer;

/// Bytes of [`Header`] on the wire: three native-order `i32` fields.
pub const HEADER_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("stream ended after {got} of {expected} header bytes")]
    IncompleteHeader {
        got: usize,
        expected: usize,
        #[source]
        source: Option<io::Error>,
    },
    #[error("stream ended after {got} of {expected} payload bytes")]
    IncompleteData {
        got: usize,
        expected: usize,
        #[source]
        source: Option<io::Error>,
    },
    #[error("header describes an invalid image: {0}")]
    BadHeader(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Transfer metadata sent once, immediately before the raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: i32,
    pub height: i32,
    pub max_value: i32,
}

impl Header {
    pub fn for_buffer(image: &PixelBuffer) -> Self {
        Self {
            width: image.width() as i32,
            height: image.height() as i32,
            max_value: i32::from(image.max_value()),
        }
    }

    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.width.to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_ne_bytes());
        bytes[8..12].copy_from_slice(&self.max_value.to_ne_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            width: i32::from_ne_bytes(bytes[0..4].try_into().unwrap()),
            height: i32::from_ne_bytes(bytes[4..8].try_into().unwrap()),
            max_value: i32::from_ne_bytes(bytes[8..12].try_into().unwrap()),
        }
    }

    /// Payload byte count, after validating the scalar fields. A corrupt
    /// stream must fail here rather than reach the allocator.
    pub fn payload_len(&self) -> Result<usize, TransferError> {
        if self.width < 0 || self.height < 0 {
            return Err(TransferError::BadHeader(format!(
                "negative dimensions {}x{}",
                self.width, self.height
            )));
        }
        if self.max_value < 0 || self.max_value > i32::from(u16::MAX) {
            return Err(TransferError::BadHeader(format!(
                "sample ceiling {} out of range",
                self.max_value
            )));
        }
        Ok(self.width as usize * self.height as usize)
    }
}

/// Receive one image: header, then exactly the payload the header announced.
///
/// Either returns a fully populated buffer or fails; a partial payload is
/// never exposed to the caller.
pub fn read_image<R: Read>(reader: &mut R) -> Result<PixelBuffer, TransferError> {
    let mut raw = [0u8; HEADER_LEN];
    read_full(reader, &mut raw).map_err(|(got, source)| TransferError::IncompleteHeader {
        got,
        expected: HEADER_LEN,
        source,
    })?;
    let header = Header::from_bytes(&raw);
    let expected = header.payload_len()?;

    let mut samples = vec![0u8; expected];
    read_full(reader, &mut samples).map_err(|(got, source)| TransferError::IncompleteData {
        got,
        expected,
        source,
    })?;

    Ok(PixelBuffer::new(
        header.width as u32,
        header.height as u32,
        header.max_value as u16,
        samples,
    ))
}

/// Send one image: header, then the full payload. `write_all` already loops
/// on partial writes, which pipes routinely produce.
pub fn write_image<W: Write>(writer: &mut W, image: &PixelBuffer) -> Result<(), TransferError> {
    writer.write_all(&Header::for_buffer(image).to_bytes())?;
    writer.write_all(image.samples())?;
    writer.flush()?;
    Ok(())
}

/// Read until `buf` is full, tolerating partial deliveries. On end-of-stream
/// or failure, reports how many bytes had arrived.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), (usize, Option<io::Error>)> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Err((total, None)),
            Ok(n) => total += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err((total, Some(err))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out at most `chunk` bytes per call, the way a pipe
    /// delivers data in pieces.
    struct Dribble<R> {
        inner: R,
        chunk: usize,
    }

    impl<R: Read> Read for Dribble<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            self.inner.read(&mut buf[..n])
        }
    }

    fn wire_bytes(width: i32, height: i32, payload: &[u8]) -> Vec<u8> {
        let header = Header { width, height, max_value: 255 };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_transfer_fidelity() {
        let payload = [10u8, 20, 30, 40, 50, 60, 70, 80];
        let mut stream = Cursor::new(wire_bytes(4, 2, &payload));
        let image = read_image(&mut stream).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.max_value(), 255);
        assert_eq!(image.samples()[1 * 4 + 2], 70);
    }

    #[test]
    fn test_partial_deliveries_accumulate() {
        let payload: Vec<u8> = (0..40).collect();
        let mut stream = Dribble {
            inner: Cursor::new(wire_bytes(8, 5, &payload)),
            chunk: 3,
        };
        let image = read_image(&mut stream).unwrap();
        assert_eq!(image.samples(), payload.as_slice());
    }

    #[test]
    fn test_short_header() {
        let mut stream = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        match read_image(&mut stream) {
            Err(TransferError::IncompleteHeader { got, expected, .. }) => {
                assert_eq!(got, 5);
                assert_eq!(expected, HEADER_LEN);
            }
            other => panic!("expected IncompleteHeader, got {:?}", other),
        }
    }

    #[test]
    fn test_short_payload() {
        // Header promises 12 bytes but only 7 follow.
        let mut stream = Cursor::new(wire_bytes(4, 3, &[9u8; 7]));
        match read_image(&mut stream) {
            Err(TransferError::IncompleteData { got, expected, .. }) => {
                assert_eq!(got, 7);
                assert_eq!(expected, 12);
            }
            other => panic!("expected IncompleteData, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let header = Header { width: -4, height: 2, max_value: 255 };
        let mut stream = Cursor::new(header.to_bytes().to_vec());
        assert!(matches!(
            read_image(&mut stream),
            Err(TransferError::BadHeader(_))
        ));
    }

    #[test]
    fn test_write_then_read() {
        let image = PixelBuffer::new(3, 2, 255, vec![0, 64, 128, 192, 255, 7]);
        let mut wire = Vec::new();
        write_image(&mut wire, &image).unwrap();
        assert_eq!(wire.len(), HEADER_LEN + 6);
        let received = read_image(&mut Cursor::new(wire)).unwrap();
        assert_eq!(received, image);
    }

    #[test]
    fn test_empty_image_transfers() {
        let image = PixelBuffer::zeroed(5, 0, 255);
        let mut wire = Vec::new();
        write_image(&mut wire, &image).unwrap();
        let received = read_image(&mut Cursor::new(wire)).unwrap();
        assert!(received.is_empty());
        assert_eq!(received.width(), 5);
    }
}
