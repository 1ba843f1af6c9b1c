//! Chromium pickle framing
//!
//! Archives open with two pickles. A pickle is a little-endian `u32` payload
//! size followed by the payload, padded with zeros to a 4-byte boundary.
//!
//! ```text
//! [0, 8)              size pickle: payload_size = 4, u32 header_frame_len
//! [8, 8 + F)          header pickle (F = header_frame_len bytes):
//!   [8, 12)             payload_size = 4 + align4(H)
//!   [12, 16)            i32 string length H
//!   [16, 16 + H)        UTF-8 JSON header
//!   [16 + H, 8 + F)     zero padding
//! [8 + F, ...)        file data region
//! ```
//!
//! Every offset above is derived from the constants in this module rather
//! than hard-coded by callers.

mod error;

pub use error::{PickleError, PickleResult};

use binrw::{BinRead, BinReaderExt, BinWrite, BinWriterExt};
use std::io::Cursor;

/// Alignment of pickle payloads in bytes
pub const PICKLE_ALIGNMENT: usize = 4;

/// Size of a `u32` value written into a pickle
pub const UINT32_SIZE: usize = 4;

/// Size of the `i32` length field preceding a pickled string
pub const STRING_LENGTH_SIZE: usize = 4;

/// Total length of the size pickle that opens every archive
pub const SIZE_FRAME_LEN: usize = PickleHeader::SIZE + align_to_pickle(UINT32_SIZE);

/// Absolute offset of the header JSON text within an archive
pub const HEADER_STRING_OFFSET: usize = SIZE_FRAME_LEN + PickleHeader::SIZE + STRING_LENGTH_SIZE;

/// Header of a single pickle
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PickleHeader {
    /// Payload size in bytes, excluding this header
    pub payload_size: u32,
}

impl PickleHeader {
    /// Encoded size of the header
    pub const SIZE: usize = 4;

    fn read_from(bytes: &[u8]) -> PickleResult<Self> {
        ensure_len(bytes, Self::SIZE)?;
        let mut cursor = Cursor::new(bytes);
        Ok(Self::read(&mut cursor)?)
    }

    fn payload_len(self) -> usize {
        self.payload_size as usize
    }
}

/// Round `len` up to the next pickle alignment boundary
pub const fn align_to_pickle(len: usize) -> usize {
    len.next_multiple_of(PICKLE_ALIGNMENT)
}

/// Total length of a pickle holding a single string of `string_len` bytes
pub const fn string_frame_len(string_len: usize) -> usize {
    PickleHeader::SIZE + STRING_LENGTH_SIZE + align_to_pickle(string_len)
}

/// Absolute offset of the file data region given the header frame length
pub const fn data_region_start(header_frame_len: usize) -> usize {
    SIZE_FRAME_LEN + header_frame_len
}

/// Encode a pickle holding a single `u32`
pub fn encode_u32_frame(value: u32) -> PickleResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(SIZE_FRAME_LEN));
    PickleHeader {
        payload_size: UINT32_SIZE as u32,
    }
    .write(&mut cursor)?;
    cursor.write_le(&value)?;
    Ok(cursor.into_inner())
}

/// Decode a pickle holding a single `u32`
///
/// Returns the value and the number of bytes the whole pickle occupies.
pub fn decode_u32_frame(bytes: &[u8]) -> PickleResult<(u32, usize)> {
    let header = PickleHeader::read_from(bytes)?;
    let payload_len = header.payload_len();
    if payload_len < UINT32_SIZE {
        return Err(PickleError::PayloadTooSmall {
            payload_size: payload_len,
            required: UINT32_SIZE,
        });
    }

    let consumed = PickleHeader::SIZE + align_to_pickle(payload_len);
    ensure_len(bytes, consumed)?;

    let mut cursor = Cursor::new(&bytes[PickleHeader::SIZE..]);
    let value: u32 = cursor.read_le()?;
    Ok((value, consumed))
}

/// Encode a pickle holding a single string
pub fn encode_string_frame(value: &str) -> PickleResult<Vec<u8>> {
    let len = i32::try_from(value.len()).map_err(|_| PickleError::StringTooLarge(value.len()))?;
    let frame_len = string_frame_len(value.len());
    let payload_size = u32::try_from(frame_len - PickleHeader::SIZE)
        .map_err(|_| PickleError::StringTooLarge(value.len()))?;

    let mut out = Vec::with_capacity(frame_len);
    {
        let mut cursor = Cursor::new(&mut out);
        PickleHeader { payload_size }.write(&mut cursor)?;
        cursor.write_le(&len)?;
    }
    out.extend_from_slice(value.as_bytes());
    out.resize(frame_len, 0);
    Ok(out)
}

/// Decode a pickle holding a single string
///
/// `bytes` starts at the pickle; `declared_len` is the pickle length recorded
/// by the enclosing size frame. The returned string borrows from `bytes`.
pub fn decode_string_frame(bytes: &[u8], declared_len: usize) -> PickleResult<&str> {
    if declared_len > bytes.len() {
        return Err(PickleError::DeclaredLengthExceedsBuffer {
            declared: declared_len,
            available: bytes.len(),
        });
    }
    let frame = &bytes[..declared_len];

    let header = PickleHeader::read_from(frame)?;
    let payload_len = header.payload_len();
    ensure_len(frame, PickleHeader::SIZE + payload_len)?;
    if payload_len < STRING_LENGTH_SIZE {
        return Err(PickleError::PayloadTooSmall {
            payload_size: payload_len,
            required: STRING_LENGTH_SIZE,
        });
    }

    let mut cursor = Cursor::new(&frame[PickleHeader::SIZE..]);
    let raw_len: i32 = cursor.read_le()?;
    let len = usize::try_from(raw_len).map_err(|_| PickleError::NegativeStringLength(raw_len))?;
    if STRING_LENGTH_SIZE + len > payload_len {
        return Err(PickleError::PayloadTooSmall {
            payload_size: payload_len,
            required: STRING_LENGTH_SIZE + len,
        });
    }

    let start = PickleHeader::SIZE + STRING_LENGTH_SIZE;
    Ok(std::str::from_utf8(&frame[start..start + len])?)
}

fn ensure_len(bytes: &[u8], needed: usize) -> PickleResult<()> {
    if bytes.len() < needed {
        return Err(PickleError::Truncated {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}
