use super::{CONTAINER_VERSION, HEADER_BODY_SIZE, MAGIC};
use bytes::{BufMut, BytesMut};

/// Fixed-layout header that follows the magic marker.
///
/// Wire layout (big-endian): `version:1 flags:1 filename_length:8 file_size:8`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Container format version
    pub version: u8,
    /// Reserved flag bits, carried through unchanged
    pub flags: u8,
    /// Length of the filename that follows the header
    pub filename_length: u64,
    /// Length of the file data that follows the filename
    pub file_size: u64,
}

impl ContainerHeader {
    /// Header of the current version with no flags set.
    pub fn new(filename_length: u64, file_size: u64) -> Self {
        Self {
            version: CONTAINER_VERSION,
            flags: 0,
            filename_length,
            file_size,
        }
    }

    /// Decodes the 18 bytes following the marker. Lengths are not validated.
    pub fn decode(bytes: &[u8; HEADER_BODY_SIZE]) -> Self {
        let mut filename_length = [0u8; 8];
        let mut file_size = [0u8; 8];
        filename_length.copy_from_slice(&bytes[2..10]);
        file_size.copy_from_slice(&bytes[10..18]);

        Self {
            version: bytes[0],
            flags: bytes[1],
            filename_length: u64::from_be_bytes(filename_length),
            file_size: u64::from_be_bytes(file_size),
        }
    }

    /// Writes the marker followed by the header body.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(&MAGIC);
        buf.put_u8(self.version);
        buf.put_u8(self.flags);
        buf.put_u64(self.filename_length);
        buf.put_u64(self.file_size);
    }
}
