//! # eQ Container
//!
//! Files are embedded in the payload of one elementary stream as:
//!
//! ```text
//! marker (12) | version (1) | flags (1) | filename_length (8, BE) | file_size (8, BE)
//! filename (filename_length bytes)
//! file data (file_size bytes)
//! ```
//!
//! The marker is `CA FE C0 DE F0 0D` repeated twice. It may start at any
//! payload offset and may be split across payloads.
//!
//! ```rust
//! use tsextract::format::container::{encode_container, MagicScanner, HEADER_SIZE};
//!
//! let data = encode_container("a.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
//! assert_eq!(data.len(), HEADER_SIZE + 5 + 4);
//!
//! let mut scanner = MagicScanner::new();
//! assert_eq!(scanner.find(&data), Some(12));
//! ```

use bytes::{BufMut, BytesMut};

/// Fixed-layout header decoding and encoding
pub mod header;

/// Marker search across payload boundaries
pub mod scanner;

pub use header::ContainerHeader;
pub use scanner::MagicScanner;

/// Marker preceding every embedded file.
pub const MAGIC: [u8; 12] = [
    0xCA, 0xFE, 0xC0, 0xDE, 0xF0, 0x0D, 0xCA, 0xFE, 0xC0, 0xDE, 0xF0, 0x0D,
];

/// Marker plus header body.
pub const HEADER_SIZE: usize = 30;

/// Header bytes following the marker.
pub const HEADER_BODY_SIZE: usize = HEADER_SIZE - MAGIC.len();

/// Version written by [`encode_container`].
pub const CONTAINER_VERSION: u8 = 2;

/// Serializes one file as marker, header, filename and data.
pub fn encode_container(filename: &str, data: &[u8]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + filename.len() + data.len());
    ContainerHeader::new(filename.len() as u64, data.len() as u64).write_to(&mut buf);
    buf.put_slice(filename.as_bytes());
    buf.put_slice(data);
    buf
}
