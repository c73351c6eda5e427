use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a transport stream for embedded files.
///
/// Every variant terminates the current extraction run. Conditions the
/// extractor can skip over (foreign PIDs, packets without payload, packets
/// with the transport error indicator set) never surface as errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Reading the source or renaming a finished file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A packet did not start with the sync byte.
    #[error("out of sync at packet {packet}: expected 0x47, found {found:#04x}")]
    OutOfSync {
        /// Zero-based index of the offending packet in the stream
        packet: u64,
        /// The byte found where the sync byte was expected
        found: u8,
    },

    /// The adaptation field pushed the payload start past the packet end.
    #[error("payload offset {offset} exceeds packet length {len}")]
    PayloadOffset {
        /// Computed payload offset
        offset: usize,
        /// Length of the packet being parsed
        len: usize,
    },

    /// A payload handed to the packetizer does not fit in one packet.
    #[error("payload of {len} bytes does not fit in one packet (max {max})")]
    PayloadTooLarge {
        /// Payload length requested
        len: usize,
        /// Largest payload one packet carries
        max: usize,
    },

    /// The decoded filename length is zero or not below the configured limit.
    #[error("filename length {length} outside accepted range 1..{limit}")]
    FilenameLength {
        /// Length declared by the container header
        length: u64,
        /// Exclusive upper bound
        limit: u64,
    },

    /// The filename is not a single path component.
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    /// The `.part` output file could not be created.
    #[error("could not open output file {}: {source}", path.display())]
    OutputOpen {
        /// Path that was being created
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Writing extracted bytes to the `.part` file failed.
    #[error("could not write output file {}: {source}", path.display())]
    OutputWrite {
        /// Path being written
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed or holds unusable values.
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
