//! File extraction from the payload of one transport stream PID.
//!
//! [`Extractor`] is the per-packet state machine: it locates the container
//! marker, assembles the header, reads the filename and copies the file
//! bytes to disk. [`StreamFeeder`] reads a stream in whole-packet batches,
//! feeds an extractor and reports progress.

mod context;
mod feeder;
mod machine;

pub use self::context::{HeaderAccumulator, Phase, PART_SUFFIX};
pub use self::feeder::{extract_file, extract_file_async, StreamFeeder};
pub use self::machine::{ExtractedFile, ExtractionReport, Extractor};

use crate::error::Result;

/// Consumer of transport packets, in stream order.
pub trait PacketSink {
    /// Handles one packet. An error stops the stream.
    fn push_packet(&mut self, packet: &[u8]) -> Result<()>;

    /// Releases partial output after a fatal error.
    fn abort(&mut self) -> Result<()>;
}
