//! # MPEG Transport Stream (TS) Packet Layer
//!
//! Just enough of ISO/IEC 13818-1 to pull one elementary stream out of a
//! transport stream and to produce test streams:
//!
//! - Header decoding with a single-PID filter
//! - Adaptation field skipping
//! - Peeling of PES / AC-3 framing at the payload start
//! - Packetizing arbitrary bytes onto one PID
//!
//! ## Example Usage
//!
//! ```rust
//! use bytes::BytesMut;
//! use tsextract::format::ts::{ParseOutcome, TSPacketParser, TSPacketizer, TS_PACKET_SIZE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut packetizer = TSPacketizer::new(6530);
//! let mut buf = BytesMut::new();
//! packetizer.packetize(b"hello", &mut buf)?;
//! assert_eq!(buf.len(), TS_PACKET_SIZE);
//!
//! let parser = TSPacketParser::new(6530);
//! match parser.parse_packet(&buf)? {
//!     ParseOutcome::Packet(packet) => assert_eq!(packet.payload(), Some(&b"hello"[..])),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

/// Packet builder for a single PID
pub mod muxer;

/// Packet header parsing and payload location
pub mod parser;

/// PES and AC-3 framing
pub mod pes;

/// Core TS types and constants
pub mod types;

pub use muxer::TSPacketizer;
pub use parser::TSPacketParser;
pub use pes::{pes_ac3_header_size, PESHeader};
pub use types::{
    AdaptationFieldControl,
    ParseOutcome,
    PayloadView,
    TSHeader,
    TSPacket,
    MAX_PID,
    PID_NULL,
    STREAM_ID_PRIVATE_1,
    TS_MAX_PAYLOAD_SIZE,
    TS_PACKET_SIZE,
    TS_SYNC_BYTE,
};
