#![doc(html_root_url = "https://docs.rs/tsextract/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # tsextract - files out of MPEG transport streams
//!
//! `tsextract` recovers files that a datacast multiplexer embedded in the
//! payload of a single transport stream PID. Each file is wrapped in a small
//! "eQ" container: a 12-byte marker, an 18-byte big-endian header carrying
//! the filename length and file size, the filename, then the file bytes.
//!
//! ## Features
//!
//! - 188-byte TS packet parsing with adaptation field skipping
//! - PES / AC-3 framing removal at the start of a payload
//! - Marker search across packet boundaries
//! - Headers, filenames and file data spanning any number of packets
//! - Several files per stream, written as `<name>.part` and renamed when done
//! - Batched sync and async readers with progress reporting
//! - Container and TS encoders for building test streams
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tsextract::{extract_file, Config};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load();
//!     let report = extract_file("capture.ts", "out", &config, &mut |p| {
//!         println!("{}%", p);
//!     })?;
//!
//!     for file in &report.files {
//!         println!("{} ({} bytes)", file.path.display(), file.size);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Feeding packets yourself
//!
//! ```rust
//! use tsextract::format::{encode_container, TSPacketizer};
//! use tsextract::{Config, Extractor};
//! use bytes::BytesMut;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut stream = BytesMut::new();
//! TSPacketizer::new(6530)
//!     .packetize(&encode_container("hello.txt", b"hi"), &mut stream)
//!     .unwrap();
//!
//! let mut extractor = Extractor::new(dir.path(), &Config::default());
//! for packet in stream.chunks(188) {
//!     extractor.process_packet(packet).unwrap();
//! }
//! let report = extractor.finish();
//! assert_eq!(report.files[0].name, "hello.txt");
//! ```
//!
//! ## Module Overview
//!
//! - `format`: wire formats
//!   - `ts`: packet parsing, PES/AC-3 peeling, packetizer
//!   - `container`: marker scanner, header codec, container encoder
//!
//! - `extract`: the extraction state machine and stream feeders
//!
//! - `config`: settings from defaults, `tsextract.toml` and `TSEXTRACT_*`
//!   environment variables
//!
//! - `error`: error type and `Result` alias

/// Runtime settings
pub mod config;

/// Error types and utilities
pub mod error;

/// File extraction state machine and stream feeders
pub mod extract;

/// Transport stream and container formats
pub mod format;

pub use config::Config;
pub use error::{ExtractError, Result};
pub use extract::{
    extract_file, extract_file_async, ExtractedFile, ExtractionReport, Extractor, PacketSink,
    Phase, StreamFeeder,
};
