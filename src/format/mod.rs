/// eQ container marker, header and encoder
pub mod container;

/// MPEG transport stream packet layer
pub mod ts;

pub use self::container::{encode_container, ContainerHeader, MagicScanner};
pub use self::ts::{ParseOutcome, TSPacket, TSPacketParser, TSPacketizer};
