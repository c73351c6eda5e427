use crate::error::Result;
use bytes::{BufMut, BytesMut};
use std::time::Duration;

// Stream IDs
/// Private stream 1, used for AC-3 audio in DVB
pub const STREAM_ID_PRIVATE_1: u8 = 0xbd;

// PIDs
/// Null packet PID
pub const PID_NULL: u16 = 0x1fff;
/// Largest 13-bit PID
pub const MAX_PID: u16 = 0x1fff;

// Constants
/// First byte of every packet
pub const TS_SYNC_BYTE: u8 = 0x47;
/// Size of one transport packet
pub const TS_PACKET_SIZE: usize = 188;
/// Fixed packet header size
pub const TS_HEADER_SIZE: usize = 4;
/// Payload of a packet without adaptation field
pub const TS_MAX_PAYLOAD_SIZE: usize = TS_PACKET_SIZE - TS_HEADER_SIZE;
/// PES packet start code prefix
pub const PES_START_CODE: [u8; 3] = [0x00, 0x00, 0x01];
/// PES header bytes up to and including the header data length
pub const PES_FIXED_HEADER_SIZE: usize = 9;
/// AC-3 frame sync word
pub const AC3_SYNC_WORD: [u8; 2] = [0x0b, 0x77];
/// AC-3 sync frame header size
pub const AC3_HEADER_SIZE: usize = 7;
/// PTS clock rate
pub const PTS_HZ: u64 = 90_000;

/// The two adaptation field control bits of a TS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptationFieldControl {
    /// `00`, reserved by ISO/IEC 13818-1
    Reserved,
    /// `01`, payload directly follows the 4-byte header
    PayloadOnly,
    /// `10`, adaptation field and no payload
    AdaptationOnly,
    /// `11`, adaptation field followed by payload
    AdaptationAndPayload,
}

impl AdaptationFieldControl {
    /// Decodes the two low bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => Self::PayloadOnly,
            2 => Self::AdaptationOnly,
            3 => Self::AdaptationAndPayload,
            _ => Self::Reserved,
        }
    }

    /// Two-bit wire value.
    pub fn bits(self) -> u8 {
        match self {
            Self::Reserved => 0,
            Self::PayloadOnly => 1,
            Self::AdaptationOnly => 2,
            Self::AdaptationAndPayload => 3,
        }
    }
}

/// The fixed 4-byte TS packet header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TSHeader {
    /// Always 0x47
    pub sync_byte: u8,
    /// Transport error indicator
    pub transport_error: bool,
    /// Payload unit start indicator
    pub payload_unit_start: bool,
    /// Transport priority
    pub transport_priority: bool,
    /// Packet identifier (13 bits)
    pub pid: u16,
    /// Transport scrambling control (2 bits)
    pub scrambling_control: u8,
    /// Adaptation field control
    pub adaptation_field_control: AdaptationFieldControl,
    /// Continuity counter (4 bits), decoded but not checked
    pub continuity_counter: u8,
}

impl Default for TSHeader {
    fn default() -> Self {
        Self {
            sync_byte: TS_SYNC_BYTE,
            transport_error: false,
            payload_unit_start: false,
            transport_priority: false,
            pid: 0,
            scrambling_control: 0,
            adaptation_field_control: AdaptationFieldControl::PayloadOnly,
            continuity_counter: 0,
        }
    }
}

impl TSHeader {
    /// Writes the 4 header bytes.
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.sync_byte);

        let mut b1 = 0u8;
        if self.transport_error {
            b1 |= 0x80;
        }
        if self.payload_unit_start {
            b1 |= 0x40;
        }
        if self.transport_priority {
            b1 |= 0x20;
        }
        b1 |= ((self.pid >> 8) & 0x1f) as u8;
        buf.put_u8(b1);

        buf.put_u8((self.pid & 0xff) as u8);

        let b3 = (self.scrambling_control & 0x03) << 6
            | self.adaptation_field_control.bits() << 4
            | (self.continuity_counter & 0x0f);
        buf.put_u8(b3);

        Ok(())
    }
}

/// Location of the usable payload inside a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadView {
    /// Offset of the first payload byte, after any peeled PES/AC-3 framing
    pub offset: usize,
    /// Number of payload bytes
    pub len: usize,
    /// Bytes of PES/AC-3 framing skipped at the payload start
    pub peeled: usize,
}

/// A decoded packet on the target PID, borrowing the packet bytes.
#[derive(Debug, Clone)]
pub struct TSPacket<'a> {
    /// Decoded header
    pub header: TSHeader,
    /// Payload location, `None` when the packet carries no payload
    pub payload_view: Option<PayloadView>,
    data: &'a [u8],
}

impl<'a> TSPacket<'a> {
    pub(crate) fn new(header: TSHeader, payload_view: Option<PayloadView>, data: &'a [u8]) -> Self {
        Self {
            header,
            payload_view,
            data,
        }
    }

    /// Payload bytes, or `None` when the packet carries no payload.
    pub fn payload(&self) -> Option<&'a [u8]> {
        self.payload_view
            .map(|view| &self.data[view.offset..view.offset + view.len])
    }
}

/// Outcome of parsing one packet.
#[derive(Debug, Clone)]
pub enum ParseOutcome<'a> {
    /// First byte is not the sync byte
    NotSynced(u8),
    /// Fewer bytes than a TS header
    TooShort,
    /// Transport error indicator set; nothing else was decoded
    TransportError,
    /// Packet belongs to another PID
    OtherPid(u16),
    /// Packet on the target PID
    Packet(TSPacket<'a>),
}

/// Converts a duration to 90 kHz PTS ticks.
pub fn time_to_pts(time: Duration) -> u64 {
    time.as_nanos() as u64 * PTS_HZ / 1_000_000_000
}
