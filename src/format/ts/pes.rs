use super::types::*;
use crate::error::Result;
use bytes::{BufMut, BytesMut};
use std::time::Duration;

/// Returns how many bytes of PES and AC-3 framing precede the container data
/// at the start of `payload`, or 0 when the payload is not framed that way.
///
/// Only private stream 1 (DVB AC-3) PES packets followed by an AC-3 sync
/// frame are recognised. PES headers are assumed to start at a TS payload
/// boundary, which holds for the muxers producing these streams.
pub fn pes_ac3_header_size(payload: &[u8]) -> usize {
    let size = payload.len();
    if size < 6 || payload[..3] != PES_START_CODE {
        return 0;
    }

    if payload[3] != STREAM_ID_PRIVATE_1 {
        return 0;
    }

    // Audio streams have at least 9 bytes of header
    if size < PES_FIXED_HEADER_SIZE {
        return 0;
    }

    let pes_header_size = PES_FIXED_HEADER_SIZE + payload[8] as usize;
    if pes_header_size > size {
        return 0;
    }

    match payload.get(pes_header_size..pes_header_size + AC3_SYNC_WORD.len()) {
        Some(sync) if sync == AC3_SYNC_WORD => {}
        _ => return 0,
    }

    if pes_header_size + AC3_HEADER_SIZE > size {
        return 0;
    }
    pes_header_size + AC3_HEADER_SIZE
}

/// Minimal PES header writer, enough to frame private-stream payloads.
#[derive(Debug, Clone)]
pub struct PESHeader {
    /// Stream identifier indicating content type
    pub stream_id: u8,
    /// Length of the PES packet after this field, 0 for unbounded
    pub packet_length: u16,
    /// Data alignment indicator
    pub data_alignment: bool,
    /// Presentation Time Stamp (33 bits)
    pub pts: Option<u64>,
    /// Extra stuffing bytes appended to the optional header
    pub stuffing: u8,
}

impl PESHeader {
    /// Unbounded, aligned PES header without timestamps.
    pub fn new(stream_id: u8) -> Self {
        Self {
            stream_id,
            packet_length: 0,
            data_alignment: true,
            pts: None,
            stuffing: 0,
        }
    }

    /// Adds a presentation timestamp.
    pub fn with_pts(mut self, pts: Duration) -> Self {
        self.pts = Some(time_to_pts(pts));
        self
    }

    /// Appends `stuffing` 0xFF bytes to the optional header.
    pub fn with_stuffing(mut self, stuffing: u8) -> Self {
        self.stuffing = stuffing;
        self
    }

    /// Value of the PES header data length byte.
    pub fn header_data_length(&self) -> u8 {
        let pts_len: u8 = if self.pts.is_some() { 5 } else { 0 };
        pts_len.saturating_add(self.stuffing)
    }

    /// Total encoded size in bytes.
    pub fn len(&self) -> usize {
        PES_FIXED_HEADER_SIZE + self.header_data_length() as usize
    }

    /// Writes the header, start code included.
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_slice(&PES_START_CODE);
        buf.put_u8(self.stream_id);
        buf.put_u16(self.packet_length);

        // '10' marker bits, no scrambling
        let mut flags = 0x80u8;
        if self.data_alignment {
            flags |= 0x04;
        }
        buf.put_u8(flags);

        buf.put_u8(if self.pts.is_some() { 0x80 } else { 0x00 });
        buf.put_u8(self.header_data_length());

        if let Some(pts) = self.pts {
            write_timestamp(buf, 0x20, pts)?;
        }
        for _ in 0..self.stuffing {
            buf.put_u8(0xFF);
        }

        Ok(())
    }
}

fn write_timestamp(buf: &mut BytesMut, marker: u8, ts: u64) -> Result<()> {
    let pts = ts & 0x1FFFFFFFF; // 33 bits

    buf.put_u8(marker | ((pts >> 29) & 0x0E) as u8 | 0x01);
    buf.put_u16((((pts >> 14) & 0xFFFE) | 0x01) as u16);
    buf.put_u16((((pts << 1) & 0xFFFE) | 0x01) as u16);

    Ok(())
}
