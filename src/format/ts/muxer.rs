use super::types::*;
use crate::error::{ExtractError, Result};
use bytes::{BufMut, BytesMut};

/// Splits a byte stream into transport packets on one PID.
///
/// Payloads shorter than a full packet are padded through the adaptation
/// field, so every byte handed in comes back out as payload. The continuity
/// counter advances per packet and wraps at 16.
#[derive(Debug, Clone)]
pub struct TSPacketizer {
    pid: u16,
    continuity_counter: u8,
    null_counter: u8,
}

impl TSPacketizer {
    /// Packetizer for `pid`, continuity counter starting at 0.
    pub fn new(pid: u16) -> Self {
        Self {
            pid,
            continuity_counter: 0,
            null_counter: 0,
        }
    }

    /// PID written into every packet.
    pub fn pid(&self) -> u16 {
        self.pid
    }

    /// Writes `data` as consecutive full-size packets, the last one padded.
    /// Returns the number of packets written.
    pub fn packetize(&mut self, data: &[u8], buf: &mut BytesMut) -> Result<usize> {
        let mut count = 0;
        for chunk in data.chunks(TS_MAX_PAYLOAD_SIZE) {
            self.write_packet(chunk, buf)?;
            count += 1;
        }
        Ok(count)
    }

    /// Writes a single packet carrying `payload` (at most 184 bytes).
    pub fn write_packet(&mut self, payload: &[u8], buf: &mut BytesMut) -> Result<()> {
        if payload.len() > TS_MAX_PAYLOAD_SIZE {
            return Err(ExtractError::PayloadTooLarge {
                len: payload.len(),
                max: TS_MAX_PAYLOAD_SIZE,
            });
        }

        let stuffing_needed = TS_MAX_PAYLOAD_SIZE - payload.len();
        let adaptation_field_control = if stuffing_needed > 0 {
            AdaptationFieldControl::AdaptationAndPayload
        } else {
            AdaptationFieldControl::PayloadOnly
        };

        let header = TSHeader {
            pid: self.pid,
            adaptation_field_control,
            continuity_counter: self.next_continuity_counter(),
            ..Default::default()
        };
        header.write_to(buf)?;

        if stuffing_needed > 0 {
            write_stuffing_field(buf, stuffing_needed);
        }
        buf.put_slice(payload);
        Ok(())
    }

    /// Writes a null packet (PID 0x1FFF), useful to interleave filler.
    pub fn write_null_packet(&mut self, buf: &mut BytesMut) -> Result<()> {
        let header = TSHeader {
            pid: PID_NULL,
            continuity_counter: self.null_counter,
            ..Default::default()
        };
        self.null_counter = (self.null_counter + 1) & 0x0F;
        header.write_to(buf)?;
        buf.put_bytes(0xFF, TS_MAX_PAYLOAD_SIZE);
        Ok(())
    }

    fn next_continuity_counter(&mut self) -> u8 {
        let counter = self.continuity_counter;
        self.continuity_counter = (counter + 1) & 0x0F;
        counter
    }
}

/// Adaptation field occupying exactly `size` bytes, length byte included.
fn write_stuffing_field(buf: &mut BytesMut, size: usize) {
    let adaptation_length = size - 1;
    buf.put_u8(adaptation_length as u8);
    if adaptation_length > 0 {
        // no flags set
        buf.put_u8(0x00);
        buf.put_bytes(0xFF, adaptation_length - 1);
    }
}
