use super::pes::pes_ac3_header_size;
use super::types::*;
use crate::config::Config;
use crate::error::{ExtractError, Result};

/// Decodes transport packets and exposes the payload of a single PID.
#[derive(Debug, Clone)]
pub struct TSPacketParser {
    target_pid: u16,
    skip_transport_errors: bool,
}

impl TSPacketParser {
    /// Parser keeping packets of `target_pid` and skipping packets with the
    /// transport error indicator set.
    pub fn new(target_pid: u16) -> Self {
        Self {
            target_pid,
            skip_transport_errors: true,
        }
    }

    /// Parser set up from `target_pid` and `skip_transport_errors`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.target_pid).with_transport_error_skip(config.skip_transport_errors)
    }

    /// Whether packets with the transport error indicator are reported as
    /// [`ParseOutcome::TransportError`]. When disabled the indicator is
    /// decoded but otherwise ignored.
    pub fn with_transport_error_skip(mut self, skip: bool) -> Self {
        self.skip_transport_errors = skip;
        self
    }

    /// PID whose payload is exposed.
    pub fn target_pid(&self) -> u16 {
        self.target_pid
    }

    /// Parses one packet.
    ///
    /// Only a payload offset running past the packet end is an error; every
    /// other irregularity is reported through [`ParseOutcome`].
    pub fn parse_packet<'a>(&self, data: &'a [u8]) -> Result<ParseOutcome<'a>> {
        let first = match data.first() {
            Some(&b) => b,
            None => return Ok(ParseOutcome::TooShort),
        };
        if first != TS_SYNC_BYTE {
            return Ok(ParseOutcome::NotSynced(first));
        }
        if data.len() < TS_HEADER_SIZE {
            return Ok(ParseOutcome::TooShort);
        }

        let header = decode_header(data);

        // Packet corrupted (FEC unable to correct)
        if header.transport_error && self.skip_transport_errors {
            return Ok(ParseOutcome::TransportError);
        }

        if header.pid != self.target_pid {
            return Ok(ParseOutcome::OtherPid(header.pid));
        }

        let payload_offset = match header.adaptation_field_control {
            AdaptationFieldControl::PayloadOnly if data.len() > TS_HEADER_SIZE => {
                Some(TS_HEADER_SIZE)
            }
            AdaptationFieldControl::AdaptationAndPayload if data.len() > TS_HEADER_SIZE + 1 => {
                Some(TS_HEADER_SIZE + 1 + data[TS_HEADER_SIZE] as usize)
            }
            _ => None,
        };

        let payload_view = match payload_offset {
            Some(offset) => {
                if offset > data.len() {
                    return Err(ExtractError::PayloadOffset {
                        offset,
                        len: data.len(),
                    });
                }
                let peeled = pes_ac3_header_size(&data[offset..]);
                Some(PayloadView {
                    offset: offset + peeled,
                    len: data.len() - offset - peeled,
                    peeled,
                })
            }
            None => None,
        };

        log::trace!(
            "pid {} cc {} afc {:?} payload {:?}",
            header.pid,
            header.continuity_counter,
            header.adaptation_field_control,
            payload_view
        );

        Ok(ParseOutcome::Packet(TSPacket::new(header, payload_view, data)))
    }
}

fn decode_header(data: &[u8]) -> TSHeader {
    TSHeader {
        sync_byte: data[0],
        transport_error: (data[1] & 0x80) != 0,
        payload_unit_start: (data[1] & 0x40) != 0,
        transport_priority: (data[1] & 0x20) != 0,
        pid: (((data[1] & 0x1F) as u16) << 8) | data[2] as u16,
        scrambling_control: (data[3] >> 6) & 0x03,
        adaptation_field_control: AdaptationFieldControl::from_bits(data[3] >> 4),
        continuity_counter: data[3] & 0x0F,
    }
}
