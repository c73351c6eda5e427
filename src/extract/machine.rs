use super::context::{validate_filename, ExtractionContext, OutputFile, Phase};
use super::PacketSink;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::format::container::ContainerHeader;
use crate::format::ts::{ParseOutcome, TSPacketParser};
use bytes::BytesMut;
use std::path::{Path, PathBuf};

/// A file fully written and renamed to its final name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Name decoded from the container
    pub name: String,
    /// Final location on disk
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

/// Running totals of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Packets handed to the extractor
    pub packets_seen: u64,
    /// Packets on the target PID
    pub packets_matched: u64,
    /// Packets skipped because the transport error indicator was set
    pub packets_errored: u64,
    /// Completed files, in stream order
    pub files: Vec<ExtractedFile>,
    /// `.part` file left behind by a file cut off at the end of the stream
    pub incomplete: Option<PathBuf>,
}

/// State machine recovering embedded files from target-PID payloads.
///
/// Packets must be fed in stream order. Every file found is written to
/// `<output_dir>/<name>.part` while it is being received and renamed to
/// `<output_dir>/<name>` once its last byte arrived.
#[derive(Debug)]
pub struct Extractor {
    parser: TSPacketParser,
    output_dir: PathBuf,
    max_filename_len: u64,
    write_buffer_size: usize,
    ctx: ExtractionContext,
    report: ExtractionReport,
}

impl Extractor {
    /// Extractor writing into `output_dir`, filtering on `config.target_pid`.
    pub fn new<P: AsRef<Path>>(output_dir: P, config: &Config) -> Self {
        log::info!("Scanning for files to extract...");
        Self {
            parser: TSPacketParser::from_config(config),
            output_dir: output_dir.as_ref().to_path_buf(),
            max_filename_len: config.max_filename_len,
            write_buffer_size: config.write_buffer_size,
            ctx: ExtractionContext::default(),
            report: ExtractionReport::default(),
        }
    }

    /// Current phase of the file being looked for or extracted.
    pub fn phase(&self) -> Phase {
        self.ctx.phase
    }

    /// Marker bytes matched at the end of the last payload scanned.
    pub fn partial_marker_match(&self) -> usize {
        self.ctx.scanner.partial_match()
    }

    /// Header bytes collected while the header spans payloads.
    pub fn header_bytes_collected(&self) -> usize {
        self.ctx.header_acc.filled()
    }

    /// Bytes of the current file received so far.
    pub fn file_bytes_written(&self) -> u64 {
        self.ctx.file_bytes_written
    }

    /// Totals so far.
    pub fn report(&self) -> &ExtractionReport {
        &self.report
    }

    /// Processes one 188-byte packet.
    pub fn process_packet(&mut self, packet: &[u8]) -> Result<()> {
        let index = self.report.packets_seen;
        self.report.packets_seen += 1;

        let ts = match self.parser.parse_packet(packet)? {
            ParseOutcome::Packet(ts) => ts,
            ParseOutcome::NotSynced(found) => {
                return Err(ExtractError::OutOfSync {
                    packet: index,
                    found,
                })
            }
            ParseOutcome::TransportError => {
                log::debug!("skipping packet {} with transport error set", index);
                self.report.packets_errored += 1;
                return Ok(());
            }
            ParseOutcome::TooShort | ParseOutcome::OtherPid(_) => return Ok(()),
        };

        self.report.packets_matched += 1;
        match ts.payload() {
            Some(payload) => self.consume_payload(payload),
            None => Ok(()),
        }
    }

    /// Closes the output of a file cut off by the end of the stream, leaving
    /// its `.part` file, and returns the report.
    pub fn finish(mut self) -> ExtractionReport {
        if let Some(mut output) = self.ctx.output.take() {
            let stage = self.ctx.buffer.split();
            if let Err(e) = output.write_all(&stage) {
                log::warn!("could not flush incomplete file: {}", e);
            }
            let part = output.close();
            log::warn!(
                "stream ended after {} of {} bytes of {}, partial data left in {}",
                self.ctx.file_bytes_written,
                self.ctx.header.file_size,
                self.ctx.filename,
                part.display()
            );
            self.report.incomplete = Some(part);
        }
        self.report
    }

    /// Drops all in-flight state and deletes the `.part` file of an
    /// unfinished file, if any.
    pub fn abort(&mut self) -> Result<()> {
        let ctx = std::mem::take(&mut self.ctx);
        if let Some(output) = ctx.output {
            log::info!("aborting extraction of {}", ctx.filename);
            output.discard()?;
        }
        Ok(())
    }

    fn consume_payload(&mut self, payload: &[u8]) -> Result<()> {
        let mut offset = 0;
        loop {
            match self.ctx.phase {
                Phase::SearchingForHeader { .. } => match self.search_header(&payload[offset..])? {
                    Some(consumed) => offset += consumed,
                    None => return Ok(()),
                },
                Phase::ReadingFilename => {
                    offset += self.read_filename(&payload[offset..])?;
                    if self.ctx.phase == Phase::ReadingFilename {
                        return Ok(());
                    }
                }
                Phase::ReadingFile => {
                    offset += self.read_file(&payload[offset..])?;
                    if self.ctx.phase == Phase::ReadingFile {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Returns the payload bytes consumed once the header is complete.
    fn search_header(&mut self, payload: &[u8]) -> Result<Option<usize>> {
        let start = match self.ctx.phase {
            Phase::SearchingForHeader { assembling: true } => 0,
            _ => match self.ctx.scanner.find(payload) {
                Some(end) => {
                    self.ctx.phase = Phase::SearchingForHeader { assembling: true };
                    end
                }
                None => return Ok(None),
            },
        };

        let copied = self.ctx.header_acc.push(&payload[start..]);
        if !self.ctx.header_acc.is_complete() {
            return Ok(None);
        }

        let header = ContainerHeader::decode(self.ctx.header_acc.bytes());
        self.ctx.header_acc.clear();
        log::debug!(
            "container header: version {} flags {:#04x} filename length {} file size {}",
            header.version,
            header.flags,
            header.filename_length,
            header.file_size
        );

        if header.filename_length == 0 || header.filename_length >= self.max_filename_len {
            return Err(ExtractError::FilenameLength {
                length: header.filename_length,
                limit: self.max_filename_len,
            });
        }

        let filename_length = header.filename_length as usize;
        self.ctx.header = header;
        self.ctx.buffer = BytesMut::with_capacity(filename_length);
        self.ctx.buffer_target = filename_length;
        self.ctx.phase = Phase::ReadingFilename;

        Ok(Some(start + copied))
    }

    fn read_filename(&mut self, payload: &[u8]) -> Result<usize> {
        let to_copy = (self.ctx.buffer_target - self.ctx.buffer.len()).min(payload.len());
        self.ctx.buffer.extend_from_slice(&payload[..to_copy]);

        if self.ctx.buffer.len() >= self.ctx.buffer_target {
            self.open_output()?;
        }
        Ok(to_copy)
    }

    fn open_output(&mut self) -> Result<()> {
        let filename = validate_filename(&self.ctx.buffer)?;
        log::info!("Extracting file: {}", filename.display);

        let output = OutputFile::create(&self.output_dir, &filename.raw)?;
        let stage_size = self
            .ctx
            .header
            .file_size
            .min(self.write_buffer_size as u64) as usize;

        self.ctx.filename = filename.display;
        self.ctx.output = Some(output);
        self.ctx.buffer = BytesMut::with_capacity(stage_size);
        self.ctx.buffer_target = stage_size;
        self.ctx.file_bytes_written = 0;
        self.ctx.phase = Phase::ReadingFile;
        Ok(())
    }

    fn read_file(&mut self, payload: &[u8]) -> Result<usize> {
        let remaining = self.ctx.header.file_size - self.ctx.file_bytes_written;
        let to_read = (payload.len() as u64).min(remaining) as usize;
        let chunk = &payload[..to_read];

        if self.ctx.buffer.len() + chunk.len() > self.ctx.buffer_target {
            self.flush_staged()?;
        }
        if chunk.len() > self.ctx.buffer_target {
            self.write_output(chunk)?;
        } else {
            self.ctx.buffer.extend_from_slice(chunk);
        }
        self.ctx.file_bytes_written += to_read as u64;

        if self.ctx.file_bytes_written >= self.ctx.header.file_size {
            self.complete_file()?;
        }
        Ok(to_read)
    }

    fn flush_staged(&mut self) -> Result<()> {
        if self.ctx.buffer.is_empty() {
            return Ok(());
        }
        let staged = self.ctx.buffer.split();
        self.write_output(&staged)
    }

    fn write_output(&mut self, data: &[u8]) -> Result<()> {
        match self.ctx.output.as_mut() {
            Some(output) => output.write_all(data),
            None => Ok(()),
        }
    }

    fn complete_file(&mut self) -> Result<()> {
        self.flush_staged()?;
        if let Some(output) = self.ctx.output.take() {
            let path = output.finish()?;
            log::info!("Completed extraction of file: {}", self.ctx.filename);
            self.report.files.push(ExtractedFile {
                name: std::mem::take(&mut self.ctx.filename),
                path,
                size: self.ctx.file_bytes_written,
            });
        }
        self.ctx = ExtractionContext::default();
        log::info!("Scanning for files to extract...");
        Ok(())
    }
}

impl PacketSink for Extractor {
    fn push_packet(&mut self, packet: &[u8]) -> Result<()> {
        self.process_packet(packet)
    }

    fn abort(&mut self) -> Result<()> {
        Extractor::abort(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::container::{encode_container, ContainerHeader, MAGIC};
    use crate::format::ts::{PESHeader, TSPacketizer, STREAM_ID_PRIVATE_1, TS_PACKET_SIZE};
    use bytes::{BufMut, BytesMut};
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;
    use std::fs;
    use tempfile::TempDir;

    const PID: u16 = 6530;

    fn setup() -> (TempDir, Extractor) {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(dir.path(), &Config::default());
        (dir, extractor)
    }

    /// One packet per payload, each padded through the adaptation field.
    fn packets(payloads: &[&[u8]]) -> Vec<Vec<u8>> {
        let mut packetizer = TSPacketizer::new(PID);
        payloads
            .iter()
            .map(|payload| {
                let mut buf = BytesMut::new();
                packetizer.write_packet(payload, &mut buf).unwrap();
                buf.to_vec()
            })
            .collect()
    }

    fn feed(extractor: &mut Extractor, packets: &[Vec<u8>]) {
        for packet in packets {
            extractor.process_packet(packet).unwrap();
        }
    }

    fn header_bytes(filename_length: u64, file_size: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        ContainerHeader::new(filename_length, file_size).write_to(&mut buf);
        buf.to_vec()
    }

    #[test]
    fn test_single_packet_file() {
        let (dir, mut extractor) = setup();
        let container = encode_container("a.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
        feed(&mut extractor, &packets(&[&container]));

        assert_eq!(fs::read(dir.path().join("a.bin")).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(!dir.path().join("a.bin.part").exists());
        assert_eq!(extractor.phase(), Phase::default());

        let report = extractor.finish();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "a.bin");
        assert_eq!(report.files[0].size, 4);
        assert_eq!(report.incomplete, None);
    }

    #[test]
    fn test_marker_tail_in_next_packet() {
        let (dir, mut extractor) = setup();
        let container = encode_container("a.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let mut first = vec![0x55; 100];
        first.extend_from_slice(&container[..10]);

        feed(&mut extractor, &packets(&[&first]));
        assert_eq!(extractor.partial_marker_match(), 10);

        feed(&mut extractor, &packets(&[&container[10..]]));
        assert_eq!(fs::read(dir.path().join("a.bin")).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_header_split_over_three_packets() {
        let (dir, mut extractor) = setup();
        let container = encode_container("split.txt", b"hello world");

        let chunks: [&[u8]; 4] = [
            &container[..14],
            &container[14..20],
            &container[20..31],
            &container[31..],
        ];
        let packets = packets(&chunks);

        extractor.process_packet(&packets[0]).unwrap();
        assert_eq!(extractor.phase(), Phase::SearchingForHeader { assembling: true });
        assert_eq!(extractor.header_bytes_collected(), 2);

        extractor.process_packet(&packets[1]).unwrap();
        assert_eq!(extractor.header_bytes_collected(), 8);

        extractor.process_packet(&packets[2]).unwrap();
        assert_eq!(extractor.phase(), Phase::ReadingFilename);

        extractor.process_packet(&packets[3]).unwrap();
        assert_eq!(fs::read(dir.path().join("split.txt")).unwrap(), b"hello world");
    }

    #[test]
    fn test_marker_ending_at_payload_end() {
        let (dir, mut extractor) = setup();
        let container = encode_container("edge", b"xyz");
        let packets = packets(&[&container[..12], &container[12..]]);

        extractor.process_packet(&packets[0]).unwrap();
        assert_eq!(extractor.phase(), Phase::SearchingForHeader { assembling: true });
        assert_eq!(extractor.header_bytes_collected(), 0);

        extractor.process_packet(&packets[1]).unwrap();
        assert_eq!(fs::read(dir.path().join("edge")).unwrap(), b"xyz");
    }

    #[test]
    fn test_file_spanning_many_packets() {
        let (dir, mut extractor) = setup();
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7) as u8).collect();
        let container = encode_container("big.dat", &data);

        let mut packetizer = TSPacketizer::new(PID);
        let mut buf = BytesMut::new();
        packetizer.packetize(&container, &mut buf).unwrap();
        for packet in buf.chunks(TS_PACKET_SIZE) {
            extractor.process_packet(packet).unwrap();
        }

        assert_eq!(fs::read(dir.path().join("big.dat")).unwrap(), data);
    }

    #[test]
    fn test_small_write_buffer_flushes_in_pieces() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            write_buffer_size: TS_PACKET_SIZE,
            ..Config::default()
        };
        let mut extractor = Extractor::new(dir.path(), &config);
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        let container = encode_container("chunks.bin", &data);

        let mut packetizer = TSPacketizer::new(PID);
        let mut buf = BytesMut::new();
        packetizer.packetize(&container, &mut buf).unwrap();
        for packet in buf.chunks(TS_PACKET_SIZE) {
            extractor.process_packet(packet).unwrap();
        }

        assert_eq!(fs::read(dir.path().join("chunks.bin")).unwrap(), data);
    }

    #[test]
    fn test_two_files_in_one_payload() {
        let (dir, mut extractor) = setup();
        let mut payload = encode_container("one", b"first").to_vec();
        payload.extend_from_slice(&encode_container("two", b"second"));
        feed(&mut extractor, &packets(&[&payload]));

        assert_eq!(fs::read(dir.path().join("one")).unwrap(), b"first");
        assert_eq!(fs::read(dir.path().join("two")).unwrap(), b"second");
        assert_eq!(extractor.report().files.len(), 2);
    }

    #[test]
    fn test_empty_file() {
        let (dir, mut extractor) = setup();
        let container = encode_container("empty", &[]);
        feed(&mut extractor, &packets(&[&container]));

        assert_eq!(fs::read(dir.path().join("empty")).unwrap(), Vec::<u8>::new());
        assert_eq!(extractor.phase(), Phase::default());
    }

    #[test]
    fn test_transport_error_packet_skipped() {
        let (dir, mut extractor) = setup();
        let container = encode_container("a.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let mut packets = packets(&[&container[..33], &[0x00; 20], &container[33..]]);
        packets[1][1] |= 0x80;

        extractor.process_packet(&packets[0]).unwrap();
        assert_eq!(extractor.phase(), Phase::ReadingFilename);
        extractor.process_packet(&packets[1]).unwrap();
        assert_eq!(extractor.phase(), Phase::ReadingFilename);
        extractor.process_packet(&packets[2]).unwrap();

        assert_eq!(fs::read(dir.path().join("a.bin")).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(extractor.report().packets_errored, 1);
    }

    #[test]
    fn test_packets_without_payload_ignored() {
        let (dir, mut extractor) = setup();
        let container = encode_container("gap", b"0123456789");
        let packets = packets(&[&container[..33], &container[33..]]);

        extractor.process_packet(&packets[0]).unwrap();
        assert_eq!(extractor.phase(), Phase::ReadingFile);

        // adaptation field only
        let mut no_payload = packets[1].clone();
        no_payload[3] = (no_payload[3] & 0xCF) | 0x20;
        extractor.process_packet(&no_payload).unwrap();
        assert_eq!(extractor.phase(), Phase::ReadingFile);
        assert_eq!(extractor.file_bytes_written(), 0);

        extractor.process_packet(&packets[1]).unwrap();
        assert_eq!(fs::read(dir.path().join("gap")).unwrap(), b"0123456789");
    }

    #[test]
    fn test_pes_ac3_framing_peeled() {
        let (dir, mut extractor) = setup();
        let mut payload = BytesMut::new();
        PESHeader::new(STREAM_ID_PRIVATE_1)
            .with_pts(std::time::Duration::from_secs(2))
            .write_to(&mut payload)
            .unwrap();
        payload.put_slice(&[0x0b, 0x77, 0, 0, 0, 0, 0]);
        payload.put_slice(&encode_container("framed", b"payload"));

        feed(&mut extractor, &packets(&[&payload]));
        assert_eq!(fs::read(dir.path().join("framed")).unwrap(), b"payload");
    }

    #[test]
    fn test_oversized_filename_length_is_fatal() {
        let (_dir, mut extractor) = setup();
        let packets = packets(&[&header_bytes(255, 4)]);
        match extractor.process_packet(&packets[0]) {
            Err(ExtractError::FilenameLength { length, limit }) => {
                assert_eq!(length, 255);
                assert_eq!(limit, 255);
            }
            other => panic!("expected filename length error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_filename_length_is_fatal() {
        let (_dir, mut extractor) = setup();
        let packets = packets(&[&header_bytes(0, 4)]);
        assert!(matches!(
            extractor.process_packet(&packets[0]),
            Err(ExtractError::FilenameLength { length: 0, .. })
        ));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let (dir, mut extractor) = setup();
        let container = encode_container("../evil", b"x");
        let packets = packets(&[&container]);
        assert!(matches!(
            extractor.process_packet(&packets[0]),
            Err(ExtractError::InvalidFilename(_))
        ));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_filename_written_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let (dir, mut extractor) = setup();
        let raw_name: &[u8] = b"caf\xe9.txt";
        let mut payload = header_bytes(raw_name.len() as u64, 2);
        payload.extend_from_slice(raw_name);
        payload.extend_from_slice(b"ok");
        feed(&mut extractor, &packets(&[&payload]));

        let names: Vec<Vec<u8>> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().as_bytes().to_vec())
            .collect();
        assert_eq!(names, vec![raw_name.to_vec()]);

        let report = extractor.finish();
        assert_eq!(report.files[0].name, "caf\u{fffd}.txt");
        assert_eq!(report.files[0].path.file_name().unwrap().as_bytes(), raw_name);
        assert_eq!(fs::read(&report.files[0].path).unwrap(), b"ok");
    }

    #[test]
    fn test_failed_rename_leaves_no_part_file() {
        let (dir, mut extractor) = setup();
        fs::create_dir(dir.path().join("a.bin")).unwrap();
        fs::write(dir.path().join("a.bin").join("keep"), b"x").unwrap();

        let container = encode_container("a.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let packets = packets(&[&container]);
        assert!(matches!(
            extractor.process_packet(&packets[0]),
            Err(ExtractError::Io(_))
        ));
        assert!(!dir.path().join("a.bin.part").exists());

        extractor.abort().unwrap();
        assert_eq!(extractor.phase(), Phase::default());
        assert!(extractor.report().files.is_empty());
    }

    #[test]
    fn test_lost_sync_is_fatal() {
        let (_dir, mut extractor) = setup();
        let mut packets = packets(&[&[0u8; 10], &[0u8; 10]]);
        packets[1][0] = 0x00;
        extractor.process_packet(&packets[0]).unwrap();
        assert!(matches!(
            extractor.process_packet(&packets[1]),
            Err(ExtractError::OutOfSync { packet: 1, found: 0 })
        ));
    }

    #[test]
    fn test_output_open_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut extractor = Extractor::new(dir.path().join("missing"), &Config::default());
        let container = encode_container("a.bin", b"data");
        let packets = packets(&[&container]);
        assert!(matches!(
            extractor.process_packet(&packets[0]),
            Err(ExtractError::OutputOpen { .. })
        ));
    }

    #[test]
    fn test_abort_removes_part_file() {
        let (dir, mut extractor) = setup();
        let container = encode_container("cut.bin", &[1u8; 500]);
        feed(&mut extractor, &packets(&[&container[..100]]));
        assert!(dir.path().join("cut.bin.part").exists());

        extractor.abort().unwrap();
        assert!(!dir.path().join("cut.bin.part").exists());
        assert_eq!(extractor.phase(), Phase::default());
    }

    #[test]
    fn test_finish_keeps_incomplete_part_file() {
        let (dir, mut extractor) = setup();
        let container = encode_container("cut.bin", &[1u8; 500]);
        feed(&mut extractor, &packets(&[&container[..100]]));

        let report = extractor.finish();
        let part = dir.path().join("cut.bin.part");
        assert_eq!(report.incomplete, Some(part.clone()));
        assert_eq!(fs::read(part).unwrap(), vec![1u8; 100 - 30 - 7]);
    }

    #[test]
    fn test_marker_in_file_data_not_rescanned() {
        let (dir, mut extractor) = setup();
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 30]);
        let container = encode_container("nested", &data);
        feed(&mut extractor, &packets(&[&container]));

        assert_eq!(fs::read(dir.path().join("nested")).unwrap(), data);
        assert_eq!(extractor.report().files.len(), 1);
    }

    #[quickcheck]
    fn prop_other_pid_leaves_state_untouched(body: Vec<u8>, pid: u16, prefix: u8) -> bool {
        let pid = pid & 0x1fff;
        if pid == PID {
            return true;
        }
        let (_dir, mut extractor) = setup();
        let container = encode_container("a.bin", &[1, 2, 3, 4]);
        let prefix = (prefix as usize) % 30;
        feed(&mut extractor, &packets(&[&container[..prefix]]));

        let phase = extractor.phase();
        let partial = extractor.partial_marker_match();
        let collected = extractor.header_bytes_collected();

        let mut other = TSPacketizer::new(pid);
        let mut buf = BytesMut::new();
        let mut body = body;
        body.truncate(184);
        other.write_packet(&body, &mut buf).unwrap();
        extractor.process_packet(&buf).unwrap();

        extractor.phase() == phase
            && extractor.partial_marker_match() == partial
            && extractor.header_bytes_collected() == collected
    }

    #[quickcheck]
    fn prop_header_split_anywhere(split: usize) -> bool {
        let (dir, mut extractor) = setup();
        let container = encode_container("s", b"ok");
        let split = split % (container.len() + 1);
        feed(&mut extractor, &packets(&[&container[..split], &container[split..]]));
        fs::read(dir.path().join("s")).map(|d| d == b"ok").unwrap_or(false)
    }
}
