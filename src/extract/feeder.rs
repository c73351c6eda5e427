use super::machine::{ExtractionReport, Extractor};
use super::PacketSink;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::format::ts::TS_PACKET_SIZE;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Percentage reported while the stream is still being read.
const MAX_RUNNING_PROGRESS: u8 = 99;

/// Reads a stream in batches of whole packets and hands every packet to a
/// [`PacketSink`], reporting progress along the way.
#[derive(Debug, Clone)]
pub struct StreamFeeder {
    batch_packets: usize,
    progress_interval: usize,
}

impl StreamFeeder {
    /// Feeder using the batching settings of `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_batching(config.batch_packets, config.progress_interval)
    }

    /// Feeder reading `batch_packets` packets at a time and reporting
    /// progress every `progress_interval` batches. Zero is raised to one.
    pub fn with_batching(batch_packets: usize, progress_interval: usize) -> Self {
        Self {
            batch_packets: batch_packets.max(1),
            progress_interval: progress_interval.max(1),
        }
    }

    fn batch_size(&self) -> usize {
        self.batch_packets * TS_PACKET_SIZE
    }

    /// Feeds `reader` to `sink` until end of input.
    ///
    /// `progress` receives values in `0..=99` every `progress_interval`
    /// batches when `total_len` is known and non-zero, then 100 exactly once
    /// after the last packet. On a fatal error the sink is aborted before the
    /// error is returned.
    pub fn feed<R, S>(
        &self,
        mut reader: R,
        total_len: Option<u64>,
        sink: &mut S,
        progress: &mut dyn FnMut(u8),
    ) -> Result<()>
    where
        R: Read,
        S: PacketSink + ?Sized,
    {
        let mut batch = vec![0u8; self.batch_size()];
        let mut tracker = ProgressTracker::new(total_len, self.progress_interval);

        loop {
            let filled = match fill_batch(&mut reader, &mut batch) {
                Ok(n) => n,
                Err(e) => return Err(abort_with(sink, e.into())),
            };
            if filled == 0 {
                break;
            }
            if let Err(e) = push_batch(sink, &batch[..filled]) {
                return Err(abort_with(sink, e));
            }
            tracker.batch_done(filled, progress);
            if filled < batch.len() {
                break;
            }
        }

        progress(100);
        Ok(())
    }

    /// Async counterpart of [`StreamFeeder::feed`].
    pub async fn feed_async<R, S>(
        &self,
        mut reader: R,
        total_len: Option<u64>,
        sink: &mut S,
        progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        S: PacketSink + ?Sized,
    {
        let mut batch = vec![0u8; self.batch_size()];
        let mut tracker = ProgressTracker::new(total_len, self.progress_interval);

        loop {
            let filled = match fill_batch_async(&mut reader, &mut batch).await {
                Ok(n) => n,
                Err(e) => return Err(abort_with(sink, e.into())),
            };
            if filled == 0 {
                break;
            }
            if let Err(e) = push_batch(sink, &batch[..filled]) {
                return Err(abort_with(sink, e));
            }
            tracker.batch_done(filled, progress);
            if filled < batch.len() {
                break;
            }
        }

        progress(100);
        Ok(())
    }
}

/// Progress bookkeeping shared by the sync and async feeders.
struct ProgressTracker {
    total: Option<u64>,
    interval: usize,
    consumed: u64,
    batches: usize,
}

impl ProgressTracker {
    fn new(total: Option<u64>, interval: usize) -> Self {
        Self {
            total: total.filter(|&t| t > 0),
            interval,
            consumed: 0,
            batches: 0,
        }
    }

    fn batch_done(&mut self, bytes: usize, progress: &mut dyn FnMut(u8)) {
        self.consumed += bytes as u64;
        let index = self.batches;
        self.batches += 1;
        if index % self.interval != 0 {
            return;
        }
        if let Some(total) = self.total {
            let percent = (self.consumed.saturating_mul(100) / total)
                .min(MAX_RUNNING_PROGRESS as u64);
            progress(percent as u8);
        }
    }
}

fn push_batch<S: PacketSink + ?Sized>(sink: &mut S, batch: &[u8]) -> Result<()> {
    let mut packets = batch.chunks_exact(TS_PACKET_SIZE);
    for packet in &mut packets {
        sink.push_packet(packet)?;
    }
    let rest = packets.remainder();
    if !rest.is_empty() {
        log::warn!(
            "dropping {} trailing bytes, not a whole transport packet",
            rest.len()
        );
    }
    Ok(())
}

fn abort_with<S: PacketSink + ?Sized>(sink: &mut S, err: ExtractError) -> ExtractError {
    log::error!("extraction failed: {}", err);
    if let Err(e) = sink.abort() {
        log::warn!("cleanup after failure did not complete: {}", e);
    }
    err
}

/// Reads until `buf` is full or the input ends. Returns the bytes read.
fn fill_batch<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

async fn fill_batch_async<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Extracts every embedded file from the transport stream at `input` into
/// `output_dir`.
pub fn extract_file<P, Q>(
    input: P,
    output_dir: Q,
    config: &Config,
    progress: &mut dyn FnMut(u8),
) -> Result<ExtractionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let file = File::open(input)?;
    let total_len = file.metadata()?.len();
    log::info!("Reading {} ({} bytes)", input.display(), total_len);

    let mut extractor = Extractor::new(output_dir, config);
    StreamFeeder::new(config).feed(file, Some(total_len), &mut extractor, progress)?;
    Ok(extractor.finish())
}

/// Async counterpart of [`extract_file`].
pub async fn extract_file_async<P, Q>(
    input: P,
    output_dir: Q,
    config: &Config,
    progress: &mut (dyn FnMut(u8) + Send),
) -> Result<ExtractionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let file = tokio::fs::File::open(input).await?;
    let total_len = file.metadata().await?.len();
    log::info!("Reading {} ({} bytes)", input.display(), total_len);

    let mut extractor = Extractor::new(output_dir, config);
    StreamFeeder::new(config)
        .feed_async(file, Some(total_len), &mut extractor, progress)
        .await?;
    Ok(extractor.finish())
}
