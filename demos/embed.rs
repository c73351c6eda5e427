use bytes::BytesMut;
use std::env;
use std::path::Path;
use std::time::Duration;
use tsextract::config::DEFAULT_TARGET_PID;
use tsextract::format::ts::{PESHeader, STREAM_ID_PRIVATE_1};
use tsextract::format::{encode_container, TSPacketizer};

/// Builds a transport stream carrying the given files, interleaved with
/// null packets and an unrelated PID, for trying out the extractor.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <output.ts> <file>...", args[0]);
        std::process::exit(1);
    }

    let mut target = TSPacketizer::new(DEFAULT_TARGET_PID);
    let mut other = TSPacketizer::new(0x100);
    let mut stream = BytesMut::new();

    // AC-3 style framing ahead of the first payload
    let mut lead = BytesMut::new();
    PESHeader::new(STREAM_ID_PRIVATE_1)
        .with_pts(Duration::from_millis(100))
        .write_to(&mut lead)?;
    lead.extend_from_slice(&[0x0b, 0x77, 0, 0, 0, 0, 0]);
    target.write_packet(&lead, &mut stream)?;

    for path in &args[2..] {
        let data = std::fs::read(path)?;
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("input path has no usable file name")?;
        println!("Embedding {} ({} bytes)", name, data.len());

        let mut packets = BytesMut::new();
        target.packetize(&encode_container(name, &data), &mut packets)?;
        for (i, packet) in packets.chunks(188).enumerate() {
            stream.extend_from_slice(packet);
            if i % 4 == 3 {
                target.write_null_packet(&mut stream)?;
                other.write_packet(&[0x42; 64], &mut stream)?;
            }
        }
    }

    std::fs::write(&args[1], &stream)?;
    println!(
        "Wrote {} packets to {}",
        stream.len() / 188,
        args[1]
    );
    Ok(())
}
