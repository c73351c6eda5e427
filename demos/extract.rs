use std::env;
use std::io::Write;
use std::process::ExitCode;
use tsextract::{extract_file_async, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <input.ts> [output-dir]", args[0]);
        return ExitCode::FAILURE;
    }
    let input = &args[1];
    let output_dir = args.get(2).map(String::as_str).unwrap_or(".");

    let config = Config::global();
    println!(
        "Extracting from {} (PID {}) into {}",
        input, config.target_pid, output_dir
    );

    let mut last = None;
    let result = extract_file_async(input, output_dir, &config, &mut |percent| {
        if last != Some(percent) {
            last = Some(percent);
            print!("\rProgress: {:3}%", percent);
            let _ = std::io::stdout().flush();
        }
    })
    .await;
    println!();

    match result {
        Ok(report) => {
            println!(
                "Read {} packets, {} on PID {}, {} with transport errors",
                report.packets_seen,
                report.packets_matched,
                config.target_pid,
                report.packets_errored
            );
            for file in &report.files {
                println!("  {} ({} bytes)", file.path.display(), file.size);
            }
            if let Some(part) = &report.incomplete {
                println!("  incomplete: {}", part.display());
            }
            if report.files.is_empty() {
                println!("No files found");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Extraction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
