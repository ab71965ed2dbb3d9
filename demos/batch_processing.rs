//! Upload several files and wait for all of their verdicts.
//!
//! Usage: `cargo run --example batch_processing -- a.jpg b.mp4 c.wav`

use realitydefender::{BatchOptions, Client, Config, GetResultOptions};
use std::env;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = env::var("REALITY_DEFENDER_API_KEY")?;
    let files: Vec<String> = env::args().skip(1).collect();
    if files.is_empty() {
        eprintln!("usage: batch_processing <file>...");
        return Ok(());
    }

    let client = Client::new(Config {
        api_key,
        ..Default::default()
    })?;

    let paths: Vec<&str> = files.iter().map(String::as_str).collect();
    println!("Processing {} file(s), 2 at a time", paths.len());

    let outcomes = client
        .detect_batch(
            &paths,
            BatchOptions {
                max_concurrency: Some(2),
                result_options: GetResultOptions {
                    // Give the whole batch five minutes
                    deadline: Some(Instant::now() + Duration::from_secs(300)),
                    ..Default::default()
                },
            },
        )
        .await;

    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Ok(result) => {
                let score = result
                    .score
                    .map_or("N/A".to_string(), |s| format!("{:.4}", s));
                println!("{}: {} (score {})", path, result.status, score);
            }
            Err(err) => println!("{}: failed: {}", path, err),
        }
    }

    Ok(())
}
