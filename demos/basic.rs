//! Upload one file and wait for its verdict.
//!
//! Usage: `cargo run --example basic -- path/to/media.jpg`

use realitydefender::{status, Client, Config, GetResultOptions, UploadOptions};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = env::var("REALITY_DEFENDER_API_KEY")?;
    let file_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "files/test_image.jpg".to_string());

    let client = Client::new(Config {
        api_key,
        ..Default::default()
    })?;

    println!("Uploading {}", file_path);
    let upload = client.upload(UploadOptions { file_path }).await?;
    println!("Request ID: {}", upload.request_id);

    let result = client
        .get_result(
            &upload.request_id,
            Some(GetResultOptions {
                max_attempts: Some(30),
                polling_interval: Some(2000),
                ..Default::default()
            }),
        )
        .await?;

    if result.is_still_pending() {
        println!("Analysis still running, try again later");
        return Ok(());
    }

    println!("Status: {}", result.status);
    match result.score {
        Some(score) => println!("Score: {:.4} ({:.1}%)", score, score * 100.0),
        None => println!("No overall score available"),
    }

    for model in result
        .models
        .iter()
        .filter(|m| m.status != status::NOT_APPLICABLE)
    {
        let score = model
            .score
            .map_or("N/A".to_string(), |s| format!("{:.4}", s));
        println!("- {}: {} ({})", model.name, model.status, score);
    }

    Ok(())
}
