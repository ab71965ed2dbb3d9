//! Submit a social media link and wait for the verdict.
//!
//! Usage: `cargo run --example social_media -- https://www.youtube.com/watch?v=...`

use realitydefender::{Client, Config, Error, GetResultOptions};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = env::var("REALITY_DEFENDER_API_KEY")?;
    let link = env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.youtube.com/watch?v=6O0fySNw-Lw".to_string());

    let client = Client::new(Config {
        api_key,
        ..Default::default()
    })?;

    let upload = match client.upload_social_media(&link).await {
        Ok(upload) => upload,
        Err(Error::InvalidRequest(msg)) => {
            eprintln!("Rejected link {}: {}", link, msg);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    println!("Request ID: {}", upload.request_id);

    // Social media analysis takes longer than file uploads
    let result = client
        .get_result(
            &upload.request_id,
            Some(GetResultOptions {
                max_attempts: Some(60),
                polling_interval: Some(5000),
                ..Default::default()
            }),
        )
        .await?;

    println!("Status: {}", result.status);
    if let Some(score) = result.score {
        println!("Score: {:.4} ({:.1}%)", score, score * 100.0);
    }

    Ok(())
}
