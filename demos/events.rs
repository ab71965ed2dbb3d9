//! Follow an existing request through the event handlers, with Ctrl-C
//! cancelling the poll.
//!
//! Usage: `cargo run --example events -- <request-id>`

use realitydefender::{
    CancellationToken, Client, Config, PollEvent, PollOptions, ERROR_EVENT, RESULT_EVENT,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = env::var("REALITY_DEFENDER_API_KEY")?;
    let Some(request_id) = env::args().nth(1) else {
        eprintln!("usage: events <request-id>");
        return Ok(());
    };

    let client = Client::new(Config {
        api_key,
        ..Default::default()
    })?;

    client.on(RESULT_EVENT, |event| {
        if let PollEvent::Result(result) = event {
            let score = result
                .score
                .map_or("N/A".to_string(), |s| format!("{:.1}%", s * 100.0));
            println!("[result] {} is {} ({})", result.request_id, result.status, score);
        }
    });
    client.on(ERROR_EVENT, |event| {
        if let PollEvent::Error(err) = event {
            let code = err.code().map(|c| c.as_str()).unwrap_or("none");
            eprintln!("[error] {} ({})", err, code);
        }
    });

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = client
        .poll_for_results(
            &request_id,
            Some(PollOptions {
                polling_interval: Some(2000),
                timeout: Some(120_000),
                cancellation: Some(token),
                ..Default::default()
            }),
        )
        .await;

    match outcome {
        Err(err) if err.is_cancelled() => println!("Stopped polling"),
        // Already reported by the error handler
        Err(_) => std::process::exit(1),
        Ok(()) => {}
    }

    Ok(())
}
