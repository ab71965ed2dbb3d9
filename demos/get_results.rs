//! Page through previously analyzed media.
//!
//! Usage: `cargo run --example get_results -- [name-filter]`

use realitydefender::{Client, Config, DetectionResultList, GetResultsOptions};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = env::var("REALITY_DEFENDER_API_KEY")?;
    let name = env::args().nth(1);

    let client = Client::new(Config {
        api_key,
        ..Default::default()
    })?;

    let mut page_number = 0;
    loop {
        let page = client
            .get_results(Some(GetResultsOptions {
                page_number: Some(page_number),
                size: Some(5),
                name: name.clone(),
                start_date: Some("2024-01-01".to_string()),
                ..Default::default()
            }))
            .await?;

        print_page(&page);

        page_number += 1;
        if page_number >= page.total_pages || page_number >= 3 {
            break;
        }
    }

    Ok(())
}

fn print_page(page: &DetectionResultList) {
    println!(
        "Page {} of {} ({} of {} results)",
        page.current_page + 1,
        page.total_pages,
        page.current_page_items_count,
        page.total_items
    );

    for result in &page.items {
        let score = result
            .score
            .map_or("N/A".to_string(), |s| format!("{:.4}", s));
        println!("  {} {} score={}", result.request_id, result.status, score);
        for model in &result.models {
            println!("    - {}: {}", model.name, model.status);
        }
    }
}
