//! The `query` subcommand: drives a full run and streams the progress log.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Args;

use demandpulse_core::products::{dedup_products, load_products};
use demandpulse_core::query::normalize_place;
use demandpulse_core::{AppConfig, MaxPosts, ProductResult};
use demandpulse_engine::{RunController, RunRequest};
use demandpulse_sentiment::LexiconScorer;
use demandpulse_source::HttpPostSource;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Store location, e.g. "Delhi".
    #[arg(long)]
    location: String,

    /// Country, e.g. "India".
    #[arg(long)]
    country: String,

    /// Start of the date range (inclusive). Defaults to 10 days ago.
    #[arg(long)]
    since: Option<NaiveDate>,

    /// End of the date range (exclusive). Defaults to today.
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Product to query; repeat for several. Defaults to the products file.
    #[arg(long = "product")]
    products: Vec<String>,

    /// Max posts per product: 100, 500, 1000, 2000, 5000, or "none".
    #[arg(long, default_value = "none")]
    max_posts: MaxPosts,
}

/// How often the progress view re-reads the log buffer.
const REFRESH_INTERVAL: Duration = Duration::from_millis(500);

pub async fn run(config: &AppConfig, args: QueryArgs) -> anyhow::Result<()> {
    let products = if args.products.is_empty() {
        load_products(&config.products_path)?
    } else {
        dedup_products(args.products.clone())
    };

    let today = Local::now().date_naive();
    let request = RunRequest {
        products,
        location: normalize_place(&args.location),
        country: args.country.clone(),
        since: args.since.unwrap_or_else(|| today - chrono::Days::new(10)),
        until: args.until.unwrap_or(today),
        max_posts: args.max_posts,
    };

    let source = HttpPostSource::from_config(config)?;
    let controller = Arc::new(RunController::new());

    // Ctrl-C becomes an interruption request; the run winds down at the next
    // batch boundary and partial results are still printed.
    let interrupter = Arc::clone(&controller);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && interrupter.interrupt() {
            tracing::info!("interrupt requested — finishing in-flight batch");
        }
    });

    let runner = Arc::clone(&controller);
    let mut run_task = tokio::spawn(async move {
        runner
            .execute(&request, &source, &LexiconScorer::new())
            .await
    });

    // Stream the log while the run is in flight. This path only reads the
    // shared state; the pipeline runs on its own task.
    let mut printed = 0usize;
    let outcome = loop {
        tokio::select! {
            joined = &mut run_task => break joined?,
            () = tokio::time::sleep(REFRESH_INTERVAL) => {
                printed = print_new_lines(&controller, printed);
            }
        }
    };
    print_new_lines(&controller, printed);

    match outcome? {
        Some(results) => print_results(&results),
        None => tracing::warn!("a run was already active — nothing to do"),
    }
    Ok(())
}

fn print_new_lines(controller: &RunController, printed: usize) -> usize {
    let lines = controller.state().log.lines();
    for line in &lines[printed.min(lines.len())..] {
        println!(">>> {line}");
    }
    lines.len()
}

fn print_results(results: &[ProductResult]) {
    println!();
    println!("{:<24} {:>8} {:>10} {:>6} {:>6}", "product", "posts", "net", "pos", "neg");
    for result in results {
        let (positive, negative) = result.sentiment_split();
        println!(
            "{:<24} {:>8} {:>10.2} {:>6} {:>6}",
            result.product,
            result.posts.len(),
            result.net_score,
            positive,
            negative
        );
    }

    for result in results {
        let daily = result.daily_net_scores();
        if daily.is_empty() {
            continue;
        }
        println!();
        println!("trend for {}:", result.product);
        for (day, score) in daily {
            println!("  {day}  {score:>8.2}");
        }
    }
}
