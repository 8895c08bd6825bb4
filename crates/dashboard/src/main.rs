//! Stock analysis dashboard.
//!
//! Usage:
//!   cargo run -p dashboard -- AAPL
//!
//! Env:
//!   DASHBOARD_CHART_DIR  directory for rendered charts (default: temp dir)
//!   RUST_LOG             tracing filter (default: dashboard=info)

use dashboard::Dashboard;
use fundamental_analysis::metrics::keys;
use yahoo_client::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard=info,yahoo_client=warn".into()),
        )
        .init();

    let ticker = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "AAPL".to_string());

    let dashboard = Dashboard::new(YahooClient::new());
    let analysis = dashboard.analyze(&ticker).await?;

    let name = analysis
        .profile
        .long_name
        .as_deref()
        .unwrap_or(&analysis.symbol);
    println!("\n{} ({})", name, analysis.symbol);
    println!("{}", "=".repeat(name.len() + analysis.symbol.len() + 3));

    if let Some(summary) = analysis.profile.long_business_summary.as_deref() {
        println!("\n{summary}");
    } else {
        println!("\nNo description available");
    }

    let price = analysis.metrics.get(keys::CURRENT_PRICE)?;
    let market_cap = analysis.metrics.get(keys::MARKET_CAP_B)?;
    println!("\nCurrent Price: ${price:.2}");
    println!("Market Cap:    ${market_cap:.2}B");

    let eval = &analysis.evaluation;
    println!("\nScore: {}/{}", eval.score, eval.max_score);

    if !eval.reasons.is_empty() {
        println!("\nStrengths:");
        for reason in &eval.reasons {
            println!("  + {reason}");
        }
    }
    if !eval.concerns.is_empty() {
        println!("\nConcerns:");
        for concern in &eval.concerns {
            println!("  - {concern}");
        }
    }

    println!("\nChart: {}", analysis.chart_path.display());

    Ok(())
}
