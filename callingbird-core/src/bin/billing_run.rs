use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use callingbird_core::billing::run::{BillingRunner, MonthYear};
use callingbird_core::config::AppConfig;
use callingbird_core::db;
use callingbird_core::email::LogMailer;
use callingbird_core::payments::MollieClient;

/// One-shot billing binary.
///
/// Invoked from cron (or by hand) once per month. Walks every billable
/// tenant, invoices closed periods and exits. Optional arguments select
/// an explicit month:
///
/// ```text
/// billing_run [MONTH YEAR]
/// ```
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting CallingBird billing run...");

    let as_of = parse_month_args(&std::env::args().skip(1).collect::<Vec<_>>())?;

    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let payments = Arc::new(MollieClient::new(config.mollie_api_key.clone()));
    let mailer = Arc::new(LogMailer);
    let runner = BillingRunner::new(pool, payments, mailer, config.default_price_per_minute);

    let summary = runner.run(as_of).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!(
        "Billing run complete: {} invoice(s), {} failure(s)",
        summary.invoices.len(),
        summary.failures.len()
    );
    Ok(())
}

fn parse_month_args(args: &[String]) -> anyhow::Result<Option<MonthYear>> {
    match args {
        [] => Ok(None),
        [month, year] => {
            let month = month
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("MONTH must be a number between 1 and 12"))?;
            let year = year
                .parse::<i32>()
                .map_err(|_| anyhow::anyhow!("YEAR must be a number"))?;
            if !(1..=12).contains(&month) {
                anyhow::bail!("MONTH must be between 1 and 12");
            }
            Ok(Some(MonthYear { month, year }))
        }
        _ => anyhow::bail!("Usage: billing_run [MONTH YEAR]"),
    }
}
