use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valkurs_core::ingest::cbr::CbrClient;
use valkurs_core::ingest::provider::RatesProvider;
use valkurs_core::pipeline::{self, FsSink, LogSink};

#[derive(Debug, Parser)]
#[command(name = "valkurs_worker")]
struct Args {
    /// Window reference date (YYYY-MM-DD). Defaults to today's MSK date.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Do everything except writing the CSV artifacts.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = valkurs_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let reference =
        valkurs_core::time::resolve_reference_date(args.as_of_date.as_deref(), chrono::Utc::now())?;
    let client = CbrClient::from_settings(&settings).context("build CBR client failed")?;

    tracing::info!(
        %reference,
        provider = client.provider_name(),
        window_days = settings.window_days,
        watch_list = ?settings.watch_list,
        dry_run = args.dry_run,
        "starting collection run"
    );

    let result = if args.dry_run {
        pipeline::collect(&client, &LogSink, &settings, reference).await
    } else {
        pipeline::collect(&client, &FsSink, &settings, reference).await
    };

    match result {
        Ok(summary) => {
            let report = serde_json::json!({
                "source": client.provider_name(),
                "reference": reference,
                "currencies": summary.currencies,
                "observations": summary.observations,
                "window_days": summary.window_days,
                "failed_dates": summary.failed_dates,
            });

            tracing::info!(
                %reference,
                missing = summary.failed_dates.len(),
                report = %report,
                "collection run finished"
            );
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%reference, error = %err, "collection run failed");
            Err(err)
        }
    }
}

fn init_sentry(settings: &valkurs_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
