use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pgoq_codegen::config::{Args, Overrides};
use pgoq_codegen::generate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let overrides = match &args.config {
        Some(path) => Overrides::load(path)?,
        None => Overrides::default(),
    };

    let pool = PgPoolOptions::new().max_connections(5).connect(&args.database).await?;

    info!(output_dir = %args.output_dir.display(), "generating pgoq-core descriptors");
    generate::run(&pool, &args.output_dir, &overrides).await?;
    info!("generation complete");

    Ok(())
}
