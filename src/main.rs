use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use insertbench::bench::{self, Batched, BenchPlan, InsertStrategy, RowByRow};
use insertbench::{AppConfig, Services, TimestampPolicy, schema, sql};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "insertbench")]
#[command(about = "Compare row-by-row and batched inserts against MySQL")]
struct Cli {
    /// Directory holding config.<mode>.json (defaults to $APP_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "dev")]
    mode: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print generated rows as JSON
    Generate {
        #[command(flatten)]
        shape: Shape,
        #[arg(long, default_value = "0")]
        prefix: String,
    },
    /// Print the statement each selected strategy would execute
    Sql {
        #[arg(long, value_enum, default_value_t = StrategyArg::Batched)]
        strategy: StrategyArg,
        #[command(flatten)]
        shape: Shape,
    },
    /// Run the benchmarks against the configured database
    Run {
        #[arg(long, value_enum, default_value_t = StrategyArg::All)]
        strategy: StrategyArg,
        #[command(flatten)]
        shape: Shape,
        #[arg(long, default_value_t = 10)]
        iterations: usize,
        /// Stamp each batched row separately instead of once per batch
        #[arg(long)]
        per_row_timestamps: bool,
        /// Do not drop and recreate the table before each strategy
        #[arg(long)]
        keep_table: bool,
    },
}

#[derive(clap::Args, Clone, Copy)]
struct Shape {
    #[arg(long, default_value_t = 10)]
    groups: usize,
    #[arg(long, default_value_t = 2)]
    skus_per_group: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Single,
    Batched,
    All,
}

#[tokio::main]
async fn main() {
    init_tracing();
    dotenvy::dotenv().ok();

    if let Err(err) = run(Cli::parse()).await {
        error!(error = ?err, "insertbench failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("insertbench=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { shape, prefix } => {
            let products = bench::gen_products(shape.groups, shape.skus_per_group, prefix);
            println!("{}", serde_json::to_string_pretty(&products)?);
            Ok(())
        }
        Command::Sql { strategy, shape } => {
            let mut products = bench::gen_products(shape.groups, shape.skus_per_group, 0);
            if strategy != StrategyArg::Batched {
                let first = products.first_mut().context("no rows to build a statement for")?;
                first.set_dates();
                let statement = sql::single_insert(first).context("failed to build row statement")?;
                println!("{}", statement);
            }
            if strategy != StrategyArg::Single {
                let statement = sql::batch_upsert(&products, TimestampPolicy::PerBatch)
                    .context("failed to build batch statement")?;
                println!("{}", statement);
            }
            Ok(())
        }
        Command::Run {
            strategy,
            shape,
            iterations,
            per_row_timestamps,
            keep_table,
        } => {
            let config = AppConfig::load(cli.config_dir.as_deref(), &cli.mode)
                .context("failed to load configuration")?;
            info!(?config, mode = %cli.mode, "configuration loaded");

            let services = Services::new(config);
            let result = run_benchmarks(&services, strategy, shape, iterations, per_row_timestamps, keep_table).await;
            services.cleanup().await;
            result
        }
    }
}

async fn run_benchmarks(
    services: &Services,
    strategy: StrategyArg,
    shape: Shape,
    iterations: usize,
    per_row_timestamps: bool,
    keep_table: bool,
) -> Result<()> {
    let pool = services.db().await.context("failed to connect to db")?;

    let plan = BenchPlan {
        group_count: shape.groups,
        skus_per_group: shape.skus_per_group,
        iterations,
        run_id: uuid::Uuid::new_v4().simple().to_string()[..8].to_string(),
    };

    let timestamps = if per_row_timestamps {
        TimestampPolicy::PerRow
    } else {
        TimestampPolicy::PerBatch
    };
    let mut strategies: Vec<Box<dyn InsertStrategy>> = Vec::new();
    if strategy != StrategyArg::Batched {
        strategies.push(Box::new(RowByRow));
    }
    if strategy != StrategyArg::Single {
        strategies.push(Box::new(Batched { timestamps }));
    }

    println!("{}", bench::time_generation(&plan));
    for selected in &strategies {
        // Each strategy starts from an empty table so the batched upsert
        // never lands on rows the previous strategy inserted
        if !keep_table {
            schema::recreate_table(pool)
                .await
                .context("failed to recreate table")?;
        }
        let report = bench::run_strategy(pool, selected.as_ref(), &plan.for_strategy(selected.name()))
            .await
            .with_context(|| format!("benchmark {} failed", selected.name()))?;
        println!("{}", report);
    }
    Ok(())
}
