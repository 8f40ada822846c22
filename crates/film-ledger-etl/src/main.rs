//! film-ledger: award, box office and budget ETL.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use film_ledger::{title_slug, Market};
use film_ledger_etl::{ConfigOverrides, EtlConfig, Pipeline};

#[derive(Parser)]
#[command(
    name = "film-ledger",
    about = "Film Ledger: join award nominations with box office, budgets and movie metadata",
    version,
    after_help = "Stages read and write CSV checkpoints in the output directory.\nRun 'film-ledger run <awards>' for the whole pipeline."
)]
struct Cli {
    /// OMDb API key (falls back to OMDB_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Checkpoint directory (falls back to FILM_LEDGER_OUT, then ./csv).
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Movie API base URL.
    #[arg(long, global = true)]
    omdb_url: Option<String>,

    /// Box office site base URL.
    #[arg(long, global = true)]
    mojo_url: Option<String>,

    /// Budget site base URL.
    #[arg(long, global = true)]
    numbers_url: Option<String>,

    /// Minimum milliseconds between requests (0 disables the limit).
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Requests in flight at once.
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Hide progress bars.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw awards dataset into kaggle_clean.csv.
    CleanAwards {
        /// Raw awards file (CSV or tab-separated).
        awards: PathBuf,
    },

    /// Fetch movie metadata for every nominated film into df_imdb.csv.
    Info,

    /// Scrape box office revenue for every nominated film.
    BoxOffice {
        /// Market to scrape; `all` reads every market from one page per film.
        #[arg(long, value_enum, default_value_t = MarketArg::All)]
        market: MarketArg,
    },

    /// Scrape production budgets into movie_budgets.csv.
    Budget,

    /// Outer-join the revenue tables into boxoffice.csv.
    CombineBoxOffice,

    /// Apply manual budget overrides into movie_budgets_clean.csv.
    CleanBudget {
        /// JSON object of title to budget.
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Join budgets and box office into financial_data.csv.
    Financials,

    /// Build final_dataset.csv.
    Final,

    /// Run every stage in order.
    Run {
        /// Raw awards file (CSV or tab-separated).
        awards: PathBuf,

        /// JSON object of title to budget.
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Print the budget site path token for a title.
    Slug {
        title: String,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   film-ledger completions bash > ~/.local/share/bash-completion/completions/film-ledger
    ///   film-ledger completions zsh > ~/.zfunc/_film-ledger
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MarketArg {
    Domestic,
    International,
    Worldwide,
    All,
}

impl MarketArg {
    fn market(self) -> Option<Market> {
        match self {
            MarketArg::Domestic => Some(Market::Domestic),
            MarketArg::International => Some(Market::International),
            MarketArg::Worldwide => Some(Market::Worldwide),
            MarketArg::All => None,
        }
    }
}

impl Cli {
    fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            out_dir: self.out_dir.clone(),
            omdb_url: self.omdb_url.clone(),
            mojo_url: self.mojo_url.clone(),
            numbers_url: self.numbers_url.clone(),
            delay_ms: self.delay_ms,
            concurrency: self.concurrency,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that need no configuration.
    match &cli.command {
        Commands::Slug { title } => {
            println!("{}", title_slug(title));
            return Ok(());
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "film-ledger", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let config = EtlConfig::resolve(cli.config_overrides())?;
    tracing::debug!("output directory: {}", config.out_dir().display());
    let pipeline = Pipeline::new(config)?.with_progress(!cli.quiet);

    match cli.command {
        Commands::CleanAwards { awards } => {
            let nominations = pipeline.clean_awards(&awards)?;
            println!("{} nominations kept", nominations.len());
        }
        Commands::Info => {
            let report = pipeline.movie_info().await?;
            println!("movie info: {report}");
        }
        Commands::BoxOffice { market } => {
            let report = pipeline.box_office(market.market()).await?;
            println!("box office: {report}");
        }
        Commands::Budget => {
            let report = pipeline.budgets().await?;
            println!("budgets: {report}");
        }
        Commands::CombineBoxOffice => {
            let records = pipeline.combine_box_office()?;
            println!("{} films with box office", records.len());
        }
        Commands::CleanBudget { overrides } => {
            let budgets = pipeline.clean_budget(overrides.as_deref())?;
            println!("{} budgets cleaned", budgets.len());
        }
        Commands::Financials => {
            let records = pipeline.financials()?;
            println!("{} films with financials", records.len());
        }
        Commands::Final => {
            let records = pipeline.final_dataset()?;
            println!("{} rows in the final dataset", records.len());
        }
        Commands::Run { awards, overrides } => {
            let records = pipeline.run_all(&awards, overrides.as_deref()).await?;
            println!("{} rows in the final dataset", records.len());
        }
        Commands::Slug { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
