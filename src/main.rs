use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tweet_analyzer::analysis::{AnalysisError, AnalysisRequest, Analyzer, PreconditionError};
use tweet_analyzer::classify::{ClassifierHandle, HuggingFaceClassifier, ZeroShotClassifier};
use tweet_analyzer::config::{
    find_config_file, load_config, write_default_config, Config, CONFIG_FILE_NAME,
    HUGGINGFACE_TOKEN_ENV, TWITTER_TOKEN_ENV,
};
use tweet_analyzer::fetch::Paginator;
use tweet_analyzer::models::{
    AnalysisReport, DurationBucket, ResultSet, SearchQuery, TweetField, UNKNOWN_CATEGORY,
};
use tweet_analyzer::sources::TwitterSource;
use tweet_analyzer::ui::{self, ClassificationProgress, Spinner, Status};
use tweet_analyzer::utils::{is_terminal, single_line, HttpClient};

/// Tweet Analyzer - Classify recent tweets about a keyword into categories
#[derive(Parser, Debug)]
#[command(name = "tweet-analyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch recent tweets for a keyword and classify them into categories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// How far back to search
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Window {
    #[value(name = "4h")]
    Hours4,
    #[value(name = "8h")]
    Hours8,
    #[value(name = "24h")]
    Hours24,
    #[value(name = "48h")]
    Hours48,
    #[value(name = "72h")]
    Hours72,
}

impl From<Window> for DurationBucket {
    fn from(window: Window) -> Self {
        match window {
            Window::Hours4 => DurationBucket::Last4Hours,
            Window::Hours8 => DurationBucket::Last8Hours,
            Window::Hours24 => DurationBucket::Last24Hours,
            Window::Hours48 => DurationBucket::Last48Hours,
            Window::Hours72 => DurationBucket::Last72Hours,
        }
    }
}

/// Flags shared by `analyze` and `fetch`
#[derive(Args, Debug)]
struct FetchArgs {
    /// Search keyword
    keyword: String,

    /// Language tweets must be written in (default from config, usually "en")
    #[arg(long)]
    lang: Option<String>,

    /// Keep retweets, quotes and replies
    #[arg(long)]
    include_retweets: bool,

    /// Extra tweet fields to show (source, created_at, lang, referenced_tweets)
    #[arg(long = "field", short = 'f', value_delimiter = ',')]
    fields: Vec<TweetField>,

    /// How far back to search
    #[arg(long, value_enum, default_value_t = Window::Hours4)]
    duration: Window,

    /// Stop fetching once this many tweets are collected
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(10..=500))]
    max_count: u64,

    /// Maximum number of pages to request (default from config)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Pause between page requests in milliseconds (default from config)
    #[arg(long)]
    page_delay_ms: Option<u64>,

    /// Twitter API bearer token (overrides TWITTER_API_TOKEN and the config file)
    #[arg(long)]
    token: Option<String>,
}

impl FetchArgs {
    fn to_query(&self, config: &Config) -> SearchQuery {
        let bucket = DurationBucket::from(self.duration);
        SearchQuery::new(&self.keyword)
            .language(
                self.lang
                    .clone()
                    .unwrap_or_else(|| config.twitter.default_language.clone()),
            )
            .fields(self.fields.iter().copied())
            .window(bucket.window_ending(chrono::Utc::now()))
            .include_retweets(self.include_retweets)
            .target_count(self.max_count as usize)
            .max_pages(self.max_pages.unwrap_or(config.twitter.max_pages))
    }

    fn page_delay(&self, config: &Config) -> Duration {
        Duration::from_millis(self.page_delay_ms.unwrap_or(config.twitter.page_delay_ms))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch tweets and classify them into categories
    #[command(alias = "a")]
    Analyze {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Category to classify into (repeat or comma-separate)
        #[arg(long = "category", short = 'c', value_delimiter = ',')]
        categories: Vec<String>,
    },

    /// Fetch tweets without classifying them
    #[command(alias = "f")]
    Fetch {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Where to write it (default: ./tweet-analyzer.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration with credentials masked
    Show,
}

fn print_env_vars() {
    println!("Tweet Analyzer - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  {}           Twitter API v2 bearer token", TWITTER_TOKEN_ENV);
    println!(
        "  {}                Hugging Face inference API token (higher rate limits)",
        HUGGINGFACE_TOKEN_ENV
    );
    println!();
    println!("Search Settings:");
    println!("  TWEET_ANALYZER_TWITTER__BASE_URL          Search API host (default: https://api.twitter.com)");
    println!("  TWEET_ANALYZER_TWITTER__MAX_PAGES         Page ceiling per search (default: 10)");
    println!("  TWEET_ANALYZER_TWITTER__PAGE_DELAY_MS     Pause between pages in ms (default: 1000)");
    println!("  TWEET_ANALYZER_TWITTER__DEFAULT_LANGUAGE  Language filter (default: en)");
    println!();
    println!("Classifier Settings:");
    println!("  TWEET_ANALYZER_CLASSIFIER__BASE_URL       Inference API host");
    println!("  TWEET_ANALYZER_CLASSIFIER__MODEL          Zero-shot model id");
    println!("  TWEET_ANALYZER_CLASSIFIER__THRESHOLD      Minimum score for a category (default: 0.5)");
    println!();
    println!("Other Settings:");
    println!("  TWEET_ANALYZER_LOGGING__LEVEL  Default log level (default: info)");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export {}=\"your-token-here\"", TWITTER_TOKEN_ENV);
    println!("  tweet-analyzer analyze rust -c programming,games,food");
    std::process::exit(0);
}

/// Print a precondition failure and exit with code 2.
fn exit_precondition(err: &PreconditionError) -> ! {
    eprintln!("{}", ui::status_line(Status::Error, &err.to_string()));
    std::process::exit(2);
}

fn load_effective_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit.map(Path::to_path_buf).or_else(find_config_file);
    let config = load_config(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Failed to load config file {}", p.display()),
        None => "Failed to load configuration".to_string(),
    })?;
    if let Some(p) = &path {
        tracing::debug!("Using config file: {}", p.display());
    }
    Ok(config)
}

fn build_paginator(
    client: &HttpClient,
    config: &Config,
    page_delay: Duration,
) -> Result<Paginator> {
    let source = TwitterSource::with_base_url(client.clone(), &config.twitter.base_url)
        .context("Failed to create search source")?;
    Ok(Paginator::new(Arc::new(source)).page_delay(page_delay))
}

fn build_classifier(client: &HttpClient, config: &Config) -> ClassifierHandle {
    let client = client.clone();
    let settings = config.classifier.clone();
    ClassifierHandle::lazy(move || {
        tracing::info!(model = %settings.model, "Loading zero-shot classifier");
        let classifier = HuggingFaceClassifier::with_base_url(
            client.clone(),
            &settings.base_url,
            &settings.model,
        )?
        .api_token(settings.api_token.clone());
        Ok(Arc::new(classifier) as Arc<dyn ZeroShotClassifier>)
    })
    .threshold(config.classifier.threshold)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    let config = load_effective_config(cli.config.as_deref())?;

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tweet_analyzer={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.output.resolve();
    let show_progress = !cli.quiet && format == OutputFormat::Table;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Analyze { fetch, categories } => {
            let client = HttpClient::with_timeout(Duration::from_secs(cli.timeout))
                .context("Failed to build HTTP client")?;
            let paginator = build_paginator(&client, &config, fetch.page_delay(&config))?;
            let analyzer = Analyzer::new(paginator, Arc::new(build_classifier(&client, &config)));
            let request = AnalysisRequest::new(
                config.resolve_bearer_token(fetch.token.clone()),
                fetch.to_query(&config),
                categories,
            );

            let progress = ClassificationProgress::new(!show_progress);
            let started = Instant::now();
            let result = analyzer
                .run_with_progress(&request, &|done, total| progress.update(done, total))
                .await;
            progress.finish();

            let report = match result {
                Ok(report) => report,
                Err(AnalysisError::Precondition(err)) => exit_precondition(&err),
                Err(err) => return Err(err.into()),
            };
            output_report(&report, &request.query.display_fields(), format, started.elapsed())?;
        }

        Commands::Fetch { fetch } => {
            let request = AnalysisRequest::new(
                config.resolve_bearer_token(fetch.token.clone()),
                fetch.to_query(&config),
                Vec::<String>::new(),
            );
            let token = match request.check_fetch() {
                Ok(token) => token,
                Err(err) => exit_precondition(&err),
            };
            let query = &request.query;

            let client = HttpClient::with_timeout(Duration::from_secs(cli.timeout))
                .context("Failed to build HTTP client")?;
            let paginator = build_paginator(&client, &config, fetch.page_delay(&config))?;

            let message = format!("Searching for \"{}\"...", query.keyword);
            let spinner = Spinner::new(&message, !show_progress);
            let started = Instant::now();
            let results = match paginator.fetch(query, token).await {
                Ok(results) => {
                    spinner.finish_with_success(&format!("Fetched {} tweets", results.len()));
                    results
                }
                Err(err) => {
                    spinner.finish_with_error("Search failed");
                    match AnalysisError::from(err) {
                        AnalysisError::Precondition(err) => exit_precondition(&err),
                        err => return Err(err.into()),
                    }
                }
            };
            output_results(query, &results, format, started.elapsed())?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
                write_default_config(&path, force)?;
                println!(
                    "{}",
                    ui::status_line(
                        Status::Success,
                        &format!("Wrote default configuration to {}", path.display())
                    )
                );
            }
            ConfigAction::Show => {
                let redacted = config.redacted();
                if format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&redacted)?);
                } else {
                    print!(
                        "{}",
                        toml::to_string_pretty(&redacted).context("Failed to render configuration")?
                    );
                }
            }
        },
    }

    Ok(())
}

fn output_report(
    report: &AnalysisReport,
    fields: &[TweetField],
    format: OutputFormat,
    elapsed: Duration,
) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Plain => {
            for analyzed in &report.tweets {
                println!(
                    "{}\t{}\t{:.2}\t{}",
                    analyzed.tweet.id,
                    analyzed.predicted_category,
                    analyzed.confidence,
                    single_line(&analyzed.tweet.text)
                );
            }
            for bucket in report.histogram.buckets() {
                println!("{}: {}", bucket.category, bucket.count);
            }
        }
        OutputFormat::Table => {
            ui::print_search_header(
                &report.keyword,
                report.tweets.len(),
                report.pages_fetched,
                elapsed,
            );
            if report.tweets.is_empty() {
                println!("{}", ui::status_line(Status::Info, "No tweets matched this search."));
                return Ok(());
            }

            ui::print_section("Categories");
            println!("{}", ui::histogram_table(&report.histogram));
            let unknown = report.histogram.get(UNKNOWN_CATEGORY);
            if unknown > 0 {
                println!(
                    "{}",
                    ui::status_line(
                        Status::Warning,
                        &format!("{} tweet(s) did not clearly fit any category", unknown)
                    )
                    .dimmed()
                );
            }

            ui::print_section("Raw data");
            println!("{}", ui::analyzed_table(&report.tweets, fields));
        }
    }
    Ok(())
}

fn output_results(
    query: &SearchQuery,
    results: &ResultSet,
    format: OutputFormat,
    elapsed: Duration,
) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
        OutputFormat::Plain => {
            for tweet in &results.tweets {
                println!("{}\t{}", tweet.id, single_line(&tweet.text));
            }
        }
        OutputFormat::Table => {
            ui::print_search_header(&query.keyword, results.len(), results.pages_fetched, elapsed);
            if results.is_empty() {
                println!("{}", ui::status_line(Status::Info, "No tweets matched this search."));
            } else {
                println!("{}", ui::tweets_table(&results.tweets, &query.display_fields()));
            }
        }
    }
    Ok(())
}
