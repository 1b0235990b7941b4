//! cinemate - Cinemate movie database CLI.

/// Application configuration (TOML).
mod config;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use cinemate_api::{
    CinemateApi, CinemateClient, ListMode, Movie, MovieListParams, MovieState, MovieType, OrderBy,
    Person, SortOrder, parse_date,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory (default: $CINEMATE_CONFIG_DIR, then
    /// $XDG_CONFIG_HOME/cinemate, then ~/.config/cinemate).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Print results as JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Exchange username and password for a pass-key.
    Auth(AuthArgs),
    /// Account data (needs a pass-key).
    Account(AccountCommand),
    /// Movie catalog.
    Movie(MovieCommand),
    /// Person catalog.
    Person(PersonCommand),
    /// Site-wide statistics.
    Stats,
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `auth` subcommand.
#[derive(clap::Args)]
struct AuthArgs {
    /// Account username.
    #[arg(long, required = true)]
    username: String,
    /// Account password.
    #[arg(long, required = true)]
    password: String,
}

/// Arguments for the `account` subcommand.
#[derive(clap::Args)]
struct AccountCommand {
    /// Account subcommand to run.
    #[command(subcommand)]
    command: AccountSubcommands,
}

/// Available account subcommands.
#[derive(Subcommand)]
enum AccountSubcommands {
    /// Show the account summary.
    Profile,
    /// Show the update feed.
    Updates(UpdatesArgs),
    /// Show watched movies, persons and comments.
    Watchlist,
}

/// Arguments for the `account updates` subcommand.
#[derive(clap::Args)]
struct UpdatesArgs {
    /// Include already-read entries.
    #[arg(long)]
    all: bool,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieCommand {
    /// Movie subcommand to run.
    #[command(subcommand)]
    command: MovieSubcommands,
}

/// Available movie subcommands.
#[derive(Subcommand)]
enum MovieSubcommands {
    /// Get one movie by id.
    Get(IdArgs),
    /// List movies matching filters.
    List(MovieListArgs),
    /// Search movies by title.
    Search(TermArgs),
}

/// Arguments for the `person` subcommand.
#[derive(clap::Args)]
struct PersonCommand {
    /// Person subcommand to run.
    #[command(subcommand)]
    command: PersonSubcommands,
}

/// Available person subcommands.
#[derive(Subcommand)]
enum PersonSubcommands {
    /// Get one person by id.
    Get(IdArgs),
    /// Get a person's filmography.
    Movies(IdArgs),
    /// Search persons by name.
    Search(TermArgs),
}

/// Single `--id` argument.
#[derive(clap::Args)]
struct IdArgs {
    /// Cinemate id (e.g. 68675).
    #[arg(long, required = true)]
    id: u64,
}

/// Single `--term` argument.
#[derive(clap::Args)]
struct TermArgs {
    /// Search term (e.g. "Пираты кариб").
    #[arg(long, required = true)]
    term: String,
}

/// Arguments for the `movie list` subcommand.
#[derive(clap::Args)]
struct MovieListArgs {
    /// Movie type: movie, serial, short.
    #[arg(long = "type")]
    kind: Option<MovieType>,
    /// Release state: soon, cinema.
    #[arg(long)]
    state: Option<MovieState>,
    /// Listing mode: best.
    #[arg(long)]
    mode: Option<ListMode>,
    /// Release year.
    #[arg(long)]
    year: Option<u32>,
    /// Genre slug (e.g. "sport").
    #[arg(long)]
    genre: Option<String>,
    /// Country slug (e.g. "kazakhstan").
    #[arg(long)]
    country: Option<String>,
    /// Sort key: `create_date`, `release_date`, `ru_release_date`.
    #[arg(long)]
    order_by: Option<OrderBy>,
    /// Sort direction: desc, asc.
    #[arg(long)]
    order: Option<SortOrder>,
    /// Lower date bound. Formats: "2010-03-07", "07.03.2010".
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Upper date bound. Same formats as --from.
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Page number.
    #[arg(long)]
    page: Option<u32>,
    /// Page size (server maximum 25).
    #[arg(long)]
    per_page: Option<u32>,
}

impl MovieListArgs {
    /// Converts CLI filters into request parameters.
    fn to_params(&self) -> MovieListParams {
        MovieListParams {
            kind: self.kind,
            state: self.state,
            mode: self.mode,
            year: self.year,
            genre: self.genre.clone(),
            country: self.country.clone(),
            order_by: self.order_by,
            order: self.order,
            from: self.from,
            to: self.to,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a default config file.
    Init(ConfigInitArgs),
    /// Show the effective config with secrets masked.
    Show,
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Options shared by every subcommand.
struct Global {
    /// Config directory override.
    dir: Option<PathBuf>,
    /// JSON output.
    json: bool,
}

/// Resolves the config file path from `--dir` and the process environment.
///
/// # Errors
///
/// Returns an error if no config directory can be determined.
fn config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_config_path(dir.map(PathBuf::as_path), |name| std::env::var(name).ok())
        .context("failed to resolve config path")
}

/// Loads the config file and applies environment overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config = AppConfig::load(&config_path(dir)?).context("failed to load config")?;
    Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
}

/// Builds a `CinemateClient` from the effective config.
///
/// # Errors
///
/// Returns an error if the config is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_client(dir: Option<&PathBuf>) -> Result<CinemateClient> {
    let config = load_config(dir)?;

    let base_url = Url::parse(&config.client.base_url)
        .with_context(|| format!("invalid base_url: {}", config.client.base_url))?;
    let user_agent = config.client.user_agent.unwrap_or_else(|| {
        String::from(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    });

    let mut builder = CinemateClient::builder()
        .base_url(base_url)
        .user_agent(user_agent)
        .call_delay(Duration::from_millis(config.client.call_delay_ms));
    if let Some(key) = config.credentials.api_key {
        builder = builder.api_key(key);
    }
    if let Some(key) = config.credentials.pass_key {
        builder = builder.pass_key(key);
    }

    builder.build().context("failed to build Cinemate client")
}

/// Writes `value` as pretty JSON to stdout.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to serialize JSON output")?;
    writeln!(out).context("failed to write JSON output")?;
    Ok(())
}

/// Formats an optional value, `-` when absent.
fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |v| v.to_string())
}

/// Logs a movie listing.
fn log_movies(movies: &[Movie]) {
    tracing::info!("ID\tYear\tType\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            or_dash(movie.year),
            movie.kind.as_deref().unwrap_or("-"),
            movie.display_title(),
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Logs a person listing.
fn log_persons(persons: &[Person]) {
    tracing::info!("ID\tName\t\t\tOriginal");
    for person in persons {
        tracing::info!(
            "{}\t{}\t{}",
            person.id,
            person.name.as_deref().unwrap_or("-"),
            person.name_original.as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} persons", persons.len());
}

/// Runs the `auth` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or authentication fails.
#[instrument(skip_all)]
async fn run_auth(args: &AuthArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let passkey = client
        .authenticate(&args.username, &args.password)
        .await
        .context("authentication failed")?;

    if global.json {
        return emit_json(&serde_json::json!({ "passkey": passkey }));
    }
    tracing::info!("Pass-key: {passkey}");
    tracing::info!(
        "Store it as credentials.pass_key in config.toml or export {}",
        config::PASSKEY_ENV
    );
    Ok(())
}

/// Runs the `account profile` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_account_profile(global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let profile = client
        .account_profile()
        .await
        .context("account profile request failed")?;

    if global.json {
        return emit_json(&profile);
    }
    tracing::info!("Username: {}", profile.username);
    tracing::info!("Reputation: {}", or_dash(profile.reputation));
    tracing::info!("Reviews: {}", or_dash(profile.review_count));
    tracing::info!(
        "Badges: gold={} silver={} bronze={}",
        or_dash(profile.gold_badges),
        or_dash(profile.silver_badges),
        or_dash(profile.bronze_badges),
    );
    tracing::info!(
        "Unread: pm={} forum={} updates={}",
        or_dash(profile.unread_pm_count),
        or_dash(profile.unread_forum_count),
        or_dash(profile.unread_updatelist_count),
    );
    tracing::info!("Subscriptions: {}", or_dash(profile.subscription_count));
    Ok(())
}

/// Runs the `account updates` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_account_updates(args: &UpdatesArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let new_only = if args.all { Some(false) } else { None };
    let entries = client
        .account_updates(new_only)
        .await
        .context("account updates request failed")?;

    if global.json {
        return emit_json(&entries);
    }
    tracing::info!("Date\t\t\tNew\tObject\tDescription");
    for entry in &entries {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            entry.date.as_deref().unwrap_or("-"),
            if entry.new == Some(true) { "*" } else { "" },
            entry.for_object.as_deref().unwrap_or("-"),
            entry.description.as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} entries", entries.len());
    Ok(())
}

/// Runs the `account watchlist` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_account_watchlist(global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let watchlist = client
        .account_watchlist()
        .await
        .context("watchlist request failed")?;

    if global.json {
        return emit_json(&watchlist);
    }
    if watchlist.is_empty() {
        tracing::info!("Watchlist is empty.");
        return Ok(());
    }
    for (label, entries) in [
        ("Movies", &watchlist.movies),
        ("Persons", &watchlist.persons),
        ("Comments", &watchlist.comments),
    ] {
        tracing::info!("{label} ({}):", entries.len());
        for entry in entries {
            tracing::info!(
                "  {}\t{}\t{}",
                or_dash(entry.id),
                entry.title.as_deref().unwrap_or("-"),
                entry.date.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}

/// Runs the `movie get` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movie_get(args: &IdArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let movie = client
        .movie(args.id)
        .await
        .context("movie request failed")?;

    if global.json {
        return emit_json(&movie);
    }
    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.display_title());
    tracing::info!(
        "Original Title: {}",
        movie.title_original.as_deref().unwrap_or("-")
    );
    tracing::info!("Type: {}", movie.kind.as_deref().unwrap_or("-"));
    tracing::info!("Year: {}", or_dash(movie.year));
    tracing::info!("Runtime: {} min", or_dash(movie.runtime));
    tracing::info!("Countries: {}", movie.countries.join(", "));
    tracing::info!("Genres: {}", movie.genres.join(", "));
    tracing::info!(
        "Director: {}",
        movie
            .director
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or("-")
    );
    for (source, rating) in movie.ratings() {
        tracing::info!(
            "Rating ({source}): {} ({} votes)",
            or_dash(rating.score),
            or_dash(rating.votes)
        );
    }
    tracing::info!(
        "Release: world={} russia={}",
        movie.release_date_world.as_deref().unwrap_or("-"),
        movie.release_date_russia.as_deref().unwrap_or("-"),
    );
    tracing::info!("URL: {}", movie.url.as_deref().unwrap_or("-"));
    Ok(())
}

/// Runs the `movie list` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movie_list(args: &MovieListArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let movies = client
        .movie_list(&args.to_params())
        .await
        .context("movie list request failed")?;

    if global.json {
        return emit_json(&movies);
    }
    log_movies(&movies);
    Ok(())
}

/// Runs the `movie search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movie_search(args: &TermArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let movies = client
        .movie_search(&args.term)
        .await
        .context("movie search request failed")?;

    if global.json {
        return emit_json(&movies);
    }
    log_movies(&movies);
    Ok(())
}

/// Runs the `person get` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_person_get(args: &IdArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let person = client
        .person(args.id)
        .await
        .context("person request failed")?;

    if global.json {
        return emit_json(&person);
    }
    tracing::info!("ID: {}", person.id);
    tracing::info!("Name: {}", person.name.as_deref().unwrap_or("-"));
    tracing::info!(
        "Original Name: {}",
        person.name_original.as_deref().unwrap_or("-")
    );
    tracing::info!("URL: {}", person.url.as_deref().unwrap_or("-"));
    Ok(())
}

/// Runs the `person movies` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_person_movies(args: &IdArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let person = client
        .person_movies(args.id)
        .await
        .context("person movies request failed")?;

    if global.json {
        return emit_json(&person);
    }
    tracing::info!(
        "{} ({})",
        person.name.as_deref().unwrap_or("-"),
        person.id
    );
    let filmography = person.movies.unwrap_or_default();
    tracing::info!("As director:");
    log_movies(&filmography.as_director);
    tracing::info!("As actor:");
    log_movies(&filmography.as_actor);
    Ok(())
}

/// Runs the `person search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_person_search(args: &TermArgs, global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let persons = client
        .person_search(&args.term)
        .await
        .context("person search request failed")?;

    if global.json {
        return emit_json(&persons);
    }
    log_persons(&persons);
    Ok(())
}

/// Runs the `stats` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_stats(global: &Global) -> Result<()> {
    let client = build_client(global.dir.as_ref())?;

    let stats = client
        .site_stats()
        .await
        .context("site stats request failed")?;

    if global.json {
        return emit_json(&stats);
    }
    tracing::info!("Users: {}", or_dash(stats.users_count));
    tracing::info!("Reviews: {}", or_dash(stats.reviews_count));
    tracing::info!("Comments: {}", or_dash(stats.comments_count));
    tracing::info!("Movies: {}", or_dash(stats.movies_count));
    tracing::info!("Persons: {}", or_dash(stats.persons_count));
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, global: &Global) -> Result<()> {
    let path = config_path(global.dir.as_ref())?;
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default()
        .save(&path)
        .context("failed to write config")?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show(global: &Global) -> Result<()> {
    let config = load_config(global.dir.as_ref())?.masked();

    if global.json {
        return emit_json(&config);
    }
    let content = toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;
    tracing::info!("# {}", config_path(global.dir.as_ref())?.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }
    tracing::info!(
        "# {} and {} override the credentials above; {} relocates the file",
        config::API_KEY_ENV,
        config::PASSKEY_ENV,
        config::CONFIG_DIR_ENV
    );
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let global = Global {
        dir: cli.dir,
        json: cli.json,
    };
    match cli.command {
        Commands::Auth(args) => run_auth(&args, &global).await,
        Commands::Account(cmd) => match cmd.command {
            AccountSubcommands::Profile => run_account_profile(&global).await,
            AccountSubcommands::Updates(args) => run_account_updates(&args, &global).await,
            AccountSubcommands::Watchlist => run_account_watchlist(&global).await,
        },
        Commands::Movie(cmd) => match cmd.command {
            MovieSubcommands::Get(args) => run_movie_get(&args, &global).await,
            MovieSubcommands::List(args) => run_movie_list(&args, &global).await,
            MovieSubcommands::Search(args) => run_movie_search(&args, &global).await,
        },
        Commands::Person(cmd) => match cmd.command {
            PersonSubcommands::Get(args) => run_person_get(&args, &global).await,
            PersonSubcommands::Movies(args) => run_person_movies(&args, &global).await,
            PersonSubcommands::Search(args) => run_person_search(&args, &global).await,
        },
        Commands::Stats => run_stats(&global).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, &global),
            ConfigSubcommands::Show => run_config_show(&global),
        },
    }
}
