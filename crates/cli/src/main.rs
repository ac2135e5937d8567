use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{Candidate, MovieRecord};
use server::{EmbeddingBackend, RecommendationOrchestrator, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelRecs - Semantic Movie Recommendations
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Rank movies against a free-text query using sentence embeddings", long_about = None)]
struct Cli {
    /// Configuration file (defaults to reel-recs.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Address of the sentence-embedding service
    #[arg(long, global = true)]
    embedding_service: Option<String>,

    /// Use the in-process stub embedder instead of the embedding service
    #[arg(long, global = true)]
    stub: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP recommendation server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Rank the movies in a JSON file against a query
    Recommend {
        /// Free-text description of the wanted movie
        #[arg(long)]
        query: String,

        /// JSON file holding an array of movie objects with a "description"
        #[arg(long)]
        movies: PathBuf,

        /// Show score and input position for each recommendation
        #[arg(long)]
        explain: bool,

        /// Print the recommended records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Query used for every request
        #[arg(long)]
        query: String,

        /// JSON file holding an array of movie objects with a "description"
        #[arg(long)]
        movies: PathBuf,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            server::start_server(config).await?;
        }
        Commands::Recommend {
            query,
            movies,
            explain,
            json,
        } => {
            quiet_logs(&mut config);
            handle_recommend(&config, &query, &movies, explain, json).await?;
        }
        Commands::Benchmark {
            query,
            movies,
            requests,
            concurrent,
        } => {
            quiet_logs(&mut config);
            handle_benchmark(&config, query, &movies, requests, concurrent).await?;
        }
    }

    Ok(())
}

/// Config file and environment, then command-line overrides
fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from_file(path)?,
        None => ServerConfig::load()?,
    };

    if let Some(addr) = &cli.embedding_service {
        config.embedding_service_addr = addr.clone();
        config.embedding_backend = EmbeddingBackend::Grpc;
    }
    if cli.stub {
        config.embedding_backend = EmbeddingBackend::Stub;
    }

    Ok(config)
}

/// One-off commands print their own results; unless a log level was
/// configured, keep the log to warnings.
fn quiet_logs(config: &mut ServerConfig) {
    apply_quiet_default(config);
    server::init_tracing(config);
}

fn apply_quiet_default(config: &mut ServerConfig) {
    config.log_level.get_or_insert_with(|| "warn".to_string());
}

fn read_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of movies", path.display()))
}

async fn build_orchestrator(config: &ServerConfig) -> Result<RecommendationOrchestrator> {
    let embedder = server::connect_embedder(config).await?;
    Ok(RecommendationOrchestrator::new(
        embedder,
        config.query_enhancer()?,
    ))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    config: &ServerConfig,
    query: &str,
    movies_path: &Path,
    explain: bool,
    json: bool,
) -> Result<()> {
    let movies = read_movies(movies_path)?;
    let total = movies.len();
    let orchestrator = build_orchestrator(config).await?;

    let start = Instant::now();
    let ranked = orchestrator
        .get_ranked(query, movies)
        .await
        .context("Failed to rank movies")?;
    info!("Ranked {} movies in {:?}", total, start.elapsed());

    if json {
        let records: Vec<&MovieRecord> = ranked.iter().map(|c| &c.record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_recommendations(query, &ranked, total, explain);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    config: &ServerConfig,
    query: String,
    movies_path: &Path,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let movies = read_movies(movies_path)?;
    let orchestrator = build_orchestrator(config).await?;
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    println!(
        "Running {} requests over {} movies, {} at a time...",
        requests,
        movies.len(),
        concurrent.max(1)
    );

    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let orchestrator = orchestrator.clone();
        let movies = movies.clone();
        let query = query.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            orchestrator.get_recommendations(&query, movies).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_clock.elapsed();

    if timings.is_empty() {
        println!("No requests made");
        return Ok(());
    }

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f32 / wall_time.as_secs_f32()
    );

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(query: &str, ranked: &[Candidate], total: usize, explain: bool) {
    println!(
        "{}",
        format!("Recommendations for \"{}\" ({} of {} movies):", query, ranked.len(), total)
            .bold()
            .blue()
    );

    if ranked.is_empty() {
        println!("  {}", "No movie is similar enough".yellow());
        return;
    }

    for (i, candidate) in ranked.iter().enumerate() {
        let title = candidate.record.title().unwrap_or("(untitled)");
        println!("{}. {}", (i + 1).to_string().green(), title.bold());
        println!("   {}", candidate.record.description());
        if explain {
            println!(
                "   Score: {:.3} (movie #{} in input)",
                candidate.score,
                candidate.position + 1
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_default_only_when_unset() {
        let mut config = ServerConfig::default();
        apply_quiet_default(&mut config);
        assert_eq!(config.log_filter(), "warn");

        let mut config = ServerConfig {
            log_level: Some("debug".to_string()),
            ..ServerConfig::default()
        };
        apply_quiet_default(&mut config);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_stub_flag_selects_stub_backend() {
        let cli = Cli::parse_from([
            "reel-recs",
            "--stub",
            "recommend",
            "--query",
            "space",
            "--movies",
            "demos/movies.json",
        ]);
        assert!(cli.stub);
        assert!(matches!(cli.command, Commands::Recommend { .. }));
    }
}
