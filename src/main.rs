// src/main.rs
use contact_crawler::models::Result;
use contact_crawler::{load_config, Config, DomainResolver, JobCoordinator, JobEvent};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    let directive = format!("contact_crawler={}", config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let resolve_mode = args.first().map(|a| a == "--resolve").unwrap_or(false);
    if resolve_mode {
        args.remove(0);
    }
    if args.is_empty() {
        eprintln!("usage: contact-crawler [--resolve] <website-or-query>...");
        return Ok(());
    }

    tokio::select! {
        result = run(config, resolve_mode, args) => {
            result?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}

async fn run(config: Config, resolve_mode: bool, args: Vec<String>) -> Result<()> {
    if resolve_mode {
        resolve_queries(&args).await
    } else {
        crawl_targets(config, args).await
    }
}

async fn crawl_targets(config: Config, targets: Vec<String>) -> Result<()> {
    let coordinator = JobCoordinator::new(&config)?;
    let job_id = coordinator.submit(targets)?;
    let mut events = coordinator.stream(&job_id)?;

    while let Some(event) = events.recv().await {
        match event {
            JobEvent::Progress {
                website,
                emails,
                error,
                processed_count,
                total_count,
                ..
            } => {
                if let Some(error) = error {
                    warn!("[{}/{}] {}: {}", processed_count, total_count, website, error);
                } else {
                    info!(
                        "[{}/{}] {}: {} emails",
                        processed_count,
                        total_count,
                        website,
                        emails.len()
                    );
                }
                for email in emails {
                    println!("{}\t{}", website, email);
                }
            }
            JobEvent::Done => {
                info!("All targets processed");
            }
        }
    }

    Ok(())
}

async fn resolve_queries(queries: &[String]) -> Result<()> {
    let resolver = DomainResolver::new()?;
    for result in resolver.resolve_batch(queries).await {
        if let Some(error) = &result.error {
            warn!("{}: {}", result.original_input, error);
        }
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(())
}
