use clap::Parser;
use matcha_scout::utils::output_filename;
use matcha_scout::{MatchVerdict, PatternSet, Scout, ScoutConfig, ScoutError, write_records};
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ScoutError> {
    let config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::default(),
    };

    let mut scout = Scout::new(config);
    if let Some(max_pages) = args.max_pages {
        scout = scout.with_max_pages(max_pages);
    }
    if args.extended {
        scout = scout.with_pattern_set(PatternSet::Extended);
    }

    match args.command {
        Command::Check { url } => {
            let report = scout.check_website(&url).await?;
            match &report.verdict {
                MatchVerdict::Found { url, pattern } => {
                    println!("found: matcha on {} (pattern: {})", url, pattern)
                }
                MatchVerdict::NotFound => println!("not found"),
            }
            println!("pages fetched: {}", report.pages_fetched);
        }
        Command::Search {
            location,
            radius,
            api_key,
            output,
            concurrency,
        } => {
            if let Some(location) = location {
                scout = scout.with_location(location);
            }
            if let Some(radius) = radius {
                scout = scout.with_radius(radius);
            }
            if let Some(concurrency) = concurrency {
                scout = scout.with_max_concurrency(concurrency);
            }

            let location = scout.config().discovery.location.clone();
            ::log::info!("Starting matcha search around {}", location);
            let start_time = std::time::Instant::now();

            let records = scout.search(&api_key).await?;

            let path = output.unwrap_or_else(|| output_filename(&location).into());
            write_records(&path, &records)?;

            let with_matcha = records.iter().filter(|r| r.has_matcha).count();
            ::log::info!(
                "Search complete - {} businesses in {:.2} seconds",
                records.len(),
                start_time.elapsed().as_secs_f64()
            );
            println!(
                "{} of {} businesses have matcha on their menu; results saved to {}",
                with_matcha,
                records.len(),
                path.display()
            );
        }
    }

    Ok(())
}
