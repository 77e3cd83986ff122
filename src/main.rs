use anyhow::Result;
use clap::Parser;
use ecogrid_core::{init_logging, SchedulerMode, SeedRequest, SimConfig};
use ecogrid_lib::app::{App, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Plants to seed
    #[arg(long, default_value_t = 40)]
    plants: usize,

    /// Herbivores to seed
    #[arg(long, default_value_t = 20)]
    herbivores: usize,

    /// Carnivores to seed
    #[arg(long, default_value_t = 5)]
    carnivores: usize,

    /// Ticks to run after seeding
    #[arg(short, long, default_value_t = 50)]
    ticks: u64,

    /// Seed for the random stream (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Use the parallel scheduler
    #[arg(long)]
    parallel: bool,

    /// Print JSON lines instead of text grids
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = SimConfig::load_or_default(&args.config)?;
    if args.seed.is_some() {
        config.grid.seed = args.seed;
    }
    if args.parallel {
        config.grid.scheduler = SchedulerMode::Parallel;
    }
    config.validate()?;
    tracing::info!(fingerprint = %config.fingerprint(), "Loaded simulation rules");

    let request = SeedRequest::new(args.plants, args.herbivores, args.carnivores)
        .with_size(config.grid.rows, config.grid.cols);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut app = App::new(config, format)?;
    let stdout = std::io::stdout();
    let census = app.run(&request, args.ticks, &mut stdout.lock())?;
    tracing::info!(%census, "Final population");
    Ok(())
}
