use anyhow::Context;
use binpack::{
    infrastructure::render::{ColorPalette, Renderer, SvgRenderer, TextRenderer},
    init_logging, load_config, ModelOptions, PackingConfig, PackingService, SolveOptions,
    SolverBackend, SolverFactory,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "binpack", version, about = "Exact 2D rectangular bin packing")]
struct Cli {
    /// Debug-level logging unless BINPACK_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one packing instance and print the grid
    Solve(SolveArgs),

    /// Run the gRPC packing service (needs the `server` feature)
    Serve {
        #[arg(long, default_value = "0.0.0.0:50051")]
        address: std::net::SocketAddr,

        #[arg(short, long, default_value = "auto")]
        backend: SolverBackend,
    },
}

#[derive(Debug, clap::Args)]
struct SolveArgs {
    /// JSON configuration; the built-in 4x3 instance when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "auto")]
    backend: SolverBackend,

    /// Give up after this many seconds and report Not Solved
    #[arg(long, value_parser = parse_time_limit)]
    time_limit: Option<Duration>,

    /// Add an explicit at-most-one constraint per cell
    #[arg(long)]
    explicit_cell_capacity: bool,

    /// Also write an SVG picture of the grid
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Seed for the SVG colors
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_time_limit(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if seconds.is_nan() || seconds <= 0.0 {
        return Err("must be a positive number of seconds".to_string());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("{} seconds is out of range", value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Solve(args) => solve(args),
        Command::Serve { address, backend } => serve(address, backend),
    }
}

#[cfg(feature = "server")]
fn serve(address: std::net::SocketAddr, backend: SolverBackend) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("cannot start tokio runtime")?;
    let config = binpack::ServerConfig::new(address).with_backend(backend);
    runtime
        .block_on(binpack::start_server(config))
        .map_err(|e| anyhow::anyhow!("server failed: {}", e))
}

#[cfg(not(feature = "server"))]
fn serve(_address: std::net::SocketAddr, _backend: SolverBackend) -> anyhow::Result<()> {
    anyhow::bail!("binpack was built without the `server` feature")
}

fn solve(args: SolveArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PackingConfig::default(),
    };

    let mut options = SolveOptions::default();
    if let Some(limit) = args.time_limit {
        options = options.with_time_limit(limit);
    }

    let solver = SolverFactory::create_from_backend(args.backend)?;
    let service = PackingService::new(solver).with_model_options(ModelOptions {
        explicit_cell_capacity: args.explicit_cell_capacity,
    });
    info!(backend = service.solver_name(), "solver selected");

    let outcome = service
        .solve_config(&config, &options)
        .context("packing failed")?;

    println!("Status: {}", outcome.status);
    match outcome.objective_value {
        Some(value) => println!("Objective value: {}", value),
        None => println!("Objective value: none"),
    }

    let Some(grid) = outcome.grid else {
        println!("{}", outcome.message);
        return Ok(());
    };

    let palette = ColorPalette::seeded(args.seed, grid.placed().len());
    match TextRenderer.render(&grid, &palette) {
        Ok(text) => print!("Grid:\n{}", text),
        Err(e) => warn!(error = %e, "text rendering failed"),
    }

    if let Some(path) = &args.svg {
        let written = SvgRenderer::default()
            .render(&grid, &palette)
            .map_err(anyhow::Error::from)
            .and_then(|svg| {
                std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))
            });
        match written {
            Ok(()) => info!(path = %path.display(), "wrote svg"),
            Err(e) => warn!(error = %e, "svg rendering failed; solution is unaffected"),
        }
    }

    Ok(())
}
