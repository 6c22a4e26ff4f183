use clap::{Args, Parser, Subcommand};
use multiverse_backend::mock::MockBackend;
use multiverse_backend::{LoadParams, SamplingParams};
use multiverse_common::config::GeneratorConfig;
use multiverse_common::{MultiverseError, Result};
use multiverse_core::{registry, CharacterGenerator, GenerateOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;

#[derive(Parser, Debug)]
#[command(
    name = "multiverse",
    version,
    about = "Generate fictional characters across multiple universes"
)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one character; without --details the universe's example
    /// values are used
    Run(RunArgs),
    /// Process a JSON file of generation requests
    Batch(BatchArgs),
    /// List available universes
    List,
    /// Show the required fields and example values of a universe
    Info(InfoArgs),
    Version,
}

#[derive(Args, Debug, Clone)]
struct SamplingArgs {
    /// Maximum length of generated text (50-1000)
    #[arg(long, default_value_t = 350)]
    max_length: usize,
    /// Sampling temperature (0.0-1.0)
    #[arg(long, default_value_t = 0.85)]
    temperature: f64,
    /// Nucleus sampling threshold (0.0-1.0)
    #[arg(long, default_value_t = 0.92)]
    top_p: f64,
    /// Repetition penalty (1.0-2.0)
    #[arg(long, default_value_t = 1.2)]
    repetition_penalty: f64,
    /// Save the generated character to a file
    #[arg(long)]
    save: bool,
    /// Directory for saved files
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Model to run (gpt2, gpt2-medium, gpt2-large, gpt2-xl)
    #[arg(long)]
    model: Option<String>,
    /// Disable GPU usage
    #[arg(long)]
    no_gpu: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Target universe
    universe: String,
    /// Character details matching the universe's required fields
    #[arg(long, num_args = 1..)]
    details: Option<Vec<String>>,
    #[command(flatten)]
    sampling: SamplingArgs,
    /// Run the generation off the caller's thread
    #[arg(long = "async")]
    use_async: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Path to a JSON batch request file
    file: PathBuf,
    #[command(flatten)]
    sampling: SamplingArgs,
}

#[derive(Args, Debug)]
struct InfoArgs {
    universe: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Batch(args) => run_batch(args, cli.verbose).await,
        Commands::List => {
            list_universes();
            Ok(())
        }
        Commands::Info(args) => universe_info(&args.universe),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: [{}] {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_generator(sampling: &SamplingArgs, cfg: &GeneratorConfig) -> Result<CharacterGenerator> {
    let model = sampling.model.clone().unwrap_or_else(|| cfg.model.clone());
    let load = LoadParams {
        model: model.clone(),
        use_gpu: !sampling.no_gpu && cfg.use_gpu.unwrap_or(false),
        cache_dir: cfg.cache_dir.clone(),
    };
    let backend =
        MockBackend::load(load).map_err(|source| MultiverseError::ModelInit { model, source })?;
    Ok(CharacterGenerator::new(Arc::new(backend)))
}

fn options_from(sampling: &SamplingArgs, cfg: &GeneratorConfig) -> GenerateOptions {
    GenerateOptions {
        params: SamplingParams {
            max_length: sampling.max_length,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            repetition_penalty: sampling.repetition_penalty,
        },
        save_to_file: sampling.save,
        output_dir: Some(
            sampling
                .output_dir
                .clone()
                .unwrap_or_else(|| cfg.output_dir.clone()),
        ),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let cfg = GeneratorConfig::load();
    let generator = build_generator(&args.sampling, &cfg)?;
    let opts = options_from(&args.sampling, &cfg);
    tracing::debug!(model = generator.model_name(), "generator ready");

    let result = match (&args.details, args.use_async) {
        (Some(details), true) => generator.generate_async(&args.universe, details, &opts).await?,
        (Some(details), false) => generator.generate(&args.universe, details, &opts)?,
        (None, true) => generator.quick_generate_async(&args.universe, &opts).await?,
        (None, false) => generator.quick_generate(&args.universe, &opts)?,
    };

    println!("Generated Character ({}):", args.universe);
    println!("{}", "=".repeat(40));
    println!("{}", result.text);
    if let Some(path) = result.path {
        println!("\nSaved to: {}", path.display());
    }
    Ok(())
}

async fn run_batch(args: BatchArgs, verbose: bool) -> Result<()> {
    let text = std::fs::read_to_string(&args.file).map_err(|source| {
        MultiverseError::FileOperation {
            path: args.file.clone(),
            op: "read batch file",
            source,
        }
    })?;
    let requests = batch::parse(&text).map_err(|source| MultiverseError::FileOperation {
        path: args.file.clone(),
        op: "parse batch file",
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
    })?;

    println!("Processing {} batch requests...", requests.len());
    let cfg = GeneratorConfig::load();
    let generator = build_generator(&args.sampling, &cfg)?;
    let defaults = options_from(&args.sampling, &cfg);

    let mut handles = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        let generator = generator.clone();
        let opts = request.options(&defaults);
        handles.push(tokio::spawn(async move {
            let result = match &request.details {
                Some(details) => {
                    generator
                        .generate_async(&request.universe, details, &opts)
                        .await
                }
                None => generator.quick_generate_async(&request.universe, &opts).await,
            };
            (index + 1, request.universe, result)
        }));
    }

    let mut successful = 0usize;
    let mut failed = 0usize;
    for handle in handles {
        let Ok((number, universe, result)) = handle.await else {
            failed += 1;
            continue;
        };
        match result {
            Ok(character) => {
                successful += 1;
                if verbose {
                    println!("request {number} ({universe}) completed");
                }
                if let Some(path) = character.path {
                    println!("request {number} saved to {}", path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("request {number} ({universe}) failed: [{}] {}", e.code(), e);
            }
        }
    }

    println!("\nBatch Generation Summary:");
    println!("  Successful: {successful}");
    println!("  Failed: {failed}");
    println!("  Total: {}", successful + failed);
    Ok(())
}

fn list_universes() {
    println!("Available Universes:");
    println!("===================");
    for name in registry::names() {
        println!("  - {name}");
    }
    println!("\nTotal: {} universes", registry::names().len());
}

fn universe_info(universe: &str) -> Result<()> {
    let def = registry::get(universe)?;
    println!("Universe: {}", def.name);
    println!("{}", "=".repeat(def.name.len() + 10));
    println!("\nRequired Fields:");
    for (i, field) in def.fields.iter().enumerate() {
        println!("  {}. {field}", i + 1);
    }
    println!("\nExample Values:");
    for (i, example) in def.examples.iter().enumerate() {
        println!("  {}. {example}", i + 1);
    }
    Ok(())
}
