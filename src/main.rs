//! Giftgen - gift selection banner generator.

mod adapters;
mod builder;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod image_source;
mod model;
mod output;
mod params;
mod ports;
mod session;
mod templates;

use std::io::{BufRead, Write};
use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::builder::{validate_modification, GenerationInputs};
use crate::cli::Cli;
use crate::config::Config;
use crate::context::{RecordingSession, ServiceContext};
use crate::error::AppError;
use crate::image_source::ImageSource;
use crate::model::resolve_model;
use crate::output::{refinement_path, resolve_output_path, save_image};
use crate::params::validate_format;
use crate::ports::ImageGenerator;
use crate::session::Session;
use crate::templates::{resolve_reference, TemplateCatalog};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "giftgen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(AppError::Config)?;
    let catalog = TemplateCatalog::from_config(&config.templates);

    if cli.list_templates {
        for (name, path) in catalog.list() {
            println!("{name}\t{}", path.display());
        }
        return Ok(());
    }

    // Resolve parameters, CLI over config defaults
    let format = cli.format.clone().unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format).map_err(AppError::InvalidArgument)?;
    let aspect_ratio = match cli.aspect_ratio {
        Some(ratio) => ratio,
        None => config.defaults.aspect_ratio.parse().map_err(AppError::Config)?,
    };
    let model = resolve_model(cli.model.as_deref().unwrap_or(&config.defaults.model));

    // Load inputs
    let subjects =
        cli.images.iter().map(|p| ImageSource::from_path(p)).collect::<Result<Vec<_>, _>>()?;
    let reference =
        resolve_reference(cli.reference.as_deref(), cli.template.as_deref(), &catalog)?;
    let inputs = GenerationInputs {
        subjects,
        main_text: cli.main_text.clone().unwrap_or_else(|| config.defaults.main_text.clone()),
        sub_text: cli.sub_text.clone().unwrap_or_else(|| config.defaults.sub_text.clone()),
        style: cli.resolve_style()?,
        aspect_ratio,
        reference,
        modification: None,
    };

    // Reject unusable input before credentials or network are touched
    inputs.validate()?;
    let previous = match cli.refine_from.as_deref() {
        Some(path) => {
            validate_modification(cli.modify.as_deref())?;
            Some(ImageSource::from_path(path)?)
        }
        None => None,
    };

    let output_path = resolve_output_path(cli.output.as_deref(), &inputs.main_text, &format);
    let (ctx, recording) = create_context(&config, &model)?;
    tracing::info!(%model, %aspect_ratio, images = inputs.subjects.len(), "starting");

    let outcome =
        drive(ctx.generator.as_ref(), &cli, &format, &output_path, inputs, previous).await;

    // Finish recording if active, whatever the outcome
    if let Some(recording) = recording {
        drop(ctx);
        match recording.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    outcome
}

/// Pick the generator: replay, recording, or live.
fn create_context(
    config: &Config,
    model: &str,
) -> Result<(ServiceContext, Option<RecordingSession>), AppError> {
    if let Ok(cassette_path) = std::env::var("GIFTGEN_REPLAY") {
        tracing::info!(cassette = %cassette_path, "replaying");
        return Ok((ServiceContext::replaying(Path::new(&cassette_path))?, None));
    }

    let is_recording = std::env::var("GIFTGEN_REC").is_ok_and(|v| v == "true" || v == "1");
    if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(config, model)?;
        return Ok((ctx, Some(session)));
    }

    Ok((ServiceContext::live(config, model)?, None))
}

/// Run the first round (fresh or refinement), then any interactive rounds.
async fn drive(
    generator: &dyn ImageGenerator,
    cli: &Cli,
    format: &str,
    output_path: &Path,
    inputs: GenerationInputs,
    previous: Option<ImageSource>,
) -> Result<(), AppError> {
    let mut session = match previous {
        Some(image) => {
            let mut session = Session::resume(inputs, image);
            let instruction = cli.modify.as_deref().unwrap_or_default();
            let refined = session.refine(generator, instruction).await?;
            save(refined, format, output_path)?;
            session
        }
        None => {
            let mut session = Session::new();
            let generated = session.generate(generator, inputs).await?;
            save(generated, format, output_path)?;
            session
        }
    };

    if cli.interactive {
        refine_interactively(generator, &mut session, format, output_path).await?;
    }
    Ok(())
}

/// Read one modification per line until an empty line or EOF.
///
/// A failed round is reported and the loop continues with the last good image.
async fn refine_interactively(
    generator: &dyn ImageGenerator,
    session: &mut Session,
    format: &str,
    output_path: &Path,
) -> Result<(), AppError> {
    let stdin = std::io::stdin();
    let mut round = 0;
    loop {
        eprint!("Modification (empty line to finish): ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let instruction = line.trim();
        if instruction.is_empty() {
            break;
        }

        let failure = match session.refine(generator, instruction).await {
            Ok(image) => {
                round += 1;
                save(image, format, &refinement_path(output_path, round))?;
                None
            }
            Err(e) => Some(e),
        };
        if let Some(e) = failure {
            tracing::debug!(
                state = ?session.state(),
                retained = session.artifact().is_some(),
                "refinement round failed"
            );
            eprintln!("Error: {e}");
        }
    }
    Ok(())
}

fn save(image: &ImageSource, format: &str, path: &Path) -> Result<(), AppError> {
    save_image(image, format, path)?;
    eprintln!("Saved: {}", path.display());
    Ok(())
}
