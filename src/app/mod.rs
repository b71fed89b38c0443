// SPDX-License-Identifier: MPL-2.0
//! Headless application: command-line parsing and the two entry points.
//!
//! `serve` runs the caption endpoint against the configured generator.
//! `caption` drives the whole workflow through the step [`Controller`]
//! exactly as an interactive host would: upload, optional crop, generation,
//! caption choice.
//!
//! [`Controller`]: crate::ui::workflow::Controller

pub mod paths;

use crate::application::port::caption::CaptionClient;
use crate::config::{self, Config};
use crate::domain::caption::Tone;
use crate::domain::editing::{AspectPreset, CropSelection};
use crate::domain::upload::SelectedFile;
use crate::domain::workflow::StepKind;
use crate::error::{Error, Result};
use crate::infrastructure::anthropic::AnthropicGenerator;
use crate::infrastructure::http::{DirectCaptionClient, HttpCaptionClient};
use crate::service::captions::CaptionRoute;
use crate::service::server;
use crate::ui::captions::{self, run_generation};
use crate::ui::workflow::{Controller, Event, Message};
use crate::ui::{crop, upload};
use std::ffi::OsString;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const HELP: &str = "\
meme_machine

USAGE:
  meme_machine serve [--bind ADDR] [--config-dir DIR]
  meme_machine caption IMAGE [OPTIONS]

CAPTION OPTIONS:
  --tone TONE        funny, sarcastic or wholesome [default: funny]
  --crop X,Y,W,H     crop rectangle in percent of the image
  --aspect PRESET    centered crop: 1:1, 16:9, 4:3 or free
  --server URL       caption endpoint to call
  --remote           call the endpoint from settings.toml
  --pick N           caption to keep, starting at 1 [default: 1]

COMMON OPTIONS:
  --config-dir DIR   directory holding settings.toml
  -h, --help         print this help
";

// =============================================================================
// Command Line
// =============================================================================

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Serve(ServeFlags),
    Caption(CaptionFlags),
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeFlags {
    pub bind: Option<String>,
    pub config_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFlags {
    pub job: CaptionJob,
    /// Explicit endpoint; wins over `remote`.
    pub server: Option<String>,
    /// Use the endpoint from the client configuration.
    pub remote: bool,
    pub config_dir: Option<String>,
}

/// What the `caption` command does with one image.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionJob {
    pub image: PathBuf,
    pub tone: Tone,
    /// Selection in percent of the natural image size.
    pub crop: Option<CropSelection>,
    /// Preset selection, used when `crop` is not given.
    pub aspect: Option<AspectPreset>,
    /// Zero-based index of the caption to keep.
    pub pick: usize,
}

impl CaptionJob {
    #[must_use]
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            tone: Tone::default(),
            crop: None,
            aspect: None,
            pick: 0,
        }
    }
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns an error for unknown commands, malformed values or leftovers.
pub fn parse_args(mut args: pico_args::Arguments) -> Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    let command = match args.subcommand()?.as_deref() {
        Some("serve") => Command::Serve(ServeFlags {
            bind: args.opt_value_from_str("--bind")?,
            config_dir: args.opt_value_from_str("--config-dir")?,
        }),
        Some("caption") => {
            let tone = args.opt_value_from_str("--tone")?.unwrap_or_default();
            let crop = args.opt_value_from_fn("--crop", parse_crop)?;
            let aspect = args.opt_value_from_str("--aspect")?;
            if crop.is_some() && aspect.is_some() {
                return Err(Error::Config(
                    "--crop and --aspect cannot be combined".to_string(),
                ));
            }
            let pick = args
                .opt_value_from_fn("--pick", parse_pick)?
                .unwrap_or_default();
            let server = args.opt_value_from_str("--server")?;
            let remote = args.contains("--remote");
            let config_dir = args.opt_value_from_str("--config-dir")?;
            let image: PathBuf = args.free_from_str()?;
            Command::Caption(CaptionFlags {
                job: CaptionJob {
                    image,
                    tone,
                    crop,
                    aspect,
                    pick,
                },
                server,
                remote,
                config_dir,
            })
        }
        Some(other) => return Err(Error::Config(format!("unknown command '{other}'"))),
        None => Command::Help,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(Error::Config(format!(
            "unexpected arguments: {}",
            join_os(&rest)
        )));
    }
    Ok(command)
}

fn join_os(values: &[OsString]) -> String {
    values
        .iter()
        .map(|v| v.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses `X,Y,W,H` percentages into a free-form selection.
fn parse_crop(value: &str) -> std::result::Result<CropSelection, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid crop '{value}': {e}"))?;

    match parts.as_slice() {
        &[x, y, width, height] => CropSelection::new(x, y, width, height, None)
            .ok_or_else(|| format!("crop '{value}' does not fit inside the image")),
        _ => Err(format!("crop '{value}' must be X,Y,W,H")),
    }
}

/// Parses a one-based caption number into an index.
fn parse_pick(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("pick must be a number starting at 1, got '{value}'")),
    }
}

// =============================================================================
// Serve
// =============================================================================

/// Runs the caption endpoint until the process is stopped.
///
/// # Errors
///
/// Returns an error if the generator cannot be built or the address cannot
/// be bound.
pub async fn serve(flags: ServeFlags) -> Result<()> {
    paths::init_cli_overrides(flags.config_dir);
    let mut config = load_config();
    if let Some(bind) = flags.bind {
        config.server.bind = bind;
    }

    let generator = AnthropicGenerator::from_config(&config.generator)
        .map_err(|e| Error::Config(e.to_string()))?;
    server::serve(&config.server, generator).await
}

fn load_config() -> Config {
    let (config, warning) = config::load();
    if let Some(warning) = warning {
        log::warn!("{warning}");
    }
    config
}

// =============================================================================
// Caption
// =============================================================================

/// Timing applied to one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub timeout: Duration,
    pub slow_notice: Duration,
}

impl From<&config::ClientConfig> for Timing {
    fn from(client: &config::ClientConfig) -> Self {
        Self {
            timeout: client.request_timeout(),
            slow_notice: client.slow_notice(),
        }
    }
}

/// Result of a headless caption run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionOutcome {
    pub captions: Vec<String>,
    pub chosen: String,
}

/// Runs the `caption` command with the client its flags select.
///
/// # Errors
///
/// Returns an error if any workflow step fails.
pub async fn caption(flags: CaptionFlags) -> Result<CaptionOutcome> {
    paths::init_cli_overrides(flags.config_dir.clone());
    let config = load_config();
    let timing = Timing::from(&config.client);

    let endpoint = flags
        .server
        .clone()
        .or_else(|| flags.remote.then(|| config.client.endpoint.clone()));

    if let Some(endpoint) = endpoint {
        log::info!("Requesting captions from {endpoint}");
        let client = HttpCaptionClient::new(endpoint)?;
        return caption_with(&client, &flags.job, timing).await;
    }

    let generator = AnthropicGenerator::from_config(&config.generator)
        .map_err(|e| Error::Config(e.to_string()))?;
    let client = DirectCaptionClient::new(Arc::new(CaptionRoute::new(generator)));
    caption_with(&client, &flags.job, timing).await
}

/// Drives one image through the workflow using `client` for generation.
///
/// # Errors
///
/// Returns an error if the upload is refused, the crop fails, generation
/// fails or `job.pick` is out of range.
pub async fn caption_with<C: CaptionClient>(
    client: &C,
    job: &CaptionJob,
    timing: Timing,
) -> Result<CaptionOutcome> {
    let mut controller = Controller::new();

    let file = SelectedFile::from_path(&job.image)?;
    controller.update(upload::Message::FileChosen(vec![file]).into());
    if let Some(message) = controller.upload().error_message() {
        return Err(Error::Image(message.to_string()));
    }

    let crop_message = match (job.crop, job.aspect) {
        (Some(selection), _) => Some(crop::Message::SetSelection(selection)),
        (None, Some(preset)) => Some(crop::Message::SetAspect(preset)),
        (None, None) => None,
    };
    if let Some(message) = crop_message {
        apply_crop(&mut controller, message)?;
    }

    controller.update(Message::Proceed);
    if controller.step().kind() != StepKind::Caption {
        return Err(Error::Image("No image to caption".to_string()));
    }

    controller.update(captions::Message::SelectTone(job.tone).into());
    log::info!(
        "Generating {} {} captions ({})",
        job.tone.icon(),
        job.tone.label(),
        job.tone.description()
    );
    let Event::GenerationRequested(pending) =
        controller.update(captions::Message::Generate.into())
    else {
        return Err(Error::Image("No image to caption".to_string()));
    };

    let ticket = pending.ticket;
    let generation = run_generation(client, pending, timing.timeout);
    tokio::pin!(generation);
    let answer = tokio::select! {
        answer = &mut generation => answer,
        () = tokio::time::sleep(timing.slow_notice) => {
            controller.update(captions::Message::SlowNotice { ticket }.into());
            if controller.captions().is_slow() {
                log::info!("Caption generation is taking longer than usual...");
            }
            generation.await
        }
    };

    controller.update(answer.into());
    if let Some(error) = controller.captions().error() {
        return Err(Error::Http(error.to_string()));
    }

    let captions = controller.captions().captions().captions().to_vec();
    controller.update(captions::Message::SelectCaption(job.pick).into());
    match controller.update(captions::Message::Proceed.into()) {
        Event::EditorEntered { caption } => Ok(CaptionOutcome {
            captions,
            chosen: caption,
        }),
        _ => Err(Error::Config(format!(
            "caption {} is out of range; {} available",
            job.pick + 1,
            captions.len()
        ))),
    }
}

/// Crops the uploaded image, rendered at its natural size, with the selection
/// set by `selection`.
fn apply_crop(controller: &mut Controller, selection: crop::Message) -> Result<()> {
    let (width, height) = {
        let stored = controller
            .current_image()
            .ok_or_else(|| Error::Image("No image to crop".to_string()))?;
        image_rs::ImageReader::new(Cursor::new(&stored.bytes()[..]))
            .with_guessed_format()?
            .into_dimensions()?
    };

    controller.update(Message::OpenCrop);
    controller.update(
        crop::Message::ImageLoaded {
            rendered_width: width as f32,
            rendered_height: height as f32,
        }
        .into(),
    );
    controller.update(selection.into());
    controller.update(crop::Message::Apply.into());

    match controller.crop() {
        None => Ok(()),
        Some(overlay) => Err(Error::Image(
            overlay.last_error().unwrap_or("Crop failed").to_string(),
        )),
    }
}
