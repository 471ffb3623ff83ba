//! `mirror`: headless driver for the MirrorAI try-on workflow.

mod config;
mod export;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use mirror_capture::input::{acquire, FileItem, ImageSource};
use mirror_core::image::StillImage;
use mirror_core::preset::PresetCatalog;
use mirror_core::services::{DescriptionService, GenerationService, ShareOutcome};
use mirror_core::types::{EditTarget, Gender, InputMethod};
use mirror_genai::api::GeminiApi;
use mirror_genai::config::GenAiConfig;
use mirror_workflow::controller::WorkflowController;
use mirror_workflow::events::WorkflowEvent;
use mirror_workflow::session::Step;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::export::FileExportSink;

#[derive(Parser)]
#[command(name = "mirror", version, about = "Virtual clothing and hairstyle try-on")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the preset catalog.
    Presets {
        /// Only presets for this target (clothing, hair).
        #[arg(long)]
        target: Option<EditTarget>,
        /// Only presets visible under this gender filter (male, female).
        #[arg(long, value_parser = parse_gender_filter)]
        gender: Option<Gender>,
    },
    /// Run one try-on and export the result.
    TryOn(TryOnArgs),
}

#[derive(Args)]
struct TryOnArgs {
    /// Photo of the person to edit.
    #[arg(long)]
    subject: PathBuf,
    /// What to change.
    #[arg(long, default_value = "clothing")]
    target: EditTarget,
    /// Preset id from `mirror presets`.
    #[arg(long, group = "look")]
    preset: Option<String>,
    /// Photo showing the desired garment or hairstyle.
    #[arg(long, group = "look")]
    reference: Option<PathBuf>,
    /// Free-text description of the desired look.
    #[arg(long, group = "look")]
    text: Option<String>,
    /// Output directory (overrides MIRROR_OUTPUT_DIR).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirror_cli=info,mirror_workflow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let catalog = config.load_catalog().await?;

    match cli.command {
        Command::Presets { target, gender } => {
            list_presets(&catalog, target, gender);
            Ok(())
        }
        Command::TryOn(args) => try_on(config, catalog, args).await,
    }
}

fn parse_gender_filter(s: &str) -> Result<Gender, String> {
    match s.parse::<Gender>() {
        Ok(gender) if gender.is_filter() => Ok(gender),
        Ok(gender) => Err(format!("'{gender}' is not a filter; use male or female")),
        Err(e) => Err(e.to_string()),
    }
}

fn list_presets(catalog: &PresetCatalog, target: Option<EditTarget>, gender: Option<Gender>) {
    for preset in catalog.entries() {
        if target.is_some_and(|t| t != preset.category) {
            continue;
        }
        if gender.is_some_and(|g| !preset.visible_to(g)) {
            continue;
        }
        println!(
            "{:<6} {:<9} {:<7} {}",
            preset.id,
            preset.category.as_str(),
            preset.gender.as_str(),
            preset.display_name
        );
    }
}

async fn try_on(config: AppConfig, catalog: PresetCatalog, args: TryOnArgs) -> anyhow::Result<()> {
    let method = if args.preset.is_some() {
        InputMethod::Preset
    } else if args.reference.is_some() {
        InputMethod::ReferenceImage
    } else if args.text.is_some() {
        InputMethod::FreeText
    } else {
        bail!("one of --preset, --reference or --text is required");
    };

    let api = Arc::new(GeminiApi::new(GenAiConfig::from_env()?)?);
    let controller = WorkflowController::new(
        Arc::new(catalog),
        Arc::clone(&api) as Arc<dyn DescriptionService>,
        api as Arc<dyn GenerationService>,
    );

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                WorkflowEvent::StepChanged { to, .. } => tracing::info!(step = to.label(), "Step"),
                other => tracing::debug!(event = ?other, "Workflow event"),
            }
        }
    });

    let subject = load_image(&args.subject).await?;
    controller.set_subject_image(subject).await?;
    controller.confirm_subject().await?;
    controller.select_edit_target(args.target).await?;
    controller.select_input_method(method).await?;

    if let Some(id) = &args.preset {
        controller.select_preset(id).await?;
    }
    if let Some(path) = &args.reference {
        let reference = load_image(path).await?;
        controller.attach_reference_image(reference).await?.await?;
        let session = controller.snapshot().await;
        if session.free_text_description().is_empty() {
            tracing::warn!("No description for the reference image; relying on the image alone");
        } else {
            tracing::info!(description = session.free_text_description(), "Reference described");
        }
    }
    if let Some(text) = args.text {
        controller.set_free_text(text).await?;
    }

    tracing::info!(edit_target = %args.target, method = %method, "Generating");
    if controller.generate().await? != Step::ResultReady {
        let session = controller.snapshot().await;
        bail!(
            "generation failed: {}",
            session.last_error().unwrap_or("unknown error")
        );
    }

    let sink = FileExportSink::new(args.out.unwrap_or(config.output_dir));
    match controller.share(&sink).await? {
        ShareOutcome::Downloaded { location } => println!("{location}"),
        ShareOutcome::Shared => println!("shared"),
    }
    Ok(())
}

async fn load_image(path: &Path) -> anyhow::Result<StillImage> {
    acquire(ImageSource::SelectedFile(FileItem::from_path(path)))
        .await?
        .with_context(|| format!("{} is not a supported image", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_filter_accepts_male_and_female_only() {
        assert_eq!(parse_gender_filter("male"), Ok(Gender::Male));
        assert_eq!(parse_gender_filter("female"), Ok(Gender::Female));
        assert!(parse_gender_filter("unisex").is_err());
        assert!(parse_gender_filter("other").is_err());
    }

    #[test]
    fn presets_command_rejects_unisex_filter() {
        assert!(Cli::try_parse_from(["mirror", "presets", "--gender", "unisex"]).is_err());
        let cli = Cli::try_parse_from(["mirror", "presets", "--gender", "male"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Presets {
                gender: Some(Gender::Male),
                ..
            }
        ));
    }
}
