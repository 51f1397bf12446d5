use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avatar_blob_store::BlobStoreStats;
use avatar_cache::{
    config::AvatarConfig,
    models::{
        Address, AvatarImage, AvatarSubject, DisplayParams, GroupId, GroupSnapshot,
        LocalUserDisplayMode, SubjectIdentity, ThemeId,
    },
    rendering::BasicRenderer,
    services::{
        AvatarCacheStats, AvatarCollaborators, AvatarService, SecondaryAvatarService, StateSnapshot,
    },
    storage::{JsonFileKeyValueStore, SandboxedBitmapStore},
};

#[derive(Parser)]
#[command(name = "avatar-cache")]
#[command(version)]
#[command(about = "Render avatars through a persistent two-tier cache")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "avatar-cache.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a contact avatar
    Contact(ContactArgs),
    /// Render a group avatar
    Group(GroupArgs),
    /// Render literal text (usually initials)
    Text(TextArgs),
    /// Print disk store statistics as JSON
    Stats,
}

#[derive(Args)]
struct OutputArgs {
    /// Where to write the PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Diameter in points (defaults to the configured value)
    #[arg(long)]
    diameter: Option<f32>,

    /// Device pixels per point (defaults to the configured value)
    #[arg(long)]
    scale: Option<f32>,

    /// Color theme (defaults to the configured value)
    #[arg(long)]
    theme: Option<String>,

    /// Only read what a previous run cached; never render
    #[arg(long)]
    secondary: bool,

    /// Print cache statistics after rendering
    #[arg(long)]
    stats: bool,
}

#[derive(Args)]
struct ContactArgs {
    /// Service UUID or E.164 phone number
    #[arg(short, long)]
    address: String,

    /// Display name used for initials
    #[arg(short, long)]
    name: Option<String>,

    /// Profile photo file
    #[arg(short, long)]
    photo: Option<PathBuf>,

    /// Replace the avatar with a gradient
    #[arg(long)]
    blur: bool,

    /// Treat this address as the local user shown as note-to-self
    #[arg(long)]
    note_to_self: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct GroupArgs {
    /// Group identifier
    #[arg(short, long)]
    id: String,

    /// Group photo file
    #[arg(short, long)]
    photo: Option<PathBuf>,

    #[arg(long)]
    blur: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct TextArgs {
    #[arg(short, long)]
    text: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Serialize)]
struct StatsReport {
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<AvatarCacheStats>,
    disk: BlobStoreStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("avatar_cache={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AvatarConfig::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    let bitmaps = SandboxedBitmapStore::open(&config.storage.blob_directory)
        .await
        .context("Failed to open avatar blob directory")?;

    let (subject, state, output) = match cli.command {
        Command::Stats => {
            print_stats(None, &bitmaps).await?;
            return Ok(());
        }
        Command::Contact(args) => contact_subject(args, &config)?,
        Command::Group(args) => group_subject(args, &config)?,
        Command::Text(args) => {
            let theme = theme_or_default(&args.output, &config);
            let subject = AvatarSubject::Text {
                text: args.text,
                theme: theme.clone(),
            };
            (subject, StateSnapshot::new(theme), args.output)
        }
    };

    let params = display_params(&output, &config, &state);
    let state = Arc::new(state);
    let bitmaps = Arc::new(bitmaps);
    let ledger_store = Arc::new(JsonFileKeyValueStore::new(&config.storage.ledger_file));

    let (avatar, stats) = if output.secondary {
        let mut secondary = SecondaryAvatarService::new(
            &config.cache,
            state.clone(),
            state,
            bitmaps.clone(),
            ledger_store,
        )?;
        (secondary.avatar(&subject, &params).await, None)
    } else {
        let mut service = AvatarService::new(
            &config.cache,
            AvatarCollaborators {
                policy: state.clone(),
                profile: state,
                renderer: Arc::new(BasicRenderer::new()),
                bitmaps: bitmaps.clone(),
                ledger_store,
            },
        )?;
        let avatar = service.avatar(&subject, &params).await;
        service.shutdown().await;
        (avatar, Some(service.stats()))
    };

    match avatar {
        Some(avatar) => write_avatar(&avatar, &output.output)?,
        None => warn!("No avatar available for {:?}", subject),
    }

    if output.stats {
        print_stats(stats, &bitmaps).await?;
    }
    Ok(())
}

fn theme_or_default(output: &OutputArgs, config: &AvatarConfig) -> ThemeId {
    ThemeId::new(
        output
            .theme
            .clone()
            .unwrap_or_else(|| config.rendering.default_theme.clone()),
    )
}

fn display_params(output: &OutputArgs, config: &AvatarConfig, state: &StateSnapshot) -> DisplayParams {
    let params = DisplayParams::new(
        output.diameter.unwrap_or(config.rendering.diameter_points),
        output.scale.unwrap_or(config.rendering.display_scale),
    );
    if state.local_address.is_some() {
        params.with_local_user_display_mode(LocalUserDisplayMode::NoteToSelf)
    } else {
        params
    }
}

fn read_photo(path: Option<&Path>) -> Result<Option<Bytes>> {
    path.map(|path| {
        std::fs::read(path)
            .map(Bytes::from)
            .with_context(|| format!("Failed to read photo {}", path.display()))
    })
    .transpose()
}

fn contact_subject(
    args: ContactArgs,
    config: &AvatarConfig,
) -> Result<(AvatarSubject, StateSnapshot, OutputArgs)> {
    let theme = theme_or_default(&args.output, config);
    let mut state = StateSnapshot::new(theme);

    // Malformed addresses still reach the service, which answers with no avatar
    if let Some(address) = Address::parse(&args.address) {
        if let Some(name) = &args.name {
            state.set_name(address.clone(), name);
        }
        if let Some(photo) = read_photo(args.photo.as_deref())? {
            state.set_photo(address.clone(), photo);
        }
        state.set_blurred(SubjectIdentity::Contact(address.clone()), args.blur);
        if args.note_to_self {
            state.local_address = Some(address);
        }
    }

    Ok((AvatarSubject::Contact(args.address), state, args.output))
}

fn group_subject(
    args: GroupArgs,
    config: &AvatarConfig,
) -> Result<(AvatarSubject, StateSnapshot, OutputArgs)> {
    let mut state = StateSnapshot::new(theme_or_default(&args.output, config));
    if let Some(group_id) = GroupId::new(args.id.as_str()) {
        state.set_blurred(SubjectIdentity::Group(group_id), args.blur);
    }

    let subject = AvatarSubject::Group(GroupSnapshot {
        id: args.id,
        avatar: read_photo(args.photo.as_deref())?,
    });
    Ok((subject, state, args.output))
}

fn write_avatar(avatar: &AvatarImage, output: &Path) -> Result<()> {
    let png = avatar.to_png().context("Failed to encode avatar")?;
    std::fs::write(output, png)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Wrote {}x{} avatar ({}) to {}",
        avatar.bitmap.width(),
        avatar.bitmap.height(),
        avatar.content_fingerprint,
        output.display()
    );
    Ok(())
}

async fn print_stats(cache: Option<AvatarCacheStats>, bitmaps: &SandboxedBitmapStore) -> Result<()> {
    let report = StatsReport {
        generated_at: Utc::now(),
        cache,
        disk: bitmaps.blob_store().stats().await?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
