use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stickerpack::{
    CommandRemover, FixedNamePolicy, PackConfig, PipelineEvent, PipelineObserver, PipelineOpts,
    SourceImage, StickerSession,
};

#[derive(Parser, Debug)]
#[command(name = "stickerpack", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a sticker pack archive from images.
    Pack(PackArgs),
    /// Resize one image into every spec as separate PNG files.
    Resize(ResizeArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input images, in sticker order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output archive path (defaults to the configured archive name in the current directory).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Remove backgrounds with the external remover first.
    #[arg(long, default_value_t = false)]
    remove_bg: bool,

    /// Background remover command line: reads an image on stdin, writes a PNG to stdout.
    #[arg(long, default_value = "rembg i - -")]
    remover: String,

    /// Draw an outline around every foreground.
    #[arg(long, default_value_t = false)]
    stroke: bool,

    /// Pack configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which image fills `main/main.png` and `tab/tab.png`.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving one PNG per spec.
    #[arg(long)]
    out_dir: PathBuf,

    /// Pack configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    FirstWins,
    LastWins,
}

impl From<PolicyArg> for FixedNamePolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::FirstWins => Self::FirstWins,
            PolicyArg::LastWins => Self::LastWins,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Resize(args) => cmd_resize(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "stickerpack=info",
        1 => "stickerpack=debug",
        _ => "stickerpack=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PackConfig> {
    match path {
        Some(p) => PackConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(PackConfig::default()),
    }
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(policy) = args.policy {
        config.fixed_name_policy = policy.into();
    }

    let mut term = TerminalObserver;
    let mut sources = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match SourceImage::from_path(path) {
            Ok(src) => sources.push(src),
            Err(e) => term.on_event(&PipelineEvent::FileFailed {
                name: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    let mut remover = if args.remove_bg {
        Some(CommandRemover::from_command_line(&args.remover)?)
    } else {
        None
    };

    let mut session = StickerSession::new(config)?;
    let opts = PipelineOpts {
        remove_background: args.remove_bg,
        add_stroke: args.stroke,
    };
    session.ingest(
        sources,
        opts,
        remover.as_mut().map(|r| r as &mut dyn stickerpack::BackgroundRemover),
        &mut term,
    )?;

    let archive = session.export(&mut term).context("export sticker pack")?;
    let out = args.out.unwrap_or_else(|| PathBuf::from(&archive.file_name));
    archive
        .write_to_path(&out)
        .with_context(|| format!("write archive '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({} files, {} bytes)",
        out.display(),
        archive.paths.len(),
        archive.bytes.len()
    );
    Ok(())
}

fn cmd_resize(args: ResizeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = SourceImage::from_path(&args.in_path)?;
    let outputs = stickerpack::render_single(&source, &config)
        .with_context(|| format!("resize '{}'", args.in_path.display()))?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (name, png) in outputs {
        let path = args.out_dir.join(name);
        std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

/// `current` of `total` as a whole percentage. Remover-reported values are not trusted.
fn percent(current: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let pct = u128::from(current.min(total)) * 100 / u128::from(total);
    pct as u64
}

/// Prints pipeline events to stderr.
struct TerminalObserver;

impl PipelineObserver for TerminalObserver {
    fn on_event(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::FileStarted {
                name,
                position,
                total,
            } => eprintln!("[{}/{total}] {name}", position + 1),
            PipelineEvent::RemovalProgress {
                stage,
                current,
                total,
                ..
            } => {
                if *total > 0 {
                    eprintln!("  {stage}: {}%", percent(*current, *total));
                }
            }
            PipelineEvent::RemovalFailed { name, message } => {
                eprintln!("  background removal failed for {name}, using original: {message}")
            }
            PipelineEvent::FileStored { width, height, .. } => {
                eprintln!("  stored {width}x{height}")
            }
            PipelineEvent::FileFailed { name, message } => {
                eprintln!("  skipped {name}: {message}")
            }
            PipelineEvent::EntryRendered { .. } => {}
            PipelineEvent::ArchiveBuilt { files, bytes } => {
                eprintln!("archive: {files} files, {bytes} bytes")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bin/stickerpack.rs"]
mod tests;
