use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cartolina", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a postcard export as a PNG.
    Render(RenderArgs),
    /// Write a sample postcard JSON to start from.
    Init(InitArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input postcard JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Which export to produce.
    #[arg(long, value_enum, default_value_t = SideChoice::Both)]
    side: SideChoice,

    /// Output PNG path. Defaults to the artifact filename in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output JSON path.
    #[arg(long, default_value = "postcard.json")]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideChoice {
    Front,
    Back,
    Both,
}

impl SideChoice {
    fn artifact(self) -> cartolina::Artifact {
        match self {
            SideChoice::Front => cartolina::Artifact::Front,
            SideChoice::Back => cartolina::Artifact::Back,
            SideChoice::Both => cartolina::Artifact::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn read_card_json(path: &Path) -> anyhow::Result<cartolina::Postcard> {
    let f = File::open(path).with_context(|| format!("open postcard '{}'", path.display()))?;
    let r = BufReader::new(f);
    let card: cartolina::Postcard =
        serde_json::from_reader(r).with_context(|| "parse postcard JSON")?;
    Ok(card)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let card = read_card_json(&args.in_path)?;
    card.validate()?;

    let artifact = args.side.artifact();
    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let source = cartolina::FsAssetSource::new(assets_root);
    let assets = cartolina::PreparedAssets::prepare(&card, &source, artifact)?;

    let mut raster = cartolina::Rasterizer::new();
    let sheet = cartolina::render_artifact(&card, &assets, &mut raster, artifact)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(artifact.filename()));
    ensure_parent_dir(&out)?;
    cartolina::export::write_png(&out, &sheet)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let mut card = cartolina::Postcard::sample();
    card.postmark.date = chrono::Local::now().format("%Y/%m/%d").to_string();

    let json = serde_json::to_string_pretty(&card).context("serialize sample postcard")?;
    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, json).with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
