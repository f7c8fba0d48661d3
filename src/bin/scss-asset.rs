use std::{
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scss_asset::{
    Asset, CompileFilter, HostPlatform, InputStrategy, OutputStyle, PipelineConfig, ScssAsset,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scss-asset", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a stylesheet to CSS (requires the `sassc` binary).
    Compile(CompileArgs),
    /// Print the compiler path resolved for this host.
    Which(WhichArgs),
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input stylesheet.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output CSS path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON pipeline configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the compiler binary.
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Output style.
    #[arg(long, value_enum)]
    style: Option<OutputStyle>,

    /// Numeric precision.
    #[arg(long)]
    precision: Option<u32>,

    /// Extra import directory (repeatable).
    #[arg(long = "load-path")]
    load_paths: Vec<PathBuf>,

    /// Force LF line endings.
    #[arg(long)]
    unix_newlines: bool,

    /// Suppress compiler warnings.
    #[arg(long)]
    quiet: bool,

    /// Emit debug annotations.
    #[arg(long)]
    debug_info: bool,

    /// Emit source line comments.
    #[arg(long)]
    line_numbers: bool,

    /// Emit a source map.
    #[arg(long)]
    sourcemap: bool,

    /// Compiler cache directory.
    #[arg(long)]
    cache_location: Option<PathBuf>,

    /// Disable the compiler cache.
    #[arg(long)]
    no_cache: bool,

    /// Pass the source through a temporary file instead of stdin.
    #[arg(long)]
    temp_file: bool,

    /// Kill the compiler after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct WhichArgs {
    /// Directory holding the compiler binary.
    #[arg(long)]
    bin_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SCSS_ASSET_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compile(args) => cmd_compile(args),
        Command::Which(args) => cmd_which(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => PipelineConfig::default(),
    };
    Ok(config.with_env()?)
}

fn merge_args(mut config: PipelineConfig, args: &CompileArgs) -> PipelineConfig {
    if let Some(dir) = &args.bin_dir {
        config.bin_dir = Some(dir.clone());
    }
    if args.temp_file {
        config.input = Some(InputStrategy::TempFile);
    }
    if let Some(ms) = args.timeout_ms {
        config.timeout_ms = Some(ms);
    }

    let opts = &mut config.compiler;
    if args.style.is_some() {
        opts.style = args.style;
    }
    if args.precision.is_some() {
        opts.precision = args.precision;
    }
    if args.cache_location.is_some() {
        opts.cache_location = args.cache_location.clone();
    }
    opts.load_paths.extend(args.load_paths.iter().cloned());
    opts.unix_newlines |= args.unix_newlines;
    opts.quiet |= args.quiet;
    opts.debug_info |= args.debug_info;
    opts.line_numbers |= args.line_numbers;
    opts.source_map |= args.sourcemap;
    opts.no_cache |= args.no_cache;
    config
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let config = merge_args(load_config(args.config.as_deref())?, &args);
    config.validate()?;
    let filter = CompileFilter::from_config(&config);

    let mut asset = ScssAsset::from_path(&args.in_path)
        .with_context(|| format!("open stylesheet '{}'", args.in_path.display()))?;
    if let Some(out) = &args.out {
        asset.set_target_path(out.to_string_lossy().into_owned());
    }

    let css = asset
        .dump(Some(Arc::new(filter)))
        .with_context(|| format!("compile '{}'", args.in_path.display()))?
        .unwrap_or_default();

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, &css).with_context(|| format!("write css '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(css.as_bytes()).context("write css to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn cmd_which(args: WhichArgs) -> anyhow::Result<()> {
    let config = load_config(None)?;
    let bin_dir = args.bin_dir.or(config.bin_dir);
    let filter = CompileFilter::for_platform(bin_dir.as_deref(), HostPlatform::detect());
    println!("{}", filter.binary().display());
    Ok(())
}
