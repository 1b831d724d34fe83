use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use fdroid_repo_maint::app::App;
use fdroid_repo_maint::config::MirrorConfig;
use fdroid_repo_maint::error::MaintError;
use fdroid_repo_maint::icon;
use fdroid_repo_maint::index::IndexLoader;
use fdroid_repo_maint::mirror::MirrorHttpClient;
use fdroid_repo_maint::output::{JsonOutput, OutputMode};
use fdroid_repo_maint::store::RepoStore;

#[derive(Parser)]
#[command(name = "fdroid-maint")]
#[command(about = "Maintenance tooling for an F-Droid application repository")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true, help = "Print the operation result as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Render the repository icon SVG to a fixed-size PNG")]
    RenderIcon(RenderIconArgs),
    #[command(about = "Re-download APKs referenced by an index-v1 manifest")]
    Restore(RestoreArgs),
}

#[derive(Args)]
struct RenderIconArgs {
    #[arg(long, default_value = "docs/icon.svg")]
    svg: Utf8PathBuf,

    #[arg(long, default_value = "fdroid/repo/icons/icon.png")]
    out: Utf8PathBuf,

    #[arg(long, default_value_t = icon::ICON_SIZE)]
    size: u32,
}

#[derive(Args)]
struct RestoreArgs {
    #[arg(long, default_value = "/tmp/index-v1.json")]
    index: Utf8PathBuf,

    #[arg(long, default_value = "fdroid/repo")]
    repo_dir: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(maint) = report.downcast_ref::<MaintError>() {
            return ExitCode::from(map_exit_code(maint));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &MaintError) -> u8 {
    match error {
        MaintError::MissingRepoUrl(_) | MaintError::IndexRead(_) | MaintError::IndexParse(_) => 2,
        MaintError::MirrorHttp(_)
        | MaintError::MirrorStatus { .. }
        | MaintError::SvgParse(_)
        | MaintError::Render(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Silent
    };

    match cli.command {
        Commands::RenderIcon(args) => run_render_icon(args, output_mode),
        Commands::Restore(args) => run_restore(args, output_mode),
    }
}

fn run_render_icon(args: RenderIconArgs, output_mode: OutputMode) -> miette::Result<()> {
    let result = icon::render_png(args.svg.as_std_path(), args.out.as_std_path(), args.size)?;
    if let OutputMode::Json = output_mode {
        JsonOutput::print_render(&result).into_diagnostic()?;
    }
    Ok(())
}

fn run_restore(args: RestoreArgs, output_mode: OutputMode) -> miette::Result<()> {
    let config = MirrorConfig::from_env()?;
    let index = IndexLoader::load(args.index.as_std_path())?;
    let mirror = MirrorHttpClient::new(&config)?;
    let app = App::new(RepoStore::new(args.repo_dir), mirror);
    let result = app.restore(&index)?;
    if let OutputMode::Json = output_mode {
        JsonOutput::print_restore(&result).into_diagnostic()?;
    }
    Ok(())
}
