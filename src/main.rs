//! compdoc — generate Markdown documentation from CI/CD component files.
//!
//! Scans a directory of component definition files, assembles a
//! documentation model from their inputs and jobs, renders it through a
//! template, and either writes the result or verifies an existing file
//! against it (check mode).
//!
//! Exit codes: 0 on success, 1 for any fatal error (bad arguments, no
//! component files, parse failure, template failure, I/O failure), 2 when
//! check mode detects drift, 3 when check mode finds no documentation file.

mod assemble;
mod check;
mod comments;
mod fs;
mod model;
mod parser;
mod render;
mod strip;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "compdoc",
    about = "Generate Markdown documentation from CI/CD component files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate documentation from a directory of component files
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Repository URL from which the components are included; used in the
    /// generated usage snippets
    #[arg(short = 'r', long = "repoUrl")]
    repo_url: String,

    /// Version or ref of the components, used in the usage snippets
    #[arg(short = 'v', long = "version", default_value = "latest")]
    version: String,

    /// Directory containing the component files
    #[arg(short = 'd', long = "componentDir", default_value = "templates")]
    component_dir: PathBuf,

    /// Template the documentation is generated from; "default" selects the
    /// bundled template
    #[arg(short = 't', long = "template", default_value = render::DEFAULT_TEMPLATE)]
    template: String,

    /// Path of the rendered documentation file
    #[arg(short = 'o', long = "outputFile", default_value = "templates/README.md")]
    output_file: PathBuf,

    /// Check whether the documentation is up-to-date instead of writing it;
    /// exits 2 on drift and 3 when the documentation does not exist
    #[arg(short = 'c', long = "check")]
    check: bool,
}

fn main() -> ExitCode {
    init_logging();

    // clap's default usage-error status is 2, which is reserved for
    // check-mode drift here; argument errors exit 1 like every other
    // fatal error. Help output still exits 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1u8 } else { 0u8 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    let Commands::Generate(args) = cli.command;

    match generate(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    tracing::info!("generating documentation");
    let filesystem = fs::OsFilesystem;

    let documentation = assemble::assemble_documentation(
        &filesystem,
        &args.component_dir,
        &args.repo_url,
        &args.version,
    )?;
    let template = render::load_template(&filesystem, &args.template)?;
    let content = render::render_documentation(&documentation, &template)?;

    if args.check {
        check::check_documentation(&filesystem, &args.output_file, &content)
    } else {
        check::write_documentation(&filesystem, &args.output_file, &content)
    }
}

/// Exit-code contract: 1 for any fatal error, 2 for check-mode drift,
/// 3 for a missing documentation file in check mode.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<check::CheckError>() {
        Some(check::CheckError::Outdated) => 2,
        Some(check::CheckError::Missing { .. }) => 3,
        None => 1,
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
