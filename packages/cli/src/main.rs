mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    assets, check, export, import, list, preview, AssetsArgs, CheckArgs, ExportArgs, ImportArgs, ListArgs,
    PreviewArgs,
};
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - preview, check and move email templates
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template to standalone HTML
    Preview(PreviewArgs),

    /// Validate templates
    Check(CheckArgs),

    /// Store a JSON document as a new template
    Import(ImportArgs),

    /// Print a stored template's document
    Export(ExportArgs),

    /// List stored templates
    List(ListArgs),

    /// Manage the image gallery
    Assets(AssetsArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MAILCRAFT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Preview(args) => preview(args, &cwd).await,
        Command::Check(args) => check(args, &cwd).await,
        Command::Import(args) => import(args, &cwd).await,
        Command::Export(args) => export(args, &cwd).await,
        Command::List(args) => list(args, &cwd).await,
        Command::Assets(args) => assets(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_with_categories() {
        let cli = Cli::try_parse_from([
            "mailcraft", "import", "doc.json", "--name", "Hello", "-c", "news", "-c", "promo",
        ])
        .unwrap();
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.name, "Hello");
                assert_eq!(args.categories, vec!["news", "promo"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_assets_upload() {
        let cli = Cli::try_parse_from(["mailcraft", "-v", "assets", "upload", "a.png", "b.png"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Assets(AssetsArgs {
                command: commands::assets::AssetsCommand::Upload { ref files }
            }) if files.len() == 2
        ));
    }
}
