use anyhow::{Result, bail};
use clap::Parser;
use mcp_skill::install::{self, package_root};
use mcp_skill::launch;
use mcp_skill::release_notes::{DEFAULT_CHANGELOG, release_notes};
use mcp_skill::runtime::RealRuntime;
use std::path::PathBuf;

/// mcp-skill - installer and launcher for the mcp and skill binaries
///
/// Downloads the prebuilt binaries matching this machine from the project's
/// GitHub releases and runs them.
///
/// Set MCP_SKIP_DOWNLOAD=1 to disable downloading, and MCP_SKILL_RELEASE_REPO
/// to fetch from a different owner/repo.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package root; binaries live in <ROOT>/bin/native (also via MCP_SKILL_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "MCP_SKILL_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Release download host (defaults to https://github.com)
    #[arg(
        long = "download-url",
        env = "MCP_SKILL_DOWNLOAD_URL",
        value_name = "URL",
        global = true
    )]
    pub download_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download the binaries for this platform
    Install,

    /// Print the path of an installed binary
    Resolve(ResolveArgs),

    /// Run an installed binary, forwarding arguments and exit code
    Run(RunArgs),

    /// Print the CHANGELOG section for a version
    ReleaseNotes(ReleaseNotesArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Binary name, e.g. "mcp"
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Binary name, e.g. "skill"
    pub name: String,

    /// Arguments passed to the binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ReleaseNotesArgs {
    /// Version to extract, with or without a leading "v"
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Changelog to read
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CHANGELOG)]
    pub changelog: PathBuf,
}

async fn run(cli: Cli) -> Result<i32> {
    let runtime = RealRuntime;

    match cli.command {
        Commands::Install => install::install(runtime, cli.root, cli.download_url).await?,
        Commands::Resolve(args) => {
            let root = package_root(&runtime, cli.root)?;
            let path = launch::locate(&runtime, &root, &args.name)?;
            println!("{}", path.display());
        }
        Commands::Run(args) => {
            let root = package_root(&runtime, cli.root)?;
            return launch::run(&runtime, &root, &args.name, &args.args).await;
        }
        Commands::ReleaseNotes(args) => {
            let Some(version) = args.version else {
                bail!("usage: mcp-skill release-notes <version>");
            };
            print!("{}", release_notes(&runtime, &args.changelog, &version)?);
        }
    }
    Ok(0)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["mcp-skill", "install"]).unwrap();
        assert!(matches!(cli.command, Commands::Install));
        assert_eq!(cli.download_url, None);
    }

    #[test]
    fn test_cli_global_root_parsing() {
        let cli = Cli::try_parse_from(["mcp-skill", "--root", "/tmp/pkg", "install"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/pkg")));

        let cli = Cli::try_parse_from(["mcp-skill", "resolve", "mcp", "-r", "/tmp/pkg"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/pkg")));
    }

    #[test]
    fn test_cli_run_passes_hyphen_args() {
        let cli =
            Cli::try_parse_from(["mcp-skill", "run", "skill", "install", "--force", "-v"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.name, "skill");
                assert_eq!(args.args, vec!["install", "--force", "-v"]);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_release_notes_parsing() {
        let cli = Cli::try_parse_from(["mcp-skill", "release-notes", "v1.2.0"]).unwrap();
        match cli.command {
            Commands::ReleaseNotes(args) => {
                assert_eq!(args.version.as_deref(), Some("v1.2.0"));
                assert_eq!(args.changelog, PathBuf::from("CHANGELOG.md"));
            }
            _ => panic!("Expected ReleaseNotes command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["mcp-skill"]);
        assert!(result.is_err());
    }
}
