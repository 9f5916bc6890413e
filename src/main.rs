use anyhow::Result;
use clap::Parser;
use log::debug;
use pkgfeed::commands::{self, config::Config};
use pkgfeed::source::SearchFilter;
use pkgfeed::trace::TracingSink;
use semver::Version;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// pkgfeed - query package sources
///
/// Search a package directory or a remote JSON feed and print package
/// metadata as JSON-LD.
///
/// Examples:
///   pkgfeed search json                       # Search the default package directory
///   pkgfeed --source https://feed.example.com show Foo 1.0.0
///   pkgfeed --source ./packages versions Foo
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGFEED_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package directory or feed URL (also via PKGFEED_SOURCE)
    #[arg(
        long = "source",
        short = 's',
        env = "PKGFEED_SOURCE",
        value_name = "DIR|URL",
        global = true
    )]
    pub source: Option<String>,

    /// Maximum number of search results resolved at the same time
    #[arg(long = "concurrency", value_name = "N", global = true)]
    pub concurrency: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search packages by id, title, description or tags
    Search(SearchArgs),

    /// Show one package version
    Show(ShowArgs),

    /// Show every version of a package
    Versions(VersionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search term; empty matches every package
    #[arg(value_name = "TERM", default_value = "")]
    pub term: String,

    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Maximum number of results
    #[arg(long, default_value_t = 20)]
    pub take: usize,

    /// Include prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Only show packages supporting this framework (repeatable)
    #[arg(long = "framework", value_name = "FX")]
    pub frameworks: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Package id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Exact package version
    #[arg(value_name = "VERSION")]
    pub version: Version,
}

#[derive(clap::Args, Debug)]
pub struct VersionsArgs {
    /// Package id
    #[arg(value_name = "ID")]
    pub id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = pkgfeed::runtime::RealRuntime;

    let config = Config::new(runtime, cli.source, cli.concurrency)?;
    let trace = Arc::new(TracingSink::new(config.source.name.clone()));
    let source = config.into_source(trace)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Search(args) => {
            let filter = args
                .frameworks
                .into_iter()
                .fold(SearchFilter::new(args.prerelease), SearchFilter::framework);
            commands::search(
                &source,
                &args.term,
                &filter,
                args.skip,
                args.take,
                &cancel,
                &mut out,
            )
            .await?
        }
        Commands::Show(args) => commands::show(&source, &args.id, &args.version, &mut out).await?,
        Commands::Versions(args) => commands::versions(&source, &args.id, &mut out).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_search_parsing() {
        let cli = Cli::try_parse_from([
            "pkgfeed",
            "search",
            "json",
            "--skip",
            "5",
            "--take",
            "10",
            "--prerelease",
            "--framework",
            "net45",
            "--framework",
            "netstandard2.0",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.term, "json");
                assert_eq!(args.skip, 5);
                assert_eq!(args.take, 10);
                assert!(args.prerelease);
                assert_eq!(args.frameworks, vec!["net45", "netstandard2.0"]);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_search_defaults() {
        let cli = Cli::try_parse_from(["pkgfeed", "search"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.term, "");
                assert_eq!(args.skip, 0);
                assert_eq!(args.take, 20);
                assert!(!args.prerelease);
                assert!(args.frameworks.is_empty());
            }
            _ => panic!("Expected Search command"),
        }
        assert_eq!(cli.concurrency, None);
    }

    #[test]
    fn test_cli_show_parsing() {
        let cli = Cli::try_parse_from(["pkgfeed", "show", "Foo", "1.0.0-beta.1"]).unwrap();
        match cli.command {
            Commands::Show(args) => {
                assert_eq!(args.id, "Foo");
                assert_eq!(args.version, Version::parse("1.0.0-beta.1").unwrap());
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_show_rejects_bad_version() {
        assert!(Cli::try_parse_from(["pkgfeed", "show", "Foo", "latest"]).is_err());
    }

    #[test]
    fn test_cli_global_options_parsing() {
        let cli = Cli::try_parse_from([
            "pkgfeed",
            "versions",
            "Foo",
            "--source",
            "/tmp/packages",
            "--concurrency",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.source.as_deref(), Some("/tmp/packages"));
        assert_eq!(cli.concurrency, Some(3));
        match cli.command {
            Commands::Versions(args) => assert_eq!(args.id, "Foo"),
            _ => panic!("Expected Versions command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["pkgfeed"]).is_err());
    }
}
