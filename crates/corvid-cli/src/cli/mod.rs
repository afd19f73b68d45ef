//! Command-line interface definition.

mod commands;

pub use commands::{BuildArgs, Command, DevArgs, ServeArgs};

use clap::Parser;

/// Corvid - Swift to WebAssembly development tool
#[derive(Debug, Parser)]
#[command(name = "corvid")]
#[command(version)]
#[command(about = "Build, serve, and hot-reload Swift WebAssembly apps")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["corvid", "build"]);
        assert!(matches!(cli.command, Command::Build(_)));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_build_release_flags() {
        let cli = Cli::parse_from(["corvid", "build", "-r", "-O"]);
        match cli.command {
            Command::Build(args) => {
                assert!(args.release);
                assert!(args.optimize_size);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_parse_dev_defaults() {
        let cli = Cli::parse_from(["corvid", "dev"]);
        match cli.command {
            Command::Dev(args) => {
                assert_eq!(args.port, 8000);
                assert!(!args.no_browser);
                assert!(!args.no_initial_build);
            }
            _ => panic!("expected dev command"),
        }
    }

    #[test]
    fn test_parse_dev_overrides() {
        let cli = Cli::parse_from(["corvid", "dev", "-p", "3000", "--no-browser"]);
        match cli.command {
            Command::Dev(args) => {
                assert_eq!(args.port, 3000);
                assert!(args.no_browser);
            }
            _ => panic!("expected dev command"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["corvid", "serve", "--port", "9090"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, 9090);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["corvid", "-v", "-q", "build"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["corvid", "build", "--verbose"]);
        assert!(cli.verbose);
    }
}
