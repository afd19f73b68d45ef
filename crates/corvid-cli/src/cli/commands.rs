//! Subcommands and their arguments.

use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile the app to WebAssembly once
    Build(BuildArgs),

    /// Watch sources, rebuild on change, and serve with hot reload
    Dev(DevArgs),

    /// Serve the public directory without watching or rebuilding
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build with the release profile
    #[arg(short, long)]
    pub release: bool,

    /// Optimize the binary for size
    #[arg(short = 'O', long)]
    pub optimize_size: bool,
}

#[derive(Debug, Args)]
pub struct DevArgs {
    /// Port for the development server
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Don't open the browser automatically
    #[arg(long)]
    pub no_browser: bool,

    /// Skip the build normally run before watching starts
    #[arg(long)]
    pub no_initial_build: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port for the server
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Don't open the browser automatically
    #[arg(long)]
    pub no_browser: bool,
}
