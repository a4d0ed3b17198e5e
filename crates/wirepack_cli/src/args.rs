use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
  /// Bundle once and write the assets to the output directory
  Build(BuildArgs),

  /// Bundle, serve over HTTP and rebuild on file changes
  Serve(ServeArgs),
}

#[derive(Args)]
pub struct BuildArgs {
  #[clap(flatten)]
  pub shared: SharedArgs,
}

#[derive(Args)]
pub struct ServeArgs {
  #[clap(flatten)]
  pub shared: SharedArgs,

  #[clap(long, short = 'p')]
  pub port: Option<u16>,

  #[clap(long)]
  pub host: Option<String>,
}

/// Flags override config-file values, which override built-in defaults.
#[derive(Args)]
pub struct SharedArgs {
  /// Config file (defaults to wirepack.config.json when present)
  #[clap(long, short = 'c')]
  pub config: Option<PathBuf>,

  #[clap(long)]
  pub cwd: Option<PathBuf>,

  #[clap(long, action = clap::ArgAction::Append)]
  pub entry: Option<Vec<String>>,

  #[clap(long, short = 'd')]
  pub dir: Option<String>,

  #[clap(long)]
  pub filename: Option<String>,
}
