mod args;

use std::path::PathBuf;
use std::time::Instant;

use ansi_term::Colour;
use anyhow::Context;
use clap::Parser;

use args::{BuildArgs, Cli, Command, ServeArgs, SharedArgs};
use wirepack::{Bundler, BundlerOptions, OutputAsset};
use wirepack_devserver::{DevServer, DevServerConfig};

const DEFAULT_CONFIG: &str = "wirepack.config.json";

#[tokio::main]
async fn main() {
  init_tracing();

  let cli = Cli::parse();
  let result = match cli.command {
    Command::Build(args) => build(args),
    Command::Serve(args) => serve(args).await,
  };

  if let Err(error) = result {
    println!("{} {}", Colour::Red.paint("Error:"), error);
    std::process::exit(1);
  }
}

fn init_tracing() {
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
  let options = load_options(&args.shared)?;
  let mut bundler = Bundler::new(options)?;
  let dir = bundler.options().dir.to_string_lossy().into_owned();

  let start = Instant::now();
  let output = bundler.write()?;

  for warning in &output.warnings {
    println!("{} {}", Colour::Yellow.paint("Warning:"), warning);
  }

  print_output_assets(&dir, output.assets);

  let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
  println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));

  Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
  let mut options = load_options(&args.shared)?;

  let dev_server = options.dev_server.get_or_insert_with(Default::default);
  if let Some(port) = args.port {
    dev_server.port = Some(port);
  }
  if let Some(host) = args.host {
    dev_server.host = Some(host);
  }

  let bundler = Bundler::new(options)?;
  let config = DevServerConfig::from_options(bundler.options());

  DevServer::new(bundler, config).serve().await
}

fn load_options(args: &SharedArgs) -> anyhow::Result<BundlerOptions> {
  let explicit = args.config.is_some();
  let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

  let mut options = if config_path.is_file() {
    let raw = std::fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read {}", config_path.display()))?;
    serde_json::from_str(&raw)
      .with_context(|| format!("Failed to parse {}", config_path.display()))?
  } else if explicit {
    anyhow::bail!("Config file not found: {}", config_path.display());
  } else {
    BundlerOptions::default()
  };

  apply_overrides(&mut options, args);
  Ok(options)
}

fn apply_overrides(options: &mut BundlerOptions, args: &SharedArgs) {
  if let Some(cwd) = &args.cwd {
    options.cwd = Some(cwd.clone());
  }
  if let Some(entry) = &args.entry {
    options.entry = Some(entry.iter().map(|import| import.as_str().into()).collect());
  }
  if args.dir.is_some() || args.filename.is_some() {
    let output = options.output.get_or_insert_with(Default::default);
    if let Some(dir) = &args.dir {
      output.path = Some(dir.into());
    }
    if let Some(filename) = &args.filename {
      output.filename = Some(filename.clone());
    }
  }
}

fn print_output_assets(dir: &str, outputs: Vec<OutputAsset>) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    let size = format!("{:.2}", output.content.len() as f64 / 1024.0);

    if size.len() > right {
      right = size.len();
    }

    if output.filename.len() > left {
      left = output.filename.len()
    }

    let is_chunk = output.filename.ends_with(".js");
    assets.push((output.filename, size, is_chunk));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size, is_chunk) in assets {
    let asset_type = if is_chunk { "chunk" } else { "asset" };
    let filename_len = filename.len();

    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint(format!("{dir}/")),
      color.paint(filename),
      "",
      dim.paint(asset_type),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename_len,
      right = right - size.len()
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_config_values() {
    let mut options = BundlerOptions {
      entry: Some(vec!["./src/old.js".into()]),
      ..BundlerOptions::default()
    };

    let args = SharedArgs {
      config: None,
      cwd: None,
      entry: Some(vec!["./src/new.js".to_string()]),
      dir: Some("build".to_string()),
      filename: None,
    };

    apply_overrides(&mut options, &args);

    assert_eq!(options.entry.unwrap()[0].import, "./src/new.js");
    assert_eq!(options.output.unwrap().path.unwrap(), PathBuf::from("build"));
  }

  #[test]
  fn missing_explicit_config_is_an_error() {
    let args = SharedArgs {
      config: Some(PathBuf::from("/definitely/not/here.json")),
      cwd: None,
      entry: None,
      dir: None,
      filename: None,
    };

    assert!(load_options(&args).is_err());
  }
}
