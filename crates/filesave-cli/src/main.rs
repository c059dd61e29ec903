use anyhow::{Context, Result};
use clap::Parser;
use filesave_config::Config;
use filesave_engine::{FileSaver, SaveOutcome, WriterConfig};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

/// Write a text file to the storage this platform uses.
#[derive(Debug, Parser)]
#[command(name = "filesave", version)]
struct Cli {
    /// Config file to use instead of ~/.config/filesave/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write to shared external storage (mobile only)
    #[arg(long, conflicts_with = "internal")]
    external: bool,

    /// Write to app-private storage (mobile only)
    #[arg(long)]
    internal: bool,

    /// Directory to write into, relative to the working directory unless absolute
    #[arg(short, long)]
    dir: Option<String>,

    /// Name of the file to write
    filename: String,

    /// Text to write; read from stdin when omitted
    content: Option<String>,
}

impl Cli {
    fn writer_config(&self, config: &Config) -> WriterConfig {
        let mut writer = config.writer_config();
        if self.external {
            writer.external_mode = true;
        } else if self.internal {
            writer.external_mode = false;
        }
        writer
    }

    fn directory(&self, config: &Config) -> String {
        match (&self.dir, &config.output_dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir.to_string_lossy().into_owned(),
            (None, None) => String::new(),
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let saver = FileSaver::new(cli.writer_config(&config));
    let directory = cli.directory(&config);

    let content = match &cli.content {
        Some(content) => content.clone(),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read content from stdin")?;
            content
        }
    };

    log::debug!("Using {:?} storage", saver.strategy(None));
    let outcome = saver
        .save(None, &directory, &cli.filename, &content)
        .with_context(|| format!("Failed to save {}", cli.filename))?;

    match outcome {
        SaveOutcome::File(path) => println!("{}", path.display()),
        SaveOutcome::Content(uri) => println!("{uri}"),
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    match &config {
        Some(_) => log::debug!("Loaded config"),
        None => log::debug!("No config file found, using defaults"),
    }
    Ok(config.unwrap_or_default())
}
