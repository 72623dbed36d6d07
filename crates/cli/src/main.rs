use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use xylent_model::{parse_override_value, Variant, XYLentConfig};
use xylent_tokenizer::{xylent, TokenizerOptions, XYLENT};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("xylent failed: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect XYLent configurations and tokenizers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Model configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Tokenizer commands
    #[command(subcommand)]
    Tokenizer(TokenizerCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print a configuration as JSON
    Show {
        #[command(flatten)]
        source: ConfigSource,
        #[arg(long, help = "Only print values that differ from the defaults")]
        diff: bool,
    },
    /// Write config.json into a directory
    Save {
        #[command(flatten)]
        source: ConfigSource,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConfigSource {
    #[arg(long, value_name = "PATH", help = "Configuration file or model directory")]
    from: Option<PathBuf>,

    #[arg(
        long,
        value_name = "NAME",
        conflicts_with = "from",
        help = "Published variant, e.g. xylent-base"
    )]
    variant: Option<String>,

    #[arg(
        long = "override",
        value_name = "KEY=VALUE",
        help = "Override a configuration value"
    )]
    overrides: Vec<OverrideArg>,
}

#[derive(Subcommand, Debug)]
enum TokenizerCommand {
    /// Print vocabulary files, locators and max input sizes
    Info,
    /// Encode text with a local tokenizer directory
    Encode {
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        #[arg(long, value_name = "NAME")]
        variant: Option<String>,
        text: String,
        #[arg(long, value_name = "TEXT")]
        pair: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct OverrideArg {
    key: String,
    value: Value,
}

impl FromStr for OverrideArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| "override must be in the form key=value".to_string())?;
        if key.trim().is_empty() {
            return Err("override key must not be empty".into());
        }
        Ok(Self {
            key: key.trim().to_string(),
            value: parse_override_value(value),
        })
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Config(ConfigCommand::Show { source, diff }) => {
            let config = load_config(&source)?;
            print!("{}", config.to_json_string(diff)?);
        }
        Command::Config(ConfigCommand::Save { source, out }) => {
            let config = load_config(&source)?;
            let path = config.save_pretrained(&out)?;
            println!("wrote {}", path.display());
        }
        Command::Tokenizer(TokenizerCommand::Info) => print_descriptor(),
        Command::Tokenizer(TokenizerCommand::Encode {
            dir,
            variant,
            text,
            pair,
        }) => {
            let variant = variant
                .as_deref()
                .map(Variant::from_str)
                .transpose()
                .context("invalid --variant")?;
            let tok = xylent::from_dir(&dir, variant, TokenizerOptions::default())?;
            let encoding = match pair.as_deref() {
                Some(second) => tok.encode_pair(&text, second)?,
                None => tok.encode(&text)?,
            };
            println!("tokens: {:?}", encoding.get_tokens());
            println!("ids: {:?}", encoding.get_ids());
        }
    }
    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<XYLentConfig> {
    let mut config = match (source.from.as_ref(), source.variant.as_deref()) {
        (Some(path), _) => XYLentConfig::from_pretrained(&path.to_string_lossy())
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        (None, Some(name)) => {
            let variant = Variant::from_str(name).context("invalid --variant")?;
            XYLentConfig::from_pretrained(variant.name())
                .with_context(|| format!("failed to load configuration for {variant}"))?
        }
        (None, None) => XYLentConfig::default(),
    };

    for override_arg in &source.overrides {
        config
            .set(&override_arg.key, override_arg.value.clone())
            .with_context(|| format!("failed to apply override '{}'", override_arg.key))?;
    }
    log::debug!("applied {} overrides", source.overrides.len());
    Ok(config)
}

fn print_descriptor() {
    println!("family: {}", XYLENT.family);
    println!("vocab files:");
    for file in XYLENT.vocab_files {
        let required = if file.required { "required" } else { "optional" };
        println!("  {} -> {} ({required})", file.key, file.file_name);
    }
    println!("pretrained vocab files:");
    for table in XYLENT.pretrained_vocab_files {
        for (variant, locator) in table.locators {
            println!("  {} [{variant}] -> {locator}", table.key);
        }
    }
    println!("max model input sizes:");
    for (variant, size) in XYLENT.max_model_input_sizes {
        println!("  {variant} -> {size}");
    }
}
