mod converter;
mod error;
mod output;
mod template;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use converter::{ConversionOutcome, OutputFormat, PandocConverter, StylePreset};
use std::io::Read;
use std::path::PathBuf;
use template::{get_preset, render_to_docx, StyleConfig, TemplatePreset};
use tracing::info;

#[derive(Parser)]
#[command(name = "docmill", version, about = "Convert documents with pandoc and generate .docx style templates")]
struct Cli {
    /// Path to the pandoc executable (overrides PANDOC_PATH and the
    /// platform defaults)
    #[arg(long, global = true)]
    pandoc: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a document file to another format
    Convert {
        input: PathBuf,

        /// Output file; defaults to the input path with the target extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target format used when no output path is given
        #[arg(long, value_enum, default_value_t = OutputFormat::Docx)]
        to: OutputFormat,

        /// Word reference document applied to .docx output
        #[arg(long)]
        reference_doc: Option<PathBuf>,
    },

    /// Convert pasted HTML (file or stdin) into a styled .docx
    Html {
        /// HTML file to read; stdin when omitted
        input: Option<PathBuf>,

        /// Style preset: simple, academic, business or technical.
        /// Unrecognized names fall back to simple.
        #[arg(long, default_value = "simple")]
        style: String,

        /// Label used in the generated output filename
        #[arg(long, default_value = "document")]
        label: String,

        /// Output file; defaults to <desktop>/<label>_<timestamp>.docx
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Work with .docx style templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Check whether pandoc can be found and executed
    Check,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Render a style configuration into a .docx template file
    Export {
        /// Named preset to start from
        #[arg(long, default_value = "default")]
        preset: String,

        /// JSON style configuration; takes precedence over --preset
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the built-in presets
    Presets,

    /// Print a preset's configuration as JSON
    Show {
        #[arg(default_value = "default")]
        preset: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmill=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut pandoc = PandocConverter::new();
    if let Some(path) = &cli.pandoc {
        pandoc = pandoc.with_pandoc_path(path);
    }

    match cli.command {
        Command::Convert {
            input,
            output,
            to,
            reference_doc,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(to.extension()));
            if let Some(ext) = output.extension().and_then(|e| e.to_str()) {
                if !converter::supports_extension(ext) {
                    tracing::warn!("output extension .{ext} is not a known pandoc format");
                }
            }
            let outcome = pandoc
                .convert_file(&input, &output, reference_doc.as_deref())
                .await;
            report(outcome)
        }

        Command::Html {
            input,
            style,
            label,
            output,
        } => {
            let html = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read stdin")?;
                    buffer
                }
            };
            if html.trim().is_empty() {
                bail!("no HTML content provided");
            }

            let output = output.unwrap_or_else(|| output::default_output_path(&label));
            let preset = StylePreset::from_name(&style);
            let outcome = pandoc.convert_html_to_docx(&html, &output, preset).await;
            report(outcome)
        }

        Command::Template(command) => run_template(command),

        Command::Check => {
            match pandoc.pandoc_path() {
                Some(path) => info!("pandoc resolved to {}", path.display()),
                None => bail!(
                    "pandoc could not be resolved; set PANDOC_PATH or pass --pandoc"
                ),
            }
            match pandoc.version().await {
                Some(version) => {
                    println!("{version}");
                    println!(
                        "supported formats: {}",
                        converter::supported_extensions().join(", ")
                    );
                    Ok(())
                }
                None => bail!("pandoc was found but could not be executed"),
            }
        }
    }
}

fn run_template(command: TemplateCommand) -> anyhow::Result<()> {
    match command {
        TemplateCommand::Export {
            preset,
            config,
            output,
        } => {
            let style_config = match config {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    StyleConfig::from_json(&json)?
                }
                None => get_preset(&preset),
            };

            let bytes = render_to_docx(&style_config)?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Template written to {}", output.display());
            Ok(())
        }

        TemplateCommand::Presets => {
            for preset in TemplatePreset::ALL {
                println!("{:<10} {}", preset.name(), preset.description());
            }
            Ok(())
        }

        TemplateCommand::Show { preset } => {
            let config = get_preset(&preset);
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn report(outcome: ConversionOutcome) -> anyhow::Result<()> {
    match outcome {
        ConversionOutcome::Success { message } => {
            println!("{message}");
            Ok(())
        }
        ConversionOutcome::Failure { diagnostic } => bail!("{diagnostic}"),
    }
}
