use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ftbq_advancements::{ConvertOptions, DEFAULT_NAMESPACE, convert_file, write_all};
use log::info;
use std::path::PathBuf;

/// Convert an FTB Quests chapter (SNBT) into advancement JSON files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Chapter file to convert
    input: PathBuf,

    /// Namespace used for `parent` references
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Directory the advancement files are written to
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Fail on duplicate quest ids or quests sharing an output filename
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = ConvertOptions {
        namespace: cli.namespace,
        strict: cli.strict,
    };
    info!("converting {}", cli.input.display());
    let generated = convert_file(&cli.input, &options)
        .with_context(|| format!("while converting {}", cli.input.display()))?;

    for item in generated.iter().filter(|g| !g.errors.is_empty()) {
        let id = item
            .quest_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        println!(
            "{}",
            format!(
                "FTB Quest with ID {id} (in {}.json) has validation errors. \
                 Still creating advancement but requires manual verification",
                item.filename
            )
            .yellow()
        );
        for err in &item.errors {
            println!("  {}", err.to_string().yellow());
        }
    }

    let written = write_all(&cli.out, &generated)
        .with_context(|| format!("while writing to {}", cli.out.display()))?;
    info!("wrote {} advancements to {}", written.len(), cli.out.display());
    Ok(())
}
