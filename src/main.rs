use anyhow::{Context, Result};
use blockconv::loader::{collect_metadata_files, load_metadata};
use blockconv::{ConversionConfig, ExtensionHost, IconCheck, RecordingBus};
use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert block extension metadata into block JSON and toolbox XML", long_about = None)]
struct Cli {
    /// Extension metadata JSON files, or directories to search for them
    #[arg(value_name = "EXTENSION_JSON", required = true)]
    inputs: Vec<Utf8PathBuf>,

    /// Accept placeholders without arguments and unused or undeclared argument types
    #[arg(long)]
    lenient: bool,

    /// When a block icon gets the compatibility flag: always, data-uri or never
    #[arg(long, value_name = "MODE", default_value = "always")]
    icon_check: IconCheck,

    /// Image source of the loop arrow
    #[arg(long, value_name = "SRC")]
    loop_arrow_src: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let mut config = if cli.lenient {
        ConversionConfig::lenient()
    } else {
        ConversionConfig::default()
    };
    config.icon_check = cli.icon_check;
    if let Some(src) = cli.loop_arrow_src {
        config.loop_arrow_src = src;
    }

    let files = collect_metadata_files(&cli.inputs)?;
    let mut host = ExtensionHost::new(RecordingBus::new()).with_config(config);
    for path in &files {
        let meta = load_metadata(path)?;
        host.register_extension(&meta)
            .with_context(|| format!("Failed to convert extension {} from {}", meta.id, path))?;
    }

    let events = &host.bus().events;
    let json = if cli.pretty {
        serde_json::to_string_pretty(events)?
    } else {
        serde_json::to_string(events)?
    };
    println!("{}", json);
    Ok(())
}
