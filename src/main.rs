//! ftabs - drive a form-tabs panel from the command line
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use form_tabs::{run_headless, HeadlessOptions};
use form_tabs_app::config::{config_path, init_config_dir, load_settings};
use form_tabs_core::{logging, Error};

/// ftabs - conditional tab panels, driven by NDJSON events
#[derive(Parser, Debug)]
#[command(name = "ftabs")]
#[command(about = "Mount a tab panel and replay form events against it", long_about = None)]
struct Args {
    /// JSON file with the panel's field descriptors or a tab group
    #[arg(value_name = "FIELDS", required_unless_present = "init")]
    fields: Option<PathBuf>,

    /// Id of the edited resource (omit to simulate a create form)
    #[arg(long)]
    resource_id: Option<String>,

    /// Initial location fragment, e.g. "panel1=b&panel2=c"
    #[arg(long)]
    fragment: Option<String>,

    /// Page path the panel is mounted on
    #[arg(long, default_value = "/resources/items/1")]
    path: String,

    /// Directory containing .form-tabs/config.toml (defaults to cwd)
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// NDJSON command file (defaults to stdin)
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Write a default .form-tabs/config.toml and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_dir = args
        .config
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    if !config_dir.is_dir() {
        return Err(Error::ConfigNotFound { path: config_dir }.into());
    }

    if args.init {
        init_config_dir(&config_dir)?;
        eprintln!("Config written to {}", config_path(&config_dir).display());
        return Ok(());
    }

    let settings = load_settings(&config_dir);
    logging::init_with_default(&settings.log.filter)?;

    let Some(fields) = args.fields else {
        return Err(Error::config("no field descriptor file given").into());
    };
    let options = HeadlessOptions {
        fields,
        resource_id: args.resource_id,
        fragment: args.fragment,
        path: args.path,
        events: args.events,
    };

    run_headless(options, settings).await?;
    Ok(())
}
