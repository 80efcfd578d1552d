use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use labelgrid::config::{Cli, RunConfig};
use labelgrid::error_codes::{exit_code_for, find_coded_error};
use labelgrid::font_locator::SystemFontLocator;
use labelgrid::pipeline::{locator_for, run};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            eprintln!("error: {error:#}");
            if let Some(coded) = find_coded_error(&error) {
                if let Ok(envelope) = serde_json::to_string(&coded.envelope()) {
                    eprintln!("{envelope}");
                }
            }
            exit_code_for(&error)
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    if cli.list_fonts {
        return run_list_fonts();
    }

    let config = RunConfig::from_cli(cli)?;
    let locator = locator_for(&config);
    let summary = run(&config, locator.as_ref())?;

    println!(
        "Wrote {} ({} images, {} skipped)",
        config.output_json.display(),
        summary.entries.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn run_list_fonts() -> Result<()> {
    let locator = SystemFontLocator::new();
    let fonts = locator.list_fonts();
    for font in &fonts {
        println!(
            "{}\t{}",
            font.full_name.as_deref().unwrap_or("-"),
            font.path.display()
        );
    }
    log::info!(
        "{} fonts under {} directories",
        fonts.len(),
        locator.roots().len()
    );
    Ok(())
}
