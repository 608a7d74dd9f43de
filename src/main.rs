use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use gopro_highlight::cli::{self, Cli};
use gopro_highlight::config::types::Config;
use gopro_highlight::error::HighlightError;
use gopro_highlight::init;
use gopro_highlight::menu::show_main_menu;
use gopro_highlight::tools::{ResolvedTools, SystemToolResolver};
use log::{info, warn};
use std::process::ExitCode;

fn main() -> ExitCode {
    init::init();
    let args = Cli::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("Program error: {e:#}");
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            let code = e
                .downcast_ref::<HighlightError>()
                .map_or(1, HighlightError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(args: &Cli) -> Result<()> {
    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    let resolver = SystemToolResolver::default();

    if let Some(input) = &args.input {
        cli::run(args, input, &resolver, &config)?;
        return Ok(());
    }

    // 互動模式：先確認外部工具存在
    let tools = ResolvedTools::resolve(&resolver)?;
    let term = Term::stdout();

    loop {
        match show_main_menu(&term, &tools, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                info!("Program exited normally");
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
