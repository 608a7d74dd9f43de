use crate::component::HighlightExtractor;
use crate::config::Config;
use crate::pause;
use crate::tools::ResolvedTools;
use anyhow::Result;
use console::{Term, style};
use log::error;
use rust_i18n::t;

pub fn run_highlight_extractor(
    term: &Term,
    tools: &ResolvedTools,
    config: &mut Config,
) -> Result<()> {
    let mut extractor = HighlightExtractor::new(config, tools.clone());

    if let Err(e) = extractor.run() {
        error!("精華擷取失敗: {e:#}");
        eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
