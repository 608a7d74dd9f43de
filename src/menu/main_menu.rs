use crate::config::save::save_settings;
use crate::config::types::{ClipMode, Config, Language};
use crate::menu::handlers::run_highlight_extractor;
use crate::tools::ResolvedTools;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rust_i18n::t;

pub fn show_main_menu(term: &Term, tools: &ResolvedTools, config: &mut Config) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_extract"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_highlight_extractor(term, tools, config)?;
            Ok(true)
        }
        Some(1) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(2) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let highlight = &config.settings.highlight;
        println!(
            "\n{}",
            style(t!(
                "settings.current",
                pre = highlight.pre,
                post = highlight.post,
                mode = highlight.mode,
                recursive = highlight.recursive,
                name_with_ts = highlight.name_with_ts,
                reencode = highlight.reencode
            ))
            .dim()
        );
        println!();

        let options = vec![
            t!("settings.opt_offsets"),
            t!("settings.opt_mode"),
            t!("settings.opt_toggles"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_offsets_menu(config)?,
            Some(1) => show_mode_menu(term, config)?,
            Some(2) => show_toggles_menu(config)?,
            Some(3) => show_language_menu(term, config)?,
            Some(4) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 預設的 pre / post 秒數
fn show_offsets_menu(config: &mut Config) -> Result<()> {
    let pre: f64 = Input::new()
        .with_prompt(t!("extractor.pre_prompt"))
        .default(config.settings.highlight.pre)
        .validate_with(|v: &f64| {
            if *v >= 0.0 {
                Ok(())
            } else {
                Err(t!("settings.negative_offset").to_string())
            }
        })
        .interact_text()?;
    let post: f64 = Input::new()
        .with_prompt(t!("extractor.post_prompt"))
        .default(config.settings.highlight.post)
        .validate_with(|v: &f64| {
            if *v >= 0.0 {
                Ok(())
            } else {
                Err(t!("settings.negative_offset").to_string())
            }
        })
        .interact_text()?;

    config.settings.highlight.pre = pre;
    config.settings.highlight.post = post;
    save_and_notify(config)
}

/// 剪輯模式選單
fn show_mode_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.mode.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let modes = [ClipMode::Anchor, ClipMode::Chapter];
    let items: Vec<String> = vec![
        t!("settings.mode.anchor").to_string(),
        t!("settings.mode.chapter").to_string(),
    ];

    let default_index = modes
        .iter()
        .position(|&m| m == config.settings.highlight.mode)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.mode.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_mode = modes[selection];
    if selected_mode != config.settings.highlight.mode {
        config.settings.highlight.mode = selected_mode;
        save_and_notify(config)?;
    }

    Ok(())
}

fn show_toggles_menu(config: &mut Config) -> Result<()> {
    let highlight = &mut config.settings.highlight;
    highlight.recursive = Confirm::new()
        .with_prompt(t!("extractor.recursive_prompt"))
        .default(highlight.recursive)
        .interact()?;
    highlight.name_with_ts = Confirm::new()
        .with_prompt(t!("extractor.name_ts_prompt"))
        .default(highlight.name_with_ts)
        .interact()?;
    highlight.reencode = Confirm::new()
        .with_prompt(t!("extractor.reencode_prompt"))
        .default(highlight.reencode)
        .interact()?;

    save_and_notify(config)
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];
    let items: Vec<String> = languages.iter().map(ToString::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];
    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_and_notify(config)?;
    }

    Ok(())
}

fn save_and_notify(config: &Config) -> Result<()> {
    save_settings(&config.settings)?;
    println!("\n{}", style(t!("settings.saved")).green());
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(())
}
