//! taskman theme command implementation.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Theme;

pub struct ThemeOptions {
    pub value: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ThemeOutput {
    theme: String,
}

pub fn run(opts: ThemeOptions) -> Result<()> {
    let (_config, store) = super::task::load_context(opts.data_dir)?;
    let storage = store.storage();

    let theme = match opts.value.as_deref() {
        Some(raw) => {
            let theme = Theme::parse(raw)?;
            storage.save_theme(theme)?;
            theme
        }
        None => storage.load_theme(),
    };

    let header = match opts.value {
        Some(_) => format!("Theme set to {theme}"),
        None => format!("Theme is {theme}"),
    };
    let human = HumanOutput::new(header);

    emit_success(
        OutputOptions {
            json: opts.json,
            quiet: opts.quiet,
        },
        "theme",
        &ThemeOutput {
            theme: theme.to_string(),
        },
        Some(&human),
    )
}
