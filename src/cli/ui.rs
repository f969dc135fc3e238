//! taskman ui command: hands the store to the interactive viewer.

use std::path::PathBuf;

use crate::error::Result;

pub struct UiOptions {
    pub data_dir: Option<PathBuf>,
}

pub fn run(opts: UiOptions) -> Result<()> {
    let (config, store) = super::task::load_context(opts.data_dir)?;
    crate::ui::viewer::run(store, &config)
}
