use anyhow::Result;

use crate::remote::ClientConfig;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub client: ClientConfig,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
