use anyhow::Result;

mod app;
mod input;
mod view;
mod views;

use view::{View, render_view_chrome};

pub fn run_with_options(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
