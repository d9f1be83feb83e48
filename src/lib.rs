pub mod error;
pub mod logging;
pub mod projection;
pub mod remote;
pub mod session;
pub mod tui;

mod tui_shell;
