pub mod api_state;
mod app;
pub mod commands;
pub mod credits;
pub mod hooks;
pub mod logging;
pub mod shell;

pub use app::App;
