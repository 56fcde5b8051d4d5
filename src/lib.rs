pub mod app;
pub mod app_dirs;
pub mod config;
pub mod runtime;
pub mod shift;
pub mod timer;
pub mod todo;
pub mod ui;

pub use app::{App, Control, Focus};
