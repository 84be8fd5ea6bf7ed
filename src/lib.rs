#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod extract;
pub mod input;
pub mod logging;
pub mod nav;
pub mod pager;
pub mod storage;
pub mod thread;
pub mod ui;
pub mod v2ex;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
