#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod normalize;
pub mod scrape;
pub mod server;
pub mod thread;
pub mod validate;
