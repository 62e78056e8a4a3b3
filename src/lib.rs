pub mod cli;
pub mod load_config;
pub mod logging;
pub mod oauth;
pub mod twitter;
