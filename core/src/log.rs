//! Logger initialization.
//!
//! Log lines always go to the console (stderr, keeping stdout free for command output). When a log directory is provided they are also written to a
//! rolling log file, warnings and errors additionally to a dedicated error file, and lines prefixed by
//! [`STATS_KEYWORD`] are diverted to a stats file where they are stored without the prefix.

mod appender;
mod consts;
mod logger;

pub use consts::*;
pub use logger::LogError;

use appender::{AppenderSpec, KeywordAppenderSpec};
use log::LevelFilter;
use log4rs::config::{Config, Root};
use logger::Builder;

const CONSOLE_APPENDER: &str = "console";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";
const STATS_LOG_FILE_APPENDER: &str = "stats_log_file";

/// Initializes the global logger with `filters` (`level,target=level,...`, merged over `RUST_LOG`).
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    log4rs::init_config(build_config(log_dir, filters)?)?;
    Ok(())
}

/// Tries to init a console-only logger. Subsequent calls are ignored, which makes it usable from tests.
pub fn try_init_logger(filters: &str) {
    if let Ok(config) = build_config(None, filters) {
        let _ = log4rs::init_config(config);
    }
}

fn build_config(log_dir: Option<&str>, filters: &str) -> Result<Config, LogError> {
    let loggers = Builder::new().root_level(LevelFilter::Info).parse_env(DEFAULT_LOGGER_ENV).parse_expression(filters).build();

    let mut appenders = vec![AppenderSpec::console(CONSOLE_APPENDER, None, STATS_KEYWORD)];
    let mut stats_appender = None;
    if let Some(log_dir) = log_dir {
        appenders.push(AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME, STATS_KEYWORD)?);
        appenders.push(AppenderSpec::roller(
            ERR_LOG_FILE_APPENDER,
            Some(LevelFilter::Warn),
            log_dir,
            ERR_LOG_FILE_NAME,
            STATS_KEYWORD,
        )?);
        stats_appender = Some(KeywordAppenderSpec::roller(STATS_LOG_FILE_APPENDER, STATS_KEYWORD, log_dir, STATS_LOG_FILE_NAME)?);
    }

    let names = appenders.iter().map(|x| x.name).chain(stats_appender.iter().map(|x| x.name)).collect::<Vec<_>>();
    let config = Config::builder()
        .appenders(appenders.into_iter().map(AppenderSpec::appender))
        .appenders(stats_appender.map(KeywordAppenderSpec::appender))
        .loggers(loggers.items())
        .build(Root::builder().appenders(names).build(loggers.root_level()))?;
    Ok(config)
}
