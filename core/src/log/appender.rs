use super::{
    consts::{LOG_ARCHIVE_SUFFIX, LOG_FILE_BASE_ROLLS, LOG_FILE_MAX_ROLLS, LOG_FILE_MAX_SIZE, LOG_LINE_PATTERN, LOG_LINE_PATTERN_COLORED},
    LogError,
};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
        Append,
    },
    config::Appender,
    encode::{pattern::PatternEncoder, Encode},
    filter::{threshold::ThresholdFilter, Filter, Response},
};
use std::path::PathBuf;

pub(super) struct AppenderSpec {
    pub name: &'static str,
    level: Option<LevelFilter>,
    append: Box<dyn Append>,
    stats_keyword: &'static str,
}

impl AppenderSpec {
    pub fn console(name: &'static str, level: Option<LevelFilter>, stats_keyword: &'static str) -> Self {
        let append = Box::new(
            ConsoleAppender::builder().target(Target::Stderr).encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN_COLORED))).build(),
        );
        Self { name, level, append, stats_keyword }
    }

    pub fn roller(
        name: &'static str,
        level: Option<LevelFilter>,
        log_dir: &str,
        file_name: &str,
        stats_keyword: &'static str,
    ) -> Result<Self, LogError> {
        let append = rolling_file(log_dir, file_name, Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))?;
        Ok(Self { name, level, append, stats_keyword })
    }

    pub fn appender(self) -> Appender {
        Appender::builder()
            .filters(
                std::iter::once(KeywordFilter::new(self.stats_keyword, true))
                    .chain(self.level.map(|x| Box::new(ThresholdFilter::new(x)) as Box<dyn Filter>)),
            )
            .build(self.name, self.append)
    }
}

/// Appender writing only the lines prefixed by a keyword, with the keyword stripped
pub(super) struct KeywordAppenderSpec {
    pub name: &'static str,
    keyword: &'static str,
    append: Box<dyn Append>,
}

impl KeywordAppenderSpec {
    pub fn roller(name: &'static str, keyword: &'static str, log_dir: &str, file_name: &str) -> Result<Self, LogError> {
        let append = rolling_file(log_dir, file_name, Box::new(KeywordEncoder::new(keyword)))?;
        Ok(Self { name, keyword, append })
    }

    pub fn appender(self) -> Appender {
        Appender::builder().filter(KeywordFilter::new(self.keyword, false)).build(self.name, self.append)
    }
}

fn rolling_file(log_dir: &str, file_name: &str, encoder: Box<dyn Encode>) -> Result<Box<dyn Append>, LogError> {
    let trigger = Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE));

    let file_path = PathBuf::from(log_dir).join(file_name);
    let roller_pattern = PathBuf::from(log_dir).join(format!("{}{}", file_name, LOG_ARCHIVE_SUFFIX));
    let roller_pattern = roller_pattern.to_str().ok_or_else(|| LogError::Appender(format!("invalid log path {:?}", roller_pattern)))?;
    let roller = Box::new(
        FixedWindowRoller::builder()
            .base(LOG_FILE_BASE_ROLLS)
            .build(roller_pattern, LOG_FILE_MAX_ROLLS)
            .map_err(|err| LogError::Appender(err.to_string()))?,
    );

    let compound_policy = Box::new(CompoundPolicy::new(trigger, roller));
    let file_appender = RollingFileAppender::builder()
        .encoder(encoder)
        .build(file_path, compound_policy)
        .map_err(|err| LogError::Appender(err.to_string()))?;

    Ok(Box::new(file_appender))
}

#[derive(Debug)]
pub(super) struct KeywordFilter {
    pub keyword: &'static str,
    pub exclude: bool,
}

impl KeywordFilter {
    #[allow(clippy::new_ret_no_self)]
    pub(super) fn new(keyword: &'static str, exclude: bool) -> Box<dyn Filter> {
        Box::new(Self { keyword, exclude })
    }

    fn response(&self, line: &str) -> Response {
        match (line.starts_with(self.keyword), self.exclude) {
            (true, true) => Response::Reject,
            (true, false) => Response::Neutral,
            (false, true) => Response::Neutral,
            (false, false) => Response::Reject,
        }
    }
}

impl Filter for KeywordFilter {
    fn filter(&self, record: &log::Record) -> Response {
        self.response(&record.args().to_string())
    }
}

#[derive(Debug)]
pub(super) struct KeywordEncoder {
    pub keyword: &'static str,
}

impl KeywordEncoder {
    pub(super) fn new(keyword: &'static str) -> Self {
        Self { keyword }
    }

    fn strip<'a>(&self, line: &'a str) -> &'a str {
        line.strip_prefix(self.keyword).unwrap_or(line)
    }
}

impl Encode for KeywordEncoder {
    fn encode(&self, w: &mut dyn log4rs::encode::Write, record: &log::Record) -> anyhow::Result<()> {
        let line = record.args().to_string();
        w.write_all(self.strip(&line).as_bytes())?;
        w.write_all("\n".as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_filter_routing() {
        let exclude = KeywordFilter { keyword: "accel_stats", exclude: true };
        let include = KeywordFilter { keyword: "accel_stats", exclude: false };

        assert!(matches!(exclude.response("accel_stats, 3, 2"), Response::Reject));
        assert!(matches!(exclude.response("Acceleration stats: 3 active"), Response::Neutral));
        assert!(matches!(include.response("accel_stats, 3, 2"), Response::Neutral));
        assert!(matches!(include.response("Acceleration stats: 3 active"), Response::Reject));
        // Only a prefix counts as a keyword hit
        assert!(matches!(include.response("see accel_stats"), Response::Reject));
    }

    #[test]
    fn test_keyword_encoder_strips_prefix() {
        let encoder = KeywordEncoder::new("accel_stats");
        assert_eq!(encoder.strip("accel_stats, 1, 2"), ", 1, 2");
        assert_eq!(encoder.strip("plain line"), "plain line");
    }
}
