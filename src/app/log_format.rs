use colog::format::CologStyle;
use colored::Colorize;
use log::{Level, LevelFilter};

/// Prefixes every line with the local time, so long editing sessions can be
/// matched against backend logs.
pub struct LogTimePrefix;

impl CologStyle for LogTimePrefix {
    fn prefix_token(&self, level: &Level) -> String {
        format!(
            "[{}] {}",
            chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .blue()
                .bold(),
            self.level_color(level, self.level_token(level))
        )
    }
}

/// Install the logger. `RUST_LOG` overrides the default level.
pub fn init(default_level: LevelFilter) {
    let mut builder = colog::default_builder();
    builder
        .format(colog::formatter(LogTimePrefix))
        .filter_level(default_level)
        .parse_default_env()
        .init();
}
