use std::time::Duration;

pub const DEFAULT_THREAD_NAME: &str = "nexus-timer";

/// Deadline offset used when `now + duration` is not representable, e.g. for `Duration::MAX`.
pub const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Settings for the background thread of a [`Timer`](crate::Timer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
  pub thread_name: String,
  pub stack_size: Option<usize>,
}

impl Default for TimerConfig {
  fn default() -> Self {
    TimerConfig {
      thread_name: DEFAULT_THREAD_NAME.to_string(),
      stack_size: None,
    }
  }
}

impl TimerConfig {
  pub fn from(options: impl IntoIterator<Item = TimerConfigOption>) -> TimerConfig {
    let mut config = TimerConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  pub(crate) fn thread_builder(&self) -> std::thread::Builder {
    let builder = std::thread::Builder::new().name(self.thread_name.clone());
    match self.stack_size {
      Some(size) => builder.stack_size(size),
      None => builder,
    }
  }
}

#[derive(Debug, Clone)]
pub enum TimerConfigOption {
  SetThreadName(String),
  SetStackSize(usize),
}

impl TimerConfigOption {
  pub fn apply(&self, config: &mut TimerConfig) {
    match self {
      TimerConfigOption::SetThreadName(name) => {
        config.thread_name = name.clone();
      }
      TimerConfigOption::SetStackSize(size) => {
        config.stack_size = Some(*size);
      }
    }
  }

  pub fn with_thread_name(name: impl Into<String>) -> TimerConfigOption {
    TimerConfigOption::SetThreadName(name.into())
  }

  pub fn with_stack_size(size: usize) -> TimerConfigOption {
    TimerConfigOption::SetStackSize(size)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = TimerConfig::default();
    assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    assert_eq!(config.stack_size, None);
  }

  #[test]
  fn test_config_from_options() {
    let config = TimerConfig::from([
      TimerConfigOption::with_thread_name("session-expiry"),
      TimerConfigOption::with_stack_size(64 * 1024),
    ]);
    assert_eq!(config.thread_name, "session-expiry");
    assert_eq!(config.stack_size, Some(64 * 1024));
  }

  #[test]
  fn test_later_option_wins() {
    let config = TimerConfig::from([
      TimerConfigOption::with_thread_name("first"),
      TimerConfigOption::with_thread_name("second"),
    ]);
    assert_eq!(config.thread_name, "second");
  }
}
