use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
  #[error("failed to spawn timer thread: {0}")]
  Spawn(#[from] std::io::Error),
  #[error("async timer requires a running tokio runtime")]
  NoRuntime,
}

static_assertions::assert_impl_all!(TimerError: Send, Sync);
