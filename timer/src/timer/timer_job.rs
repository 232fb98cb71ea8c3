use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

pub(crate) type BlockingJob = Box<dyn FnOnce() + Send + 'static>;

/// Runs a blocking job, containing any panic it raises.
///
/// Returns `false` if the job panicked; the panic has already been logged.
pub(crate) fn run_blocking_job(job: BlockingJob) -> bool {
  match panic::catch_unwind(AssertUnwindSafe(job)) {
    Ok(()) => true,
    Err(payload) => {
      tracing::error!("timer job panicked: {}", panic_message(payload.as_ref()));
      false
    }
  }
}

/// Async counterpart of [`run_blocking_job`].
pub(crate) async fn run_async_job<F>(job: F) -> bool
where
  F: Future<Output = ()> + Send + 'static, {
  match AssertUnwindSafe(job).catch_unwind().await {
    Ok(()) => true,
    Err(payload) => {
      tracing::error!("async timer job panicked: {}", panic_message(payload.as_ref()));
      false
    }
  }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  #[test]
  fn test_run_blocking_job_contains_panic() {
    assert!(!run_blocking_job(Box::new(|| panic!("boom"))));
  }

  #[test]
  fn test_run_blocking_job_runs_job() {
    let counter = Arc::new(AtomicUsize::new(0));
    let cloned = counter.clone();
    assert!(run_blocking_job(Box::new(move || {
      cloned.fetch_add(1, Ordering::SeqCst);
    })));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_run_async_job_contains_panic() {
    assert!(!run_async_job(async { panic!("boom"); }).await);
  }

  #[test]
  fn test_panic_message() {
    let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
    assert_eq!(panic_message(payload.as_ref()), "owned");
    let payload: Box<dyn Any + Send> = Box::new("static");
    assert_eq!(panic_message(payload.as_ref()), "static");
    let payload: Box<dyn Any + Send> = Box::new(42);
    assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
  }
}
