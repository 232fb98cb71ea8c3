use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::{self, JoinHandle};
use tokio::time::Instant;

use crate::timer::timer_job::run_async_job;
use crate::timer::timer_status::TimerState;
use crate::timer::{TimerError, TimerStatus, FAR_FUTURE};


#[derive(Debug)]
struct AsyncTimerShared {
  state: Mutex<TimerState>,
  notify: Notify,
}

/// Tokio flavour of [`Timer`](crate::Timer): the job is a future spawned on the current runtime.
///
/// [`AsyncTimer::stop`] has the same barrier semantics as the blocking timer. Dropping the timer
/// cannot await, so it only marks the timer stopped and wakes the task: a job that has not
/// started never starts, one already running finishes in the background.
pub struct AsyncTimer {
  shared: Arc<AsyncTimerShared>,
  deadline: Instant,
  waiter_id: task::Id,
  waiter: AsyncMutex<Option<JoinHandle<()>>>,
}

impl Debug for AsyncTimer {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AsyncTimer")
      .field("deadline", &self.deadline)
      .field("status", &self.status())
      .finish()
  }
}

impl AsyncTimer {
  pub fn new<F>(job: F, duration: Duration) -> Result<Self, TimerError>
  where
    F: Future<Output = ()> + Send + 'static, {
    let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
    let now = Instant::now();
    let deadline = now.checked_add(duration).unwrap_or(now + FAR_FUTURE);
    let shared = Arc::new(AsyncTimerShared {
      state: Mutex::new(TimerState::new()),
      notify: Notify::new(),
    });
    let handle = runtime.spawn(Self::wait(shared.clone(), deadline, job));
    tracing::debug!(?duration, "async timer armed");
    Ok(Self {
      shared,
      deadline,
      waiter_id: handle.id(),
      waiter: AsyncMutex::new(Some(handle)),
    })
  }

  pub fn deadline(&self) -> Instant {
    self.deadline
  }

  pub fn status(&self) -> TimerStatus {
    self.shared.state.lock().status
  }

  pub fn is_stopped(&self) -> bool {
    self.shared.state.lock().stopped
  }

  /// Cancels the timer and waits until its task has finished.
  ///
  /// When awaited from inside the job itself the timer is marked stopped without waiting on its
  /// own task.
  pub async fn stop(&self) {
    if self.request_stop() {
      tracing::debug!(status = %self.status(), "async timer stop requested");
    }
    if task::try_id() == Some(self.waiter_id) {
      return;
    }
    let mut waiter = self.waiter.lock().await;
    if let Some(handle) = waiter.take() {
      if let Err(err) = handle.await {
        tracing::error!("async timer task terminated abnormally: {}", err);
      }
    }
  }

  fn request_stop(&self) -> bool {
    let first = self.shared.state.lock().request_stop();
    if first {
      self.shared.notify.notify_one();
    }
    first
  }

  async fn wait<F>(shared: Arc<AsyncTimerShared>, deadline: Instant, job: F)
  where
    F: Future<Output = ()> + Send + 'static, {
    tokio::select! {
      biased;
      _ = shared.notify.notified() => {}
      _ = tokio::time::sleep_until(deadline) => {}
    }
    let firing = shared.state.lock().begin_firing();
    if !firing {
      tracing::debug!("async timer cancelled before expiry");
      return;
    }

    tracing::debug!("async timer expired, running job");
    let completed = run_async_job(job).await;
    tracing::debug!(completed, "async timer job finished");
    shared.state.lock().finish_firing();
  }
}

impl Drop for AsyncTimer {
  fn drop(&mut self) {
    self.request_stop();
  }
}

static_assertions::assert_impl_all!(AsyncTimer: Send, Sync);
