use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::timer::timer_job::{run_blocking_job, BlockingJob};
use crate::timer::timer_status::TimerState;
use crate::timer::{TimerConfig, TimerError, TimerStatus, FAR_FUTURE};


#[derive(Debug)]
struct TimerShared {
  state: Mutex<TimerState>,
  condvar: Condvar,
}

/// Runs a job once on a dedicated thread after a duration, unless stopped first.
///
/// Stopping (explicitly or by dropping the timer) blocks until the background thread has exited,
/// so once [`Timer::stop`] returns the job has either completed or will never start.
pub struct Timer {
  shared: Arc<TimerShared>,
  deadline: Instant,
  waiter_id: ThreadId,
  waiter: Mutex<Option<JoinHandle<()>>>,
}

impl Debug for Timer {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Timer")
      .field("deadline", &self.deadline)
      .field("status", &self.status())
      .finish()
  }
}

impl Timer {
  pub fn new<F>(job: F, duration: Duration) -> Result<Self, TimerError>
  where
    F: FnOnce() + Send + 'static, {
    Self::with_config(job, duration, TimerConfig::default())
  }

  pub fn with_config<F>(job: F, duration: Duration, config: TimerConfig) -> Result<Self, TimerError>
  where
    F: FnOnce() + Send + 'static, {
    let now = Instant::now();
    let deadline = now.checked_add(duration).unwrap_or(now + FAR_FUTURE);
    let shared = Arc::new(TimerShared {
      state: Mutex::new(TimerState::new()),
      condvar: Condvar::new(),
    });
    let job: BlockingJob = Box::new(job);
    let waiter_shared = shared.clone();
    let handle = config
      .thread_builder()
      .spawn(move || Self::wait(waiter_shared, deadline, job))?;
    tracing::debug!(thread = %config.thread_name, ?duration, "timer armed");
    Ok(Self {
      shared,
      deadline,
      waiter_id: handle.thread().id(),
      waiter: Mutex::new(Some(handle)),
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

  /// Cancels the timer and waits for its background thread to exit.
  ///
  /// Idempotent. Concurrent callers all return only after the thread has been joined.
  /// When called from inside the job itself the timer is marked stopped without joining; if the job
  /// then drops the last handle, the join handle of its own thread is released without a join, as
  /// that thread exits right after the job returns.
  pub fn stop(&self) {
    let first = self.shared.state.lock().request_stop();
    if first {
      self.shared.condvar.notify_all();
      tracing::debug!(status = %self.status(), "timer stop requested");
    }
    if thread::current().id() == self.waiter_id {
      return;
    }
    let mut waiter = self.waiter.lock();
    if let Some(handle) = waiter.take() {
      if handle.join().is_err() {
        tracing::error!("timer thread terminated abnormally");
      }
    }
  }

  fn wait(shared: Arc<TimerShared>, deadline: Instant, job: BlockingJob) {
    let mut state = shared.state.lock();
    while !state.stopped {
      if shared.condvar.wait_until(&mut state, deadline).timed_out() {
        break;
      }
      tracing::trace!("timer woke before deadline");
    }
    if !state.begin_firing() {
      tracing::debug!("timer cancelled before expiry");
      return;
    }
    drop(state);

    tracing::debug!("timer expired, running job");
    let completed = run_blocking_job(job);
    tracing::debug!(completed, "timer job finished");
    shared.state.lock().finish_firing();
  }
}

impl Drop for Timer {
  fn drop(&mut self) {
    self.stop();
  }
}

static_assertions::assert_impl_all!(Timer: Send, Sync);
