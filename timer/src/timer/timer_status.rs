use std::fmt::{Display, Formatter};

/// Lifecycle of a timer.
///
/// `Pending` leaves exactly once, either towards `Firing` (deadline reached while not stopped)
/// or towards `Cancelled`. `Fired` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerStatus {
  Pending,
  Firing,
  Fired,
  Cancelled,
}

impl TimerStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, TimerStatus::Fired | TimerStatus::Cancelled)
  }
}

impl Display for TimerStatus {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      TimerStatus::Pending => "pending",
      TimerStatus::Firing => "firing",
      TimerStatus::Fired => "fired",
      TimerStatus::Cancelled => "cancelled",
    };
    write!(f, "{}", s)
  }
}

/// State shared between a timer handle and its waiter. Always accessed under the timer's mutex.
#[derive(Debug)]
pub(crate) struct TimerState {
  pub(crate) stopped: bool,
  pub(crate) status: TimerStatus,
}

impl TimerState {
  pub(crate) fn new() -> Self {
    Self {
      stopped: false,
      status: TimerStatus::Pending,
    }
  }

  /// Marks the timer stopped. Returns `false` if it already was.
  pub(crate) fn request_stop(&mut self) -> bool {
    if self.stopped {
      return false;
    }
    self.stopped = true;
    if self.status == TimerStatus::Pending {
      self.status = TimerStatus::Cancelled;
    }
    true
  }

  /// Decides expiry. Only succeeds while not stopped, so a racing stop always wins.
  pub(crate) fn begin_firing(&mut self) -> bool {
    if self.stopped {
      return false;
    }
    self.status = TimerStatus::Firing;
    true
  }

  pub(crate) fn finish_firing(&mut self) {
    self.status = TimerStatus::Fired;
  }
}
