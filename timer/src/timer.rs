mod async_timer;
mod blocking_timer;
mod timer_config;
mod timer_error;
mod timer_job;
mod timer_status;

pub use self::{async_timer::*, blocking_timer::*, timer_config::*, timer_error::*, timer_status::*};
