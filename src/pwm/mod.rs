mod channel_table;
mod load_profiler;
mod pwm_channel;
mod soft_pwm;
mod timer_driver;

pub use channel_table::ChannelTable;
pub use load_profiler::{LoadProfiler, LoadReport, LoadSample, Stopwatch};
pub use pwm_channel::{Alignment, Inverted, PinMode, PinOutput, PwmOutput};
pub use soft_pwm::SoftPwm;
pub use timer_driver::{compare_threshold, TickTimer, TimerConfig, TimerDriver};
