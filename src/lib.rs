#![cfg_attr(not(feature = "host"), no_std)]

#[cfg(all(feature = "host", feature = "stm32f103"))]
compile_error!("'host' builds the engine for the development machine; disable the chip features");

pub mod config;
pub mod pwm;
pub mod support;

pub use pwm::{
    Alignment, ChannelTable, Inverted, LoadProfiler, LoadReport, LoadSample, PinMode, PinOutput,
    PwmOutput, SoftPwm, Stopwatch, TickTimer, TimerConfig,
};
pub use support::{ConsoleLogger, SerialConsole};
