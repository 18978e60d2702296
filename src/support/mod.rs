mod console_logger;
pub use console_logger::ConsoleLogger;

mod serial_interface;
pub use serial_interface::SerialConsole;

#[cfg(feature = "stm32f103")]
mod timer_interface;
#[cfg(feature = "stm32f103")]
pub use timer_interface::Timer;

#[cfg(feature = "stm32f103")]
mod gpio_line;
#[cfg(feature = "stm32f103")]
pub use gpio_line::GpioLine;

#[cfg(feature = "stm32f103")]
mod dwt_stopwatch;
#[cfg(feature = "stm32f103")]
pub use dwt_stopwatch::DwtStopwatch;
