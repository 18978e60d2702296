pub const MCU_XTAL_HZ: u32 = 8_000_000;
pub const SYSCLK_HZ: u32 = 72_000_000;

//-----------------------------------------------------------------------------

pub const SYSTICK_RATE_HZ: u32 = 1_000;

//-----------------------------------------------------------------------------

pub const CONSOLE_BAUD_RATE: u32 = 115_200;

//-----------------------------------------------------------------------------

/// Output lines driven by the demo board (PA0..PA7).
pub const PWM_CHANNELS: usize = 8;
/// 0 selects 256 levels.
pub const BRIGHTNESS_LEVELS: u16 = 0;
pub const PWM_FREQ_HZ: u32 = 100;

/// Busy-wait window of the interrupt load measurement.
pub const LOAD_SAMPLE_US: u32 = 5_000;

//-----------------------------------------------------------------------------

pub const FADE_STEP_MS: u64 = 10;
