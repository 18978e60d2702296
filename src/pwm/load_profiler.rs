use core::fmt;

use fugit_timer::HertzU32;

use super::TimerConfig;

/// Wall clock plus a busy-wait that is stretched by interrupts, the pair the
/// load measurement needs.
pub trait Stopwatch {
    /// Free-running microsecond timestamp, wraps around.
    fn micros(&mut self) -> u32;

    /// Spin for `us` microseconds of CPU time.
    fn delay_us(&mut self, us: u32);
}

/// Elapsed wall time of the same busy-wait with and without the tick interrupt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LoadSample {
    pub with_ticks_us: u32,
    pub without_ticks_us: u32,
}

impl LoadSample {
    /// Fraction of the CPU taken by the tick handler.
    pub fn load(&self) -> f32 {
        if self.with_ticks_us == 0 {
            return 0.0;
        }
        self.with_ticks_us.saturating_sub(self.without_ticks_us) as f32
            / self.with_ticks_us as f32
    }
}

pub struct LoadProfiler<S> {
    stopwatch: S,
    window_us: u32,
}

impl<S: Stopwatch> LoadProfiler<S> {
    pub fn new(stopwatch: S, window_us: u32) -> Self {
        Self {
            stopwatch,
            window_us,
        }
    }

    /// Time one window with the tick interrupt on, one with it off, and turn it
    /// back on. Outputs freeze for one window while the interrupt is off.
    ///
    /// `set_listening` must not hold off the tick interrupt itself for longer
    /// than it takes to flip the enable bit.
    pub fn sample(&mut self, mut set_listening: impl FnMut(bool)) -> LoadSample {
        set_listening(true);
        let with_ticks_us = self.window();

        set_listening(false);
        let without_ticks_us = self.window();

        set_listening(true);

        LoadSample {
            with_ticks_us,
            without_ticks_us,
        }
    }

    fn window(&mut self) -> u32 {
        let start = self.stopwatch.micros();
        self.stopwatch.delay_us(self.window_us);
        self.stopwatch.micros().wrapping_sub(start)
    }

    pub fn release(self) -> S {
        self.stopwatch
    }
}

/// Figures derived from one [`LoadSample`] and the running timer programming.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoadReport {
    pub load: f32,
    pub cycles_per_interrupt: f32,
    pub interrupt_frequency: f32,
    pub pwm_frequency: f32,
    pub brightness_levels: u16,
}

impl LoadReport {
    pub fn new(
        sample: LoadSample,
        clock: HertzU32,
        config: TimerConfig,
        brightness_levels: u16,
    ) -> Self {
        let load = sample.load();
        let interrupt_frequency = config.interrupt_frequency(clock);
        let cycles_per_interrupt = load * clock.to_Hz() as f32 / interrupt_frequency;

        Self {
            load,
            cycles_per_interrupt,
            interrupt_frequency,
            pwm_frequency: interrupt_frequency / f32::from(brightness_levels),
            brightness_levels,
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SoftPwm::print_interrupt_load():")?;
        writeln!(f, "  Load of interrupt: {:.10}", self.load)?;
        writeln!(
            f,
            "  Clock cycles per interrupt: {}",
            libm::roundf(self.cycles_per_interrupt) as u32
        )?;
        writeln!(
            f,
            "  Interrupt frequency: {:.2} Hz",
            self.interrupt_frequency
        )?;
        writeln!(f, "  PWM frequency: {:.2} Hz", self.pwm_frequency)?;
        writeln!(f, "  Brightness levels: {}", self.brightness_levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_of_idle_interrupt_is_zero() {
        let sample = LoadSample {
            with_ticks_us: 5_000,
            without_ticks_us: 5_000,
        };
        assert_eq!(sample.load(), 0.0);
    }

    #[test]
    fn load_never_goes_negative() {
        let sample = LoadSample {
            with_ticks_us: 4_990,
            without_ticks_us: 5_000,
        };
        assert_eq!(sample.load(), 0.0);
        assert_eq!(
            LoadSample {
                with_ticks_us: 0,
                without_ticks_us: 0
            }
            .load(),
            0.0
        );
    }

    #[test]
    fn quarter_load() {
        let sample = LoadSample {
            with_ticks_us: 8_000,
            without_ticks_us: 6_000,
        };
        assert!((sample.load() - 0.25).abs() < 1e-6);
    }
}
