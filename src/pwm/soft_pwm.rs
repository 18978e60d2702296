use core::fmt;

use fugit_timer::HertzU32;

use super::{
    Alignment, ChannelTable, LoadProfiler, LoadReport, LoadSample, PinMode, PwmOutput, Stopwatch,
    TickTimer, TimerConfig, TimerDriver,
};

/// Software PWM over `N` output lines with `LEVELS` steps per period
/// (`0` means 256), driven by one periodic timer interrupt.
///
/// Only one engine may own a given hardware timer. The platform calls
/// [`update`](Self::update) from that timer's interrupt; every call must return
/// before the next tick fires. The handler should run at a priority that lets
/// other interrupts preempt it. Missed deadlines are not prevented, only counted
/// by [`overruns`](Self::overruns).
pub struct SoftPwm<'a, P, T, const N: usize, const LEVELS: u16 = 0> {
    duties: &'a ChannelTable<N>,
    outputs: [P; N],
    timer: TimerDriver<T>,
    alignment: Alignment,
    counter: u16,
    overruns: u32,
}

impl<'a, P, T, const N: usize, const LEVELS: u16> SoftPwm<'a, P, T, N, LEVELS>
where
    P: PwmOutput,
    T: TickTimer,
{
    const LEVELS_FIT_DUTY: () = assert!(LEVELS <= 256, "duty values are 8 bit");

    pub const BRIGHTNESS_LEVELS: u16 = if LEVELS == 0 { 256 } else { LEVELS };

    pub fn new(
        duties: &'a ChannelTable<N>,
        outputs: [P; N],
        timer: T,
        alignment: Alignment,
    ) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LEVELS_FIT_DUTY;

        Self {
            duties,
            outputs,
            timer: TimerDriver::new(timer),
            alignment,
            counter: 0,
            overruns: 0,
        }
    }

    /// Switch every line to output and start ticking `resolution()` times per
    /// PWM period at `hz` periods per second. Calling it again reprograms the
    /// timer and restarts the period.
    pub fn begin(&mut self, hz: HertzU32) -> TimerConfig {
        // line direction may share configuration registers with foreign lines
        critical_section::with(|_| {
            self.outputs
                .iter_mut()
                .for_each(|o| o.set_direction(PinMode::Output));
        });

        self.counter = 0;
        let config = self.timer.begin(hz, Self::BRIGHTNESS_LEVELS);

        log::info!(
            "SoftPwm: {} channels, {} levels at {} Hz, compare {}",
            N,
            Self::BRIGHTNESS_LEVELS,
            hz.to_Hz(),
            config.compare
        );

        config
    }

    #[inline(always)]
    pub fn set(&self, channel: usize, duty: u8) {
        self.duties.set(channel, duty);
    }

    /// Zero every duty and drive every line low in one step the tick handler
    /// cannot split. The timer keeps running.
    pub fn all_off(&mut self) {
        critical_section::with(|_| {
            self.duties.clear();
            self.outputs.iter_mut().for_each(|o| o.set_level(false));
        });
        log::debug!("SoftPwm: all off");
    }

    pub const fn size(&self) -> usize {
        N
    }

    pub const fn resolution(&self) -> u16 {
        Self::BRIGHTNESS_LEVELS
    }

    /// Tick handler body.
    #[inline(always)]
    pub fn update(&mut self) {
        self.timer.acknowledge();

        let count = self.counter;
        let levels = Self::BRIGHTNESS_LEVELS;

        match self.alignment {
            Alignment::Aligned => {
                for (output, duty) in self.outputs.iter_mut().zip(self.duties.iter()) {
                    output.set_level(count < u16::from(duty));
                }
            }
            Alignment::Staggered => {
                for (i, (output, duty)) in
                    self.outputs.iter_mut().zip(self.duties.iter()).enumerate()
                {
                    let phase = (usize::from(count) + i) % usize::from(levels);
                    output.set_level(phase < usize::from(duty));
                }
            }
        }

        self.counter = if count + 1 == levels { 0 } else { count + 1 };

        if self.timer.is_pending() {
            self.overruns = self.overruns.wrapping_add(1);
        }
    }

    /// Position inside the current PWM period, `0..resolution()`.
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Ticks that fired again before the handler for the previous one returned.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    pub fn timer_config(&self) -> Option<TimerConfig> {
        self.timer.config()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Gate the tick interrupt without touching the timer programming.
    pub fn set_listening(&mut self, enable: bool) {
        self.timer.set_listening(enable);
    }

    /// `None` until [`begin`](Self::begin) ran.
    pub fn load_report(&self, sample: LoadSample) -> Option<LoadReport> {
        self.timer.config().map(|config| {
            LoadReport::new(sample, self.timer.clock(), config, Self::BRIGHTNESS_LEVELS)
        })
    }

    /// Measure the tick handler load and write the report to `out`.
    ///
    /// Use this where the tick interrupt can preempt the caller while the
    /// caller holds `&mut self`. Otherwise take a [`LoadProfiler::sample`]
    /// outside the lock and pass it to [`load_report`](Self::load_report).
    pub fn print_interrupt_load<S: Stopwatch>(
        &mut self,
        profiler: &mut LoadProfiler<S>,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        let sample = profiler.sample(|enable| self.timer.set_listening(enable));
        match self.load_report(sample) {
            Some(report) => write!(out, "{}", report),
            None => writeln!(out, "SoftPwm::print_interrupt_load(): timer not started"),
        }
    }

    pub fn release(self) -> ([P; N], T) {
        (self.outputs, self.timer.release())
    }
}
