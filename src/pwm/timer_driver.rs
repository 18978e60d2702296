use fugit_timer::HertzU32;

/// Hardware periodic-interrupt source bound exclusively to one engine.
pub trait TickTimer: Send {
    /// Input clock of the counter, before the prescaler.
    fn clock(&self) -> HertzU32;

    /// Stop, reprogram and restart the counter. Interrupt enable state is left alone.
    fn program(&mut self, config: TimerConfig);

    fn listen(&mut self);
    fn unlisten(&mut self);

    /// Clear the pending tick flag. Called first thing in every tick.
    fn acknowledge(&mut self);

    /// A tick fired and was not yet acknowledged.
    fn is_pending(&self) -> bool;
}

/// Derived timer programming: the counter runs from 0 to `compare` inclusive,
/// so one tick lasts `prescaler * (compare + 1)` clock cycles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerConfig {
    pub prescaler: u16,
    pub compare: u16,
}

impl TimerConfig {
    /// The counter clock is never divided; the whole range is taken by `compare`.
    pub const PRESCALER: u16 = 1;

    /// Timer programming for `hz` full PWM periods of `levels` ticks each.
    ///
    /// The compare threshold must fit 16 bits. Larger values are truncated,
    /// which gives a wrong PWM rate without any report.
    pub fn for_rate(clock: HertzU32, hz: HertzU32, levels: u16) -> Self {
        let tick_hz = hz.to_Hz().wrapping_mul(u32::from(levels));
        let compare = compare_threshold(clock.to_Hz(), tick_hz);
        debug_assert!(
            compare <= u32::from(u16::MAX),
            "compare threshold {} does not fit the timer",
            compare
        );

        Self {
            prescaler: Self::PRESCALER,
            compare: compare as u16,
        }
    }

    /// Achieved tick rate.
    pub fn interrupt_frequency(&self, clock: HertzU32) -> f32 {
        clock.to_Hz() as f32 / (f32::from(self.prescaler) * (f32::from(self.compare) + 1.0))
    }
}

/// `round(clock / tick) - 1`: the bias is subtracted before dividing so the
/// quotient rounds to nearest instead of truncating.
pub fn compare_threshold(clock_hz: u32, tick_hz: u32) -> u32 {
    clock_hz
        .wrapping_sub(tick_hz / 2)
        .checked_div(tick_hz)
        .unwrap_or(u32::MAX)
}

pub struct TimerDriver<T> {
    timer: T,
    config: Option<TimerConfig>,
}

impl<T: TickTimer> TimerDriver<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            config: None,
        }
    }

    /// Program the timer for `hz` PWM periods of `levels` ticks and enable the
    /// tick interrupt. Every call fully reprograms the hardware.
    pub fn begin(&mut self, hz: HertzU32, levels: u16) -> TimerConfig {
        let config = TimerConfig::for_rate(self.timer.clock(), hz, levels);

        self.timer.unlisten();
        self.timer.program(config);
        self.timer.acknowledge();
        self.timer.listen();

        self.config = Some(config);
        config
    }

    pub fn config(&self) -> Option<TimerConfig> {
        self.config
    }

    pub fn is_running(&self) -> bool {
        self.config.is_some()
    }

    pub fn set_listening(&mut self, enable: bool) {
        if enable {
            self.timer.listen();
        } else {
            self.timer.unlisten();
        }
    }

    pub fn clock(&self) -> HertzU32 {
        self.timer.clock()
    }

    /// Tick rate actually produced by the programmed compare threshold.
    pub fn interrupt_frequency(&self) -> Option<f32> {
        self.config
            .map(|c| c.interrupt_frequency(self.timer.clock()))
    }

    #[inline(always)]
    pub(crate) fn acknowledge(&mut self) {
        self.timer.acknowledge();
    }

    #[inline(always)]
    pub(crate) fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn release(self) -> T {
        self.timer
    }
}
