#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fugit_timer::HertzU32;
use stm32f1_softpwm::{PinMode, PwmOutput, Stopwatch, TickTimer, TimerConfig};

/// Output line remembering every level written to it.
#[derive(Default)]
pub struct Recorder {
    pub levels: Vec<bool>,
    pub directions: Vec<PinMode>,
}

impl PwmOutput for Recorder {
    fn set_level(&mut self, high: bool) {
        self.levels.push(high);
    }

    fn set_direction(&mut self, mode: PinMode) {
        self.directions.push(mode);
    }
}

pub fn recorders<const N: usize>() -> [Recorder; N] {
    core::array::from_fn(|_| Recorder::default())
}

#[derive(Default)]
pub struct TimerState {
    pub programmed: Vec<TimerConfig>,
    pub acknowledged: usize,
    /// Report the next tick as already pending when the handler finishes.
    pub late: bool,
}

/// Tick timer whose interrupt enable flag is shared with [`FakeStopwatch`].
#[derive(Clone)]
pub struct FakeTimer {
    pub clock: u32,
    pub listening: Arc<AtomicBool>,
    pub state: Arc<Mutex<TimerState>>,
}

impl FakeTimer {
    pub fn new(clock: u32) -> Self {
        Self {
            clock,
            listening: Arc::new(AtomicBool::new(false)),
            state: Arc::default(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

impl TickTimer for FakeTimer {
    fn clock(&self) -> HertzU32 {
        HertzU32::from_raw(self.clock)
    }

    fn program(&mut self, config: TimerConfig) {
        self.state.lock().unwrap().programmed.push(config);
    }

    fn listen(&mut self) {
        self.listening.store(true, Ordering::SeqCst);
    }

    fn unlisten(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn acknowledge(&mut self) {
        self.state.lock().unwrap().acknowledged += 1;
    }

    fn is_pending(&self) -> bool {
        self.state.lock().unwrap().late
    }
}

/// Busy-wait that takes `overhead` longer while the tick interrupt is enabled.
pub struct FakeStopwatch {
    pub now: u32,
    pub listening: Arc<AtomicBool>,
    pub overhead: f32,
}

impl Stopwatch for FakeStopwatch {
    fn micros(&mut self) -> u32 {
        self.now
    }

    fn delay_us(&mut self, us: u32) {
        let stretch = if self.listening.load(Ordering::SeqCst) {
            1.0 + self.overhead
        } else {
            1.0
        };
        self.now = self.now.wrapping_add((us as f32 * stretch) as u32);
    }
}
