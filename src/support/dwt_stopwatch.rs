use cortex_m::peripheral::{DCB, DWT};
use fugit_timer::HertzU32;

use crate::pwm::Stopwatch;

/// Microsecond clock on the DWT cycle counter, with `asm::delay` as the
/// interruptible busy-wait.
pub struct DwtStopwatch {
    cycles_per_us: u32,
    last_cycles: u32,
    leftover_cycles: u32,
    micros: u32,
}

impl DwtStopwatch {
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk: HertzU32) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();

        Self {
            cycles_per_us: (sysclk.to_Hz() / 1_000_000).max(1),
            last_cycles: DWT::cycle_count(),
            leftover_cycles: 0,
            micros: 0,
        }
    }
}

impl Stopwatch for DwtStopwatch {
    // must be polled at least once per cycle counter wrap (~59 s at 72 MHz)
    fn micros(&mut self) -> u32 {
        let now = DWT::cycle_count();
        let elapsed = now
            .wrapping_sub(self.last_cycles)
            .wrapping_add(self.leftover_cycles);
        self.last_cycles = now;

        self.micros = self.micros.wrapping_add(elapsed / self.cycles_per_us);
        self.leftover_cycles = elapsed % self.cycles_per_us;
        self.micros
    }

    fn delay_us(&mut self, us: u32) {
        cortex_m::asm::delay(us.saturating_mul(self.cycles_per_us));
    }
}
