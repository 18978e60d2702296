use stm32f1xx_hal::pac::gpioa::RegisterBlock;

use crate::pwm::{PinMode, PwmOutput};

// CNF:MODE nibbles of CRL/CRH
const CFG_INPUT_FLOATING: u32 = 0b0100;
const CFG_INPUT_PULL: u32 = 0b1000;
const CFG_OUTPUT_PUSH_PULL_2MHZ: u32 = 0b0010;

/// One GPIO line driven through its port registers.
///
/// Levels go through BSRR, so a write never disturbs other lines of the port.
/// Direction changes read-modify-write CRL/CRH, which are shared by eight
/// lines each; the engine only calls `set_direction` inside a critical section.
pub struct GpioLine {
    port: *const RegisterBlock,
    pin: u8,
}

// The register block lives at a fixed address for the whole uptime.
unsafe impl Send for GpioLine {}

impl GpioLine {
    /// `port` is one of `GPIOA::ptr()` .. `GPIOG::ptr()`, `pin` is `0..16`.
    /// The port clock must already be enabled.
    pub const fn new(port: *const RegisterBlock, pin: u8) -> Self {
        Self { port, pin }
    }

    #[inline(always)]
    fn regs(&self) -> &RegisterBlock {
        unsafe { &*self.port }
    }

    fn configure(&self, cfg: u32) {
        let shift = u32::from(self.pin % 8) * 4;
        let mask = 0b1111 << shift;
        if self.pin < 8 {
            self.regs()
                .crl
                .modify(|r, w| unsafe { w.bits((r.bits() & !mask) | (cfg << shift)) });
        } else {
            self.regs()
                .crh
                .modify(|r, w| unsafe { w.bits((r.bits() & !mask) | (cfg << shift)) });
        }
    }
}

impl PwmOutput for GpioLine {
    #[inline(always)]
    fn set_level(&mut self, high: bool) {
        let bit = 1u32 << self.pin;
        self.regs()
            .bsrr
            .write(|w| unsafe { w.bits(if high { bit } else { bit << 16 }) });
    }

    fn set_direction(&mut self, mode: PinMode) {
        match mode {
            PinMode::Input => {
                self.set_level(false);
                self.configure(CFG_INPUT_FLOATING);
            }
            PinMode::InputPullUp => {
                // ODR selects pull-up over pull-down
                self.set_level(true);
                self.configure(CFG_INPUT_PULL);
            }
            PinMode::Output => self.configure(CFG_OUTPUT_PUSH_PULL_2MHZ),
        }
    }
}
