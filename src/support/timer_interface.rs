use fugit_timer::HertzU32;
use stm32f1xx_hal::pac::{RCC, TIM2};

use crate::pwm::{TickTimer, TimerConfig};

/// TIM2 as the PWM tick source: up-counting, update interrupt on reload.
pub struct Timer {
    tim: TIM2,
    clock: HertzU32,
}

impl Timer {
    /// `clock` is the TIM2 kernel clock (`Clocks::pclk1_tim`).
    pub fn new(tim: TIM2, clock: HertzU32) -> Self {
        unsafe {
            let rcc = &*RCC::ptr();
            rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());
            rcc.apb1rstr.modify(|_, w| w.tim2rst().set_bit());
            rcc.apb1rstr.modify(|_, w| w.tim2rst().clear_bit());
        }

        Self { tim, clock }
    }
}

impl TickTimer for Timer {
    fn clock(&self) -> HertzU32 {
        self.clock
    }

    fn program(&mut self, config: TimerConfig) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
        self.tim
            .psc
            .write(|w| unsafe { w.bits(u32::from(config.prescaler.saturating_sub(1))) });
        self.tim
            .arr
            .write(|w| unsafe { w.bits(u32::from(config.compare)) });
        // load PSC and ARR now, without raising the update interrupt
        self.tim.cr1.modify(|_, w| w.urs().set_bit());
        self.tim.egr.write(|w| w.ug().set_bit());
        self.tim.cr1.modify(|_, w| w.urs().clear_bit().cen().set_bit());
    }

    fn listen(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().set_bit());
    }

    fn unlisten(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
    }

    #[inline(always)]
    fn acknowledge(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    #[inline(always)]
    fn is_pending(&self) -> bool {
        self.tim.sr.read().uif().bit_is_set()
    }
}
