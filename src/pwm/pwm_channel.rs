use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

/// Electrical configuration of an output line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinMode {
    Input,
    InputPullUp,
    Output,
}

/// Rising edge placement of every channel inside one PWM period.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Alignment {
    /// All channels switch on at counter 0.
    Aligned,
    /// Channel `i` switches on `i` ticks earlier than channel 0 (modulo the
    /// period), so lines do not draw in-rush current in the same tick.
    Staggered,
}

/// One output line driven by the engine.
///
/// `set_level` is called from the tick handler for every channel on every
/// tick, so implementations must be short and must not block.
pub trait PwmOutput: Send {
    fn set_level(&mut self, high: bool);
    fn set_direction(&mut self, mode: PinMode);
}

/// Adaptor for `embedded-hal` pins already configured as outputs by the HAL
/// type state. Direction changes other than `Output` are ignored.
pub struct PinOutput<P>(pub P);

impl<P> PwmOutput for PinOutput<P>
where
    P: OutputPin<Error = Infallible> + Send,
{
    #[inline(always)]
    fn set_level(&mut self, high: bool) {
        let _ = if high {
            self.0.set_high()
        } else {
            self.0.set_low()
        };
    }

    fn set_direction(&mut self, _mode: PinMode) {}
}

/// Active-low channel: a high duty level drives the line low.
pub struct Inverted<P>(pub P);

impl<P: PwmOutput> PwmOutput for Inverted<P> {
    #[inline(always)]
    fn set_level(&mut self, high: bool) {
        self.0.set_level(!high);
    }

    fn set_direction(&mut self, mode: PinMode) {
        self.0.set_direction(mode);
    }
}
