use core::sync::atomic::{AtomicU8, Ordering};

#[allow(clippy::declare_interior_mutable_const)]
const OFF: AtomicU8 = AtomicU8::new(0);

/// Duty values of all channels, shared between foreground code and the tick
/// handler.
///
/// Each duty is a single byte, so `set` is one store the tick handler can
/// never observe half-written. Whole-table updates that must look atomic to
/// the tick handler go through [`SoftPwm::all_off`](super::SoftPwm::all_off),
/// which holds a critical section.
pub struct ChannelTable<const N: usize> {
    duties: [AtomicU8; N],
}

impl<const N: usize> ChannelTable<N> {
    pub const fn new() -> Self {
        Self {
            duties: [OFF; N],
        }
    }

    /// Panics if `channel >= N`.
    #[inline(always)]
    pub fn set(&self, channel: usize, duty: u8) {
        debug_assert!(channel < N, "channel {} out of range", channel);
        self.duties[channel].store(duty, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn get(&self, channel: usize) -> u8 {
        self.duties[channel].load(Ordering::Relaxed)
    }

    pub const fn size(&self) -> usize {
        N
    }

    pub(crate) fn clear(&self) {
        self.duties
            .iter()
            .for_each(|d| d.store(0, Ordering::Relaxed));
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.duties.iter().map(|d| d.load(Ordering::Relaxed))
    }
}

impl<const N: usize> Default for ChannelTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let table = ChannelTable::<4>::new();
        assert_eq!(table.size(), 4);
        assert!(table.iter().all(|d| d == 0));
    }

    #[test]
    fn set_touches_one_channel() {
        let table = ChannelTable::<3>::new();
        table.set(1, 200);
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(1), 200);
        assert_eq!(table.get(2), 0);
    }

    #[test]
    fn clear_zeroes_everything() {
        static TABLE: ChannelTable<3> = ChannelTable::new();
        TABLE.set(0, 1);
        TABLE.set(2, 255);
        TABLE.clear();
        assert!(TABLE.iter().all(|d| d == 0));
    }

    #[test]
    #[should_panic]
    fn set_out_of_range_panics() {
        let table = ChannelTable::<2>::new();
        table.set(2, 10);
    }
}
