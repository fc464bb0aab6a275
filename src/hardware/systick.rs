//! SysTick measurement counter
//!
//! # Design
//! The Cortex-M SysTick is a 24-bit down counter with a sticky wrap flag. It provides the fast
//! countdown register of a [`TimerPair`](crate::meter::TimerPair), and the wrap flag is polled into a software underflow
//! tally on every access. Only one wrap can be detected between two polls, so windows spanning
//! more than one full period between accesses under-count.
//!
//! The SysTick period is one tick longer than its reload register. The register is loaded with
//! `reload - 1` so that `k` ticks after a reset the counter reads `reload - k` and wraps after
//! exactly `reload` ticks. A reading of zero is the cleared state before the first tick as well as
//! the end of a period; both are reported as `reload`.
#[cfg(all(target_arch = "arm", target_os = "none"))]
use cortex_m::peripheral::{syst::SystClkSource, SYST};

#[cfg(all(target_arch = "arm", target_os = "none"))]
use crate::meter::TimerPair;

/// The reload register value for a period of `reload` ticks.
pub const fn reload_register(reload: u16) -> u32 {
    (reload as u32).saturating_sub(1)
}

/// The countdown value for a current value register reading.
pub const fn countdown(current: u32, reload: u16) -> u16 {
    match current {
        0 => reload,
        current => current as u16,
    }
}

/// A [`TimerPair`] on the SysTick counter.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub struct SysTickPair {
    syst: SYST,
    reload: u16,
    overflows: u16,
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl SysTickPair {
    /// Take over the SysTick.
    ///
    /// # Args
    /// * `syst` - The SysTick peripheral. It is clocked from the external reference, which is the
    ///   core clock divided by 8 on the STM32H7.
    pub fn new(mut syst: SYST) -> Self {
        syst.disable_counter();
        syst.disable_interrupt();
        syst.set_clock_source(SystClkSource::External);
        Self {
            syst,
            reload: 0,
            overflows: 0,
        }
    }

    fn poll(&mut self) {
        if self.syst.has_wrapped() {
            self.overflows = self.overflows.wrapping_add(1);
        }
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl TimerPair for SysTickPair {
    fn reset(&mut self, reload: u16) {
        self.syst.disable_counter();
        self.syst.set_reload(reload_register(reload));
        self.syst.clear_current();
        // Reading the flag clears it.
        self.syst.has_wrapped();
        self.reload = reload;
        self.overflows = 0;
    }

    fn start(&mut self) {
        self.syst.enable_counter();
    }

    fn stop(&mut self) {
        self.syst.disable_counter();
        self.poll();
    }

    fn countdown(&mut self) -> u16 {
        self.poll();
        countdown(SYST::get_current(), self.reload)
    }

    fn overflows(&mut self) -> u16 {
        self.poll();
        self.overflows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Register level behavior of the SysTick current value and wrap flag.
    struct Registers {
        reload: u32,
        current: u32,
        wrapped: bool,
    }

    impl Registers {
        fn cleared(reload: u32) -> Self {
            Self {
                reload,
                current: 0,
                wrapped: false,
            }
        }

        fn tick(&mut self) {
            if self.current == 0 {
                self.current = self.reload;
            } else {
                self.current -= 1;
                if self.current == 0 {
                    self.wrapped = true;
                }
            }
        }
    }

    #[test]
    fn counts_every_tick() {
        let reload = 100u16;
        let mut registers = Registers::cleared(reload_register(reload));
        let mut overflows = 0u64;

        for k in 0..=350u64 {
            if k > 0 {
                registers.tick();
            }
            if core::mem::take(&mut registers.wrapped) {
                overflows += 1;
            }
            let ticks = u64::from(reload - countdown(registers.current, reload));
            assert_eq!(ticks, k % 100, "tick {k}");
            assert_eq!(ticks + overflows * 100, k, "tick {k}");
        }
    }

    #[test]
    fn register_values() {
        assert_eq!(reload_register(60_000), 59_999);
        assert_eq!(reload_register(0), 0);
        assert_eq!(countdown(0, 60_000), 60_000);
        assert_eq!(countdown(59_999, 60_000), 59_999);
    }
}
