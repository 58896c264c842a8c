//! Batch runner for 6502 conformance images.
//!
//! Test suites signal their result by parking the CPU in a `JMP *` loop:
//! at a known success address when every test passed, anywhere else on
//! failure. The runner clocks the machine one instruction at a time and
//! classifies the run as soon as either happens.
//!
//! WSYNC stall ticks leave the PC alone without running an instruction,
//! so they never count toward a trap.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::system::Machine;

/// Consecutive unchanged-PC ticks that count as a trap.
pub const DEFAULT_TRAP_THRESHOLD: u32 = 3;

/// How a conformance run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// PC reached the success address.
    Passed,
    /// PC stopped moving somewhere else.
    Trapped,
    /// Instruction budget exhausted.
    TimedOut,
    /// The abort flag was raised.
    Aborted,
}

/// Result of [`run_conformance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    /// PC when the run stopped.
    pub pc: u16,
    /// Machine ticks (instructions or stall cycles) executed.
    pub ticks: u64,
    /// CPU cycles executed.
    pub cycles: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct HarnessOptions {
    /// Address the suite loops at on success. Without one, every trap is
    /// reported as [`Verdict::Trapped`].
    pub success_pc: Option<u16>,
    pub trap_threshold: u32,
    pub max_instructions: u64,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            success_pc: None,
            trap_threshold: DEFAULT_TRAP_THRESHOLD,
            max_instructions: 100_000_000,
        }
    }
}

/// Clock `machine` until the image passes, traps, times out or is aborted.
///
/// `abort` is polled before every tick so another thread can stop a long
/// run.
pub fn run_conformance(
    machine: &mut Machine,
    options: &HarnessOptions,
    abort: &AtomicBool,
) -> Outcome {
    let mut ticks = 0u64;
    let mut last_pc = None;
    let mut same = 0u32;

    while ticks < options.max_instructions {
        if abort.load(Ordering::Relaxed) {
            log::info!("conformance run aborted after {ticks} ticks");
            return finish(machine, Verdict::Aborted, ticks);
        }

        let stalled = machine.bus().tia.wsync();
        machine.clock();
        ticks += 1;

        let pc = machine.pc();
        if options.success_pc == Some(pc) {
            return finish(machine, Verdict::Passed, ticks);
        }
        if stalled {
            continue;
        }
        if last_pc == Some(pc) {
            same += 1;
            if same >= options.trap_threshold {
                log::debug!("trapped at ${pc:04X} after {ticks} ticks");
                return finish(machine, Verdict::Trapped, ticks);
            }
        } else {
            last_pc = Some(pc);
            same = 0;
        }
    }

    if abort.load(Ordering::Relaxed) {
        return finish(machine, Verdict::Aborted, ticks);
    }
    finish(machine, Verdict::TimedOut, ticks)
}

fn finish(machine: &Machine, verdict: Verdict, ticks: u64) -> Outcome {
    Outcome {
        verdict,
        pc: machine.pc(),
        ticks,
        cycles: machine.cycles(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;

    /// A flat image with `program` at $0400 and the reset vector pointing
    /// at it.
    fn image(program: &[u8]) -> Machine {
        let mut mem = vec![0u8; 0x10000];
        mem[0x0400..0x0400 + program.len()].copy_from_slice(program);
        mem[0xFFFC] = 0x00;
        mem[0xFFFD] = 0x04;
        let mut machine = Machine::new(&MachineConfig::default());
        machine.load_test_image(&mem);
        machine
    }

    #[test]
    fn success_address_passes_immediately() {
        // NOP ; NOP ; JMP $0402
        let mut machine = image(&[0xEA, 0xEA, 0x4C, 0x02, 0x04]);
        let options = HarnessOptions {
            success_pc: Some(0x0402),
            ..HarnessOptions::default()
        };
        let outcome = run_conformance(&mut machine, &options, &AtomicBool::new(false));
        assert_eq!(outcome.verdict, Verdict::Passed);
        assert_eq!(outcome.pc, 0x0402);
        assert_eq!(outcome.ticks, 2);
        assert_eq!(outcome.cycles, 4);
    }

    #[test]
    fn self_loop_elsewhere_traps() {
        // JMP $0400
        let mut machine = image(&[0x4C, 0x00, 0x04]);
        let options = HarnessOptions {
            success_pc: Some(0x3469),
            ..HarnessOptions::default()
        };
        let outcome = run_conformance(&mut machine, &options, &AtomicBool::new(false));
        assert_eq!(outcome.verdict, Verdict::Trapped);
        assert_eq!(outcome.pc, 0x0400);
        // First tick records the PC, the next three repeat it.
        assert_eq!(outcome.ticks, 4);
    }

    #[test]
    fn budget_exhaustion_times_out() {
        let mut machine = image(&[0xEA; 64]);
        let options = HarnessOptions {
            max_instructions: 10,
            ..HarnessOptions::default()
        };
        let outcome = run_conformance(&mut machine, &options, &AtomicBool::new(false));
        assert_eq!(outcome.verdict, Verdict::TimedOut);
        assert_eq!(outcome.ticks, 10);
        assert_eq!(outcome.pc, 0x040A);
    }

    #[test]
    fn raised_flag_aborts_before_running() {
        let mut machine = image(&[0xEA; 8]);
        let outcome =
            run_conformance(&mut machine, &HarnessOptions::default(), &AtomicBool::new(true));
        assert_eq!(outcome.verdict, Verdict::Aborted);
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.pc, 0x0400);
    }
}
