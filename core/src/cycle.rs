//! The cycle loop (component H): fetch, execute, conditionally auto-advance
//! `IP`; `start`/`cycle_n` build on the single-step [`Machine::cycle`], which
//! doubles as the debugger's single-step entry point.

use crate::decode::Decoded;
use crate::error::Result;
use crate::machine::Machine;

impl Machine {
    /// Classify the instruction at the current `IP` without executing it.
    pub fn fetch(&self) -> Result<Decoded> {
        self.decode_at(self.ip())
    }

    /// Fetch, execute, and — only if the opcode didn't claim responsibility for
    /// `IP` itself — advance `IP` by the instruction's length. The debugger
    /// drives single-stepping through this same entry point.
    pub fn cycle(&mut self) -> Result<()> {
        let ip = self.ip();
        let decoded = self.decode_at(ip)?;
        tracing::trace!(ip, opcode = %decoded.opcode, length = decoded.length, "fetched instruction");

        if let Err(error) = self.execute(ip, decoded) {
            tracing::warn!(%error, ip, "trapped");
            return Err(error);
        }

        if !decoded.opcode.controls_ip() {
            self.set_ip(ip + u64::from(decoded.length));
        }

        Ok(())
    }

    /// Run exactly `n` cycles, stopping early only on a trap.
    pub fn cycle_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.cycle()?;
        }
        Ok(())
    }

    /// Set `RUN` and cycle until it clears (typically via `SYSCALL EXIT`) or a
    /// trap propagates.
    pub fn start(&mut self) -> Result<()> {
        self.set_running(true);
        tracing::debug!("machine starting");
        while self.is_running() {
            self.cycle()?;
        }
        tracing::debug!(exit_code = self.exit_code(), "machine stopped");
        Ok(())
    }
}
