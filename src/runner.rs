use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, never};
use tracing::{debug, info, trace, warn};

use crate::interrupt::{Interrupt, Interrupted};
use crate::platform::PlatformInfo;

pub const DEFAULT_STEPS: u32 = 5;
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunnerConfig {
    /// Number of processing steps, counted from 1.
    pub steps: u32,
    /// Wall-clock pause after each step.
    pub pause: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            steps: DEFAULT_STEPS,
            pause: DEFAULT_PAUSE,
        }
    }
}

/// Prints the greeting, the platform properties and a fixed number of
/// processing steps, pausing after each one.
///
/// An interrupt arriving while a pause is in progress ends that pause early.
/// It is reported on the error stream and the loop carries on with the next
/// step; interrupts never change how many steps run. A burst of interrupts
/// counts as one: whatever is already queued when a pause is cut short is
/// discarded along with it.
pub struct Runner {
    config: RunnerConfig,
    platform: PlatformInfo,
    interrupts: Receiver<Interrupt>,
}

impl Runner {
    pub fn new(
        config: RunnerConfig,
        platform: PlatformInfo,
        interrupts: Receiver<Interrupt>,
    ) -> Runner {
        Runner {
            config,
            platform,
            interrupts,
        }
    }

    /// A runner whose pauses can never be interrupted.
    pub fn uninterruptible(config: RunnerConfig, platform: PlatformInfo) -> Runner {
        Runner::new(config, platform, never())
    }

    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with(&mut stdout.lock(), &mut stderr.lock())
    }

    pub fn run_with<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> Result<()> {
        writeln!(out, "Hello, CICD World!")?;
        writeln!(out, "This is a test Java application.")?;

        writeln!(out, "Java Version: {}", self.platform.runtime_version)?;
        writeln!(out, "OS Name: {}", self.platform.os_name)?;

        info!(steps = self.config.steps, pause = ?self.config.pause, "starting");
        for step in 1..=self.config.steps {
            writeln!(out, "Processing step {step}...")?;
            out.flush()?;

            if let Err(e) = self.pause() {
                warn!(step, "pause interrupted: {e}");
                writeln!(err, "Interrupted: {e}")?;
                err.flush()?;
            } else {
                debug!(step, "step complete");
            }
        }

        writeln!(out, "Application finished successfully!")?;
        out.flush()?;
        info!("finished");
        Ok(())
    }

    fn pause(&self) -> Result<(), Interrupted> {
        let started = Instant::now();
        match self.interrupts.recv_timeout(self.config.pause) {
            Ok(interrupt) => {
                let dropped = self.interrupts.try_iter().count();
                if dropped > 0 {
                    trace!(dropped, "merged queued interrupts");
                }
                Err(Interrupted::from(interrupt))
            }
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Err(RecvTimeoutError::Disconnected) => {
                // listener is gone, sleep out whatever is left
                trace!("interrupt channel disconnected");
                thread::sleep(self.config.pause.saturating_sub(started.elapsed()));
                Ok(())
            }
        }
    }
}
