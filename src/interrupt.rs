use std::fmt;
use std::io;
use std::thread;

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, unbounded};
use nix::sys::signal::{SigSet, Signal};
use tracing::{debug, trace, warn};

/// A request to cut the current pause short.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Interrupt {
    signal: Signal,
}

impl Interrupt {
    pub fn new(signal: Signal) -> Interrupt {
        Interrupt { signal }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }
}

/// The pause was cut short before its duration elapsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interrupted {
    message: String,
}

impl Interrupted {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Interrupt> for Interrupted {
    fn from(interrupt: Interrupt) -> Self {
        Interrupted {
            message: format!("sleep interrupted by {}", interrupt.signal.as_str()),
        }
    }
}

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Interrupted {}

/// Route SIGINT to a channel instead of its default disposition.
///
/// SIGINT is blocked on the calling thread, so this must run before any other
/// thread is spawned or those threads would still receive the signal. A
/// detached listener thread `sigwait`s for it and forwards each delivery. The
/// listener exits once the receiver is dropped and another signal arrives, or
/// when the process ends. If the listener cannot be started the mask is
/// restored, leaving SIGINT with its default disposition.
pub fn listen() -> Result<Receiver<Interrupt>> {
    install(spawn_listener)
}

fn install<F>(spawn: F) -> Result<Receiver<Interrupt>>
where
    F: FnOnce(SigSet, Sender<Interrupt>) -> io::Result<()>,
{
    let mut mask = SigSet::empty();
    mask.add(Signal::SIGINT);
    mask.thread_block()?;

    let (tx, rx) = unbounded();
    if let Err(e) = spawn(mask, tx) {
        mask.thread_unblock()?;
        return Err(anyhow!("failed to start interrupt listener: {e}"));
    }

    Ok(rx)
}

fn spawn_listener(mask: SigSet, tx: Sender<Interrupt>) -> io::Result<()> {
    thread::Builder::new()
        .name("interrupt-listener".to_string())
        .spawn(move || {
            loop {
                match mask.wait() {
                    Ok(signal) => {
                        trace!("listener received {}", signal.as_str());
                        if tx.send(Interrupt::new(signal)).is_err() {
                            debug!("interrupt receiver dropped, listener exiting");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("sigwait failed, interrupts disabled: {e}");
                        break;
                    }
                }
            }
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_message_names_the_signal() {
        let err = Interrupted::from(Interrupt::new(Signal::SIGINT));
        assert_eq!(err.message(), "sleep interrupted by SIGINT");
        assert_eq!(err.to_string(), "sleep interrupted by SIGINT");
    }

    // Each test runs on its own thread, so blocking SIGINT here does not leak
    // into the rest of the harness.
    #[test]
    fn sigint_stays_blocked_once_the_listener_starts() {
        let rx = install(|_, _| Ok(())).unwrap();
        let mask = SigSet::thread_get_mask().unwrap();
        assert!(mask.contains(Signal::SIGINT));

        let mut sigint = SigSet::empty();
        sigint.add(Signal::SIGINT);
        sigint.thread_unblock().unwrap();
        drop(rx);
    }

    #[test]
    fn failed_spawn_restores_the_signal_mask() {
        let result = install(|_, _| Err(io::Error::other("thread limit reached")));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("thread limit reached"), "{err}");
        let mask = SigSet::thread_get_mask().unwrap();
        assert!(!mask.contains(Signal::SIGINT));
    }
}
