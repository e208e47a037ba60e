use anyhow::Result;
use hello_cicd::{
    interrupt,
    logging,
    options::Options,
    platform::PlatformInfo,
    runner::{Runner, RunnerConfig},
};
use tracing::{debug, warn};

fn main() -> Result<()> {
    let options = Options::from_args();

    // before logging, so SIGINT is already blocked when its worker thread spawns
    let interrupts = interrupt::listen();
    let _log_guard = logging::init();

    if !options.ignored.is_empty() {
        debug!(args = ?options.ignored, "ignoring command line arguments");
    }

    let platform = PlatformInfo::query();
    let runner = match interrupts {
        Ok(rx) => Runner::new(RunnerConfig::default(), platform, rx),
        Err(e) => {
            warn!("interrupt listener unavailable, pauses cannot be interrupted: {e:#}");
            Runner::uninterruptible(RunnerConfig::default(), platform)
        }
    };

    runner.run()
}
