use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_FILTER_ENV: &str = "HELLO_CICD_LOG";
const LOG_DIR_NAME: &str = "hello-cicd";
const LOG_FILE_NAME: &str = "hello-cicd.log";

/// Install the global subscriber when `HELLO_CICD_LOG` asks for it, logging
/// to a file under the user's cache directory.
///
/// Logging is opt-in: with the variable unset or blank nothing is installed
/// and no file is created. Standard output and error carry the program's own
/// lines, so records only ever go to the file. The caller must hold the
/// returned guard until exit so buffered records get flushed.
pub fn init() -> Option<WorkerGuard> {
    let directives = filter_directives(env::var(LOG_FILTER_ENV).ok())?;
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    let dir = resolve_cache_dir().ok()?.join(LOG_DIR_NAME);
    let appender = open_appender(&dir).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter)
        .try_init()
        .ok()?;

    tracing::info!(
        path = %dir.join(LOG_FILE_NAME).display(),
        filter = %directives,
        "logging initialized"
    );
    Some(guard)
}

fn filter_directives(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn open_appender(dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)?;
    Ok(appender)
}

fn resolve_cache_dir() -> Result<PathBuf> {
    let path = env::var_os("XDG_CACHE_HOME")
        .and_then(|p| {
            if p.is_empty() {
                None
            } else {
                Some(PathBuf::from(p))
            }
        })
        .or_else(dirs::cache_dir)
        .ok_or_else(|| anyhow!("Neither XDG_CACHE_HOME nor a home directory is available"))?;

    expand_home(&path)
}

fn expand_home(path: &Path) -> Result<PathBuf> {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
    {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("HOME is not set"))?;
        return Ok(home.join(rest));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_untouched() {
        let path = Path::new("/var/cache");
        assert_eq!(expand_home(path).unwrap(), PathBuf::from("/var/cache"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_home(Path::new("~/cache")).unwrap(),
            home.join("cache")
        );
    }

    #[test]
    fn logging_is_off_unless_requested() {
        assert_eq!(filter_directives(None), None);
        assert_eq!(filter_directives(Some(String::new())), None);
        assert_eq!(filter_directives(Some("  ".to_string())), None);
        assert_eq!(
            filter_directives(Some("hello_cicd=debug".to_string())),
            Some("hello_cicd=debug".to_string())
        );
    }
}
