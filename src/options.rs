use clap::Parser;

#[derive(Debug, Default, Parser)]
#[command(
    name = "hello-cicd",
    about = "Demonstration program for exercising a CI/CD pipeline",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Options {
    /// Anything passed on the command line. Accepted and otherwise unused.
    #[arg(hide = true, num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

impl Options {
    /// Parse the process arguments. Never exits the process: if clap rejects
    /// the input we fall back to the defaults, since no argument may change
    /// the outcome of a run.
    pub fn from_args() -> Options {
        Options::try_parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments() {
        let options = Options::try_parse_from(["hello-cicd"]).unwrap();
        assert!(options.ignored.is_empty());
    }

    #[test]
    fn arguments_are_collected_not_interpreted() {
        let options =
            Options::try_parse_from(["hello-cicd", "build", "--release", "-v", "42"]).unwrap();
        assert_eq!(options.ignored, vec!["build", "--release", "-v", "42"]);
    }

    #[test]
    fn help_and_version_are_plain_arguments() {
        let options = Options::try_parse_from(["hello-cicd", "--help", "--version"]).unwrap();
        assert_eq!(options.ignored, vec!["--help", "--version"]);
    }
}
