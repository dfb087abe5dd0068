use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{QuizConfiguration, TimeLimit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMinutes { raw: String },
    InvalidEnv { name: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMinutes { raw } => {
                write!(f, "invalid --minutes value (expected 5, 10, 15 or 60): {raw}")
            }
            ArgsError::InvalidEnv { name, raw } => write!(f, "invalid {name} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_flag_env(name: &'static str, raw: &str) -> Result<bool, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ArgsError::InvalidEnv {
            name,
            raw: raw.to_string(),
        }),
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--bank <path>] [--minutes <5|10|15|60>] [--randomize|--ordered] [--strict] [-v]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in question bank, 5 minutes, questions in bank order");
    eprintln!();
    eprintln!("During the quiz:");
    eprintln!("  <key>   answer with an option key (e.g. A)");
    eprintln!("  Enter   next question once answered (also: n, next)");
    eprintln!("  q       quit (also: quit)");
    eprintln!("  A question's own option keys take precedence over n, q and h.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_PATH, QUIZ_TIME_LIMIT, QUIZ_RANDOMIZE, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub bank_path: Option<PathBuf>,
    pub time_limit: TimeLimit,
    pub randomize: bool,
    pub strict: bool,
    pub verbosity: u8,
}

impl Args {
    #[must_use]
    pub fn config(&self) -> QuizConfiguration {
        QuizConfiguration::new(self.time_limit, self.randomize)
    }

    /// Parse process arguments with `QUIZ_*` environment defaults.
    pub fn parse() -> Result<Command, ArgsError> {
        Self::parse_from(std::env::args().skip(1), |name| std::env::var(name).ok())
    }

    /// Parse `args`, reading defaults through `env`. Flags win over environment.
    pub fn parse_from(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, ArgsError> {
        let mut bank_path = env("QUIZ_BANK_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut time_limit = match env("QUIZ_TIME_LIMIT") {
            Some(raw) => raw.parse::<TimeLimit>().map_err(|_| ArgsError::InvalidEnv {
                name: "QUIZ_TIME_LIMIT",
                raw,
            })?,
            None => TimeLimit::default(),
        };
        let mut randomize = match env("QUIZ_RANDOMIZE") {
            Some(raw) => parse_flag_env("QUIZ_RANDOMIZE", &raw)?,
            None => false,
        };
        let mut strict = false;
        let mut verbosity = 0_u8;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => bank_path = Some(PathBuf::from(require_value(&mut args, "--bank")?)),
                "--minutes" => {
                    let value = require_value(&mut args, "--minutes")?;
                    time_limit = value
                        .parse::<TimeLimit>()
                        .map_err(|_| ArgsError::InvalidMinutes { raw: value.clone() })?;
                }
                "--randomize" => randomize = true,
                "--ordered" => randomize = false,
                "--strict" => strict = true,
                "-v" => verbosity = verbosity.saturating_add(1),
                "-vv" => verbosity = verbosity.saturating_add(2),
                "-vvv" => verbosity = verbosity.saturating_add(3),
                "--help" | "-h" => return Ok(Command::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Command::Run(Self {
            bank_path,
            time_limit,
            randomize,
            strict,
            verbosity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run_args(command: Command) -> Args {
        match command {
            Command::Run(args) => args,
            Command::Help => panic!("expected run command"),
        }
    }

    #[test]
    fn defaults_without_flags() {
        let args = run_args(Args::parse_from(argv(&[]), no_env).unwrap());
        assert_eq!(args.bank_path, None);
        assert_eq!(args.time_limit, TimeLimit::FiveMinutes);
        assert!(!args.randomize);
        assert!(!args.strict);
    }

    #[test]
    fn flags_are_parsed() {
        let args = run_args(
            Args::parse_from(
                argv(&["--bank", "bank.json", "--minutes", "15", "--randomize", "--strict", "-v"]),
                no_env,
            )
            .unwrap(),
        );
        assert_eq!(args.bank_path, Some(PathBuf::from("bank.json")));
        assert_eq!(args.time_limit, TimeLimit::FifteenMinutes);
        assert!(args.randomize);
        assert!(args.strict);
        assert_eq!(args.verbosity, 1);
    }

    #[test]
    fn unsupported_minutes_are_rejected() {
        let err = Args::parse_from(argv(&["--minutes", "7"]), no_env).unwrap_err();
        assert_eq!(err, ArgsError::InvalidMinutes { raw: "7".into() });
    }

    #[test]
    fn missing_value_is_reported() {
        let err = Args::parse_from(argv(&["--bank"]), no_env).unwrap_err();
        assert_eq!(err, ArgsError::MissingValue { flag: "--bank" });
    }

    #[test]
    fn environment_supplies_defaults_and_flags_override() {
        let env = |name: &str| match name {
            "QUIZ_TIME_LIMIT" => Some("60".to_string()),
            "QUIZ_RANDOMIZE" => Some("yes".to_string()),
            _ => None,
        };
        let args = run_args(Args::parse_from(argv(&["--ordered"]), env).unwrap());
        assert_eq!(args.time_limit, TimeLimit::OneHour);
        assert!(!args.randomize);
    }

    #[test]
    fn invalid_environment_value_is_reported() {
        let env = |name: &str| (name == "QUIZ_TIME_LIMIT").then(|| "3".to_string());
        let err = Args::parse_from(argv(&[]), env).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidEnv { name: "QUIZ_TIME_LIMIT", .. }));
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(
            Args::parse_from(argv(&["--help", "--bogus"]), no_env).unwrap(),
            Command::Help
        );
    }
}
