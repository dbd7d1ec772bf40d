//! Human-readable rendering of [`ConfigError`] for terminals.

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

/// Renders a config error, colored when stderr is a terminal and
/// `NO_COLOR` is unset.
pub struct ErrorFormatter {
    error: ConfigError,
    colored: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        let colored = std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr);
        Self { error, colored }
    }

    pub fn plain(error: ConfigError) -> Self {
        Self {
            error,
            colored: false,
        }
    }

    pub fn error(&self) -> &ConfigError {
        &self.error
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = "error:";
        if self.colored {
            write!(f, "{} ", mark.red().bold())?;
        } else {
            write!(f, "{} ", mark)?;
        }

        match &self.error {
            ConfigError::UnknownChoice {
                field,
                value,
                options,
                suggestion,
            } if self.colored => {
                write!(
                    f,
                    "'{}' is not a valid {}\n  options: {}",
                    value.yellow(),
                    field.cyan(),
                    options.join(", ")
                )?;
                if let Some(s) = suggestion {
                    write!(f, "\n  did you mean '{}'?", s.green())?;
                }
                Ok(())
            }
            ConfigError::UnknownChoice {
                suggestion: Some(s),
                ..
            } => write!(f, "{}\n  did you mean '{}'?", self.error, s),
            ConfigError::Invalid { field, message } if self.colored => {
                write!(f, "{}: {}", field.cyan(), message)
            }
            ConfigError::Parse {
                line: Some(line), ..
            } => write!(f, "{} (line {})", self.error, line),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}
