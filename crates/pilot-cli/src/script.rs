//! Navigation scripts.
//!
//! One command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! push Home
//! push SignIn
//! back
//! pop-to Home inclusive
//! pop
//! ```
//!
//! Route names run to the end of the line, so `push Sign In` pushes the route
//! `"Sign In"`. For `pop-to`, a trailing `inclusive` word is the flag.

use std::fmt;

use thiserror::Error;

/// Errors raised while parsing a navigation script.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The first word of a line is not a known command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    /// A command that needs a route was given none.
    #[error("line {line}: '{command}' needs a route")]
    MissingRoute { line: usize, command: String },

    /// A command that takes no arguments was given some.
    #[error("line {line}: '{command}' takes no arguments, found '{argument}'")]
    UnexpectedArgument {
        line: usize,
        command: String,
        argument: String,
    },
}

/// Result type for script parsing.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// One step of a navigation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Push a route.
    Push(String),
    /// Pop the topmost route.
    Pop,
    /// Unwind to the first matching route.
    PopTo { route: String, inclusive: bool },
    /// The platform dismissed the deepest visible level.
    Back,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(route) => write!(f, "push {route}"),
            Self::Pop => f.write_str("pop"),
            Self::PopTo {
                route,
                inclusive: false,
            } => write!(f, "pop-to {route}"),
            Self::PopTo {
                route,
                inclusive: true,
            } => write!(f, "pop-to {route} inclusive"),
            Self::Back => f.write_str("back"),
        }
    }
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, raw)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parse one line; `Ok(None)` for blank lines and comments.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Command>> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (text, ""),
    };

    let command = match name {
        "push" => Command::Push(require_route(line, name, rest)?),
        "pop" => {
            reject_arguments(line, name, rest)?;
            Command::Pop
        }
        "pop-to" => {
            let (route, inclusive) = match rest.rsplit_once(char::is_whitespace) {
                Some((route, "inclusive")) => (route.trim(), true),
                _ => (rest, false),
            };
            Command::PopTo {
                route: require_route(line, name, route)?,
                inclusive,
            }
        }
        "back" => {
            reject_arguments(line, name, rest)?;
            Command::Back
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(Some(command))
}

fn require_route(line: usize, command: &str, route: &str) -> Result<String> {
    if route.is_empty() {
        Err(ScriptError::MissingRoute {
            line,
            command: command.to_string(),
        })
    } else {
        Ok(route.to_string())
    }
}

fn reject_arguments(line: usize, command: &str, rest: &str) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::UnexpectedArgument {
            line,
            command: command.to_string(),
            argument: rest.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let script = "push Start\n\n# go deeper\npush Sign In\npop-to Start inclusive\npop\nback\n";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            [
                Command::Push("Start".to_string()),
                Command::Push("Sign In".to_string()),
                Command::PopTo {
                    route: "Start".to_string(),
                    inclusive: true,
                },
                Command::Pop,
                Command::Back,
            ]
        );
    }

    #[test]
    fn test_pop_to_defaults_to_exclusive() {
        let command = parse_line(1, "pop-to Home").unwrap();
        assert_eq!(
            command,
            Some(Command::PopTo {
                route: "Home".to_string(),
                inclusive: false,
            })
        );
    }

    #[test]
    fn test_route_named_inclusive() {
        let command = parse_line(1, "pop-to inclusive").unwrap();
        assert_eq!(
            command,
            Some(Command::PopTo {
                route: "inclusive".to_string(),
                inclusive: false,
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = parse_script("push A\njump B\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown command 'jump'");
    }

    #[test]
    fn test_missing_route() {
        let err = parse_line(3, "push").unwrap_err();
        assert!(matches!(err, ScriptError::MissingRoute { line: 3, .. }));
    }

    #[test]
    fn test_unexpected_argument() {
        let err = parse_line(4, "pop now").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 4: 'pop' takes no arguments, found 'now'"
        );
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let command = Command::PopTo {
            route: "Home".to_string(),
            inclusive: true,
        };
        assert_eq!(parse_line(1, &command.to_string()).unwrap(), Some(command));
    }
}
