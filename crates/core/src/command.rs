//! Console command syntax: `op=<operation> name=value flag ...`.

use raclient_types::{ParameterSet, RaError, Result};

/// Key that carries the operation name.
pub const OP_KEY: &str = "op";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operation: String,
    pub params: ParameterSet,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns [`RaError::MissingParameter`] if the line has no `op=` token.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    parse_tokens(line.split_whitespace()).map(Some)
}

/// Parses already-split tokens, e.g. process arguments.
///
/// A token without `=` is a parameter with an empty value.
///
/// # Errors
///
/// Returns [`RaError::MissingParameter`] if no token is `op=<name>`.
pub fn parse_tokens<'a, I>(tokens: I) -> Result<Command>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut operation = None;
    let mut params = ParameterSet::new();
    for token in tokens {
        let (name, value) = token.split_once('=').unwrap_or((token, ""));
        if name == OP_KEY {
            operation = Some(value.to_string());
        } else {
            params.insert(name, value);
        }
    }
    let operation = operation.ok_or_else(|| RaError::MissingParameter(OP_KEY.to_string()))?;
    Ok(Command { operation, params })
}
