//! Typed arguments produced by validating a parameter set against a schema.

use raclient_types::{Buffer, DecodePolicy, ParameterSet, RaError, Result, codec};

use crate::operation::{Operation, ParamKind};

/// A parameter after conversion according to its [`ParamKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Bytes(Buffer),
    Number(u8),
    Flag,
}

/// Validated arguments for one operation.
///
/// Holds only parameters named in the operation's schema, already decoded.
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<(&'static str, ArgValue)>,
}

impl Args {
    /// Checks `params` against `op`'s schema and converts every present value.
    ///
    /// Required parameters are checked first, in schema order, so a missing
    /// parameter is reported before any malformed one.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::MissingParameter`] for an absent required parameter
    /// and [`RaError::MalformedInput`] for a value `policy` rejects.
    pub fn validate(op: Operation, params: &ParameterSet, policy: DecodePolicy) -> Result<Self> {
        let schema = op.params();
        if let Some(missing) = schema.iter().find(|p| p.required && !params.contains(p.name)) {
            return Err(RaError::MissingParameter(missing.name.to_string()));
        }
        for name in params.names().filter(|n| schema.iter().all(|p| p.name != *n)) {
            tracing::debug!(op = %op, param = name, "ignoring unknown parameter");
        }

        let mut values = Vec::with_capacity(params.len());
        for param in schema {
            let Some(raw) = params.get(param.name) else {
                continue;
            };
            let value = match param.kind {
                ParamKind::Text => ArgValue::Text(raw.to_string()),
                ParamKind::Hex => ArgValue::Bytes(codec::decode(param.name, raw, policy)?),
                ParamKind::Decimal => {
                    ArgValue::Number(codec::parse_decimal(param.name, raw, policy)?)
                }
                ParamKind::Flag => ArgValue::Flag,
            };
            values.push((param.name, value));
        }
        Ok(Self { values })
    }

    fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ArgValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Like [`text`](Self::text) for a parameter the schema marks required.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::MissingParameter`] if `name` is absent.
    pub fn require_text(&self, name: &str) -> Result<&str> {
        self.text(name)
            .ok_or_else(|| RaError::MissingParameter(name.to_string()))
    }

    #[must_use]
    pub fn number(&self, name: &str) -> Option<u8> {
        match self.get(name) {
            Some(ArgValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Moves a decoded buffer out of the arguments.
    pub fn take_bytes(&mut self, name: &str) -> Option<Buffer> {
        let pos = self
            .values
            .iter()
            .position(|(n, v)| *n == name && matches!(v, ArgValue::Bytes(_)))?;
        match self.values.swap_remove(pos).1 {
            ArgValue::Bytes(buf) => Some(buf),
            _ => None,
        }
    }

    /// `true` when the parameter was supplied, whatever its value.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(op: Operation, params: &ParameterSet) -> Result<Args> {
        Args::validate(op, params, DecodePolicy::Strict)
    }

    #[test]
    fn test_missing_required() {
        let params = ParameterSet::new().with("value", "x");
        let err = strict(Operation::VarSet, &params).unwrap_err();
        assert!(matches!(err, RaError::MissingParameter(ref n) if n == "name"));
    }

    #[test]
    fn test_hex_and_decimal_decoded() {
        let params = ParameterSet::new()
            .with("cuid", "A0B1")
            .with("major_ver", "2")
            .with("pin", "secret");
        let mut args = strict(Operation::TokenSet, &params).unwrap();
        assert_eq!(args.number("major_ver"), Some(2));
        assert_eq!(args.text("pin"), Some("secret"));
        assert_eq!(args.take_bytes("cuid").unwrap().as_bytes(), &[0xa0, 0xb1]);
        assert!(args.take_bytes("cuid").is_none());
    }

    #[test]
    fn test_malformed_names_parameter() {
        let params = ParameterSet::new().with("cuid", "00").with("msn", "0");
        let err = strict(Operation::TokenSet, &params).unwrap_err();
        assert!(matches!(err, RaError::MalformedInput { ref param, .. } if param == "msn"));
    }

    #[test]
    fn test_lenient_policy_never_fails() {
        let params = ParameterSet::new().with("msn", "xyz").with("minor_ver", "abc");
        let args = Args::validate(Operation::TokenSet, &params, DecodePolicy::Lenient).unwrap();
        assert_eq!(args.number("minor_ver"), Some(0));
    }

    #[test]
    fn test_flag_presence_only() {
        let params = ParameterSet::new().with("print_cert", "");
        let args = strict(Operation::TokenStatus, &params).unwrap();
        assert!(args.flag("print_cert"));
        assert!(!args.flag("print_private"));
    }

    #[test]
    fn test_unknown_parameters_dropped() {
        let params = ParameterSet::new().with("colour", "blue");
        let args = strict(Operation::VarList, &params).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_require_text() {
        let args = strict(Operation::VarGet, &ParameterSet::new().with("name", "ra_uri")).unwrap();
        assert_eq!(args.require_text("name").unwrap(), "ra_uri");
        assert!(args.require_text("value").is_err());
    }
}
