//! The operation catalogue and each operation's parameter schema.

use raclient_types::RaError;
use std::fmt;

/// How a parameter's text is interpreted before a handler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Taken verbatim.
    Text,
    /// Hex digits decoded to a byte buffer.
    Hex,
    /// Decimal byte value.
    Decimal,
    /// Only presence matters; the value, even empty, is ignored.
    Flag,
}

/// One entry of an operation's parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
    }
}

const DEBUG_PARAMS: &[ParamSpec] = &[required("filename", ParamKind::Text)];

const TOKEN_STATUS_PARAMS: &[ParamSpec] = &[
    optional("print_cert", ParamKind::Flag),
    optional("print_private", ParamKind::Flag),
];

const TOKEN_SET_PARAMS: &[ParamSpec] = &[
    optional("cuid", ParamKind::Hex),
    optional("msn", ParamKind::Hex),
    optional("app_ver", ParamKind::Hex),
    optional("major_ver", ParamKind::Decimal),
    optional("minor_ver", ParamKind::Decimal),
    optional("key_info", ParamKind::Hex),
    optional("auth_key", ParamKind::Hex),
    optional("mac_key", ParamKind::Hex),
    optional("kek_key", ParamKind::Hex),
    optional("pin", ParamKind::Text),
    optional("life_cycle_state", ParamKind::Decimal),
];

const VAR_GET_PARAMS: &[ParamSpec] = &[required("name", ParamKind::Text)];

const VAR_SET_PARAMS: &[ParamSpec] = &[
    required("name", ParamKind::Text),
    required("value", ParamKind::Text),
];

/// Every operation the console understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Debug,
    Help,
    TokenSet,
    TokenStatus,
    VarGet,
    VarList,
    VarSet,
}

impl Operation {
    /// All operations, in the order `help` lists them.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Debug,
            Self::Help,
            Self::TokenSet,
            Self::TokenStatus,
            Self::VarGet,
            Self::VarList,
            Self::VarSet,
        ]
    }

    /// The name used after `op=`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Help => "help",
            Self::TokenSet => "token_set",
            Self::TokenStatus => "token_status",
            Self::VarGet => "var_get",
            Self::VarList => "var_list",
            Self::VarSet => "var_set",
        }
    }

    /// Source label written to the debug log for this operation.
    #[must_use]
    pub fn handler_name(self) -> &'static str {
        match self {
            Self::Debug => "op_debug",
            Self::Help => "op_help",
            Self::TokenSet => "op_token_set",
            Self::TokenStatus => "op_token_status",
            Self::VarGet => "op_var_get",
            Self::VarList => "op_var_list",
            Self::VarSet => "op_var_set",
        }
    }

    #[must_use]
    pub fn usage(self) -> &'static str {
        match self {
            Self::Debug => "op=debug filename=<filename> - enable debugging",
            Self::Help => "op=help",
            Self::TokenSet => {
                "op=token_set [cuid=<hex>] [msn=<hex>] [app_ver=<hex>] [major_ver=<n>] \
                 [minor_ver=<n>] [key_info=<hex>] [auth_key=<hex>] [mac_key=<hex>] \
                 [kek_key=<hex>] [pin=<pin>] [life_cycle_state=<n>] - Set Token Value"
            }
            Self::TokenStatus => "op=token_status [print_cert] [print_private] - Print Token Status",
            Self::VarGet => "op=var_get name=<name> - Get Value of Variable",
            Self::VarList => "op=var_list - List All Variables",
            Self::VarSet => "op=var_set name=<name> value=<value> - Set Value to Variable",
        }
    }

    /// The parameters this operation reads; anything else is ignored.
    #[must_use]
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::Debug => DEBUG_PARAMS,
            Self::TokenStatus => TOKEN_STATUS_PARAMS,
            Self::TokenSet => TOKEN_SET_PARAMS,
            Self::VarGet => VAR_GET_PARAMS,
            Self::VarSet => VAR_SET_PARAMS,
            Self::Help | Self::VarList => &[],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = RaError;

    /// Exact, case-sensitive match on the operation name.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::UnrecognizedOperation`] for any other string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| RaError::UnrecognizedOperation(s.to_string()))
    }
}
