//! The console client: owns the token, the session variables and the debug
//! log, and routes each command to its handler.

use raclient_types::{
    CredentialStore, DecodePolicy, LifeCycleState, ParameterSet, RaError, Result, TokenRecord,
};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::args::Args;
use crate::command::Command;
use crate::console::Console;
use crate::debug::DebugSink;
use crate::operation::Operation;
use crate::vars::SessionVars;

/// Drives one token through console operations.
///
/// Operations run one at a time to completion. A failed operation reports on
/// the console and leaves the token and variables as they were.
#[derive(Debug)]
pub struct RaClient<W: Write = io::Stdout> {
    token: TokenRecord,
    vars: SessionVars,
    debug: DebugSink,
    console: Console<W>,
    policy: DecodePolicy,
}

impl RaClient<io::Stdout> {
    /// A client reporting to standard output.
    #[must_use]
    pub fn stdout(store: Arc<dyn CredentialStore>) -> Self {
        Self::new(store, Console::stdout())
    }
}

impl<W: Write> RaClient<W> {
    /// Creates a client with an empty token, default variables and no debug log.
    pub fn new(store: Arc<dyn CredentialStore>, console: Console<W>) -> Self {
        Self {
            token: TokenRecord::new(store),
            vars: SessionVars::new(),
            debug: DebugSink::new(),
            console,
            policy: DecodePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn token(&self) -> &TokenRecord {
        &self.token
    }

    #[must_use]
    pub fn vars(&self) -> &SessionVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut SessionVars {
        &mut self.vars
    }

    #[must_use]
    pub fn debug_sink(&self) -> &DebugSink {
        &self.debug
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Appends a line to the debug log, if one is open.
    ///
    /// Write failures are logged and otherwise ignored.
    pub fn trace(&mut self, source: &str, message: &str) {
        if let Err(e) = self.debug.write(source, message) {
            tracing::warn!(error = %e, "debug log write failed");
        }
    }

    /// Runs a parsed command. See [`dispatch`](Self::dispatch).
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        self.dispatch(&command.operation, &command.params)
    }

    /// Looks up `name`, validates `params` against its schema and runs the
    /// handler. Failures are also reported on the console.
    ///
    /// # Errors
    ///
    /// Returns the [`RaError`] that stopped the operation. The token and
    /// variables are unchanged when this happens. A failed `debug` has
    /// already closed the previous log file and leaves logging off.
    pub fn dispatch(&mut self, name: &str, params: &ParameterSet) -> Result<()> {
        let result = self.try_dispatch(name, params);
        if let Err(e) = &result {
            tracing::warn!(op = name, error = %e, "operation failed");
            self.report_error(e);
        }
        result
    }

    /// Writes `error: <e>` to the console.
    pub fn report_error(&mut self, e: &RaError) {
        if let Err(report) = self.console.line(format_args!("error: {e}")) {
            tracing::error!(error = %report, "cannot report failure");
        }
    }

    fn try_dispatch(&mut self, name: &str, params: &ParameterSet) -> Result<()> {
        let op: Operation = name.parse()?;
        self.trace(op.handler_name(), &describe(params));
        let args = Args::validate(op, params, self.policy)?;
        tracing::debug!(op = %op, args = args.len(), "dispatching");
        match op {
            Operation::Help => self.op_help(),
            Operation::Debug => self.op_debug(&args),
            Operation::TokenStatus => self.op_token_status(&args),
            Operation::TokenSet => {
                self.op_token_set(args);
                Ok(())
            }
            Operation::VarGet => self.op_var_get(&args),
            Operation::VarSet => self.op_var_set(&args),
            Operation::VarList => self.op_var_list(),
        }
    }

    // ── Handlers ─────────────────────────────────────────────────────────

    fn op_help(&mut self) -> Result<()> {
        self.console.line("Available Operations:")?;
        for op in Operation::all() {
            self.console.line(op.usage())?;
        }
        Ok(())
    }

    fn op_debug(&mut self, args: &Args) -> Result<()> {
        let filename = args.require_text("filename")?;
        self.debug.open(Path::new(filename))?;
        self.console.line(format_args!("debug: '{filename}'"))
    }

    fn op_token_status(&mut self, args: &Args) -> Result<()> {
        for line in self.token.status().lines() {
            self.console.line(line)?;
        }
        if args.flag("print_cert") {
            for i in 0..self.token.certificate_count() {
                let cert = self.token.certificate(i)?;
                self.console
                    .line(format_args!("Certificate #{}: '{}'", cert.index, cert.nickname))?;
            }
        }
        if args.flag("print_private") {
            for i in 0..self.token.private_key_count() {
                let key = self.token.private_key(i)?;
                self.console
                    .line(format_args!("Private Key #{}: '{}'", key.index, key.nickname))?;
            }
        }
        Ok(())
    }

    /// Every value was decoded during validation, so applying cannot fail
    /// part-way.
    fn op_token_set(&mut self, mut args: Args) {
        let token = &mut self.token;
        if let Some(cuid) = args.take_bytes("cuid") {
            token.set_cuid(cuid);
        }
        if let Some(msn) = args.take_bytes("msn") {
            token.set_msn(msn);
        }
        if let Some(version) = args.take_bytes("app_ver") {
            token.set_applet_version(version);
        }
        if let Some(major) = args.number("major_ver") {
            token.set_major_version(major);
        }
        if let Some(minor) = args.number("minor_ver") {
            token.set_minor_version(minor);
        }
        if let Some(key_info) = args.take_bytes("key_info") {
            token.set_key_info(key_info);
        }
        if let Some(key) = args.take_bytes("auth_key") {
            token.set_auth_key(key);
        }
        if let Some(key) = args.take_bytes("mac_key") {
            token.set_mac_key(key);
        }
        if let Some(key) = args.take_bytes("kek_key") {
            token.set_kek_key(key);
        }
        if let Some(pin) = args.text("pin") {
            token.set_pin(pin);
        }
        if let Some(state) = args.number("life_cycle_state") {
            token.set_life_cycle_state(LifeCycleState(state));
        }
    }

    fn op_var_get(&mut self, args: &Args) -> Result<()> {
        let name = args.require_text("name")?;
        match self.vars.get(name) {
            Some(value) => self.console.line(format_args!("{name}: '{value}'")),
            None => self.console.line(format_args!("{name}: not found")),
        }
    }

    fn op_var_set(&mut self, args: &Args) -> Result<()> {
        let name = args.require_text("name")?;
        let value = args.require_text("value")?;
        // echo first so a console failure leaves the variable untouched
        self.console.line(format_args!("{name}: '{value}'"))?;
        self.vars.set(name, value);
        Ok(())
    }

    fn op_var_list(&mut self) -> Result<()> {
        for (name, value) in self.vars.iter() {
            self.console.line(format_args!("{name}: '{value}'"))?;
        }
        Ok(())
    }
}

/// Debug log message for a dispatch: parameter names only, never values.
fn describe(params: &ParameterSet) -> String {
    if params.is_empty() {
        "no parameters".to_string()
    } else {
        params.names().collect::<Vec<_>>().join(" ")
    }
}
