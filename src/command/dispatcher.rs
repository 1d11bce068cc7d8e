//! Dispatcher - one input line in, one rendered response out
//!
//! Each cycle walks `Idle -> Resolving -> Executing -> Rendered -> Idle`.
//! Resolution picks between the intent resolver and literal parsing
//! according to [`NlpMode`]; execution looks the command up in the registry
//! and runs its handler against the session. Every error is caught here and
//! becomes a failed result, so a bad line never ends the session.

use crate::command::flags;
use crate::command::handlers::ExecContext;
use crate::command::registry::CommandRegistry;
use crate::command::tokenizer::tokenize;
use crate::core::config::{NlpMode, TerminalConfig};
use crate::core::error::{Result, TerminalError};
use crate::core::types::{Control, ExecutionResult, Invocation};
use crate::host::{Host, SystemHost};
use crate::nlp::{IntentResolver, Resolution, EXAMPLES};
use crate::session::Session;
use serde::Serialize;

/// Word that forces natural-language resolution of the rest of the line
pub const NLP_PREFIX: &str = "nlp";

/// Cycle phase, recorded on trace events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Resolving,
    Executing,
    Rendered,
}

/// What resolution produced for one line
enum Routed {
    Invoke(Invocation),
    /// `nlp`, `nlp help` or `nlp examples`
    Examples,
}

/// Rendered outcome of one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Command output, without a trailing newline
    pub output: String,
    /// Error message, if the command failed
    pub error: Option<String>,
    /// 0 on success, 1 execution failure, 2 usage error, 127 not found
    pub status: i32,
    pub control: Option<Control>,
}

impl Response {
    fn idle() -> Self {
        Self {
            output: String::new(),
            error: None,
            status: 0,
            control: None,
        }
    }

    fn from_result(result: ExecutionResult) -> Self {
        let status = result.exit_status();
        let mut output = result.output;
        if output.ends_with('\n') {
            output.pop();
        }
        Self {
            output,
            error: result.error.map(|e| e.message),
            status,
            control: result.control,
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Output followed by the error message, each on its own line
    pub fn render(&self) -> String {
        match (&self.error, self.output.is_empty()) {
            (None, _) => self.output.clone(),
            (Some(err), true) => err.clone(),
            (Some(err), false) => format!("{}\n{}", self.output, err),
        }
    }
}

/// Immutable after construction; sessions are passed in per call
pub struct Dispatcher<H: Host = SystemHost> {
    registry: CommandRegistry,
    resolver: IntentResolver,
    config: TerminalConfig,
    host: H,
}

impl Dispatcher<SystemHost> {
    /// Standard commands and rules against the real machine
    pub fn standard(config: TerminalConfig) -> Self {
        Self::new(
            CommandRegistry::standard(),
            IntentResolver::standard(),
            config,
            SystemHost::new(),
        )
    }
}

impl<H: Host> Dispatcher<H> {
    pub fn new(
        registry: CommandRegistry,
        resolver: IntentResolver,
        config: TerminalConfig,
        host: H,
    ) -> Self {
        Self {
            registry,
            resolver,
            config,
            host,
        }
    }

    /// Standard commands and rules against a caller-supplied host
    pub fn with_host(config: TerminalConfig, host: H) -> Self {
        Self::new(
            CommandRegistry::standard(),
            IntentResolver::standard(),
            config,
            host,
        )
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Run one input line against `session`
    pub fn dispatch(&self, session: &mut Session, raw: &str) -> Response {
        if raw.trim().is_empty() {
            return Response::idle();
        }

        let span = tracing::debug_span!("dispatch", session = %session.id);
        let _enter = span.enter();

        tracing::trace!(phase = ?Phase::Resolving, input = raw);
        let result = match self.route(raw) {
            Ok(Routed::Invoke(invocation)) => {
                tracing::trace!(phase = ?Phase::Executing, command = %invocation.command);
                self.execute(invocation, session)
            }
            Ok(Routed::Examples) => ExecutionResult::ok(examples_text()),
            Err(err) => {
                tracing::debug!(error = %err, "resolution failed");
                ExecutionResult::from_error(&err)
            }
        };

        // Failures and syntax errors are recorded too
        session.history.append(raw);

        let response = Response::from_result(result);
        tracing::trace!(phase = ?Phase::Rendered, status = response.status);
        response
    }

    fn route(&self, raw: &str) -> Result<Routed> {
        let trimmed = raw.trim();
        let first_word = trimmed.split_whitespace().next().unwrap_or_default();

        if first_word == NLP_PREFIX {
            let phrase = trimmed[NLP_PREFIX.len()..].trim();
            return match phrase {
                "" | "help" | "examples" => Ok(Routed::Examples),
                _ => self.resolve_phrase(phrase),
            };
        }

        match self.config.nlp.mode {
            NlpMode::Off => self.resolve_literal(raw),
            NlpMode::Only => self.resolve_phrase(trimmed),
            NlpMode::Optional => {
                if self.config.nlp.literal_command_guard && self.registry.contains(first_word) {
                    return self.resolve_guarded(raw, trimmed);
                }
                match self.resolver.resolve(trimmed)? {
                    Resolution::Matched { invocation, .. } => self.checked(invocation),
                    Resolution::NoMatch => {
                        tracing::debug!("no intent matched, falling back to literal parsing");
                        self.resolve_literal(raw)
                    }
                }
            }
        }
    }

    /// Literal parse for lines that start with a command name
    ///
    /// Intent rules only get a look when the literal form is a usage error,
    /// so `clear the screen` still clears while `echo show files` echoes.
    /// If no rule fits either, the literal error is the one reported.
    fn resolve_guarded(&self, raw: &str, trimmed: &str) -> Result<Routed> {
        match self.resolve_literal(raw) {
            Err(literal_err @ TerminalError::Argument { .. }) => {
                match self.resolver.resolve(trimmed) {
                    Ok(Resolution::Matched { rule, invocation }) => {
                        tracing::debug!(rule, "literal usage error, phrase rule matched instead");
                        self.checked(invocation).or(Err(literal_err))
                    }
                    _ => Err(literal_err),
                }
            }
            routed => routed,
        }
    }

    fn resolve_literal(&self, raw: &str) -> Result<Routed> {
        let tokens = tokenize(raw)?;
        let Some((name, args)) = tokens.split_first() else {
            return Err(TerminalError::Syntax {
                message: "empty command".into(),
                offset: 0,
            });
        };
        let spec = self.registry.lookup(name)?;
        Ok(Routed::Invoke(flags::parse(args, spec)?))
    }

    fn resolve_phrase(&self, phrase: &str) -> Result<Routed> {
        match self.resolver.resolve(phrase)? {
            Resolution::Matched { invocation, .. } => self.checked(invocation),
            Resolution::NoMatch => Err(TerminalError::NotUnderstood(phrase.to_string())),
        }
    }

    /// Intent rules build invocations directly, so arity is checked here
    fn checked(&self, invocation: Invocation) -> Result<Routed> {
        self.registry
            .lookup(&invocation.command)?
            .check_arity(&invocation)?;
        Ok(Routed::Invoke(invocation))
    }

    fn execute(&self, invocation: Invocation, session: &mut Session) -> ExecutionResult {
        let handler = match self.registry.lookup(&invocation.command) {
            Ok(spec) => spec.handler,
            Err(err) => return ExecutionResult::from_error(&err),
        };
        let mut ctx = ExecContext {
            host: &self.host,
            session,
            registry: &self.registry,
            config: &self.config,
        };
        handler.execute(invocation, &mut ctx)
    }
}

fn examples_text() -> String {
    let mut lines = vec!["Natural language examples:".to_string()];
    lines.extend(EXAMPLES.iter().map(|example| format!("  {}", example)));
    lines.join("\n")
}
