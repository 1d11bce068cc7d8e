//! Resolve free-form phrases to canonical invocations
//!
//! Three outcomes are kept distinct:
//! - `Resolution::Matched` when a rule fired and its arguments extracted;
//! - `Resolution::NoMatch` when no rule fired;
//! - `Err(TerminalError::Argument)` when a rule fired but the phrase is
//!   malformed (e.g. "move report.pdf" with no destination).
//!
//! Callers use the last one to report a targeted error instead of falling
//! back to literal parsing.

use crate::core::error::{Result, TerminalError};
use crate::core::types::{FlagValue, Invocation};
use crate::nlp::phrase::Phrase;
use crate::nlp::rules::{IntentRule, STANDARD_RULES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        /// Name of the rule that fired
        rule: &'static str,
        invocation: Invocation,
    },
    NoMatch,
}

impl Resolution {
    pub fn invocation(&self) -> Option<&Invocation> {
        match self {
            Resolution::Matched { invocation, .. } => Some(invocation),
            Resolution::NoMatch => None,
        }
    }
}

/// Ordered rule table; first full match wins
#[derive(Debug, Clone)]
pub struct IntentResolver {
    rules: Vec<IntentRule>,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl IntentResolver {
    /// Resolver with no rules; everything is `NoMatch`
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
        }
    }

    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Append a rule at the lowest priority
    pub fn register(&mut self, rule: IntentRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// The first rule whose triggers all appear, with its anchor index
    pub fn first_match(&self, phrase: &Phrase) -> Option<(&IntentRule, usize)> {
        self.rules
            .iter()
            .find_map(|rule| phrase.match_all(rule.triggers).map(|anchor| (rule, anchor)))
    }

    pub fn resolve(&self, raw: &str) -> Result<Resolution> {
        let phrase = Phrase::new(raw);
        if phrase.is_empty() {
            return Ok(Resolution::NoMatch);
        }

        let Some((rule, anchor)) = self.first_match(&phrase) else {
            tracing::debug!(phrase = %phrase.normalized(), "no intent rule matched");
            return Ok(Resolution::NoMatch);
        };

        let extracted = rule
            .extractor
            .extract(&phrase, anchor)
            .map_err(|message| TerminalError::argument(rule.command, message))?;

        let mut invocation = Invocation::new(rule.command);
        for flag in extracted.flags {
            invocation.flags.insert(flag.to_string(), FlagValue::Present);
        }
        invocation.positional = extracted.positional;

        tracing::debug!(
            rule = rule.name,
            command = rule.command,
            args = ?invocation.positional,
            "intent resolved"
        );
        Ok(Resolution::Matched {
            rule: rule.name,
            invocation,
        })
    }
}
