//! Flag parsing against a command's declared option schema
//!
//! Strict by construction: any `-x` or `--name` the command does not declare is
//! rejected rather than passed through as a positional.

use crate::command::registry::{CommandSpec, FlagSpec};
use crate::core::error::{Result, TerminalError};
use crate::core::types::{FlagValue, Invocation};

/// Parse the argument tokens (command name excluded) into an `Invocation`
pub fn parse(tokens: &[String], spec: &CommandSpec) -> Result<Invocation> {
    let mut invocation = Invocation::new(spec.name);
    let mut iter = tokens.iter();
    let mut options_done = false;

    while let Some(token) = iter.next() {
        if options_done || token == "-" || !token.starts_with('-') {
            invocation.positional.push(token.clone());
            continue;
        }

        if token == "--" {
            options_done = true;
            continue;
        }

        if let Some(long) = token.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            let flag = spec.find_long(name).ok_or_else(|| {
                TerminalError::argument(spec.name, format!("unrecognized option '--{}'", name))
            })?;
            let value = match (flag.takes_value, inline_value) {
                (true, Some(value)) => FlagValue::Value(value.to_string()),
                (true, None) => take_value(&mut iter, spec, flag)?,
                (false, Some(_)) => {
                    return Err(TerminalError::argument(
                        spec.name,
                        format!("option '--{}' doesn't allow an argument", name),
                    ))
                }
                (false, None) => FlagValue::Present,
            };
            invocation.flags.insert(flag.name.to_string(), value);
            continue;
        }

        let cluster: Vec<char> = token[1..].chars().collect();
        if cluster.len() == 1 {
            let flag = lookup_short(spec, cluster[0])?;
            let value = if flag.takes_value {
                take_value(&mut iter, spec, flag)?
            } else {
                FlagValue::Present
            };
            invocation.flags.insert(flag.name.to_string(), value);
            continue;
        }

        // Clusters like `-la` only expand when every member is boolean
        for c in cluster {
            let flag = lookup_short(spec, c)?;
            if flag.takes_value {
                return Err(TerminalError::argument(
                    spec.name,
                    format!(
                        "option '-{}' requires an argument and cannot be combined in '{}'",
                        c, token
                    ),
                ));
            }
            invocation.flags.insert(flag.name.to_string(), FlagValue::Present);
        }
    }

    spec.check_arity(&invocation)?;
    Ok(invocation)
}

fn lookup_short(spec: &CommandSpec, c: char) -> Result<&FlagSpec> {
    spec.find_short(c)
        .ok_or_else(|| TerminalError::argument(spec.name, format!("invalid option -- '{}'", c)))
}

fn take_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    spec: &CommandSpec,
    flag: &FlagSpec,
) -> Result<FlagValue> {
    iter.next()
        .map(|v| FlagValue::Value(v.clone()))
        .ok_or_else(|| {
            TerminalError::argument(
                spec.name,
                format!("option '{}' requires an argument", display_flag(flag)),
            )
        })
}

fn display_flag(flag: &FlagSpec) -> String {
    match (flag.short, flag.long) {
        (Some(c), _) => format!("-{}", c),
        (None, Some(long)) => format!("--{}", long),
        (None, None) => flag.name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::registry::CommandRegistry;
    use proptest::prelude::*;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn spec(name: &str) -> CommandSpec {
        CommandRegistry::standard().lookup(name).unwrap().clone()
    }

    #[test]
    fn test_parse_separate_short_flags() {
        let inv = parse(&toks(&["-l", "-a", "/tmp"]), &spec("ls")).unwrap();
        assert_eq!(inv.command, "ls");
        assert_eq!(inv.flags.get("l"), Some(&FlagValue::Present));
        assert_eq!(inv.flags.get("a"), Some(&FlagValue::Present));
        assert_eq!(inv.flags.len(), 2);
        assert_eq!(inv.positional, vec!["/tmp".to_string()]);
    }

    #[test]
    fn test_parse_cluster() {
        let inv = parse(&toks(&["-la"]), &spec("ls")).unwrap();
        assert!(inv.has_flag("l"));
        assert!(inv.has_flag("a"));
        assert!(inv.positional.is_empty());
    }

    #[test]
    fn test_parse_long_form_maps_to_same_key() {
        let inv = parse(&toks(&["--all", "docs"]), &spec("ls")).unwrap();
        assert!(inv.has_flag("a"));
        assert_eq!(inv.positional, vec!["docs".to_string()]);
    }

    #[test]
    fn test_unknown_short_flag_rejected() {
        let err = parse(&toks(&["-x"]), &spec("ls")).unwrap_err();
        assert!(matches!(err, TerminalError::Argument { .. }));
        assert_eq!(err.to_string(), "ls: invalid option -- 'x'");
    }

    #[test]
    fn test_unknown_long_flag_rejected() {
        let err = parse(&toks(&["--color"]), &spec("ls")).unwrap_err();
        assert_eq!(err.to_string(), "ls: unrecognized option '--color'");
    }

    #[test]
    fn test_unknown_letter_in_cluster_rejected() {
        assert!(parse(&toks(&["-lz"]), &spec("ls")).is_err());
    }

    #[test]
    fn test_value_flag_separate_and_inline() {
        let inv = parse(&toks(&["-n", "5"]), &spec("top")).unwrap();
        assert_eq!(inv.flag_value("n"), Some("5"));

        let inv = parse(&toks(&["--lines=7"]), &spec("top")).unwrap();
        assert_eq!(inv.flag_value("n"), Some("7"));
    }

    #[test]
    fn test_value_flag_missing_value() {
        let err = parse(&toks(&["-n"]), &spec("top")).unwrap_err();
        assert!(err.to_string().contains("requires an argument"));
    }

    #[test]
    fn test_value_flag_in_cluster_rejected() {
        let mut top = spec("top");
        const FLAGS: &[FlagSpec] = &[
            FlagSpec::switch("a", 'a', "all"),
            FlagSpec::valued("n", 'n', "lines"),
        ];
        top.flags = FLAGS;
        let err = parse(&toks(&["-an", "3"]), &top).unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_boolean_long_flag_with_value_rejected() {
        assert!(parse(&toks(&["--all=yes"]), &spec("ls")).is_err());
    }

    #[test]
    fn test_double_dash_ends_options() {
        let inv = parse(&toks(&["-r", "--", "-weird-name"]), &spec("rm")).unwrap();
        assert!(inv.has_flag("r"));
        assert_eq!(inv.positional, vec!["-weird-name".to_string()]);
    }

    #[test]
    fn test_positional_order_preserved() {
        let inv = parse(&toks(&["b", "-p", "a", "c"]), &spec("mkdir")).unwrap();
        assert_eq!(inv.positional, toks(&["b", "a", "c"]));
        assert!(inv.has_flag("p"));
    }

    #[test]
    fn test_arity_enforced() {
        let err = parse(&toks(&["a", "b"]), &spec("ls")).unwrap_err();
        assert!(err.to_string().contains("too many arguments"));

        let err = parse(&toks(&["-p"]), &spec("mkdir")).unwrap_err();
        assert_eq!(err.to_string(), "mkdir: missing operand");
    }

    proptest! {
        #[test]
        fn prop_plain_words_become_positionals(words in prop::collection::vec("[a-z0-9._]{1,8}", 1..6)) {
            let inv = parse(&words, &spec("echo")).unwrap();
            prop_assert!(inv.flags.is_empty());
            prop_assert_eq!(inv.positional, words);
        }
    }
}
