//! Command registry - canonical name to spec and handler
//!
//! The registry is filled once at startup and never changes afterwards.
//! Lookups are exact and case-sensitive; aliases and synonyms are the
//! intent resolver's job, not the registry's.

use crate::command::handlers::Handler;
use crate::core::error::{Result, TerminalError};
use crate::core::types::Invocation;
use ahash::AHashMap;

/// One flag a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Key used in `Invocation::flags`
    pub name: &'static str,
    pub short: Option<char>,
    pub long: Option<&'static str>,
    pub takes_value: bool,
}

impl FlagSpec {
    /// Boolean flag with both a short and a long form
    pub const fn switch(name: &'static str, short: char, long: &'static str) -> Self {
        Self {
            name,
            short: Some(short),
            long: Some(long),
            takes_value: false,
        }
    }

    /// Flag that consumes the next token (or `--long=value`)
    pub const fn valued(name: &'static str, short: char, long: &'static str) -> Self {
        Self {
            name,
            short: Some(short),
            long: Some(long),
            takes_value: true,
        }
    }
}

/// Static description of a canonical command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub flags: &'static [FlagSpec],
    pub min_args: usize,
    /// `None` means unbounded
    pub max_args: Option<usize>,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn find_short(&self, c: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.short == Some(c))
    }

    pub fn find_long(&self, long: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.long == Some(long))
    }

    /// Check the positional count against `[min_args, max_args]`
    pub fn check_arity(&self, invocation: &Invocation) -> Result<()> {
        let count = invocation.positional.len();
        if count < self.min_args {
            let message = if self.min_args == 1 {
                "missing operand".to_string()
            } else {
                format!("expected at least {} arguments, got {}", self.min_args, count)
            };
            return Err(TerminalError::argument(self.name, message));
        }
        if let Some(max) = self.max_args {
            if count > max {
                let message = match max {
                    0 => format!("takes no arguments, got {}", count),
                    1 => format!("too many arguments (expected at most 1, got {})", count),
                    _ => format!("too many arguments (expected at most {}, got {})", max, count),
                };
                return Err(TerminalError::argument(self.name, message));
            }
        }
        Ok(())
    }

    /// One-line help: `name: description`
    pub fn help(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }
}

const LS_FLAGS: &[FlagSpec] = &[
    FlagSpec::switch("a", 'a', "all"),
    FlagSpec::switch("l", 'l', "long"),
];
const MKDIR_FLAGS: &[FlagSpec] = &[FlagSpec::switch("p", 'p', "parents")];
const RM_FLAGS: &[FlagSpec] = &[
    FlagSpec::switch("r", 'r', "recursive"),
    FlagSpec::switch("f", 'f', "force"),
];
const PS_FLAGS: &[FlagSpec] = &[FlagSpec::switch("a", 'a', "all")];
const TOP_FLAGS: &[FlagSpec] = &[FlagSpec::valued("n", 'n', "lines")];
const DF_FLAGS: &[FlagSpec] = &[FlagSpec::switch("h", 'h', "human-readable")];
const HISTORY_FLAGS: &[FlagSpec] = &[FlagSpec::switch("c", 'c', "clear")];
const CP_FLAGS: &[FlagSpec] = &[FlagSpec::switch("r", 'r', "recursive")];

/// Closed set of commands, keyed by canonical name
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    specs: AHashMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in standard_specs() {
            registry.register(spec);
        }
        registry
    }

    /// Register a command, replacing any earlier spec with the same name
    pub fn register(&mut self, spec: CommandSpec) -> Option<CommandSpec> {
        let replaced = self.specs.insert(spec.name, spec);
        if let Some(old) = &replaced {
            tracing::warn!(command = old.name, "replacing previously registered command");
        }
        replaced
    }

    pub fn lookup(&self, name: &str) -> Result<&CommandSpec> {
        self.specs
            .get(name)
            .ok_or_else(|| TerminalError::CommandNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Canonical names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.specs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn standard_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "pwd",
            description: "Print the current working directory",
            usage: "pwd",
            flags: &[],
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Pwd,
        },
        CommandSpec {
            name: "ls",
            description: "List directory contents",
            usage: "ls [-a|--all] [-l|--long] [DIR]",
            flags: LS_FLAGS,
            min_args: 0,
            max_args: Some(1),
            handler: Handler::Ls,
        },
        CommandSpec {
            name: "cd",
            description: "Change the current working directory",
            usage: "cd [DIR]",
            flags: &[],
            min_args: 0,
            max_args: Some(1),
            handler: Handler::Cd,
        },
        CommandSpec {
            name: "mkdir",
            description: "Create new directories",
            usage: "mkdir [-p|--parents] DIR...",
            flags: MKDIR_FLAGS,
            min_args: 1,
            max_args: None,
            handler: Handler::Mkdir,
        },
        CommandSpec {
            name: "rm",
            description: "Remove files or directories",
            usage: "rm [-r|--recursive] [-f|--force] PATH...",
            flags: RM_FLAGS,
            min_args: 1,
            max_args: None,
            handler: Handler::Rm,
        },
        CommandSpec {
            name: "touch",
            description: "Create empty files or update file timestamps",
            usage: "touch FILE...",
            flags: &[],
            min_args: 1,
            max_args: None,
            handler: Handler::Touch,
        },
        CommandSpec {
            name: "cat",
            description: "Concatenate and print files",
            usage: "cat FILE...",
            flags: &[],
            min_args: 1,
            max_args: None,
            handler: Handler::Cat,
        },
        CommandSpec {
            name: "echo",
            description: "Display a line of text",
            usage: "echo [TEXT]...",
            flags: &[],
            min_args: 0,
            max_args: None,
            handler: Handler::Echo,
        },
        CommandSpec {
            name: "mv",
            description: "Move or rename a file or directory",
            usage: "mv SOURCE DEST",
            flags: &[],
            min_args: 2,
            max_args: Some(2),
            handler: Handler::Mv,
        },
        CommandSpec {
            name: "cp",
            description: "Copy a file or directory",
            usage: "cp [-r|--recursive] SOURCE DEST",
            flags: CP_FLAGS,
            min_args: 2,
            max_args: Some(2),
            handler: Handler::Cp,
        },
        CommandSpec {
            name: "ps",
            description: "Report process status",
            usage: "ps [-a|--all]",
            flags: PS_FLAGS,
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Ps,
        },
        CommandSpec {
            name: "top",
            description: "Display system resource usage and processes",
            usage: "top [-n|--lines N]",
            flags: TOP_FLAGS,
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Top,
        },
        CommandSpec {
            name: "df",
            description: "Report file system disk space usage",
            usage: "df [-h|--human-readable]",
            flags: DF_FLAGS,
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Df,
        },
        CommandSpec {
            name: "history",
            description: "Display command history",
            usage: "history [-c|--clear] [N]",
            flags: HISTORY_FLAGS,
            min_args: 0,
            max_args: Some(1),
            handler: Handler::History,
        },
        CommandSpec {
            name: "clear",
            description: "Clear the terminal screen",
            usage: "clear",
            flags: &[],
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Clear,
        },
        CommandSpec {
            name: "help",
            description: "Display help information for commands",
            usage: "help [COMMAND]",
            flags: &[],
            min_args: 0,
            max_args: Some(1),
            handler: Handler::Help,
        },
        CommandSpec {
            name: "exit",
            description: "Exit the terminal",
            usage: "exit",
            flags: &[],
            min_args: 0,
            max_args: Some(0),
            handler: Handler::Exit,
        },
    ]
}
