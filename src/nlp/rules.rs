//! Ordered intent rules
//!
//! A rule fires when all of its trigger words appear in the phrase, in any
//! order. Rules are tried in table order and the first one that fires wins,
//! so specific rules (`create` + `folder`) must sit above general ones
//! (`create`). Tests pin the winner for every overlap that matters.

use crate::nlp::phrase::Phrase;

/// How a matched rule turns the phrase into arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// No arguments
    Nothing,
    /// Synthesize one boolean flag, no arguments
    Flag(&'static str),
    /// Words after the last trigger, fillers trimmed
    Remainder { required: bool, what: &'static str },
    /// `<source> to <destination>`; adds `-r` when the phrase names a folder
    Transfer { recursive_for_dirs: bool },
    /// Like a required remainder, adding `-r` when the phrase names a folder
    Removal,
    /// First meaningful word after the trigger, if any
    Topic,
}

/// Arguments pulled out of a phrase by an extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub flags: Vec<&'static str>,
    pub positional: Vec<String>,
}

impl Extractor {
    /// Extract arguments, or explain why the phrase is malformed
    pub fn extract(&self, phrase: &Phrase, anchor: usize) -> Result<Extracted, String> {
        match *self {
            Extractor::Nothing => Ok(Extracted::default()),
            Extractor::Flag(flag) => Ok(Extracted {
                flags: vec![flag],
                positional: Vec::new(),
            }),
            Extractor::Remainder { required, what } => match phrase.remainder_after(anchor) {
                Some(arg) => Ok(Extracted {
                    flags: Vec::new(),
                    positional: vec![arg],
                }),
                None if required => Err(format!("missing {}", what)),
                None => Ok(Extracted::default()),
            },
            Extractor::Transfer { recursive_for_dirs } => {
                let to = phrase
                    .position_after("to", anchor)
                    .ok_or_else(|| "expected '<source> to <destination>'".to_string())?;
                let source = phrase
                    .argument(anchor + 1, to)
                    .ok_or_else(|| "missing source before 'to'".to_string())?;
                let dest = phrase
                    .remainder_after(to)
                    .ok_or_else(|| "missing destination after 'to'".to_string())?;
                let mut flags = Vec::new();
                if recursive_for_dirs && names_directory(phrase) {
                    flags.push("r");
                }
                Ok(Extracted {
                    flags,
                    positional: vec![source, dest],
                })
            }
            Extractor::Removal => {
                let target = phrase
                    .remainder_after(anchor)
                    .ok_or_else(|| "missing file or directory to remove".to_string())?;
                let flags = if names_directory(phrase) { vec!["r"] } else { Vec::new() };
                Ok(Extracted {
                    flags,
                    positional: vec![target],
                })
            }
            Extractor::Topic => Ok(Extracted {
                flags: Vec::new(),
                positional: phrase.first_word_after(anchor).into_iter().collect(),
            }),
        }
    }
}

fn names_directory(phrase: &Phrase) -> bool {
    ["folder", "directory", "dir"].iter().any(|w| phrase.contains(w))
}

/// One phrase pattern mapped to a canonical command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub name: &'static str,
    /// Whole words that must all appear, order-insensitive
    pub triggers: &'static [&'static str],
    pub command: &'static str,
    pub extractor: Extractor,
}

impl IntentRule {
    pub const fn new(
        name: &'static str,
        triggers: &'static [&'static str],
        command: &'static str,
        extractor: Extractor,
    ) -> Self {
        Self {
            name,
            triggers,
            command,
            extractor,
        }
    }
}

const DIR_NAME: Extractor = Extractor::Remainder {
    required: true,
    what: "directory name",
};
const FILE_NAME: Extractor = Extractor::Remainder {
    required: true,
    what: "file name",
};
const OPTIONAL_PATH: Extractor = Extractor::Remainder {
    required: false,
    what: "path",
};

/// The built-in rule table, highest priority first
pub const STANDARD_RULES: &[IntentRule] = &[
    // Help topics first: "how to create a folder" is a question, not an order
    IntentRule::new("how-to", &["how", "to"], "help", Extractor::Topic),
    IntentRule::new("help", &["help"], "help", Extractor::Topic),
    // Directory creation before file creation and before the generic create
    IntentRule::new("create-folder", &["create", "folder"], "mkdir", DIR_NAME),
    IntentRule::new("create-directory", &["create", "directory"], "mkdir", DIR_NAME),
    IntentRule::new("make-folder", &["make", "folder"], "mkdir", DIR_NAME),
    IntentRule::new("make-directory", &["make", "directory"], "mkdir", DIR_NAME),
    IntentRule::new("new-folder", &["new", "folder"], "mkdir", DIR_NAME),
    IntentRule::new("create-file", &["create", "file"], "touch", FILE_NAME),
    IntentRule::new("make-file", &["make", "file"], "touch", FILE_NAME),
    IntentRule::new("touch-file", &["touch", "file"], "touch", FILE_NAME),
    IntentRule::new("new-file", &["new", "file"], "touch", FILE_NAME),
    IntentRule::new(
        "move",
        &["move"],
        "mv",
        Extractor::Transfer {
            recursive_for_dirs: false,
        },
    ),
    IntentRule::new(
        "rename",
        &["rename"],
        "mv",
        Extractor::Transfer {
            recursive_for_dirs: false,
        },
    ),
    IntentRule::new(
        "copy",
        &["copy"],
        "cp",
        Extractor::Transfer {
            recursive_for_dirs: true,
        },
    ),
    IntentRule::new("processes", &["processes"], "ps", Extractor::Nothing),
    IntentRule::new("system-usage", &["system", "usage"], "top", Extractor::Nothing),
    IntentRule::new("resource-usage", &["resource", "usage"], "top", Extractor::Nothing),
    IntentRule::new("memory-usage", &["memory", "usage"], "top", Extractor::Nothing),
    IntentRule::new("cpu-usage", &["cpu"], "top", Extractor::Nothing),
    IntentRule::new("disk", &["disk"], "df", Extractor::Flag("h")),
    IntentRule::new("storage", &["storage"], "df", Extractor::Flag("h")),
    IntentRule::new("clear-history", &["clear", "history"], "history", Extractor::Flag("c")),
    IntentRule::new("history", &["history"], "history", Extractor::Nothing),
    IntentRule::new("available-commands", &["available", "commands"], "help", Extractor::Nothing),
    IntentRule::new("list-commands", &["list", "commands"], "help", Extractor::Nothing),
    IntentRule::new("show-commands", &["show", "commands"], "help", Extractor::Nothing),
    IntentRule::new("what-commands", &["what", "commands"], "help", Extractor::Nothing),
    // Listing: "contents" (plural) lists, "content" (singular) reads
    IntentRule::new("show-files", &["show", "files"], "ls", OPTIONAL_PATH),
    IntentRule::new("list-files", &["list", "files"], "ls", OPTIONAL_PATH),
    IntentRule::new("list-contents", &["list", "contents"], "ls", OPTIONAL_PATH),
    IntentRule::new("show-contents", &["show", "contents"], "ls", OPTIONAL_PATH),
    IntentRule::new("what-files", &["what", "files"], "ls", OPTIONAL_PATH),
    IntentRule::new("list-directory", &["list", "directory"], "ls", OPTIONAL_PATH),
    IntentRule::new("list-folder", &["list", "folder"], "ls", OPTIONAL_PATH),
    IntentRule::new("show-content", &["show", "content"], "cat", FILE_NAME),
    IntentRule::new("read", &["read"], "cat", FILE_NAME),
    IntentRule::new("display-file", &["display", "file"], "cat", FILE_NAME),
    IntentRule::new("print-file", &["print", "file"], "cat", FILE_NAME),
    IntentRule::new("open-file", &["open", "file"], "cat", FILE_NAME),
    IntentRule::new("delete", &["delete"], "rm", Extractor::Removal),
    IntentRule::new("remove", &["remove"], "rm", Extractor::Removal),
    IntentRule::new("cd-to", &["cd", "to"], "cd", OPTIONAL_PATH),
    IntentRule::new("go-to", &["go", "to"], "cd", OPTIONAL_PATH),
    IntentRule::new("navigate-to", &["navigate", "to"], "cd", OPTIONAL_PATH),
    IntentRule::new("switch-to", &["switch", "to"], "cd", OPTIONAL_PATH),
    IntentRule::new("change-directory", &["change", "directory"], "cd", OPTIONAL_PATH),
    IntentRule::new("change-folder", &["change", "folder"], "cd", OPTIONAL_PATH),
    IntentRule::new("change-dir", &["change", "dir"], "cd", OPTIONAL_PATH),
    IntentRule::new("where-am-i", &["where", "am", "i"], "pwd", Extractor::Nothing),
    IntentRule::new("current-directory", &["current", "directory"], "pwd", Extractor::Nothing),
    IntentRule::new("current-folder", &["current", "folder"], "pwd", Extractor::Nothing),
    IntentRule::new("current-location", &["current", "location"], "pwd", Extractor::Nothing),
    IntentRule::new("working-directory", &["working", "directory"], "pwd", Extractor::Nothing),
    IntentRule::new("clear-screen", &["clear", "screen"], "clear", Extractor::Nothing),
    IntentRule::new("clear-terminal", &["clear", "terminal"], "clear", Extractor::Nothing),
    IntentRule::new("exit", &["exit"], "exit", Extractor::Nothing),
    IntentRule::new("close-terminal", &["close", "terminal"], "exit", Extractor::Nothing),
    IntentRule::new("quit", &["quit"], "exit", Extractor::Nothing),
    // Catch-all for "create notes.txt"; must stay last among create rules
    IntentRule::new("create", &["create"], "touch", FILE_NAME),
];

/// Phrases shown by `nlp help`
pub const EXAMPLES: &[&str] = &[
    "create a new folder called Projects",
    "make a new directory named Backup",
    "create a new file called notes.txt",
    "show files in Downloads",
    "list contents of the current directory",
    "what files are in Documents",
    "show content of file.txt",
    "read config.ini",
    "delete file temp.txt",
    "remove directory OldStuff",
    "move file report.pdf to Documents",
    "rename file old.txt to new.txt",
    "copy file important.docx to Backup",
    "change to directory Projects",
    "go to Documents",
    "show running processes",
    "display system usage",
    "show disk space",
    "where is my current location",
    "show command history",
    "list available commands",
    "help with creating files",
    "clear the screen",
    "exit terminal",
];
