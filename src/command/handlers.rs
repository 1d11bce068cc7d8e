//! Command handlers - one per canonical command
//!
//! Handlers receive a validated [`Invocation`] and an [`ExecContext`]
//! borrowing the session and the host for exactly one call. They never
//! panic and never return `Err`; every failure is folded into an
//! [`ExecutionResult`] with a shell-style message naming the operand the
//! user typed (not the resolved absolute path).

use crate::command::registry::CommandRegistry;
use crate::core::config::TerminalConfig;
use crate::core::error::{ExecErrorKind, TerminalError};
use crate::core::types::{CommandError, Control, ErrorKind, ExecutionResult, Invocation};
use crate::host::{human_size, DirEntryInfo, DiskInfo, Host, ProcessInfo};
use crate::session::Session;
use std::path::Path;

/// Closed set of handler implementations, selected by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Pwd,
    Ls,
    Cd,
    Mkdir,
    Rm,
    Touch,
    Cat,
    Echo,
    Mv,
    Cp,
    Ps,
    Top,
    Df,
    History,
    Clear,
    Help,
    Exit,
}

/// Everything a handler may read or change during one execution
pub struct ExecContext<'a> {
    pub host: &'a dyn Host,
    pub session: &'a mut Session,
    pub registry: &'a CommandRegistry,
    pub config: &'a TerminalConfig,
}

impl Handler {
    pub fn execute(&self, invocation: Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
        match self {
            Handler::Pwd => ExecutionResult::ok(ctx.session.cwd.display().to_string()),
            Handler::Ls => ls(&invocation, ctx),
            Handler::Cd => cd(&invocation, ctx),
            Handler::Mkdir => mkdir(&invocation, ctx),
            Handler::Rm => rm(&invocation, ctx),
            Handler::Touch => touch(&invocation, ctx),
            Handler::Cat => cat(&invocation, ctx),
            Handler::Echo => ExecutionResult::ok(invocation.positional.join(" ")),
            Handler::Mv => mv(&invocation, ctx),
            Handler::Cp => cp(&invocation, ctx),
            Handler::Ps => ps(&invocation, ctx),
            Handler::Top => top(&invocation, ctx),
            Handler::Df => df(&invocation, ctx),
            Handler::History => history(&invocation, ctx),
            Handler::Clear => ExecutionResult::control(Control::Clear),
            Handler::Help => help(&invocation, ctx),
            Handler::Exit => ExecutionResult::control(Control::Exit),
        }
    }
}

/// `"{prefix}: {reason}"`, keeping the capability's error kind
fn operand_error(prefix: impl std::fmt::Display, err: &TerminalError) -> CommandError {
    match err {
        TerminalError::Execution { kind, .. } => CommandError {
            kind: ErrorKind::Execution(*kind),
            message: format!("{}: {}", prefix, kind),
        },
        other => CommandError {
            message: format!("{}: {}", prefix, other),
            ..CommandError::from(other)
        },
    }
}

fn single_failure(error: CommandError) -> ExecutionResult {
    ExecutionResult::failed(error.kind, error.message)
}

fn argument_failure(command: &str, message: impl Into<String>) -> ExecutionResult {
    ExecutionResult::from_error(&TerminalError::argument(command, message))
}

/// Output and errors gathered across several operands
///
/// `mkdir a b c` keeps going after `b` fails, like a shell does; the first
/// error decides the result kind and all messages are reported.
#[derive(Default)]
struct Outcome {
    output: String,
    errors: Vec<CommandError>,
}

impl Outcome {
    fn fail(&mut self, error: CommandError) {
        self.errors.push(error);
    }

    fn finish(self) -> ExecutionResult {
        let Some(first) = self.errors.first() else {
            return ExecutionResult::ok(self.output);
        };
        let message = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        ExecutionResult::failed(first.kind, message).with_output(self.output)
    }
}

fn ls(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let target = inv.positional.first().map(String::as_str).unwrap_or(".");
    let path = ctx.session.resolve_path(target);
    let long = inv.has_flag("l");

    match ctx.host.list_directory(&path, inv.has_flag("a"), long) {
        Ok(entries) => ExecutionResult::ok(format_listing(&entries, long)),
        // A plain file lists as itself
        Err(TerminalError::Execution {
            kind: ExecErrorKind::NotADirectory,
            ..
        }) => ExecutionResult::ok(target),
        Err(err) => single_failure(operand_error(format!("ls: cannot access '{}'", target), &err)),
    }
}

fn format_listing(entries: &[DirEntryInfo], long: bool) -> String {
    let display_name = |entry: &DirEntryInfo| {
        if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        }
    };

    if !long {
        return entries
            .iter()
            .map(display_name)
            .collect::<Vec<_>>()
            .join("  ");
    }

    entries
        .iter()
        .map(|entry| match &entry.details {
            Some(details) => {
                let modified = details
                    .modified
                    .map(|t| t.format("%b %d %H:%M").to_string())
                    .unwrap_or_else(|| "?".into());
                format!(
                    "{} {:>8} {:>12} {}",
                    details.permissions,
                    details.size,
                    modified,
                    display_name(entry)
                )
            }
            None => display_name(entry),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cd(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let (shown, path) = match inv.positional.first() {
        Some(arg) => (arg.clone(), ctx.session.resolve_path(arg)),
        None => match &ctx.session.home {
            Some(home) => ("~".to_string(), home.clone()),
            None => {
                return ExecutionResult::failed(
                    ErrorKind::Execution(ExecErrorKind::NotFound),
                    "cd: HOME not set",
                )
            }
        },
    };

    match ctx.host.change_directory(&path) {
        Ok(canonical) => {
            tracing::debug!(cwd = %canonical.display(), "working directory changed");
            ctx.session.cwd = canonical;
            ExecutionResult::empty()
        }
        Err(err) => single_failure(operand_error(format!("cd: {}", shown), &err)),
    }
}

fn mkdir(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let parents = inv.has_flag("p");
    let mut outcome = Outcome::default();
    for arg in &inv.positional {
        let path = ctx.session.resolve_path(arg);
        if let Err(err) = ctx.host.make_directory(&path, parents) {
            outcome.fail(operand_error(
                format!("mkdir: cannot create directory '{}'", arg),
                &err,
            ));
        }
    }
    outcome.finish()
}

/// `.` or `..` as the last component, however many slashes follow
fn names_dot_entry(arg: &str) -> bool {
    matches!(arg.trim_end_matches('/').rsplit('/').next(), Some("." | ".."))
}

fn rm(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let recursive = inv.has_flag("r");
    let force = inv.has_flag("f");
    let mut outcome = Outcome::default();
    for arg in &inv.positional {
        if names_dot_entry(arg) {
            outcome.fail(CommandError {
                kind: ErrorKind::Execution(ExecErrorKind::PermissionDenied),
                message: format!(
                    "rm: refusing to remove '.' or '..' directory: skipping '{}'",
                    arg
                ),
            });
            continue;
        }
        let path = ctx.session.resolve_path(arg);
        if path.parent().is_none() {
            outcome.fail(CommandError {
                kind: ErrorKind::Execution(ExecErrorKind::PermissionDenied),
                message: format!("rm: it is dangerous to operate recursively on '{}'", arg),
            });
            continue;
        }
        if let Err(err) = ctx.host.remove_entry(&path, recursive, force) {
            outcome.fail(operand_error(format!("rm: cannot remove '{}'", arg), &err));
        }
    }
    outcome.finish()
}

fn touch(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let mut outcome = Outcome::default();
    for arg in &inv.positional {
        let path = ctx.session.resolve_path(arg);
        if let Err(err) = ctx.host.touch_file(&path) {
            outcome.fail(operand_error(format!("touch: cannot touch '{}'", arg), &err));
        }
    }
    outcome.finish()
}

fn cat(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let mut outcome = Outcome::default();
    for arg in &inv.positional {
        let path = ctx.session.resolve_path(arg);
        match ctx.host.read_file(&path) {
            Ok(text) => outcome.output.push_str(&text),
            Err(err) => outcome.fail(operand_error(format!("cat: {}", arg), &err)),
        }
    }
    outcome.finish()
}

/// `(source, destination)` operands; arity is checked before handlers run
fn transfer_operands(inv: &Invocation) -> (&str, &str) {
    match inv.positional.as_slice() {
        [from, to, ..] => (from.as_str(), to.as_str()),
        [from] => (from.as_str(), ""),
        [] => ("", ""),
    }
}

fn source_missing(err: &TerminalError, source: &Path) -> bool {
    matches!(
        err,
        TerminalError::Execution { kind: ExecErrorKind::NotFound, path } if path == source
    )
}

fn mv(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let (from, to) = transfer_operands(inv);
    let source = ctx.session.resolve_path(from);
    let dest = ctx.session.resolve_path(to);

    match ctx.host.move_entry(&source, &dest) {
        Ok(_) => ExecutionResult::empty(),
        Err(err) if source_missing(&err, &source) => {
            single_failure(operand_error(format!("mv: cannot stat '{}'", from), &err))
        }
        Err(err) => single_failure(operand_error(
            format!("mv: cannot move '{}' to '{}'", from, to),
            &err,
        )),
    }
}

fn cp(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let (from, to) = transfer_operands(inv);
    let recursive = inv.has_flag("r");
    let source = ctx.session.resolve_path(from);
    let dest = ctx.session.resolve_path(to);

    match ctx.host.copy_entry(&source, &dest, recursive) {
        Ok(_) => ExecutionResult::empty(),
        Err(TerminalError::Execution {
            kind: ExecErrorKind::IsADirectory,
            ..
        }) if !recursive => ExecutionResult::failed(
            ErrorKind::Execution(ExecErrorKind::IsADirectory),
            format!("cp: -r not specified; omitting directory '{}'", from),
        ),
        Err(err) if source_missing(&err, &source) => {
            single_failure(operand_error(format!("cp: cannot stat '{}'", from), &err))
        }
        Err(TerminalError::Execution {
            kind: ExecErrorKind::SameFile,
            path,
        }) => {
            // Name the destination the way the user wrote it: `.` becomes `./a.txt`
            let shown = match path.file_name() {
                Some(name) if path != dest => Path::new(to).join(name).display().to_string(),
                _ => to.to_string(),
            };
            ExecutionResult::failed(
                ErrorKind::Execution(ExecErrorKind::SameFile),
                format!("cp: '{}' and '{}' are the same file", from, shown),
            )
        }
        Err(err) => single_failure(operand_error(
            format!("cp: cannot copy '{}' to '{}'", from, to),
            &err,
        )),
    }
}

fn ps(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    match ctx.host.list_processes(inv.has_flag("a")) {
        Ok(rows) => {
            let mut lines = vec![format!(
                "{:>7} {:<10} {:<10} {}",
                "PID", "USER", "STATE", "COMMAND"
            )];
            lines.extend(rows.iter().map(|row| {
                format!(
                    "{:>7} {:<10} {:<10} {}",
                    row.pid, row.owner, row.state, row.command
                )
            }));
            ExecutionResult::ok(lines.join("\n"))
        }
        Err(err) => single_failure(operand_error("ps", &err)),
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 * 100.0 / total as f64
    }
}

fn process_line(row: &ProcessInfo) -> String {
    format!(
        "{:>7} {:<10} {:>6.1} {:>8} {}",
        row.pid,
        row.owner,
        row.cpu_percent,
        human_size(row.memory_bytes),
        row.command
    )
}

fn top(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let rows = match inv.flag_value("n") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                return argument_failure("top", format!("invalid number of lines: '{}'", raw))
            }
        },
        None => ctx.config.display.top_rows,
    };

    let snapshot = match ctx.host.resource_snapshot(rows) {
        Ok(snapshot) => snapshot,
        Err(err) => return single_failure(operand_error("top", &err)),
    };

    let mut lines = vec![
        format!("CPU Usage: {:.1}%", snapshot.cpu_percent),
        format!(
            "Memory: {:.1}% used ({} / {})",
            percent(snapshot.memory_used, snapshot.memory_total),
            human_size(snapshot.memory_used),
            human_size(snapshot.memory_total)
        ),
        format!(
            "Swap: {:.1}% used ({} / {})",
            percent(snapshot.swap_used, snapshot.swap_total),
            human_size(snapshot.swap_used),
            human_size(snapshot.swap_total)
        ),
        String::new(),
        format!(
            "{:>7} {:<10} {:>6} {:>8} {}",
            "PID", "USER", "CPU%", "MEM", "COMMAND"
        ),
    ];
    lines.extend(snapshot.processes.iter().map(process_line));
    ExecutionResult::ok(lines.join("\n"))
}

fn disk_line(disk: &DiskInfo, human: bool) -> String {
    let amount = |bytes: u64| {
        if human {
            human_size(bytes)
        } else {
            (bytes / 1024).to_string()
        }
    };
    format!(
        "{:<20} {:>10} {:>10} {:>10} {:>4}% {}",
        disk.filesystem,
        amount(disk.size),
        amount(disk.used),
        amount(disk.available),
        disk.use_percent(),
        disk.mount_point.display()
    )
}

fn df(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    let human = inv.has_flag("h");
    match ctx.host.disk_usage() {
        Ok(disks) => {
            let size_header = if human { "Size" } else { "1K-blocks" };
            let mut lines = vec![format!(
                "{:<20} {:>10} {:>10} {:>10} {:>5} {}",
                "Filesystem", size_header, "Used", "Avail", "Use%", "Mounted on"
            )];
            lines.extend(disks.iter().map(|disk| disk_line(disk, human)));
            ExecutionResult::ok(lines.join("\n"))
        }
        Err(err) => single_failure(operand_error("df", &err)),
    }
}

fn history(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    if inv.has_flag("c") {
        ctx.session.history.clear();
        return ExecutionResult::empty();
    }

    let log = &ctx.session.history;
    let entries = match inv.positional.first() {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => log.last(n),
            Err(_) => {
                return argument_failure("history", format!("{}: numeric argument required", raw))
            }
        },
        None => log.entries(),
    };

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("{:>5}  {}", entry.sequence, entry.text))
        .collect();
    ExecutionResult::ok(lines.join("\n"))
}

fn help(inv: &Invocation, ctx: &mut ExecContext<'_>) -> ExecutionResult {
    if let Some(topic) = inv.positional.first() {
        return match ctx.registry.lookup(topic) {
            Ok(spec) => ExecutionResult::ok(format!("{}\nUsage: {}", spec.help(), spec.usage)),
            Err(_) => related_commands(ctx.registry, topic),
        };
    }

    let mut lines = vec!["Available commands:".to_string()];
    for name in ctx.registry.names() {
        if let Ok(spec) = ctx.registry.lookup(name) {
            lines.push(format!("  {:<8} {}", spec.name, spec.description));
        }
    }
    lines.push(String::new());
    lines.push("Type 'help <command>' for more information on a specific command.".into());
    lines.push("Type 'nlp help' for examples of natural language commands.".into());
    ExecutionResult::ok(lines.join("\n"))
}

/// `creating`, `create` and `creates` all reduce to `creat`
fn stem(word: &str) -> String {
    let word = word.to_lowercase();
    let base = word
        .strip_suffix("ing")
        .or_else(|| word.strip_suffix('s'))
        .unwrap_or(&word);
    base.strip_suffix('e').unwrap_or(base).to_string()
}

/// Commands whose name or description mentions `topic`
fn related_commands(registry: &CommandRegistry, topic: &str) -> ExecutionResult {
    let stem = stem(topic);
    let mut lines = Vec::new();
    if stem.len() >= 3 {
        for name in registry.names() {
            let Ok(spec) = registry.lookup(name) else {
                continue;
            };
            if spec.name.starts_with(&stem) || spec.description.to_lowercase().contains(&stem) {
                lines.push(format!("  {:<8} {}", spec.name, spec.description));
            }
        }
    }

    if lines.is_empty() {
        return ExecutionResult::failed(
            ErrorKind::Execution(ExecErrorKind::NotFound),
            format!("help: no help topics match '{}'", topic),
        );
    }
    lines.insert(0, format!("Commands related to '{}':", topic));
    ExecutionResult::ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FakeHost;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        host: FakeHost,
        session: Session,
        registry: CommandRegistry,
        config: TerminalConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let root = fs::canonicalize(tmp.path()).unwrap();
            let session = Session::new(root.clone()).with_home(root);
            Self {
                tmp,
                host: FakeHost::new(),
                session,
                registry: CommandRegistry::standard(),
                config: TerminalConfig::default(),
            }
        }

        fn run(&mut self, inv: Invocation) -> ExecutionResult {
            let handler = self.registry.lookup(&inv.command).unwrap().handler;
            let mut ctx = ExecContext {
                host: &self.host,
                session: &mut self.session,
                registry: &self.registry,
                config: &self.config,
            };
            handler.execute(inv, &mut ctx)
        }
    }

    fn inv(command: &str, args: &[&str]) -> Invocation {
        args.iter()
            .fold(Invocation::new(command), |inv, arg| inv.with_positional(*arg))
    }

    #[test]
    fn test_ls_dirs_first_with_slash() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.tmp.path().join("Projects")).unwrap();
        fs::write(fx.tmp.path().join("notes.txt"), "").unwrap();

        let result = fx.run(inv("ls", &[]));
        assert!(result.success);
        assert_eq!(result.output, "Projects/  notes.txt");
    }

    #[test]
    fn test_ls_missing_reports_operand() {
        let mut fx = Fixture::new();
        let result = fx.run(inv("ls", &["nope"]));
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Execution(ExecErrorKind::NotFound));
        assert_eq!(
            error.message,
            "ls: cannot access 'nope': No such file or directory"
        );
    }

    #[test]
    fn test_ls_long_has_permissions() {
        let mut fx = Fixture::new();
        fs::write(fx.tmp.path().join("a.txt"), "hello").unwrap();
        let result = fx.run(inv("ls", &[]).with_flag("l"));
        assert!(result.output.ends_with(" a.txt"));
        assert!(result.output.contains("       5 "));
    }

    #[test]
    fn test_cd_updates_session_only() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.tmp.path().join("sub")).unwrap();
        let before = std::env::current_dir().unwrap();

        let result = fx.run(inv("cd", &["sub"]));
        assert!(result.success);
        assert!(fx.session.cwd.ends_with("sub"));
        assert_eq!(std::env::current_dir().unwrap(), before);

        fx.run(inv("cd", &[]));
        assert_eq!(Some(&fx.session.cwd), fx.session.home.as_ref());
    }

    #[test]
    fn test_cd_into_file_fails() {
        let mut fx = Fixture::new();
        fs::write(fx.tmp.path().join("f"), "").unwrap();
        let result = fx.run(inv("cd", &["f"]));
        assert_eq!(result.error.unwrap().message, "cd: f: Not a directory");
    }

    #[test]
    fn test_mkdir_keeps_going_after_failure() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.tmp.path().join("b")).unwrap();

        let result = fx.run(inv("mkdir", &["a", "b", "c"]));
        assert!(!result.success);
        assert_eq!(
            result.error.unwrap().message,
            "mkdir: cannot create directory 'b': File exists"
        );
        assert!(fx.tmp.path().join("a").is_dir());
        assert!(fx.tmp.path().join("c").is_dir());
    }

    #[test]
    fn test_rm_not_empty_then_recursive() {
        let mut fx = Fixture::new();
        fs::create_dir_all(fx.tmp.path().join("d/inner")).unwrap();

        let result = fx.run(inv("rm", &["d"]));
        assert_eq!(
            result.error.unwrap().message,
            "rm: cannot remove 'd': Directory not empty"
        );
        assert!(fx.run(inv("rm", &["d"]).with_flag("r")).success);
        assert!(!fx.tmp.path().join("d").exists());
    }

    #[test]
    fn test_cat_concatenates_and_reports_missing() {
        let mut fx = Fixture::new();
        fs::write(fx.tmp.path().join("a"), "one\n").unwrap();
        fs::write(fx.tmp.path().join("b"), "two\n").unwrap();

        let result = fx.run(inv("cat", &["a", "missing", "b"]));
        assert_eq!(result.output, "one\ntwo\n");
        assert_eq!(
            result.error.unwrap().message,
            "cat: missing: No such file or directory"
        );
    }

    #[test]
    fn test_cat_directory() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.tmp.path().join("docs")).unwrap();
        let result = fx.run(inv("cat", &["docs"]));
        assert_eq!(result.error.unwrap().message, "cat: docs: Is a directory");
    }

    #[test]
    fn test_mv_missing_source() {
        let mut fx = Fixture::new();
        let result = fx.run(inv("mv", &["ghost", "x"]));
        assert_eq!(
            result.error.unwrap().message,
            "mv: cannot stat 'ghost': No such file or directory"
        );
    }

    #[test]
    fn test_cp_directory_without_recursive() {
        let mut fx = Fixture::new();
        fs::create_dir(fx.tmp.path().join("src")).unwrap();
        let result = fx.run(inv("cp", &["src", "dst"]));
        assert_eq!(
            result.error.unwrap().message,
            "cp: -r not specified; omitting directory 'src'"
        );
        assert!(fx.run(inv("cp", &["src", "dst"]).with_flag("r")).success);
        assert!(fx.tmp.path().join("dst").is_dir());
    }

    #[test]
    fn test_ps_filters_by_owner() {
        let mut fx = Fixture::new();
        let own = fx.run(inv("ps", &[]));
        assert_eq!(own.output.lines().count(), 3);
        assert!(own.output.lines().next().unwrap().contains("COMMAND"));

        let all = fx.run(inv("ps", &[]).with_flag("a"));
        assert_eq!(all.output.lines().count(), 5);
        assert!(all.output.contains("sshd"));
    }

    #[test]
    fn test_top_row_limit() {
        let mut fx = Fixture::new();
        let mut limited = inv("top", &[]);
        limited
            .flags
            .insert("n".into(), crate::core::types::FlagValue::Value("1".into()));
        let result = fx.run(limited);
        assert!(result.output.starts_with("CPU Usage: 18.5%"));
        assert!(result.output.contains("Swap: 0.0% used"));
        assert!(result.output.ends_with("nlterm"));
        assert!(!result.output.contains("sshd"));
    }

    #[test]
    fn test_top_rejects_bad_count() {
        let mut fx = Fixture::new();
        let mut bad = inv("top", &[]);
        bad.flags
            .insert("n".into(), crate::core::types::FlagValue::Value("lots".into()));
        let result = fx.run(bad);
        assert_eq!(result.exit_status(), 2);
    }

    #[test]
    fn test_df_human_units() {
        let mut fx = Fixture::new();
        let result = fx.run(inv("df", &[]).with_flag("h"));
        let row = result.output.lines().nth(1).unwrap();
        assert!(row.starts_with("/dev/sda1"));
        assert!(row.contains("100.0G"));
        assert!(row.contains("40%"));
    }

    #[test]
    fn test_history_last_and_clear() {
        let mut fx = Fixture::new();
        for line in ["ls", "pwd", "echo hi"] {
            fx.session.history.append(line);
        }
        let result = fx.run(inv("history", &["2"]));
        assert_eq!(result.output, "    2  pwd\n    3  echo hi");

        assert!(fx.run(inv("history", &[]).with_flag("c")).success);
        assert!(fx.session.history.is_empty());

        assert_eq!(fx.run(inv("history", &["x"])).exit_status(), 2);
    }

    #[test]
    fn test_help_topics() {
        let mut fx = Fixture::new();
        let listing = fx.run(inv("help", &[]));
        assert!(listing.output.starts_with("Available commands:"));
        assert!(listing.output.contains("  mkdir    Create new directories"));

        let topic = fx.run(inv("help", &["ls"]));
        assert_eq!(
            topic.output,
            "ls: List directory contents\nUsage: ls [-a|--all] [-l|--long] [DIR]"
        );

        assert!(!fx.run(inv("help", &["frobnicate"])).success);
    }

    #[test]
    fn test_help_related_topic() {
        let mut fx = Fixture::new();
        let result = fx.run(inv("help", &["creating"]));
        assert!(result.success);
        let lines: Vec<_> = result.output.lines().collect();
        assert_eq!(lines[0], "Commands related to 'creating':");
        assert!(lines[1].starts_with("  mkdir"));
        assert!(lines[2].starts_with("  touch"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_control_commands() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(inv("clear", &[])).control, Some(Control::Clear));
        assert_eq!(fx.run(inv("exit", &[])).control, Some(Control::Exit));
        assert_eq!(fx.run(inv("echo", &["a", "b"])).output, "a b");
    }
}
