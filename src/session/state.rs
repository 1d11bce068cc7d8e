//! Per-session mutable state
//!
//! Everything a dispatch cycle may change lives here: the working directory
//! and the history log. Sessions never share it; the dispatcher borrows it
//! mutably for exactly one cycle at a time.

use crate::session::history::HistoryLog;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for a terminal session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// Absolute working directory
    pub cwd: PathBuf,
    /// Target of `cd` with no argument and of `~` expansion
    pub home: Option<PathBuf>,
    pub user: String,
    pub history: HistoryLog,
}

impl Session {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            id: SessionId::new(),
            cwd,
            home: None,
            user: "user".into(),
            history: HistoryLog::new(),
        }
    }

    /// Session rooted at the process working directory, with `HOME`/`USER`
    pub fn from_env() -> std::io::Result<Self> {
        let mut session = Self::new(std::env::current_dir()?);
        session.home = std::env::var_os("HOME").map(PathBuf::from);
        if let Ok(user) = std::env::var("USER") {
            session.user = user;
        }
        Ok(session)
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Resolve a user-supplied path against the session directory
    ///
    /// `~` and `~/...` expand to the home directory when one is known.
    /// `.` and `..` are folded lexically so error messages stay readable.
    pub fn resolve_path(&self, input: &str) -> PathBuf {
        let expanded = match (input, &self.home) {
            ("~", Some(home)) => home.clone(),
            (s, Some(home)) if s.starts_with("~/") => home.join(&s[2..]),
            _ => PathBuf::from(input),
        };
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            self.cwd.join(expanded)
        };
        normalize(&joined)
    }

    /// Working directory with the home prefix shown as `~`
    pub fn display_cwd(&self) -> String {
        if let Some(home) = &self.home {
            if let Ok(rest) = self.cwd.strip_prefix(home) {
                if rest.as_os_str().is_empty() {
                    return "~".into();
                }
                return format!("~/{}", rest.display());
            }
        }
        self.cwd.display().to_string()
    }

    /// Shell-style prompt: `user@host:~/dir$ `
    pub fn prompt(&self, host: &str) -> String {
        format!("{}@{}:{}$ ", self.user, host, self.display_cwd())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(PathBuf::from("/home/ada/projects")).with_home("/home/ada")
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let s = session();
        assert_eq!(s.resolve_path("notes.txt"), PathBuf::from("/home/ada/projects/notes.txt"));
        assert_eq!(s.resolve_path("/tmp"), PathBuf::from("/tmp"));
        assert_eq!(s.resolve_path("../docs/./a"), PathBuf::from("/home/ada/docs/a"));
    }

    #[test]
    fn test_resolve_home() {
        let s = session();
        assert_eq!(s.resolve_path("~"), PathBuf::from("/home/ada"));
        assert_eq!(s.resolve_path("~/Downloads"), PathBuf::from("/home/ada/Downloads"));
    }

    #[test]
    fn test_display_cwd_abbreviates_home() {
        let mut s = session();
        assert_eq!(s.display_cwd(), "~/projects");
        s.cwd = PathBuf::from("/home/ada");
        assert_eq!(s.display_cwd(), "~");
        s.cwd = PathBuf::from("/var/log");
        assert_eq!(s.display_cwd(), "/var/log");
    }

    #[test]
    fn test_prompt_format() {
        let mut s = session();
        s.user = "ada".into();
        assert_eq!(s.prompt("box"), "ada@box:~/projects$ ");
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(session().id, session().id);
    }
}
