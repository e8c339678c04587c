//! Shell startup file editing
//!
//! modelgate extends PATH by owning a single guard block in the user's
//! startup file:
//!
//! ```text
//! # >>> modelgate PATH >>>
//! export PATH="$PATH:/home/u/.local/bin"
//! # <<< modelgate PATH <<<
//! ```
//!
//! Blocks are found by comparing whole lines against known marker pairs,
//! never by pattern matching, so directory names containing `.`, `+` or
//! brackets cannot produce false matches. Everything outside the block is
//! left byte-for-byte intact, and the file is only written when its content
//! actually changes.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use super::probe::{ShellInfo, ShellKind};
use crate::error::{LauncherError, Result};

/// Start marker written by this version
pub const GUARD_START: &str = "# >>> modelgate PATH >>>";

/// End marker written by this version
pub const GUARD_END: &str = "# <<< modelgate PATH <<<";

/// Every recognised (start, end) marker pair. The first pair is canonical;
/// later pairs were written by older releases and are still replaced and removed.
const GUARD_PAIRS: &[(&str, &str)] = &[
    (GUARD_START, GUARD_END),
    ("# modelgate PATH setup", "# end modelgate PATH setup"),
];

/// Byte range of one guard block, from the start of its start-marker line
/// through the line terminator of its end-marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSpan {
    pub start: usize,
    pub end: usize,
}

/// Find every complete guard block in `content`, in order.
///
/// A start marker opens a block that is closed by the next end marker of
/// the same pair. A start marker without its end marker is not a block and
/// is left alone.
pub fn locate_guard_blocks(content: &str) -> Vec<GuardSpan> {
    let lines = line_offsets(content);
    let mut spans = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (line_start, line) = lines[i];
        let Some(&(_, end_marker)) = GUARD_PAIRS
            .iter()
            .find(|(start_marker, _)| line.trim() == *start_marker)
        else {
            i += 1;
            continue;
        };

        let closing = lines[i + 1..]
            .iter()
            .position(|(_, candidate)| candidate.trim() == end_marker)
            .map(|offset| i + 1 + offset);

        match closing {
            Some(j) => {
                let (end_start, end_line) = lines[j];
                spans.push(GuardSpan {
                    start: line_start,
                    end: end_start + end_line.len(),
                });
                i = j + 1;
            }
            None => i += 1,
        }
    }

    spans
}

/// Lines of `content` with their byte offsets, terminators included
fn line_offsets(content: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    content
        .split_inclusive('\n')
        .map(|line| {
            let start = offset;
            offset += line.len();
            (start, line)
        })
        .collect()
}

/// Render a guard block adding `dir` to PATH, terminated by a newline
pub fn render_guard_block(kind: ShellKind, dir: &Path) -> String {
    format!("{GUARD_START}\n{}\n{GUARD_END}\n", path_line(kind, dir))
}

/// The single PATH-extension line for `dir`
pub fn path_line(kind: ShellKind, dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    if kind.is_fish() {
        format!("set -gx PATH $PATH '{}'", escape_fish_single(&dir))
    } else {
        format!("export PATH=\"$PATH:{}\"", escape_posix_double(&dir))
    }
}

fn escape_posix_double(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_fish_single(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Insert or replace the guard block in `content`.
///
/// The first existing block is replaced in place and any further blocks are
/// dropped, so the result holds exactly one. Without a block, the new one is
/// appended. When `content` is non-empty and lacks a final newline, the
/// block is introduced by a newline instead and left unterminated, so
/// [`remove_guard_blocks`] can restore the file exactly.
pub fn upsert_guard_block(content: &str, block: &str) -> String {
    let spans = locate_guard_blocks(content);
    let Some(first) = spans.first() else {
        let mut updated = content.to_string();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
            updated.push_str(block.strip_suffix('\n').unwrap_or(block));
        } else {
            updated.push_str(block);
        }
        return updated;
    };

    let mut updated = String::with_capacity(content.len() + block.len());
    updated.push_str(&content[..first.start]);
    if is_unterminated_tail(content, *first) {
        updated.push_str(block.strip_suffix('\n').unwrap_or(block));
    } else {
        updated.push_str(block);
    }
    let mut cursor = first.end;
    for span in &spans[1..] {
        updated.push_str(&content[cursor..span.start]);
        cursor = span.end;
    }
    updated.push_str(&content[cursor..]);
    updated
}

/// Remove every guard block from `content`.
///
/// A block ending the file without a line terminator was introduced by the
/// newline before it, and that newline goes with it.
pub fn remove_guard_blocks(content: &str) -> String {
    let mut updated = String::with_capacity(content.len());
    let mut cursor = 0;
    for span in locate_guard_blocks(content) {
        let start = if span.start > cursor && is_unterminated_tail(content, span) {
            span.start - 1
        } else {
            span.start
        };
        updated.push_str(&content[cursor..start]);
        cursor = span.end;
    }
    updated.push_str(&content[cursor..]);
    updated
}

/// The block closes the file and its end marker has no line terminator
fn is_unterminated_tail(content: &str, span: GuardSpan) -> bool {
    span.end == content.len() && !content.ends_with('\n')
}

/// Make `dir` absolute and lexically normalized (`.` and `..` resolved,
/// trailing separators dropped). Symlinks are not followed.
pub fn normalize_dir(dir: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(dir)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Whether `dir` is already a distinct entry of the PATH value `path`
pub fn path_contains(path: Option<&OsString>, dir: &Path) -> bool {
    let Some(path) = path else {
        return false;
    };
    std::env::split_paths(path)
        .filter(|entry| !entry.as_os_str().is_empty())
        .any(|entry| normalize_dir(&entry).is_ok_and(|entry| entry == dir))
}

/// Outcome of [`ProfileEditor::ensure_path_entry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUpdateResult {
    pub success: bool,
    /// A PATH line was written to the startup file
    pub path_added: bool,
    /// The startup file that was modified, if any
    pub profile: Option<PathBuf>,
    /// The running shell must re-source the profile to see the change
    pub needs_reload: bool,
    pub error: Option<String>,
}

impl PathUpdateResult {
    fn unchanged() -> Self {
        Self {
            success: true,
            path_added: false,
            profile: None,
            needs_reload: false,
            error: None,
        }
    }

    fn failed(profile: &Path, error: &LauncherError) -> Self {
        Self {
            success: false,
            path_added: false,
            profile: Some(profile.to_path_buf()),
            needs_reload: false,
            error: Some(error.to_string()),
        }
    }
}

/// Edits one shell's startup file
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    kind: ShellKind,
    profile: PathBuf,
    live_path: Option<OsString>,
}

impl ProfileEditor {
    /// `live_path` is the current process's PATH, consulted before touching any file
    pub fn new(shell: &ShellInfo, live_path: Option<OsString>) -> Self {
        Self {
            kind: shell.kind,
            profile: shell.profile.clone(),
            live_path,
        }
    }

    /// Make sure `dir` ends up on PATH for future shells.
    ///
    /// Never fails outright: errors are reported on the result so callers can
    /// carry on with an install that already succeeded.
    pub fn ensure_path_entry(&self, dir: &Path) -> PathUpdateResult {
        match self.try_ensure_path_entry(dir) {
            Ok(result) => result,
            Err(e) => {
                warn!(profile = %self.profile.display(), error = %e, "could not update shell profile");
                PathUpdateResult::failed(&self.profile, &e)
            }
        }
    }

    fn try_ensure_path_entry(&self, dir: &Path) -> Result<PathUpdateResult> {
        let dir = normalize_dir(dir)?;

        if path_contains(self.live_path.as_ref(), &dir) {
            debug!(dir = %dir.display(), "already on PATH, profile left alone");
            return Ok(PathUpdateResult::unchanged());
        }

        let content = self.read_profile()?;
        let updated = upsert_guard_block(&content, &render_guard_block(self.kind, &dir));
        if updated == content {
            debug!(profile = %self.profile.display(), "guard block already current");
            return Ok(PathUpdateResult::unchanged());
        }

        self.write_profile(&updated)?;
        info!(profile = %self.profile.display(), dir = %dir.display(), "added PATH entry");
        Ok(PathUpdateResult {
            success: true,
            path_added: true,
            profile: Some(self.profile.clone()),
            needs_reload: true,
            error: None,
        })
    }

    /// Remove the guard block. Returns whether the file changed; a missing
    /// file or block is a successful no-op.
    pub fn remove_path_entry(&self) -> Result<bool> {
        let content = self.read_profile()?;
        let updated = remove_guard_blocks(&content);
        if updated == content {
            debug!(profile = %self.profile.display(), "no guard block to remove");
            return Ok(false);
        }

        self.write_profile(&updated)?;
        info!(profile = %self.profile.display(), "removed PATH entry");
        Ok(true)
    }

    /// Read the startup file; a missing file reads as empty
    fn read_profile(&self) -> Result<String> {
        match fs::read_to_string(&self.profile) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(LauncherError::FileReadFailed {
                path: self.profile.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn write_profile(&self, content: &str) -> Result<()> {
        let write_failed = |e: io::Error| LauncherError::FileWriteFailed {
            path: self.profile.display().to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = self.profile.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        fs::write(&self.profile, content).map_err(write_failed)
    }
}
