use crate::error::{AdbxError, Result};
use log::debug;
use serde::Serialize;
use std::fmt;

pub const SEPARATOR: char = '/';

/// Default browsing root on the device
pub const DEFAULT_ROOT: &str = "/sdcard";

/// Normalized absolute path on the device.
///
/// Stored without a trailing separator (except for `/` itself), with `.`
/// and empty segments removed and `..` resolved. Use [`RemotePath::dir_string`]
/// to render it as a directory with exactly one trailing separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Parse an absolute remote path
    pub fn new(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if !raw.starts_with(SEPARATOR) {
            return Err(AdbxError::InvalidPath(format!(
                "{} (remote paths must be absolute)",
                raw
            )));
        }
        Ok(Self::normalize(raw.split(SEPARATOR)))
    }

    fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> Self {
        let mut parts: Vec<&str> = Vec::new();
        for segment in segments {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }
        Self(format!("{}{}", SEPARATOR, parts.join("/")))
    }

    /// Append a relative segment (which may itself contain separators).
    /// An absolute argument replaces the path entirely.
    pub fn join(&self, segment: &str) -> Self {
        if segment.starts_with(SEPARATOR) {
            return Self::normalize(segment.split(SEPARATOR));
        }
        Self::normalize(self.0.split(SEPARATOR).chain(segment.split(SEPARATOR)))
    }

    /// Parent directory, or `None` for `/`
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut segments: Vec<&str> = self.segments().collect();
        segments.pop();
        Some(Self::normalize(segments.into_iter()))
    }

    /// Last path segment, or `None` for `/`
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Component-wise prefix test (`/sdcard` contains `/sdcard/x`, not `/sdcard2`)
    pub fn starts_with(&self, base: &RemotePath) -> bool {
        let mut own = self.segments();
        base.segments().all(|b| own.next() == Some(b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path with exactly one trailing separator
    pub fn dir_string(&self) -> String {
        if self.is_root() {
            self.0.clone()
        } else {
            format!("{}{}", self.0, SEPARATOR)
        }
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The "current directory" of a session, bounded below by a fixed root.
#[derive(Debug, Clone)]
pub struct Navigator {
    root: RemotePath,
    current: RemotePath,
}

impl Navigator {
    pub fn new(root: RemotePath) -> Self {
        Self {
            current: root.clone(),
            root,
        }
    }

    pub fn root(&self) -> &RemotePath {
        &self.root
    }

    pub fn current(&self) -> &RemotePath {
        &self.current
    }

    /// Resolve user input against the current directory without moving
    pub fn resolve(&self, input: &str) -> RemotePath {
        self.current.join(input)
    }

    /// Move to the parent directory. Returns `false` (and stays put) at the root.
    pub fn go_up(&mut self) -> bool {
        if self.current == self.root {
            debug!("Already at root {}, ignoring go_up", self.root);
            return false;
        }
        match self.current.parent() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Move to a path relative to the current directory, or an absolute one.
    pub fn go_to(&mut self, input: &str) -> Result<&RemotePath> {
        let target = self.resolve(input);
        if !target.starts_with(&self.root) {
            return Err(AdbxError::OutsideRoot {
                path: target.to_string(),
                root: self.root.to_string(),
            });
        }
        self.current = target;
        Ok(&self.current)
    }
}
