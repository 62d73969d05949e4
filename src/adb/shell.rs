use crate::core::path::RemotePath;
use std::borrow::Cow;

/// Quote a word for the device's `sh`.
///
/// `adb shell` joins its arguments with spaces and hands the result to the
/// remote shell, so file names with spaces or metacharacters must be quoted.
/// The device shell is always POSIX, whatever the host platform.
pub fn shell_quote(word: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(word)).into_owned()
}

/// A remote shell command line built from a program name, fixed flags and
/// quoted operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    words: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: &str) -> Self {
        Self {
            words: vec![program.to_string()],
        }
    }

    /// Literal flag, passed through unquoted
    pub fn flag(mut self, flag: &str) -> Self {
        self.words.push(flag.to_string());
        self
    }

    /// Operand, quoted for the remote shell
    pub fn arg(mut self, arg: &str) -> Self {
        self.words.push(shell_quote(arg));
        self
    }

    pub fn path(self, path: &RemotePath) -> Self {
        self.arg(path.as_str())
    }

    pub fn to_command_line(&self) -> String {
        self.words.join(" ")
    }
}
