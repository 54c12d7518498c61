//! POSIX shell quoting for command-line agent invocation.
//!
//! Request text is untrusted. It is always wrapped as a single quoted word
//! before it is appended to an operator-supplied command line.

/// Escapes a value for safe inclusion in a POSIX shell command.
///
/// Uses single-quote wrapping and the standard `'\''` sequence for embedded
/// quotes.
#[must_use]
pub fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// Builds the shell command line for `command` followed by `argument` as a
/// single quoted word.
#[must_use]
pub fn command_line(command: &str, argument: &str) -> String {
    format!("{} {}", command.trim_end(), shell_escape(argument))
}
