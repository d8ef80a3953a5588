/// What a line typed into the chat shell asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Logout,
    Credits,
    /// List the workbenches the user can see.
    Workbenches,
    /// Open a chat on the n-th listed workbench (1-based).
    Open(usize),
    /// List the user's chat sessions.
    Sessions,
    /// Show the messages of the open chat.
    History,
    /// Indexing status of the open chat's workbench.
    Status,
    Send(String),
    Unknown(String),
}

/// Map one input line to a command. Blank lines map to nothing.
pub fn parse_input(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Some(ShellCommand::Send(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match (name, arg) {
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        ("logout", _) => ShellCommand::Logout,
        ("credits", _) => ShellCommand::Credits,
        ("workbenches" | "wb", _) => ShellCommand::Workbenches,
        ("open", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::Open(n),
            _ => ShellCommand::Unknown(line.to_string()),
        },
        ("sessions", _) => ShellCommand::Sessions,
        ("history", _) => ShellCommand::History,
        ("status", _) => ShellCommand::Status,
        _ => ShellCommand::Unknown(line.to_string()),
    };
    Some(command)
}

pub const HELP: &str = "\
Commands:
  /workbenches     list workbenches
  /open <n>        start a chat on workbench n
  /sessions        list chat sessions
  /history         show messages of the open chat
  /status          indexing status of the open workbench
  /credits         show credit balance
  /logout          sign out
  /quit            leave
Anything else is sent to the open chat.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_input("  what drove Q3 revenue? "),
            Some(ShellCommand::Send("what drove Q3 revenue?".to_string()))
        );
        assert_eq!(parse_input("   "), None);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_input("/quit"), Some(ShellCommand::Quit));
        assert_eq!(parse_input("/q"), Some(ShellCommand::Quit));
        assert_eq!(parse_input("/logout"), Some(ShellCommand::Logout));
        assert_eq!(parse_input("/credits"), Some(ShellCommand::Credits));
        assert_eq!(parse_input("/wb"), Some(ShellCommand::Workbenches));
        assert_eq!(parse_input("/open 2"), Some(ShellCommand::Open(2)));
    }

    #[test]
    fn bad_open_argument_is_unknown() {
        assert_eq!(
            parse_input("/open 0"),
            Some(ShellCommand::Unknown("/open 0".to_string()))
        );
        assert_eq!(
            parse_input("/open"),
            Some(ShellCommand::Unknown("/open".to_string()))
        );
        assert_eq!(
            parse_input("/frobnicate"),
            Some(ShellCommand::Unknown("/frobnicate".to_string()))
        );
    }
}
