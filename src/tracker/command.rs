//! Commands consumed by the tracker loop. User actions, periodic ticks and
//! host session events all funnel through one channel, which serializes
//! every access to the session state.

/// Session lifecycle events coming from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Lock,
    Unlock,
    Logoff,
    Logon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ClockIn,
    ClockOut,
    StartBreak,
    EndBreak,
    /// Mandatory-break and max-hours checks, sent on the policy cadence.
    PolicyTick,
    /// Refresh of the live status line, sent on the display cadence.
    DisplayTick,
    /// Print a full status snapshot on demand.
    ShowStatus,
    Host(HostEvent),
}

/// Maps an interactive input line to a command. `None` for anything
/// unrecognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "in" | "clock-in" => Command::ClockIn,
        "out" | "clock-out" => Command::ClockOut,
        "break" => Command::StartBreak,
        "resume" | "end-break" => Command::EndBreak,
        "status" => Command::ShowStatus,
        "lock" => Command::Host(HostEvent::Lock),
        "unlock" => Command::Host(HostEvent::Unlock),
        "logoff" => Command::Host(HostEvent::Logoff),
        "logon" => Command::Host(HostEvent::Logon),
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_commands() {
        assert_eq!(parse_command("in"), Some(Command::ClockIn));
        assert_eq!(parse_command(" OUT "), Some(Command::ClockOut));
        assert_eq!(parse_command("break"), Some(Command::StartBreak));
        assert_eq!(parse_command("resume"), Some(Command::EndBreak));
        assert_eq!(parse_command("logoff"), Some(Command::Host(HostEvent::Logoff)));
        assert_eq!(parse_command("nonsense"), None);
        assert_eq!(parse_command(""), None);
    }
}
