//! Line commands understood by the interactive shell.

use rooti_core::{Segment, SegmentKind, ValidationError};

/// Upper bound for `tick [n]`: one day of seconds.
pub const MAX_MANUAL_TICKS: usize = 24 * 60 * 60;

pub const HELP: &str = "\
commands:
  add <study|break> [minutes]   append a segment (default minutes from config)
  remove <n>                    remove the n-th segment
  clear                         remove every segment
  start | pause | toggle        run or stop the clock
  reset                         back to 00:00:00 and the first segment
  log                           record the current session total
  status                        print the timer state as JSON
  list                          show the routine
  logs                          show recorded entries
  delete <n>                    delete the n-th recorded entry
  category <text> | c <n>       answer the pause prompt
  cancel                        dismiss the pause prompt
  tick [n]                      advance the clock by hand (n <= 86400)
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add {
        kind: SegmentKind,
        minutes: Option<String>,
    },
    /// 1-based position as shown by `list`.
    Remove(usize),
    Clear,
    Start,
    Pause,
    Toggle,
    Reset,
    Log,
    Status,
    List,
    Logs,
    /// 1-based position as shown by `logs`.
    Delete(usize),
    Category(String),
    Preset(usize),
    Cancel,
    Tick(usize),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "add" | "a" => {
            let mut parts = rest.split_whitespace();
            let kind = parts
                .next()
                .ok_or("usage: add <study|break> [minutes]")?
                .parse::<SegmentKind>()
                .map_err(|e| e.to_string())?;
            ShellCommand::Add {
                kind,
                minutes: parts.next().map(str::to_string),
            }
        }
        "remove" | "rm" => ShellCommand::Remove(number(rest, "remove <n>")?),
        "clear" => ShellCommand::Clear,
        "start" => ShellCommand::Start,
        "pause" => ShellCommand::Pause,
        "toggle" | "t" => ShellCommand::Toggle,
        "reset" => ShellCommand::Reset,
        "log" => ShellCommand::Log,
        "status" | "s" => ShellCommand::Status,
        "list" | "ls" => ShellCommand::List,
        "logs" => ShellCommand::Logs,
        "delete" | "del" => ShellCommand::Delete(number(rest, "delete <n>")?),
        "category" | "cat" => {
            if rest.is_empty() {
                return Err("usage: category <text>".into());
            }
            ShellCommand::Category(rest.to_string())
        }
        "c" => ShellCommand::Preset(number(rest, "c <n>")?),
        "cancel" => ShellCommand::Cancel,
        "tick" => {
            if rest.is_empty() {
                ShellCommand::Tick(1)
            } else {
                let n = number(rest, "tick [n]")?;
                if n > MAX_MANUAL_TICKS {
                    return Err(format!("tick count must be at most {MAX_MANUAL_TICKS}"));
                }
                ShellCommand::Tick(n)
            }
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try help)")),
    };
    Ok(Some(command))
}

fn number(raw: &str, usage: &str) -> Result<usize, String> {
    raw.parse::<usize>().map_err(|_| format!("usage: {usage}"))
}

/// Parse a `--routine` value such as `study:50,break:10`.
pub fn parse_routine(list: &str) -> Result<Vec<Segment>, ValidationError> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (kind, minutes) = part.split_once(':').unwrap_or((part, ""));
            Segment::parse(kind.parse()?, minutes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_and_without_minutes() {
        assert_eq!(
            parse("add study 25").unwrap(),
            Some(ShellCommand::Add {
                kind: SegmentKind::Study,
                minutes: Some("25".into())
            })
        );
        assert_eq!(
            parse("  a b ").unwrap(),
            Some(ShellCommand::Add {
                kind: SegmentKind::Break,
                minutes: None
            })
        );
        assert!(parse("add nap 5").is_err());
        assert!(parse("add").is_err());
    }

    #[test]
    fn parses_numbers_and_text() {
        assert_eq!(parse("remove 2").unwrap(), Some(ShellCommand::Remove(2)));
        assert_eq!(parse("tick").unwrap(), Some(ShellCommand::Tick(1)));
        assert_eq!(parse("tick 60").unwrap(), Some(ShellCommand::Tick(60)));
        assert_eq!(parse("c 3").unwrap(), Some(ShellCommand::Preset(3)));
        assert_eq!(
            parse("category  long call ").unwrap(),
            Some(ShellCommand::Category("long call".into()))
        );
        assert_eq!(
            parse("tick 86400").unwrap(),
            Some(ShellCommand::Tick(MAX_MANUAL_TICKS))
        );
        assert!(parse("tick 86401").is_err());
        assert!(parse("tick 1000000000000").is_err());
        assert!(parse("remove x").is_err());
        assert!(parse("category").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ").unwrap(), None);
        assert!(parse("jump").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn parses_routine_flag() {
        let segments = parse_routine("study:50, break:10").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].kind(), SegmentKind::Break);
        assert_eq!(segments[1].minutes(), 10);

        assert_eq!(
            parse_routine("study:0"),
            Err(ValidationError::NonPositiveMinutes(0))
        );
        assert!(parse_routine("study").is_err());
        assert!(parse_routine("nap:5").is_err());
    }
}
