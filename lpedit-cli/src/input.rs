//! Operator commands read from stdin.

use lpedit_types::{ParameterId, PresetId, SetId};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    /// Browse a set without touching the device.
    View(SetId),
    Param(ParameterId, String),
    Tempo(String),
    Tap,
    Preset(SetId, PresetId),
    Start(String),
    Stop,
    Save,
    Reload,
    Devices,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  show                    status and active preset
  view <set>              list presets of a set
  param <id> <value>      change a parameter of the active preset
  tempo <bpm>             set the tempo
  tap                     tap tempo
  preset <set> <preset>   switch the device's preset
  start <device>          open a session
  stop                    close the session
  save | reload           persist or discard edits
  devices                 list attached devices
  quit";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (verb, rest.as_slice()) {
        ("show" | "s", []) => Command::Show,
        ("view", [set]) => Command::View(SetId::new(index(set)?)),
        ("param" | "p", [id, value @ ..]) if !value.is_empty() => {
            Command::Param(ParameterId::new(index(id)?), value.join(" "))
        }
        ("tempo", [bpm]) => Command::Tempo(bpm.to_string()),
        ("tap" | "t", []) => Command::Tap,
        ("preset", [set, preset]) => Command::Preset(SetId::new(index(set)?), PresetId::new(index(preset)?)),
        ("start", [device]) => Command::Start(device.to_string()),
        ("stop", []) => Command::Stop,
        ("save", []) => Command::Save,
        ("reload", []) => Command::Reload,
        ("devices", []) => Command::Devices,
        ("help" | "?", []) => Command::Help,
        ("quit" | "q" | "exit", []) => Command::Quit,
        _ => return Err(format!("unrecognized command: {}", line.trim())),
    };
    Ok(Some(command))
}

fn index(word: &str) -> Result<usize, String> {
    word.parse().map_err(|_| format!("not an index: {}", word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn param_value_keeps_spaces() {
        assert_eq!(
            parse("param 0 Variax Mag").unwrap(),
            Some(Command::Param(ParameterId::new(0), "Variax Mag".to_string()))
        );
    }

    #[test]
    fn preset_takes_set_then_preset() {
        assert_eq!(
            parse("preset 1 3").unwrap(),
            Some(Command::Preset(SetId::new(1), PresetId::new(3)))
        );
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse("preset one 3").is_err());
        assert!(parse("param 3").is_err());
        assert!(parse("stop now").is_err());
        assert!(parse("dance").is_err());
    }
}
