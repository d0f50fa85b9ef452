use std::convert::Infallible;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::mpsc::Sender;

use crate::store::Action;
use anyhow::{bail, Result};
use parse_display::Display;

#[derive(Display, Debug, Copy, Clone, Eq, PartialEq)]
#[display(style = "UPPERCASE")]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }
}

/// A line of operator input
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    #[display("START")]
    Start,
    #[display("STOP")]
    Stop,
    #[display("RESET")]
    Reset,
    #[display("CHECK,{index},{state}")]
    Check { index: usize, state: Toggle },
    /// write the history out to CSV
    #[display("EXPORT")]
    Export,
    #[display("QUIT")]
    Quit,
    #[display("{0}")]
    Unknown(String),
}

impl FromStr for ControlCommand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        Ok(match upper.as_str() {
            "START" => Self::Start,
            "STOP" => Self::Stop,
            "RESET" => Self::Reset,
            "EXPORT" => Self::Export,
            "QUIT" | "EXIT" => Self::Quit,
            _ => parse_check(&upper).unwrap_or_else(|| Self::Unknown(trimmed.to_string())),
        })
    }
}

fn parse_check(s: &str) -> Option<ControlCommand> {
    let mut parts = s.split(',').map(str::trim);

    if parts.next()? != "CHECK" {
        return None;
    }
    let index = parts.next()?.parse().ok()?;
    let state = match parts.next()? {
        "ON" => Toggle::On,
        "OFF" => Toggle::Off,
        _ => return None,
    };

    parts.next().is_none().then_some(ControlCommand::Check { index, state })
}

impl ControlCommand {
    /// The store action this command maps to, if it maps to one at all
    pub fn action(&self) -> Option<Action> {
        match self {
            ControlCommand::Start => Some(Action::Start),
            ControlCommand::Stop => Some(Action::Stop),
            ControlCommand::Reset => Some(Action::Reset),
            ControlCommand::Check { index, state } => Some(Action::UpdateChecklist {
                index: *index,
                checked: state.is_on(),
            }),
            ControlCommand::Unknown(name) => Some(Action::Unknown(name.clone())),
            ControlCommand::Export | ControlCommand::Quit => None,
        }
    }
}

/// Reads operator commands a line at a time and forwards them over a channel
pub struct ControlListener<R> {
    reader: R,
    tx: Sender<ControlCommand>,
}

impl<R: BufRead> ControlListener<R> {
    pub fn new(reader: R, tx: Sender<ControlCommand>) -> Self {
        Self { reader, tx }
    }

    /// Runs until the input ends, a `QUIT` arrives or nobody is listening any more
    pub fn run(self) -> Result<()> {
        for line in self.reader.lines() {
            let line = match line {
                Err(e) => {
                    tracing::error!("Encountered error while reading line: {e:?}");
                    bail!("Failed to read command - {e:?}");
                }
                Ok(line) => line,
            };
            tracing::trace!("line = {:?}", line);

            if line.trim().is_empty() {
                continue;
            }

            let command: ControlCommand = match line.parse() {
                Ok(command) => command,
                Err(never) => match never {},
            };
            if let ControlCommand::Unknown(ref name) = command {
                tracing::warn!("Unknown command {name:?}");
            }

            let quit = command == ControlCommand::Quit;
            if self.tx.send(command).is_err() {
                tracing::debug!("Command receiver hung up, listener exiting.");
                break;
            }
            if quit {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn parse(s: &str) -> ControlCommand {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("START"), ControlCommand::Start);
        assert_eq!(parse(" stop \r"), ControlCommand::Stop);
        assert_eq!(parse("Reset"), ControlCommand::Reset);
        assert_eq!(parse("EXPORT"), ControlCommand::Export);
        assert_eq!(parse("quit"), ControlCommand::Quit);
        assert_eq!(
            parse("CHECK,3,ON"),
            ControlCommand::Check {
                index: 3,
                state: Toggle::On
            }
        );
        assert_eq!(
            parse("check, 10, off"),
            ControlCommand::Check {
                index: 10,
                state: Toggle::Off
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("LAUNCH"), ControlCommand::Unknown("LAUNCH".to_string()));
        assert_eq!(
            parse("CHECK,3,MAYBE"),
            ControlCommand::Unknown("CHECK,3,MAYBE".to_string())
        );
        assert_eq!(
            parse("CHECK,-1,ON"),
            ControlCommand::Unknown("CHECK,-1,ON".to_string())
        );
        assert_eq!(
            parse("CHECK,1,ON,AGAIN"),
            ControlCommand::Unknown("CHECK,1,ON,AGAIN".to_string())
        );
    }

    #[test]
    fn test_display_parses_back() {
        let command = ControlCommand::Check {
            index: 7,
            state: Toggle::Off,
        };

        assert_eq!(format!("{command}"), "CHECK,7,OFF");
        assert_eq!(parse(&format!("{command}")), command);
    }

    #[test]
    fn test_actions() {
        assert_eq!(ControlCommand::Start.action(), Some(Action::Start));
        assert_eq!(
            parse("CHECK,2,ON").action(),
            Some(Action::UpdateChecklist {
                index: 2,
                checked: true
            })
        );
        assert_eq!(
            parse("FLY").action(),
            Some(Action::Unknown("FLY".to_string()))
        );
        assert_eq!(ControlCommand::Export.action(), None);
        assert_eq!(ControlCommand::Quit.action(), None);
    }

    #[test]
    fn test_listener_forwards_until_quit() {
        let input = Cursor::new("START\n\nCHECK,0,ON\nbogus\nQUIT\nSTOP\n");
        let (tx, rx) = mpsc::channel();

        ControlListener::new(input, tx).run().unwrap();
        let received: Vec<_> = rx.try_iter().collect();

        assert_eq!(
            received,
            vec![
                ControlCommand::Start,
                ControlCommand::Check {
                    index: 0,
                    state: Toggle::On
                },
                ControlCommand::Unknown("bogus".to_string()),
                ControlCommand::Quit,
            ]
        );
    }

    #[test]
    fn test_listener_stops_when_receiver_hangs_up() {
        let input = Cursor::new("START\nSTOP\n");
        let (tx, rx) = mpsc::channel();
        drop(rx);

        assert!(ControlListener::new(input, tx).run().is_ok());
    }
}
