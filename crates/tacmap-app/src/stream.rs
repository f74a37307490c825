//! JSON-lines wire format between the application and its host.
//!
//! Input: one `OperatorCommand` per line. Output: one `StreamMessage` per line.

use std::io::{BufRead, Write};
use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use tacmap_core::commands::OperatorCommand;
use tacmap_core::events::UiEvent;
use tacmap_core::state::TacticalSnapshot;

use crate::state::LoopCommand;

/// A message emitted by the run loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Snapshot { snapshot: Box<TacticalSnapshot> },
    Event { event: UiEvent },
    /// ASCII rendering of the tactical grid, top row first.
    Grid { rows: Vec<String> },
    /// A command was rejected.
    Error { message: String },
}

/// Destination for run loop output.
pub trait StreamSink: Send {
    fn emit(&mut self, message: StreamMessage);
}

impl StreamSink for mpsc::Sender<StreamMessage> {
    fn emit(&mut self, message: StreamMessage) {
        let _ = self.send(message);
    }
}

/// Writes each message as one line of JSON.
pub struct JsonLines<W> {
    writer: W,
}

impl<W: Write + Send> JsonLines<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> StreamSink for JsonLines<W> {
    fn emit(&mut self, message: StreamMessage) {
        let written = serde_json::to_writer(&mut self.writer, &message)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = written {
            warn!("Failed to write stream message: {}", e);
        }
    }
}

/// Parse one input line. Blank lines carry no command.
pub fn parse_command_line(line: &str) -> Result<Option<OperatorCommand>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Forward every command read from `reader` to the run loop until input
/// closes or the loop goes away. Malformed lines are logged and skipped.
/// Returns the number of commands forwarded.
pub fn forward_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<LoopCommand>) -> usize {
    let mut forwarded = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };
        match parse_command_line(&line) {
            Ok(Some(command)) => {
                if tx.send(LoopCommand::Operator(command)).is_err() {
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => warn!(line = number + 1, "Ignoring malformed command: {}", e),
        }
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tacmap_core::enums::Layer;

    #[test]
    fn test_parse_command_lines() {
        assert_eq!(parse_command_line("   ").unwrap(), None);
        assert_eq!(
            parse_command_line(r#"{"type":"SetLayerVisible","layer":"zones","visible":false}"#)
                .unwrap(),
            Some(OperatorCommand::SetLayerVisible {
                layer: Layer::Zones,
                visible: false
            })
        );
        assert!(parse_command_line(r#"{"type":"Teleport"}"#).is_err());
    }

    #[test]
    fn test_forward_skips_bad_lines() {
        let input = "{\"type\":\"Refresh\"}\nnot json\n\n{\"type\":\"ResetMeasurement\"}\n";
        let (tx, rx) = mpsc::channel();
        assert_eq!(forward_commands(Cursor::new(input), &tx), 2);

        let received: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            received.as_slice(),
            [
                LoopCommand::Operator(OperatorCommand::Refresh),
                LoopCommand::Operator(OperatorCommand::ResetMeasurement)
            ]
        ));
    }

    #[test]
    fn test_forward_stops_when_loop_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let input = "{\"type\":\"Refresh\"}\n{\"type\":\"Refresh\"}\n";
        assert_eq!(forward_commands(Cursor::new(input), &tx), 0);
    }

    #[test]
    fn test_json_lines_output() {
        let mut sink = JsonLines::new(Vec::new());
        sink.emit(StreamMessage::Error {
            message: "boom".into(),
        });
        sink.emit(StreamMessage::Grid {
            rows: vec!["..A..".into()],
        });

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"error","message":"boom"}"#);
        let grid: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(grid["type"], "grid");
        assert_eq!(grid["rows"][0], "..A..");
    }
}
