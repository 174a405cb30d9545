use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::commands::CommandStream;
use crate::render::RenderError;

/// On-disk form of a command stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFormat {
    /// One command per line, e.g. `blob -12.500 40.000 1.500`.
    #[default]
    Text,
    /// One JSON object per line.
    JsonLines,
}

impl FromStr for StreamFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(StreamFormat::Text),
            "json" | "jsonl" | "json_lines" => Ok(StreamFormat::JsonLines),
            other => Err(RenderError::InvalidParameter(format!(
                "unknown stream format: {other}"
            ))),
        }
    }
}

pub fn write_stream<W: Write>(
    stream: &CommandStream,
    format: StreamFormat,
    mut out: W,
) -> Result<(), RenderError> {
    for command in stream.commands() {
        match format {
            StreamFormat::Text => writeln!(out, "{command}")?,
            StreamFormat::JsonLines => {
                serde_json::to_writer(&mut out, command)?;
                out.write_all(b"\n")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Renders the whole stream in memory first so a failure leaves no file.
pub fn write_stream_to_file<P: AsRef<Path>>(
    stream: &CommandStream,
    format: StreamFormat,
    path: P,
) -> Result<(), RenderError> {
    let mut buf = Vec::new();
    write_stream(stream, format, &mut buf)?;
    fs::write(path, buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::commands::{DrawCommand, StreamBuilder};

    fn stream() -> CommandStream {
        let mut b = StreamBuilder::new();
        b.move_to(0.0, 1.5);
        b.blob(-12.5, 40.0, 1.5);
        b.finish()
    }

    #[test]
    fn text_format_has_one_line_per_command() {
        let mut buf = Vec::new();
        write_stream(&stream(), StreamFormat::Text, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["moveto 0.000 1.500", "blob -12.500 40.000 1.500", "showpage", "trailer"]
        );
    }

    #[test]
    fn json_lines_parse_back() {
        let mut buf = Vec::new();
        write_stream(&stream(), StreamFormat::JsonLines, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed: Vec<DrawCommand> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed, stream().commands());
    }

    #[test]
    fn file_output_matches_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        write_stream_to_file(&stream(), StreamFormat::Text, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("trailer\n"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("text".parse::<StreamFormat>().unwrap(), StreamFormat::Text);
        assert_eq!("json".parse::<StreamFormat>().unwrap(), StreamFormat::JsonLines);
        assert!("pdf".parse::<StreamFormat>().is_err());
    }
}
