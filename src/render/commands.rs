use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    Roman,
    Bold,
    Greek,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Centre,
    Right,
}

/// Abstract drawing primitive. Coordinates are page units with the origin
/// at the page centre once the header transform is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    MoveTo { x: f64, y: f64 },
    /// Relative to the current point.
    LineTo { dx: f64, dy: f64 },
    ClosePath,
    Stroke,
    Fill,
    /// Filled circle.
    Blob { x: f64, y: f64, radius: f64 },
    /// Stroked ellipse outline.
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    SetFont { family: FontFamily, size: f64 },
    ShowText { text: String, align: Align },
    SetLineStyle { dash: Vec<f64>, width: f64 },
    SetGray { level: f64 },
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    PageBreak,
    Trailer,
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::MoveTo { x, y } => write!(f, "moveto {x:.3} {y:.3}"),
            DrawCommand::LineTo { dx, dy } => write!(f, "rlineto {dx:.3} {dy:.3}"),
            DrawCommand::ClosePath => f.write_str("closepath"),
            DrawCommand::Stroke => f.write_str("stroke"),
            DrawCommand::Fill => f.write_str("fill"),
            DrawCommand::Blob { x, y, radius } => write!(f, "blob {x:.3} {y:.3} {radius:.3}"),
            DrawCommand::Ellipse { cx, cy, rx, ry } => {
                write!(f, "ellipse {cx:.3} {cy:.3} {rx:.3} {ry:.3}")
            }
            DrawCommand::SetFont { family, size } => {
                let name = match family {
                    FontFamily::Roman => "roman",
                    FontFamily::Bold => "bold",
                    FontFamily::Greek => "greek",
                };
                write!(f, "font {name} {size}")
            }
            DrawCommand::ShowText { text, align } => {
                let align = match align {
                    Align::Left => "left",
                    Align::Centre => "centre",
                    Align::Right => "right",
                };
                write!(f, "show {align} {text:?}")
            }
            DrawCommand::SetLineStyle { dash, width } => {
                let dash: Vec<String> = dash.iter().map(|d| d.to_string()).collect();
                write!(f, "linestyle [{}] {width}", dash.join(" "))
            }
            DrawCommand::SetGray { level } => write!(f, "setgray {level}"),
            DrawCommand::Save => f.write_str("save"),
            DrawCommand::Restore => f.write_str("restore"),
            DrawCommand::Translate { dx, dy } => write!(f, "translate {dx:.3} {dy:.3}"),
            DrawCommand::Rotate { degrees } => write!(f, "rotate {degrees}"),
            DrawCommand::PageBreak => f.write_str("showpage"),
            DrawCommand::Trailer => f.write_str("trailer"),
        }
    }
}

/// Append-only builder for a [`CommandStream`].
#[derive(Debug, Default)]
pub struct StreamBuilder {
    commands: Vec<DrawCommand>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    pub fn line_to(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::LineTo { dx, dy });
    }

    pub fn blob(&mut self, x: f64, y: f64, radius: f64) {
        self.push(DrawCommand::Blob { x, y, radius });
    }

    pub fn font(&mut self, family: FontFamily, size: f64) {
        self.push(DrawCommand::SetFont { family, size });
    }

    pub fn text(&mut self, text: impl Into<String>, align: Align) {
        self.push(DrawCommand::ShowText {
            text: text.into(),
            align,
        });
    }

    pub fn line_style(&mut self, dash: &[f64], width: f64) {
        self.push(DrawCommand::SetLineStyle {
            dash: dash.to_vec(),
            width,
        });
    }

    /// Appends the closing page break and trailer marker.
    pub fn finish(mut self) -> CommandStream {
        self.commands.push(DrawCommand::PageBreak);
        self.commands.push(DrawCommand::Trailer);
        CommandStream {
            commands: self.commands,
        }
    }
}

/// Finished, write-once command stream.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandStream {
    commands: Vec<DrawCommand>,
}

impl CommandStream {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Centres and radii of every blob, in stream order.
    pub fn blobs(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Blob { x, y, radius } => Some((*x, *y, *radius)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::ShowText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn page_breaks(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::PageBreak))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_appends_trailer() {
        let mut b = StreamBuilder::new();
        b.move_to(1.0, 2.0);
        b.blob(1.0, 2.0, 0.5);
        let stream = b.finish();
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.commands().last(), Some(&DrawCommand::Trailer));
        assert_eq!(stream.page_breaks(), 1);
        assert_eq!(stream.blobs().collect::<Vec<_>>(), vec![(1.0, 2.0, 0.5)]);
    }

    #[test]
    fn text_form_is_one_line_per_command() {
        assert_eq!(
            DrawCommand::Blob { x: -12.5, y: 40.0, radius: 1.5 }.to_string(),
            "blob -12.500 40.000 1.500"
        );
        assert_eq!(
            DrawCommand::SetLineStyle { dash: vec![1.0, 2.0], width: 0.001 }.to_string(),
            "linestyle [1 2] 0.001"
        );
        assert_eq!(
            DrawCommand::ShowText { text: "Page 1".into(), align: Align::Centre }.to_string(),
            "show centre \"Page 1\""
        );
    }

    #[test]
    fn json_form_is_tagged() {
        let json = serde_json::to_string(&DrawCommand::MoveTo { x: 1.0, y: -2.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"move_to","x":1.0,"y":-2.0}"#);
    }
}
