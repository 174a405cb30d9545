//! Label markup: `{` switches to the Greek family and `}` back to Roman.
//! Delimiters do not nest; `{{a}}` is the same as `{a}`.

use crate::render::commands::{Align, FontFamily, StreamBuilder};

pub const GREEK_OPEN: char = '{';
pub const GREEK_CLOSE: char = '}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub family: FontFamily,
    pub text: String,
}

/// Splits `text` into runs of one font family. Empty runs are dropped.
pub fn split_markup(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut family = FontFamily::Roman;
    let mut current = String::new();
    for ch in text.chars() {
        let next = match ch {
            GREEK_OPEN => FontFamily::Greek,
            GREEK_CLOSE => FontFamily::Roman,
            _ => {
                current.push(ch);
                continue;
            }
        };
        if !current.is_empty() {
            runs.push(TextRun {
                family,
                text: std::mem::take(&mut current),
            });
        }
        family = next;
    }
    if !current.is_empty() {
        runs.push(TextRun {
            family,
            text: current,
        });
    }
    runs
}

/// Emits `text` at (`x`, `y`), switching fonts per run and leaving the
/// Roman face selected afterwards.
pub fn emit_label(out: &mut StreamBuilder, text: &str, size: f64, x: f64, y: f64) {
    out.move_to(x, y);
    out.font(FontFamily::Roman, size);
    let mut family = FontFamily::Roman;
    for run in split_markup(text) {
        if run.family != family {
            out.font(run.family, size);
            family = run.family;
        }
        out.text(run.text, Align::Left);
    }
    if family != FontFamily::Roman {
        out.font(FontFamily::Roman, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::commands::DrawCommand;

    fn run(family: FontFamily, text: &str) -> TextRun {
        TextRun {
            family,
            text: text.into(),
        }
    }

    #[test]
    fn plain_text_is_one_roman_run() {
        assert_eq!(split_markup("Sol"), vec![run(FontFamily::Roman, "Sol")]);
        assert!(split_markup("").is_empty());
    }

    #[test]
    fn braces_toggle_greek() {
        assert_eq!(
            split_markup("{a} Centauri"),
            vec![
                run(FontFamily::Greek, "a"),
                run(FontFamily::Roman, " Centauri"),
            ]
        );
    }

    #[test]
    fn nested_braces_do_not_nest() {
        assert_eq!(
            split_markup("{{b}c}"),
            vec![run(FontFamily::Greek, "b"), run(FontFamily::Roman, "c")]
        );
    }

    #[test]
    fn label_restores_roman_face() {
        let mut out = StreamBuilder::new();
        emit_label(&mut out, "{t} Ceti {e", 5.0, 1.0, 2.0);
        let stream = out.finish();
        let fonts: Vec<FontFamily> = stream
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetFont { family, .. } => Some(*family),
                _ => None,
            })
            .collect();
        assert_eq!(
            fonts,
            vec![
                FontFamily::Roman,
                FontFamily::Greek,
                FontFamily::Roman,
                FontFamily::Greek,
                FontFamily::Roman,
            ]
        );
        assert_eq!(stream.texts().collect::<Vec<_>>(), vec!["t", " Ceti ", "e"]);
    }
}
