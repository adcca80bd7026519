//! Diagnostic rendering for syntax errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use candle_parse::Span;

use crate::Error;

impl Error {
    /// Source location of a lexer or parser error.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lexer(error) => Some(error.span),
            Error::Parser(error) => Some(error.span),
            _ => None,
        }
    }

    /// Render this error with ariadne.
    ///
    /// Errors without a source location render as a single line.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, mut writer: W) {
        let Some(report) = self.build_report(filename) else {
            let _ = writeln!(writer, "error: {self}");
            return;
        };
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> Option<ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)>> {
        let report = match self {
            Error::Lexer(error) => {
                let range = error.span.start as usize..error.span.end as usize;
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(&error.message)
                    .with_label(
                        Label::new((filename, range))
                            .with_message("invalid token")
                            .with_color(Color::Red),
                    )
            }
            Error::Parser(error) => {
                let range = error.span.start as usize..error.span.end as usize;
                let report = Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(&error.message)
                    .with_label(
                        Label::new((filename, range))
                            .with_message("here")
                            .with_color(Color::Red),
                    );
                if error.message.starts_with("unclosed object") {
                    report.with_help("add a closing '}'")
                } else {
                    report
                }
            }
            _ => return None,
        };
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    fn render(source: &str) -> String {
        let error = Document::parse(source).unwrap_err();
        let rendered = error.render("test.candle", source);
        String::from_utf8(strip_ansi_escapes::strip(&rendered)).unwrap()
    }

    #[test]
    fn test_lexer_error_diagnostic() {
        let rendered = render(candle_testhelpers::LEXER_ERROR);
        assert!(rendered.contains("unexpected character `#`"), "{rendered}");
        assert!(rendered.contains("test.candle"), "{rendered}");
        assert!(rendered.contains("invalid token"), "{rendered}");
    }

    #[test]
    fn test_invalid_escape_diagnostic() {
        let rendered = render(r#"name = "hello\qworld""#);
        assert!(rendered.contains("invalid escape sequence `\\q`"), "{rendered}");
    }

    #[test]
    fn test_unclosed_object_diagnostic() {
        let rendered = render("server {\n  host = \"localhost\"");
        assert!(rendered.contains("unclosed object"), "{rendered}");
        assert!(rendered.contains("add a closing '}'"), "{rendered}");
    }

    #[test]
    fn test_grammar_violation_renders_plainly() {
        let rendered = render("a = // c\n1");
        insta::assert_snapshot!(rendered.trim_end(), @"error: Expected value but got comment");
    }
}
