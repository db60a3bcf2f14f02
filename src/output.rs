//! Terminal output for search hits, scores and query listings

use crate::query::QuerySet;
use crate::runner::{BatchReport, SearchHit};
use std::io::{self, IsTerminal};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// When to emit colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if std::io::stdout().is_terminal() => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

/// Stdout stream honouring the `--color` switch
pub fn stdout(mode: ColorMode) -> StandardStream {
    StandardStream::stdout(mode.choice())
}

fn write_label<W: WriteColor>(out: &mut W, label: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(out, "{}", label)?;
    out.reset()
}

/// One block per hit: name, path and the matched terms with their counts
pub fn write_search_hits<W: WriteColor>(
    out: &mut W,
    expression: &str,
    documents: usize,
    hits: &[SearchHit],
) -> io::Result<()> {
    write_label(out, "search-query: ")?;
    writeln!(out, "{}", expression)?;
    write_label(out, "documents: ")?;
    writeln!(out, "{}", documents)?;

    for hit in hits {
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        writeln!(out, "{}", hit.name)?;
        out.reset()?;
        writeln!(out, "  {}", hit.path.display())?;

        for (term, count) in &hit.matches {
            write!(out, "  ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "{}", term)?;
            out.reset()?;
            write!(out, ": ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            writeln!(out, "{}", count)?;
            out.reset()?;
        }
    }

    writeln!(out)?;
    write_label(out, "document-matches: ")?;
    writeln!(out, "{}", hits.len())
}

/// Score line per document, failures included
pub fn write_scores<W: WriteColor>(out: &mut W, batch: &BatchReport) -> io::Result<()> {
    for outcome in &batch.outcomes {
        match &outcome.scored {
            Ok(doc) => {
                let record = &doc.record;
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
                write!(out, "{:>8.2}", record.total_score())?;
                out.reset()?;
                let normalized = record
                    .cut_normalized()
                    .map(|v| format!("{:.3}", v))
                    .unwrap_or_else(|_| "-".to_string());
                writeln!(out, "  {:>6}  {}", normalized, outcome.path.display())?;
            }
            Err(e) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                write!(out, "{:>8}", "error")?;
                out.reset()?;
                writeln!(out, "  {:>6}  {}: {:#}", "-", outcome.path.display(), e)?;
            }
        }
    }
    Ok(())
}

/// Expressions, weights and bounds of a compiled query set
pub fn write_query_set<W: WriteColor>(out: &mut W, set: &QuerySet) -> io::Result<()> {
    write_label(out, "expressions: ")?;
    writeln!(out, "{}", set.len())?;
    write_label(out, "terms: ")?;
    writeln!(out, "{}", set.terms().len())?;
    write_label(out, "min-score: ")?;
    writeln!(out, "{}", set.min_score())?;
    write_label(out, "max-score: ")?;
    writeln!(out, "{}", set.max_score())?;
    writeln!(out)?;

    for query in set.queries() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "[weight={:.2}]", query.weight)?;
        out.reset()?;
        writeln!(out, " {}", query.source)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use termcolor::Buffer;

    fn text(buf: Buffer) -> String {
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_write_search_hits() {
        let hits = vec![SearchHit {
            path: PathBuf::from("/docs/a.txt"),
            name: "a.txt".to_string(),
            matches: vec![("network".to_string(), 3)],
        }];
        let mut buf = Buffer::no_color();
        write_search_hits(&mut buf, "network", 4, &hits).unwrap();

        let out = text(buf);
        assert!(out.starts_with("search-query: network\ndocuments: 4\n"));
        assert!(out.contains("a.txt\n  /docs/a.txt\n  network: 3\n"));
        assert!(out.ends_with("document-matches: 1\n"));
    }

    #[test]
    fn test_write_search_hits_colored() {
        let mut buf = Buffer::ansi();
        write_search_hits(&mut buf, "x", 0, &[]).unwrap();
        assert!(text(buf).contains("\x1b["));
    }

    #[test]
    fn test_color_mode_choice() {
        assert_eq!(ColorMode::Never.choice(), ColorChoice::Never);
        assert_eq!(ColorMode::Always.choice(), ColorChoice::Always);
    }

    #[test]
    fn test_write_query_set() {
        let set: QuerySet = "[weight=2.5] && a b\n[weight=-1] c".parse().unwrap();
        let mut buf = Buffer::no_color();
        write_query_set(&mut buf, &set).unwrap();

        let out = text(buf);
        assert!(out.contains("expressions: 2\n"));
        assert!(out.contains("terms: 3\n"));
        assert!(out.contains("min-score: -1\n"));
        assert!(out.contains("max-score: 2.5\n"));
        assert!(out.contains("[weight=2.50] && a b\n"));
        assert!(out.contains("[weight=-1.00] c\n"));
    }
}
