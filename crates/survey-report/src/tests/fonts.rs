use std::path::PathBuf;

use crate::config::{FontCandidate, ReportFeat};
use crate::font::{BuiltinFontResolver, FontMetrics, FontResolver, ProbeFontResolver};

fn candidates() -> Vec<FontCandidate> {
    ReportFeat::default().font_candidates
}

#[test]
fn test_probe_first_candidate_wins() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    std::fs::write(first.path().join("arial.ttf"), b"arial").unwrap();
    std::fs::write(second.path().join("times.ttf"), b"times").unwrap();

    let resolver = ProbeFontResolver::new(
        candidates(),
        vec![first.path().to_owned(), second.path().to_owned()],
    );
    let font = resolver.resolve().unwrap();

    // Candidates are tried before directories.
    assert_eq!(font.name, "TimesTiengViet");
    assert_eq!(font.path, Some(second.path().join("times.ttf")));
    assert_eq!(font.data, b"times");
}

#[test]
fn test_probe_skips_missing_dirs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("DejaVuSans.ttf"), b"dejavu").unwrap();

    let resolver = ProbeFontResolver::new(
        candidates(),
        vec![PathBuf::from("/nonexistent/fonts"), dir.path().to_owned()],
    );
    assert_eq!(resolver.resolve().unwrap().name, "DejaVuSans");
}

#[test]
fn test_probe_nothing_found() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = ProbeFontResolver::new(candidates(), vec![dir.path().to_owned()]);

    assert!(resolver.resolve().is_none());
    assert!(BuiltinFontResolver.resolve().is_none());
}

#[test]
fn test_wrap_words() {
    let metrics = FontMetrics::Builtin;

    assert_eq!(metrics.text_width("abcd", 10.0), 20.0);
    assert_eq!(metrics.wrap("aaaa bbbb", 10.0, 25.0), ["aaaa", "bbbb"]);
    assert_eq!(metrics.wrap("aa bb", 10.0, 100.0), ["aa bb"]);
}

#[test]
fn test_wrap_keeps_newlines() {
    let metrics = FontMetrics::Builtin;

    assert_eq!(metrics.wrap("first\nsecond", 10.0, 500.0), ["first", "second"]);
    assert_eq!(metrics.wrap("", 10.0, 500.0), [""]);
}

#[test]
fn test_wrap_splits_long_words() {
    let metrics = FontMetrics::Builtin;
    assert_eq!(metrics.wrap("abcdefgh", 10.0, 20.0), ["abcd", "efgh"]);
}

#[test]
fn test_external_metrics_use_cached_advances() {
    let metrics = FontMetrics::External([('i', 0.25), ('m', 0.75)].into_iter().collect());

    assert_eq!(metrics.text_width("im", 10.0), 10.0);
    // Unmapped characters fall back to the average advance.
    assert_eq!(metrics.text_width("ix", 10.0), 7.5);
    assert_eq!(metrics.wrap("mm ii", 10.0, 16.0), ["mm", "ii"]);
}

#[test]
fn test_metrics_reject_non_font_data() {
    assert!(FontMetrics::from_font_data(b"not a font").is_none());
}
