use super::*;
use pretty_assertions::assert_eq;

fn error_at(start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(message)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn test_flush_sorts_by_offset() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(error_at(30, "third"));
    queue.add(error_at(5, "first"));
    queue.add(error_at(12, "second"));

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn test_deduplicate_same_offset() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(4, "no implicit conversion")));
    assert!(!queue.add(error_at(4, "no implicit conversion")));
    assert!(queue.add(error_at(9, "no implicit conversion")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_distinct_errors_at_one_offset_are_kept() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(4, "cannot implicitly convert `int` to `short`")));
    assert!(queue.add(error_at(4, "cannot implicitly convert `int` to `byte`")));
    let same_text = Diagnostic::error(ErrorCode::E2002)
        .with_message("cannot implicitly convert `int` to `byte`")
        .with_label(Span::new(4, 5), "here");
    assert!(queue.add(same_text));
    assert_eq!(queue.flush().len(), 3);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        ..DiagnosticConfig::default()
    });
    assert!(queue.add(error_at(0, "a")));
    assert!(queue.add(error_at(1, "b")));
    assert!(queue.limit_reached());
    assert!(!queue.add(error_at(2, "c")));
    assert!(!queue.add(error_at(3, "d")));

    let codes: Vec<_> = queue.flush().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E2001, ErrorCode::E9002]);
}

#[test]
fn test_limit_notice_resets_on_flush() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        ..DiagnosticConfig::default()
    });
    queue.add(error_at(0, "a"));
    queue.add(error_at(1, "b"));
    assert_eq!(queue.flush().len(), 2);
    assert!(queue.add(error_at(2, "c")));
    assert_eq!(queue.flush().len(), 1);
}

#[test]
fn test_warnings_pass_the_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        ..DiagnosticConfig::default()
    });
    queue.add(error_at(0, "a"));
    let warning = Diagnostic::warning(ErrorCode::E2007).with_label(Span::new(3, 4), "here");
    assert!(queue.add(warning));
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn test_too_many_errors() {
    let diag = too_many_errors(10, Span::new(0, 1));
    assert_eq!(diag.code, ErrorCode::E9002);
    assert!(diag.message.contains("10"));
}
