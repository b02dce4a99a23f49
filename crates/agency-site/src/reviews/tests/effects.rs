use super::common::*;
use std::sync::Arc;

use crate::reviews::effects::{EffectStatus, SideEffectExecutor};

#[test]
fn failures_are_reported_without_blocking_the_other_effect() {
    let navigator = Arc::new(RecordingNavigator::default());
    let executor = SideEffectExecutor::new(Arc::new(DeniedClipboard), navigator.clone());

    let report = executor.execute("Great work", "https://maps.example/acme");

    assert_eq!(
        report.clipboard,
        EffectStatus::Failed("clipboard unavailable: permission denied".to_string())
    );
    assert!(report.navigation.is_completed());
    assert_eq!(navigator.opened(), vec!["https://maps.example/acme".to_string()]);
}

#[test]
fn repeated_execution_with_unavailable_capabilities_never_panics() {
    let executor = SideEffectExecutor::new(Arc::new(DeniedClipboard), Arc::new(BlockedNavigator));

    let first = executor.execute("Great work", "https://maps.example/acme");
    let second = executor.execute("Great work", "https://maps.example/acme");

    assert_eq!(first, second);
    assert!(matches!(first.clipboard, EffectStatus::Failed(_)));
    assert!(matches!(first.navigation, EffectStatus::Failed(_)));
}

#[test]
fn skipped_clipboard_still_navigates() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let executor = SideEffectExecutor::new(clipboard.clone(), navigator.clone()).without_clipboard();

    let report = executor.execute("Great work", "https://maps.example/acme");

    assert_eq!(report.clipboard, EffectStatus::Skipped);
    assert!(clipboard.writes().is_empty());
    assert_eq!(navigator.opened().len(), 1);
}
