// End-to-end: watcher -> history -> selection -> writer -> watcher again
use std::sync::Arc;

use utklippstavle::app::ClipboardApp;
use utklippstavle::clipboard::{ClipboardWatcher, ClipboardWriter, MemoryClipboard, PollOutcome};
use utklippstavle::error::AppError;
use utklippstavle::presentation::ConsolePresentation;
use utklippstavle::settings::{PreferenceStore, Preferences};

struct FixedStore(Preferences);

impl PreferenceStore for FixedStore {
    fn load(&self) -> Preferences {
        self.0
    }

    fn save(&self, _preferences: &Preferences) -> Result<(), AppError> {
        Ok(())
    }
}

fn setup() -> (MemoryClipboard, ClipboardWatcher<MemoryClipboard>, Arc<ClipboardApp>) {
    let clipboard = MemoryClipboard::new();
    let app = Arc::new(ClipboardApp::new(
        FixedStore(Preferences::default()),
        ClipboardWriter::new(clipboard.clone()),
        Arc::new(ConsolePresentation::new()),
    ));
    let mut watcher = ClipboardWatcher::new(clipboard.clone());
    watcher.prime();
    (clipboard, watcher, app)
}

#[test]
fn restored_entry_is_not_ingested_again() {
    let (clipboard, mut watcher, app) = setup();
    for text in ["Z", "Y", "X"] {
        clipboard.copy_text(text);
        watcher.poll(app.history());
    }
    let before: Vec<_> = app.history().current_view().iter().map(|e| e.id()).collect();
    assert_eq!(app.history().current_view().texts(), vec!["X", "Y", "Z"]);

    let token_before = watcher.last_observed_token();
    let restored = app.router().select_by_index(2).expect("slot 2");
    assert_eq!(restored.text(), "Y");
    assert_eq!(clipboard.text().as_deref(), Some("Y"));

    // 写回推进了令牌，轮询能看到变化，但去重让它成为 no-op
    assert_eq!(watcher.poll(app.history()), PollOutcome::Captured("Y".to_string()));
    assert_ne!(watcher.last_observed_token(), token_before);

    let after: Vec<_> = app.history().current_view().iter().map(|e| e.id()).collect();
    assert_eq!(before, after);
    assert_eq!(app.history().current_view().texts(), vec!["X", "Y", "Z"]);
}

#[test]
fn click_selection_uses_ids_from_an_older_view() {
    let (clipboard, mut watcher, app) = setup();
    clipboard.copy_text("first");
    watcher.poll(app.history());
    let view = app.history().current_view();

    clipboard.copy_text("second");
    watcher.poll(app.history());

    let restored = app.router().select_by_click(view[0].id()).expect("still present");
    assert_eq!(restored.text(), "first");
    assert_eq!(clipboard.text().as_deref(), Some("first"));
    assert_eq!(view.len(), 1);
}

#[test]
fn out_of_range_shortcut_leaves_clipboard_untouched() {
    let (clipboard, mut watcher, app) = setup();
    clipboard.copy_text("only");
    watcher.poll(app.history());
    let generation = clipboard.generation();

    assert!(app.router().select_by_index(5).is_none());
    assert_eq!(clipboard.generation(), generation);
}
