//! Translation assist
//!
//! Fills the secondary languages of a form field from its English value.
//! Every keystroke writes `en` at once and re-arms that field's debouncer;
//! only the final pause triggers a translation pair. The two lookups run in
//! parallel and each merges into the *current* form state by field and
//! language as it resolves, so concurrent edits to other fields are never
//! overwritten. A failed or empty lookup leaves the previous value in place.
//!
//! A pending timer is cancelled by a new keystroke, by [`cancel`] and when the
//! assist is dropped. Lookups already in flight are not cancelled; if two
//! overlap for the same field the one resolving last wins. A lookup that
//! started before a [`cancel`] still runs but its results are discarded.
//!
//! [`cancel`]: TranslationAssist::cancel

use crate::debounce::Debouncer;
use crate::translate::Translator;
use futures::future::join_all;
use shared::models::{Language, LocalizedText};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Optional banner shown while translations run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Translating,
    Translated,
    /// Neither language could be translated
    Failed,
}

#[derive(Debug)]
struct AssistState<F> {
    texts: HashMap<F, LocalizedText>,
    status: TranslationStatus,
    in_flight: usize,
    /// Bumped by `cancel`; lookups from an older epoch do not write
    epoch: u64,
}

pub struct TranslationAssist<F> {
    translator: Arc<dyn Translator>,
    delay: Duration,
    state: Arc<Mutex<AssistState<F>>>,
    timers: Mutex<HashMap<F, Debouncer>>,
}

impl<F> TranslationAssist<F>
where
    F: Copy + Eq + Hash + Send + Sync + std::fmt::Debug + 'static,
{
    pub fn new(translator: Arc<dyn Translator>, delay: Duration) -> Self {
        Self {
            translator,
            delay,
            state: Arc::new(Mutex::new(AssistState {
                texts: HashMap::new(),
                status: TranslationStatus::Idle,
                in_flight: 0,
                epoch: 0,
            })),
            timers: Mutex::new(HashMap::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, AssistState<F>> {
        lock(&self.state)
    }

    /// Current text of `field`
    pub fn text(&self, field: F) -> LocalizedText {
        self.state().texts.get(&field).cloned().unwrap_or_default()
    }

    /// Replace a field wholesale (e.g. when an edit form opens)
    pub fn set_text(&self, field: F, text: LocalizedText) {
        self.state().texts.insert(field, text);
    }

    /// Manual edit of a secondary language; no translation is triggered
    pub fn set_translation(&self, field: F, lang: Language, value: impl Into<String>) {
        self.state()
            .texts
            .entry(field)
            .or_default()
            .set(lang, value);
    }

    pub fn status(&self) -> TranslationStatus {
        self.state().status
    }

    /// Keystroke in the primary-language input of `field`
    pub fn on_primary_text_change(&self, field: F, value: impl Into<String>) {
        let value = value.into();
        self.state()
            .texts
            .entry(field)
            .or_default()
            .set(Language::PRIMARY, value.clone());

        let translator = Arc::clone(&self.translator);
        let state = Arc::clone(&self.state);
        let mut timers = lock(&self.timers);
        let timer = timers
            .entry(field)
            .or_insert_with(|| Debouncer::new(self.delay));

        timer.schedule(async move {
            let text = value.trim().to_string();
            if text.is_empty() {
                return;
            }
            translate_field(translator, state, field, text).await;
        });
    }

    /// Cancel every pending timer and drop results still in flight (dialog close)
    pub fn cancel(&self) {
        for timer in lock(&self.timers).values() {
            timer.cancel();
        }
        self.state().epoch += 1;
    }

    /// Cancel pending timers and forget all text
    pub fn reset(&self) {
        self.cancel();
        let mut state = self.state();
        state.texts.clear();
        if state.in_flight == 0 {
            state.status = TranslationStatus::Idle;
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.timers).values().any(Debouncer::is_pending)
    }

    /// Wait for pending timers and in-flight lookups to finish
    pub async fn flush(&self) {
        let timers: Vec<Debouncer> = {
            let mut timers = lock(&self.timers);
            timers.drain().map(|(_, timer)| timer).collect()
        };
        for timer in &timers {
            timer.flush().await;
        }
    }
}

async fn translate_field<F>(
    translator: Arc<dyn Translator>,
    state: Arc<Mutex<AssistState<F>>>,
    field: F,
    text: String,
) where
    F: Copy + Eq + Hash + std::fmt::Debug,
{
    let epoch = {
        let mut guard = lock(&state);
        guard.in_flight += 1;
        guard.status = TranslationStatus::Translating;
        guard.epoch
    };

    let lookups = Language::SECONDARY.into_iter().map(|lang| {
        let translator = Arc::clone(&translator);
        let state = Arc::clone(&state);
        let text = text.as_str();
        async move {
            match translator.translate(text, lang).await {
                Ok(translated) if !translated.trim().is_empty() => {
                    let mut guard = lock(&state);
                    if guard.epoch != epoch {
                        tracing::debug!(?field, %lang, "Discarding translation after cancel");
                        return false;
                    }
                    guard.texts.entry(field).or_default().set(lang, translated);
                    true
                }
                Ok(_) => {
                    tracing::debug!(?field, %lang, "Empty translation ignored");
                    false
                }
                Err(e) => {
                    tracing::warn!(?field, %lang, "Translation failed: {e}");
                    false
                }
            }
        }
    });
    let translated = join_all(lookups).await.into_iter().filter(|ok| *ok).count();

    let mut guard = lock(&state);
    guard.in_flight -= 1;
    if guard.in_flight == 0 {
        guard.status = if guard.epoch != epoch {
            TranslationStatus::Idle
        } else if translated > 0 {
            TranslationStatus::Translated
        } else {
            TranslationStatus::Failed
        };
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<F> std::fmt::Debug for TranslationAssist<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationAssist")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
