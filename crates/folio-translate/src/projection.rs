//! A displayed string bound to the live translation state.
//!
//! Each [`Projection`] runs a small task that re-translates its source text
//! whenever the text or the session language changes, and publishes what
//! should be on screen. Results are stamped with the epoch and source they
//! were requested for; a result whose stamp is no longer current is thrown
//! away instead of overwriting newer text.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::translator::{Epoch, Translator};

/// What a projection is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionState {
    /// Created, no request issued yet.
    Idle { source: String },
    /// A translation is in flight; the source text is shown meanwhile.
    Pending { source: String },
    /// The translation for `source` under `epoch`.
    Displaying {
        source: String,
        text: String,
        epoch: Epoch,
    },
}

impl ProjectionState {
    pub fn source(&self) -> &str {
        match self {
            Self::Idle { source } | Self::Pending { source } | Self::Displaying { source, .. } => {
                source
            }
        }
    }

    /// Text to render right now.
    pub fn displayed(&self) -> &str {
        match self {
            Self::Displaying { text, .. } => text,
            other => other.source(),
        }
    }
}

/// The conditions a translation request was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStamp {
    pub epoch: Epoch,
    pub source: String,
}

impl RequestStamp {
    /// Whether a result for this stamp may still be displayed.
    pub fn is_current(&self, epoch: Epoch, source: &str) -> bool {
        self.epoch == epoch && self.source == source
    }
}

/// Handle to a running projection. Dropping it stops the task.
pub struct Projection {
    translator: Arc<Translator>,
    source_tx: watch::Sender<String>,
    state_rx: watch::Receiver<ProjectionState>,
    task: JoinHandle<()>,
}

impl Projection {
    /// Bind `source` to `translator` and start translating it.
    pub fn spawn(translator: Arc<Translator>, source: impl Into<String>) -> Self {
        let source = source.into();
        let (source_tx, source_rx) = watch::channel(source.clone());
        let (state_tx, state_rx) = watch::channel(ProjectionState::Idle { source });
        let task = tokio::spawn(run(translator.clone(), source_rx, state_tx));
        Self {
            translator,
            source_tx,
            state_rx,
            task,
        }
    }

    pub fn state(&self) -> ProjectionState {
        self.state_rx.borrow().clone()
    }

    pub fn displayed(&self) -> String {
        self.state_rx.borrow().displayed().to_string()
    }

    pub fn source(&self) -> String {
        self.source_tx.borrow().clone()
    }

    /// Rebind to a different literal. No-op if unchanged.
    pub fn set_source(&self, source: impl Into<String>) {
        let source = source.into();
        self.source_tx.send_if_modified(|current| {
            if *current == source {
                return false;
            }
            *current = source;
            true
        });
    }

    /// Wait for the next state change. Returns `false` once the task is gone.
    pub async fn changed(&mut self) -> bool {
        self.state_rx.changed().await.is_ok()
    }

    /// Wait until the current source is displayed in the current language,
    /// and return that text.
    pub async fn settled(&mut self) -> String {
        let translator = self.translator.clone();
        let source_rx = self.source_tx.subscribe();
        let result = self
            .state_rx
            .wait_for(|state| match state {
                ProjectionState::Displaying { source, epoch, .. } => {
                    *epoch == translator.epoch() && *source == *source_rx.borrow()
                }
                _ => false,
            })
            .await
            .map(|state| state.displayed().to_string());
        match result {
            Ok(text) => text,
            Err(_) => self.displayed(),
        }
    }
}

impl Drop for Projection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    translator: Arc<Translator>,
    mut source_rx: watch::Receiver<String>,
    state_tx: watch::Sender<ProjectionState>,
) {
    let mut epoch_rx = translator.subscribe();

    loop {
        let stamp = RequestStamp {
            epoch: *epoch_rx.borrow_and_update(),
            source: source_rx.borrow_and_update().clone(),
        };
        state_tx.send_replace(ProjectionState::Pending {
            source: stamp.source.clone(),
        });

        let resolved = tokio::select! {
            text = translator.translate(&stamp.source) => Some(text),
            changed = source_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                None
            }
            changed = epoch_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                None
            }
        };

        let Some(text) = resolved else {
            debug!("projection: abandoned request for {:?}", stamp.source);
            continue;
        };

        if !stamp.is_current(translator.epoch(), &source_rx.borrow()) {
            debug!("projection: discarded stale result for {:?}", stamp.source);
            continue;
        }

        state_tx.send_replace(ProjectionState::Displaying {
            source: stamp.source,
            text,
            epoch: stamp.epoch,
        });

        tokio::select! {
            changed = source_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            changed = epoch_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}
