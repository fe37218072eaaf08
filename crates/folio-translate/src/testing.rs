//! Scriptable provider for tests.

use async_trait::async_trait;
use folio_core::{
    error::FolioError, language::Language, prompt::Prompt, traits::Provider,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// What the stub answers for a given `(text, language)`.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Well-formed answer carrying this translation.
    Text(String),
    /// Raw model output, passed through as-is.
    Raw(String),
    /// Provider error.
    Fail,
}

/// Records every call. Unscripted requests are answered with
/// `"[<code>] <text>"`.
pub(crate) struct StubProvider {
    replies: Mutex<HashMap<(String, Language), Reply>>,
    calls: Mutex<Vec<(String, Option<Language>)>>,
    gate: Option<Semaphore>,
}

impl StubProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Every call blocks until [`release`](Self::release) hands out a permit.
    pub(crate) fn gated() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub(crate) fn reply(&self, text: &str, language: Language, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert((text.to_string(), language), reply);
    }

    /// Let `n` blocked or future calls proceed.
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Option<Language>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Poll until at least `n` calls have reached the provider.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        for _ in 0..500 {
            if self.call_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("expected {n} provider calls, saw {}", self.call_count());
    }
}

/// Recover the target language from the translation prompt.
fn target_of(prompt: &Prompt) -> Option<Language> {
    Language::ALL
        .into_iter()
        .find(|l| prompt.system_prompt.contains(&format!("({})", l.code())))
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, FolioError> {
        let language = target_of(prompt);
        self.calls
            .lock()
            .unwrap()
            .push((prompt.message.clone(), language));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| FolioError::Provider(e.to_string()))?
                .forget();
        }

        let scripted = language.and_then(|l| {
            self.replies
                .lock()
                .unwrap()
                .get(&(prompt.message.clone(), l))
                .cloned()
        });
        match scripted {
            Some(Reply::Text(text)) => Ok(serde_json::json!({ "translatedText": text }).to_string()),
            Some(Reply::Raw(raw)) => Ok(raw),
            Some(Reply::Fail) => Err(FolioError::Provider("stub: rate limited".into())),
            None => {
                let code = language.map(|l| l.code()).unwrap_or("??");
                Ok(serde_json::json!({ "translatedText": format!("[{code}] {}", prompt.message) })
                    .to_string())
            }
        }
    }

    async fn is_available(&self) -> bool {
        true
    }
}
