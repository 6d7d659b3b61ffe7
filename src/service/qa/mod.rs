pub mod http;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

// Traits.

/// Generic question-answering trait for the two external triage services.
///
/// `classify` wraps the question-classification service and `answer` wraps
/// the answer-retrieval service. Both are treated as black boxes; neither
/// carries a retry policy of its own, so failures surface as
/// [`crate::base::types::Error::ClassificationUnavailable`] and the engine
/// fails closed (an unsolicited reply in a busy channel is the worse failure
/// mode than silence).
#[async_trait]
pub trait GenericQaClient: Send + Sync + 'static {
    /// Does this freestanding channel question deserve a follow-up?
    async fn classify(&self, text: &str) -> Res<bool>;

    /// Retrieve an answer for a classified question.
    async fn answer(&self, text: &str) -> Res<String>;
}

// Structs.

/// Question-answering client for the application.
///
/// This is trivially cloneable and can be passed around without the need for
/// `Arc` or `Mutex`.
#[derive(Clone)]
pub struct QaClient {
    inner: Arc<dyn GenericQaClient>,
}

impl Deref for QaClient {
    type Target = dyn GenericQaClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl QaClient {
    pub fn new(inner: Arc<dyn GenericQaClient>) -> Self {
        Self { inner }
    }
}
