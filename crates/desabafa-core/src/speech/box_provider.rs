//! BoxSpeechProvider -- object-safe wrapper for SpeechProvider, same shape as
//! `BoxLlmProvider`.

use std::future::Future;
use std::pin::Pin;

use desabafa_types::speech::{SpeechError, SpeechRequest, TranscriptionRequest};

use super::provider::SpeechProvider;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SpeechError>> + Send + 'a>>;

/// Object-safe version of [`SpeechProvider`] with boxed futures.
pub trait SpeechProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn synthesize_boxed<'a>(&'a self, request: &'a SpeechRequest) -> BoxFuture<'a, Vec<u8>>;

    fn transcribe_boxed<'a>(&'a self, request: &'a TranscriptionRequest)
    -> BoxFuture<'a, String>;
}

impl<T: SpeechProvider> SpeechProviderDyn for T {
    fn name(&self) -> &str {
        SpeechProvider::name(self)
    }

    fn synthesize_boxed<'a>(&'a self, request: &'a SpeechRequest) -> BoxFuture<'a, Vec<u8>> {
        Box::pin(self.synthesize(request))
    }

    fn transcribe_boxed<'a>(
        &'a self,
        request: &'a TranscriptionRequest,
    ) -> BoxFuture<'a, String> {
        Box::pin(self.transcribe(request))
    }
}

/// Type-erased speech provider.
pub struct BoxSpeechProvider {
    inner: Box<dyn SpeechProviderDyn + Send + Sync>,
}

impl BoxSpeechProvider {
    pub fn new<T: SpeechProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
        self.inner.synthesize_boxed(request).await
    }

    pub async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, SpeechError> {
        self.inner.transcribe_boxed(request).await
    }
}
