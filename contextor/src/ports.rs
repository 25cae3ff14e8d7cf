//! Seams between the pipeline and the hosted services.
//!
//! Each trait is object-safe (boxed futures) so the pipeline can hold
//! `Arc<dyn ...>` and tests can swap in stubs.

use std::{future::Future, pin::Pin};

use ai_llm_service::{ChatMessage, LlmServiceProfiles};
use rag_base::{CourseIndex, CourseSnippet, NamespaceHandle};

use crate::error::ContextorError;

pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ContextorError>> + Send + 'a>>;

/// Chat-completion calls used by the pipeline.
pub trait ChatModel: Send + Sync {
    /// Student-facing reply for a full conversation.
    fn answer<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String>;
    /// Deterministic query rewrite.
    fn correct<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String>;
}

pub trait Embedder: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> PortFuture<'a, Vec<f32>>;
}

/// Source of namespace handles.
pub trait SnippetIndex: Send + Sync {
    fn open<'a>(&'a self) -> PortFuture<'a, Box<dyn SnippetNamespace>>;
}

pub trait SnippetNamespace: Send + Sync {
    fn query<'a>(&'a self, vector: Vec<f32>, top_k: usize) -> PortFuture<'a, Vec<CourseSnippet>>;
}

impl ChatModel for LlmServiceProfiles {
    fn answer<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String> {
        Box::pin(async move { Ok(LlmServiceProfiles::answer(self, messages).await?) })
    }

    fn correct<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String> {
        Box::pin(async move { Ok(LlmServiceProfiles::correct(self, messages).await?) })
    }
}

impl Embedder for LlmServiceProfiles {
    fn embed<'a>(&'a self, text: &'a str) -> PortFuture<'a, Vec<f32>> {
        Box::pin(async move { Ok(LlmServiceProfiles::embed(self, text).await?) })
    }
}

impl SnippetIndex for CourseIndex {
    fn open<'a>(&'a self) -> PortFuture<'a, Box<dyn SnippetNamespace>> {
        Box::pin(async move {
            let handle = CourseIndex::open(self).await?;
            Ok(Box::new(handle) as Box<dyn SnippetNamespace>)
        })
    }
}

impl SnippetNamespace for NamespaceHandle {
    fn query<'a>(&'a self, vector: Vec<f32>, top_k: usize) -> PortFuture<'a, Vec<CourseSnippet>> {
        Box::pin(async move { Ok(NamespaceHandle::query(self, vector, top_k).await?) })
    }
}
