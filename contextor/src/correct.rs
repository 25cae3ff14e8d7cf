//! Query normalization ahead of the embedding call.

use ai_llm_service::ChatMessage;
use tracing::{debug, warn};

use crate::ports::ChatModel;
use crate::prompt::correction_prompt;

/// Ask the correction profile to fix spelling and drop stop words.
///
/// Never fails: a provider error or an empty rewrite falls back to `input`.
/// The result is always lowercased.
pub async fn normalize_question(model: &dyn ChatModel, input: &str) -> String {
    let messages = [ChatMessage::system(correction_prompt(input))];

    let corrected = match model.correct(&messages).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            debug!("correction returned empty text; using raw input");
            input.to_string()
        }
        Err(err) => {
            warn!(error = %err, "query correction failed; using raw input");
            input.to_string()
        }
    };

    corrected.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextorError;
    use crate::ports::PortFuture;

    struct Fixed(Result<&'static str, ()>);

    impl ChatModel for Fixed {
        fn answer<'a>(&'a self, _: &'a [ChatMessage]) -> PortFuture<'a, String> {
            Box::pin(async { Err(ContextorError::EmptyReply) })
        }

        fn correct<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String> {
            assert_eq!(messages.len(), 1);
            let out = self
                .0
                .map(str::to_string)
                .map_err(|_| ContextorError::Config("down".into()));
            Box::pin(async move { out })
        }
    }

    #[tokio::test]
    async fn corrected_text_is_trimmed_and_lowercased() {
        let out = normalize_question(&Fixed(Ok("  What is Phishing?\n")), "wat is phising").await;
        assert_eq!(out, "what is phishing?");
    }

    #[tokio::test]
    async fn failure_falls_back_to_lowercased_input() {
        let out = normalize_question(&Fixed(Err(())), "Define RISK Appetite").await;
        assert_eq!(out, "define risk appetite");
    }

    #[tokio::test]
    async fn empty_rewrite_falls_back_to_input() {
        let out = normalize_question(&Fixed(Ok("   ")), "Firewall").await;
        assert_eq!(out, "firewall");
    }
}
