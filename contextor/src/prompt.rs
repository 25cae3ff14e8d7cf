//! Prompt material: the course-assistant persona, the correction prompt and
//! conversation assembly.

use ai_llm_service::ChatMessage;
use chat_store::{Interaction, Role};
use rag_base::CourseSnippet;
use serde_json::Value;

/// System instructions for every answer.
pub const SYSTEM_MESSAGE: &str = "You are a knowledgeable and friendly virtual teaching assistant for a cybersecurity class. Use the provided course materials—such as textbooks, lecture slides, quizzes, and the syllabus—to give clear, concise, and accurate answers to student questions. If the context doesn't provide enough information, offer general guidance based on cybersecurity best practices. Always aim to make complex topics easier to understand, and encourage students to think critically. If you're unsure, suggest where students might find the answer in their course materials.";

/// Instruction for the query-correction call. `{input}` is replaced verbatim.
const CORRECTION_TEMPLATE: &str = "Do not modify anything unnecessarily. You are a knowledgeable and friendly virtual teaching assistant for a cybersecurity class.
Remove stopwords from the input and correct any spelling or grammatical errors. If the input is already correct, you can leave it unchanged.
Input: \"{input}\"";

pub fn correction_prompt(input: &str) -> String {
    CORRECTION_TEMPLATE.replace("{input}", input)
}

/// `[system] + prior turns + user message`, oldest turn first.
///
/// # Example
/// ```
/// # use contextor::prompt::build_conversation;
/// let conv = build_conversation(&[], "What is a threat model?");
/// assert_eq!(conv.len(), 2);
/// ```
pub fn build_conversation(prior: &[Interaction], user_message: &str) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(prior.len() * 2 + 2);
    out.push(ChatMessage::system(SYSTEM_MESSAGE));
    for msg in prior.iter().flat_map(|it| it.messages.iter()) {
        let m = match msg.role {
            Role::User => ChatMessage::user(msg.content.as_str()),
            Role::Assistant => ChatMessage::assistant(msg.content.as_str()),
            Role::System => ChatMessage::system(msg.content.as_str()),
        };
        out.push(m);
    }
    out.push(ChatMessage::user(user_message));
    out
}

/// Trailing user message carrying the retrieved snippet metadata as a JSON array.
pub fn context_message(snippets: &[CourseSnippet]) -> ChatMessage {
    let metadata = Value::Array(snippets.iter().map(|s| s.metadata.clone()).collect());
    ChatMessage::user(format!(
        "Context: {metadata}\nPlease use this context to inform your response to the user's latest message."
    ))
}

#[cfg(test)]
mod tests {
    use ai_llm_service::ChatRole;
    use chat_store::StoredMessage;
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn interaction(q: &str, a: &str) -> Interaction {
        let now = Utc::now();
        let msg = |role, content: &str| StoredMessage {
            role,
            content: content.to_string(),
            timestamp: now,
        };
        Interaction {
            id: uuid::Uuid::new_v4(),
            session_id: "s".into(),
            role: Role::Assistant,
            content: a.to_string(),
            timestamp: now,
            rating: None,
            rated_at: None,
            messages: vec![msg(Role::User, q), msg(Role::Assistant, a)],
        }
    }

    #[test]
    fn conversation_flattens_prior_turns_between_system_and_user() {
        let prior = vec![interaction("q1", "a1"), interaction("q2", "a2")];
        let conv = build_conversation(&prior, "q3");

        let roles: Vec<_> = conv.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User
            ]
        );
        assert_eq!(conv[0].content, SYSTEM_MESSAGE);
        assert_eq!(conv[4].content, "a2");
        assert_eq!(conv[5].content, "q3");
    }

    #[test]
    fn context_message_embeds_metadata_array() {
        let snippets = vec![CourseSnippet {
            id: "1".into(),
            score: 0.9,
            metadata: json!({"text": "CIA triad"}),
        }];
        let msg = context_message(&snippets);
        assert_eq!(msg.role, ChatRole::User);
        assert!(msg.content.starts_with("Context: [{\"text\":\"CIA triad\"}]\n"));
        assert!(msg.content.ends_with("the user's latest message."));
    }

    #[test]
    fn empty_retrieval_still_produces_context_message() {
        let msg = context_message(&[]);
        assert!(msg.content.starts_with("Context: []"));
    }

    #[test]
    fn correction_prompt_quotes_input() {
        let p = correction_prompt("wat is phising");
        assert!(p.ends_with("Input: \"wat is phising\""));
    }
}
