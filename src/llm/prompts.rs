//! Prompt templates for answer generation

/// Build the grounded-answer prompt.
///
/// The context block and the user question are embedded verbatim; the model
/// is constrained to the context and told to express uncertainty when the
/// context does not cover the question.
pub fn rag_answer_prompt(query: &str, context: &str) -> String {
    format!(
        r"You are a news chatbot using Retrieval-Augmented Generation.

Use ONLY the context below to answer the user's question.
If the answer is not clearly in the context, say you are not sure.

Context:
{context}

User question: {query}

Answer in 3-6 concise sentences, neutral and factual."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_and_query_verbatim() {
        let prompt = rag_answer_prompt("what happened?", "### Article\nBody text");
        assert!(prompt.contains("### Article\nBody text"));
        assert!(prompt.contains("User question: what happened?"));
    }

    #[test]
    fn empty_retrieval_sentinel_flows_into_prompt() {
        // The sentinel is prompt input, not an error
        let prompt = rag_answer_prompt("anything", "No relevant articles found.");
        assert!(prompt.contains("Context:\nNo relevant articles found."));
    }
}
