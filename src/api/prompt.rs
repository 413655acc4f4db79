//! Grounding prompt assembly

/// Fixed framing for every question
pub const GROUNDING_INSTRUCTION: &str = "You are a document question-answering assistant. \
Answer the following question based ONLY on the provided document. \
If the answer cannot be found in the document, say so clearly. \
Include relevant quotes and cite specific sections when possible.";

/// Compose instruction, full document text and question into one prompt
pub fn grounding_prompt(document: &str, question: &str) -> String {
    format!(
        "{GROUNDING_INSTRUCTION}\n\n\
         DOCUMENT:\n{document}\n\n\
         QUESTION: {question}\n\n\
         Provide a clear, concise answer with source citations."
    )
}
