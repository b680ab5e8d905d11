//! System instruction assembly
//!
//! Pure function of the knowledge record. Computed once at startup and
//! reused verbatim on every completion request, so there is no per-call
//! cost and no drift between turns.

use crate::knowledge::KnowledgeRecord;

/// Behavioral guidelines appended after the knowledge record
const GUIDELINES: &str = "\
Guidelines:
- Speak like a friendly human host on the phone. Keep replies short and easy to say out loud, one or two sentences.
- Answer only from the business information above. If the information is not there, say plainly that you're not sure and offer to help another way.
- For reservation requests, always collect: the guest's name, party size, date, time, and a phone number. Ask for whichever of these you don't have yet.
- Never mention that the information is stored as data, and never say you are an AI, a bot, or a language model.
- If the caller is unclear, ask a short clarifying question.";

/// Build the system instruction from the knowledge record
///
/// Concatenates an identity statement naming the assistant and the
/// business, the serialized knowledge record, and the fixed guideline
/// block.
pub fn build_system_instruction(knowledge: &KnowledgeRecord) -> String {
    format!(
        "You are the phone concierge for {name}, answering a live phone call.\n\n\
         Business information:\n{record}\n\n{guidelines}",
        name = knowledge.name,
        record = knowledge.to_prompt_json(),
        guidelines = GUIDELINES,
    )
}
