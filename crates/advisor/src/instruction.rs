//! System instruction composition.
//!
//! The framing text is fixed and part of the external contract with
//! the model — it materially affects output quality. Do not reword it.

use counsel_core::AdvisoryBrief;

/// Compose the system instruction, embedding the brief's background
/// and question verbatim when present.
pub fn compose_system_instruction(brief: &AdvisoryBrief) -> String {
    let background = match brief.data_background.as_deref() {
        Some(bg) if !bg.is_empty() => format!("Here is the data background: {bg}"),
        _ => String::new(),
    };

    let question = match brief.policy_question.as_deref() {
        Some(q) if !q.is_empty() => format!(
            "I need help answering a specific policymaking/decision-making question: {q}"
        ),
        _ => String::new(),
    };

    format!(
        "You are a policy analyst/data scientist assisting in interpreting the data. \
         {background} {question} Focus on synthesizing the data results and providing \
         insights across results, backing up every interpretation with clear evidence \
         and rationale. Make sure to double and triple check that any numbers you \
         repeat accurately reflect the numbers specifically given to you in the \
         prompt. Provide a strong summary at the end."
    )
}

/// Concatenate the system instruction and the (already truncated) user
/// data into the prompt sent to the model.
pub fn compose_prompt(system_instruction: &str, user_data: &str) -> String {
    format!("{system_instruction}\n\nUser data: {user_data}")
}
