use crate::chat::{ChatClient, ChatError, ChatSession};
use crate::models::Surgery;

use super::stopwords::contains_any;

/// Fixed instructions for the surgery-name refinement call.
pub const SURGERY_FILTER_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that filters lists of procedures. You will be given \
an array of strings. Each string will be the name of a procedure, but we only want \
to keep the names of relevant surgeries.

For example, if you are given the following list:
Mammography (procedure), Certification procedure (procedure), Cytopathology \
procedure, preparation of smear, genital source (procedure), Transplant of kidney \
(procedure),

you should return something like this:
Transplant of kidney, Mammography.

In your response, return only the name of the surgeries. Ignore words in parenthesis \
like (procedure) or (regime/treatment).

Do not make anything up, and do not change the name of the surgeries under any \
circumstances. Thank you!";

/// Ask the assistant which candidates are genuine surgeries.
///
/// On any failure the candidates are returned unchanged: refinement is
/// best-effort and never fails the intake pipeline.
pub fn refine_surgeries<C: ChatClient>(
    client: &C,
    model: &str,
    candidates: Vec<Surgery>,
) -> Vec<Surgery> {
    if candidates.is_empty() {
        return candidates;
    }
    match llm_filter(client, model, &candidates) {
        Ok(refined) => refined,
        Err(e) => {
            tracing::warn!(error = %e, "assistant filtering failed, keeping stopword-filtered list");
            candidates
        }
    }
}

fn llm_filter<C: ChatClient>(
    client: &C,
    model: &str,
    candidates: &[Surgery],
) -> Result<Vec<Surgery>, ChatError> {
    let names: Vec<&str> = candidates.iter().map(|s| s.name.as_str()).collect();

    let mut session = ChatSession::with_system_prompt(SURGERY_FILTER_SYSTEM_PROMPT);
    session.append_user_message(names.join(", "));

    let turn = client.chat(model, session.messages(), &[])?;
    if turn.content.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }

    let accepted: Vec<String> = turn
        .content
        .split(", ")
        .map(str::to_string)
        .collect();

    let kept = candidates
        .iter()
        .filter(|s| contains_any(&s.name, &accepted))
        .cloned()
        .collect();

    Ok(rename_to_accepted(kept, &accepted))
}

/// Replace each kept record's name with the first accepted name it
/// contains. When two accepted names both match, the earlier one in the
/// response wins.
fn rename_to_accepted(mut surgeries: Vec<Surgery>, accepted: &[String]) -> Vec<Surgery> {
    for surgery in &mut surgeries {
        if let Some(new_name) = accepted.iter().find(|name| surgery.name.contains(*name)) {
            surgery.name = new_name.clone();
        }
    }
    surgeries
}
