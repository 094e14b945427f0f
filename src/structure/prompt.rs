//! Prompt construction for segmentation requests.
//!
//! Prompts embed free text from answer documents, so every inserted value is
//! length-capped to keep requests inside the provider's context window.

/// Appended to the user prompt when the previous reply failed to parse.
pub(crate) const CORRECTIVE_SUFFIX: &str = "\n\nYour previous reply could not be parsed. \
     Respond with valid JSON only, no prose and no code fences.";

/// System + user prompt pair for decomposing an answer-key answer.
pub fn build_breakdown_prompt(
    question: &str,
    answer: &str,
    max_components: usize,
    max_prompt_chars: usize,
) -> (String, String) {
    let system = "You are an exam grading assistant. You decompose reference answers into \
         their distinct scoring components and reply with strict JSON."
        .to_string();

    let user = format!(
        "Decompose the reference answer into at most {max_components} components, one per \
         distinct idea. Use short snake_case labels. Take each component's content from the \
         reference answer itself so the components together cover its meaning. Under \
         \"requires_llm_evaluation\", list the labels of components whose grading needs \
         subjective judgement (opinions, examples, reasoning quality).\n\n\
         Question: {question}\n\n\
         Reference answer: {answer}\n\n\
         Reply with JSON of the form:\n\
         {{\"breakdown\": {{\"label\": \"content\", ...}}, \"requires_llm_evaluation\": [\"label\", ...]}}",
        question = truncate_to_chars(question, max_prompt_chars),
        answer = truncate_to_chars(answer, max_prompt_chars),
    );

    (system, user)
}

/// System + user prompt pair for aligning a student answer with key labels.
pub fn build_mapping_prompt(
    question: &str,
    labels: &[String],
    student_answer: &str,
    max_prompt_chars: usize,
) -> (String, String) {
    let system = "You are an exam grading assistant. You align student answers with the \
         reference answer's components and reply with strict JSON."
        .to_string();

    let label_list = labels.join(", ");
    let user = format!(
        "Map the student's answer onto the reference components. For every label, extract \
         the part of the student's answer that addresses it, or use an empty string when \
         the student never addresses it. Use exactly these labels and no others: \
         {label_list}.\n\n\
         Question: {question}\n\n\
         Student answer: {student_answer}\n\n\
         Reply with a JSON object keyed by the labels above.",
        question = truncate_to_chars(question, max_prompt_chars),
        student_answer = truncate_to_chars(student_answer, max_prompt_chars),
    );

    (system, user)
}

/// System + user prompt pair for rating one mapped component against its reference.
pub fn build_rating_prompt(
    question: &str,
    reference: &str,
    student: &str,
    max_prompt_chars: usize,
) -> (String, String) {
    let system = "You are an exam grading assistant. You rate how well a student's text \
         covers a reference component and reply with a single number."
        .to_string();

    let user = format!(
        "Rate how well the student text covers the reference component on a 0-10 scale, \
         where 0 means not addressed at all and 10 means fully equivalent.\n\n\
         Question: {question}\n\n\
         Reference component: {reference}\n\n\
         Student text: {student}\n\n\
         Reply with the number only.",
        question = truncate_to_chars(question, max_prompt_chars),
        reference = truncate_to_chars(reference, max_prompt_chars),
        student = truncate_to_chars(student, max_prompt_chars),
    );

    (system, user)
}

/// Truncates to at most `max_chars` characters, backing up to a word boundary.
pub fn truncate_to_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        None => text,
        Some((cut, _)) => {
            let head = &text[..cut];
            match head.rfind(char::is_whitespace) {
                Some(boundary) if boundary > 0 => head[..boundary].trim_end(),
                _ => head,
            }
        }
    }
}
