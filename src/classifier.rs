// src/classifier.rs
//! Keyword routing for incoming questions. Plain case-insensitive substring
//! matching, so "fee" also matches inside "coffee".

pub const FEE_KEYWORDS: &[&str] = &[
    "fee", "fees", "cost", "price", "payment", "admission", "tuition", "how much",
];

pub const COURSE_KEYWORDS: &[&str] = &[
    "course", "courses", "program", "training", "class", "syllabus", "curriculum", "duration",
];

/// Words that turn a course question into an enrollment/fee question.
const FEE_CONTEXT_WORDS: &[&str] = &["fee", "cost", "price"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

pub fn is_fee_question(text: &str) -> bool {
    contains_any(text, FEE_KEYWORDS)
}

pub fn is_course_question(text: &str) -> bool {
    contains_any(text, COURSE_KEYWORDS)
}

/// Whether the chat should hand over to the lead form instead of answering.
pub fn should_show_form(question: &str) -> bool {
    is_fee_question(question)
        || (is_course_question(question) && contains_any(question, FEE_CONTEXT_WORDS))
}
