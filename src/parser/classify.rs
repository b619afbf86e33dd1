use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

pub(super) static POS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([nvadj,]+)\)").unwrap());
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z])\.\s+Main idea:").unwrap());
static BLANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}|…{2,}|\.{4,}").unwrap());
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}|…{2,}").unwrap());
// "round" only counts as a whole word, so "background: nền" stays vocabulary.
static WORD_BANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)từ vựng:|vocabulary:|\bround\b").unwrap());

pub const DEFINITION_MARKER: &str = "Definition:";

const MIN_QUESTION_CHARS: usize = 5;
const MAX_FILLER_RUN: usize = 50;
const FILLER_CHARS: &[char] = &['_', '.', '…'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    VocabHeader,
    TaskHeader,
    ExerciseHeader,
    VocabularyLine,
    BlankQuestion,
    SectionHeader,
    AllCapsTitle,
    Other,
}

pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    matches: fn(&str, Option<&str>) -> bool,
}

/// First match wins. Headers come before content so a boundary line is never
/// swallowed as vocabulary or a question.
pub static RULES: &[Rule] = &[
    Rule { name: "vocab_header", category: Category::VocabHeader, matches: rule_vocab_header },
    Rule { name: "task_header", category: Category::TaskHeader, matches: rule_task_header },
    Rule { name: "exercise_header", category: Category::ExerciseHeader, matches: rule_exercise_header },
    Rule { name: "vocabulary_line", category: Category::VocabularyLine, matches: is_vocabulary_line },
    Rule { name: "blank_question", category: Category::BlankQuestion, matches: rule_blank_question },
    Rule { name: "section_header", category: Category::SectionHeader, matches: rule_section_header },
    Rule { name: "all_caps_title", category: Category::AllCapsTitle, matches: rule_all_caps_title },
];

/// Classify a trimmed line given the line that follows it. Never fails;
/// anything unrecognized is `Other`.
pub fn classify(line: &str, next: Option<&str>) -> Category {
    match matching_rule(line, next) {
        Some(rule) => {
            trace!(rule = rule.name, line, "classified");
            rule.category
        }
        None => Category::Other,
    }
}

pub fn matching_rule(line: &str, next: Option<&str>) -> Option<&'static Rule> {
    RULES.iter().find(|r| (r.matches)(line, next))
}

fn rule_vocab_header(line: &str, _: Option<&str>) -> bool {
    line.starts_with("Task 1:") || line.starts_with("Task 1 :")
}

fn rule_task_header(line: &str, _: Option<&str>) -> bool {
    is_task_header(line)
}

fn rule_exercise_header(line: &str, _: Option<&str>) -> bool {
    is_exercise_header(line)
}

fn rule_blank_question(line: &str, _: Option<&str>) -> bool {
    is_blank_question(line)
}

fn rule_section_header(line: &str, _: Option<&str>) -> bool {
    is_section_header(line)
}

fn rule_all_caps_title(line: &str, _: Option<&str>) -> bool {
    is_all_caps_title(line)
}

pub fn is_task_header(line: &str) -> bool {
    line.starts_with("Task")
}

pub fn is_exercise_header(line: &str) -> bool {
    line.starts_with("Exercise")
}

/// Pronunciation slashes, a `(n)`-style part of speech, or a following
/// "Definition:" line.
pub fn is_vocabulary_line(line: &str, next: Option<&str>) -> bool {
    line.matches('/').count() >= 2
        || POS_RE.is_match(line)
        || next.is_some_and(starts_with_definition)
}

pub fn starts_with_definition(line: &str) -> bool {
    line.starts_with(DEFINITION_MARKER)
}

pub fn has_blank_marker(line: &str) -> bool {
    BLANK_RE.is_match(line)
}

/// A sentence with a blank in it, not a dotted separator or a "Main idea" line.
pub fn is_blank_question(line: &str) -> bool {
    if !has_blank_marker(line) || is_section_header(line) {
        return false;
    }
    residual_chars(line) >= MIN_QUESTION_CHARS && longest_filler_run(line) <= MAX_FILLER_RUN
}

/// An answer slot ("____", "………") or a line of nothing but filler. Prose ending
/// in "...." is not one.
pub fn is_placeholder(line: &str) -> bool {
    PLACEHOLDER_RE.is_match(line) || residual_chars(line) == 0
}

fn residual_chars(line: &str) -> usize {
    let residual: String = line.chars().filter(|c| !FILLER_CHARS.contains(c)).collect();
    residual.trim().chars().count()
}

fn longest_filler_run(line: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in line.chars() {
        if FILLER_CHARS.contains(&c) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

pub fn is_section_header(line: &str) -> bool {
    SECTION_RE.is_match(line)
}

/// The letter of an "A. Main idea:" line.
pub fn section_label(line: &str) -> Option<char> {
    SECTION_RE
        .captures(line)
        .and_then(|caps| caps[1].chars().next())
}

pub fn is_all_caps_title(line: &str) -> bool {
    line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
        && line.split_whitespace().count() >= 2
}

/// "READING COMPREHENSION:" labels a block; "SEARCHING FOR NEW MEDICINES." names it.
pub fn accepts_as_title(line: &str) -> bool {
    line.ends_with('.') || !line.contains(':')
}

/// "Từ vựng: a / b / c" or "Round 1: a, b" lists the bank of the exercise below
/// it; its slashes are not a pronunciation.
pub fn is_word_bank_listing(line: &str) -> bool {
    WORD_BANK_RE.is_match(line) && line.contains(':')
}

pub fn is_single_word(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_alphabetic)
}

// ── Tests ──
