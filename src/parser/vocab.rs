use std::sync::LazyLock;

use regex::Regex;

use super::classify::{starts_with_definition, DEFINITION_MARKER, POS_RE};
use crate::lesson::VocabularyEntry;

static PRONUNCIATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[^/]+/").unwrap());

/// A decomposed vocabulary line. `consumed` is 2 when a trailing
/// "Definition:" line belongs to the entry.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub entry: VocabularyEntry,
    pub consumed: usize,
}

impl Extracted {
    pub fn is_valid(&self) -> bool {
        !self.entry.word.is_empty()
    }
}

/// Split a vocabulary line into word, pronunciation, part of speech and meaning.
/// The entry id is left empty for the caller to assign.
///
/// Two layouts are recognized:
/// `Disease (n) /ˈdɪˌziːz/ : bệnh tật` (meaning after the colon) and
/// `employ\t/ɪmˈplɔɪ/` followed by `Definition: to give somebody a job`.
pub fn extract(line: &str, next: Option<&str>) -> Extracted {
    let pronunciation = PRONUNCIATION_RE
        .find(line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let pos = POS_RE
        .captures(line)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let (head, inline_meaning) = match meaning_colon(line) {
        Some(at) => (&line[..at], Some(line[at + 1..].trim())),
        None => (line, None),
    };
    let without_pos = POS_RE.replace_all(head, "");
    let bare = PRONUNCIATION_RE.replace_all(&without_pos, "");
    let word = bare
        .split('\t')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let definition_line = next
        .filter(|n| starts_with_definition(n))
        .map(|n| n[DEFINITION_MARKER.len()..].trim());

    let definition = definition_line.unwrap_or_default().to_string();
    let meaning = match inline_meaning {
        Some(m) => m.to_string(),
        None => definition.clone(),
    };

    Extracted {
        entry: VocabularyEntry {
            id: String::new(),
            word,
            pronunciation,
            pos,
            meaning,
            definition,
            example_simple: String::new(),
        },
        consumed: if definition_line.is_some() { 2 } else { 1 },
    }
}

/// Byte offset of the first ':' outside a pronunciation.
fn meaning_colon(line: &str) -> Option<usize> {
    let spans: Vec<_> = PRONUNCIATION_RE.find_iter(line).map(|m| m.range()).collect();
    line.match_indices(':')
        .map(|(at, _)| at)
        .find(|at| !spans.iter().any(|s| s.contains(at)))
}
