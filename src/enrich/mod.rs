pub mod dictionary;
pub mod translate;

use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::lesson::{Lesson, ReadingParagraph, VocabularyEntry};
use dictionary::{select, DictionaryEntry};

static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

pub trait Dictionary {
    /// `Ok(vec![])` or entries without senses mean the word is unknown;
    /// `Err` means the lookup itself failed.
    fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, ClientError>;
}

pub trait Translator {
    /// `Ok("")` is an empty translation, not a failure.
    fn translate(&self, text: &str) -> Result<String, ClientError>;
}

/// Fixed pause after every external call.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    cooldown: Duration,
}

impl Pacer {
    pub fn new(cooldown: Duration) -> Self {
        Pacer { cooldown }
    }

    pub fn pause(&self) {
        if !self.cooldown.is_zero() {
            thread::sleep(self.cooldown);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Paragraphs longer than this many characters are translated sentence by sentence.
    pub chunk_limit: usize,
    pub translate_questions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            chunk_limit: 450,
            translate_questions: false,
        }
    }
}

/// What one enrichment pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub entries_updated: usize,
    pub entries_skipped: usize,
    pub paragraphs_translated: usize,
    pub questions_translated: usize,
    pub failed_calls: usize,
}

/// "give sth up", "either/or", "take part": dictionary lookups are unreliable for these.
pub fn is_phrase(word: &str) -> bool {
    word.split_whitespace().count() > 1 || word.contains('/') || word.to_lowercase().contains("sth")
}

/// Cut after sentence-ending punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        // The punctuation is one ASCII byte.
        units.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    units.push(&text[start..]);
    units.into_iter().map(str::trim).filter(|u| !u.is_empty()).collect()
}

/// Fills empty optional fields from the dictionary and translator. Nothing
/// already populated is overwritten, so a second pass changes nothing.
pub struct Enricher<D, T> {
    dictionary: D,
    translator: T,
    pacer: Pacer,
    options: Options,
}

impl<D: Dictionary, T: Translator> Enricher<D, T> {
    pub fn new(dictionary: D, translator: T, pacer: Pacer, options: Options) -> Self {
        Enricher {
            dictionary,
            translator,
            pacer,
            options,
        }
    }

    pub fn enrich(&self, lesson: &mut Lesson) -> Report {
        let mut report = Report::default();

        let pb = ProgressBar::new(lesson.vocabulary.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}") {
            pb.set_style(style.progress_chars("=> "));
        }
        for entry in &mut lesson.vocabulary {
            pb.set_message(entry.word.clone());
            self.enrich_entry(entry, &mut report);
            pb.inc(1);
        }
        pb.finish_and_clear();

        for paragraph in &mut lesson.reading.paragraphs {
            self.enrich_paragraph(paragraph, &mut report);
        }

        if self.options.translate_questions {
            for task in &mut lesson.fill_in_the_blanks.tasks {
                for question in &mut task.questions {
                    if !question.translation.is_empty() || question.sentence.is_empty() {
                        continue;
                    }
                    if let Some(t) = self.translate(&question.sentence, &question.id, &mut report) {
                        question.translation = t;
                        report.questions_translated += 1;
                    }
                }
            }
        }

        info!(
            updated = report.entries_updated,
            skipped = report.entries_skipped,
            paragraphs = report.paragraphs_translated,
            questions = report.questions_translated,
            failed = report.failed_calls,
            "enrichment finished"
        );
        report
    }

    pub fn enrich_entry(&self, entry: &mut VocabularyEntry, report: &mut Report) {
        if entry.word.is_empty() {
            return;
        }
        if entry.is_complete() {
            report.entries_skipped += 1;
            return;
        }
        let before = entry.clone();
        let word = entry.word.clone();

        if is_phrase(&word) {
            debug!(word = %word, "phrase, translation only");
            if entry.meaning.is_empty() {
                if let Some(t) = self.translate(&word, &word, report) {
                    entry.meaning = t;
                }
            }
            if entry.definition.is_empty() {
                entry.definition = word;
            }
        } else {
            self.enrich_word(entry, report);
        }

        if *entry != before {
            report.entries_updated += 1;
        }
    }

    fn enrich_word(&self, entry: &mut VocabularyEntry, report: &mut Report) {
        let word = entry.word.clone();
        let looked_up = self.dictionary.lookup(&word);
        self.pacer.pause();

        let selection = match looked_up {
            Ok(entries) => {
                let sel = select(&entries);
                if sel.is_none() {
                    debug!(word = %word, "no senses");
                }
                sel
            }
            Err(e) => {
                warn!(word = %word, error = %e, "dictionary lookup failed");
                report.failed_calls += 1;
                None
            }
        };

        let Some(sel) = selection else {
            if entry.meaning.is_empty() {
                if let Some(t) = self.translate(&word, &word, report) {
                    entry.meaning = t;
                }
            }
            return;
        };

        debug!(word = %word, pos = %sel.pos, synonyms = ?sel.synonyms, "sense selected");
        fill(&mut entry.pronunciation, sel.pronunciation);
        fill(&mut entry.pos, sel.pos);
        fill(&mut entry.example_simple, sel.example);
        if entry.meaning.is_empty() && !sel.definition.is_empty() {
            if let Some(t) = self.translate(&sel.definition, &word, report) {
                entry.meaning = t;
            }
        }
        fill(&mut entry.definition, sel.definition);
    }

    pub fn enrich_paragraph(&self, paragraph: &mut ReadingParagraph, report: &mut Report) {
        if !paragraph.translation.is_empty() || paragraph.text.is_empty() {
            return;
        }
        let id = paragraph.id.clone();

        let translation = if paragraph.text.chars().count() > self.options.chunk_limit {
            let units = split_sentences(&paragraph.text);
            let mut translated_any = false;
            let parts: Vec<String> = units
                .iter()
                .map(|unit| match self.translate(unit, &id, report) {
                    Some(t) => {
                        translated_any = true;
                        t
                    }
                    None => unit.to_string(),
                })
                .collect();
            if translated_any {
                parts.join(" ")
            } else {
                String::new()
            }
        } else {
            self.translate(&paragraph.text, &id, report).unwrap_or_default()
        };

        if translation.is_empty() {
            warn!(paragraph = %id, "translation failed");
        } else {
            paragraph.translation = translation;
            report.paragraphs_translated += 1;
        }
    }

    /// One paced translator call. `None` on failure or an empty result; `subject`
    /// names the word or record in the log.
    fn translate(&self, text: &str, subject: &str, report: &mut Report) -> Option<String> {
        let result = self.translator.translate(text);
        self.pacer.pause();
        match result {
            Ok(t) if !t.trim().is_empty() => Some(t),
            Ok(_) => {
                debug!(subject, "empty translation");
                None
            }
            Err(e) => {
                warn!(subject, error = %e, "translation failed");
                report.failed_calls += 1;
                None
            }
        }
    }
}

fn fill(field: &mut String, value: String) {
    if field.is_empty() && !value.is_empty() {
        *field = value;
    }
}

// ── Tests ──
