use std::sync::LazyLock;

use regex::Regex;

use super::classify::{
    accepts_as_title, classify, is_blank_question, is_exercise_header, is_placeholder,
    is_single_word, is_task_header, is_word_bank_listing, section_label, starts_with_definition,
    Category,
};
use super::vocab;
use super::LessonKind;
use crate::lesson::{FillBlankQuestion, FillBlankTask, ReadingParagraph, VocabularyEntry};

static WORD_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/,]").unwrap());

/// How far back an "Exercise" line looks for its word list.
pub const WORD_BANK_LOOKBEHIND: usize = 20;

/// Document-wide id counters, threaded through a scan and handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub vocab: usize,
    pub question: usize,
    /// Tasks retained so far; the next task is `task_{tasks + 1}`.
    pub tasks: usize,
}

impl Counters {
    fn next_word_id(&mut self) -> String {
        self.vocab += 1;
        format!("word_{:03}", self.vocab)
    }

    fn next_question_id(&mut self) -> String {
        self.question += 1;
        format!("fib_{:03}", self.question)
    }

    fn upcoming_task_id(&self) -> String {
        format!("task_{}", self.tasks + 1)
    }
}

/// A task still accepting content.
#[derive(Debug, Clone)]
struct TaskBuilder {
    task: FillBlankTask,
    /// Words of vocabulary lines seen inside the task; the word-bank fallback.
    words: Vec<String>,
    /// Single-word lines, used as the bank of a reading task.
    candidates: Vec<String>,
    vocab_block: bool,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    InTask(TaskBuilder),
    InSection(ReadingParagraph),
    CollectingQuestions(TaskBuilder),
}

/// The record left open when the input ran out.
#[derive(Debug, Clone)]
pub enum OpenRecord {
    Task(FillBlankTask),
    Paragraph(ReadingParagraph),
}

/// Everything one forward pass produced, before final assembly.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub vocabulary: Vec<VocabularyEntry>,
    pub paragraphs: Vec<ReadingParagraph>,
    pub tasks: Vec<FillBlankTask>,
    pub title: Option<String>,
    pub open: Option<OpenRecord>,
    pub counters: Counters,
}

impl Scan {
    /// Keep a closed task only if it has a word bank or questions.
    pub fn commit_task(&mut self, task: FillBlankTask) {
        if task.has_content() {
            self.tasks.push(task);
            self.counters.tasks += 1;
        }
    }

    pub fn commit_paragraph(&mut self, paragraph: ReadingParagraph) {
        if !paragraph.text.is_empty() {
            self.paragraphs.push(paragraph);
        }
    }
}

struct Segmenter {
    kind: LessonKind,
    state: State,
    section_seen: bool,
    out: Scan,
}

/// Walk the lines once. Each step consumes one or two lines, or zero when it
/// only closes the open record so the same line is dispatched again from `Idle`.
pub fn scan(lines: &[String], kind: LessonKind, counters: Counters) -> Scan {
    let mut seg = Segmenter {
        kind,
        state: State::Idle,
        section_seen: false,
        out: Scan {
            counters,
            ..Scan::default()
        },
    };

    let mut i = 0;
    while i < lines.len() {
        i += seg.step(lines, i);
    }

    seg.out.open = match seg.state {
        State::Idle => None,
        State::InTask(b) | State::CollectingQuestions(b) => Some(OpenRecord::Task(b.task)),
        State::InSection(p) => Some(OpenRecord::Paragraph(p)),
    };
    seg.out
}

impl Segmenter {
    fn step(&mut self, lines: &[String], i: usize) -> usize {
        let line = lines[i].as_str();
        let next = lines.get(i + 1).map(String::as_str);
        let category = self.categorize(line, next);

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => self.idle(line, category),
            State::InTask(b) => self.in_task(b, lines, i, category),
            State::InSection(p) => self.in_section(p, line, next, category),
            State::CollectingQuestions(b) => self.collecting(b, line, category),
        }
    }

    /// Listening documents have no reading passage and no separate vocabulary block.
    fn categorize(&self, line: &str, next: Option<&str>) -> Category {
        match (self.kind, classify(line, next)) {
            (LessonKind::Listening, Category::VocabHeader) => Category::TaskHeader,
            (LessonKind::Listening, Category::SectionHeader | Category::AllCapsTitle) => Category::Other,
            (_, c) => c,
        }
    }

    fn idle(&mut self, line: &str, category: Category) -> usize {
        match category {
            Category::TaskHeader | Category::VocabHeader => {
                self.state = State::InTask(TaskBuilder {
                    task: FillBlankTask {
                        id: self.out.counters.upcoming_task_id(),
                        title: line.to_string(),
                        word_bank: Vec::new(),
                        questions: Vec::new(),
                    },
                    words: Vec::new(),
                    candidates: Vec::new(),
                    vocab_block: category == Category::VocabHeader,
                });
            }
            Category::SectionHeader => {
                self.section_seen = true;
                if let Some(label) = section_label(line) {
                    self.state = State::InSection(ReadingParagraph {
                        id: format!("para_{}", label.to_ascii_lowercase()),
                        label: label.to_string(),
                        ..ReadingParagraph::default()
                    });
                }
            }
            Category::AllCapsTitle => {
                if self.out.title.is_none() && !self.section_seen && accepts_as_title(line) {
                    self.out.title = Some(line.trim_end_matches('.').trim().to_string());
                }
            }
            _ => {}
        }
        1
    }

    fn in_task(&mut self, mut b: TaskBuilder, lines: &[String], i: usize, category: Category) -> usize {
        let line = lines[i].as_str();
        let next = lines.get(i + 1).map(String::as_str);
        let reading_fill = self.kind == LessonKind::Reading && !b.vocab_block;

        match category {
            Category::TaskHeader
            | Category::VocabHeader
            | Category::SectionHeader
            | Category::AllCapsTitle => {
                self.out.commit_task(b.task);
                0
            }
            Category::ExerciseHeader => {
                b.task.word_bank = recover_word_bank(lines, i).unwrap_or_else(|| b.words.clone());
                self.state = State::CollectingQuestions(b);
                1
            }
            Category::VocabularyLine if is_word_bank_listing(line) => {
                self.state = State::InTask(b);
                1
            }
            Category::VocabularyLine => {
                let consumed = self.take_vocabulary(&mut b, line, next);
                self.state = State::InTask(b);
                consumed
            }
            Category::Other
                if b.vocab_block && line.matches(':').count() == 1 && !is_word_bank_listing(line) =>
            {
                let consumed = self.take_vocabulary(&mut b, line, next);
                self.state = State::InTask(b);
                consumed
            }
            Category::BlankQuestion if reading_fill => {
                if b.task.word_bank.is_empty() {
                    b.task.word_bank = std::mem::take(&mut b.candidates);
                }
                self.state = State::CollectingQuestions(b);
                0
            }
            Category::Other if reading_fill && is_single_word(line) => {
                b.candidates.push(line.to_string());
                self.state = State::InTask(b);
                1
            }
            _ => {
                self.state = State::InTask(b);
                1
            }
        }
    }

    fn take_vocabulary(&mut self, b: &mut TaskBuilder, line: &str, next: Option<&str>) -> usize {
        let extracted = vocab::extract(line, next);
        if extracted.is_valid() {
            let mut entry = extracted.entry;
            entry.id = self.out.counters.next_word_id();
            b.words.push(entry.word.clone());
            self.out.vocabulary.push(entry);
        }
        extracted.consumed
    }

    fn collecting(&mut self, mut b: TaskBuilder, line: &str, category: Category) -> usize {
        match category {
            // The task stays open: another exercise may follow for the same task.
            Category::TaskHeader
            | Category::VocabHeader
            | Category::ExerciseHeader
            | Category::SectionHeader
            | Category::AllCapsTitle => {
                self.state = State::InTask(b);
                0
            }
            _ => {
                if is_blank_question(line) {
                    b.task.questions.push(FillBlankQuestion {
                        id: self.out.counters.next_question_id(),
                        sentence: line.to_string(),
                        answer: String::new(),
                        translation: String::new(),
                    });
                }
                self.state = State::CollectingQuestions(b);
                1
            }
        }
    }

    fn in_section(
        &mut self,
        mut p: ReadingParagraph,
        line: &str,
        next: Option<&str>,
        category: Category,
    ) -> usize {
        match category {
            Category::SectionHeader | Category::TaskHeader | Category::VocabHeader => {
                self.out.commit_paragraph(p);
                return 0;
            }
            // Glossary lines already captured by the vocabulary block. Prose with
            // "(a)" or "km/h" also lands here and is kept.
            Category::VocabularyLine if line.contains(':') => {
                self.state = State::InSection(p);
                return 1;
            }
            Category::VocabularyLine if next.is_some_and(starts_with_definition) => {
                self.state = State::InSection(p);
                return 2;
            }
            _ => {}
        }

        if !is_placeholder(line) {
            if !p.text.is_empty() {
                p.text.push(' ');
            }
            p.text.push_str(line);
        }
        self.state = State::InSection(p);
        1
    }
}

/// Look back from an "Exercise" line for a "Từ vựng: a / b / c" style word list,
/// stopping at the previous task or exercise header.
pub fn recover_word_bank(lines: &[String], exercise_idx: usize) -> Option<Vec<String>> {
    let start = exercise_idx.saturating_sub(WORD_BANK_LOOKBEHIND);
    for prev in lines[start..exercise_idx].iter().rev() {
        if is_task_header(prev) || is_exercise_header(prev) {
            break;
        }
        if !is_word_bank_listing(prev) {
            continue;
        }
        if let Some((_, listed)) = prev.split_once(':') {
            let words: Vec<String> = WORD_SPLIT_RE
                .split(listed)
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect();
            return if words.is_empty() { None } else { Some(words) };
        }
    }
    None
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    fn listening(text: &str) -> Scan {
        scan(&lines(text), LessonKind::Listening, Counters::default())
    }

    fn reading(text: &str) -> Scan {
        scan(&lines(text), LessonKind::Reading, Counters::default())
    }

    fn open_task(s: &Scan) -> &FillBlankTask {
        match &s.open {
            Some(OpenRecord::Task(t)) => t,
            other => panic!("expected an open task, got {:?}", other),
        }
    }

    #[test]
    fn vocabulary_inside_task() {
        let s = listening(
            "Task 1\n\
             employ\t/ɪmˈplɔɪ/\n\
             Definition: to give somebody a job\n\
             purpose\t/ˈpɝː.pəs/\n\
             Definition: the intention of something",
        );
        assert_eq!(s.vocabulary.len(), 2);
        assert_eq!(s.vocabulary[0].id, "word_001");
        assert_eq!(s.vocabulary[0].word, "employ");
        assert_eq!(s.vocabulary[1].id, "word_002");
        assert_eq!(s.vocabulary[1].meaning, "the intention of something");
        assert_eq!(s.counters.vocab, 2);
    }

    #[test]
    fn vocabulary_outside_task_is_ignored() {
        let s = listening("employ\t/ɪmˈplɔɪ/\nDefinition: to give somebody a job");
        assert!(s.vocabulary.is_empty());
        assert!(s.open.is_none());
    }

    #[test]
    fn exercise_recovers_listed_word_bank() {
        let s = listening(
            "Task 1\n\
             Từ vựng: employ / pleased / suffered, campaign\n\
             Exercise A\n\
             We hope to have enough money to ……… an expert.\n\
             We're so ……… you could come to the wedding.",
        );
        let t = open_task(&s);
        assert_eq!(t.word_bank, vec!["employ", "pleased", "suffered", "campaign"]);
        assert_eq!(t.questions.len(), 2);
        assert_eq!(t.questions[0].id, "fib_001");
        assert_eq!(t.questions[1].id, "fib_002");
        assert!(s.vocabulary.is_empty());
    }

    #[test]
    fn exercise_falls_back_to_task_vocabulary() {
        let s = listening(
            "Task 1\n\
             Vocabulary: trust, haven\n\
             Exercise A\n\
             He works for a charitable ……… .\n\
             Task 2\n\
             rating (n)\n\
             superb (adj)\n\
             Exercise A\n\
             The hotel has a five-star ……… .",
        );
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.tasks[0].word_bank, vec!["trust", "haven"]);
        let t = open_task(&s);
        assert_eq!(t.id, "task_2");
        assert_eq!(t.word_bank, vec!["rating", "superb"]);
    }

    #[test]
    fn task_header_directly_before_exercise_gets_no_foreign_bank() {
        let s = listening(
            "Task 1\n\
             Từ vựng: trust / haven\n\
             Exercise A\n\
             He works for a charitable ……… .\n\
             Task 2\n\
             Exercise A\n\
             The hotel has a five-star ……… .",
        );
        let t = open_task(&s);
        assert!(t.word_bank.is_empty());
        assert_eq!(t.questions.len(), 1);
        assert_eq!(t.questions[0].id, "fib_002");
    }

    #[test]
    fn lookbehind_is_bounded() {
        let mut text = vec!["Task 1".to_string(), "Từ vựng: far / away".to_string()];
        for n in 0..WORD_BANK_LOOKBEHIND {
            text.push(format!("filler line {n}"));
        }
        text.push("Exercise A".to_string());
        let exercise = text.len() - 1;
        assert_eq!(recover_word_bank(&text, exercise), None);

        text.remove(2);
        let exercise = text.len() - 1;
        assert_eq!(
            recover_word_bank(&text, exercise),
            Some(vec!["far".to_string(), "away".to_string()])
        );
    }

    #[test]
    fn questions_ids_are_document_global() {
        let s = listening(
            "Task 1\n\
             Exercise A\n\
             First question with a ……… here.\n\
             Exercise B\n\
             Second question with a ……… here.\n\
             Task 2\n\
             Exercise A\n\
             Third question with a ……… here.",
        );
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.tasks[0].questions.len(), 2);
        assert_eq!(s.tasks[0].questions[1].id, "fib_002");
        assert_eq!(open_task(&s).questions[0].id, "fib_003");
        assert_eq!(s.counters.question, 3);
    }

    #[test]
    fn empty_tasks_do_not_use_up_ids() {
        let s = listening(
            "Task 1\n\
             Some instructions.\n\
             Task 2\n\
             Exercise A\n\
             The hotel has a five-star ……… .\n\
             Task 3",
        );
        assert_eq!(s.tasks.len(), 1);
        assert_eq!(s.tasks[0].id, "task_1");
        assert_eq!(s.tasks[0].title, "Task 2");
        assert_eq!(open_task(&s).id, "task_2");
    }

    #[test]
    fn separators_and_vocabulary_are_not_questions() {
        let dots = ".".repeat(60);
        let text = format!(
            "Task 1\nExercise A\n{dots}\nfacilities (n)\nThe campsite has excellent ……… .\n"
        );
        let s = listening(&text);
        let t = open_task(&s);
        assert_eq!(t.questions.len(), 1);
        assert!(t.questions[0].sentence.starts_with("The campsite"));
        // Vocabulary is not extracted while collecting questions.
        assert!(s.vocabulary.is_empty());
    }

    #[test]
    fn listening_ignores_reading_markers() {
        let s = listening("A.  Main idea:\nThe forest was huge.\nDOLPHIN CONSERVATION TRUST");
        assert!(s.paragraphs.is_empty());
        assert!(s.open.is_none());
        assert!(s.title.is_none());
    }

    #[test]
    fn reading_section_skips_vocabulary_lines() {
        let s = reading(
            "A.  Main idea:\n\
             Rainforest (n): rừng mưa nhiệt đới\n\
             The forest was huge.",
        );
        match &s.open {
            Some(OpenRecord::Paragraph(p)) => {
                assert_eq!(p.id, "para_a");
                assert_eq!(p.label, "A");
                assert_eq!(p.text, "The forest was huge.");
            }
            other => panic!("expected an open paragraph, got {:?}", other),
        }
    }

    #[test]
    fn reading_section_keeps_prose_that_looks_like_vocabulary() {
        let s = reading(
            "A. Main idea:\n\
             Researchers tested (a) plants and (d) insects.\n\
             Speeds rose from 10 km/h to 20 km/h.\n\
             He paused....\n\
             C. We ……… an expert.\n\
             The forest was huge.",
        );
        match &s.open {
            Some(OpenRecord::Paragraph(p)) => assert_eq!(
                p.text,
                "Researchers tested (a) plants and (d) insects. \
                 Speeds rose from 10 km/h to 20 km/h. He paused.... The forest was huge."
            ),
            other => panic!("expected an open paragraph, got {:?}", other),
        }
    }

    #[test]
    fn reading_section_skips_definition_style_entries() {
        let s = reading(
            "B. Main idea:\n\
             employ\n\
             Definition: to give somebody a job\n\
             They employ local guides.",
        );
        match &s.open {
            Some(OpenRecord::Paragraph(p)) => assert_eq!(p.text, "They employ local guides."),
            other => panic!("expected an open paragraph, got {:?}", other),
        }
    }

    #[test]
    fn round_listing_is_a_word_bank_not_vocabulary() {
        let s = listening(
            "Task 1\n\
             Round 1: oven / mop / bucket\n\
             Exercise A\n\
             Put the tray in the ……… now.",
        );
        assert!(s.vocabulary.is_empty());
        assert_eq!(open_task(&s).word_bank, vec!["oven", "mop", "bucket"]);
    }

    #[test]
    fn reading_sections_join_and_close() {
        let s = reading(
            "A. Main idea: ……………………\n\
             First sentence.\n\
             Second sentence.\n\
             B. Main idea: ……………………\n\
             C. Main idea: ……………………\n\
             Third sentence.\n\
             Task 3\n\
             Exercise A\n\
             A question with a ……… in it.",
        );
        assert_eq!(s.paragraphs.len(), 2);
        assert_eq!(s.paragraphs[0].text, "First sentence. Second sentence.");
        assert_eq!(s.paragraphs[1].id, "para_c");
        assert_eq!(open_task(&s).questions.len(), 1);
    }

    #[test]
    fn reading_title_taken_once_before_sections() {
        let s = reading(
            "READING COMPREHENSION:\n\
             SEARCHING FOR NEW MEDICINES.\n\
             SOMETHING ELSE ENTIRELY\n\
             A. Main idea:\n\
             ANOTHER CAPS LINE\n\
             Body.",
        );
        assert_eq!(s.title.as_deref(), Some("SEARCHING FOR NEW MEDICINES"));
        match &s.open {
            Some(OpenRecord::Paragraph(p)) => assert_eq!(p.text, "ANOTHER CAPS LINE Body."),
            other => panic!("expected an open paragraph, got {:?}", other),
        }
    }

    #[test]
    fn reading_vocabulary_block_accepts_colon_entries() {
        let s = reading(
            "Task 1: Vocabulary\n\
             Disease (n) /ˈdɪˌziːz/ : bệnh tật\n\
             Rainforest: rừng mưa nhiệt đới\n\
             Not: an: entry\n\
             Task 2: Fill in the blanks",
        );
        let words: Vec<&str> = s.vocabulary.iter().map(|v| v.word.as_str()).collect();
        assert_eq!(words, vec!["Disease", "Rainforest"]);
        // The vocabulary block has no bank or questions and is dropped.
        assert!(s.tasks.is_empty());
        assert_eq!(open_task(&s).id, "task_1");
    }

    #[test]
    fn reading_task_without_exercise_line() {
        let s = reading(
            "Task 2: Complete the sentences\n\
             disease\n\
             medicine\n\
             Doctors are fighting the ____ .\n\
             This ____ is very strong.\n\
             WHAT IS IN A NAME",
        );
        assert_eq!(s.tasks.len(), 1);
        let t = &s.tasks[0];
        assert_eq!(t.word_bank, vec!["disease", "medicine"]);
        assert_eq!(t.questions.len(), 2);
        assert_eq!(s.title.as_deref(), Some("WHAT IS IN A NAME"));
        assert!(s.open.is_none());
    }

    #[test]
    fn counters_continue_from_input() {
        let start = Counters { vocab: 10, question: 4, tasks: 2 };
        let s = scan(
            &lines("Task 9\nmop (n)\nExercise A\nI need a ……… for the floor."),
            LessonKind::Listening,
            start,
        );
        assert_eq!(s.vocabulary[0].id, "word_011");
        let t = open_task(&s);
        assert_eq!(t.id, "task_3");
        assert_eq!(t.questions[0].id, "fib_005");
    }

    #[test]
    fn every_line_shape_terminates() {
        let text = "Task\nExercise\nTask 1:\nA. Main idea:\nALL CAPS LINE\n____ ____\nword\nDefinition:";
        for kind in [LessonKind::Listening, LessonKind::Reading] {
            let s = scan(&lines(text), kind, Counters::default());
            assert!(s.vocabulary.iter().all(|v| !v.word.is_empty()));
        }
    }
}
