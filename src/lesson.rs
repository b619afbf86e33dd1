use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTRUCTIONS: &str = "Complete the sentences using the words from the box.";

/// One converted lesson document, in the shape the web app loads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub metadata: Metadata,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    pub reading: Reading,
    #[serde(default)]
    pub fill_in_the_blanks: FillInTheBlanks,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub title: String,
}

/// Every optional field is an empty string when unknown, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example_simple: String,
}

impl VocabularyEntry {
    pub fn is_complete(&self) -> bool {
        !self.pronunciation.is_empty()
            && !self.pos.is_empty()
            && !self.meaning.is_empty()
            && !self.definition.is_empty()
            && !self.example_simple.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<ReadingParagraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingParagraph {
    pub id: String,
    pub label: String,
    pub text: String,
    #[serde(default)]
    pub translation: String,
    /// Filled in by hand; conversion always leaves it empty.
    #[serde(default)]
    pub main_idea: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlanks {
    #[serde(default = "default_instructions")]
    pub instructions: String,
    #[serde(default)]
    pub tasks: Vec<FillBlankTask>,
}

impl Default for FillInTheBlanks {
    fn default() -> Self {
        FillInTheBlanks {
            instructions: default_instructions(),
            tasks: Vec::new(),
        }
    }
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankTask {
    pub id: String,
    pub title: String,
    /// Shown to the learner in this order.
    #[serde(default)]
    pub word_bank: Vec<String>,
    #[serde(default)]
    pub questions: Vec<FillBlankQuestion>,
}

impl FillBlankTask {
    pub fn has_content(&self) -> bool {
        !self.word_bank.is_empty() || !self.questions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FillBlankQuestion {
    pub id: String,
    pub sentence: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub translation: String,
}

/// Populated-field counts, printed after conversion and enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonStats {
    pub words: usize,
    pub with_meaning: usize,
    pub with_definition: usize,
    pub with_pronunciation: usize,
    pub with_example: usize,
    pub paragraphs: usize,
    pub translated_paragraphs: usize,
    pub tasks: usize,
    pub questions: usize,
}

impl LessonStats {
    pub fn of(lesson: &Lesson) -> Self {
        let vocab = &lesson.vocabulary;
        let paragraphs = &lesson.reading.paragraphs;
        let tasks = &lesson.fill_in_the_blanks.tasks;

        LessonStats {
            words: vocab.len(),
            with_meaning: filled(vocab, |w| w.meaning.as_str()),
            with_definition: filled(vocab, |w| w.definition.as_str()),
            with_pronunciation: filled(vocab, |w| w.pronunciation.as_str()),
            with_example: filled(vocab, |w| w.example_simple.as_str()),
            paragraphs: paragraphs.len(),
            translated_paragraphs: paragraphs.iter().filter(|p| !p.translation.is_empty()).count(),
            tasks: tasks.len(),
            questions: tasks.iter().map(|t| t.questions.len()).sum(),
        }
    }

    pub fn print(&self) {
        println!("  Vocabulary: {} words", self.words);
        println!("    - With meaning (VN):   {}/{}", self.with_meaning, self.words);
        println!("    - With definition (EN): {}/{}", self.with_definition, self.words);
        println!("    - With pronunciation:  {}/{}", self.with_pronunciation, self.words);
        println!("    - With examples:       {}/{}", self.with_example, self.words);
        if self.paragraphs > 0 {
            println!(
                "  Reading: {} paragraphs ({} translated)",
                self.paragraphs, self.translated_paragraphs
            );
        }
        println!("  Fill-in-blank: {} tasks, {} questions", self.tasks, self.questions);
    }
}

fn filled(vocab: &[VocabularyEntry], field: impl Fn(&VocabularyEntry) -> &str) -> usize {
    vocab.iter().filter(|w| !field(w).is_empty()).count()
}
