use super::segment::{Counters, OpenRecord, Scan};
use crate::lesson::{FillInTheBlanks, Lesson, Metadata, Reading};

/// Catalog/CLI supplied facts about a lesson that the document itself may not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonMeta {
    /// Display form, e.g. "Unit 3".
    pub unit: String,
    /// Used when the document has no all-caps passage title.
    pub title: String,
}

/// Close whatever the scan left open, drop empty tasks and shape the lesson.
pub fn assemble(mut scan: Scan, meta: &LessonMeta) -> (Lesson, Counters) {
    match scan.open.take() {
        Some(OpenRecord::Task(task)) => scan.commit_task(task),
        Some(OpenRecord::Paragraph(paragraph)) => scan.commit_paragraph(paragraph),
        None => {}
    }
    scan.tasks.retain(|t| t.has_content());
    scan.vocabulary.retain(|v| !v.word.is_empty());

    let reading_title = scan.title.unwrap_or_default();
    let title = if reading_title.is_empty() {
        meta.title.clone()
    } else {
        reading_title.clone()
    };

    let lesson = Lesson {
        metadata: Metadata {
            unit: meta.unit.clone(),
            title,
        },
        vocabulary: scan.vocabulary,
        reading: Reading {
            title: reading_title,
            paragraphs: scan.paragraphs,
        },
        fill_in_the_blanks: FillInTheBlanks {
            tasks: scan.tasks,
            ..FillInTheBlanks::default()
        },
    };
    (lesson, scan.counters)
}
