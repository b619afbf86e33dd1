pub mod assemble;
pub mod classify;
pub mod segment;
pub mod vocab;

use serde::{Deserialize, Serialize};

use crate::lesson::Lesson;
pub use assemble::LessonMeta;
pub use segment::Counters;

/// Which document layout the lines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Listening,
    Reading,
}

/// Single pass: lines → segmented records → lesson.
pub fn convert(lines: &[String], kind: LessonKind, meta: &LessonMeta) -> Lesson {
    convert_from(lines, kind, meta, Counters::default()).0
}

/// Same as [`convert`], continuing ids from `counters` and returning where they ended.
pub fn convert_from(
    lines: &[String],
    kind: LessonKind,
    meta: &LessonMeta,
    counters: Counters,
) -> (Lesson, Counters) {
    let scan = segment::scan(lines, kind, counters);
    assemble::assemble(scan, meta)
}

// ── Tests ──
