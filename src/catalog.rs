use std::path::PathBuf;

use crate::parser::{LessonKind, LessonMeta};
use crate::settings::Settings;

/// A known lesson document and where its JSON goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub kind: LessonKind,
    pub unit: u32,
    /// Metadata title when the document carries none.
    pub title: &'static str,
    /// Relative to `Settings::lessons_dir`.
    pub source: &'static str,
    /// Relative to `Settings::output_dir`.
    pub output: &'static str,
}

impl Entry {
    pub fn meta(&self) -> LessonMeta {
        LessonMeta {
            unit: format!("Unit {}", self.unit),
            title: self.title.to_string(),
        }
    }

    pub fn source_path(&self, settings: &Settings) -> PathBuf {
        settings.lessons_dir.join(self.source)
    }

    pub fn output_path(&self, settings: &Settings) -> PathBuf {
        settings.output_dir.join(self.output)
    }
}

const fn listening(unit: u32, title: &'static str, source: &'static str, output: &'static str) -> Entry {
    Entry { kind: LessonKind::Listening, unit, title, source, output }
}

const fn reading(unit: u32, source: &'static str, output: &'static str) -> Entry {
    Entry { kind: LessonKind::Reading, unit, title: "", source, output }
}

pub static LESSONS: &[Entry] = &[
    listening(1, "Dolphin Conservation Trust", "listening/Unit 1 - PRE-CLASS.docx", "unit1-listening.json"),
    listening(2, "PS Camping", "listening/Unit 2 - PRE-CLASS - PS CAMPING.docx", "unit2-listening.json"),
    listening(3, "Volunteering Work", "listening/Unit 3 - PRE-CLASS - a.VOLUNTEERING.docx", "unit3-listening.json"),
    reading(1, "reading/Unit 1 - c.Saving bugs to find new drug - đọc hiểu.docx", "unit1-reading.json"),
    reading(2, "reading/Unit 2 - c. AUSTRALIAN CULTURE - đọc hiểu.docx", "unit2-reading-australian.json"),
    reading(2, "reading/Unit 2 - c.Autumn leaves - đọc hiểu.docx", "unit2-reading-autumn.json"),
    reading(3, "reading/Unit 3 - c. Battle against malaria.docx", "unit3-reading-malaria.json"),
    reading(3, "reading/Unit 3 - c.Mekete project - đọc hiểu.docx", "unit3-reading-mekete.json"),
    reading(3, "reading/Unit 3 - c.Sahara.docx", "unit3-reading-sahara.json"),
    reading(4, "reading/Unit 4 - c. SEARCHING FOR NEW MEDICINES - đọc hiểu.docx", "unit4-reading.json"),
    reading(4, "reading/Unit 4 - c. WHAT'S IN THE NAME.docx", "unit4-reading-name.json"),
    reading(4, "reading/Unit 4 - c.Should we try - đọc hiểu.docx", "unit4-should-we-try.json"),
    reading(5, "reading/Unit 5 - c. Crop-growing skyscrapers.docx", "unit5-reading-crops.json"),
    reading(5, "reading/Unit 5 - c.ORGANIC FOOD.docx", "unit5-reading-organic.json"),
    reading(5, "reading/Unit 5 - stadium - file word.docx", "unit5-reading-stadium.json"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn outputs_are_unique() {
        let outputs: HashSet<_> = LESSONS.iter().map(|e| e.output).collect();
        assert_eq!(outputs.len(), LESSONS.len());
    }

    #[test]
    fn listening_entries_carry_titles() {
        for e in LESSONS.iter().filter(|e| e.kind == LessonKind::Listening) {
            assert!(!e.title.is_empty(), "{}", e.source);
        }
        assert_eq!(LESSONS[1].meta().unit, "Unit 2");
        assert_eq!(LESSONS[1].meta().title, "PS Camping");
    }
}
