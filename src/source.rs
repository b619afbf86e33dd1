use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

/// Read a lesson document as trimmed, non-empty paragraph lines in source order.
/// `.docx` goes through docx-rs; anything else is read as plain text, one
/// paragraph per line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));

    let paragraphs = if is_docx {
        docx_paragraphs(path)?
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?
            .lines()
            .map(String::from)
            .collect()
    };

    Ok(paragraphs
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

fn docx_paragraphs(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("Cannot read '{}'", path.display()))?;
    let docx = read_docx(&bytes)
        .map_err(|e| anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect())
}

/// Runs are parts of one paragraph and join with no separator. Tabs are kept:
/// vocabulary tables use them as column breaks.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};

    #[test]
    fn text_lines_are_trimmed_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.txt");
        fs::write(&path, "  Task 1  \n\n\t\nmop (n)\t\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["Task 1", "mop (n)"]);
    }

    #[test]
    fn docx_runs_join_and_tabs_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Unit 1 - PRE-CLASS.docx");
        let file = fs::File::create(&path).unwrap();
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Task 1")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("employ"))
                    .add_run(Run::new().add_tab().add_text("/ɪmˈplɔɪ/")),
            )
            .build()
            .pack(file)
            .unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["Task 1", "employ\t/ɪmˈplɔɪ/"]);
    }

    #[test]
    fn fixture_reads_like_the_parser_expects() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/listening_unit2.txt");
        let lines = read_lines(&path).unwrap();
        assert_eq!(lines[0], "PRE-CLASS");
        assert!(lines.iter().all(|l| l == l.trim() && !l.is_empty()));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_lines(Path::new("lessons/none.docx")).is_err());
    }
}
