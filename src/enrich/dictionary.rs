use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::Dictionary;
use crate::error::ClientError;

const SERVICE: &str = "dictionary";

/// Senses tried in this order before falling back to the first one listed.
const PREFERRED_CATEGORIES: &[&str] = &["pronoun", "verb", "adjective", "adverb", "noun"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<SenseGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseGroup {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// The fields surfaced from one lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub pronunciation: String,
    pub pos: String,
    pub definition: String,
    pub example: String,
    pub synonyms: Vec<String>,
}

/// Pick the preferred sense of the first entry. `None` means the word has no senses.
pub fn select(entries: &[DictionaryEntry]) -> Option<Selection> {
    let entry = entries.first()?;
    let group = PREFERRED_CATEGORIES
        .iter()
        .find_map(|cat| entry.meanings.iter().find(|m| m.part_of_speech == *cat))
        .or_else(|| entry.meanings.first())?;
    let first = group.definitions.first().cloned().unwrap_or_default();

    let pronunciation = entry
        .phonetic
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| {
            entry
                .phonetics
                .iter()
                .filter_map(|p| p.text.clone())
                .find(|t| !t.is_empty())
        })
        .unwrap_or_default();

    Some(Selection {
        pronunciation,
        pos: normalize_pos(&group.part_of_speech),
        definition: first.definition,
        example: first.example.unwrap_or_default(),
        synonyms: first.synonyms,
    })
}

/// Long category names become the short codes the lesson files use.
pub fn normalize_pos(category: &str) -> String {
    match category {
        "noun" => "n",
        "verb" => "v",
        "adjective" => "adj",
        "adverb" => "adv",
        other => other,
    }
    .to_string()
}

/// dictionaryapi.dev: `GET {base}/{word}`.
pub struct DictionaryApi {
    client: Client,
    base_url: String,
}

impl DictionaryApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(DictionaryApi {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Dictionary for DictionaryApi {
    fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, ClientError> {
        let url = format!("{}/{}", self.base_url, word);
        debug!(%url, "dictionary lookup");
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status { service: SERVICE, status });
        }
        let body = resp.text()?;
        if body.trim().is_empty() {
            return Err(ClientError::Empty(SERVICE));
        }
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { service: SERVICE, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPLOY: &str = r#"[{
        "word": "employ",
        "phonetics": [{"audio": ""}, {"text": "/ɪmˈplɔɪ/", "audio": "x.mp3"}],
        "meanings": [
            {"partOfSpeech": "noun", "definitions": [{"definition": "The state of being employed.", "synonyms": []}]},
            {"partOfSpeech": "verb", "definitions": [
                {"definition": "To give someone work.", "example": "The company employs 50 people.", "synonyms": ["hire"]},
                {"definition": "To use."}
            ]}
        ]
    }]"#;

    fn parse(json: &str) -> Vec<DictionaryEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn verb_preferred_over_noun() {
        let sel = select(&parse(EMPLOY)).unwrap();
        assert_eq!(sel.pos, "v");
        assert_eq!(sel.definition, "To give someone work.");
        assert_eq!(sel.example, "The company employs 50 people.");
        assert_eq!(sel.synonyms, vec!["hire"]);
    }

    #[test]
    fn phonetic_falls_back_to_variants() {
        let sel = select(&parse(EMPLOY)).unwrap();
        assert_eq!(sel.pronunciation, "/ɪmˈplɔɪ/");

        let top = parse(r#"[{"phonetic": "/top/", "phonetics": [{"text": "/other/"}],
            "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "d"}]}]}]"#);
        assert_eq!(select(&top).unwrap().pronunciation, "/top/");
    }

    #[test]
    fn unlisted_category_uses_first_sense() {
        let entries = parse(
            r#"[{"meanings": [
                {"partOfSpeech": "interjection", "definitions": [{"definition": "A greeting."}]},
                {"partOfSpeech": "exclamation", "definitions": [{"definition": "Other."}]}
            ]}]"#,
        );
        let sel = select(&entries).unwrap();
        assert_eq!(sel.pos, "interjection");
        assert_eq!(sel.definition, "A greeting.");
        assert_eq!(sel.pronunciation, "");
    }

    #[test]
    fn no_senses() {
        assert_eq!(select(&[]), None);
        assert_eq!(select(&parse(r#"[{"word": "x", "meanings": []}]"#)), None);
    }

    #[test]
    fn pos_codes() {
        assert_eq!(normalize_pos("adjective"), "adj");
        assert_eq!(normalize_pos("adverb"), "adv");
        assert_eq!(normalize_pos("pronoun"), "pronoun");
    }
}
