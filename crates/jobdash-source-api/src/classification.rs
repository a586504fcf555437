//! Job classification: test-job detection by keyword matching on job names,
//! and folder membership derived from a job's URL

use serde::{
    Deserialize,
    Serialize,
};

pub const DEFAULT_TEST_KEYWORDS: &[&str] =
    &["test", "testing", "tst", "demo", "trial", "experiment"];

/// Names that contain a test keyword as a substring without being test jobs.
pub const DEFAULT_EXCLUDE_WORDS: &[&str] = &["latest", "attest", "contest"];

/// Keyword lists deciding whether a job is a test job.
///
/// Both lists are stored trimmed and lowercased with empty entries removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRules {
    test_keywords: Vec<String>,
    exclude_words: Vec<String>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_KEYWORDS, DEFAULT_EXCLUDE_WORDS)
    }
}

impl ClassificationRules {
    pub fn new<K, E>(test_keywords: K, exclude_words: E) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            test_keywords: normalize(test_keywords),
            exclude_words: normalize(exclude_words),
        }
    }

    pub fn test_keywords(&self) -> &[String] {
        &self.test_keywords
    }

    pub fn exclude_words(&self) -> &[String] {
        &self.exclude_words
    }

    /// True iff the lowercased name contains a test keyword and no exclude
    /// word. An exclude word anywhere in the name wins.
    pub fn is_test_job(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }

        let name = name.to_lowercase();

        if self.exclude_words.iter().any(|w| name.contains(w.as_str())) {
            return false;
        }

        self.test_keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

/// Splits a comma-separated keyword list.
pub fn parse_keyword_list(input: &str) -> Vec<String> {
    normalize(input.split(','))
}

/// Folder path of a job, taken from the URL segments between consecutive
/// `/job/` markers with the leaf segment dropped. Root-level jobs get `"/"`.
pub fn folder_from_url(url: &str) -> String {
    let segments: Vec<&str> = url
        .split("/job/")
        .skip(1)
        .map(|s| s.trim_end_matches('/'))
        .collect();

    if segments.len() < 2 {
        return String::from("/");
    }

    let folder = segments[..segments.len() - 1].join("/");
    match urlencoding::decode(&folder) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => folder,
    }
}

fn normalize<I>(words: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}
