//! Article text validation: front matter, required metadata and body checks.
//!
//! [`inspect`] returns the problems as data, in a fixed order:
//!
//! 1. empty text;
//! 2. missing opening delimiter (stops here);
//! 3. unterminated front matter (stops here);
//! 4. missing metadata keys, when the front matter parses as YAML;
//! 5. body images without alt text, by 1-based line number.
//!
//! Front matter that is not valid YAML skips step 4 silently; the body is
//! still scanned.

use std::sync::LazyLock;

use regex::Regex;

/// An image embed with empty alt text and a non-empty target: `![](target)`.
static IMAGE_WITHOUT_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\]\([^)]+\)").expect("image pattern is valid"));

const MIN_DELIMITER_LEN: usize = 3;

/// Metadata keys every article must declare, in reporting order.
pub const REQUIRED_KEYS: [&str; 5] = ["meta_extra", "forum_id", "author", "categories", "tags"];

/// One problem found in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentProblem {
    /// The file is empty.
    NoContent,
    /// The first line is not a `---` delimiter.
    MissingFrontMatter,
    /// The front matter is never closed, or nothing follows it.
    MalformedDelimiter,
    /// A required metadata key is absent.
    MissingKey(&'static str),
    /// An image on this 1-based line has no alt text.
    MissingAltText {
        /// 1-based line number in the file.
        line: usize,
    },
}

impl std::fmt::Display for ContentProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoContent => write!(f, "The file has no content."),
            Self::MissingFrontMatter => write!(
                f,
                "The YAML front matter is missing; the file should start with a `---` line."
            ),
            Self::MalformedDelimiter => write!(
                f,
                "The YAML front matter delimiters look wrong; put the metadata between two `---` lines."
            ),
            Self::MissingKey("meta_extra") => {
                write!(f, "Please add a line `meta_extra: \"\"` to the front matter.")
            }
            Self::MissingKey("forum_id") => write!(
                f,
                "Please add a line `forum_id:` to the front matter. An editor will fill it in before publishing."
            ),
            Self::MissingKey(key) => write!(f, "Please add a `{key}` value to the front matter."),
            Self::MissingAltText { line } => write!(
                f,
                "The image on line {line} has no alt text. Alt text matters for accessible reading; please consider adding it."
            ),
        }
    }
}

/// Inspects article text and returns every problem found, in reporting order.
pub fn inspect(text: &str) -> Vec<ContentProblem> {
    if text.is_empty() {
        return vec![ContentProblem::NoContent];
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let opening = lines[0].trim_end();
    if opening.len() < MIN_DELIMITER_LEN || !opening.chars().all(|c| c == '-') {
        return vec![ContentProblem::MissingFrontMatter];
    }

    let Some(body_start) = find_body_start(&lines, opening.len()) else {
        return vec![ContentProblem::MalformedDelimiter];
    };

    let mut problems = Vec::new();

    let front_matter = lines[1..body_start - 1].join("\n");
    match parse_front_matter(&front_matter) {
        Ok(meta) => problems.extend(
            REQUIRED_KEYS
                .iter()
                .filter(|key| !has_key(&meta, key))
                .map(|key| ContentProblem::MissingKey(*key)),
        ),
        Err(error) => {
            tracing::debug!(%error, "front matter is not valid YAML; skipping metadata checks");
        }
    }

    problems.extend(
        lines
            .iter()
            .enumerate()
            .skip(body_start)
            .filter(|(_, line)| IMAGE_WITHOUT_ALT.is_match(line))
            .map(|(idx, _)| ContentProblem::MissingAltText { line: idx + 1 }),
    );

    problems
}

/// Validates article text and renders the problems as paragraphs.
///
/// An empty string means the article is clean.
pub fn validate(text: &str) -> String {
    inspect(text)
        .iter()
        .map(|problem| format!("{problem}\n\n"))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Finds the line after the closing delimiter.
///
/// The closing line is a run of `-` or `.` as long as the opening one. Returns
/// `None` if it is missing or fewer than two lines follow it.
fn find_body_start(lines: &[&str], delimiter_len: usize) -> Option<usize> {
    let dashes = "-".repeat(delimiter_len);
    let dots = ".".repeat(delimiter_len);

    let closing = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let line = line.trim_end();
            line == dashes || line == dots
        })
        .map(|(idx, _)| idx)?;

    let body_start = closing + 1;
    (body_start < lines.len() - 1).then_some(body_start)
}

fn parse_front_matter(raw: &str) -> Result<serde_yaml::Value, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(serde_yaml::Value::Null);
    }
    serde_yaml::from_str(raw)
}

/// Key-existence check; a front matter that is not a mapping has no keys.
fn has_key(meta: &serde_yaml::Value, key: &str) -> bool {
    meta.as_mapping()
        .is_some_and(|mapping| mapping.contains_key(key))
}
