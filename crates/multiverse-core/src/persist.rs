//! Writing generated characters to disk.

use chrono::Local;
use multiverse_common::{MultiverseError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_NAME: &str = "character";
const NAME_MAX_LEN: usize = 100;
const EXTENSION: &str = "txt";

/// Make `raw` safe to use as a file name component.
///
/// Characters illegal on common filesystems become underscores, whitespace
/// runs collapse to a single underscore, leading/trailing dots and
/// underscores are stripped, and the result is truncated to 100 chars.
/// Idempotent; never returns an empty string.
pub fn sanitize_filename(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = true;
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        if matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || ch.is_control() {
            out.push('_');
        } else {
            out.push(ch);
        }
    }

    let mut out: String = out.trim_matches(|c| c == '.' || c == '_').to_string();
    if out.chars().count() > NAME_MAX_LEN {
        out = out.chars().take(NAME_MAX_LEN).collect();
        out = out.trim_end_matches(|c| c == '.' || c == '_').to_string();
    }

    if out.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

/// Save a generated character as a human-readable text file and return the
/// path written. The filename combines the universe id, a short digest of
/// the first one or two details, and a second-resolution timestamp; a
/// numeric suffix disambiguates collisions within the same second.
pub fn save_character(
    text: &str,
    universe: &str,
    details: &[String],
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let dir = output_dir.unwrap_or_else(|| Path::new("."));
    let file_err = |path: PathBuf| {
        move |source: std::io::Error| MultiverseError::FileOperation {
            path,
            op: "save",
            source,
        }
    };

    fs::create_dir_all(dir).map_err(file_err(dir.to_path_buf()))?;

    let now = Local::now();
    let stamp = now.format("%Y%m%d_%H%M%S");
    let digest = match details {
        [] => FALLBACK_NAME.to_string(),
        [only] => only.clone(),
        [first, second, ..] => format!("{first}_{second}"),
    };
    let base = format!("{universe}_{}_{stamp}", sanitize_filename(&digest));

    let mut path = dir.join(format!("{base}.{EXTENSION}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{base}_{n}.{EXTENSION}"));
        n += 1;
    }

    let mut body = String::new();
    body.push_str(&format!(
        "Generated Character - {} Universe\n",
        title_case(universe)
    ));
    body.push_str(&"=".repeat(50));
    body.push_str("\n\nGeneration Details:\n");
    body.push_str(&format!("- Universe: {universe}\n"));
    body.push_str(&format!("- Details: {}\n", details.join(", ")));
    body.push_str(&format!(
        "- Generated: {}\n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    ));
    body.push_str("Character Description:\n");
    body.push_str(&"-".repeat(20));
    body.push('\n');
    body.push_str(text);

    fs::write(&path, body).map_err(file_err(path.clone()))?;
    tracing::debug!(path = %path.display(), "character saved");
    Ok(path)
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_illegal_chars() {
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        // replacement underscores at the edges are stripped like any other
        assert_eq!(sanitize_filename("what?*"), "what");
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("  Elfo   Mago  "), "Elfo_Mago");
    }

    #[test]
    fn sanitize_strips_edge_punctuation() {
        assert_eq!(sanitize_filename("._name_."), "name");
    }

    #[test]
    fn sanitize_never_empty() {
        assert_eq!(sanitize_filename(""), "character");
        assert_eq!(sanitize_filename("..."), "character");
        assert_eq!(sanitize_filename("   "), "character");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["a b?c", "..x..", "normal", "  lots   of\tspace  ", "<>:\"|"] {
            let once = sanitize_filename(raw);
            assert_eq!(sanitize_filename(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn sanitize_truncates_on_char_boundary() {
        let long = "Raça".repeat(60);
        let out = sanitize_filename(&long);
        assert!(out.chars().count() <= 100);
        assert!(!out.ends_with('_') && !out.ends_with('.'));
    }

    #[test]
    fn title_case_first_char() {
        assert_eq!(title_case("fantasia"), "Fantasia");
        assert_eq!(title_case(""), "");
    }
}
