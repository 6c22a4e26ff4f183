//! Positional prompt templating.

use crate::registry;
use multiverse_common::{MultiverseError, Result};

/// Build the generation prompt for `universe` from caller-supplied details.
///
/// Details are validated for count first, then for content (each must be
/// non-empty after trimming). Substitution is purely positional; detail
/// values are not escaped, so a value containing `{i}` syntax ends up in the
/// prompt verbatim once and is a caller problem.
pub fn build_prompt(universe: &str, details: &[String]) -> Result<String> {
    let def = registry::get(universe)?;

    if details.len() != def.fields.len() {
        return Err(MultiverseError::DetailCountMismatch {
            universe: universe.to_string(),
            expected: def.fields.len(),
            actual: details.len(),
            fields: def.fields.iter().map(|f| f.to_string()).collect(),
        });
    }

    for (index, detail) in details.iter().enumerate() {
        if detail.trim().is_empty() {
            return Err(MultiverseError::InvalidDetail {
                universe: universe.to_string(),
                field: def.fields[index].to_string(),
                index,
            });
        }
    }

    Ok(render(def.template, details))
}

fn render(template: &str, details: &[String]) -> String {
    let mut out = template.to_string();
    for (i, detail) in details.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), detail.trim());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_positionally() {
        let details = vec!["a".to_string(), "b".to_string()];
        assert_eq!(render("x {1} y {0}", &details), "x b y a");
    }

    #[test]
    fn render_trims_detail_values() {
        let details = vec!["  spaced  ".to_string()];
        assert_eq!(render("[{0}]", &details), "[spaced]");
    }
}
