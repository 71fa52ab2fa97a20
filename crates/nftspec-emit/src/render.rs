//! Placeholder substitution over skeleton text.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("unknown placeholder `{key}` on line {line}")]
    UnknownPlaceholder { key: String, line: usize },
}

/// Turns skeleton text plus placeholder values into finished source.
pub trait Renderer {
    fn render(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, RenderError>;
}

/// Replaces every `{{ key }}` with its value. Unknown keys are an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}")
            .expect("placeholder regex must compile")
    })
}

impl Renderer for PlaceholderRenderer {
    fn render(
        &self,
        template: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, RenderError> {
        let re = placeholder_re();
        if let Some(missing) = re
            .captures_iter(template)
            .find(|caps| !values.contains_key(&caps[1]))
        {
            let start = missing.get(0).map_or(0, |m| m.start());
            return Err(RenderError::UnknownPlaceholder {
                key: missing[1].to_string(),
                line: template[..start].matches('\n').count() + 1,
            });
        }
        let rendered = re.replace_all(template, |caps: &Captures<'_>| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_every_occurrence() {
        let out = PlaceholderRenderer
            .render(
                "contract X is {{ base_extensions }} {\n    // {{base_extensions}}\n}",
                &values(&[("base_extensions", "ERC721, Ownable")]),
            )
            .expect("render");
        insta::assert_snapshot!(out, @r"
        contract X is ERC721, Ownable {
            // ERC721, Ownable
        }
        ");
    }

    #[test]
    fn dotted_keys_render_modifier_slots() {
        let out = PlaceholderRenderer
            .render(
                "function burn(uint256 tokenId) public {{ modifier.burn }} {",
                &values(&[("modifier.burn", "onlyTokenOwner(tokenId)")]),
            )
            .expect("render");
        assert_eq!(
            out,
            "function burn(uint256 tokenId) public onlyTokenOwner(tokenId) {"
        );
    }

    #[test]
    fn empty_values_leave_no_residue() {
        let out = PlaceholderRenderer
            .render("a{{ pause_guard }}b", &values(&[("pause_guard", "")]))
            .expect("render");
        assert_eq!(out, "ab");
    }

    #[test]
    fn unknown_placeholder_reports_line() {
        let error = PlaceholderRenderer
            .render("one\ntwo {{ nope }}\n", &values(&[]))
            .expect_err("unknown key should fail");
        assert_eq!(
            error,
            RenderError::UnknownPlaceholder {
                key: "nope".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn plain_braces_are_left_alone() {
        let out = PlaceholderRenderer
            .render("contract A { }", &values(&[]))
            .expect("render");
        assert_eq!(out, "contract A { }");
    }
}
