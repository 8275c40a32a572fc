//! Prompt rendering — role templates with `{name}` placeholders.
//!
//! Template syntax:
//! - `{name}` is replaced by `inputs["name"]`; names are identifiers
//!   (`[A-Za-z_][A-Za-z0-9_]*`).
//! - `{{` and `}}` produce literal braces.
//! - Anything else involving a brace is a malformed template.
//!
//! Substituted values are copied verbatim and never re-scanned, so a
//! document that itself contains `{document}` renders unchanged.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use consilium_core::error::PromptError;
use consilium_core::role::Role;

use crate::templates;

/// Named values substituted into a template.
pub type Inputs<'a> = HashMap<&'a str, &'a str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'t> {
    Text(&'t str),
    Placeholder(&'t str),
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse(text: &str) -> Result<Vec<Segment<'_>>, String> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                // Escaped brace: keep one, drop the other
                segments.push(Segment::Text(&text[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let close = text[i + 1..]
                    .find('}')
                    .ok_or_else(|| format!("unclosed '{{' at byte {i}"))?;
                let name = &text[i + 1..i + 1 + close];
                if !is_identifier(name) {
                    return Err(format!("invalid placeholder name {name:?} at byte {i}"));
                }
                if literal_start < i {
                    segments.push(Segment::Text(&text[literal_start..i]));
                }
                segments.push(Segment::Placeholder(name));
                i += close + 2;
                literal_start = i;
            }
            b'}' => return Err(format!("unmatched '}}' at byte {i}")),
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }
    Ok(segments)
}

/// Maps each role to its template and renders prompts from them.
///
/// The registry is a closed lookup table: supporting a new role means
/// adding a template entry, nothing else.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    templates: BTreeMap<Role, Cow<'static, str>>,
}

impl Default for PromptBuilder {
    /// All built-in templates registered.
    fn default() -> Self {
        Role::ALL
            .into_iter()
            .fold(Self::empty(), |builder, role| {
                builder.with_template(role, templates::builtin(role))
            })
    }
}

impl PromptBuilder {
    /// A builder with no templates registered.
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Register (or replace) the template for `role`.
    pub fn with_template(mut self, role: Role, text: impl Into<Cow<'static, str>>) -> Self {
        self.templates.insert(role, text.into());
        self
    }

    /// The raw template text for `role`, if registered.
    pub fn template(&self, role: Role) -> Option<&str> {
        self.templates.get(&role).map(|t| t.as_ref())
    }

    /// Roles with a registered template, in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.templates.keys().copied()
    }

    fn segments(&self, role: Role) -> Result<Vec<Segment<'_>>, PromptError> {
        let text = self
            .templates
            .get(&role)
            .ok_or(PromptError::UnknownRole(role))?;
        parse(text).map_err(|reason| PromptError::MalformedTemplate { role, reason })
    }

    /// Placeholder names of `role`'s template, in first-appearance order.
    pub fn placeholders(&self, role: Role) -> Result<Vec<&str>, PromptError> {
        let mut names: Vec<&str> = Vec::new();
        for segment in self.segments(role)? {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Render `role`'s template with `inputs`.
    ///
    /// Extra keys in `inputs` are ignored. The first placeholder without a
    /// value is reported as [`PromptError::MissingInput`].
    pub fn render(&self, role: Role, inputs: &Inputs<'_>) -> Result<String, PromptError> {
        let segments = self.segments(role)?;

        let mut prompt = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => prompt.push_str(text),
                Segment::Placeholder(name) => {
                    let value = inputs.get(name).ok_or_else(|| PromptError::MissingInput {
                        role,
                        placeholder: name.to_string(),
                    })?;
                    prompt.push_str(value);
                }
            }
        }
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Inputs<'_> {
        HashMap::from([(templates::DOCUMENT, text)])
    }

    #[test]
    fn specialist_templates_take_only_the_document() {
        let builder = PromptBuilder::default();
        for role in Role::SPECIALISTS {
            assert_eq!(builder.placeholders(role).unwrap(), vec!["document"], "{role}");
        }
    }

    #[test]
    fn team_template_takes_each_specialist_by_name() {
        let builder = PromptBuilder::default();
        let names = builder.placeholders(Role::MultidisciplinaryTeam).unwrap();
        let expected: Vec<&str> = Role::SPECIALISTS.iter().map(|r| r.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn render_is_deterministic_and_leaves_no_markers() {
        let builder = PromptBuilder::default();
        let inputs = doc("patient reports chest pain");
        for role in Role::SPECIALISTS {
            let first = builder.render(role, &inputs).unwrap();
            let second = builder.render(role, &inputs).unwrap();
            assert_eq!(first, second);
            assert!(first.contains("patient reports chest pain"));
            assert!(!first.contains('{') && !first.contains('}'), "{role}: {first}");
        }
    }

    #[test]
    fn missing_input_names_the_placeholder() {
        let builder = PromptBuilder::default();
        let err = builder
            .render(Role::Cardiologist, &HashMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingInput {
                role: Role::Cardiologist,
                placeholder: "document".into(),
            }
        );
    }

    #[test]
    fn team_reports_first_missing_specialist() {
        let builder = PromptBuilder::default();
        let inputs: Inputs = HashMap::from([("Cardiologist", "ok"), ("Psychologist", "ok")]);
        let err = builder
            .render(Role::MultidisciplinaryTeam, &inputs)
            .unwrap_err();
        assert!(matches!(
            err,
            PromptError::MissingInput { ref placeholder, .. } if placeholder == "Pulmonologist"
        ));
    }

    #[test]
    fn unregistered_role_is_unknown() {
        let builder = PromptBuilder::empty().with_template(Role::Cardiologist, "{document}");
        let err = builder.render(Role::Neurologist, &doc("x")).unwrap_err();
        assert_eq!(err, PromptError::UnknownRole(Role::Neurologist));
    }

    #[test]
    fn extra_inputs_are_ignored() {
        let builder = PromptBuilder::empty().with_template(Role::Cardiologist, "Report: {document}");
        let inputs: Inputs = HashMap::from([("document", "ECG normal"), ("unused", "zzz")]);
        assert_eq!(
            builder.render(Role::Cardiologist, &inputs).unwrap(),
            "Report: ECG normal"
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let builder = PromptBuilder::empty().with_template(Role::Cardiologist, "<{document}>");
        let rendered = builder
            .render(Role::Cardiologist, &doc("literal {document} and }{ braces"))
            .unwrap();
        assert_eq!(rendered, "<literal {document} and }{ braces>");
    }

    #[test]
    fn escaped_braces_render_literally() {
        let builder =
            PromptBuilder::empty().with_template(Role::Cardiologist, "{{json}} {document} }}");
        assert_eq!(
            builder.render(Role::Cardiologist, &doc("x")).unwrap(),
            "{json} x }"
        );
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for bad in ["{document", "{ document }", "stray } brace", "{}"] {
            let builder = PromptBuilder::empty().with_template(Role::Cardiologist, bad);
            let err = builder.render(Role::Cardiologist, &doc("x")).unwrap_err();
            assert!(
                matches!(err, PromptError::MalformedTemplate { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn non_ascii_text_passes_through() {
        let builder = PromptBuilder::empty().with_template(Role::Dermatologist, "Befund – {document} ✓");
        assert_eq!(
            builder.render(Role::Dermatologist, &doc("Hautausschlag")).unwrap(),
            "Befund – Hautausschlag ✓"
        );
    }
}
