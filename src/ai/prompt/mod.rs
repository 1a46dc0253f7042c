//! Prompt Templates
//!
//! Every prompt the pipeline sends is a [`PromptTemplate`]: fixed text with
//! `{name}` placeholders. A template knows its required keys, so rendering
//! can be tested without any generation call.
//!
//! ## Syntax
//!
//! - `{identifier}` is a placeholder (`[A-Za-z_][A-Za-z0-9_]*`)
//! - `{{` and `}}` produce literal braces
//! - any other brace is kept as written
//!
//! Rendering is a single pass over the parsed template. Substituted values
//! are inserted verbatim and never scanned again, so a transcript that
//! happens to contain `{persona_name}` stays exactly as written.

use crate::types::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A named prompt template with placeholder keys
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: &'static str,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(name: &'static str, source: &str) -> Self {
        Self {
            name,
            segments: parse(source),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Required substitution keys, in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(key) = segment
                && !keys.contains(&key.as_str())
            {
                keys.push(key);
            }
        }
        keys
    }

    /// Substitute every placeholder from `bindings`.
    ///
    /// Fails with [`SimError::Template`] naming the first unbound key.
    /// Extra bindings are ignored.
    pub fn render(&self, bindings: &PromptBindings) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => {
                    let value = bindings.get(key).ok_or_else(|| SimError::Template {
                        template: self.name.to_string(),
                        key: key.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Ordered key/value substitutions for a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBindings {
    entries: Vec<(String, String)>,
}

impl PromptBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, replacing any earlier value
    pub fn bind(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' if chars.get(i + 1) == Some(&'{') => {
                literal.push('{');
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                literal.push('}');
                i += 2;
            }
            '{' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_ident_char(chars[end]) {
                    end += 1;
                }
                let closed = chars.get(end) == Some(&'}');
                let valid = end > start && is_ident_start(chars[start]);

                if closed && valid {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(chars[start..end].iter().collect()));
                    i = end + 1;
                } else {
                    literal.push('{');
                    i += 1;
                }
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_keys() {
        let template = PromptTemplate::new("greeting", "Hello {name}, welcome to {place}.");
        let bindings = PromptBindings::new()
            .bind("name", "Ada")
            .bind("place", "the meeting");

        assert_eq!(
            template.render(&bindings).unwrap(),
            "Hello Ada, welcome to the meeting."
        );
    }

    #[test]
    fn test_placeholders_in_first_appearance_order() {
        let template = PromptTemplate::new("t", "{b} then {a} then {b} again");
        assert_eq!(template.placeholders(), vec!["b", "a"]);
    }

    #[test]
    fn test_missing_key_names_template_and_key() {
        let template = PromptTemplate::new("persona", "History:\n{transcript}\nQuery: {query}");
        let bindings = PromptBindings::new().bind("transcript", "...");

        let err = template.render(&bindings).unwrap_err();
        match err {
            SimError::Template { template, key } => {
                assert_eq!(template, "persona");
                assert_eq!(key, "query");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = PromptTemplate::new("t", "Log:\n{transcript}");
        let bindings = PromptBindings::new().bind("transcript", "Ada: I like {persona_name} and {{x}}");

        assert_eq!(
            template.render(&bindings).unwrap(),
            "Log:\nAda: I like {persona_name} and {{x}}"
        );
    }

    #[test]
    fn test_escaped_and_stray_braces() {
        let template = PromptTemplate::new("t", "{{literal}} { not a key } {1bad} }");
        assert!(template.placeholders().is_empty());
        assert_eq!(
            template.render(&PromptBindings::new()).unwrap(),
            "{literal} { not a key } {1bad} }"
        );
    }

    #[test]
    fn test_extra_bindings_ignored_and_rebinding_replaces() {
        let template = PromptTemplate::new("t", "{a}");
        let bindings = PromptBindings::new()
            .bind("a", "first")
            .bind("unused", "x")
            .bind("a", "second");

        assert_eq!(bindings.len(), 2);
        assert_eq!(template.render(&bindings).unwrap(), "second");
    }

    #[test]
    fn test_unicode_literals_preserved() {
        let template = PromptTemplate::new("t", "Founder – {name} ✓");
        let bindings = PromptBindings::new().bind("name", "Unni");
        assert_eq!(template.render(&bindings).unwrap(), "Founder – Unni ✓");
    }
}
