//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
///
/// Placeholders are plain `__NAME__` markers replaced by the matching
/// [`TemplateVars`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace every `__NAME__` marker `lookup` knows in one left-to-right pass.
///
/// Inserted values are never scanned again, so a value that itself looks
/// like a marker stays literal. Unknown markers are kept as written.
pub fn substitute<'a>(content: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        let Some(len) = after.find("__") else { break };

        match lookup(&after[..len]) {
            Some(value) => {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = &after[len + 2..];
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting {
        name: String,
    }

    impl TemplateVars for Greeting {
        fn apply(&self, content: &str) -> String {
            substitute(content, |key| (key == "NAME").then_some(self.name.as_str()))
        }
    }

    const HELLO: Template<Greeting> = Template::new("Hello, __NAME__!");

    #[test]
    fn test_render() {
        let vars = Greeting {
            name: "stele".into(),
        };
        assert_eq!(HELLO.render(&vars), "Hello, stele!");
    }

    #[test]
    fn test_substitute_single_pass() {
        let lookup = |key: &str| match key {
            "A" => Some("__B__"),
            "B" => Some("b"),
            _ => None,
        };
        assert_eq!(substitute("__A__ __B__", lookup), "__B__ b");
        assert_eq!(substitute("__dev__/__B__", lookup), "__dev__/b");
        assert_eq!(substitute("x__B__y__", lookup), "xby__");
        assert_eq!(substitute("no markers", lookup), "no markers");
    }
}
