//! `{token}` substitution for project rule templates.

/// Replace every `{token}` with its value, one token at a time in the order
/// given. Tokens with no entry are left as written.
pub fn expand(template: &str, tokens: &[(&str, &str)]) -> String {
    let mut value = template.to_string();
    for (token, replacement) in tokens {
        let pattern = format!("{{{}}}", token);
        if value.contains(&pattern) {
            value = value.replace(&pattern, replacement);
        }
    }
    value
}

/// Token set for one expansion site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pairs: Vec<(&'static str, String)>,
}

impl Tokens {
    /// `{class}` only, for static and member function templates.
    pub fn class(class_name: &str) -> Self {
        Tokens {
            pairs: vec![("class", class_name.to_string())],
        }
    }

    /// `{class}`, `{propType}` and `{propName}`, for accessor templates.
    pub fn property(class_name: &str, prop_type: &str, prop_name: &str) -> Self {
        Tokens {
            pairs: vec![
                ("class", class_name.to_string()),
                ("propType", prop_type.to_string()),
                ("propName", prop_name.to_string()),
            ],
        }
    }

    pub fn expand(&self, template: &str) -> String {
        let pairs: Vec<(&str, &str)> = self
            .pairs
            .iter()
            .map(|(token, value)| (*token, value.as_str()))
            .collect();
        expand(template, &pairs)
    }
}
