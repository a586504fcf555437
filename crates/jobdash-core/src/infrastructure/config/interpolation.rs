use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    RequiredVarNotFound(String),

    #[error("Recursive interpolation limit exceeded")]
    RecursionLimit,
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

const MAX_RECURSION_DEPTH: usize = 10;

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("Invalid regex pattern")
});

/// Expands `${VAR}` and `${VAR:-default}` from the process environment.
pub fn interpolate(input: &str) -> InterpolationResult<String> {
    interpolate_with(input, &|name| std::env::var(name).ok())
}

/// Expands variables using `lookup`. Substituted text is scanned again, so
/// a default may itself reference a variable.
pub fn interpolate_with<F>(input: &str, lookup: &F) -> InterpolationResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    interpolate_with_depth(input, lookup, 0)
}

fn interpolate_with_depth<F>(input: &str, lookup: &F, depth: usize) -> InterpolationResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut current = input.to_string();

    for _ in 0..=MAX_RECURSION_DEPTH {
        if !VAR_PATTERN.is_match(&current) {
            return Ok(current);
        }
        current = substitute_once(&current, lookup, depth)?;
    }

    Err(InterpolationError::RecursionLimit)
}

fn substitute_once<F>(input: &str, lookup: &F, depth: usize) -> InterpolationResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    if depth > MAX_RECURSION_DEPTH {
        return Err(InterpolationError::RecursionLimit);
    }

    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for cap in VAR_PATTERN.captures_iter(input) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        out.push_str(&input[last..whole.start()]);

        let replacement = match lookup(name.as_str()) {
            Some(value) => value,
            None => match cap.get(2) {
                Some(default) => interpolate_with_depth(default.as_str(), lookup, depth + 1)?,
                None => {
                    return Err(InterpolationError::RequiredVarNotFound(
                        name.as_str().to_string(),
                    ))
                }
            },
        };

        out.push_str(&replacement);
        last = whole.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}

pub fn interpolate_toml(value: &mut toml::Value) -> InterpolationResult<()> {
    match value {
        toml::Value::String(s) => {
            *s = interpolate(s)?;
        }
        toml::Value::Array(arr) => {
            for item in arr {
                interpolate_toml(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                interpolate_toml(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_simple_var() {
        std::env::set_var("JOBDASH_TEST_VAR_SIMPLE", "hello");
        let result = interpolate("${JOBDASH_TEST_VAR_SIMPLE}").unwrap();
        assert_eq!(result, "hello");
        std::env::remove_var("JOBDASH_TEST_VAR_SIMPLE");
    }

    #[test]
    fn test_multiple_vars_with_text() {
        let lookup = vars(&[("HOST", "ci.local"), ("PORT", "8080")]);
        let result = interpolate_with("https://${HOST}:${PORT}/", &lookup).unwrap();
        assert_eq!(result, "https://ci.local:8080/");
    }

    #[test]
    fn test_missing_var_error() {
        let result = interpolate("${THIS_VAR_DOES_NOT_EXIST_12345}");
        assert_eq!(
            result,
            Err(InterpolationError::RequiredVarNotFound(
                "THIS_VAR_DOES_NOT_EXIST_12345".to_string()
            ))
        );
    }

    #[test]
    fn test_default_value() {
        let lookup = vars(&[]);
        assert_eq!(
            interpolate_with("${MISSING:-default_value}", &lookup).unwrap(),
            "default_value"
        );
        assert_eq!(
            interpolate_with("prefix${MISSING:-}suffix", &lookup).unwrap(),
            "prefixsuffix"
        );
    }

    #[test]
    fn test_var_overrides_default() {
        let lookup = vars(&[("USER_NAME", "actual")]);
        assert_eq!(
            interpolate_with("${USER_NAME:-default}", &lookup).unwrap(),
            "actual"
        );
    }

    #[test]
    fn test_nested_default() {
        let lookup = vars(&[("INNER", "inner_value")]);
        assert_eq!(
            interpolate_with("${NONEXISTENT:-${INNER}}", &lookup).unwrap(),
            "inner_value"
        );
    }

    #[test]
    fn test_self_reference_hits_limit() {
        let lookup = vars(&[("LOOP", "${LOOP}")]);
        assert_eq!(
            interpolate_with("${LOOP}", &lookup),
            Err(InterpolationError::RecursionLimit)
        );
    }

    #[test]
    fn test_no_interpolation() {
        assert_eq!(interpolate("plain text $VAR").unwrap(), "plain text $VAR");
    }

    #[test]
    fn test_interpolate_toml() {
        std::env::set_var("JOBDASH_TEST_TOML_VAR", "toml_value");

        let toml_str = r#"
            key = "${JOBDASH_TEST_TOML_VAR}"
            nested = { inner = "${JOBDASH_TEST_TOML_VAR:-fallback}" }
            array = ["${JOBDASH_TEST_TOML_VAR}", "static"]
            number = 3
        "#;

        let mut value: toml::Value = toml::from_str(toml_str).unwrap();
        interpolate_toml(&mut value).unwrap();

        assert_eq!(value["key"].as_str().unwrap(), "toml_value");
        assert_eq!(value["nested"]["inner"].as_str().unwrap(), "toml_value");
        assert_eq!(value["array"][0].as_str().unwrap(), "toml_value");
        assert_eq!(value["array"][1].as_str().unwrap(), "static");
        assert_eq!(value["number"].as_integer(), Some(3));

        std::env::remove_var("JOBDASH_TEST_TOML_VAR");
    }
}
