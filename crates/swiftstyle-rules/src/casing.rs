//! Identifier word splitting and camel-case rendering.
//!
//! Splitting is purely mechanical: word boundaries are underscores,
//! lower-to-upper transitions, and the last capital of an all-caps run
//! followed by a lowercase letter (`URLParser` -> `URL`, `Parser`).
//! Rendering is stable: rendering an already-rendered name returns it
//! unchanged, which the fix convergence check relies on.

/// Splits an identifier into its constituent words.
pub(crate) fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Looks up the configured rendering of a word that is an acronym.
fn acronym_form<'a>(word: &str, acronyms: &'a [String]) -> Option<&'a str> {
    acronyms
        .iter()
        .find(|a| a.eq_ignore_ascii_case(word))
        .map(String::as_str)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Renders a name as UpperCamelCase with acronyms in their configured form.
pub(crate) fn upper_camel(name: &str, acronyms: &[String]) -> String {
    split_words(name)
        .iter()
        .map(|w| acronym_form(w, acronyms).map_or_else(|| capitalize(w), ToString::to_string))
        .collect()
}

/// Renders a name as lowerCamelCase. A leading acronym is rendered fully
/// lowercase (`URLString` -> `urlString`); later acronyms keep their
/// configured form (`parseUrl` -> `parseURL`).
pub(crate) fn lower_camel(name: &str, acronyms: &[String]) -> String {
    let words = split_words(name);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&w.to_lowercase());
        } else {
            match acronym_form(w, acronyms) {
                Some(a) => out.push_str(a),
                None => out.push_str(&capitalize(w)),
            }
        }
    }
    out
}

/// Whether the name already has the gross shape of UpperCamelCase.
pub(crate) fn has_upper_camel_shape(name: &str) -> bool {
    !name.contains('_') && name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether the name already has the gross shape of lowerCamelCase.
pub(crate) fn has_lower_camel_shape(name: &str) -> bool {
    !name.contains('_') && name.chars().next().is_some_and(char::is_lowercase)
}

/// Whether a name is checkable at all: plain alphanumeric, no backticks,
/// no leading underscore convention, not an operator.
pub(crate) fn is_checkable(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('_')
        && !name.starts_with('`')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acr() -> Vec<String> {
        ["URL", "HTTP", "JSON", "ID"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn splits_camel_and_acronym_runs() {
        assert_eq!(split_words("myViewController"), ["my", "View", "Controller"]);
        assert_eq!(split_words("URLParser"), ["URL", "Parser"]);
        assert_eq!(split_words("httpURL"), ["http", "URL"]);
        assert_eq!(split_words("utf8String"), ["utf8", "String"]);
        assert_eq!(split_words("snake_case_name"), ["snake", "case", "name"]);
    }

    #[test]
    fn renders_upper_camel() {
        assert_eq!(upper_camel("myViewController", &acr()), "MyViewController");
        assert_eq!(upper_camel("UrlParser", &acr()), "URLParser");
        assert_eq!(upper_camel("json_decoder", &acr()), "JSONDecoder");
    }

    #[test]
    fn renders_lower_camel() {
        assert_eq!(lower_camel("URL", &acr()), "url");
        assert_eq!(lower_camel("parseUrl", &acr()), "parseURL");
        assert_eq!(lower_camel("HTTPClient", &acr()), "httpClient");
        assert_eq!(lower_camel("user_id", &acr()), "userID");
    }

    #[test]
    fn rendering_is_stable() {
        for name in ["httpURL", "parseURL", "MyViewController", "urlString"] {
            assert_eq!(lower_camel(&lower_camel(name, &acr()), &acr()), lower_camel(name, &acr()));
            assert_eq!(upper_camel(&upper_camel(name, &acr()), &acr()), upper_camel(name, &acr()));
        }
    }

    #[test]
    fn checkable_names() {
        assert!(is_checkable("foo"));
        assert!(!is_checkable("_private"));
        assert!(!is_checkable("`class`"));
        assert!(!is_checkable("+"));
        assert!(!is_checkable(""));
    }
}
