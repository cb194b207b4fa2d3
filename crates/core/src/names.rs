//! Casing helpers for generator options and template variables

/// The common casings of a user-provided name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    /// kebab-case, used for file and project names
    pub file_name: String,
    /// PascalCase, used for class names
    pub class_name: String,
    /// camelCase, used for identifiers
    pub property_name: String,
    /// SCREAMING_SNAKE_CASE, used for constants and env vars
    pub constant_name: String,
}

/// Derive all casings from a name like `my-app`, `myApp` or `My App`
pub fn names(value: &str) -> Names {
    let words = split_words(value);

    let class_name = words.iter().map(|word| capitalize(word)).collect();
    let property_name = words
        .iter()
        .enumerate()
        .map(|(i, word)| if i == 0 { word.clone() } else { capitalize(word) })
        .collect();

    Names {
        file_name: words.join("-"),
        class_name,
        property_name,
        constant_name: words
            .iter()
            .map(|word| word.to_uppercase())
            .collect::<Vec<_>>()
            .join("_"),
    }
}

fn split_words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in value.chars() {
        if matches!(ch, '-' | '_' | ' ' | '.' | '/') {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
        } else if ch.is_uppercase() && current.chars().last().is_some_and(char::is_lowercase) {
            words.push(current.to_lowercase());
            current.clear();
            current.push(ch);
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
