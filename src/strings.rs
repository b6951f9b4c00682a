//! UI string resources, fetched at bootstrap from the settings-declared path.

use std::collections::HashMap;

/// Strings for a single section of the shell.
pub type AppStrings = HashMap<String, String>;

/// All string resources, keyed by section.
pub type StringResources = HashMap<String, AppStrings>;

/// Look up a string, falling back to the key itself when the resource or
/// the key is missing so the UI never renders a blank label.
pub fn get_string(res: Option<&AppStrings>, key: &str) -> String {
    res.and_then(|strings| strings.get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Section strings out of the full resource set.
pub fn get_app_strings<'a>(
    res: Option<&'a StringResources>,
    section: &str,
) -> Option<&'a AppStrings> {
    res.and_then(|resources| resources.get(section))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppStrings {
        let mut strings = AppStrings::new();
        strings.insert("expected-key".to_string(), "expectedValue".to_string());
        strings
    }

    #[test]
    fn returns_value_when_key_exists() {
        let strings = sample();
        assert_eq!(get_string(Some(&strings), "expected-key"), "expectedValue");
    }

    #[test]
    fn falls_back_to_key_when_missing() {
        let strings = sample();
        assert_eq!(get_string(Some(&strings), "unexpected-key"), "unexpected-key");
    }

    #[test]
    fn falls_back_to_key_when_resources_absent() {
        assert_eq!(get_string(None, "unexpected-key"), "unexpected-key");
    }

    #[test]
    fn section_lookup() {
        let mut resources = StringResources::new();
        resources.insert("login".to_string(), sample());

        assert!(get_app_strings(Some(&resources), "login").is_some());
        assert!(get_app_strings(Some(&resources), "missing").is_none());
        assert!(get_app_strings(None, "login").is_none());
    }
}
