//! Pure field validators for joke submission. The server runs these before
//! persisting; any client-side echo of the same checks is advisory only.

pub fn validate_joke_name(name: &str) -> Option<String> {
    if name.chars().count() < 3 {
        return Some("Name must be at least 3 characters long".to_string());
    }
    None
}

pub fn validate_joke_content(content: &str) -> Option<String> {
    if content.chars().count() < 10 {
        return Some("Content must be at least 10 characters long".to_string());
    }
    None
}
