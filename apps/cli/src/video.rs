use std::path::Path;

/// What gets sent to the model for a video argument: the file name for an
/// existing local file, the argument as given otherwise.
pub fn video_info(arg: &str) -> String {
    let path = Path::new(arg);
    if path.is_file() {
        if let Some(name) = path.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    arg.to_string()
}

/// Keeps the first and last four characters of a credential.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
