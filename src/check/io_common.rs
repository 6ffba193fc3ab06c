use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Labels the results that do not carry a serial number with their position in the file.
pub fn make_default_label(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |idx| format!("{}-{:04}", simplified_file_name, idx + 1)
}

/// Formats a fraction as a percentage with two decimals.
pub fn format_share(share: Option<f64>) -> String {
    match share {
        Some(x) => format!("{:.2}%", x * 100.0),
        None => "n/a".to_string(),
    }
}
