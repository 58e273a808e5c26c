//! Display label formatting for exported nodes.
//!
//! Identifiers in association datasets tend to carry a machine prefix before
//! the first underscore (`g__Bacteroides`, `ranknorm_body_weight`), so the
//! first underscore-separated segment is dropped and the rest joined with
//! spaces. Long labels are split at their median space so renderers can show
//! them on two lines.

/// Formats an identifier for display.
///
/// # Examples
///
/// ```
/// use trellis_cli::label::format_label;
///
/// assert_eq!(format_label("ranknorm_body_weight"), "body weight");
/// assert_eq!(format_label("plain"), "plain");
/// ```
pub fn format_label(text: &str) -> String {
    let mut text = if text.contains('_') {
        text.split('_').skip(1).collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    };

    if text.chars().count() > 20 && text.contains(' ') {
        let spaces: Vec<usize> = text
            .char_indices()
            .filter(|&(_, c)| c == ' ')
            .map(|(idx, _)| idx)
            .collect();
        let split_at = spaces[spaces.len() / 2];
        text = format!("{}\n{}", &text[..split_at], &text[split_at..]);
    }

    text
}
