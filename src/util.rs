/// Shortens a label to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let keep = max_chars.saturating_sub(3);
    let mut short: String = label.chars().take(keep).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(truncate_label("Chad", 22), "Chad");
        assert_eq!(truncate_label("Bosnia and Herzegovina", 22), "Bosnia and Herzegovina");
    }

    #[test]
    fn long_labels_keep_nineteen_characters() {
        let label = truncate_label("Central African Republic", 22);
        assert_eq!(label, "Central African Rep...");
        assert_eq!(label.chars().count(), 22);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_label("Côte d'Ivoire et Sénégal réunis", 10), "Côte d'...");
    }
}
