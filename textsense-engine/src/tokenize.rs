//! Word splitting and script classification shared by the analyzers

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Words in `text`: runs of alphanumerics, keeping inner apostrophes
///
/// CJK text has no spaces, so a run of ideographs counts as one word.
pub fn words(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c)))
        .map(|w| w.trim_matches(is_apostrophe))
        .filter(|w| !w.is_empty())
}

/// Lower-cased words
pub fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    words(text).map(str::to_lowercase)
}

/// Whether a word consists only of digits and separators
pub fn is_numeric(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Hiragana or katakana
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}')
}

/// Hangul syllables and jamo
pub fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

/// CJK unified ideographs
pub fn is_han(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// Any character from a script written without word spacing
pub fn is_cjk(c: char) -> bool {
    is_han(c) || is_kana(c) || is_hangul(c)
}

/// Share of alphabetic characters that are CJK
pub fn cjk_ratio(text: &str) -> f64 {
    let (mut cjk, mut letters) = (0usize, 0usize);
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if is_cjk(c) {
            cjk += 1;
        }
    }
    cjk as f64 / letters.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        let found: Vec<&str> = words("It's a 'quoted' test -- isn't it? 3.5%").collect();
        assert_eq!(found, vec!["It's", "a", "quoted", "test", "isn't", "it", "3", "5"]);
    }

    #[test]
    fn test_words_of_nothing() {
        assert_eq!(words("  ... !! ").count(), 0);
        assert_eq!(words("").count(), 0);
    }

    #[test]
    fn test_scripts() {
        assert!(is_kana('ひ'));
        assert!(is_kana('カ'));
        assert!(is_han('語'));
        assert!(is_hangul('한'));
        assert!(!is_cjk('a'));
        assert_eq!(cjk_ratio("日本語"), 1.0);
        assert_eq!(cjk_ratio("abc"), 0.0);
        assert_eq!(cjk_ratio(""), 0.0);
    }
}
