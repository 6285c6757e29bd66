//! Text normalization for tender documents.
//!
//! Every probe in the extractor runs against normalized text, so patterns
//! only need to be written once in lower-case ASCII-folded form.

/// Lower-case `text`, fold Turkish letters to their unaccented form and
/// collapse every whitespace run to a single space.
///
/// Leading and trailing whitespace is dropped. The function is idempotent.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        match fold_char(c) {
            Some(mapped) => folded.push(mapped),
            None => folded.extend(c.to_lowercase().filter(|l| *l != COMBINING_DOT)),
        }
    }

    normalize_whitespace(&folded)
}

/// `'İ'.to_lowercase()` yields `i` followed by this combining mark.
const COMBINING_DOT: char = '\u{0307}';

/// Fixed substitution table, applied before generic lower-casing.
fn fold_char(c: char) -> Option<char> {
    let mapped = match c {
        'I' | 'İ' | 'ı' | 'î' | 'Î' => 'i',
        'Ş' | 'ş' => 's',
        'Ğ' | 'ğ' => 'g',
        'Ü' | 'ü' | 'û' | 'Û' => 'u',
        'Ö' | 'ö' => 'o',
        'Ç' | 'ç' => 'c',
        'Â' | 'â' => 'a',
        _ => return None,
    };
    Some(mapped)
}

/// Collapse runs of whitespace to a single space, trim
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_letters_are_folded() {
        assert_eq!(normalize("Fibrinojen ölçümü"), "fibrinojen olcumu");
        assert_eq!(normalize("PIHTI OLUŞUMU"), "pihti olusumu");
        assert_eq!(normalize("İSTENEN TESTLER"), "istenen testler");
        assert_eq!(normalize("Çalışılacak Değerler"), "calisilacak degerler");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize("en   az\n\t4\r\nkanal  "), "en az 4 kanal");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("  Cihaz EN AZ 2 Problu olmalı; Reaktif Barkod   okuyucu ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_no_combining_marks_survive() {
        assert!(!normalize("İ").contains(COMBINING_DOT));
    }
}
