//! Section location within normalized text.
//!
//! Tender documents are long and mix unrelated clauses. Some probes need to
//! be restricted to a labelled block (the requested-test list, or the A/B
//! device groups), which this module carves out by heading keywords.
//!
//! All offsets are UTF-8 byte offsets into the normalized text. Returned
//! regions are borrowed slices, never copies.

/// Description of one labelled section.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec<'k> {
    /// Candidate headings in priority order; the first one found wins
    pub headings: &'k [&'k str],
    /// Headings that end the section
    pub terminators: &'k [&'k str],
    /// Terminators are only searched this many bytes past the heading start
    /// (at least the heading length)
    pub min_offset: usize,
    /// Optional upper bound on the section length in bytes
    pub window: Option<usize>,
}

impl<'k> SectionSpec<'k> {
    pub const fn new(headings: &'k [&'k str], terminators: &'k [&'k str]) -> Self {
        Self {
            headings,
            terminators,
            min_offset: 0,
            window: None,
        }
    }

    pub const fn with_min_offset(self, min_offset: usize) -> Self {
        Self { min_offset, ..self }
    }

    pub const fn with_window(self, window: usize) -> Self {
        Self {
            window: Some(window),
            ..self
        }
    }
}

/// Find `keyword` in `text` at or after `from`, only where it starts a word.
///
/// "a grubu" must not match inside "ana grubu".
pub fn find_keyword(text: &str, keyword: &str, from: usize) -> Option<usize> {
    if keyword.is_empty() || from > text.len() {
        return None;
    }

    let mut cursor = ceil_char_boundary(text, from);
    while let Some(rel) = text[cursor..].find(keyword) {
        let pos = cursor + rel;
        let starts_word = text[..pos]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric());
        if starts_word {
            return Some(pos);
        }
        cursor = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Suffix marking a heading stem that may run on into a longer word,
/// e.g. "istenen test*" also matches "istenen testler".
pub const STEM_MARKER: char = '*';

/// Find a heading at or after `from`.
///
/// A plain heading must be a whole phrase: it starts a word and, unless it
/// ends in punctuation, is not followed by a letter or digit. A heading
/// ending in [`STEM_MARKER`] only has to start a word. Returns the offset
/// and the matched length.
pub fn find_heading(text: &str, heading: &str, from: usize) -> Option<(usize, usize)> {
    if let Some(stem) = heading.strip_suffix(STEM_MARKER) {
        return find_keyword(text, stem, from).map(|pos| (pos, stem.len()));
    }

    let open_end = heading.chars().next_back().map_or(false, char::is_alphanumeric);
    let mut cursor = from;
    while let Some(pos) = find_keyword(text, heading, cursor) {
        let end = pos + heading.len();
        let ends_word = !open_end
            || text[end..]
                .chars()
                .next()
                .map_or(true, |next| !next.is_alphanumeric());
        if ends_word {
            return Some((pos, heading.len()));
        }
        cursor = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    None
}

/// Locate the first candidate heading that occurs in `text`.
///
/// Returns the byte offset and the matched length.
pub fn locate_heading(text: &str, headings: &[&str]) -> Option<(usize, usize)> {
    headings.iter().find_map(|h| find_heading(text, h, 0))
}

/// Earliest terminator occurrence at or after `from`.
fn earliest_terminator(text: &str, terminators: &[&str], from: usize) -> Option<usize> {
    terminators
        .iter()
        .filter_map(|t| find_heading(text, t, from).map(|(pos, _)| pos))
        .min()
}

/// Locate a section. `None` means the heading is absent and the caller has
/// to fall back to the whole text or report the requirement as unknown.
pub fn locate<'a>(text: &'a str, spec: &SectionSpec<'_>) -> Option<&'a str> {
    let (start, heading_len) = locate_heading(text, spec.headings)?;
    Some(section_from(text, start, heading_len, spec))
}

fn section_from<'a>(text: &'a str, start: usize, heading_len: usize, spec: &SectionSpec<'_>) -> &'a str {
    let search_from = start + heading_len.max(spec.min_offset);
    let mut end = earliest_terminator(text, spec.terminators, search_from).unwrap_or(text.len());

    if let Some(window) = spec.window {
        end = end.min(floor_char_boundary(text, start.saturating_add(window)));
    }

    &text[start..end.max(start)]
}

/// Regions claimed by the "A group" and "B group" headings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupRegions<'a> {
    pub a: Option<&'a str>,
    pub b: Option<&'a str>,
}

/// Split `text` into A and B group blocks.
///
/// Whichever heading occurs first claims the text up to the other's start;
/// the later one runs to the next terminator or end of text. A lone group
/// claims the remainder of the document.
pub fn locate_groups<'a>(
    text: &'a str,
    a_headings: &[&str],
    b_headings: &[&str],
    terminators: &[&str],
) -> GroupRegions<'a> {
    let a = locate_heading(text, a_headings);
    let b = locate_heading(text, b_headings);

    match (a, b) {
        (Some((a_pos, a_len)), Some((b_pos, b_len))) => {
            let later_spec = SectionSpec::new(&[], terminators);
            if a_pos <= b_pos {
                GroupRegions {
                    a: Some(&text[a_pos..b_pos]),
                    b: Some(section_from(text, b_pos, b_len, &later_spec)),
                }
            } else {
                GroupRegions {
                    a: Some(section_from(text, a_pos, a_len, &later_spec)),
                    b: Some(&text[b_pos..a_pos]),
                }
            }
        }
        (Some((a_pos, _)), None) => GroupRegions {
            a: Some(&text[a_pos..]),
            b: None,
        },
        (None, Some((b_pos, _))) => GroupRegions {
            a: None,
            b: Some(&text[b_pos..]),
        },
        (None, None) => GroupRegions::default(),
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTS: SectionSpec<'static> =
        SectionSpec::new(&["istenen testler", "testler"], &["genel sartlar", "teslim"]);

    #[test]
    fn test_find_keyword_requires_word_start() {
        let text = "ana grubu cihaz, a grubu";
        assert_eq!(find_keyword(text, "a grubu", 0), Some(17));
        assert_eq!(find_keyword("xpt pt", "pt", 0), Some(4));
        assert_eq!(find_keyword("nothing here", "pt", 0), None);
    }

    #[test]
    fn test_heading_must_end_a_word() {
        assert_eq!(find_heading("grup analizleri. grup a: 4 kanal", "grup a", 0), Some((17, 6)));
        assert_eq!(find_heading("grup analizleri", "grup a", 0), None);
        assert_eq!(find_heading("grup a", "grup a", 0), Some((0, 6)));
    }

    #[test]
    fn test_stem_heading_runs_into_word() {
        assert_eq!(find_heading("istenen testler: pt", "istenen test*", 0), Some((0, 12)));
        assert_eq!(find_heading("istenen testler: pt", "istenen test", 0), None);
    }

    #[test]
    fn test_groups_ignore_prefix_matches() {
        let text = "grup analizleri yapilir. b grubu: en az 2 kanal";
        let groups = locate_groups(text, &["a grubu", "grup a"], &["b grubu"], &[]);
        assert_eq!(groups.a, None);
        assert_eq!(groups.b, Some("b grubu: en az 2 kanal"));
    }

    #[test]
    fn test_locate_until_terminator() {
        let text = "giris. istenen testler: pt, aptt. genel sartlar: teslim 30 gun";
        let section = locate(text, &TESTS).unwrap();
        assert_eq!(section, "istenen testler: pt, aptt. ");
    }

    #[test]
    fn test_locate_to_end_without_terminator() {
        let text = "testler: pt ve fibrinojen";
        assert_eq!(locate(text, &TESTS), Some(text));
    }

    #[test]
    fn test_candidate_priority() {
        // "istenen testler" outranks a plain "testler" that appears earlier
        let text = "testler hakkinda bilgi. istenen testler: d-dimer";
        let section = locate(text, &TESTS).unwrap();
        assert!(section.starts_with("istenen testler"));
    }

    #[test]
    fn test_absent_heading() {
        assert_eq!(locate("en az 4 kanal", &TESTS), None);
    }

    #[test]
    fn test_min_offset_skips_heading_terminator() {
        let spec = SectionSpec::new(&["teknik sartlar"], &["sartlar"]).with_min_offset(20);
        let text = "teknik sartlar: 4 kanal. genel sartlar";
        assert_eq!(locate(text, &spec), Some("teknik sartlar: 4 kanal. genel "));
    }

    #[test]
    fn test_window_bounds_section() {
        let spec = TESTS.with_window(10);
        let text = "testler: pt, aptt, fibrinojen";
        assert_eq!(locate(text, &spec), Some("testler: p"));
    }

    #[test]
    fn test_window_respects_char_boundary() {
        let spec = SectionSpec::new(&["testler"], &[]).with_window(8);
        let text = "testler°c";
        let section = locate(text, &spec).unwrap();
        assert_eq!(section, "testler");
    }

    #[test]
    fn test_groups_both_present() {
        let text = "a grubu: en az 4 kanal. b grubu: en az 2 kanal. genel sartlar: x";
        let groups = locate_groups(text, &["a grubu"], &["b grubu"], &["genel sartlar"]);
        assert_eq!(groups.a, Some("a grubu: en az 4 kanal. "));
        assert_eq!(groups.b, Some("b grubu: en az 2 kanal. "));
    }

    #[test]
    fn test_groups_reverse_order() {
        let text = "b grubu: 2 kanal. a grubu: 4 kanal";
        let groups = locate_groups(text, &["a grubu"], &["b grubu"], &[]);
        assert_eq!(groups.b, Some("b grubu: 2 kanal. "));
        assert_eq!(groups.a, Some("a grubu: 4 kanal"));
    }

    #[test]
    fn test_single_group_claims_remainder() {
        let text = "on bilgi. a grubu: 4 kanal. genel sartlar";
        let groups = locate_groups(text, &["a grubu"], &["b grubu"], &["genel sartlar"]);
        assert_eq!(groups.a, Some("a grubu: 4 kanal. genel sartlar"));
        assert_eq!(groups.b, None);
    }
}
