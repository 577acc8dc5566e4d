// WHY: Standalone cleanup of raw detector hits, separated from matching so it can be tested alone
// Dial strings keep digits and a leading '+'; URLs lose trailing sentence punctuation

/// Reduce a matched phone number to a dialable string
/// e.g. "+7(982)709-77-77" -> "+79827097777"
pub fn normalize_dial_string(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    normalize_dial_string_into(raw, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
pub fn normalize_dial_string_into(raw: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(raw.len());

    let trimmed = raw.trim_start();
    if trimmed.starts_with('+') {
        buffer.push('+');
    }

    buffer.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
}

/// Number of ASCII digits in a candidate
pub fn count_digits(raw: &str) -> usize {
    raw.bytes().filter(u8::is_ascii_digit).count()
}

/// Byte length of `candidate` once trailing punctuation and unbalanced closers are removed
pub fn trim_link_end(candidate: &str, trailing_punctuation: &str) -> usize {
    let mut end = candidate.len();

    while let Some(ch) = candidate[..end].chars().next_back() {
        let current = &candidate[..end];
        let strip = if trailing_punctuation.contains(ch) {
            true
        } else {
            match ch {
                ')' => current.matches('(').count() < current.matches(')').count(),
                ']' => current.matches('[').count() < current.matches(']').count(),
                _ => false,
            }
        };

        if !strip {
            break;
        }
        end -= ch.len_utf8();
    }

    end
}
