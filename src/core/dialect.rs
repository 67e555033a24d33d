//! Delimiter and quote detection from a leading sample of the file.
//!
//! Detection is done by `csv-nose` (Table Uniformity Method). A single-quote
//! result is only accepted when the sample really contains a field wrapped in
//! apostrophes; an apostrophe that merely starts a password or a name would
//! otherwise swallow every following row into one quoted field.

use crate::domain::model::Dialect;
use csv_nose::{Quote, SampleSize, Sniffer};

/// Number of characters inspected when sniffing.
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;

/// First `max_chars` characters of `text`, cut on a character boundary.
pub fn sample(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Infers the dialect of `sample`; `None` when no dialect could be detected.
pub fn sniff(sample: &str) -> Option<Dialect> {
    if sample.trim().is_empty() {
        return None;
    }

    let mut sniffer = Sniffer::new();
    sniffer.sample_size(SampleSize::Bytes(sample.len()));

    let metadata = match sniffer.sniff_bytes(sample.as_bytes()) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::debug!("Dialect detection failed: {}", e);
            return None;
        }
    };

    let delimiter = metadata.dialect.delimiter;
    let quote = match metadata.dialect.quote {
        Quote::Some(b'\'') if !has_wrapped_field(sample, delimiter, b'\'') => Some(b'"'),
        Quote::Some(quote) => Some(quote),
        Quote::None => None,
    };

    Some(Dialect { delimiter, quote })
}

/// True when some line holds `<start|delimiter>` quote ... quote `<delimiter|end>`.
pub fn has_wrapped_field(sample: &str, delimiter: u8, quote: u8) -> bool {
    sample.split('\n').any(|line| {
        let bytes = line.trim_end_matches('\r').as_bytes();
        bytes.iter().enumerate().any(|(start, &b)| {
            let opens_field = b == quote && (start == 0 || bytes[start - 1] == delimiter);
            opens_field
                && bytes[start + 1..]
                    .iter()
                    .enumerate()
                    .filter(|&(_, &c)| c == quote)
                    .any(|(offset, _)| {
                        let after = start + 1 + offset + 1;
                        after == bytes.len() || bytes[after] == delimiter
                    })
        })
    })
}
