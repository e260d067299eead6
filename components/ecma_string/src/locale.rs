//! Case mapping services.
//!
//! Full Unicode case mapping comes from the standard library's tables.
//! Lone surrogates have no case and pass through unchanged.

/// Locale-sensitive case mapping over UTF-16 text.
pub trait LocaleService {
    /// BCP 47 language subtag this service implements.
    fn language(&self) -> &str;

    /// Lowercases `text`.
    fn to_lower(&self, text: &[u16]) -> Vec<u16>;

    /// Uppercases `text`.
    fn to_upper(&self, text: &[u16]) -> Vec<u16>;
}

/// Applies `map` to each run of well-formed text, keeping lone surrogates.
pub(crate) fn map_runs(text: &[u16], map: impl Fn(&str) -> String) -> Vec<u16> {
    let mut out = Vec::with_capacity(text.len());
    let mut run = String::new();
    for decoded in char::decode_utf16(text.iter().copied()) {
        match decoded {
            Ok(c) => run.push(c),
            Err(err) => {
                out.extend(map(&run).encode_utf16());
                run.clear();
                out.push(err.unpaired_surrogate());
            }
        }
    }
    out.extend(map(&run).encode_utf16());
    out
}

/// Locale-independent case mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct RootLocale;

impl LocaleService for RootLocale {
    fn language(&self) -> &str {
        "und"
    }

    fn to_lower(&self, text: &[u16]) -> Vec<u16> {
        map_runs(text, str::to_lowercase)
    }

    fn to_upper(&self, text: &[u16]) -> Vec<u16> {
        map_runs(text, str::to_uppercase)
    }
}

/// Turkish and Azeri mapping: dotted and dotless i are distinct letters.
#[derive(Debug, Clone)]
pub struct TurkicLocale {
    language: String,
}

impl TurkicLocale {
    /// Creates the service for `tr` or `az`.
    pub fn new(language: &str) -> Self {
        TurkicLocale {
            language: language.to_owned(),
        }
    }
}

impl LocaleService for TurkicLocale {
    fn language(&self) -> &str {
        &self.language
    }

    fn to_lower(&self, text: &[u16]) -> Vec<u16> {
        map_runs(text, |run| {
            run.chars()
                .map(|c| match c {
                    'I' => 'ı'.to_string(),
                    'İ' => 'i'.to_string(),
                    c => c.to_lowercase().collect(),
                })
                .collect()
        })
    }

    fn to_upper(&self, text: &[u16]) -> Vec<u16> {
        map_runs(text, |run| {
            run.chars()
                .map(|c| match c {
                    'i' => 'İ'.to_string(),
                    'ı' => 'I'.to_string(),
                    c => c.to_uppercase().collect(),
                })
                .collect()
        })
    }
}

/// Picks the case mapping service for a language tag such as `"tr-TR"`.
pub fn locale_for_tag(tag: &str) -> Box<dyn LocaleService> {
    let language = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
    match language.as_str() {
        "tr" | "az" => Box::new(TurkicLocale::new(&language)),
        _ => Box::new(RootLocale),
    }
}
