/*!
 * Target-language registry.
 *
 * The pipeline translates into a fixed, enumerable set of language codes.
 * Each code carries a display name that is only used when building provider
 * prompts. The set includes entries without a clean ISO 639-1 mapping
 * (Cantonese `yue`, Traditional Chinese `zh-TW`), so the table is kept local
 * instead of relying on an ISO crate.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Supported target languages as (code, display name) pairs.
///
/// Ordered by rough speaker population; this is also the default processing
/// order when a request does not name an explicit language list.
pub const TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("zh", "Chinese (Simplified)"),
    ("hi", "Hindi"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ur", "Urdu"),
    ("id", "Indonesian"),
    ("de", "German"),
    ("vi", "Vietnamese"),
    ("tr", "Turkish"),
    ("it", "Italian"),
    ("ko", "Korean"),
    ("fa", "Persian"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("yue", "Cantonese"),
    ("ms", "Malay"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("pa", "Punjabi"),
    ("or", "Odia"),
    ("as", "Assamese"),
    ("sw", "Swahili"),
    ("ha", "Hausa"),
    ("yo", "Yoruba"),
    ("ig", "Igbo"),
    ("am", "Amharic"),
    ("zu", "Zulu"),
    ("af", "Afrikaans"),
    ("pl", "Polish"),
    ("uk", "Ukrainian"),
    ("ro", "Romanian"),
    ("nl", "Dutch"),
    ("el", "Greek"),
    ("cs", "Czech"),
    ("hu", "Hungarian"),
    ("sv", "Swedish"),
    ("bg", "Bulgarian"),
    ("sr", "Serbian"),
    ("hr", "Croatian"),
    ("sk", "Slovak"),
    ("no", "Norwegian"),
    ("da", "Danish"),
    ("fi", "Finnish"),
    ("sq", "Albanian"),
    ("sl", "Slovenian"),
    ("et", "Estonian"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("uz", "Uzbek"),
    ("kk", "Kazakh"),
    ("az", "Azerbaijani"),
    ("mn", "Mongolian"),
    ("he", "Hebrew"),
    ("ps", "Pashto"),
    ("ka", "Georgian"),
    ("hy", "Armenian"),
    ("tl", "Filipino"),
    ("my", "Burmese"),
    ("km", "Khmer"),
    ("si", "Sinhala"),
    ("ne", "Nepali"),
    ("zh-TW", "Chinese (Traditional)"),
];

/// Source language of the vocabulary corpus
pub const SOURCE_LANGUAGE: &str = "en";

static NAME_BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| TARGET_LANGUAGES.iter().copied().collect());

/// All supported target language codes, in the default processing order
pub fn all_language_codes() -> Vec<String> {
    TARGET_LANGUAGES
        .iter()
        .map(|(code, _)| (*code).to_string())
        .collect()
}

/// Whether the given code is a supported target language
pub fn is_supported(code: &str) -> bool {
    NAME_BY_CODE.contains_key(code)
}

/// Display name for a language code, used for prompt construction.
///
/// Unknown codes fall back to the code itself so a prompt can still be built.
pub fn language_name(code: &str) -> &str {
    NAME_BY_CODE.get(code).copied().unwrap_or(code)
}
