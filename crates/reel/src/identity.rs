//! 🪪 Identity: every movie gets a name tag, and the name tag is a hash.
//!
//! 🧠 Knowledge graph:
//! - A `DocumentId` is the MD5 of `"{name}|{company}|{director}|{genre}"` after each field has been
//!   trimmed and lower-cased. 32 lowercase hex chars. Always.
//! - Same four fields (give or take caps and stray spaces) → same id → the store overwrites instead
//!   of duplicating. That's the whole dedup story. No "does it exist?" round-trip.
//! - The flip side: two genuinely different takes on the exact same tuple cannot coexist.
//!   The remake has to at least change the genre. 🦆
//!
//! ⚠️ Ids written by older tooling were `md5(lower(trim(joined)))`. For fields without surrounding
//! whitespace that is byte-for-byte what we compute here, so existing documents keep their ids.

use std::fmt;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// 🔗 The separator between fields before hashing. A pipe, because nobody names a movie "|". Probably.
const FIELD_SEPARATOR: &str = "|";

/// 🔢 Hex chars in a rendered 128-bit digest.
pub const DOCUMENT_ID_LEN: usize = 32;

/// 🪪 A content-derived document key. Lowercase hex, 32 chars, deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ✅ Does this string look like something `compute_document_id` could have produced?
    ///
    /// Store ids that fail this check came from somewhere else (an import script, the console,
    /// a human with a keyboard). They're still valid documents, just not content-addressed.
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == DOCUMENT_ID_LEN
            && candidate
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 🧼 The canonical text that gets hashed. Exposed so logs and tests can show their work.
pub fn normalized_key(name: &str, company: &str, director: &str, genre: &str) -> String {
    let joined = [name, company, director, genre]
        .iter()
        .map(|field| field.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);
    // -- the outer trim is a no-op after the per-field trims, kept so the key is always the
    // -- same shape as the legacy `lower(trim(joined))` key.
    joined.trim().to_string()
}

/// 🪪 Derive the document id for a movie from its four descriptive fields.
///
/// Pure. Infallible. Case-insensitive and trim-insensitive per field.
pub fn compute_document_id(name: &str, company: &str, director: &str, genre: &str) -> DocumentId {
    let key = normalized_key(name, company, director, genre);
    let digest = Md5::digest(key.as_bytes());
    DocumentId(format!("{:x}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_id_is_always_thirty_two_hex_chars() {
        let id = compute_document_id("Inception", "WB", "Nolan", "SciFi");
        assert_eq!(id.as_str().len(), DOCUMENT_ID_LEN);
        assert!(DocumentId::is_well_formed(id.as_str()));
    }

    #[test]
    fn the_one_where_md5_agrees_with_the_rest_of_the_planet() {
        // 🧪 md5("") is the most famous hash in computing. if this breaks, so has everything else.
        assert_eq!(
            compute_document_id("", "", "", "").as_str(),
            format!("{:x}", Md5::digest(b"|||"))
        );
        assert_eq!(
            format!("{:x}", Md5::digest(b"")),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn the_one_where_the_legacy_key_shape_still_matches() {
        // 🧪 already-trimmed fields hash exactly like lower(trim("a|b|c|d")) always did.
        let legacy_key = "Dune|Legendary|Villeneuve|SciFi".trim().to_lowercase();
        assert_eq!(legacy_key, "dune|legendary|villeneuve|scifi");
        assert_eq!(
            normalized_key("Dune", "Legendary", "Villeneuve", "SciFi"),
            legacy_key
        );
        assert_eq!(
            compute_document_id("Dune", "Legendary", "Villeneuve", "SciFi").as_str(),
            format!("{:x}", Md5::digest(legacy_key.as_bytes()))
        );
    }

    #[test]
    fn the_one_where_dune_keeps_the_id_it_was_stored_under() {
        // 🧪 pinned: this id is already in the store, so it must never drift.
        assert_eq!(
            compute_document_id("Dune", "Legendary", "Villeneuve", "SciFi"),
            "9d1e623914e1e14f840e6900a1251df3"
        );
        assert_eq!(
            compute_document_id("DUNE", " Legendary ", "Villeneuve", "scifi"),
            "9d1e623914e1e14f840e6900a1251df3"
        );
    }

    #[test]
    fn the_one_where_shouting_does_not_change_who_you_are() {
        let base = compute_document_id("Inception", "WB", "Nolan", "SciFi");
        assert_eq!(base, compute_document_id("INCEPTION", "WB", "Nolan", "SciFi"));
        assert_eq!(base, compute_document_id("Inception", "wb", "Nolan", "SciFi"));
        assert_eq!(base, compute_document_id("Inception", "WB", "NOLAN", "SciFi"));
        assert_eq!(base, compute_document_id("Inception", "WB", "Nolan", "scifi"));
    }

    #[test]
    fn the_one_where_stray_spaces_get_trimmed_per_field() {
        let base = compute_document_id("n", "c", "d", "g");
        assert_eq!(base, compute_document_id(" n ", "c", "d", "g"));
        assert_eq!(base, compute_document_id("n", "\tc ", "d", "g"));
        assert_eq!(base, compute_document_id("n", "c", "  d", "g"));
        assert_eq!(base, compute_document_id("n", "c", "d", "g\n"));
    }

    #[test]
    fn the_one_where_field_boundaries_matter() {
        // 🧪 moving text across the pipe is a different movie.
        assert_ne!(
            compute_document_id("ab", "c", "d", "g"),
            compute_document_id("a", "bc", "d", "g")
        );
        assert_ne!(
            compute_document_id("Dune", "Legendary", "Villeneuve", "SciFi"),
            compute_document_id("Dune", "Legendary", "Villeneuve", "Drama")
        );
    }

    #[test]
    fn the_one_where_unicode_lowercases_before_hashing() {
        assert_eq!(
            compute_document_id("AMÉLIE", "UGC", "Jeunet", "Comedia"),
            compute_document_id("amélie", "ugc", "jeunet", "comedia")
        );
    }

    #[test]
    fn the_one_where_foreign_ids_are_not_mistaken_for_ours() {
        assert!(!DocumentId::is_well_formed("3f1Xk9aQ"));
        assert!(!DocumentId::is_well_formed("D41D8CD98F00B204E9800998ECF8427E"));
        assert!(DocumentId::is_well_formed("d41d8cd98f00b204e9800998ecf8427e"));
    }
}
