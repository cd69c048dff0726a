//! 📦 Records: the humble structs that ferry movies between the store and the screen.
//!
//! 🧠 Knowledge graph:
//! - `RawDocument`: what a backend hands back. An id and a bag of JSON fields. No opinions.
//! - `MovieRecord`: the four fields we actually care about, typed.
//! - `MovieRow`: a record plus the store id it lives under.
//! - `CollectionSnapshot`: every row of a collection at one point in time, plus the documents we had
//!   to skip on the way in. Skips are counted and kept, never silently dropped.
//!
//! 🔧 Decoding policy, decided once and written down here:
//! - unknown fields: ignored.
//! - missing known fields (or explicit null): empty string.
//! - known field present with a non-text value: the document is skipped and recorded.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// 🏷️ The record's column names, in display order.
pub const MOVIE_FIELDS: [&str; 4] = ["name", "company", "director", "genre"];

/// 📄 One document, as the store sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// 🎬 A movie, as the dashboard knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default, deserialize_with = "text_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub company: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub director: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub genre: String,
}

// -- null shows up when a field was cleared in the console. it means "nothing", so it reads as "".
fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl MovieRecord {
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        director: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            director: director.into(),
            genre: genre.into(),
        }
    }

    /// 📤 The four fields as a JSON object, ready for a full-replace write.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::with_capacity(MOVIE_FIELDS.len());
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("company".into(), Value::String(self.company.clone()));
        fields.insert("director".into(), Value::String(self.director.clone()));
        fields.insert("genre".into(), Value::String(self.genre.clone()));
        fields
    }

    /// 📥 Decode a store document's fields into a record.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        // -- only the four known keys get cloned. the rest of the bag stays where it is.
        let relevant: Map<String, Value> = MOVIE_FIELDS
            .iter()
            .filter_map(|key| fields.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect();
        serde_json::from_value(Value::Object(relevant))
    }

    /// 🗂️ Column values in `MOVIE_FIELDS` order.
    pub fn columns(&self) -> [&str; 4] {
        [&self.name, &self.company, &self.director, &self.genre]
    }
}

/// 🎞️ A record and the id it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
    pub doc_id: String,
    pub record: MovieRecord,
}

/// 🗑️ A document that didn't make it into the snapshot, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub doc_id: String,
    pub reason: String,
}

/// 📸 Every decodable row of a collection at the moment it was read.
///
/// Order is whatever the store gave us. Sort it yourself if you care.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionSnapshot {
    pub collection: String,
    pub rows: Vec<MovieRow>,
    pub skipped: Vec<SkippedDocument>,
}

impl CollectionSnapshot {
    /// 🏗️ Decode a page of raw documents, skipping (and recording) the ones that won't decode.
    ///
    /// Returns the snapshot plus one `PartialReadFailure` per skipped document so the caller
    /// can log them with whatever ceremony it prefers.
    pub fn from_documents(
        collection: impl Into<String>,
        documents: Vec<RawDocument>,
    ) -> (Self, Vec<StoreError>) {
        let collection = collection.into();
        let mut rows = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();
        let mut failures = Vec::new();

        for document in documents {
            match MovieRecord::from_fields(&document.fields) {
                Ok(record) => rows.push(MovieRow {
                    doc_id: document.id,
                    record,
                }),
                Err(err) => {
                    failures.push(StoreError::PartialReadFailure {
                        collection: collection.clone(),
                        doc_id: document.id.clone(),
                        reason: err.to_string(),
                    });
                    skipped.push(SkippedDocument {
                        doc_id: document.id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        (
            Self {
                collection,
                rows,
                skipped,
            },
            failures,
        )
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 📏 Columns shown per row. Always the four record fields; the id is bookkeeping, not a column.
    pub fn column_count(&self) -> usize {
        MOVIE_FIELDS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> RawDocument {
        match fields {
            Value::Object(map) => RawDocument::new(id, map),
            other => panic!("💀 test fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn the_one_where_a_well_behaved_document_decodes() {
        let document = doc(
            "a",
            json!({"name": "Heat", "company": "WB", "director": "Mann", "genre": "Crime"}),
        );
        let record =
            MovieRecord::from_fields(&document.fields).expect("💀 a clean document should decode");
        assert_eq!(record, MovieRecord::new("Heat", "WB", "Mann", "Crime"));
    }

    #[test]
    fn the_one_where_missing_fields_become_empty_and_extras_are_ignored() {
        let document = doc(
            "b",
            json!({"name": "Heat", "year": 1995, "budget": {"usd": 60000000}}),
        );
        let record = MovieRecord::from_fields(&document.fields)
            .expect("💀 missing fields are not a decode failure");
        assert_eq!(record, MovieRecord::new("Heat", "", "", ""));
    }

    #[test]
    fn the_one_where_null_reads_as_nothing() {
        let document = doc("c", json!({"name": "Heat", "genre": null}));
        let record = MovieRecord::from_fields(&document.fields).expect("💀 null should decode");
        assert_eq!(record.genre, "");
    }

    #[test]
    fn the_one_where_a_number_in_a_text_field_gets_the_document_skipped() {
        let documents = vec![
            doc("good", json!({"name": "Heat", "company": "WB", "director": "Mann", "genre": "Crime"})),
            doc("bad", json!({"name": 42, "company": "WB"})),
        ];
        let (snapshot, failures) = CollectionSnapshot::from_documents("movies", documents);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.rows[0].doc_id, "good");
        assert_eq!(snapshot.skipped.len(), 1);
        assert_eq!(snapshot.skipped[0].doc_id, "bad");
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            StoreError::PartialReadFailure { doc_id, collection, .. } if doc_id == "bad" && collection == "movies"
        ));
    }

    #[test]
    fn the_one_where_to_fields_writes_exactly_four_keys() {
        let fields = MovieRecord::new("Dune", "Legendary", "Villeneuve", "SciFi").to_fields();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in MOVIE_FIELDS {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(fields["director"], json!("Villeneuve"));
    }

    #[test]
    fn the_one_where_column_count_ignores_the_id() {
        let (snapshot, _) = CollectionSnapshot::from_documents("movies", vec![]);
        assert_eq!(snapshot.column_count(), 4);
        assert!(snapshot.is_empty());
    }
}
