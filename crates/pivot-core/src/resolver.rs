//! Field resolution across heterogeneous record key spellings.
//!
//! Upstream exports disagree on key names (`segment`, `symptom_segment`,
//! `symptomSegment`, ...). Each logical field has a finite, ordered alias
//! list; resolution tries the logical key first and then each alias in
//! declaration order. Aliases are never looked up again, so chains do not
//! form.

use std::sync::LazyLock;

use serde_json::Value;

use pivot_model::{Record, SynonymEntry};

/// Built-in aliases, in priority order within each field.
const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "segment",
        &[
            "symptom_segment",
            "symptomSegment",
            "segment_name",
            "segmentName",
            "Segment",
        ],
    ),
    (
        "diagnosis",
        &["diagnosis_name", "diagnosisName", "problem", "Diagnosis"],
    ),
    (
        "diagnostic_category",
        &[
            "diagnosticCategory",
            "diagnosis_category",
            "diagnosisCategory",
            "category",
        ],
    ),
    (
        "event_type",
        &["eventType", "note_type", "noteType", "type"],
    ),
    (
        "date",
        &[
            "event_date",
            "eventDate",
            "note_date",
            "noteDate",
            "encounter_date",
            "Date",
        ],
    ),
    ("mention_id", &["mentionId", "mention_identifier", "mention"]),
    ("age", &["patient_age", "patientAge", "Age"]),
    ("age_range", &["ageRange", "age_group", "ageGroup"]),
    (
        "birth_date",
        &["birthDate", "date_of_birth", "dateOfBirth", "dob", "DOB"],
    ),
    ("housing_insecurity", &["housingInsecurity"]),
    ("food_insecurity", &["foodInsecurity"]),
    ("transportation_insecurity", &["transportationInsecurity"]),
    ("utility_insecurity", &["utilityInsecurity"]),
    ("interpersonal_safety", &["interpersonalSafety"]),
    ("gender", &["sex", "Gender"]),
    ("race", &["Race"]),
    ("ethnicity", &["Ethnicity"]),
];

static BUILTIN_TABLE: LazyLock<SynonymTable> = LazyLock::new(SynonymTable::builtin);

/// Ordered table of logical field names and their alternate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SynonymTable {
    /// Table with the built-in aliases only.
    pub fn builtin() -> Self {
        let entries = BUILTIN_SYNONYMS
            .iter()
            .map(|(field, aliases)| SynonymEntry::new(*field, aliases.iter().copied()))
            .collect();
        Self { entries }
    }

    /// Built-in table extended with configured entries.
    ///
    /// Configured aliases for a known field are tried before the built-in
    /// ones; entries for new fields are appended.
    pub fn with_overrides(overrides: &[SynonymEntry]) -> Self {
        let mut table = Self::builtin();
        for entry in overrides {
            match table.entries.iter_mut().find(|e| e.field == entry.field) {
                Some(existing) => {
                    let mut aliases = entry.aliases.clone();
                    for alias in existing.aliases.drain(..) {
                        if !aliases.contains(&alias) {
                            aliases.push(alias);
                        }
                    }
                    existing.aliases = aliases;
                }
                None => table.entries.push(entry.clone()),
            }
        }
        table
    }

    /// Aliases for a logical field, empty when the field is unknown.
    pub fn aliases(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map_or(&[][..], |entry| entry.aliases.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = &SynonymEntry> {
        self.entries.iter()
    }

    /// Resolves a logical field against a record.
    ///
    /// A key holding JSON `null` counts as absent, so resolution moves on to
    /// the next alias.
    pub fn resolve<'r>(&self, record: &'r Record, field: &str) -> Option<&'r Value> {
        std::iter::once(field)
            .chain(self.aliases(field).iter().map(String::as_str))
            .find_map(|key| record.get(key).filter(|value| !value.is_null()))
    }
}

/// Resolves a logical field with the built-in synonym table.
pub fn resolve<'r>(record: &'r Record, field: &str) -> Option<&'r Value> {
    BUILTIN_TABLE.resolve(record, field)
}
