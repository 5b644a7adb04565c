//! JSON-LD output formatting
//!
//! Serializes enhanced records into a Dublin Core / EDM / SKOS linked-data
//! document. Pure value construction; file writing stays with the caller.

use crate::subject::{EnhancedRecord, Subject};
use serde_json::{json, Map, Value};

/// SKOS scheme URI emitted with each subject entry
const SCHEME_URI: &str = "https://iconclass.org/";

/// Tool identification in the container document
const CREATOR_ID: &str = "https://github.com/maehr/dublin-core-metadata-enhancer";
const CREATOR_NAME: &str = "Dublin Core Metadata Enhancer";

/// Shared `@context` for container and objects
fn context() -> Value {
    json!({
        "dc": "http://purl.org/dc/terms/",
        "dcmitype": "http://purl.org/dc/dcmitype/",
        "edm": "http://www.europeana.eu/schemas/edm/",
        "foaf": "http://xmlns.com/foaf/0.1/",
        "skos": "http://www.w3.org/2004/02/skos/core#",
        "xsd": "http://www.w3.org/2001/XMLSchema#",
    })
}

/// Format one subject as a SKOS entry
fn format_subject(subject: &Subject) -> Value {
    let mut pref_labels = Vec::new();
    if let Some(de) = &subject.pref_label.de {
        pref_labels.push(json!({"@value": de, "@language": "de"}));
    }
    if let Some(en) = &subject.pref_label.en {
        pref_labels.push(json!({"@value": en, "@language": "en"}));
    }

    json!({
        "@id": subject.value_uri,
        "skos:notation": subject.notation,
        "skos:prefLabel": pref_labels,
        "edm:confidence": subject.confidence,
        "skos:inScheme": {
            "@id": SCHEME_URI,
            "skos:prefLabel": subject.scheme,
        },
    })
}

/// Format one enhanced record as an `edm:ProvidedCHO`
pub fn format_enhanced_object(record: &EnhancedRecord) -> Value {
    let mut obj = Map::new();
    obj.insert("@context".to_string(), context());
    obj.insert("@type".to_string(), json!("edm:ProvidedCHO"));
    obj.insert("dc:identifier".to_string(), json!(record.objectid));

    if !record.alt_text.is_empty() {
        obj.insert(
            "dc:description".to_string(),
            json!({
                "@type": "edm:AltText",
                "@value": record.alt_text,
                "@language": "de",
            }),
        );
    }

    if let Some(longdesc) = &record.longdesc {
        if !longdesc.trim().is_empty() {
            obj.insert(
                "edm:isNextInSequence".to_string(),
                json!({
                    "@type": "edm:LongDescription",
                    "@value": longdesc,
                    "@language": "de",
                }),
            );
        }
    }

    if !record.subjects.is_empty() {
        let subjects: Vec<Value> = record.subjects.iter().map(format_subject).collect();
        obj.insert("dc:subject".to_string(), Value::Array(subjects));
    }

    Value::Object(obj)
}

/// Format the complete output document
pub fn format_output(records: &[EnhancedRecord]) -> Value {
    let formatted: Vec<Value> = records.iter().map(format_enhanced_object).collect();
    let timestamp = chrono::Local::now().to_rfc3339();

    json!({
        "@context": context(),
        "@type": "edm:DataSet",
        "dc:created": {"@value": timestamp, "@type": "xsd:dateTime"},
        "dc:creator": {
            "@id": CREATOR_ID,
            "foaf:name": CREATOR_NAME,
        },
        "dc:description": "Enhanced Dublin Core metadata with AI-generated alt text and Iconclass subject classification",
        "edm:providedCHO": formatted,
    })
}
