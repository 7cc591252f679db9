use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::jobs::models::{JobDefinition, JobRecord};

/// Section holding scheduler-wide settings rather than jobs.
pub const DEFAULTS_SECTION: &str = "Defaults";

const JOBS_KEY: &str = "jobs";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document root must be a JSON object")]
    DocumentNotObject,

    #[error("Section '{section}' must be a JSON object")]
    SectionNotObject { section: String },

    #[error("Section '{section}' has invalid jobs: {source}")]
    InvalidJobs {
        section: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Flattens every section's `jobs` array into one ordered list of records.
///
/// Sections are visited in document order and `Defaults` is skipped without
/// being inspected. A section with no `jobs` key contributes nothing.
pub fn extract_jobs(document: &Value) -> Result<Vec<JobRecord>, ExtractError> {
    let sections = document
        .as_object()
        .ok_or(ExtractError::DocumentNotObject)?;

    let mut records = Vec::new();
    for (section, body) in sections {
        if section == DEFAULTS_SECTION {
            continue;
        }

        let body = body
            .as_object()
            .ok_or_else(|| ExtractError::SectionNotObject {
                section: section.clone(),
            })?;

        let Some(jobs) = body.get(JOBS_KEY) else {
            continue;
        };

        let definitions =
            Vec::<JobDefinition>::deserialize(jobs).map_err(|source| ExtractError::InvalidJobs {
                section: section.clone(),
                source,
            })?;

        records.extend(definitions.into_iter().map(JobRecord::from));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::JobEvents;
    use serde_json::json;

    fn names(records: &[JobRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_example_export() {
        let doc = json!({
            "Defaults": {"jobs": [{"Name": "ignored"}]},
            "Box1": {"jobs": [{
                "Name": "job_a", "Schedule": "daily",
                "Events": {"Out": ["e1"], "In": []},
                "Conditions": {"Out": [], "In": ["c1"]},
                "DependsOn": ["job_b"], "Type": "cmd",
                "Command": "run.sh", "Description": "desc"
            }]}
        });

        let records = extract_jobs(&doc).unwrap();
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{
                "name": "job_a",
                "schedule": "daily",
                "events": {"add": ["e1"], "delete": [], "waitfor": ["c1"]},
                "dependencies": ["job_b"],
                "type": "cmd",
                "command": "run.sh",
                "description": "desc"
            }])
        );
    }

    #[test]
    fn test_defaults_section_is_never_inspected() {
        let doc = json!({
            "Defaults": "not even an object",
            "Box1": {"jobs": [{"Name": "a"}]}
        });
        assert_eq!(names(&extract_jobs(&doc).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_section_without_jobs_contributes_nothing() {
        let doc = json!({
            "Calendars": {"workdays": ["mon", "tue"]},
            "Box1": {"jobs": [{"Name": "a"}]},
            "Empty": {}
        });
        assert_eq!(names(&extract_jobs(&doc).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_order_follows_sections_then_jobs() {
        let doc = json!({
            "Zeta": {"jobs": [{"Name": "z1"}, {"Name": "z2"}]},
            "Alpha": {"jobs": [{"Name": "a1"}]},
            "Mid": {"jobs": [{"Name": "m1"}, {"Name": "m2"}, {"Name": "m3"}]}
        });
        assert_eq!(
            names(&extract_jobs(&doc).unwrap()),
            vec!["z1", "z2", "a1", "m1", "m2", "m3"]
        );
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let doc = json!({
            "Box1": {"jobs": [{"Name": "dup"}]},
            "Box2": {"jobs": [{"Name": "dup"}, {"Name": "dup"}]}
        });
        assert_eq!(extract_jobs(&doc).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(extract_jobs(&json!({})).unwrap().is_empty());
        assert!(extract_jobs(&json!({"Box1": {"jobs": []}}))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_fields_resolve_to_defaults() {
        let records = extract_jobs(&json!({"Box1": {"jobs": [{}]}})).unwrap();
        let record = &records[0];
        assert_eq!(record.name, "");
        assert_eq!(record.schedule, "N/A");
        assert_eq!(record.events, JobEvents::default());
        assert!(record.dependencies.is_empty());
        assert_eq!(record.job_type, "");
        assert_eq!(record.command, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_delete_is_always_empty() {
        let doc = json!({"Box1": {"jobs": [
            {"Events": {"Out": ["a"], "In": ["b"]}},
            {"Conditions": {"Out": ["c"], "In": ["d"]}}
        ]}});
        for record in extract_jobs(&doc).unwrap() {
            assert!(record.events.delete.is_empty());
        }
    }

    #[test]
    fn test_root_must_be_object() {
        let err = extract_jobs(&json!([{"jobs": []}])).unwrap_err();
        assert!(matches!(err, ExtractError::DocumentNotObject));
    }

    #[test]
    fn test_section_must_be_object() {
        let err = extract_jobs(&json!({"Box1": ["jobs"]})).unwrap_err();
        match err {
            ExtractError::SectionNotObject { section } => assert_eq!(section, "Box1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_jobs_must_be_array_of_objects() {
        for jobs in [json!("job_a"), json!(null), json!({"Name": "a"}), json!([1, 2])] {
            let err = extract_jobs(&json!({"Box1": {"jobs": jobs}})).unwrap_err();
            assert!(matches!(err, ExtractError::InvalidJobs { .. }));
        }
    }

    #[test]
    fn test_wrongly_typed_field_names_section() {
        let doc = json!({
            "Box1": {"jobs": [{"Name": "ok"}]},
            "Box2": {"jobs": [{"Name": "ok"}, {"DependsOn": "job_a"}]}
        });
        let err = extract_jobs(&doc).unwrap_err();
        assert!(err.to_string().starts_with("Section 'Box2' has invalid jobs"));
    }
}
