use serde::{Deserialize, Serialize};

pub const DEFAULT_SCHEDULE: &str = "N/A";

/// `In`/`Out` name lists shared by the `Events` and `Conditions` blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalLists {
    #[serde(rename = "In", default)]
    pub inbound: Option<Vec<String>>,
    #[serde(rename = "Out", default)]
    pub outbound: Option<Vec<String>>,
}

/// One entry of a section's `jobs` array, as it appears in the export.
///
/// Every field is optional; a `null` value reads the same as an absent key.
/// Defaults are applied when converting into a [`JobRecord`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobDefinition {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Schedule", default)]
    pub schedule: Option<String>,
    #[serde(rename = "Events", default)]
    pub events: Option<SignalLists>,
    #[serde(rename = "Conditions", default)]
    pub conditions: Option<SignalLists>,
    #[serde(rename = "DependsOn", default)]
    pub depends_on: Option<Vec<String>>,
    #[serde(rename = "Type", default)]
    pub job_type: Option<String>,
    #[serde(rename = "Command", default)]
    pub command: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobEvents {
    pub add: Vec<String>,
    /// Removals are not modelled; always empty.
    pub delete: Vec<String>,
    pub waitfor: Vec<String>,
}

/// Flattened job as returned to the front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    pub name: String,
    pub schedule: String,
    pub events: JobEvents,
    pub dependencies: Vec<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    pub command: String,
    pub description: String,
}

impl From<JobDefinition> for JobRecord {
    fn from(def: JobDefinition) -> Self {
        let events = def.events.unwrap_or_default();
        let conditions = def.conditions.unwrap_or_default();

        let mut add = events.outbound.unwrap_or_default();
        add.extend(conditions.outbound.unwrap_or_default());

        let mut waitfor = events.inbound.unwrap_or_default();
        waitfor.extend(conditions.inbound.unwrap_or_default());

        JobRecord {
            name: def.name.unwrap_or_default(),
            schedule: def
                .schedule
                .unwrap_or_else(|| DEFAULT_SCHEDULE.to_string()),
            events: JobEvents {
                add,
                delete: vec![],
                waitfor,
            },
            dependencies: def.depends_on.unwrap_or_default(),
            job_type: def.job_type.unwrap_or_default(),
            command: def.command.unwrap_or_default(),
            description: def.description.unwrap_or_default(),
        }
    }
}
