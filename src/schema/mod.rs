//! Record type registry
//!
//! The set of record types the service manages, declared once as static
//! data. Each type carries an ordered list of field descriptors that drive
//! routing (collection names), payload validation and the `/schema`
//! introspection endpoint. There is no runtime reflection: adding a type
//! means adding a descriptor table here.

pub mod validate;

pub use validate::ValidationError;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Primitive shape of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string
    Text,
    /// String constrained to `local@domain.tld` syntax
    Email,
    /// Boolean
    Flag,
    /// Non-negative integer
    Count,
    /// One of a fixed set of string literals, case-sensitive
    Choice(&'static [&'static str]),
    /// Array of strings
    TextList,
}

impl FieldKind {
    /// Human-readable kind name used by the schema summary
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text => "string".to_string(),
            FieldKind::Email => "email".to_string(),
            FieldKind::Flag => "boolean".to_string(),
            FieldKind::Count => "non-negative integer".to_string(),
            FieldKind::Choice(allowed) => format!("one of [{}]", allowed.join(", ")),
            FieldKind::TextList => "list of strings".to_string(),
        }
    }
}

/// Declared default for an optional field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    EmptyList,
}

impl FieldDefault {
    pub fn to_json(self) -> Value {
        match self {
            FieldDefault::Text(value) => Value::String(value.to_string()),
            FieldDefault::Flag(value) => Value::Bool(value),
            FieldDefault::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// One field of a record type
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind, description: Option<&'static str>) -> Self {
        FieldSpec { name, kind, required: true, default: None, description }
    }

    const fn optional(name: &'static str, kind: FieldKind, description: Option<&'static str>) -> Self {
        FieldSpec { name, kind, required: false, default: None, description }
    }

    const fn with_default(
        name: &'static str,
        kind: FieldKind,
        default: FieldDefault,
        description: Option<&'static str>,
    ) -> Self {
        FieldSpec { name, kind, required: false, default: Some(default), description }
    }

    /// Value a record gets when the field is omitted: the declared default,
    /// or JSON null when there is none
    pub fn default_value(&self) -> Value {
        match self.default {
            Some(default) => default.to_json(),
            None => Value::Null,
        }
    }

    /// Whether an explicit null is a legal value. Only optional fields
    /// without a declared default are nullable; defaulted fields must hold
    /// a value of their kind.
    pub fn nullable(&self) -> bool {
        !self.required && self.default.is_none()
    }
}

/// A record type: a name plus its ordered field descriptors
#[derive(Debug, Clone, Copy)]
pub struct TypeSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl TypeSchema {
    /// Storage bucket name: the ASCII-lowercased type name
    pub fn collection(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Look up a field descriptor by name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

const SEVERITY: &[&str] = &["low", "medium", "high"];
const LIFECYCLE_STAGES: &[&str] = &["ideation", "active", "sunset"];
const PROCESS_LEVELS: &[&str] = &["L1", "L2", "L3"];
const DATA_CATEGORIES: &[&str] = &["PII", "Financial", "Operational", "Other"];
const GDPR_BASES: &[&str] = &[
    "consent",
    "contract",
    "legal_obligation",
    "legitimate_interest",
    "vital_interest",
    "public_task",
];
const FRAMEWORKS: &[&str] = &["GDPR", "ISO27001", "SOC2", "Other"];

const APPLICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text, Some("Application name")),
    FieldSpec::optional("description", FieldKind::Text, Some("What it does in the business context")),
    FieldSpec::optional("owner", FieldKind::Text, Some("Business owner (person/team)")),
    FieldSpec::optional("technical_owner", FieldKind::Text, Some("Technical owner (person/team)")),
    FieldSpec::optional("vendor", FieldKind::Text, Some("Vendor name if SaaS or purchased software")),
    FieldSpec::with_default(
        "criticality",
        FieldKind::Choice(SEVERITY),
        FieldDefault::Text("medium"),
        Some("Business criticality"),
    ),
    FieldSpec::with_default(
        "lifecycle",
        FieldKind::Choice(LIFECYCLE_STAGES),
        FieldDefault::Text("active"),
        Some("Lifecycle stage"),
    ),
    FieldSpec::with_default(
        "gdpr_data",
        FieldKind::Flag,
        FieldDefault::Flag(false),
        Some("Processes GDPR personal data"),
    ),
    FieldSpec::with_default("tags", FieldKind::TextList, FieldDefault::EmptyList, Some("Free-form labels")),
];

const PROCESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text, Some("Business process name")),
    FieldSpec::optional("description", FieldKind::Text, None),
    FieldSpec::optional("owner", FieldKind::Text, None),
    FieldSpec::with_default(
        "level",
        FieldKind::Choice(PROCESS_LEVELS),
        FieldDefault::Text("L2"),
        Some("Process decomposition level"),
    ),
    FieldSpec::with_default(
        "related_applications",
        FieldKind::TextList,
        FieldDefault::EmptyList,
        Some("Linked application IDs or names"),
    ),
];

const ROLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text, Some("Role title (e.g., Sales Rep)")),
    FieldSpec::optional("email", FieldKind::Email, Some("Contact email")),
    FieldSpec::optional("department", FieldKind::Text, None),
    FieldSpec::with_default("responsibilities", FieldKind::TextList, FieldDefault::EmptyList, None),
];

const DATA_ASSET_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::Text, Some("Data asset name (e.g., Customer PII)")),
    FieldSpec::with_default(
        "category",
        FieldKind::Choice(DATA_CATEGORIES),
        FieldDefault::Text("Other"),
        None,
    ),
    FieldSpec::optional("description", FieldKind::Text, None),
    FieldSpec::optional("retention_period_months", FieldKind::Count, None),
    FieldSpec::optional("gdpr_basis", FieldKind::Choice(GDPR_BASES), None),
];

const RISK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldKind::Text, Some("Risk title")),
    FieldSpec::optional("description", FieldKind::Text, None),
    FieldSpec::with_default("likelihood", FieldKind::Choice(SEVERITY), FieldDefault::Text("low"), None),
    FieldSpec::with_default("impact", FieldKind::Choice(SEVERITY), FieldDefault::Text("low"), None),
    FieldSpec::optional("owner", FieldKind::Text, None),
    FieldSpec::with_default("related_assets", FieldKind::TextList, FieldDefault::EmptyList, None),
];

const COMPLIANCE_REQUIREMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::with_default(
        "framework",
        FieldKind::Choice(FRAMEWORKS),
        FieldDefault::Text("GDPR"),
        None,
    ),
    FieldSpec::optional("control_id", FieldKind::Text, Some("Control identifier (e.g., A.5.1)")),
    FieldSpec::required("title", FieldKind::Text, None),
    FieldSpec::optional("description", FieldKind::Text, None),
    FieldSpec::with_default("applicable", FieldKind::Flag, FieldDefault::Flag(true), None),
];

// source_type/target_type name other collections; kind is free-form
// (e.g. uses, owns, produces, consumes, responsible_for).
const RELATIONSHIP_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("source_id", FieldKind::Text, None),
    FieldSpec::required("source_type", FieldKind::Text, None),
    FieldSpec::required("target_id", FieldKind::Text, None),
    FieldSpec::required("target_type", FieldKind::Text, None),
    FieldSpec::required("kind", FieldKind::Text, Some("Relationship kind, e.g. depends_on")),
    FieldSpec::optional("description", FieldKind::Text, None),
];

const TYPES: &[TypeSchema] = &[
    TypeSchema { name: "Application", fields: APPLICATION_FIELDS },
    TypeSchema { name: "Process", fields: PROCESS_FIELDS },
    TypeSchema { name: "Role", fields: ROLE_FIELDS },
    TypeSchema { name: "DataAsset", fields: DATA_ASSET_FIELDS },
    TypeSchema { name: "Risk", fields: RISK_FIELDS },
    TypeSchema { name: "ComplianceRequirement", fields: COMPLIANCE_REQUIREMENT_FIELDS },
    TypeSchema { name: "Relationship", fields: RELATIONSHIP_FIELDS },
];

/// All declared record types, in declaration order
pub fn types() -> &'static [TypeSchema] {
    TYPES
}

/// Resolve a collection name to its record type, ignoring ASCII case.
///
/// Both the lowercased collection form (`dataasset`) and the declared name
/// (`DataAsset`) resolve; anything else is `None`.
pub fn resolve(collection: &str) -> Option<&'static TypeSchema> {
    TYPES.iter().find(|schema| schema.name.eq_ignore_ascii_case(collection))
}

/// Collection names for all declared types, in declaration order
pub fn collection_names() -> Vec<String> {
    TYPES.iter().map(TypeSchema::collection).collect()
}

/// One field entry in the schema summary
#[derive(Debug, Serialize)]
pub struct FieldSummary {
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub default: Value,
    pub description: Option<&'static str>,
}

/// One type entry in the schema summary
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub collection: String,
    pub fields: IndexMap<&'static str, FieldSummary>,
}

/// Serializable registry introspection, preserving declaration order
pub fn summary() -> IndexMap<&'static str, TypeSummary> {
    TYPES
        .iter()
        .map(|schema| {
            let fields = schema
                .fields
                .iter()
                .map(|field| {
                    let entry = FieldSummary {
                        field_type: field.kind.describe(),
                        required: field.required,
                        default: field.default_value(),
                        description: field.description,
                    };
                    (field.name, entry)
                })
                .collect();
            (schema.name, TypeSummary { collection: schema.collection(), fields })
        })
        .collect()
}
