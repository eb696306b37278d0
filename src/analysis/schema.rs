//! Response schemas that constrain the model's structured output.
//!
//! Expressed in the OpenAPI subset accepted by Gemini's
//! `generationConfig.responseSchema`. Each schema's `required` list must
//! match the fields of the corresponding result type exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::AnalysisMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
    Array,
}

/// A node of a structured-output schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Declaration order, so the model emits fields in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl ResponseSchema {
    pub fn string(description: &str) -> Self {
        Self::leaf(SchemaType::String, description)
    }

    pub fn string_array(description: &str) -> Self {
        Self {
            items: Some(Box::new(Self {
                schema_type: SchemaType::String,
                description: None,
                properties: BTreeMap::new(),
                items: None,
                required: Vec::new(),
                property_ordering: Vec::new(),
            })),
            ..Self::leaf(SchemaType::Array, description)
        }
    }

    /// Object whose fields are all required, kept in the given order.
    pub fn object(fields: Vec<(&str, ResponseSchema)>) -> Self {
        let names: Vec<String> = fields.iter().map(|(name, _)| name.to_string()).collect();
        Self {
            schema_type: SchemaType::Object,
            description: None,
            properties: fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            items: None,
            required: names.clone(),
            property_ordering: names,
        }
    }

    fn leaf(schema_type: SchemaType, description: &str) -> Self {
        Self {
            schema_type,
            description: Some(description.to_string()),
            properties: BTreeMap::new(),
            items: None,
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }
}

/// Schema for [`super::EyeAnalysis`].
pub fn eye_analysis_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        (
            "disclaimer",
            ResponseSchema::string(
                "A mandatory disclaimer stating this is not a medical diagnosis.",
            ),
        ),
        (
            "potentialCondition",
            ResponseSchema::string(
                "The name of the most likely potential eye condition. If none, state \
                 'No immediate concerns detected'.",
            ),
        ),
        (
            "description",
            ResponseSchema::string("A detailed description of the potential condition."),
        ),
        (
            "commonSymptoms",
            ResponseSchema::string_array(
                "A list of common symptoms associated with the condition.",
            ),
        ),
        (
            "earlyDetectionSigns",
            ResponseSchema::string_array(
                "Early warning signs that help detect the condition before it progresses.",
            ),
        ),
        (
            "riskFactors",
            ResponseSchema::string_array("Known risk factors for the condition."),
        ),
        (
            "recommendedTests",
            ResponseSchema::string_array(
                "Clinical examinations or tests an eye-care professional may perform.",
            ),
        ),
        (
            "treatmentOptions",
            ResponseSchema::string("An overview of the usual treatment options."),
        ),
        (
            "multidisciplinaryApproach",
            ResponseSchema::string(
                "Which other specialists may be involved and why, if relevant.",
            ),
        ),
        (
            "preventionTips",
            ResponseSchema::string_array("Practical tips to prevent or slow the condition."),
        ),
        (
            "followUpQuestions",
            ResponseSchema::string_array(
                "Questions the user could ask their ophthalmologist at a follow-up visit.",
            ),
        ),
        (
            "recommendation",
            ResponseSchema::string(
                "A clear recommendation, usually advising to consult a professional \
                 ophthalmologist.",
            ),
        ),
    ])
}

/// Schema for [`super::ReportAnalysis`].
pub fn report_analysis_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        (
            "disclaimer",
            ResponseSchema::string(
                "A mandatory disclaimer stating this summary is not a medical diagnosis.",
            ),
        ),
        (
            "summary",
            ResponseSchema::string(
                "A plain-language summary of the report. If the upload is not a clinical \
                 report or scan, say so here.",
            ),
        ),
        (
            "reportType",
            ResponseSchema::string(
                "The kind of report or scan (e.g. OCT scan, visual field test, discharge \
                 letter). If not applicable, state 'Not a clinical report'.",
            ),
        ),
        (
            "keyFindings",
            ResponseSchema::string_array("The most important findings stated in the report."),
        ),
        (
            "differentialDiagnosis",
            ResponseSchema::string_array(
                "Possible diagnoses consistent with the findings, ordered from most to \
                 least likely.",
            ),
        ),
        (
            "recommendations",
            ResponseSchema::string_array("Recommendations for the treating clinician."),
        ),
        (
            "criticalAlerts",
            ResponseSchema::string_array(
                "Findings that need urgent attention. Use an empty list when there are none.",
            ),
        ),
    ])
}

/// Schema for the result shape expected in `mode`.
pub fn schema_for(mode: AnalysisMode) -> ResponseSchema {
    match mode {
        AnalysisMode::Image => eye_analysis_schema(),
        AnalysisMode::Report => report_analysis_schema(),
    }
}
