use serde::{Deserialize, Serialize};

use super::gemini_types::{GeminiError, GenerateContentRequest};
use super::AnalysisFailure;

/// Which kind of artifact the user is submitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// A photo of an eye.
    #[default]
    Image,
    /// A clinical report or scan.
    Report,
}

impl AnalysisMode {
    /// Lowercase noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Report => "report",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// Structured assessment of an eye photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeAnalysis {
    pub disclaimer: String,
    pub potential_condition: String,
    pub description: String,
    pub common_symptoms: Vec<String>,
    pub early_detection_signs: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub treatment_options: String,
    pub multidisciplinary_approach: String,
    pub prevention_tips: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub recommendation: String,
}

/// Structured summary of a clinical report or scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    pub disclaimer: String,
    pub summary: String,
    pub report_type: String,
    pub key_findings: Vec<String>,
    /// Ordered from most to least likely.
    pub differential_diagnosis: Vec<String>,
    pub recommendations: Vec<String>,
    /// May be empty, never absent.
    pub critical_alerts: Vec<String>,
}

/// One completed analysis, discriminated by the mode that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisResult {
    Image(EyeAnalysis),
    Report(ReportAnalysis),
}

impl AnalysisResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::Image(_) => AnalysisMode::Image,
            Self::Report(_) => AnalysisMode::Report,
        }
    }
}

/// Transport to a hosted generative model (allows mocking).
pub trait GenerativeBackend: Send + Sync {
    /// Send one `generateContent` request and return the response text.
    fn generate_content(&self, request: &GenerateContentRequest) -> Result<String, GeminiError>;
}

/// The two remote analysis operations.
pub trait AnalysisClient: Send + Sync {
    fn analyze_image(
        &self,
        payload: &[u8],
        media_type: &str,
    ) -> Result<EyeAnalysis, AnalysisFailure>;

    fn analyze_report(
        &self,
        payload: &[u8],
        media_type: &str,
    ) -> Result<ReportAnalysis, AnalysisFailure>;

    /// Dispatch to the operation matching `mode`.
    fn analyze(
        &self,
        mode: AnalysisMode,
        payload: &[u8],
        media_type: &str,
    ) -> Result<AnalysisResult, AnalysisFailure> {
        match mode {
            AnalysisMode::Image => self.analyze_image(payload, media_type).map(AnalysisResult::Image),
            AnalysisMode::Report => self
                .analyze_report(payload, media_type)
                .map(AnalysisResult::Report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AnalysisMode::Image).unwrap(), "\"image\"");
        assert_eq!(serde_json::to_string(&AnalysisMode::Report).unwrap(), "\"report\"");
        let mode: AnalysisMode = serde_json::from_str("\"report\"").unwrap();
        assert_eq!(mode, AnalysisMode::Report);
    }

    #[test]
    fn default_mode_is_image() {
        assert_eq!(AnalysisMode::default(), AnalysisMode::Image);
    }

    #[test]
    fn report_analysis_requires_critical_alerts() {
        let json = r#"{
            "disclaimer": "d",
            "summary": "s",
            "reportType": "OCT",
            "keyFindings": [],
            "differentialDiagnosis": [],
            "recommendations": []
        }"#;
        assert!(serde_json::from_str::<ReportAnalysis>(json).is_err());
    }

    #[test]
    fn result_carries_mode_tag() {
        let result = AnalysisResult::Report(ReportAnalysis {
            disclaimer: "d".into(),
            summary: "s".into(),
            report_type: "Visual field test".into(),
            key_findings: vec!["f".into()],
            differential_diagnosis: vec![],
            recommendations: vec![],
            critical_alerts: vec![],
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mode"], "report");
        assert_eq!(json["reportType"], "Visual field test");
        assert_eq!(result.mode(), AnalysisMode::Report);
    }
}
