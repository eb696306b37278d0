//! Render-ready view of the session for the frontend.
//!
//! The result card is built by matching on the result variant, so each
//! shape gets its own sections and adding a variant fails to compile here.

use serde::Serialize;

use crate::analysis::{AnalysisMode, AnalysisResult, EyeAnalysis, ReportAnalysis};
use crate::session::SessionState;

/// Standing notice shown under every view.
pub const DISCLAIMER: &str = "This AI Eye Health Assistant is an informational tool and not a \
substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of \
your physician or other qualified health provider with any questions you may have regarding a \
medical condition. Never disregard professional medical advice or delay in seeking it because \
of something you have read on this application.";

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub mode: AnalysisMode,
    pub busy: bool,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub file: Option<FileView>,
    pub preview_url: Option<String>,
    pub error: Option<String>,
    pub result: Option<ResultView>,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FileView {
    pub name: String,
    pub media_type: String,
    pub size: usize,
    /// Whether the type is one the upload target advertises.
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    pub mode: AnalysisMode,
    pub headline: String,
    pub disclaimer: String,
    pub sections: Vec<ResultSection>,
}

#[derive(Debug, Serialize)]
pub struct ResultSection {
    pub title: &'static str,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
}

fn text(title: &'static str, value: &str) -> ResultSection {
    ResultSection {
        title,
        body: SectionBody::Text(value.to_string()),
    }
}

fn list(title: &'static str, items: &[String]) -> ResultSection {
    ResultSection {
        title,
        body: SectionBody::List(items.to_vec()),
    }
}

impl SessionView {
    pub fn from_state(state: &SessionState) -> Self {
        let submit_label = match (state.is_busy(), state.mode()) {
            (true, _) => "Analyzing…",
            (false, AnalysisMode::Image) => "Analyze Eye Image",
            (false, AnalysisMode::Report) => "Analyze Report",
        };

        Self {
            mode: state.mode(),
            busy: state.is_busy(),
            can_submit: state.can_submit(),
            submit_label,
            file: state.file().map(|f| FileView {
                name: f.name().to_string(),
                media_type: f.media_type().to_string(),
                size: f.size(),
                accepted: f.is_accepted_type(),
            }),
            preview_url: state.preview().map(|p| format!("/api/preview/{}", p.id)),
            error: state.error().map(str::to_string),
            result: state.result().map(ResultView::from_result),
            disclaimer: DISCLAIMER,
        }
    }
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Image(eye) => Self::eye(eye),
            AnalysisResult::Report(report) => Self::report(report),
        }
    }

    fn eye(a: &EyeAnalysis) -> Self {
        Self {
            mode: AnalysisMode::Image,
            headline: a.potential_condition.clone(),
            disclaimer: a.disclaimer.clone(),
            sections: vec![
                text("Potential Condition", &a.potential_condition),
                text("Description", &a.description),
                list("Common Symptoms", &a.common_symptoms),
                list("Early Detection Signs", &a.early_detection_signs),
                list("Risk Factors", &a.risk_factors),
                list("Recommended Tests", &a.recommended_tests),
                text("Treatment Options", &a.treatment_options),
                text("Multidisciplinary Approach", &a.multidisciplinary_approach),
                list("Prevention Tips", &a.prevention_tips),
                list("Questions for Your Doctor", &a.follow_up_questions),
                text("Recommendation", &a.recommendation),
            ],
        }
    }

    fn report(a: &ReportAnalysis) -> Self {
        let mut sections = Vec::with_capacity(6);
        // Urgent findings go first when present.
        if !a.critical_alerts.is_empty() {
            sections.push(list("Critical Alerts", &a.critical_alerts));
        }
        sections.extend([
            text("Report Type", &a.report_type),
            text("Summary", &a.summary),
            list("Key Findings", &a.key_findings),
            list("Differential Diagnosis", &a.differential_diagnosis),
            list("Recommendations", &a.recommendations),
        ]);

        Self {
            mode: AnalysisMode::Report,
            headline: a.report_type.clone(),
            disclaimer: a.disclaimer.clone(),
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionController, UploadedFile};

    fn eye() -> EyeAnalysis {
        EyeAnalysis {
            disclaimer: "Not a diagnosis.".into(),
            potential_condition: "Glaucoma".into(),
            description: "Optic nerve damage.".into(),
            common_symptoms: vec!["Peripheral vision loss".into()],
            early_detection_signs: vec![],
            risk_factors: vec!["Family history".into()],
            recommended_tests: vec!["Tonometry".into()],
            treatment_options: "Eye drops".into(),
            multidisciplinary_approach: "n/a".into(),
            prevention_tips: vec![],
            follow_up_questions: vec![],
            recommendation: "See an ophthalmologist.".into(),
        }
    }

    fn report(alerts: Vec<String>) -> ReportAnalysis {
        ReportAnalysis {
            disclaimer: "Not a diagnosis.".into(),
            summary: "Raised pressure.".into(),
            report_type: "Tonometry report".into(),
            key_findings: vec!["IOP 32 mmHg".into()],
            differential_diagnosis: vec!["Ocular hypertension".into()],
            recommendations: vec!["Repeat measurement".into()],
            critical_alerts: alerts,
        }
    }

    #[test]
    fn eye_result_has_eleven_sections() {
        let view = ResultView::from_result(&AnalysisResult::Image(eye()));
        assert_eq!(view.mode, AnalysisMode::Image);
        assert_eq!(view.headline, "Glaucoma");
        assert_eq!(view.sections.len(), 11);
        assert_eq!(view.sections[0].title, "Potential Condition");
        assert_eq!(view.sections.last().unwrap().title, "Recommendation");
    }

    #[test]
    fn report_without_alerts_omits_alert_section() {
        let view = ResultView::from_result(&AnalysisResult::Report(report(vec![])));
        assert_eq!(view.sections.len(), 5);
        assert!(view.sections.iter().all(|s| s.title != "Critical Alerts"));
    }

    #[test]
    fn report_alerts_come_first() {
        let view = ResultView::from_result(&AnalysisResult::Report(report(vec![
            "Possible acute angle closure".into(),
        ])));
        assert_eq!(view.sections[0].title, "Critical Alerts");
        assert_eq!(view.headline, "Tonometry report");
    }

    #[test]
    fn section_serialization() {
        let json = serde_json::to_value(text("Summary", "ok")).unwrap();
        assert_eq!(json["title"], "Summary");
        assert_eq!(json["kind"], "text");
        assert_eq!(json["value"], "ok");

        let json = serde_json::to_value(list("Key Findings", &["a".to_string()])).unwrap();
        assert_eq!(json["kind"], "list");
        assert_eq!(json["value"][0], "a");
    }

    #[test]
    fn empty_session_view() {
        let controller = SessionController::new();
        let view = SessionView::from_state(controller.state());
        assert_eq!(view.mode, AnalysisMode::Image);
        assert!(!view.can_submit);
        assert!(view.file.is_none());
        assert!(view.preview_url.is_none());
        assert_eq!(view.submit_label, "Analyze Eye Image");
        assert!(view.disclaimer.starts_with("This AI Eye Health Assistant"));
    }

    #[test]
    fn image_upload_view_has_preview_url() {
        let mut controller = SessionController::new();
        controller.select_file(UploadedFile::new("eye.png", Some("image/png"), vec![1, 2]));
        let view = SessionView::from_state(controller.state());
        let id = controller.state().preview().unwrap().id;
        assert_eq!(view.preview_url, Some(format!("/api/preview/{id}")));
        assert!(view.can_submit);
        let file = view.file.unwrap();
        assert_eq!(file.size, 2);
        assert!(file.accepted);
    }

    #[test]
    fn busy_view_disables_submit() {
        let mut controller = SessionController::new();
        controller.set_mode(AnalysisMode::Report);
        controller.select_file(UploadedFile::new("r.pdf", None, vec![1]));
        controller.begin_analysis();
        let view = SessionView::from_state(controller.state());
        assert!(view.busy);
        assert!(!view.can_submit);
        assert_eq!(view.submit_label, "Analyzing…");
        assert!(view.preview_url.is_none());
    }
}
