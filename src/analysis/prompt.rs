use super::types::AnalysisMode;

/// Instruction sent alongside an eye photo.
pub const IMAGE_INSTRUCTION: &str = "\
You are an AI medical assistant specializing in ophthalmology. Analyze this image of an eye. \
Identify potential health concerns and provide information in the specified JSON format: \
disclaimer, potentialCondition, description, commonSymptoms, earlyDetectionSigns, riskFactors, \
recommendedTests, treatmentOptions, multidisciplinaryApproach, preventionTips, \
followUpQuestions and recommendation. Every field is required. \
Do not diagnose, but suggest possibilities. \
If the image is not of an eye or is unclear, state that in the `potentialCondition` field, \
state that the remaining fields are not applicable rather than omitting them, \
and recommend uploading a clearer image.";

/// Instruction sent alongside a clinical report or scan.
pub const REPORT_INSTRUCTION: &str = "\
You are an AI medical assistant supporting clinicians. Analyze this clinical report or \
medical scan and provide information in the specified JSON format: disclaimer, summary, \
reportType, keyFindings, differentialDiagnosis (ordered from most to least likely), \
recommendations and criticalAlerts. Every field is required; use an empty list for \
criticalAlerts when nothing is urgent. \
Do not diagnose, but suggest possibilities. \
If the upload is not a clinical report or scan, or is unreadable, state that it is not \
applicable in the `reportType` and `summary` fields rather than omitting them.";

/// Instruction text for `mode`.
pub fn instruction_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Image => IMAGE_INSTRUCTION,
        AnalysisMode::Report => REPORT_INSTRUCTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_instruction_names_every_field() {
        for field in [
            "disclaimer",
            "potentialCondition",
            "description",
            "commonSymptoms",
            "earlyDetectionSigns",
            "riskFactors",
            "recommendedTests",
            "treatmentOptions",
            "multidisciplinaryApproach",
            "preventionTips",
            "followUpQuestions",
            "recommendation",
        ] {
            assert!(IMAGE_INSTRUCTION.contains(field), "missing {field}");
        }
    }

    #[test]
    fn report_instruction_names_every_field() {
        for field in [
            "disclaimer",
            "summary",
            "reportType",
            "keyFindings",
            "differentialDiagnosis",
            "recommendations",
            "criticalAlerts",
        ] {
            assert!(REPORT_INSTRUCTION.contains(field), "missing {field}");
        }
    }

    #[test]
    fn instructions_state_unrecognizable_input_policy() {
        assert!(IMAGE_INSTRUCTION.contains("not applicable"));
        assert!(REPORT_INSTRUCTION.contains("not applicable"));
    }

    #[test]
    fn instruction_for_selects_by_mode() {
        assert_eq!(instruction_for(AnalysisMode::Image), IMAGE_INSTRUCTION);
        assert_eq!(instruction_for(AnalysisMode::Report), REPORT_INSTRUCTION);
    }
}
