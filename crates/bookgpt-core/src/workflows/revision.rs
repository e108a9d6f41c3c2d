//! Feedback-driven revisions of earlier mission/vision and stakeholder results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::book::BookLibrary;
use crate::error::ExtractionError;
use crate::extract::{extract, ShapeContract};
use crate::prompt::{require, FieldMap, GenerationRequest, PromptTemplate, TemplateId};

use super::mission_vision::{
    MissionVisionInputs, MissionVisionOption, MissionVisionOptions, OPTION_FIELDS,
};
use super::stakeholder::{
    default_strategy, StakeholderMotivationInputs, StakeholderStrategy, MAPPING_FIELDS,
    STRATEGY_FORMAT,
};
use super::{truncate_chars, Workflow};

/// Required revision fields, plus `originalData.*` paths for an incomplete original
fn revision_missing_fields<O: GenerationRequest>(
    feedback: Option<&str>,
    original: Option<&O>,
    has_results: bool,
) -> Vec<String> {
    let mut missing = Vec::new();
    require(&mut missing, "feedback", feedback);
    match original {
        Some(original) => missing.extend(
            original
                .missing_fields()
                .into_iter()
                .map(|field| format!("originalData.{}", field)),
        ),
        None => missing.push("originalData".to_string()),
    }
    if !has_results {
        missing.push("currentResults".to_string());
    }
    missing
}

/// Prefix every key of `fields` with `originalData.`
fn nest_original(fields: FieldMap) -> FieldMap {
    fields
        .into_iter()
        .map(|(key, value)| (format!("originalData.{}", key), value))
        .collect()
}

const MV_SYSTEM: &str = "You are an expert digital transformation consultant revising mission \
                         and vision statements based on user feedback.";

const MV_TASK: &str = r#"ORIGINAL USER INPUTS:
- Current Scenario: {{originalData.currentScenario}}
- Industry: {{originalData.industry}}
- Market Segment: {{originalData.marketSegment}}
- Intended To Be: {{originalData.intendedToBe}}
- Goal: {{originalData.goal}}
- Additional Context: {{originalData.additionalContext}}

CURRENT RESULTS THAT NEED REVISION:
{{currentResults}}

USER FEEDBACK FOR REVISION:
{{feedback}}

Based on the user's feedback, please generate 3 REVISED mission and vision options that address their concerns while maintaining alignment with the digital transformation framework. Each option should have a different strategic approach.

Return ONLY a valid JSON object with this exact structure:
{
  "options": [
    {
      "id": "revised-1",
      "approach": "Strategic approach name",
      "mission": "Clear, actionable mission statement (1-2 sentences)",
      "vision": "Inspiring vision statement (1-2 sentences)",
      "rationale": "Why this revised approach addresses the feedback (2-3 sentences)"
    }
  ]
}"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionVisionRevisionRequest {
    pub feedback: Option<String>,
    pub original_data: Option<MissionVisionInputs>,
    pub current_results: Option<Vec<MissionVisionOption>>,
}

impl MissionVisionRevisionRequest {
    fn feedback(&self) -> &str {
        self.feedback.as_deref().unwrap_or_default()
    }

    fn results_block(&self) -> String {
        self.current_results
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                format!(
                    "Option {}:\n- Approach: {}\n- Mission: {}\n- Vision: {}\n- Rationale: {}\n",
                    i + 1,
                    option.approach,
                    option.mission,
                    option.vision,
                    option.rationale
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl GenerationRequest for MissionVisionRevisionRequest {
    fn missing_fields(&self) -> Vec<String> {
        revision_missing_fields(
            self.feedback.as_deref(),
            self.original_data.as_ref(),
            self.current_results.is_some(),
        )
    }

    fn template_fields(&self) -> FieldMap {
        let mut fields = self
            .original_data
            .as_ref()
            .map(|original| nest_original(original.template_fields()))
            .unwrap_or_default();
        fields.insert("currentResults".into(), self.results_block());
        fields.insert("feedback".into(), self.feedback().to_string());
        fields
    }
}

#[derive(Debug, Clone)]
pub struct MissionVisionRevisionWorkflow {
    template: PromptTemplate,
    contract: ShapeContract,
}

impl MissionVisionRevisionWorkflow {
    pub fn new(library: &BookLibrary) -> Self {
        let body = format!(
            "Based on \"{}\" Chapter 2, I need to revise the mission and vision statements \
             based on user feedback.\n\n{}",
            library.source_title(),
            MV_TASK
        );
        Self {
            template: PromptTemplate::new(TemplateId::MissionVisionRevision, MV_SYSTEM, body),
            contract: ShapeContract::filter_valid("options", OPTION_FIELDS),
        }
    }
}

impl Workflow for MissionVisionRevisionWorkflow {
    type Input = MissionVisionRevisionRequest;
    type Output = MissionVisionOptions;

    fn name(&self) -> &'static str {
        "mission_vision_revision"
    }

    fn template(&self) -> &PromptTemplate {
        &self.template
    }

    fn extract(&self, raw: &str) -> Result<MissionVisionOptions, ExtractionError> {
        extract(raw, &self.contract)
    }

    fn synthesize(&self, input: &MissionVisionRevisionRequest) -> MissionVisionOptions {
        let original = input.original_data.clone().unwrap_or_default();
        let feedback = input.feedback();
        let goal = original.goal().to_lowercase();

        MissionVisionOptions {
            options: vec![MissionVisionOption {
                id: "revised-fallback-1".to_string(),
                approach: "Revised Customer-Centric Approach".to_string(),
                mission: format!(
                    "To leverage digital transformation in {} by {}, addressing your specific \
                     concerns about {}...",
                    original.industry(),
                    goal,
                    truncate_chars(feedback, 50)
                ),
                vision: format!(
                    "To become the leading {} through innovative digital solutions that {}.",
                    original.intended_to_be(),
                    goal
                ),
                rationale: format!(
                    "This revised approach specifically addresses your feedback: \"{}...\" while \
                     maintaining focus on digital transformation principles.",
                    truncate_chars(feedback, 100)
                ),
            }],
        }
    }
}

const SH_SYSTEM: &str = "You are an expert digital transformation consultant revising a \
                         stakeholder motivation strategy based on user feedback.";

const SH_TASK: &str = r#"ORIGINAL TRANSFORMATION CONTEXT:
- Transformation Context: {{originalData.transformationContext}}
- Success Definition: {{originalData.successDefinition}}
- Key Challenges: {{originalData.keyChallenges}}
- Timeline: {{originalData.timeline}}

STAKEHOLDERS:
{{originalData.stakeholders}}

CURRENT STRATEGY:
{{currentResults}}

USER FEEDBACK FOR REVISION:
{{feedback}}

Based on the user's feedback, please generate a REVISED comprehensive stakeholder motivation strategy that addresses their concerns. Use the SMILE framework and keep the original format."#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeholderRevisionRequest {
    pub feedback: Option<String>,
    pub original_data: Option<StakeholderMotivationInputs>,
    /// The previous strategy as returned to the client
    pub current_results: Option<Value>,
}

impl StakeholderRevisionRequest {
    fn feedback(&self) -> &str {
        self.feedback.as_deref().unwrap_or_default()
    }
}

impl GenerationRequest for StakeholderRevisionRequest {
    fn missing_fields(&self) -> Vec<String> {
        let has_results = matches!(&self.current_results, Some(v) if !v.is_null());
        revision_missing_fields(
            self.feedback.as_deref(),
            self.original_data.as_ref(),
            has_results,
        )
    }

    fn template_fields(&self) -> FieldMap {
        let mut fields = self
            .original_data
            .as_ref()
            .map(|original| nest_original(original.template_fields()))
            .unwrap_or_default();
        let current = self
            .current_results
            .as_ref()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_default();
        fields.insert("currentResults".into(), current);
        fields.insert("feedback".into(), self.feedback().to_string());
        fields
    }
}

#[derive(Debug, Clone)]
pub struct StakeholderRevisionWorkflow {
    template: PromptTemplate,
    contract: ShapeContract,
}

impl StakeholderRevisionWorkflow {
    pub fn new(library: &BookLibrary) -> Self {
        let body = format!(
            "Based on \"{}\" stakeholder motivation framework, I need to revise the stakeholder \
             strategy based on user feedback.\n\n{}\n\n{}",
            library.source_title(),
            SH_TASK,
            STRATEGY_FORMAT
        );
        Self {
            template: PromptTemplate::new(TemplateId::StakeholderRevision, SH_SYSTEM, body),
            contract: ShapeContract::filter_valid("stakeholderMappings", MAPPING_FIELDS),
        }
    }
}

impl Workflow for StakeholderRevisionWorkflow {
    type Input = StakeholderRevisionRequest;
    type Output = StakeholderStrategy;

    fn name(&self) -> &'static str {
        "stakeholder_revision"
    }

    fn template(&self) -> &PromptTemplate {
        &self.template
    }

    fn extract(&self, raw: &str) -> Result<StakeholderStrategy, ExtractionError> {
        extract(raw, &self.contract)
    }

    fn synthesize(&self, input: &StakeholderRevisionRequest) -> StakeholderStrategy {
        let original = input.original_data.clone().unwrap_or_default();
        let mut strategy = default_strategy(&original);
        strategy.overall_strategy = format!(
            "Revised engagement approach addressing: {}... {}",
            truncate_chars(input.feedback(), 150),
            strategy.overall_strategy
        );
        strategy
    }
}
