//! Mission & Vision generation (book chapter 2)

use serde::{Deserialize, Serialize};

use crate::book::BookLibrary;
use crate::error::ExtractionError;
use crate::extract::{extract, ShapeContract};
use crate::prompt::{or_default, require, FieldMap, GenerationRequest, PromptTemplate, TemplateId};

use super::Workflow;

/// Keys every option must carry as non-empty strings
pub const OPTION_FIELDS: &[&str] = &["id", "approach", "mission", "vision", "rationale"];

const SYSTEM: &str = "You are an expert digital transformation consultant specializing in \
                      mission and vision creation.";

const TASK: &str = r#"User's Context:
- Current Scenario: {{currentScenario}}
- Industry: {{industry}}
- Market Segment: {{marketSegment}}
- Transformation Goal: {{goal}}
- Intended TO-BE: {{intendedToBe}}
- Additional Context: {{additionalContext}}

Task: Create 3 different sets of Mission and Vision statements for this organization, each with a slightly different approach:

1. **Digital-First Approach**: Emphasizing technology and innovation leadership
2. **Customer-Centric Approach**: Focusing on enhanced customer experience and value
3. **Transformation-Focused Approach**: Highlighting organizational change and capability building

For each set, provide:
- A clear, compelling Mission Statement (2-3 sentences)
- An inspiring Vision Statement (1-2 sentences)
- Brief rationale explaining why this approach fits the organization's context

Requirements:
- Follow the templates and principles from the book
- Ensure alignment between mission and vision
- Make them specific to the user's industry and context
- Keep language clear and motivational

Format your response as JSON:
{
  "options": [
    {"id": "option-1", "approach": "Digital-First Approach", "mission": "...", "vision": "...", "rationale": "..."},
    {"id": "option-2", "approach": "Customer-Centric Approach", "mission": "...", "vision": "...", "rationale": "..."},
    {"id": "option-3", "approach": "Transformation-Focused Approach", "mission": "...", "vision": "...", "rationale": "..."}
  ]
}"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionVisionInputs {
    pub current_scenario: Option<String>,
    pub industry: Option<String>,
    pub market_segment: Option<String>,
    pub intended_to_be: Option<String>,
    pub goal: Option<String>,
    pub additional_context: Option<String>,
}

impl MissionVisionInputs {
    pub(crate) fn industry(&self) -> &str {
        self.industry.as_deref().unwrap_or_default()
    }

    pub(crate) fn goal(&self) -> &str {
        self.goal.as_deref().unwrap_or_default()
    }

    pub(crate) fn intended_to_be(&self) -> &str {
        self.intended_to_be.as_deref().unwrap_or_default()
    }
}

impl GenerationRequest for MissionVisionInputs {
    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "currentScenario", self.current_scenario.as_deref());
        require(&mut missing, "industry", self.industry.as_deref());
        require(&mut missing, "goal", self.goal.as_deref());
        require(&mut missing, "intendedToBe", self.intended_to_be.as_deref());
        missing
    }

    fn template_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(
            "currentScenario".into(),
            or_default(self.current_scenario.as_deref(), ""),
        );
        fields.insert("industry".into(), self.industry().to_string());
        fields.insert(
            "marketSegment".into(),
            or_default(self.market_segment.as_deref(), "Not specified"),
        );
        fields.insert("goal".into(), self.goal().to_string());
        fields.insert("intendedToBe".into(), self.intended_to_be().to_string());
        fields.insert(
            "additionalContext".into(),
            or_default(self.additional_context.as_deref(), "None provided"),
        );
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionVisionOption {
    pub id: String,
    pub approach: String,
    pub mission: String,
    pub vision: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionVisionOptions {
    pub options: Vec<MissionVisionOption>,
}

#[derive(Debug, Clone)]
pub struct MissionVisionWorkflow {
    template: PromptTemplate,
    contract: ShapeContract,
}

impl MissionVisionWorkflow {
    pub fn new(library: &BookLibrary) -> Self {
        let body = format!("{}\n\n{}", library.mission_vision_context(), TASK);
        Self {
            template: PromptTemplate::new(TemplateId::MissionVision, SYSTEM, body),
            contract: ShapeContract::strict("options", OPTION_FIELDS),
        }
    }
}

impl Workflow for MissionVisionWorkflow {
    type Input = MissionVisionInputs;
    type Output = MissionVisionOptions;

    fn name(&self) -> &'static str {
        "mission_vision"
    }

    fn template(&self) -> &PromptTemplate {
        &self.template
    }

    fn extract(&self, raw: &str) -> Result<MissionVisionOptions, ExtractionError> {
        extract(raw, &self.contract)
    }

    fn synthesize(&self, input: &MissionVisionInputs) -> MissionVisionOptions {
        let industry = input.industry().to_lowercase();
        let goal = input.goal().to_lowercase();
        let market = or_default(input.market_segment.as_deref(), "our market");

        MissionVisionOptions {
            options: vec![
                MissionVisionOption {
                    id: "option-1".to_string(),
                    approach: "Digital-First Approach".to_string(),
                    mission: format!(
                        "To {goal} by leveraging cutting-edge digital technologies and data-driven \
                         insights, delivering exceptional value to our stakeholders in the \
                         {industry} industry while fostering innovation and sustainable growth."
                    ),
                    vision: format!(
                        "To be the leading digital-first organization in {industry}, recognized \
                         for transforming {market} through innovative solutions and exceptional \
                         customer experiences."
                    ),
                    rationale: "This mission and vision emphasize digital leadership and \
                                innovation, positioning your organization as a technology pioneer \
                                in your industry while maintaining focus on stakeholder value and \
                                sustainable growth."
                        .to_string(),
                },
                MissionVisionOption {
                    id: "option-2".to_string(),
                    approach: "Customer-Centric Approach".to_string(),
                    mission: format!(
                        "We exist to revolutionize the {industry} experience by {goal}, using \
                         digital transformation to create meaningful connections and deliver \
                         personalized solutions that exceed expectations."
                    ),
                    vision: format!(
                        "By 2027, we will be the most customer-centric {industry} organization, \
                         setting new standards for digital innovation and customer satisfaction."
                    ),
                    rationale: "This approach prioritizes customer experience and relationship \
                                building, using digital transformation as a means to better serve \
                                and connect with your target audience."
                        .to_string(),
                },
                MissionVisionOption {
                    id: "option-3".to_string(),
                    approach: "Transformation-Focused Approach".to_string(),
                    mission: format!(
                        "To transform our organization and the {industry} industry by {goal}, \
                         building adaptive capabilities and empowering our people to thrive in \
                         the digital age."
                    ),
                    vision: format!(
                        "To become a resilient, digitally-enabled organization that continuously \
                         evolves and sets benchmarks for transformation excellence in {industry}."
                    ),
                    rationale: "This mission and vision focus on organizational transformation \
                                and capability building, emphasizing adaptability, employee \
                                empowerment, and continuous evolution in the digital landscape."
                        .to_string(),
                },
            ],
        }
    }
}
