//! Stakeholder Motivation strategy (book chapter 3, SMILE framework)

use serde::{Deserialize, Serialize};

use crate::book::BookLibrary;
use crate::error::ExtractionError;
use crate::extract::{extract, ShapeContract};
use crate::prompt::{or_default, require, FieldMap, GenerationRequest, PromptTemplate, TemplateId};

use super::Workflow;

/// Keys every stakeholder mapping must carry as non-empty strings
pub const MAPPING_FIELDS: &[&str] = &["name", "role"];

const SYSTEM: &str = "You are an expert digital transformation consultant specializing in \
                      stakeholder engagement. Using the SMILE framework, analyze the stakeholder \
                      information and create a comprehensive motivation strategy.";

pub(crate) const STRATEGY_FORMAT: &str = r#"FORMAT AS JSON:
{
  "stakeholderMappings": [
    {
      "name": "string",
      "role": "string",
      "quadrant": "Manage Closely|Keep Satisfied|Keep Informed|Monitor",
      "influenceLevel": "High|Medium|Low",
      "interestLevel": "High|Medium|Low",
      "currentStance": "detailed stance description",
      "motivationStrategy": "specific strategy based on WIIFM",
      "communicationPlan": "tailored approach and messaging",
      "engagementFrequency": "specific frequency",
      "keyMessages": ["message1", "message2", "message3"],
      "successMetrics": ["metric1", "metric2"]
    }
  ],
  "overallStrategy": "comprehensive strategy description",
  "communicationTimeline": [
    {"phase": "phase name", "timeframe": "duration", "activities": ["activity1"], "stakeholders": ["stakeholder1"]}
  ],
  "riskMitigation": [
    {"risk": "specific risk description", "probability": "High|Medium|Low", "impact": "High|Medium|Low", "mitigation": "mitigation strategy"}
  ],
  "trackingMetrics": [
    {"metric": "metric name", "frequency": "measurement frequency", "target": "target value/outcome", "measurement": "how to measure"}
  ]
}"#;

const TASK: &str = r#"STAKEHOLDER INPUTS:
Transformation Context: {{transformationContext}}
Success Definition: {{successDefinition}}
Key Challenges: {{keyChallenges}}
Timeline: {{timeline}}

STAKEHOLDERS:
{{stakeholders}}

TASK:
Create a comprehensive stakeholder motivation strategy using the SMILE framework. Provide
stakeholder mappings (power-interest quadrant, motivation strategy, communication plan,
engagement frequency, key messages, success metrics), an overall strategy, a phase-based
communication timeline, risk mitigation and tracking metrics."#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeholderInput {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub influence_level: Option<String>,
    pub interest_level: Option<String>,
    pub current_stance: Option<String>,
    pub key_concerns: Option<String>,
    pub communication_preference: Option<String>,
    pub success_motivation: Option<String>,
}

impl StakeholderInput {
    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        Self::field(&self.name)
    }

    pub fn influence(&self) -> &str {
        Self::field(&self.influence_level)
    }

    pub fn interest(&self) -> &str {
        Self::field(&self.interest_level)
    }

    fn missing_fields(&self, index: usize, missing: &mut Vec<String>) {
        let path = |field: &str| format!("stakeholders[{}].{}", index, field);
        require(missing, &path("name"), self.name.as_deref());
        require(missing, &path("role"), self.role.as_deref());
        require(missing, &path("influenceLevel"), self.influence_level.as_deref());
        require(missing, &path("interestLevel"), self.interest_level.as_deref());
    }

    fn describe(&self, position: usize) -> String {
        format!(
            "{}. {} ({})\n   - Department: {}\n   - Influence Level: {}\n   - Interest Level: {}\n   \
             - Current Stance: {}\n   - Key Concerns: {}\n   - Communication Preference: {}\n   \
             - Success Motivation: {}",
            position,
            self.name(),
            Self::field(&self.role),
            or_default(self.department.as_deref(), "Not specified"),
            self.influence(),
            self.interest(),
            or_default(self.current_stance.as_deref(), "Not specified"),
            or_default(self.key_concerns.as_deref(), "Not specified"),
            or_default(self.communication_preference.as_deref(), "Not specified"),
            or_default(self.success_motivation.as_deref(), "Not specified"),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeholderMotivationInputs {
    pub transformation_context: Option<String>,
    pub success_definition: Option<String>,
    pub key_challenges: Option<String>,
    pub timeline: Option<String>,
    pub stakeholders: Option<Vec<StakeholderInput>>,
}

impl StakeholderMotivationInputs {
    pub fn stakeholders(&self) -> &[StakeholderInput] {
        self.stakeholders.as_deref().unwrap_or_default()
    }

    pub(crate) fn stakeholder_block(&self) -> String {
        self.stakeholders()
            .iter()
            .enumerate()
            .map(|(i, s)| s.describe(i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl GenerationRequest for StakeholderMotivationInputs {
    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "transformationContext", self.transformation_context.as_deref());
        require(&mut missing, "successDefinition", self.success_definition.as_deref());
        require(&mut missing, "keyChallenges", self.key_challenges.as_deref());
        require(&mut missing, "timeline", self.timeline.as_deref());

        if self.stakeholders().is_empty() {
            missing.push("stakeholders".to_string());
        } else {
            for (index, stakeholder) in self.stakeholders().iter().enumerate() {
                stakeholder.missing_fields(index, &mut missing);
            }
        }
        missing
    }

    fn template_fields(&self) -> FieldMap {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let mut fields = FieldMap::new();
        fields.insert("transformationContext".into(), text(&self.transformation_context));
        fields.insert("successDefinition".into(), text(&self.success_definition));
        fields.insert("keyChallenges".into(), text(&self.key_challenges));
        fields.insert("timeline".into(), text(&self.timeline));
        fields.insert("stakeholders".into(), self.stakeholder_block());
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeholderMapping {
    pub name: String,
    pub role: String,
    pub quadrant: String,
    pub influence_level: String,
    pub interest_level: String,
    pub current_stance: String,
    pub motivation_strategy: String,
    pub communication_plan: String,
    pub engagement_frequency: String,
    pub key_messages: Vec<String>,
    pub success_metrics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePhase {
    pub phase: String,
    pub timeframe: String,
    pub activities: Vec<String>,
    pub stakeholders: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskMitigation {
    pub risk: String,
    pub probability: String,
    pub impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingMetric {
    pub metric: String,
    pub frequency: String,
    pub target: String,
    pub measurement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StakeholderStrategy {
    pub stakeholder_mappings: Vec<StakeholderMapping>,
    pub overall_strategy: String,
    pub communication_timeline: Vec<TimelinePhase>,
    pub risk_mitigation: Vec<RiskMitigation>,
    pub tracking_metrics: Vec<TrackingMetric>,
}

/// Power-interest quadrant for an influence/interest pair
pub fn quadrant(influence: &str, interest: &str) -> &'static str {
    let high = |level: &str| level.eq_ignore_ascii_case("high");
    let low = |level: &str| level.eq_ignore_ascii_case("low");
    match (influence, interest) {
        (i, n) if high(i) && high(n) => "Manage Closely",
        (i, n) if high(i) && low(n) => "Keep Satisfied",
        (i, n) if low(i) && high(n) => "Keep Informed",
        _ => "Monitor",
    }
}

pub fn engagement_frequency(influence: &str, interest: &str) -> &'static str {
    let high = |level: &str| level.eq_ignore_ascii_case("high");
    if high(influence) && high(interest) {
        "Weekly"
    } else if high(influence) || high(interest) {
        "Bi-weekly"
    } else {
        "Monthly"
    }
}

/// The SMILE default strategy built from the inputs alone
pub(crate) fn default_strategy(inputs: &StakeholderMotivationInputs) -> StakeholderStrategy {
    let stakeholders = inputs.stakeholders();
    let everyone: Vec<String> = stakeholders.iter().map(|s| s.name().to_string()).collect();
    let high_influence: Vec<String> = stakeholders
        .iter()
        .filter(|s| s.influence().eq_ignore_ascii_case("high"))
        .map(|s| s.name().to_string())
        .collect();
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let stakeholder_mappings = stakeholders
        .iter()
        .map(|s| {
            let motivation = StakeholderInput::field(&s.success_motivation);
            StakeholderMapping {
                name: s.name().to_string(),
                role: StakeholderInput::field(&s.role).to_string(),
                quadrant: quadrant(s.influence(), s.interest()).to_string(),
                influence_level: s.influence().to_string(),
                interest_level: s.interest().to_string(),
                current_stance: or_default(
                    s.current_stance.as_deref(),
                    "Neutral - requires engagement",
                ),
                motivation_strategy: format!(
                    "Focus on {} and address concerns about {}",
                    motivation,
                    StakeholderInput::field(&s.key_concerns)
                ),
                communication_plan: format!(
                    "Use {} for regular updates and feedback",
                    StakeholderInput::field(&s.communication_preference)
                ),
                engagement_frequency: engagement_frequency(s.influence(), s.interest())
                    .to_string(),
                key_messages: vec![
                    format!("Personal benefits: {}", motivation),
                    "Transformation progress and milestones".to_string(),
                    "Role in ensuring success".to_string(),
                ],
                success_metrics: strings(&[
                    "Participation in transformation activities",
                    "Positive feedback and support",
                ]),
            }
        })
        .collect();

    StakeholderStrategy {
        stakeholder_mappings,
        overall_strategy: "Implement SMILE framework with focus on early wins, transparent \
                           communication, and addressing individual WIIFM factors for each \
                           stakeholder group."
            .to_string(),
        communication_timeline: vec![
            TimelinePhase {
                phase: "Pre-Launch Preparation".to_string(),
                timeframe: "2-4 weeks before launch".to_string(),
                activities: strings(&[
                    "Stakeholder mapping validation",
                    "Key message development",
                    "Champion identification",
                ]),
                stakeholders: high_influence,
            },
            TimelinePhase {
                phase: "Launch Phase".to_string(),
                timeframe: "Week 1-4".to_string(),
                activities: strings(&[
                    "Kick-off communications",
                    "Initial training",
                    "Quick wins demonstration",
                ]),
                stakeholders: everyone.clone(),
            },
            TimelinePhase {
                phase: "Implementation".to_string(),
                timeframe: "Month 2-6".to_string(),
                activities: strings(&[
                    "Regular progress updates",
                    "Issue resolution",
                    "Success story sharing",
                ]),
                stakeholders: everyone,
            },
        ],
        risk_mitigation: vec![
            RiskMitigation {
                risk: "Key stakeholder resistance".to_string(),
                probability: "Medium".to_string(),
                impact: "High".to_string(),
                mitigation: "Early engagement, address concerns directly, provide additional \
                             support"
                    .to_string(),
            },
            RiskMitigation {
                risk: "Communication overload".to_string(),
                probability: "Medium".to_string(),
                impact: "Medium".to_string(),
                mitigation: "Tailor frequency and format to stakeholder preferences".to_string(),
            },
        ],
        tracking_metrics: vec![
            TrackingMetric {
                metric: "Stakeholder Engagement Score".to_string(),
                frequency: "Weekly".to_string(),
                target: ">80% positive engagement".to_string(),
                measurement: "Survey responses and participation rates".to_string(),
            },
            TrackingMetric {
                metric: "Communication Effectiveness".to_string(),
                frequency: "Bi-weekly".to_string(),
                target: ">90% message clarity".to_string(),
                measurement: "Feedback surveys and comprehension checks".to_string(),
            },
        ],
    }
}

#[derive(Debug, Clone)]
pub struct StakeholderWorkflow {
    template: PromptTemplate,
    contract: ShapeContract,
}

impl StakeholderWorkflow {
    pub fn new(library: &BookLibrary) -> Self {
        let body = format!(
            "BOOK CONTEXT:\n{}\n\n{}\n\n{}\n\nApply the SMILE framework systematically and \
             ensure strategies are practical, actionable, and grounded in the transformation \
             context provided.",
            library.stakeholder_context(),
            TASK,
            STRATEGY_FORMAT
        );
        Self {
            template: PromptTemplate::new(TemplateId::StakeholderMotivation, SYSTEM, body),
            contract: ShapeContract::strict("stakeholderMappings", MAPPING_FIELDS),
        }
    }
}

impl Workflow for StakeholderWorkflow {
    type Input = StakeholderMotivationInputs;
    type Output = StakeholderStrategy;

    fn name(&self) -> &'static str {
        "stakeholder_motivation"
    }

    fn template(&self) -> &PromptTemplate {
        &self.template
    }

    fn extract(&self, raw: &str) -> Result<StakeholderStrategy, ExtractionError> {
        extract(raw, &self.contract)
    }

    fn synthesize(&self, input: &StakeholderMotivationInputs) -> StakeholderStrategy {
        default_strategy(input)
    }
}
