//! Integration tests for the generation pipeline
//!
//! These drive real workflows through provider chains built from tracking mock
//! providers, checking provider order, fallback behavior and validation.

use anyhow::Result;
use bookgpt_core::book::BookLibrary;
use bookgpt_core::pipeline::{GenerationPipeline, ResultSource};
use bookgpt_core::prompt::Prompt;
use bookgpt_core::provider::{Completion, GenerationProvider, ProviderChain};
use bookgpt_core::workflows::{
    MissionVisionInputs, MissionVisionWorkflow, StakeholderInput, StakeholderMotivationInputs,
    StakeholderWorkflow, Workflow,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of which provider was called, in order
type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// Mock provider that records calls and replies with a fixed script
#[derive(Debug)]
struct TrackingMockProvider {
    name: &'static str,
    reply: Option<&'static str>,
    calls: AtomicUsize,
    log: CallLog,
}

impl TrackingMockProvider {
    fn new(name: &'static str, reply: Option<&'static str>, log: CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
            log,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GenerationProvider for TrackingMockProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.name);

        match self.reply {
            Some(content) => Ok(Completion {
                provider: self.name.to_string(),
                content: content.to_string(),
                token_cost: 25,
            }),
            None => anyhow::bail!("{} quota exceeded", self.name),
        }
    }
}

fn scenario_a_inputs() -> MissionVisionInputs {
    MissionVisionInputs {
        current_scenario: Some("legacy systems".into()),
        industry: Some("Retail".into()),
        market_segment: Some(String::new()),
        intended_to_be: Some("omnichannel leader".into()),
        goal: Some("increase online revenue".into()),
        additional_context: Some(String::new()),
    }
}

const VALID_OPTIONS: &str = r#"Here you go:
{"options":[
  {"id":"option-1","approach":"Digital-First Approach","mission":"Lead retail online","vision":"Be first","rationale":"Fits"},
  {"id":"option-2","approach":"Customer-Centric Approach","mission":"Serve retail shoppers","vision":"Be loved","rationale":"Fits"},
  {"id":"option-3","approach":"Transformation-Focused Approach","mission":"Transform retail","vision":"Be resilient","rationale":"Fits"}
]}
Let me know if you need more."#;

#[tokio::test]
async fn test_primary_failure_tries_secondary_in_order() {
    let log: CallLog = Arc::default();
    let primary = TrackingMockProvider::new("gemini", None, log.clone());
    let secondary = TrackingMockProvider::new("openai", Some(VALID_OPTIONS), log.clone());
    let chain = ProviderChain::new(vec![primary.clone(), secondary.clone()]);
    let pipeline = GenerationPipeline::new(Arc::new(chain));

    let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());
    let generated = pipeline.run(&workflow, &scenario_a_inputs()).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["gemini", "openai"]);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(secondary.call_count(), 1);
    assert_eq!(generated.source, ResultSource::Provider);
    assert_eq!(generated.provider.as_deref(), Some("openai"));
    assert_eq!(generated.payload.options[2].mission, "Transform retail");
}

#[tokio::test]
async fn test_first_success_stops_the_chain() {
    let log: CallLog = Arc::default();
    let primary = TrackingMockProvider::new("gemini", Some(VALID_OPTIONS), log.clone());
    let secondary = TrackingMockProvider::new("openai", Some(VALID_OPTIONS), log.clone());
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::new(vec![
        primary.clone(),
        secondary.clone(),
    ])));

    let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());
    pipeline.run(&workflow, &scenario_a_inputs()).await.unwrap();

    assert_eq!(secondary.call_count(), 0);
}

#[tokio::test]
async fn test_scenario_a_no_providers_gives_fallback() {
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::empty()));
    let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());

    let generated = pipeline.run(&workflow, &scenario_a_inputs()).await.unwrap();

    assert_eq!(generated.source, ResultSource::Fallback);
    assert_eq!(generated.payload.options.len(), 3);
    for option in &generated.payload.options {
        assert!(option.mission.to_lowercase().contains("retail"));
    }
}

#[tokio::test]
async fn test_reply_without_json_falls_back_to_valid_shape() {
    let log: CallLog = Arc::default();
    let chatty = TrackingMockProvider::new("gemini", Some("Sorry, no structured answer."), log);
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::new(vec![chatty])));
    let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());

    let generated = pipeline.run(&workflow, &scenario_a_inputs()).await.unwrap();

    assert!(generated.is_fallback());
    let json = serde_json::to_string(&generated.payload).unwrap();
    assert!(workflow.extract(&json).is_ok());
}

#[tokio::test]
async fn test_scenario_c_empty_stakeholders_never_calls_provider() {
    let log: CallLog = Arc::default();
    let provider = TrackingMockProvider::new("gemini", Some("{}"), log);
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::new(vec![provider.clone()])));
    let workflow = StakeholderWorkflow::new(&BookLibrary::builtin());

    let inputs = StakeholderMotivationInputs {
        transformation_context: Some("ERP".into()),
        success_definition: Some("adoption".into()),
        key_challenges: Some("legacy".into()),
        timeline: Some("1 year".into()),
        stakeholders: Some(Vec::new()),
    };
    let err = pipeline.run(&workflow, &inputs).await.unwrap_err();

    assert!(err.to_string().contains("stakeholders"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_validation_lists_every_missing_field() {
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::empty()));
    let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());

    let err = pipeline
        .run(&workflow, &MissionVisionInputs::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Missing required fields: currentScenario, industry, goal, intendedToBe"
    );
}

#[tokio::test]
async fn test_stakeholder_strategy_from_provider() {
    let log: CallLog = Arc::default();
    let reply = r#"```json
{"stakeholderMappings":[{"name":"Ana","role":"CFO","quadrant":"Keep Satisfied"}],
 "overallStrategy":"Win the CFO early"}
```"#;
    let provider = TrackingMockProvider::new("openai", Some(reply), log);
    let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::new(vec![provider])));
    let workflow = StakeholderWorkflow::new(&BookLibrary::builtin());

    let inputs = StakeholderMotivationInputs {
        transformation_context: Some("ERP".into()),
        success_definition: Some("adoption".into()),
        key_challenges: Some("legacy".into()),
        timeline: Some("1 year".into()),
        stakeholders: Some(vec![StakeholderInput {
            name: Some("Ana".into()),
            role: Some("CFO".into()),
            influence_level: Some("High".into()),
            interest_level: Some("Low".into()),
            ..Default::default()
        }]),
    };
    let generated = pipeline.run(&workflow, &inputs).await.unwrap();

    assert_eq!(generated.source, ResultSource::Provider);
    assert_eq!(generated.payload.overall_strategy, "Win the CFO early");
}

proptest! {
    #[test]
    fn prop_mission_vision_fallback_is_deterministic(
        industry in "[A-Za-z ]{1,20}",
        goal in "[A-Za-z ]{1,30}",
        segment in "[A-Za-z ]{0,15}",
    ) {
        let workflow = MissionVisionWorkflow::new(&BookLibrary::builtin());
        let inputs = MissionVisionInputs {
            current_scenario: Some("today".into()),
            industry: Some(industry),
            market_segment: Some(segment),
            intended_to_be: Some("tomorrow".into()),
            goal: Some(goal),
            additional_context: None,
        };
        let first = serde_json::to_string(&workflow.synthesize(&inputs)).unwrap();
        let second = serde_json::to_string(&workflow.synthesize(&inputs)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_stakeholder_fallback_maps_every_stakeholder(count in 1usize..6) {
        let workflow = StakeholderWorkflow::new(&BookLibrary::builtin());
        let stakeholders = (0..count)
            .map(|i| StakeholderInput {
                name: Some(format!("person-{}", i)),
                role: Some("Lead".into()),
                influence_level: Some(if i % 2 == 0 { "High" } else { "Low" }.into()),
                interest_level: Some("High".into()),
                ..Default::default()
            })
            .collect();
        let inputs = StakeholderMotivationInputs {
            transformation_context: Some("ctx".into()),
            success_definition: Some("done".into()),
            key_challenges: Some("hard".into()),
            timeline: Some("soon".into()),
            stakeholders: Some(stakeholders),
        };
        let strategy = workflow.synthesize(&inputs);
        prop_assert_eq!(strategy.stakeholder_mappings.len(), count);
        prop_assert_eq!(&strategy, &workflow.synthesize(&inputs));
    }
}
