//! Revision endpoints: regenerate a previous result from user feedback

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use bookgpt_core::workflows::{
    MissionVisionOptions, MissionVisionRevisionRequest, StakeholderRevisionRequest,
};

use super::{parse_body, respond};
use crate::api::{Envelope, PayloadKind, StrategyPayload};
use crate::gateway::GatewayState;
use crate::Result;

/// `POST /api/mission-vision/revise`
pub async fn revise_mission_vision(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<MissionVisionRevisionRequest>, JsonRejection>,
) -> Result<Json<Envelope<MissionVisionOptions>>> {
    let request = parse_body(PayloadKind::Options, body)?;
    respond(
        &state,
        &state.mission_vision_revision,
        &request,
        PayloadKind::Options,
        |options| options,
    )
    .await
}

/// `POST /api/stakeholder-motivation/revise`
pub async fn revise_stakeholder(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<StakeholderRevisionRequest>, JsonRejection>,
) -> Result<Json<Envelope<StrategyPayload>>> {
    let request = parse_body(PayloadKind::Strategy, body)?;
    respond(
        &state,
        &state.stakeholder_revision,
        &request,
        PayloadKind::Strategy,
        |strategy| StrategyPayload {
            strategy: Some(strategy),
        },
    )
    .await
}
