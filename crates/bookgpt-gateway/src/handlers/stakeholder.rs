//! `POST /api/stakeholder-motivation`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use bookgpt_core::workflows::StakeholderMotivationInputs;

use super::{parse_body, respond};
use crate::api::{Envelope, PayloadKind, StrategyPayload};
use crate::gateway::GatewayState;
use crate::Result;

pub async fn generate(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<StakeholderMotivationInputs>, JsonRejection>,
) -> Result<Json<Envelope<StrategyPayload>>> {
    let inputs = parse_body(PayloadKind::Strategy, body)?;
    respond(&state, &state.stakeholder, &inputs, PayloadKind::Strategy, |strategy| {
        StrategyPayload {
            strategy: Some(strategy),
        }
    })
    .await
}
