//! `POST /api/mission-vision`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use bookgpt_core::workflows::MissionVisionOptions;

use super::{parse_body, respond};
use crate::api::{Envelope, MissionVisionRequest, PayloadKind, USER_INPUTS_REQUIRED};
use crate::gateway::GatewayState;
use crate::{GatewayError, Result};

pub async fn generate(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<MissionVisionRequest>, JsonRejection>,
) -> Result<Json<Envelope<MissionVisionOptions>>> {
    let request = parse_body(PayloadKind::Options, body)?;
    let inputs = request
        .user_inputs
        .ok_or_else(|| GatewayError::bad_request(PayloadKind::Options, USER_INPUTS_REQUIRED))?;

    respond(&state, &state.mission_vision, &inputs, PayloadKind::Options, |options| options).await
}
