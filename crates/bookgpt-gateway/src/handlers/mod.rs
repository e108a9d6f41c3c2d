//! HTTP handlers for the generation endpoints
//!
//! Every handler follows the same path: decode the body, run the workflow
//! through the shared pipeline inside a panic boundary, and wrap the outcome
//! in an [`Envelope`].

pub mod chat;
pub mod mission_vision;
pub mod revision;
pub mod stakeholder;

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use futures::FutureExt;
use tracing::Instrument;

use bookgpt_core::pipeline::Generated;
use bookgpt_core::workflows::Workflow;

use crate::api::{Envelope, PayloadKind, CHAT_VALIDATION_ERROR};
use crate::gateway::GatewayState;
use crate::{GatewayError, Result};

/// Unwrap an extracted JSON body, turning a rejection into a 400 for `kind`
pub(crate) fn parse_body<T>(
    kind: PayloadKind,
    body: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            // `message` is the only chat field that can fail to decode
            let message = match (kind, &rejection) {
                (PayloadKind::Chat, JsonRejection::JsonDataError(_)) => {
                    CHAT_VALIDATION_ERROR.to_string()
                }
                _ => format!("Invalid request body: {}", rejection.body_text()),
            };
            Err(GatewayError::bad_request(kind, message))
        }
    }
}

/// Run `workflow` for `input`, converting validation failures and panics
/// into [`GatewayError`]s for `kind`
pub(crate) async fn run_workflow<W: Workflow>(
    state: &GatewayState,
    workflow: &W,
    input: &W::Input,
    kind: PayloadKind,
) -> Result<Generated<W::Output>> {
    let span = tracing::info_span!(
        "generate",
        request_id = %uuid::Uuid::new_v4(),
        workflow = workflow.name()
    );

    let outcome = AssertUnwindSafe(state.pipeline.run(workflow, input).instrument(span))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(generated)) => {
            tracing::debug!(
                "{} answered from {:?} ({})",
                workflow.name(),
                generated.source,
                generated.provider.as_deref().unwrap_or("synthesized")
            );
            Ok(generated)
        }
        Ok(Err(validation)) => Err(GatewayError::validation(kind, validation)),
        Err(panic) => Err(GatewayError::internal(
            kind,
            format!("{} panicked: {}", workflow.name(), panic_message(panic.as_ref())),
        )),
    }
}

/// [`run_workflow`] with the payload reshaped by `wrap` into a success envelope
pub(crate) async fn respond<W, P>(
    state: &GatewayState,
    workflow: &W,
    input: &W::Input,
    kind: PayloadKind,
    wrap: impl FnOnce(W::Output) -> P,
) -> Result<Json<Envelope<P>>>
where
    W: Workflow,
{
    let generated = run_workflow(state, workflow, input, kind).await?;
    Ok(Json(Envelope::success(wrap(generated.payload), generated.source)))
}

/// Text of a caught panic payload
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}
