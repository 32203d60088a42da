//! Per-invocation pipeline: decode → filter → refresh → query → write.
//!
//! Each invocation is one linear pass with no retained state: the
//! notification is decoded, non-PDF uploads short-circuit to `skipped`, and
//! a PDF triggers the three collaborator calls in order. [`handle`] is the
//! infallible boundary: every decode or collaborator error is logged and
//! folded into a `failed` response, never propagated.

use std::time::Instant;

use tracing::{error, info, instrument};

use docrelay_clients::{AgentClient, IngestionClient, ObjectStorageClient};
use docrelay_shared::{HandlerConfig, HandlerResponse, InvocationId, Result};

/// The fixed question sent to the agent for a given document.
fn extraction_question(file_name: &str) -> String {
    format!("Extract details from the doc {file_name}")
}

/// Run one invocation end to end.
///
/// Never fails: the returned [`HandlerResponse`] is the only thing that
/// crosses this boundary, whatever happened inside.
pub async fn handle(config: &HandlerConfig, body: Option<&[u8]>) -> HandlerResponse {
    let invocation_id = InvocationId::new();
    let start = Instant::now();

    info!(%invocation_id, "upload notification received");

    let response = match run(config, body, &invocation_id).await {
        Ok(response) => response,
        Err(e) => {
            error!(%invocation_id, error = %e, "invocation failed");
            HandlerResponse::failed(e)
        }
    };

    info!(
        %invocation_id,
        elapsed_ms = start.elapsed().as_millis(),
        ?response,
        "invocation finished"
    );

    response
}

/// The fallible pipeline behind [`handle`].
#[instrument(skip_all, fields(invocation = %invocation_id))]
async fn run(
    config: &HandlerConfig,
    body: Option<&[u8]>,
    invocation_id: &InvocationId,
) -> Result<HandlerResponse> {
    let event = docrelay_event::decode(body)?;
    let file_name = event.object_name;

    if !docrelay_event::is_pdf_object(&file_name) {
        info!(object = %file_name, "skipping non-PDF upload");
        return Ok(HandlerResponse::Skipped);
    }

    info!(pdf = %file_name, "processing PDF upload");
    let request_id = invocation_id.to_string();

    // Refresh the knowledge base. The job runs asynchronously on the
    // platform; only its creation is awaited here.
    let ingestion = IngestionClient::new(config)?;
    let job = ingestion.create_job(&request_id).await?;
    info!(
        job_id = %job.id,
        lifecycle_state = %job.lifecycle_state,
        "knowledge-base refresh started"
    );

    // Ask the agent to extract the document's details.
    let agent = AgentClient::new(config)?;
    let question = extraction_question(&file_name);
    let extracted = agent.ask(&question, &request_id).await?;

    // Write the extraction next to the source, renamed .pdf → .txt.
    let output_file = docrelay_event::output_object_name(&file_name);
    let storage = ObjectStorageClient::new(config)?;
    storage
        .put_object(&output_file, &extracted, &request_id)
        .await?;

    Ok(HandlerResponse::Success {
        pdf: file_name,
        output_file,
    })
}
