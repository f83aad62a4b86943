//! `tenacious fetch` – execute one request with retries and print the body.

use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tenacious_core::config::TenaciousConfig;
use tenacious_core::{
    AbortToken, Authenticator, BearerToken, CurlTransport, ExecutionRequest, Method,
    NetworkError, OutboundRequest, Outcome, RequestExecutor, Transport,
};

use crate::cli::FetchArgs;

/// Build the execution request from config defaults and CLI overrides.
pub(crate) fn build_request(cfg: &TenaciousConfig, args: &FetchArgs) -> Result<ExecutionRequest> {
    let method: Method = args.method.parse()?;
    let mut outbound = OutboundRequest::new(method, &args.url)?;
    for line in &args.headers {
        outbound = outbound.with_header_line(line)?;
    }
    if let Some(data) = &args.data {
        outbound = outbound.with_body(data.as_bytes().to_vec());
    }

    let mut request = ExecutionRequest::with_defaults(outbound, &cfg.execution_defaults())?;
    if let Some(n) = args.max_attempts {
        request = request.with_max_attempts(n)?;
    }
    if let Some(ms) = args.retry_interval_ms {
        request = request.with_retry_interval(Duration::from_millis(ms));
    }
    if args.allow_empty {
        request = request.with_allow_empty_body(true);
    }
    Ok(request)
}

pub async fn run_fetch(cfg: &TenaciousConfig, args: &FetchArgs) -> Result<()> {
    let request = build_request(cfg, args)?;
    let executor = RequestExecutor::new(CurlTransport::new(cfg.curl_options()));

    let outcome = match &args.bearer {
        Some(token) => {
            let executor = executor.with_authenticator(BearerToken::new(token.clone()));
            drive(&executor, request, args.callback, tokio::signal::ctrl_c()).await?
        }
        None => drive(&executor, request, args.callback, tokio::signal::ctrl_c()).await?,
    };

    match outcome {
        Ok(body) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
            Ok(())
        }
        Err(err) => {
            if matches!(err, NetworkError::EndpointError { .. }) {
                tracing::debug!("endpoint error details:\n{}", err.debug_report());
            }
            Err(anyhow::Error::new(err).context(format!("{} {}", args.method, args.url)))
        }
    }
}

/// Run through either surface until `interrupt` resolves with `Ok`.
///
/// An interrupt that fails (no signal handler available) is ignored and the
/// execution runs to completion.
pub(crate) async fn drive<T, A, S>(
    executor: &RequestExecutor<T, A>,
    request: ExecutionRequest,
    use_callback: bool,
    interrupt: S,
) -> Result<Outcome>
where
    T: Transport + 'static,
    A: Authenticator + 'static,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(interrupt);

    if use_callback {
        let (tx, mut rx) = tokio::sync::oneshot::channel();
        let handle = executor.execute_with_callback(request, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        tokio::select! {
            outcome = &mut rx => return outcome.context("execution task ended without a result"),
            Ok(()) = &mut interrupt => handle.cancel(),
        }
        // The callback still fires once, with the cancellation.
        return rx.await.context("execution task ended without a result");
    }

    let abort = AbortToken::new();
    let run = executor.execute_with_abort(&request, &abort);
    tokio::pin!(run);
    tokio::select! {
        outcome = &mut run => return Ok(outcome),
        Ok(()) = &mut interrupt => abort.abort(),
    }
    Ok(run.await)
}
