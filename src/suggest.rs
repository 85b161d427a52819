// Remote-backed resolver: one oracle attempt, then an unconditional fallback
// to the local resolver. Callers never see a hard failure from this layer.

use crate::dataset::Dataset;
use crate::oracle::{OracleClient, OracleError};
use crate::resolve::resolve_prompt;
use crate::spec::{ChartSpec, OracleReply};

/// How a suggestion was obtained, kept separate from the spec itself for
/// observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Oracle returned a spec that passed the schema check.
    Oracle,
    /// Oracle answered but the body was unusable; local fallback used,
    /// raw oracle text preserved in the message.
    FallbackUnparsable,
    /// Oracle unreachable, timed out, or returned a non-success status;
    /// local fallback used.
    FallbackTransport,
    /// No credential configured: local resolver ran, no network attempt.
    LocalOnly,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub spec: ChartSpec,
    pub resolution: Resolution,
}

/// Resolve a prompt, preferring the oracle when one is configured.
///
/// With no oracle this is exactly the local resolver. With one, a single
/// request is made; any failure mode collapses into an annotated local
/// suggestion. No retries.
pub async fn resolve_with_oracle(
    oracle: Option<&OracleClient>,
    prompt: &str,
    data: &Dataset,
) -> Suggestion {
    match oracle {
        None => Suggestion {
            spec: resolve_prompt(prompt, data),
            resolution: Resolution::LocalOnly,
        },
        Some(client) => {
            let outcome = client.suggest(prompt, &data.headers).await;
            apply_oracle_outcome(outcome, prompt, data)
        }
    }
}

/// The fallback chain, factored out of the transport so it can be exercised
/// without a live oracle.
pub fn apply_oracle_outcome(
    outcome: Result<String, OracleError>,
    prompt: &str,
    data: &Dataset,
) -> Suggestion {
    match outcome {
        Ok(raw) => match OracleReply::from_text(&raw) {
            OracleReply::Accepted(spec) => {
                tracing::info!(chart_type = ?spec.chart_type, "oracle suggestion accepted");
                Suggestion {
                    spec,
                    resolution: Resolution::Oracle,
                }
            }
            OracleReply::Rejected { reason } => {
                tracing::warn!(%reason, "oracle reply failed the schema check, falling back");
                let mut spec = resolve_prompt(prompt, data);
                spec.text = format!(
                    "Fallback used; oracle output could not be used ({}). Oracle output: {}. {}",
                    reason,
                    raw.trim(),
                    spec.text
                );
                Suggestion {
                    spec,
                    resolution: Resolution::FallbackUnparsable,
                }
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "oracle request failed, falling back");
            let mut spec = resolve_prompt(prompt, data);
            spec.text = format!("Fallback used; oracle request failed ({}). {}", err, spec.text);
            Suggestion {
                spec,
                resolution: Resolution::FallbackTransport,
            }
        }
    }
}
