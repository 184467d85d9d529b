//! `dateguard check` command.

use std::io::{self, Read};

use crate::cli::CheckArgs;
use crate::config::{ConfigOverrides, ValidatorConfig};
use crate::context::ServiceContext;
use crate::hook::{HookPayload, HookResponse};
use crate::validate::{self, IssueReference, Verdict, ADMIN_CONTACT_MESSAGE};

/// Execute the `check` command, printing one JSON response line.
///
/// Failures before or during validation become a blocking response rather
/// than an error.
///
/// # Errors
///
/// Returns an error string only if the response cannot be encoded.
pub fn run(args: &CheckArgs) -> Result<(), String> {
    let response = HookResponse::from(evaluate(args, &mut io::stdin()));
    let line = serde_json::to_string(&response)
        .map_err(|e| format!("Failed to encode hook response: {e}"))?;
    println!("{line}");
    Ok(())
}

/// Resolves the payload, configuration and context, then validates.
fn evaluate(args: &CheckArgs, stdin: &mut impl Read) -> Verdict {
    let payload = match read_payload(args, stdin) {
        Ok(payload) => payload,
        Err(e) => return fail_safe(&e),
    };

    let overrides = ConfigOverrides {
        site: args.site.clone(),
        start_date_field: args.start_date_field.clone(),
    };
    let config = match ValidatorConfig::load(&overrides) {
        Ok(config) => config,
        Err(e) => return fail_safe(&e.to_string()),
    };
    let ctx = match ServiceContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(e) => return fail_safe(&e),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return fail_safe(&format!("Failed to start async runtime: {e}")),
    };
    let verdict = runtime.block_on(validate::validate(&ctx, &payload.issue));

    match ctx.finish() {
        Ok(Some(path)) => tracing::info!(cassette = %path.display(), "recording saved"),
        Ok(None) => {}
        Err(e) => tracing::warn!("{e}"),
    }

    verdict
}

fn read_payload(args: &CheckArgs, stdin: &mut impl Read) -> Result<HookPayload, String> {
    if let Some(key) = &args.issue {
        return Ok(HookPayload { issue: IssueReference::new(key.clone()) });
    }

    let text = match &args.payload {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read payload {}: {e}", path.display()))?,
        None => {
            let mut text = String::new();
            stdin.read_to_string(&mut text).map_err(|e| format!("Failed to read stdin: {e}"))?;
            text
        }
    };
    HookPayload::parse(&text).map_err(|e| format!("Invalid hook payload: {e}"))
}

fn fail_safe(reason: &str) -> Verdict {
    tracing::error!("{reason}; blocking transition");
    Verdict::block(ADMIN_CONTACT_MESSAGE)
}
