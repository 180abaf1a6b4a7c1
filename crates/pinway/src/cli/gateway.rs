//! Gateway command handlers.

use pinway::{GatewayProbe, GatewayResolver, PinwayConfig, PinwayResult, ResolveFailure};
use std::time::Duration;
use tracing::info;

/// Print the URL for `cid` on one gateway, or on every gateway within budget.
pub fn resolve(
    config: &PinwayConfig,
    cid: &str,
    path: Option<&str>,
    index: usize,
    all: bool,
) -> PinwayResult<()> {
    let resolver = GatewayResolver::from_config(&config.gateway)?;
    for line in resolution_lines(&resolver, cid, path, index, all) {
        println!("{line}");
    }
    Ok(())
}

/// Print the URL a failed load should move to, or why there is none.
pub fn next(config: &PinwayConfig, url: &str, attempt: usize) -> PinwayResult<()> {
    let resolver = GatewayResolver::from_config(&config.gateway)?;
    println!("{}", next_line(&resolver, url, attempt));
    Ok(())
}

fn resolution_lines(
    resolver: &GatewayResolver,
    cid: &str,
    path: Option<&str>,
    index: usize,
    all: bool,
) -> Vec<String> {
    let indices: Vec<usize> = if all {
        (0..resolver.max_attempts()).collect()
    } else {
        vec![index]
    };
    indices
        .into_iter()
        .map(|index| match resolver.try_resolve_url(cid, path, index) {
            Ok(url) => url,
            Err(failure) => failure_line(&failure),
        })
        .collect()
}

fn next_line(resolver: &GatewayResolver, url: &str, attempt: usize) -> String {
    if attempt >= resolver.max_attempts() {
        return format!(
            "exhausted: attempt {attempt} is past the budget of {}",
            resolver.max_attempts()
        );
    }
    match resolver.try_next_gateway_url(url, attempt) {
        Ok(next) => next,
        Err(failure) => failure_line(&failure),
    }
}

/// Running out of gateways and bad input read differently.
fn failure_line(failure: &ResolveFailure) -> String {
    match failure {
        ResolveFailure::Exhausted { .. } => format!("exhausted: {failure}"),
        _ => format!("unresolved: {failure}"),
    }
}

/// Probe every gateway for `cid` and print one line per gateway.
pub async fn probe(
    config: &PinwayConfig,
    cid: &str,
    path: Option<&str>,
    timeout_ms: Option<u64>,
) -> PinwayResult<()> {
    let resolver = GatewayResolver::from_config(&config.gateway)?;
    let probe = match timeout_ms {
        Some(ms) => GatewayProbe::new(Duration::from_millis(ms))?,
        None => GatewayProbe::from_config(&config.gateway)?,
    };

    let reports = probe.probe_all(&resolver, cid, path).await;
    if reports.is_empty() {
        println!("nothing to probe for '{cid}'");
    }
    for report in &reports {
        println!(
            "{:>2}  {:<4}  {:>6} ms  {}",
            report.gateway_index,
            if report.reachable { "ok" } else { "down" },
            report.elapsed.as_millis(),
            report.url
        );
    }

    let reachable = reports.iter().filter(|r| r.reachable).count();
    info!(reachable, total = reports.len(), "Probe finished");
    Ok(())
}
