//! Scripted walk through the breaker state machine.

use fusebox_circuit::{
    BreakerError, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, Verdict,
};
use fusebox_core::{Error, Result};
use serde::Serialize;
use std::time::Duration;

/// Failure modes of the simulated dependency
#[derive(Debug, thiserror::Error)]
pub enum SimulatedError {
    #[error("dependency unavailable")]
    Outage,
    #[error("request rejected as invalid")]
    InvalidRequest,
}

fn classify(error: &SimulatedError) -> Verdict {
    match error {
        SimulatedError::Outage => Verdict::Trip,
        SimulatedError::InvalidRequest => Verdict::PassThrough,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Succeed,
    Fail,
    InvalidRequest,
    Wait,
    Trip,
    HardTrip,
    Reset,
}

impl TryFrom<char> for Step {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            's' => Ok(Step::Succeed),
            'f' => Ok(Step::Fail),
            'i' => Ok(Step::InvalidRequest),
            'w' => Ok(Step::Wait),
            't' => Ok(Step::Trip),
            'h' => Ok(Step::HardTrip),
            'r' => Ok(Step::Reset),
            other => Err(Error::configuration(format!(
                "unknown script step '{other}' (expected one of s f i w t h r)"
            ))),
        }
    }
}

pub fn parse_script(script: &str) -> Result<Vec<Step>> {
    let steps = script
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(Step::try_from)
        .collect::<Result<Vec<_>>>()?;

    if steps.is_empty() {
        return Err(Error::configuration("simulation script is empty"));
    }
    Ok(steps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    Ok,
    Failed,
    Rejected,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: Step,
    pub result: Option<CallResult>,
    #[serde(flatten)]
    pub stats: CircuitBreakerStats,
}

pub async fn run(
    config: CircuitBreakerConfig,
    steps: &[Step],
    step_interval: Duration,
) -> Vec<StepReport> {
    let cb = CircuitBreaker::new(config).with_classifier(classify);
    let mut reports = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().copied().enumerate() {
        let result = match step {
            Step::Succeed => Some(call(&cb, Ok(())).await),
            Step::Fail => Some(call(&cb, Err(SimulatedError::Outage)).await),
            Step::InvalidRequest => Some(call(&cb, Err(SimulatedError::InvalidRequest)).await),
            Step::Wait => {
                tokio::time::sleep(step_interval).await;
                None
            }
            Step::Trip => {
                cb.trip();
                None
            }
            Step::HardTrip => {
                cb.hard_trip();
                None
            }
            Step::Reset => {
                cb.reset();
                None
            }
        };

        reports.push(StepReport {
            step: index + 1,
            action: step,
            result,
            stats: cb.stats(),
        });
    }

    reports
}

async fn call(
    cb: &CircuitBreaker<SimulatedError>,
    outcome: std::result::Result<(), SimulatedError>,
) -> CallResult {
    match cb.call(|| async move { outcome }).await {
        Ok(()) => CallResult::Ok,
        Err(BreakerError::Open) => CallResult::Rejected,
        Err(BreakerError::Operation(error)) => {
            tracing::debug!(%error, "simulated call failed");
            CallResult::Failed
        }
    }
}

pub async fn execute(
    mut config: CircuitBreakerConfig,
    script: &str,
    reset_timeout_ms: Option<u64>,
    step_ms: u64,
    json: bool,
) -> eyre::Result<()> {
    let steps = parse_script(script)?;
    if let Some(millis) = reset_timeout_ms {
        config.reset_timeout = Duration::from_millis(millis);
    }

    let reports = run(config, &steps, Duration::from_millis(step_ms)).await;

    if json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    } else {
        println!(
            "{:>4}  {:<16} {:<9} {:<10} {:<12} {:>5}",
            "STEP", "ACTION", "RESULT", "STATE", "STATUS", "OPENS"
        );
        for report in &reports {
            println!("{}", render_row(report));
        }
    }
    Ok(())
}

fn render_row(report: &StepReport) -> String {
    let action = format!("{:?}", report.action);
    let result = match report.result {
        Some(CallResult::Ok) => "ok",
        Some(CallResult::Failed) => "failed",
        Some(CallResult::Rejected) => "rejected",
        None => "-",
    };
    let mut state = report.stats.state.to_string();
    if report.stats.hard_tripped {
        state.push('!');
    }
    format!(
        "{:>4}  {:<16} {:<9} {:<10} {:<12} {:>5}",
        report.step,
        action,
        result,
        state,
        report.stats.status.to_string(),
        report.stats.open_count
    )
}
