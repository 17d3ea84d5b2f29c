//! Coherence validation for a generated run.
//!
//! Cross-checks instances, assignments, and the timeline after generation.
//! Never fails: every problem becomes a [`Finding`] in the returned
//! [`CoherenceReport`]. Detects:
//! - Legs riding unknown instances
//! - Instances touching no hub
//! - Partitioned orders whose splits end at different airports
//! - Events naming unknown consignments or instances
//! - Departures not covering the configured horizon
//!
//! Only the first few findings of each check are logged; the rest are
//! counted.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::{Assignment, FlightInstance, HubSet, TimelineEvent};

/// Findings logged per check before the rest are only counted.
const LOGGED_PER_CHECK: usize = 5;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Categories of coherence findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// A leg references an instance that was not generated.
    MissingLegInstance,
    /// An instance has no hub at either end.
    InstanceWithoutHub,
    /// Splits of one order end at different airports.
    DivergentSplits,
    /// An event names a consignment no assignment has.
    UnknownConsignment,
    /// An event names an instance that was not generated.
    UnknownEventInstance,
    /// No instance departs at all.
    NoDepartures,
    /// Departures span fewer days than the horizon.
    ShortHorizon,
}

/// One detected problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of a coherence pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoherenceReport {
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

impl CoherenceReport {
    /// Whether no error was found (warnings allowed).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Records findings for one check, logging the first few.
struct Check<'r> {
    report: &'r mut CoherenceReport,
    kind: FindingKind,
    severity: Severity,
    seen: usize,
}

impl<'r> Check<'r> {
    fn new(report: &'r mut CoherenceReport, kind: FindingKind, severity: Severity) -> Self {
        Self {
            report,
            kind,
            severity,
            seen: 0,
        }
    }

    fn record(&mut self, message: String) {
        if self.seen < LOGGED_PER_CHECK {
            match self.severity {
                Severity::Error => error!(kind = ?self.kind, "{message}"),
                Severity::Warning => warn!(kind = ?self.kind, "{message}"),
            }
        }
        self.seen += 1;
        match self.severity {
            Severity::Error => self.report.errors += 1,
            Severity::Warning => self.report.warnings += 1,
        }
        self.report.findings.push(Finding {
            kind: self.kind,
            severity: self.severity,
            message,
        });
    }
}

impl Drop for Check<'_> {
    fn drop(&mut self) {
        if self.seen > LOGGED_PER_CHECK {
            info!(
                kind = ?self.kind,
                unlogged = self.seen - LOGGED_PER_CHECK,
                "further findings counted but not logged"
            );
        }
    }
}

/// Validates a run.
///
/// Checks, in order:
/// 1. Every leg's instance exists (error)
/// 2. Every instance touches a hub (warning)
/// 3. Splits of a partitioned order share their final airport (error)
/// 4. Every event's consignment and instance exist (error)
/// 5. Departures exist (error) and span at least `horizon_days` calendar days (warning)
pub fn validate_coherence(
    instances: &[FlightInstance],
    assignments: &[Assignment],
    timeline: &[TimelineEvent],
    hubs: &HubSet,
    horizon_days: u32,
) -> CoherenceReport {
    let mut report = CoherenceReport::default();
    let instance_by_id: HashMap<&str, &FlightInstance> = instances
        .iter()
        .map(|i| (i.instance_id.as_str(), i))
        .collect();

    // 1. Leg instances
    {
        let mut check = Check::new(&mut report, FindingKind::MissingLegInstance, Severity::Error);
        for a in assignments {
            for leg in a.legs() {
                if !instance_by_id.contains_key(leg.instance_id.as_str()) {
                    check.record(format!(
                        "{}: leg {} rides unknown instance {}",
                        a.order_id, leg.seq, leg.instance_id
                    ));
                }
            }
        }
    }

    // 2. Hub coverage
    {
        let mut check = Check::new(&mut report, FindingKind::InstanceWithoutHub, Severity::Warning);
        for inst in instances.iter().filter(|i| !i.touches_hub(hubs)) {
            check.record(format!(
                "{} ({} -> {}) touches no hub",
                inst.instance_id, inst.origin, inst.dest
            ));
        }
    }

    // 3. Split convergence
    {
        let mut check = Check::new(&mut report, FindingKind::DivergentSplits, Severity::Error);
        for a in assignments.iter().filter(|a| a.is_partitioned()) {
            let destinations: HashSet<&str> = a
                .splits
                .iter()
                .filter_map(|s| s.legs.last())
                .filter_map(|leg| instance_by_id.get(leg.instance_id.as_str()))
                .map(|inst| inst.dest.as_str())
                .collect();
            if destinations.len() > 1 {
                let mut listed: Vec<&str> = destinations.into_iter().collect();
                listed.sort_unstable();
                check.record(format!(
                    "{}: splits end at different airports ({})",
                    a.order_id,
                    listed.join(", ")
                ));
            }
        }
    }

    // 4. Timeline references
    {
        let consignments: HashSet<&str> = assignments
            .iter()
            .flat_map(|a| a.consignment_ids())
            .collect();
        let mut unknown_consignment =
            Check::new(&mut report, FindingKind::UnknownConsignment, Severity::Error);
        let mut unknown_instance = Vec::new();
        for event in timeline {
            if !consignments.contains(event.consignment_id.as_str()) {
                unknown_consignment.record(format!(
                    "{} event references unknown consignment {}",
                    event.kind.name(),
                    event.consignment_id
                ));
            }
            if let Some(id) = event.kind.instance_id() {
                if !instance_by_id.contains_key(id) {
                    unknown_instance.push(format!(
                        "{} event references unknown instance {id}",
                        event.kind.name()
                    ));
                }
            }
        }
        drop(unknown_consignment);

        let mut check = Check::new(&mut report, FindingKind::UnknownEventInstance, Severity::Error);
        for message in unknown_instance {
            check.record(message);
        }
    }

    // 5. Horizon coverage
    {
        let first = instances.iter().map(|i| i.dep_utc.date_naive()).min();
        let last = instances.iter().map(|i| i.dep_utc.date_naive()).max();
        match first.zip(last) {
            None => {
                Check::new(&mut report, FindingKind::NoDepartures, Severity::Error)
                    .record("no departures generated".to_string());
            }
            Some((first, last)) => {
                let span = (last - first).num_days() + 1;
                if span < i64::from(horizon_days) {
                    Check::new(&mut report, FindingKind::ShortHorizon, Severity::Warning).record(
                        format!("departures span {span} day(s), horizon is {horizon_days}"),
                    );
                }
            }
        }
    }

    info!(
        errors = report.errors,
        warnings = report.warnings,
        "coherence validation finished"
    );
    report
}
