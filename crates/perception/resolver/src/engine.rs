//! Batch detection for one triggering event.
//!
//! The scanner names the candidate observers, the oracle supplies geometry
//! for each pair, the resolver decides, and every result that is not `none`
//! goes to the sink. Observers are resolved independently; a malformed
//! observer is skipped and the rest of the batch carries on.

use crate::collaborators::{EligibilityScanner, GeometryOracle, ResultSink};
use crate::detection::DetectionResolver;
use perception_types::{
    ActionContext, ConfigResult, DetectionResult, EngineConfig, Entity, EntityId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One observer's outcome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverDetection {
    pub observer: EntityId,
    pub result: DetectionResult,
}

/// Summary of a batch
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Results that reached the sink, in scanner order
    pub detections: Vec<ObserverDetection>,
    /// Candidates the oracle could not place
    pub skipped: Vec<EntityId>,
    /// Candidates that resolved to `none`
    pub undetected: usize,
}

/// Runs detection batches against host collaborators
#[derive(Clone, Debug)]
pub struct DetectionEngine {
    resolver: DetectionResolver,
}

impl DetectionEngine {
    pub fn new(config: EngineConfig) -> ConfigResult<Self> {
        Ok(Self {
            resolver: DetectionResolver::new(config)?,
        })
    }

    pub fn from_resolver(resolver: DetectionResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &DetectionResolver {
        &self.resolver
    }

    /// Resolve every candidate observer of `source` without emitting
    #[instrument(skip_all, fields(source = %source.id, action = ?action.action))]
    pub fn detect(
        &self,
        source: &Entity,
        action: &ActionContext,
        scanner: &dyn EligibilityScanner,
        oracle: &dyn GeometryOracle,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for observer in scanner.candidates(source, action) {
            if observer.id == source.id {
                continue;
            }

            let Some(facts) = oracle.facts(&observer, source) else {
                debug!(observer = %observer.id, "No geometry for pair, skipping");
                report.skipped.push(observer.id.clone());
                continue;
            };

            let result = self.resolver.resolve(&observer, source, &facts, action);
            if result.is_detected() {
                report.detections.push(ObserverDetection {
                    observer: observer.id,
                    result,
                });
            } else {
                report.undetected += 1;
            }
        }

        info!(
            detected = report.detections.len(),
            undetected = report.undetected,
            skipped = report.skipped.len(),
            "Detection batch resolved"
        );

        report
    }

    /// Resolve a batch and hand every detection to `sink`
    pub fn dispatch(
        &self,
        source: &Entity,
        action: &ActionContext,
        scanner: &dyn EligibilityScanner,
        oracle: &dyn GeometryOracle,
        sink: &mut dyn ResultSink,
    ) -> BatchReport {
        let report = self.detect(source, action, scanner, oracle);
        for detection in &report.detections {
            sink.accept(&detection.observer, &detection.result);
        }
        report
    }
}
