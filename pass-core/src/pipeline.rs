//! The pass generation pipeline.
//!
//! A request moves through `Received → Styled → Described → Bundled → Manifested → Signed →
//! Archived`. A failure at any stage aborts the request with a [`PipelineError`] naming the
//! stage. Every stage boundary is reported to a [`StageObserver`].

use std::time::{Duration, Instant};

use crate::archive::{self, PassArchive};
use crate::assets::{self, AssetStore};
use crate::config::PassConfig;
use crate::descriptor::PassDescriptor;
use crate::error::Error;
use crate::manifest::Manifest;
use crate::request::PassRequest;
use crate::signer::ManifestSigner;
use crate::style::{self, ResolvedStyle};
use crate::working_set::WorkingSet;
use crate::PASS_FILE;

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Request validation.
    Validate,
    /// Brand style resolution.
    Style,
    /// Pass document construction.
    Describe,
    /// Asset bundling.
    Bundle,
    /// Manifest generation.
    Manifest,
    /// Manifest signing.
    Sign,
    /// Zip packaging.
    Archive,
}

impl Stage {
    /// Name of the stage, as used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Style => "style",
            Self::Describe => "describe",
            Self::Bundle => "bundle",
            Self::Manifest => "manifest",
            Self::Sign => "sign",
            Self::Archive => "archive",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request: the stage that failed and why.
#[derive(Debug)]
pub struct PipelineError {
    /// The failing stage.
    pub stage: Stage,
    /// The cause.
    pub source: Error,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {} failed: {}", self.stage, self.source)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Outcome of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stage completed.
    Ok,
    /// The stage failed and the request was aborted.
    Failed,
}

impl Outcome {
    /// Name of the outcome, as used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }
}

/// Receives a call at every stage boundary.
pub trait StageObserver: Send + Sync {
    /// A stage of request `request_id` finished.
    fn stage_finished(&self, request_id: &str, stage: Stage, elapsed: Duration, outcome: Outcome);
}

/// Logs stage boundaries through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl StageObserver for LogObserver {
    fn stage_finished(&self, request_id: &str, stage: Stage, elapsed: Duration, outcome: Outcome) {
        let level = match outcome {
            Outcome::Ok => log::Level::Debug,
            Outcome::Failed => log::Level::Warn,
        };

        log::log!(
            level,
            "request={request_id}, stage={stage}, outcome={}, duration={:.3} ms",
            outcome.as_str(),
            elapsed.as_secs_f64() * 1000.0
        );
    }
}

/// Generates signed pass archives.
///
/// Holds only read-only state, so one generator can serve any number of concurrent requests.
/// Each call to [`PassGenerator::generate`] works on its own [`WorkingSet`].
pub struct PassGenerator {
    config: PassConfig,
    assets: Box<dyn AssetStore>,
    signer: Box<dyn ManifestSigner>,
    observer: Box<dyn StageObserver>,
}

impl std::fmt::Debug for PassGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PassGenerator {
    /// Create a generator that logs stage boundaries.
    pub fn new(
        config: PassConfig,
        assets: impl AssetStore + 'static,
        signer: impl ManifestSigner + 'static,
    ) -> Self {
        Self {
            config,
            assets: Box::new(assets),
            signer: Box::new(signer),
            observer: Box::new(LogObserver),
        }
    }

    /// Replace the stage observer.
    pub fn with_observer(mut self, observer: impl StageObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    fn run<T>(
        &self,
        request_id: &str,
        stage: Stage,
        f: impl FnOnce() -> Result<T, Error>,
    ) -> Result<T, PipelineError> {
        let start = Instant::now();
        let res = f();
        let outcome = match res {
            Ok(_) => Outcome::Ok,
            Err(_) => Outcome::Failed,
        };

        self.observer
            .stage_finished(request_id, stage, start.elapsed(), outcome);

        res.map_err(|source| PipelineError { stage, source })
    }

    /// Run the full pipeline for one request.
    pub fn generate(
        &self,
        request_id: &str,
        request: &PassRequest,
    ) -> Result<PassArchive, PipelineError> {
        self.run(request_id, Stage::Validate, || request.validate())?;

        let style: ResolvedStyle = self.run(request_id, Stage::Style, || {
            Ok(style::resolve(&self.config, &request.brand_name))
        })?;

        let mut ws = WorkingSet::new();

        let descriptor = self.run(request_id, Stage::Describe, || {
            let descriptor = PassDescriptor::build(&self.config, request, &style.scheme)?;
            ws.add(PASS_FILE, descriptor.to_bytes()?)?;
            Ok(descriptor)
        })?;

        self.run(request_id, Stage::Bundle, || {
            let brand = assets::asset_brand(self.assets.as_ref(), &self.config, &style)?;
            assets::bundle(self.assets.as_ref(), brand, &mut ws)
        })?;

        let manifest = self.run(request_id, Stage::Manifest, || {
            Manifest::generate(&ws).to_bytes()
        })?;

        let signature = self.run(request_id, Stage::Sign, || {
            let signature = self.signer.sign(&manifest)?;
            if signature.is_empty() {
                return Err(Error::Signing("signer returned an empty signature".to_string()));
            }
            Ok(signature)
        })?;

        let bytes = self.run(request_id, Stage::Archive, || {
            archive::write(&ws, &manifest, &signature)
        })?;

        log::info!(
            "request={request_id}, serial={}, brand={}, files={}, size={} bytes",
            descriptor.serial_number,
            style.brand_key,
            ws.len() + 2,
            bytes.len()
        );

        Ok(PassArchive {
            serial_number: descriptor.serial_number,
            bytes,
        })
    }
}
