use log::{debug, info, warn};
use pipeline::{
    FeatureVector, FittedPipeline, MlErr,
    artifact::{ModelArtifact, ModelStore, ModelTag, Version},
};
use schema::{BuildingRecord, msg::PredictResponse};

use crate::error::{Result, ServeErr};

/// The loaded model, shared read-only by every request.
#[derive(Debug)]
pub struct ServiceContext {
    tag: ModelTag,
    feature_order: Vec<String>,
    pipeline: FittedPipeline,
}

impl ServiceContext {
    /// Loads the model `tag` points at from `store`.
    ///
    /// # Errors
    /// Fails when the tag cannot be resolved or the artifact is unusable. The
    /// service must not start in that case.
    pub fn load<S: ModelStore + ?Sized>(store: &S, tag: &ModelTag) -> Result<Self> {
        let artifact = store.load(tag)?;
        let ctx = Self::new(artifact)?;
        info!(features = ctx.feature_order.len(); "model {} ready", ctx.tag);
        Ok(ctx)
    }

    /// Builds a context around an artifact already in memory.
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        artifact.check_features()?;
        if artifact.meta.feature_names.is_none() {
            warn!("model has no stored feature order, using the catalog order");
        }

        Ok(Self {
            tag: ModelTag {
                name: artifact.meta.name.clone(),
                version: Version::Pinned(artifact.meta.version.clone()),
            },
            feature_order: artifact.feature_order(),
            pipeline: artifact.pipeline,
        })
    }

    #[inline]
    pub fn tag(&self) -> &ModelTag {
        &self.tag
    }

    #[inline]
    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    /// Predicts the energy use of a validated building.
    ///
    /// Negative and non-finite model outputs are clamped to zero.
    pub fn predict(&self, record: &BuildingRecord) -> Result<PredictResponse> {
        let wire = record.to_wire_values();
        let features =
            FeatureVector::project(&wire, &self.feature_order).map_err(ServeErr::FeatureMismatch)?;

        let raw = self.pipeline.predict_one(&features).map_err(|e| match e {
            MlErr::FeatureOrderMismatch { .. } => ServeErr::FeatureMismatch(e),
            e => ServeErr::Prediction(e),
        })?;
        let prediction = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        debug!(raw = raw, clamped = prediction; "prediction");

        Ok(PredictResponse {
            prediction,
            input_used: features.to_json_map(),
        })
    }
}
