//! Persisted models and the store they live in.

mod store;
mod tag;

pub use store::{FsModelStore, ModelStore};
pub use tag::{ModelTag, VERSION_LEN, Version};

use std::time::{SystemTime, UNIX_EPOCH};

use schema::{TARGET, fields};
use serde::{Deserialize, Serialize};

use crate::{error::StoreErr, pipeline::FittedPipeline, training::EvalReport};

/// Name every trained energy model is stored under.
pub const MODEL_NAME: &str = "energy_consumption_model";

/// Bumped whenever the serialized layout changes.
pub const ARTIFACT_FORMAT: u32 = 1;

/// Everything about a stored model except the model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub name: String,
    pub version: String,
    pub format: u32,
    pub created_at_ms: u64,
    pub target: String,
    /// Column order the pipeline expects. Artifacts without it follow the
    /// catalog order.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub evaluation: Option<EvalReport>,
}

/// A fitted pipeline together with its metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub meta: ArtifactMeta,
    pub pipeline: FittedPipeline,
}

impl ModelArtifact {
    /// Wraps a freshly trained pipeline.
    pub fn new(
        name: &str,
        version: String,
        pipeline: FittedPipeline,
        evaluation: Option<EvalReport>,
    ) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            meta: ArtifactMeta {
                name: name.to_string(),
                version,
                format: ARTIFACT_FORMAT,
                created_at_ms,
                target: TARGET.to_string(),
                feature_names: Some(pipeline.feature_names().to_vec()),
                evaluation,
            },
            pipeline,
        }
    }

    pub fn tag(&self) -> ModelTag {
        ModelTag {
            name: self.meta.name.clone(),
            version: Version::Pinned(self.meta.version.clone()),
        }
    }

    /// The column order requests are projected onto.
    pub fn feature_order(&self) -> Vec<String> {
        match &self.meta.feature_names {
            Some(names) => names.clone(),
            None => fields::wire_names().map(str::to_string).collect(),
        }
    }

    /// Checks that the recorded order matches the pipeline and only names
    /// catalog fields.
    pub fn check_features(&self) -> Result<(), StoreErr> {
        let order = self.feature_order();

        if let Some(unknown) = order.iter().find(|n| fields::by_wire(n).is_none()) {
            return Err(StoreErr::Corrupt(format!(
                "feature {unknown:?} is not a known building field"
            )));
        }
        if order.as_slice() != self.pipeline.feature_names() {
            return Err(StoreErr::Corrupt(format!(
                "recorded feature order {order:?} differs from the fitted order {:?}",
                self.pipeline.feature_names()
            )));
        }
        Ok(())
    }
}
