use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use super::{ARTIFACT_FORMAT, ModelArtifact, ModelTag, Version};
use crate::error::StoreErr;

const MODEL_FILE: &str = "model.json";
const LATEST_FILE: &str = "latest";

/// Saves and loads model artifacts by tag.
pub trait ModelStore {
    /// Stores `artifact` under its own name and version and makes it the
    /// latest version of its name.
    fn save(&self, artifact: &ModelArtifact) -> Result<ModelTag, StoreErr> {
        let tag = ModelTag::pinned(&artifact.meta.name, &artifact.meta.version)?;
        let model_dir = self.model_dir(&tag.name);
        let version_dir = model_dir.join(&artifact.meta.version);

        if version_dir.exists() {
            return Err(StoreErr::VersionExists(tag.to_string()));
        }

        // versions never start with a dot, so the staging dir cannot clash with one
        let staging = model_dir.join(format!(".{}.tmp", artifact.meta.version));
        let staged = write_artifact(&staging, artifact)
            .and_then(|()| fs::rename(&staging, &version_dir).map_err(io_err(&version_dir)));
        if let Err(e) = staged {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                warn!("cannot remove {}: {cleanup}", staging.display());
            }
            return Err(e);
        }
        let path = version_dir.join(MODEL_FILE);

        // written aside then renamed so readers never see a partial id
        let latest = self.model_dir(&tag.name).join(LATEST_FILE);
        let tmp = latest.with_extension("tmp");
        fs::write(&tmp, &artifact.meta.version).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &latest).map_err(io_err(&latest))?;

        info!("saved model {tag} to {}", path.display());
        Ok(tag)
    }

    fn resolve(&self, tag: &ModelTag) -> Result<String, StoreErr> {
        match &tag.version {
            Version::Pinned(v) => Ok(v.clone()),
            Version::Latest => {
                let latest = self.model_dir(&tag.name).join(LATEST_FILE);
                if !latest.exists() {
                    return Err(StoreErr::NotFound(tag.to_string()));
                }

                let version = fs::read_to_string(&latest).map_err(io_err(&latest))?;
                let version = version.trim();
                ModelTag::pinned(&tag.name, version)
                    .map_err(|e| StoreErr::Corrupt(format!("{}: {e}", latest.display())))?;

                debug!("{tag} resolved to version {version}");
                Ok(version.to_string())
            }
        }
    }

    fn load(&self, tag: &ModelTag) -> Result<ModelArtifact, StoreErr> {
        let version = self.resolve(tag)?;
        let path = self.artifact_path(&tag.name, &version);
        if !path.exists() {
            return Err(StoreErr::NotFound(format!("{}:{version}", tag.name)));
        }

        let file = File::open(&path).map_err(io_err(&path))?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreErr::Json {
                path: path.clone(),
                source,
            })?;

        let meta = &artifact.meta;
        if meta.format != ARTIFACT_FORMAT {
            return Err(StoreErr::IncompatibleFormat {
                found: meta.format,
                expected: ARTIFACT_FORMAT,
            });
        }
        if meta.name != tag.name || meta.version != version {
            return Err(StoreErr::Corrupt(format!(
                "{} holds {}:{}",
                path.display(),
                meta.name,
                meta.version
            )));
        }
        artifact.check_features()?;

        info!("loaded model {}:{version} from {}", tag.name, path.display());
        Ok(artifact)
    }
}

fn write_artifact(dir: &Path, artifact: &ModelArtifact) -> Result<(), StoreErr> {
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let path = dir.join(MODEL_FILE);
    let file = File::create(&path).map_err(io_err(&path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, artifact).map_err(|source| StoreErr::Json {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(io_err(&path))
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreErr + '_ {
    move |source| StoreErr::Io {
        path: path.to_path_buf(),
        source,
    }
}
