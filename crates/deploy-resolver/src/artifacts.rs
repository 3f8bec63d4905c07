//! Lookup of compiled contract blueprints in a Hardhat build output directory.

use {
    crate::blueprint::Blueprint,
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    anyhow::{Context, Result, anyhow, ensure},
    serde::Deserialize,
    std::path::{Path, PathBuf},
    tokio::fs,
    walkdir::WalkDir,
};

/// Resolves contract blueprints by contract name.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Blueprint>;
}

/// Artifacts as written by `hardhat compile`: one JSON file per contract at
/// `<root>/contracts/<Source>.sol/<Name>.json`, next to a `<Name>.dbg.json`.
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    contract_name: String,
    abi: JsonAbi,
    bytecode: Bytes,
}

impl HardhatArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn load(&self, name: &str) -> Result<(PathBuf, Artifact)> {
        let canonical = self
            .root
            .join("contracts")
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"));
        if fs::metadata(&canonical)
            .await
            .is_ok_and(|metadata| metadata.is_file())
        {
            let artifact = read(&canonical).await?;
            return Ok((canonical, artifact));
        }

        // Contracts declared in a file named differently than the contract.
        let root = self.root.clone();
        let file_name = format!("{name}.json");
        let candidates = tokio::task::spawn_blocking(move || search(&root, &file_name))
            .await
            .context("artifact search did not finish")??;
        for path in candidates {
            match read(&path).await {
                Ok(artifact) if artifact.contract_name == name => return Ok((path, artifact)),
                Ok(_) => continue,
                Err(err) => tracing::debug!(path = %path.display(), ?err, "skipping artifact"),
            }
        }
        Err(anyhow!("artifact not found: {name} in {}", self.root.display()))
    }
}

#[async_trait::async_trait]
impl ArtifactStore for HardhatArtifacts {
    async fn resolve(&self, name: &str) -> Result<Blueprint> {
        let (path, artifact) = self.load(name).await?;
        tracing::debug!(path = %path.display(), "loaded artifact");
        ensure!(
            artifact.contract_name == name,
            "artifact {} belongs to {}, not {name}",
            path.display(),
            artifact.contract_name,
        );
        ensure!(
            !artifact.bytecode.is_empty(),
            "artifact has no bytecode: {name} is abstract or an interface"
        );

        Ok(Blueprint {
            name: artifact.contract_name,
            abi: artifact.abi,
            bytecode: artifact.bytecode,
        })
    }
}

async fn read(path: &Path) -> Result<Artifact> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

/// All files below `root` called `file_name`, sorted by path. Blocks on
/// directory reads.
fn search(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
