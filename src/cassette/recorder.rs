//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, Interaction};

/// Collects interactions in memory and writes them as one YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    target: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Start an empty recording that [`finish`](Self::finish) writes to `target`.
    pub fn new(
        target: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        let cassette = Cassette {
            name: name.into(),
            recorded_at: Utc::now(),
            commit: commit.into(),
            interactions: Vec::new(),
        };
        Self { target: target.into(), cassette }
    }

    /// Append one call; its `seq` is the number of calls recorded before it.
    pub fn record(&mut self, port: &str, method: &str, input: Value, output: Value) {
        let seq = self.cassette.interactions.len() as u64;
        self.cassette.interactions.push(Interaction {
            seq,
            port: port.to_owned(),
            method: method.to_owned(),
            input,
            output,
        });
    }

    /// Stamp the finish time and write the cassette, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn finish(mut self) -> std::io::Result<PathBuf> {
        self.cassette.recorded_at = Utc::now();
        let yaml = serde_yaml::to_string(&self.cassette).map_err(std::io::Error::other)?;
        if let Some(dir) = self.target.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.target, yaml)?;
        tracing::debug!(
            path = %self.target.display(),
            interactions = self.cassette.interactions.len(),
            "cassette written"
        );
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_then_refinement_are_sequenced() {
        let dir = std::env::temp_dir().join("giftgen_recorder_test");
        let path = dir.join("nested").join("session.cassette.yaml");
        let _ = std::fs::remove_dir_all(&dir);

        let mut recorder = CassetteRecorder::new(&path, "banner-session", "deadbeef");
        recorder.record(
            "image_generator",
            "generate",
            json!({"instruction": "gift banner", "images": 2}),
            json!({"Ok": {"data": "AAAA", "mime_type": "image/png"}}),
        );
        recorder.record(
            "image_generator",
            "generate",
            json!({"instruction": "gift banner, brighter", "images": 3}),
            json!({"Err": "QuotaExceeded"}),
        );

        let written = recorder.finish().expect("finish should succeed");
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.name, "banner-session");
        assert_eq!(cassette.commit, "deadbeef");
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[1].seq, 1);
        assert_eq!(cassette.interactions[1].output["Err"], "QuotaExceeded");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
