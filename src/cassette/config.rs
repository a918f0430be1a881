//! Loading cassettes from disk.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    tracing::debug!(
        name = %cassette.name,
        interactions = cassette.interactions.len(),
        "cassette loaded"
    );
    Ok(CassetteReplayer::new(&cassette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_valid_cassette() {
        let dir = std::env::temp_dir().join("giftgen_cassette_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quota.cassette.yaml");
        std::fs::write(
            &path,
            r#"name: quota
recorded_at: "2026-01-05T10:00:00Z"
commit: abc
interactions:
  - seq: 0
    port: image_generator
    method: generate
    input: {}
    output:
      Err: QuotaExceeded
"#,
        )
        .unwrap();

        let mut replayer = load_cassette(&path).unwrap();
        let interaction = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(interaction.seq, 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }

    #[test]
    fn load_garbage_fails() {
        let dir = std::env::temp_dir().join("giftgen_cassette_garbage_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: [[[").unwrap();

        assert!(load_cassette(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
