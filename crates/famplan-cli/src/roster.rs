use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use famplan_data::Identity;

/// Load a guild roster: a JSON list of
/// `{"user_id": .., "display_name": ..}` objects.
pub fn load(path: &Path) -> Result<Vec<Identity>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading roster {}", path.display()))?;
    let roster: Vec<Identity> = serde_json::from_str(&data)
        .with_context(|| format!("parsing roster {}", path.display()))?;
    tracing::debug!(members = roster.len(), "loaded roster");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_roster() {
        let path = std::env::temp_dir().join(format!("famplan_roster_{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"user_id": 1, "display_name": "Eris"}, {"user_id": 2, "display_name": "Discordia"}]"#,
        )
        .unwrap();
        let roster = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(
            roster,
            vec![Identity::new(1, "Eris"), Identity::new(2, "Discordia")]
        );
    }

    #[test]
    fn test_load_missing_roster() {
        assert!(load(Path::new("/nonexistent/roster.json")).is_err());
    }
}
