//! Boss Entity
//!
//! A trackable encounter. Owns exactly one death counter and one timer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

pub type BossId = i64;

/// Row of the `bosses` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: BossId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Boss {
    type Id = BossId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Insert payload for the add-boss dialog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoss {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewBoss {
    /// Validate raw dialog input. The name must be non-empty after trimming;
    /// a blank description is dropped.
    pub fn new(name: &str, description: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("boss name is required".to_string()));
        }
        let description = description.trim();
        Ok(Self {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_boss_trims_input() {
        let boss = NewBoss::new("  Malenia ", "  Blade of Miquella ").unwrap();
        assert_eq!(boss.name, "Malenia");
        assert_eq!(boss.description.as_deref(), Some("Blade of Miquella"));
    }

    #[test]
    fn test_new_boss_rejects_blank_name() {
        assert!(matches!(NewBoss::new("   ", "desc"), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_description_is_omitted() {
        let boss = NewBoss::new("Godrick", "  ").unwrap();
        assert_eq!(boss.description, None);
        let json = serde_json::to_value(&boss).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Godrick" }));
    }

    #[test]
    fn test_boss_row_deserializes_supabase_shape() {
        let row: Boss = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Radahn",
            "description": null,
            "created_at": "2025-02-01T10:20:30.123456+00:00"
        }))
        .unwrap();
        assert_eq!(row.id(), 7);
        assert_eq!(row.image_url, None);
    }
}
