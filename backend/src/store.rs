//! SQLite persistence for mapping templates.
//!
//! A connection is opened per operation; the document source and the mapping
//! list are stored as JSON text.

use crate::error::{AppError, Result};
use common::model::template::{MappingTemplate, TemplateSummary};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Creates the schema if it does not exist yet.
    pub fn init(&self) -> Result<()> {
        self.open()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS templates (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                source         TEXT NOT NULL,
                mappings       TEXT NOT NULL,
                datasource_md5 TEXT
            );",
        )?;
        Ok(())
    }

    /// Inserts or updates a template and returns its id. Templates without an
    /// id get a fresh one; a supplied id must be a UUID since it names files
    /// under the data directory. The data source link is kept on update.
    pub fn save_template(&self, template: &MappingTemplate) -> Result<String> {
        if template.name.trim().is_empty() {
            return Err(AppError::BadRequest("template name must not be empty".into()));
        }
        let id = match template.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Uuid::parse_str(id)
                .map_err(|_| AppError::BadRequest(format!("invalid template id {:?}", id)))?
                .to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let source = to_json(&template.source)?;
        let mappings = to_json(&template.mappings)?;

        self.open()?.execute(
            "INSERT INTO templates (id, name, source, mappings) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                source = excluded.source,
                mappings = excluded.mappings",
            params![id, template.name, source, mappings],
        )?;
        Ok(id)
    }

    pub fn get_template(&self, id: &str) -> Result<MappingTemplate> {
        let row = self
            .open()?
            .query_row(
                "SELECT id, name, source, mappings, datasource_md5 FROM templates WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;
        let (id, name, source, mappings, datasource_md5) =
            row.ok_or_else(|| AppError::NotFound(format!("template {}", id)))?;

        Ok(MappingTemplate {
            id: Some(id),
            name,
            source: from_json(&source)?,
            mappings: from_json(&mappings)?,
            datasource_md5,
        })
    }

    pub fn list_templates(&self) -> Result<Vec<TemplateSummary>> {
        let conn = self.open()?;
        let mut stmt =
            conn.prepare("SELECT id, name, mappings, datasource_md5 FROM templates ORDER BY name, id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, name, mappings, md5)| {
                let mappings: Vec<serde_json::Value> = from_json(&mappings)?;
                Ok(TemplateSummary {
                    id,
                    name,
                    mapping_count: mappings.len(),
                    has_datasource: md5.is_some(),
                })
            })
            .collect()
    }

    /// Deletes a template. Returns `false` when there was nothing to delete.
    pub fn delete_template(&self, id: &str) -> Result<bool> {
        let deleted = self
            .open()?
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// The MD5 of the template's current data source, `NotFound` when the
    /// template does not exist.
    pub fn datasource_md5(&self, template_id: &str) -> Result<Option<String>> {
        self.open()?
            .query_row(
                "SELECT datasource_md5 FROM templates WHERE id = ?1",
                params![template_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("template {}", template_id)))
    }

    pub fn set_datasource_md5(&self, template_id: &str, md5: &str) -> Result<()> {
        self.open()?.execute(
            "UPDATE templates SET datasource_md5 = ?1 WHERE id = ?2",
            params![md5, template_id],
        )?;
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::Internal(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| AppError::Internal(format!("corrupt template row: {}", e)))
}
