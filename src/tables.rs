use crate::error::{GridError, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name given to tables saved without a `name` field.
pub const DEFAULT_TABLE_NAME: &str = "Таблица";

/// Wire form of a table: its name and non-empty cells keyed as `"{row}_{col}"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTable {
    pub id: u64,
    pub name: String,
    pub data: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Store-wide write counter, used to order listings.
    #[serde(skip)]
    revision: u64,
}

impl StoredTable {
    pub fn payload(&self) -> TablePayload {
        TablePayload {
            name: Some(self.name.clone()),
            data: self.data.clone(),
        }
    }
}

/// In-memory table storage, standing in for the remote tables endpoint.
#[derive(Debug, Default)]
pub struct TableStore {
    tables: HashMap<u64, StoredTable>,
    next_id: u64,
    revision: u64,
}

fn name_or_default(name: Option<String>) -> String {
    name.unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string())
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new table. A missing name becomes [`DEFAULT_TABLE_NAME`]; a
    /// given one is trimmed and kept even when blank.
    pub fn create(&mut self, payload: TablePayload) -> StoredTable {
        self.next_id += 1;
        self.revision += 1;
        let now = Utc::now();
        let table = StoredTable {
            id: self.next_id,
            name: name_or_default(payload.name).trim().to_string(),
            data: payload.data,
            created_at: now,
            updated_at: now,
            revision: self.revision,
        };
        info!(
            "stored table {} {:?} with {} cells",
            table.id,
            table.name,
            table.data.len()
        );
        self.tables.insert(table.id, table.clone());
        table
    }

    /// Replace a table's name and data. The name is stored as given.
    pub fn update(&mut self, id: u64, payload: TablePayload) -> Result<StoredTable> {
        let table = self
            .tables
            .get_mut(&id)
            .ok_or(GridError::TableNotFound(id))?;
        table.name = name_or_default(payload.name);
        table.data = payload.data;
        table.updated_at = Utc::now();
        self.revision += 1;
        table.revision = self.revision;
        info!("updated table {} with {} cells", id, table.data.len());
        Ok(table.clone())
    }

    pub fn get(&self, id: u64) -> Result<&StoredTable> {
        self.tables.get(&id).ok_or(GridError::TableNotFound(id))
    }

    /// All tables, most recently updated first.
    pub fn list(&self) -> Vec<&StoredTable> {
        let mut tables: Vec<&StoredTable> = self.tables.values().collect();
        tables.sort_by(|a, b| b.revision.cmp(&a.revision));
        tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
