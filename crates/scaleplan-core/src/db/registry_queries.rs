//! Metric and scaling component registry queries.

use jiff::Timestamp;
use rusqlite::params;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{ComponentMeta, MetricMeta},
};

const UPSERT_METRIC_SQL: &str = "INSERT INTO metrics (id, collector_kind, created_at) VALUES (?1, ?2, ?3) ON CONFLICT(id) DO UPDATE SET collector_kind = excluded.collector_kind";
const SELECT_METRICS_SQL: &str = "SELECT id, collector_kind FROM metrics ORDER BY id";
const UPSERT_COMPONENT_SQL: &str = "INSERT INTO scaling_components (id, component_kind, created_at) VALUES (?1, ?2, ?3) ON CONFLICT(id) DO UPDATE SET component_kind = excluded.component_kind";
const SELECT_COMPONENTS_SQL: &str = "SELECT id, component_kind FROM scaling_components ORDER BY id";

impl super::Database {
    /// Registers a metric, replacing the collector kind of an existing one.
    pub fn upsert_metric(&self, metric: &MetricMeta) -> Result<()> {
        self.connection
            .execute(
                UPSERT_METRIC_SQL,
                params![&metric.id, &metric.collector_kind, Timestamp::now().to_string()],
            )
            .db_context("Failed to register metric")?;
        Ok(())
    }

    pub fn list_metrics(&self) -> Result<Vec<MetricMeta>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_METRICS_SQL)
            .db_context("Failed to prepare query")?;

        let metrics = stmt
            .query_map([], |row| {
                Ok(MetricMeta {
                    id: row.get(0)?,
                    collector_kind: row.get(1)?,
                })
            })
            .db_context("Failed to query metrics")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read metric row")?;
        Ok(metrics)
    }

    /// Registers a scaling component, replacing the kind of an existing one.
    pub fn upsert_component(&self, component: &ComponentMeta) -> Result<()> {
        self.connection
            .execute(
                UPSERT_COMPONENT_SQL,
                params![
                    &component.id,
                    &component.component_kind,
                    Timestamp::now().to_string()
                ],
            )
            .db_context("Failed to register scaling component")?;
        Ok(())
    }

    pub fn list_components(&self) -> Result<Vec<ComponentMeta>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_COMPONENTS_SQL)
            .db_context("Failed to prepare query")?;

        let components = stmt
            .query_map([], |row| {
                Ok(ComponentMeta {
                    id: row.get(0)?,
                    component_kind: row.get(1)?,
                })
            })
            .db_context("Failed to query scaling components")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read scaling component row")?;
        Ok(components)
    }
}
