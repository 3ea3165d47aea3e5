//! Documents fetched from a PostgreSQL database.

use postgres::types::FromSql;
use postgres::{Client, NoTls, Row};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DocumentSource, RawJson, RawXml};
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// Fetches documents by identifier with one query per format.
///
/// Each query takes the identifier as its single text parameter (`$1`) and
/// returns the document in its first column. JSON columns may be `json` or
/// `jsonb` (decoded by the driver) or plain text.
pub struct DatabaseSource {
    client: Client,
    xml_query: String,
    json_query: String,
}

impl DatabaseSource {
    /// Connects using the configured connection string and queries.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let client =
            Client::connect(&config.url, NoTls).map_err(|e| Error::Connection(e.to_string()))?;
        info!("Successfully connected to the database");
        Ok(DatabaseSource {
            client,
            xml_query: config.xml_query.clone(),
            json_query: config.json_query.clone(),
        })
    }

    fn fetch_row(&mut self, query: &str, id: &str) -> Result<Option<Row>> {
        debug!("Fetching document '{}'", id);
        let rows = self.client.query(query, &[&id]).map_err(|e| {
            if e.is_closed() {
                Error::Connection(e.to_string())
            } else {
                Error::Query(format!("ID '{}': {}", id, e))
            }
        })?;
        Ok(first_row(rows, id))
    }
}

/// Takes the first row of a result; more than one row is logged.
fn first_row<T>(rows: Vec<T>, id: &str) -> Option<T> {
    if rows.len() > 1 {
        warn!("{} rows found for ID '{}', using the first", rows.len(), id);
    }
    rows.into_iter().next()
}

/// Reads the first column, treating SQL NULL as absent.
fn first_column<'a, T: FromSql<'a>>(row: &'a Row) -> Result<Option<T>> {
    row.try_get::<_, Option<T>>(0)
        .map_err(|e| Error::Configuration(format!("unexpected document column: {}", e)))
}

impl DocumentSource for DatabaseSource {
    fn fetch_xml(&mut self, id: &str) -> Result<RawXml> {
        let query = self.xml_query.clone();
        let row = self.fetch_row(&query, id)?;
        let text = match row.as_ref() {
            Some(row) => first_column::<String>(row)?,
            None => None,
        };
        match text {
            Some(text) if !text.trim().is_empty() => Ok(RawXml::Text(text)),
            _ => Err(Error::MissingDocument(format!("XML for ID '{}'", id))),
        }
    }

    fn fetch_raw_json(&mut self, id: &str) -> Result<RawJson> {
        let query = self.json_query.clone();
        let row = self
            .fetch_row(&query, id)?
            .ok_or_else(|| Error::MissingDocument(format!("JSON for ID '{}'", id)))?;

        // json/jsonb columns decode directly; anything else is read as text
        let raw = match row.try_get::<_, Option<Value>>(0) {
            Ok(value) => value.map(RawJson::Decoded),
            Err(_) => first_column::<String>(&row)?
                .filter(|text| !text.trim().is_empty())
                .map(RawJson::Text),
        };
        raw.ok_or_else(|| Error::MissingDocument(format!("JSON for ID '{}'", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rows_use_the_first() {
        assert_eq!(first_row(vec!["a", "b"], "X"), Some("a"));
        assert_eq!(first_row(Vec::<&str>::new(), "X"), None);
    }
}
