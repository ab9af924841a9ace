//! Completion metadata from a live PostgreSQL connection.

use async_trait::async_trait;
use quill_core::{MetadataError, MetadataProvider};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_postgres::{Client, SimpleQueryMessage, SimpleQueryRow};

// Function categories as the PostgreSQL JDBC driver reports them.
const STRING_FUNCTIONS: &str =
    "ascii,char,concat,lcase,left,length,ltrim,repeat,rtrim,space,substring,ucase,replace";
const NUMERIC_FUNCTIONS: &str = "abs,acos,asin,atan,atan2,ceiling,cos,cot,degrees,exp,floor,\
     log,log10,mod,pi,power,radians,round,sign,sin,sqrt,tan,truncate";
const SYSTEM_FUNCTIONS: &str = "database,ifnull,user";
const TIME_DATE_FUNCTIONS: &str = "curdate,curtime,dayname,dayofmonth,dayofweek,dayofyear,\
     hour,minute,month,monthname,now,quarter,second,week,year,timestampadd";

const KEYWORDS_SQL: &str =
    "SELECT string_agg(upper(word), ',' ORDER BY word) FROM pg_get_keywords()";

const COLUMNS_SQL: &str = "SELECT table_name, column_name \
     FROM information_schema.columns \
     WHERE table_schema NOT IN ('pg_catalog', 'information_schema') \
     ORDER BY table_name, ordinal_position";

pub struct PgMetadata {
    client: Arc<Client>,
}

impl PgMetadata {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    async fn rows(&self, sql: &str) -> Result<Vec<SimpleQueryRow>, MetadataError> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| MetadataError::Query(e.to_string()))?;
        Ok(messages
            .into_iter()
            .filter_map(|m| match m {
                SimpleQueryMessage::Row(r) => Some(r),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl MetadataProvider for PgMetadata {
    async fn sql_keywords(&self) -> Result<String, MetadataError> {
        let rows = self.rows(KEYWORDS_SQL).await?;
        Ok(rows
            .first()
            .and_then(|r| r.get(0))
            .unwrap_or_default()
            .to_string())
    }

    async fn string_functions(&self) -> Result<String, MetadataError> {
        Ok(STRING_FUNCTIONS.to_string())
    }

    async fn numeric_functions(&self) -> Result<String, MetadataError> {
        Ok(NUMERIC_FUNCTIONS.to_string())
    }

    async fn system_functions(&self) -> Result<String, MetadataError> {
        Ok(SYSTEM_FUNCTIONS.to_string())
    }

    async fn time_date_functions(&self) -> Result<String, MetadataError> {
        Ok(TIME_DATE_FUNCTIONS.to_string())
    }

    async fn table_columns(&self) -> Result<BTreeMap<String, Vec<String>>, MetadataError> {
        let mut tables: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in self.rows(COLUMNS_SQL).await? {
            if let (Some(table), Some(column)) = (row.get(0), row.get(1)) {
                tables
                    .entry(table.to_string())
                    .or_default()
                    .push(column.to_string());
            }
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_lists_have_no_blank_terms() {
        for list in [
            STRING_FUNCTIONS,
            NUMERIC_FUNCTIONS,
            SYSTEM_FUNCTIONS,
            TIME_DATE_FUNCTIONS,
        ] {
            assert!(list.split(',').all(|t| !t.trim().is_empty()), "{list}");
            assert!(!list.contains(' '), "{list}");
        }
    }

    #[test]
    fn test_numeric_list_continuation() {
        assert!(NUMERIC_FUNCTIONS.contains("floor,log,log10"));
        assert!(TIME_DATE_FUNCTIONS.contains("dayofyear,hour"));
    }
}
