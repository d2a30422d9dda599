//! Minimal PostgREST query builder.
//!
//! Only what the portfolio needs: column selection, equality filters, a
//! descending order and a row limit.

use reqwest::Url;
use store::RemoteError;

pub const PROJECTS: &str = "projects";
pub const EXPERIENCES: &str = "experiences";
pub const PROFILES: &str = "profiles";

/// A query against one table, rendered as `/rest/v1/<table>?<params>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl TableQuery {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), format!("{column}.desc")));
        self
    }

    pub fn limit(mut self, rows: usize) -> Self {
        self.params.push(("limit".to_string(), rows.to_string()));
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Absolute URL of this query under `base`.
    pub fn url(&self, base: &str) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&format!("{base}/rest/v1/{}", self.table))
            .map_err(|e| RemoteError::Http(e.to_string()))?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://abc.supabase.co";

    #[test]
    fn test_list_query() {
        let url = TableQuery::from(PROJECTS)
            .select("*")
            .order_desc("created_at")
            .url(BASE)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/rest/v1/projects?select=*&order=created_at.desc"
        );
    }

    #[test]
    fn test_eq_filter_is_encoded() {
        let url = TableQuery::from(PROFILES)
            .select("*")
            .eq("id", "a b&c")
            .limit(1)
            .url(BASE)
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.a b&c".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_table_url() {
        let url = TableQuery::from(EXPERIENCES).url(BASE).unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/experiences");
        assert_eq!(url.query(), None);
    }
}
