//! Livestatus `GET` query builder.
//!
//! A [`Query`] accumulates protocol header lines against a table. Header order is
//! significant to the server (`And`/`Or` combine the most recent filters, `Negate`
//! applies to the last one), so headers are only ever appended.
//!
//! Every rendered query ends with `ResponseHeader: fixed16` and `OutputFormat: json`;
//! the response codec depends on both.
//!
//! # Example
//! ```rust
//! use livestatus::Query;
//!
//! let query = Query::new("hosts")
//!     .columns(["name", "state"])
//!     .filter("state = 1")
//!     .limit(10);
//!
//! assert_eq!(
//!     query.to_string(),
//!     "GET hosts\nColumns: name state\nFilter: state = 1\nLimit: 10\n\
//!      ResponseHeader: fixed16\nOutputFormat: json\n\n"
//! );
//! ```
use std::{fmt, time::Duration};

/// A read query against a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    headers: Vec<String>,
    columns: Vec<String>,
    keep_alive: bool,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            headers: Vec::new(),
            columns: Vec::new(),
            keep_alive: false,
        }
    }

    /// Sets the columns to retrieve. Decoded records are keyed by these names.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = names.into_iter().map(Into::into).collect();
        self.headers.push(format!("Columns: {}", self.columns.join(" ")));
        self
    }

    /// Adds a filter rule. The rule is passed through verbatim.
    pub fn filter(self, rule: &str) -> Self {
        self.header("Filter", rule)
    }

    /// Combines the `n` most recent filters with a logical and.
    pub fn and(self, n: usize) -> Self {
        self.header("And", n)
    }

    /// Combines the `n` most recent filters with a logical or.
    pub fn or(self, n: usize) -> Self {
        self.header("Or", n)
    }

    /// Negates the most recent filter.
    pub fn negate(mut self) -> Self {
        self.headers.push("Negate:".to_string());
        self
    }

    pub fn limit(self, n: usize) -> Self {
        self.header("Limit", n)
    }

    /// Names the object to wait on. For `services` this is the host name, a space,
    /// then the service description.
    pub fn wait_object(self, name: &str) -> Self {
        self.header("WaitObject", name)
    }

    pub fn wait_condition(self, rule: &str) -> Self {
        self.header("WaitCondition", rule)
    }

    pub fn wait_condition_and(self, n: usize) -> Self {
        self.header("WaitConditionAnd", n)
    }

    pub fn wait_condition_or(self, n: usize) -> Self {
        self.header("WaitConditionOr", n)
    }

    pub fn wait_condition_negate(mut self) -> Self {
        self.headers.push("WaitConditionNegate:".to_string());
        self
    }

    /// Sets the monitoring event that triggers a re-check of the wait condition.
    pub fn wait_trigger(self, event: &str) -> Self {
        self.header("WaitTrigger", event)
    }

    /// Rendered in whole milliseconds.
    pub fn wait_timeout(self, timeout: Duration) -> Self {
        self.header("WaitTimeout", timeout.as_millis())
    }

    /// Asks the server to keep the connection open after the response.
    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self.headers.push("KeepAlive: on".to_string());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns set by the last `columns` call, empty if none.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }

    fn header(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.headers.push(format!("{name}: {value}"));
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.table)?;
        for header in &self.headers {
            write!(f, "\n{header}")?;
        }
        write!(f, "\nResponseHeader: fixed16\nOutputFormat: json\n\n")
    }
}
