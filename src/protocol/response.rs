use crate::Record;

/// Outcome of one protocol exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Status from the `fixed16` header. Commands get no reply and leave it at `0`.
    pub status: u16,
    /// Server error text, only set when `status >= 400`.
    pub message: Option<String>,
    /// Rows in the order the server sent them.
    pub records: Vec<Record>,
}

impl Response {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}
