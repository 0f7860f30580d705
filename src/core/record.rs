//! Log record
//!
//! A [`Record`] describes one logging event. It is built on the caller's stack right
//! before dispatch and never outlives the logging call: it borrows its message,
//! formatted text and attributes instead of owning them, so constructing one never
//! touches the heap.

use super::attribute::{self, AttributePack, Value};
use chrono::{DateTime, Utc};
use std::thread::{self, ThreadId};

/// Bytes reserved for a record's metadata block.
pub const RECORD_STORAGE_SIZE: usize = 128;

const _: () = assert!(
    std::mem::size_of::<Record<'static>>() <= RECORD_STORAGE_SIZE,
    "padding or alignment violation"
);

thread_local! {
    static THREAD_ID: ThreadId = thread::current().id();
}

fn current_thread_id() -> ThreadId {
    THREAD_ID.with(|id| *id)
}

#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    severity: i32,
    timestamp: DateTime<Utc>,
    message: &'a str,
    formatted: &'a str,
    pid: u32,
    tid: ThreadId,
    attributes: &'a AttributePack<'a>,
}

impl<'a> Record<'a> {
    /// Creates a record stamped with the current time, process and thread.
    pub fn new(
        severity: impl Into<i32>,
        message: &'a str,
        attributes: &'a AttributePack<'a>,
    ) -> Self {
        Self {
            severity: severity.into(),
            timestamp: Utc::now(),
            message,
            formatted: "",
            pid: std::process::id(),
            tid: current_thread_id(),
            attributes,
        }
    }

    /// Binds the formatted text produced for this record.
    pub fn activate(&mut self, formatted: &'a str) {
        self.formatted = formatted;
    }

    #[inline]
    pub fn severity(&self) -> i32 {
        self.severity
    }

    #[inline]
    pub fn message(&self) -> &'a str {
        self.message
    }

    /// Formatted text bound by [`activate`](Self::activate), empty until then.
    #[inline]
    pub fn formatted(&self) -> &'a str {
        self.formatted
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    #[inline]
    pub fn tid(&self) -> ThreadId {
        self.tid
    }

    #[inline]
    pub fn attributes(&self) -> &'a AttributePack<'a> {
        self.attributes
    }

    /// Looks an attribute up across the pack, first list wins.
    pub fn attribute(&self, name: &str) -> Option<&'a Value<'a>> {
        attribute::lookup(self.attributes, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::{AttributeList, EMPTY_PACK};
    use crate::core::LogLevel;

    #[test]
    fn test_accessors() {
        let list: &AttributeList = &[("user", Value::Str("alice"))];
        let pack: &AttributePack = &[list];
        let record = Record::new(LogLevel::Warn, "disk almost full", pack);

        assert_eq!(record.severity(), 3);
        assert_eq!(record.message(), "disk almost full");
        assert_eq!(record.formatted(), "");
        assert_eq!(record.pid(), std::process::id());
        assert_eq!(record.tid(), thread::current().id());
        assert_eq!(record.attributes().len(), 1);
        assert_eq!(record.attribute("user"), Some(&Value::Str("alice")));
        assert_eq!(record.attribute("host"), None);
    }

    #[test]
    fn test_activate_binds_formatted_text() {
        let formatted = String::from("[WARN] disk almost full\n");
        let mut record = Record::new(-7, "disk almost full", EMPTY_PACK);
        record.activate(&formatted);

        assert_eq!(record.severity(), -7);
        assert_eq!(record.formatted(), "[WARN] disk almost full\n");
    }

    #[test]
    fn test_thread_id_per_thread() {
        let here = Record::new(0, "a", EMPTY_PACK).tid();
        let there = thread::spawn(|| Record::new(0, "b", EMPTY_PACK).tid())
            .join()
            .unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn test_storage_fits() {
        assert!(std::mem::size_of::<Record<'_>>() <= RECORD_STORAGE_SIZE);
    }
}
