//! Query results.

use crate::model::{CellValue, Row};
use crate::notify::{ChangeFlag, ChangeNotifier, ObserverId};
use crate::uri::ResourceUri;
use std::sync::{Arc, Weak};

/// Rows returned by a query, tagged with the address they were read from.
///
/// While a cursor is alive it stays registered with the store's notifier,
/// so [`Cursor::has_changed`] turns true once anything under its address is
/// written. Dropping the cursor removes the registration.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: Vec<Row>,
    notification_uri: ResourceUri,
    changed: Arc<ChangeFlag>,
    registration: Option<(Weak<ChangeNotifier>, ObserverId)>,
}

impl Cursor {
    pub(crate) fn new(
        columns: Arc<[String]>,
        rows: Vec<Vec<CellValue>>,
        notification_uri: ResourceUri,
        changed: Arc<ChangeFlag>,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();
        Self {
            columns,
            rows,
            notification_uri,
            changed,
            registration: None,
        }
    }

    pub(crate) fn registered_with(mut self, notifier: &Arc<ChangeNotifier>, id: ObserverId) -> Self {
        self.registration = Some((Arc::downgrade(notifier), id));
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn notification_uri(&self) -> &ResourceUri {
        &self.notification_uri
    }

    /// True once a change was reported under this cursor's address.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.changed.is_set()
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        if let Some((notifier, id)) = self.registration.take()
            && let Some(notifier) = notifier.upgrade()
        {
            notifier.unregister(id);
        }
    }
}

impl<'a> IntoIterator for &'a Cursor {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
