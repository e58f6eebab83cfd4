//! `SQLite` storage implementation.

use crate::backup::BackupSignal;
use crate::error::{DayFlagError, Result};
use crate::model::{CellValue, COLUMNS, DayFlag, DayFlagValues, Namespace};
use crate::notify::{ChangeFlag, ChangeNotifier, ChangeObserver};
use crate::storage::cursor::Cursor;
use crate::storage::schema::{apply_pragmas, apply_schema};
use crate::uri::{DEFAULT_AUTHORITY, ResourceUri, Target};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, trace};

/// Tunables for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Authority used in every address the store hands out.
    pub authority: String,
    pub busy_timeout_ms: u64,
    /// Extra read-only-use connections for file-backed stores.
    pub read_pool_size: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            busy_timeout_ms: 5_000,
            read_pool_size: 2,
        }
    }
}

/// SQLite-backed holiday/workday flag store.
///
/// The store is `Send + Sync`; share it behind an `Arc`. Writes go through a
/// single writer connection, reads rotate over a small pool.
pub struct DayFlagStore {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_cursor: AtomicUsize,
    authority: String,
    notifier: Arc<ChangeNotifier>,
    backup: Arc<dyn BackupSignal>,
}

impl std::fmt::Debug for DayFlagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayFlagStore")
            .field("authority", &self.authority)
            .field("readers", &self.readers.len())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl DayFlagStore {
    /// Open (creating if absent) the database at the given path.
    ///
    /// In-memory names (`:memory:`, `file:` addresses with `mode=memory`)
    /// are private to one connection, so they are opened without a reader
    /// pool, the same as [`Self::open_memory`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or schema application fails.
    pub fn open(
        path: &Path,
        options: &StoreOptions,
        notifier: Arc<ChangeNotifier>,
        backup: Arc<dyn BackupSignal>,
    ) -> Result<Self> {
        if is_memory_path(path) {
            debug!(path = %path.display(), "In-memory path, opening without reader pool");
            return Self::open_memory(options, notifier, backup);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer = Connection::open(path)?;
        apply_pragmas(&writer, options.busy_timeout_ms)?;
        apply_schema(&writer)?;

        let mut readers = Vec::with_capacity(options.read_pool_size);
        for _ in 0..options.read_pool_size {
            let reader = Connection::open(path)?;
            apply_pragmas(&reader, options.busy_timeout_ms)?;
            readers.push(Mutex::new(reader));
        }

        info!(path = %path.display(), readers = readers.len(), "Opened flag store");
        Ok(Self::from_parts(writer, readers, options, notifier, backup))
    }

    /// Open an in-memory database for testing. Reads share the writer connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory(
        options: &StoreOptions,
        notifier: Arc<ChangeNotifier>,
        backup: Arc<dyn BackupSignal>,
    ) -> Result<Self> {
        let writer = Connection::open_in_memory()?;
        apply_pragmas(&writer, options.busy_timeout_ms)?;
        apply_schema(&writer)?;
        Ok(Self::from_parts(writer, Vec::new(), options, notifier, backup))
    }

    fn from_parts(
        writer: Connection,
        readers: Vec<Mutex<Connection>>,
        options: &StoreOptions,
        notifier: Arc<ChangeNotifier>,
        backup: Arc<dyn BackupSignal>,
    ) -> Self {
        Self {
            writer: Mutex::new(writer),
            readers,
            read_cursor: AtomicUsize::new(0),
            authority: options.authority.clone(),
            notifier,
            backup,
        }
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    /// Top-level address covering both namespaces.
    #[must_use]
    pub fn root_uri(&self) -> ResourceUri {
        ResourceUri::root(&self.authority)
    }

    /// Canonical address of a namespace.
    #[must_use]
    pub fn namespace_uri(&self, namespace: Namespace) -> ResourceUri {
        ResourceUri::namespace(&self.authority, namespace)
    }

    /// Best-effort read against one namespace table.
    ///
    /// Failures are logged and reported as `None`. Use [`Self::try_query`]
    /// to get the error instead.
    #[must_use]
    pub fn query(
        &self,
        namespace: Namespace,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        selection_args: &[&str],
        sort_order: Option<&str>,
    ) -> Option<Cursor> {
        match self.try_query(namespace, projection, selection, selection_args, sort_order) {
            Ok(cursor) => Some(cursor),
            Err(err) => {
                error!(
                    uri = %self.namespace_uri(namespace),
                    error = %err,
                    "Returning no cursor for failed query"
                );
                None
            }
        }
    }

    /// Read against one namespace table, surfacing failures.
    ///
    /// `selection` is a SQL boolean expression with `?` placeholders bound
    /// positionally from `selection_args`. `projection` is restricted to the
    /// table's columns; `None` selects all of them.
    ///
    /// # Errors
    ///
    /// Returns [`DayFlagError::UnknownColumn`] for a bad projection, or a
    /// database error for a malformed filter or engine failure.
    pub fn try_query(
        &self,
        namespace: Namespace,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        selection_args: &[&str],
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let sql = build_select(namespace, projection, selection, sort_order)?;
        trace!(%sql, args = ?selection_args, "Running query");

        let (columns, rows) = {
            let conn = self.read_conn();
            let mut stmt = conn.prepare(&sql)?;
            let columns: Arc<[String]> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();
            let width = columns.len();

            let mut rows = Vec::new();
            let mut result = stmt.query(params_from_iter(selection_args.iter()))?;
            while let Some(row) = result.next()? {
                let values = (0..width)
                    .map(|idx| row.get_ref(idx).map(CellValue::from))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows.push(values);
            }
            (columns, rows)
        };

        let uri = self.namespace_uri(namespace);
        let changed = Arc::new(ChangeFlag::default());
        let observer: Arc<dyn ChangeObserver> = changed.clone();
        let id = self.notifier.register(&uri, true, &observer);

        Ok(Cursor::new(columns, rows, uri, changed).registered_with(&self.notifier, id))
    }

    /// Insert a record, ignoring a duplicate date.
    ///
    /// Returns the new record's address, or `None` when no row was created
    /// (the date already exists in this namespace, or the engine failed).
    /// On success a change is reported at the record address and the backup
    /// signal is raised once.
    pub fn insert(&self, namespace: Namespace, values: &DayFlagValues) -> Option<ResourceUri> {
        let row_id = match self.insert_row(namespace, values) {
            Ok(row_id) => row_id,
            Err(err) => {
                error!(namespace = %namespace, error = %err, "Insert failed");
                return None;
            }
        };

        if row_id <= 0 {
            debug!(namespace = %namespace, date = %values.date, "Insert ignored");
            return None;
        }

        debug!(namespace = %namespace, ?values, row_id, "Inserted flag");
        let uri = self.namespace_uri(namespace).with_appended_id(row_id);
        self.notify_change(Some(&uri));
        Some(uri)
    }

    /// Returns the assigned row id, or 0 when the conflict policy dropped the row.
    fn insert_row(&self, namespace: Namespace, values: &DayFlagValues) -> Result<i64> {
        let conn = self.write_conn();
        let sql = format!(
            "INSERT OR IGNORE INTO {} (date, state) VALUES (?1, ?2)",
            namespace.table()
        );
        let changed = conn.execute(&sql, params![values.date, values.state])?;
        if changed == 0 {
            return Ok(0);
        }
        Ok(conn.last_insert_rowid())
    }

    /// Report a change and mark the backup dirty. `None` reports the top-level address.
    fn notify_change(&self, uri: Option<&ResourceUri>) {
        match uri {
            Some(uri) => self.notifier.notify_change(uri),
            None => self.notifier.notify_change(&self.root_uri()),
        };
        self.backup.data_changed();
    }

    /// Resolve the type string for a namespace or item address.
    ///
    /// # Errors
    ///
    /// Returns [`DayFlagError::InvalidArgument`] for any address outside the
    /// two namespaces under this store's authority.
    pub fn type_of(&self, uri: &ResourceUri) -> Result<&'static str> {
        Target::resolve(uri, &self.authority).map(|target| target.namespace().item_type())
    }

    /// Updates are not supported; nothing is changed and zero rows are reported.
    #[allow(clippy::unused_self)]
    pub fn update(
        &self,
        namespace: Namespace,
        _values: &DayFlagValues,
        _selection: Option<&str>,
        _selection_args: &[&str],
    ) -> usize {
        trace!(namespace = %namespace, "Ignoring update");
        0
    }

    /// Deletes are not supported; nothing is removed and zero rows are reported.
    #[allow(clippy::unused_self)]
    pub fn delete(
        &self,
        namespace: Namespace,
        _selection: Option<&str>,
        _selection_args: &[&str],
    ) -> usize {
        trace!(namespace = %namespace, "Ignoring delete");
        0
    }

    /// All records in a namespace, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn flags(&self, namespace: Namespace) -> Result<Vec<DayFlag>> {
        let conn = self.read_conn();
        let sql = format!(
            "SELECT id, date, state FROM {} ORDER BY date, id",
            namespace.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let flags = stmt
            .query_map([], DayFlag::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(flags)
    }

    /// Point lookup by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn lookup(&self, namespace: Namespace, date: &str) -> Result<Option<DayFlag>> {
        let conn = self.read_conn();
        let sql = format!(
            "SELECT id, date, state FROM {} WHERE date = ?",
            namespace.table()
        );
        conn.query_row(&sql, [date], DayFlag::from_row)
            .optional()
            .map_err(DayFlagError::from)
    }

    /// Number of records in a namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn count(&self, namespace: Namespace) -> Result<usize> {
        let conn = self.read_conn();
        let sql = format!("SELECT count(*) FROM {}", namespace.table());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn write_conn(&self) -> MutexGuard<'_, Connection> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next reader by round-robin, or the writer when there is no pool.
    fn read_conn(&self) -> MutexGuard<'_, Connection> {
        if self.readers.is_empty() {
            return self.write_conn();
        }
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Paths `SQLite` resolves to a connection-private database.
fn is_memory_path(path: &Path) -> bool {
    let Some(raw) = path.to_str() else {
        return false;
    };
    let raw = raw.trim();
    raw.is_empty()
        || raw == ":memory:"
        || raw.starts_with("file::memory:")
        || (raw.starts_with("file:") && raw.contains("mode=memory"))
}

fn build_select(
    namespace: Namespace,
    projection: Option<&[&str]>,
    selection: Option<&str>,
    sort_order: Option<&str>,
) -> Result<String> {
    let columns = match projection {
        None | Some([]) => "*".to_string(),
        Some(columns) => {
            if let Some(bad) = columns.iter().find(|c| !COLUMNS.contains(*c)) {
                return Err(DayFlagError::UnknownColumn {
                    column: (*bad).to_string(),
                });
            }
            columns.join(", ")
        }
    };

    let mut sql = format!("SELECT {columns} FROM {}", namespace.table());
    if let Some(selection) = selection.map(str::trim).filter(|s| !s.is_empty()) {
        let _ = write!(sql, " WHERE ({selection})");
    }
    if let Some(order) = sort_order.map(str::trim).filter(|s| !s.is_empty()) {
        let _ = write!(sql, " ORDER BY {order}");
    }
    Ok(sql)
}
