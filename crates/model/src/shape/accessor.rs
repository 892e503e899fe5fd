use crate::core::{kind::ValueKind, value::Value};
use criteria_syntax::ColumnPath;
use std::{fmt, sync::Arc};

/// Reads a leaf value from a record; `None` means absent.
pub type ReadFn<R> = Arc<dyn Fn(&R) -> Option<Value> + Send + Sync>;

/// Typed hop from a record to a nested part of it; `None` means the part is absent.
pub type HopFn<R, C> = Arc<dyn for<'a> Fn(&'a R) -> Option<&'a C> + Send + Sync>;

/// A resolved, null-safe reader for one path on one record type.
///
/// Every hop of the path is composed into a single closure at resolution time, so
/// reading never looks a member up by name.
pub struct Accessor<R> {
    path: ColumnPath,
    kind: ValueKind,
    nullable: bool,
    read: ReadFn<R>,
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind.clone(),
            nullable: self.nullable,
            read: Arc::clone(&self.read),
        }
    }
}

impl<R: 'static> Accessor<R> {
    pub fn new(path: ColumnPath, kind: ValueKind, nullable: bool, read: ReadFn<R>) -> Self {
        Self {
            path,
            kind,
            nullable,
            read,
        }
    }

    /// Lifts an accessor on a nested part into one on the record that owns it.
    pub fn through<P: 'static>(self, hop: HopFn<P, R>, optional: bool) -> Accessor<P> {
        let inner = self.read;
        Accessor {
            path: self.path,
            kind: self.kind,
            nullable: self.nullable || optional,
            read: Arc::new(move |record: &P| hop(record).and_then(|part| inner(part))),
        }
    }

    pub fn read(&self, record: &R) -> Option<Value> {
        (self.read)(record)
    }
}

impl<R> Accessor<R> {
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Whether any hop or the leaf itself is declared optional.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}
