use crate::shape::{
    Member, Record, ShapeDescriptor, accessor::Accessor, error::ResolveError,
};
use criteria_syntax::ColumnPath;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::trace;

/// Resolves a dotted path against a shape into an accessor.
pub fn resolve<R: 'static>(
    shape: &dyn ShapeDescriptor<R>,
    path: &ColumnPath,
) -> Result<Accessor<R>, ResolveError> {
    resolve_from(shape, path, 0)
}

pub(crate) fn resolve_from<R: 'static>(
    shape: &dyn ShapeDescriptor<R>,
    path: &ColumnPath,
    index: usize,
) -> Result<Accessor<R>, ResolveError> {
    let segments = path.segments();
    let Some(segment) = segments.get(index) else {
        return Err(ResolveError::NotAValue {
            path: path.to_string(),
            shape: shape.name().to_string(),
        });
    };

    let member = shape
        .member(segment)
        .ok_or_else(|| ResolveError::UnknownPath {
            path: path.to_string(),
            segment: segment.clone(),
            resolved: path.prefix(index),
            shape: shape.name().to_string(),
        })?;
    let is_leaf = index + 1 == segments.len();

    match member {
        Member::Field {
            kind,
            optional,
            read,
        } => {
            if is_leaf {
                return Ok(Accessor::new(path.clone(), kind, optional, read));
            }
            // The path keeps going past a scalar value.
            Err(ResolveError::UnknownPath {
                path: path.to_string(),
                segment: segments[index + 1].clone(),
                resolved: path.prefix(index + 1),
                shape: format!("{kind} value"),
            })
        }
        Member::Nested { optional, shape } => {
            if is_leaf {
                return Err(ResolveError::NotAValue {
                    path: path.to_string(),
                    shape: shape.shape_name().to_string(),
                });
            }
            shape.resolve_rest(path, index + 1, optional)
        }
    }
}

/// Resolves paths against one shape and caches the accessors by path.
pub struct PathResolver<R> {
    shape: Arc<dyn ShapeDescriptor<R>>,
    cache: RwLock<HashMap<ColumnPath, Accessor<R>>>,
}

impl<R: 'static> PathResolver<R> {
    pub fn new<S: ShapeDescriptor<R> + 'static>(shape: S) -> Self {
        Self::from_shared(Arc::new(shape))
    }

    pub fn from_shared(shape: Arc<dyn ShapeDescriptor<R>>) -> Self {
        Self {
            shape,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn shape(&self) -> &dyn ShapeDescriptor<R> {
        self.shape.as_ref()
    }

    pub fn resolve(&self, path: &ColumnPath) -> Result<Accessor<R>, ResolveError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(accessor) = cache.get(path) {
                return Ok(accessor.clone());
            }
        }

        let accessor = resolve(self.shape.as_ref(), path)?;
        trace!(%path, kind = %accessor.kind(), shape = self.shape.name(), "Resolved path");

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(path.clone(), accessor.clone());
        }
        Ok(accessor)
    }

    /// Number of cached accessors.
    pub fn cached(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl<R: Record> PathResolver<R> {
    pub fn for_record() -> Self {
        Self::new(R::shape())
    }
}
