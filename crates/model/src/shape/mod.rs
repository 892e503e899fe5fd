//! Shape descriptors: what members a record type has, their kinds, and how to reach them.
//!
//! A descriptor answers one question per path segment ("is there a member X, and is it
//! a value or a nested shape?"). The resolver walks a dotted path through descriptors
//! and composes the typed hops into one [`Accessor`].

pub mod accessor;
pub mod error;
pub mod json;
pub mod resolver;

use crate::core::{kind::ValueKind, value::Value};
use accessor::{Accessor, HopFn, ReadFn};
use criteria_syntax::ColumnPath;
use error::ResolveError;
use std::{collections::HashMap, sync::Arc};

pub trait ShapeDescriptor<R>: Send + Sync {
    /// Name used in resolution errors.
    fn name(&self) -> &str;

    fn member(&self, segment: &str) -> Option<Member<R>>;
}

/// One declared member of a shape.
pub enum Member<R> {
    Field {
        kind: ValueKind,
        optional: bool,
        read: ReadFn<R>,
    },
    Nested {
        optional: bool,
        shape: Arc<dyn NestedShape<R>>,
    },
}

impl<R> Clone for Member<R> {
    fn clone(&self) -> Self {
        match self {
            Member::Field {
                kind,
                optional,
                read,
            } => Member::Field {
                kind: kind.clone(),
                optional: *optional,
                read: Arc::clone(read),
            },
            Member::Nested { optional, shape } => Member::Nested {
                optional: *optional,
                shape: Arc::clone(shape),
            },
        }
    }
}

/// A nested shape with its concrete record type erased.
pub trait NestedShape<R>: Send + Sync {
    fn shape_name(&self) -> &str;

    /// Resolves `path` from `index` onwards inside the nested shape and lifts the result
    /// back onto `R`.
    fn resolve_rest(
        &self,
        path: &ColumnPath,
        index: usize,
        optional: bool,
    ) -> Result<Accessor<R>, ResolveError>;
}

/// Typed hop into a nested part `C` of `R`.
pub struct Hop<R, C> {
    get: HopFn<R, C>,
    shape: Arc<dyn ShapeDescriptor<C>>,
}

impl<R: 'static, C: 'static> Hop<R, C> {
    pub fn new(get: HopFn<R, C>, shape: Arc<dyn ShapeDescriptor<C>>) -> Self {
        Self { get, shape }
    }
}

impl<R: 'static, C: 'static> NestedShape<R> for Hop<R, C> {
    fn shape_name(&self) -> &str {
        self.shape.name()
    }

    fn resolve_rest(
        &self,
        path: &ColumnPath,
        index: usize,
        optional: bool,
    ) -> Result<Accessor<R>, ResolveError> {
        let inner = resolver::resolve_from(self.shape.as_ref(), path, index)?;
        Ok(inner.through(Arc::clone(&self.get), optional))
    }
}

/// Wraps a hop closure, fixing its higher-ranked signature.
pub fn hop<R, C, F>(get: F) -> HopFn<R, C>
where
    F: for<'a> Fn(&'a R) -> Option<&'a C> + Send + Sync + 'static,
{
    Arc::new(get)
}

/// A record type with a hand-written shape.
pub trait Record: Sized + 'static {
    fn shape() -> RecordShape<Self>;
}

/// Descriptor for a Rust struct, assembled member by member.
pub struct RecordShape<R> {
    name: String,
    members: HashMap<String, Member<R>>,
}

impl<R: 'static> RecordShape<R> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashMap::new(),
        }
    }

    /// A value that is always present.
    pub fn field<F>(self, name: &str, kind: ValueKind, read: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.with_member(
            name,
            Member::Field {
                kind,
                optional: false,
                read: Arc::new(move |record: &R| Some(read(record))),
            },
        )
    }

    pub fn optional_field<F>(self, name: &str, kind: ValueKind, read: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        self.with_member(
            name,
            Member::Field {
                kind,
                optional: true,
                read: Arc::new(read),
            },
        )
    }

    /// A nested part that is always present.
    pub fn nested<C, F, S>(self, name: &str, get: F, shape: S) -> Self
    where
        C: 'static,
        F: for<'a> Fn(&'a R) -> &'a C + Send + Sync + 'static,
        S: ShapeDescriptor<C> + 'static,
    {
        let get = hop(move |record: &R| Some(get(record)));
        self.nested_member(name, false, get, Arc::new(shape))
    }

    pub fn optional_nested<C, F, S>(self, name: &str, get: F, shape: S) -> Self
    where
        C: 'static,
        F: for<'a> Fn(&'a R) -> Option<&'a C> + Send + Sync + 'static,
        S: ShapeDescriptor<C> + 'static,
    {
        self.nested_member(name, true, Arc::new(get), Arc::new(shape))
    }

    fn nested_member<C: 'static>(
        self,
        name: &str,
        optional: bool,
        get: HopFn<R, C>,
        shape: Arc<dyn ShapeDescriptor<C>>,
    ) -> Self {
        let shape: Arc<dyn NestedShape<R>> = Arc::new(Hop::new(get, shape));
        self.with_member(name, Member::Nested { optional, shape })
    }

    fn with_member(mut self, name: &str, member: Member<R>) -> Self {
        self.members.insert(name.to_string(), member);
        self
    }
}

impl<R: 'static> ShapeDescriptor<R> for RecordShape<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn member(&self, segment: &str) -> Option<Member<R>> {
        self.members.get(segment).cloned()
    }
}
