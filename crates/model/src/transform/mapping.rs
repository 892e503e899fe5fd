use crate::transform::{error::MappingError, transforms::ValueTransform};
use criteria_syntax::{ColumnPath, Condition, FilterCriterion, Literal, Operator, SortCriterion};
use std::{collections::HashMap, fmt, sync::Arc};

/// Transforms one operand on its way to the destination shape.
pub type OperandTransform = Arc<dyn Fn(&Literal) -> Literal + Send + Sync>;

/// Replaces one source condition with zero or more destination criteria.
pub type FilterRewriter = Arc<dyn Fn(&Condition) -> Vec<FilterCriterion> + Send + Sync>;

/// Replaces one source sort key with zero or more destination sort keys.
pub type SortRewriter = Arc<dyn Fn(&SortCriterion) -> Vec<SortCriterion> + Send + Sync>;

/// Direct mapping of one source column.
#[derive(Clone)]
pub struct ColumnMapping {
    pub target: ColumnPath,
    pub transform: Option<OperandTransform>,
    pub operator: Option<Operator>,
    /// Flip sort direction, for columns whose order is inverted in the destination.
    pub reverse_sort: bool,
}

/// Frozen mapping from source columns to destination columns and rewriters.
#[derive(Clone, Default)]
pub struct CastMappingTable {
    pub(crate) columns: HashMap<ColumnPath, ColumnMapping>,
    pub(crate) filter_rewriters: HashMap<ColumnPath, FilterRewriter>,
    pub(crate) sort_rewriters: HashMap<ColumnPath, SortRewriter>,
    pub(crate) exclude_unmapped: bool,
}

impl CastMappingTable {
    pub fn builder() -> CastMappingTableBuilder {
        CastMappingTableBuilder::default()
    }

    pub fn exclude_unmapped(&self) -> bool {
        self.exclude_unmapped
    }

    pub fn mapping(&self, column: &ColumnPath) -> Option<&ColumnMapping> {
        self.columns.get(column)
    }

    /// Destination column of a directly mapped source column.
    pub fn target_for(&self, column: &ColumnPath) -> Option<&ColumnPath> {
        self.columns.get(column).map(|mapping| &mapping.target)
    }

    /// Source columns mapped onto `target`, sorted.
    pub fn sources_for(&self, target: &ColumnPath) -> Vec<&ColumnPath> {
        let mut sources: Vec<&ColumnPath> = self
            .columns
            .iter()
            .filter(|(_, mapping)| &mapping.target == target)
            .map(|(source, _)| source)
            .collect();
        sources.sort();
        sources
    }

    /// Whether the column has a direct mapping or a rewriter of any kind.
    pub fn is_mapped(&self, column: &ColumnPath) -> bool {
        self.columns.contains_key(column)
            || self.filter_rewriters.contains_key(column)
            || self.sort_rewriters.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len() + self.filter_rewriters.len() + self.sort_rewriters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CastMappingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut columns: Vec<(String, String)> = self
            .columns
            .iter()
            .map(|(source, mapping)| (source.to_string(), mapping.target.to_string()))
            .collect();
        columns.sort();

        f.debug_struct("CastMappingTable")
            .field("columns", &columns)
            .field("filter_rewriters", &self.filter_rewriters.len())
            .field("sort_rewriters", &self.sort_rewriters.len())
            .field("exclude_unmapped", &self.exclude_unmapped)
            .finish()
    }
}

/// Options of one direct mapping, set through [`CastMappingTableBuilder::map_with`].
#[derive(Default)]
pub struct ColumnMappingBuilder {
    transform: Option<OperandTransform>,
    operator: Option<Operator>,
    reverse_sort: bool,
}

impl ColumnMappingBuilder {
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Literal) -> Literal + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn value_transform(self, transform: ValueTransform) -> Self {
        self.transform(move |literal| transform.apply(literal))
    }

    /// Replaces the operator. Ignored at rewrite time when the operands do not fit it.
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn reverse_sort(mut self) -> Self {
        self.reverse_sort = true;
        self
    }
}

enum PendingEntry {
    Column(String, String, ColumnMappingBuilder),
    Filter(String, FilterRewriter),
    Sort(String, SortRewriter),
}

/// Collects mappings, then validates and freezes them with [`build`](Self::build).
#[derive(Default)]
pub struct CastMappingTableBuilder {
    entries: Vec<PendingEntry>,
    exclude_unmapped: bool,
}

impl CastMappingTableBuilder {
    pub fn map(self, source: &str, target: &str) -> Self {
        self.map_with(source, target, |m| m)
    }

    pub fn map_with<F>(mut self, source: &str, target: &str, configure: F) -> Self
    where
        F: FnOnce(ColumnMappingBuilder) -> ColumnMappingBuilder,
    {
        let options = configure(ColumnMappingBuilder::default());
        self.entries.push(PendingEntry::Column(
            source.to_string(),
            target.to_string(),
            options,
        ));
        self
    }

    pub fn rewrite_filter<F>(mut self, source: &str, rewriter: F) -> Self
    where
        F: Fn(&Condition) -> Vec<FilterCriterion> + Send + Sync + 'static,
    {
        self.entries
            .push(PendingEntry::Filter(source.to_string(), Arc::new(rewriter)));
        self
    }

    pub fn rewrite_sort<F>(mut self, source: &str, rewriter: F) -> Self
    where
        F: Fn(&SortCriterion) -> Vec<SortCriterion> + Send + Sync + 'static,
    {
        self.entries
            .push(PendingEntry::Sort(source.to_string(), Arc::new(rewriter)));
        self
    }

    pub fn exclude_unmapped(mut self, exclude: bool) -> Self {
        self.exclude_unmapped = exclude;
        self
    }

    pub fn build(self) -> Result<CastMappingTable, MappingError> {
        let mut table = CastMappingTable {
            exclude_unmapped: self.exclude_unmapped,
            ..CastMappingTable::default()
        };

        for entry in self.entries {
            match entry {
                PendingEntry::Column(source, target, options) => {
                    let source = column(&source)?;
                    let mapping = ColumnMapping {
                        target: column(&target)?,
                        transform: options.transform,
                        operator: options.operator,
                        reverse_sort: options.reverse_sort,
                    };
                    if table.columns.contains_key(&source) {
                        return Err(MappingError::DuplicateColumn(source.to_string()));
                    }
                    table.columns.insert(source, mapping);
                }
                PendingEntry::Filter(source, rewriter) => {
                    let source = column(&source)?;
                    if table.filter_rewriters.insert(source.clone(), rewriter).is_some() {
                        return Err(MappingError::DuplicateColumn(source.to_string()));
                    }
                }
                PendingEntry::Sort(source, rewriter) => {
                    let source = column(&source)?;
                    if table.sort_rewriters.insert(source.clone(), rewriter).is_some() {
                        return Err(MappingError::DuplicateColumn(source.to_string()));
                    }
                }
            }
        }

        Ok(table)
    }
}

fn column(text: &str) -> Result<ColumnPath, MappingError> {
    ColumnPath::parse(text).map_err(|source| MappingError::InvalidColumn {
        column: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> ColumnPath {
        ColumnPath::parse(text).unwrap()
    }

    #[test]
    fn test_builder_freezes_mappings() {
        let table = CastMappingTable::builder()
            .map("age", "yearsOld")
            .map_with("name", "profile.fullName", |m| {
                m.operator(Operator::Contains).reverse_sort()
            })
            .rewrite_filter("full_name", |_| Vec::new())
            .exclude_unmapped(true)
            .build()
            .unwrap();

        assert!(table.exclude_unmapped());
        assert_eq!(table.target_for(&path("age")), Some(&path("yearsOld")));
        assert_eq!(table.sources_for(&path("profile.fullName")), vec![&path("name")]);
        assert!(table.is_mapped(&path("full_name")));
        assert!(!table.is_mapped(&path("email")));
        assert_eq!(table.len(), 3);

        let name = table.mapping(&path("name")).unwrap();
        assert_eq!(name.operator, Some(Operator::Contains));
        assert!(name.reverse_sort);
    }

    #[test]
    fn test_builder_rejects_bad_columns() {
        let err = CastMappingTable::builder().map("age", "a..b").build().unwrap_err();
        assert!(matches!(err, MappingError::InvalidColumn { ref column, .. } if column == "a..b"));

        let err = CastMappingTable::builder()
            .map("age", "x")
            .map("age", "y")
            .build()
            .unwrap_err();
        assert!(matches!(err, MappingError::DuplicateColumn(ref c) if c == "age"));
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CastMappingTable>();
    }
}
