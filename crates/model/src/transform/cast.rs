//! Re-targets filter and sort collections from one record shape to another.
//!
//! Per criterion the precedence is: custom rewriter for the column, then the direct
//! mapping, then the unmapped policy (drop when `exclude_unmapped`, else pass through
//! unchanged). Destination order follows source order and fan-out stays contiguous.
//! Passed-through criteria are not checked against the destination shape; that only
//! happens when the result is built into a predicate.

use crate::transform::mapping::{CastMappingTable, ColumnMapping};
use criteria_syntax::{
    Combinator, Condition, FilterCollection, FilterCriterion, Group, SortCollection,
    SortCriterion,
};
use tracing::{debug, trace, warn};

/// Rewrites filter criteria for the destination shape.
pub fn rewrite_filters(source: &FilterCollection, table: &CastMappingTable) -> FilterCollection {
    let rewritten: FilterCollection = source
        .iter()
        .flat_map(|criterion| rewrite_criterion(criterion, table))
        .collect();
    debug!(
        source = source.len(),
        destination = rewritten.len(),
        "Rewrote filter criteria"
    );
    rewritten
}

/// Rewrites sort keys for the destination shape.
pub fn rewrite_sorts(source: &SortCollection, table: &CastMappingTable) -> SortCollection {
    let rewritten: SortCollection = source
        .iter()
        .flat_map(|criterion| rewrite_sort(criterion, table))
        .collect();
    debug!(
        source = source.len(),
        destination = rewritten.len(),
        "Rewrote sort criteria"
    );
    rewritten
}

impl CastMappingTable {
    pub fn rewrite_filters(&self, source: &FilterCollection) -> FilterCollection {
        rewrite_filters(source, self)
    }

    pub fn rewrite_sorts(&self, source: &SortCollection) -> SortCollection {
        rewrite_sorts(source, self)
    }
}

fn rewrite_criterion(criterion: &FilterCriterion, table: &CastMappingTable) -> Vec<FilterCriterion> {
    match criterion {
        FilterCriterion::Condition(condition) => rewrite_condition(condition, table),
        FilterCriterion::Group(group) => rewrite_group(group, table).into_iter().collect(),
    }
}

fn rewrite_group(group: &Group, table: &CastMappingTable) -> Option<FilterCriterion> {
    let mut children = Vec::with_capacity(group.children.len());

    for child in &group.children {
        let mut rewritten = rewrite_criterion(child, table);
        match group.combinator {
            Combinator::And => children.append(&mut rewritten),
            // A fan-out means "all of these"; splicing it into or/not would change that.
            Combinator::Or | Combinator::Not if rewritten.len() > 1 => {
                children.push(FilterCriterion::Group(Group {
                    combinator: Combinator::And,
                    children: rewritten,
                }));
            }
            Combinator::Or | Combinator::Not => children.append(&mut rewritten),
        }
    }

    if children.is_empty() {
        debug!(group = %group, "Dropping group with no remaining criteria");
        return None;
    }

    Some(FilterCriterion::Group(Group {
        combinator: group.combinator,
        children,
    }))
}

fn rewrite_condition(condition: &Condition, table: &CastMappingTable) -> Vec<FilterCriterion> {
    if let Some(rewriter) = table.filter_rewriters.get(&condition.column) {
        let rewritten = rewriter(condition);
        trace!(
            criterion = %condition,
            produced = rewritten.len(),
            "Applied custom filter rewriter"
        );
        return rewritten;
    }

    if let Some(mapping) = table.columns.get(&condition.column) {
        return vec![FilterCriterion::Condition(map_condition(condition, mapping))];
    }

    if table.exclude_unmapped {
        debug!(criterion = %condition, "Dropping unmapped filter criterion");
        Vec::new()
    } else {
        trace!(criterion = %condition, "Passing unmapped filter criterion through");
        vec![FilterCriterion::Condition(condition.clone())]
    }
}

fn map_condition(condition: &Condition, mapping: &ColumnMapping) -> Condition {
    let operands = match &mapping.transform {
        Some(transform) => condition.operands.iter().map(|o| transform(o)).collect(),
        None => condition.operands.clone(),
    };

    let operator = match mapping.operator {
        Some(operator) if operator.arity().accepts(operands.len()) => operator,
        Some(operator) => {
            warn!(
                criterion = %condition,
                %operator,
                operands = operands.len(),
                "Operator override does not fit the operands, keeping the source operator"
            );
            condition.operator
        }
        None => condition.operator,
    };

    Condition {
        column: mapping.target.clone(),
        operator,
        operands,
    }
}

fn rewrite_sort(criterion: &SortCriterion, table: &CastMappingTable) -> Vec<SortCriterion> {
    if let Some(rewriter) = table.sort_rewriters.get(&criterion.column) {
        let rewritten = rewriter(criterion);
        trace!(
            criterion = %criterion,
            produced = rewritten.len(),
            "Applied custom sort rewriter"
        );
        return rewritten;
    }

    if let Some(mapping) = table.columns.get(&criterion.column) {
        let direction = if mapping.reverse_sort {
            criterion.direction.reversed()
        } else {
            criterion.direction
        };
        return vec![SortCriterion {
            column: mapping.target.clone(),
            direction,
        }];
    }

    if table.exclude_unmapped {
        debug!(criterion = %criterion, "Dropping unmapped sort criterion");
        Vec::new()
    } else {
        vec![criterion.clone()]
    }
}
