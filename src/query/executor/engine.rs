// Query Evaluation Pipeline
//
// Threads a parsed query through FROM -> WHERE -> GROUP BY -> ORDER BY ->
// SELECT. FROM and WHERE interleave entry by entry; grouping and sorting
// are necessarily eager. Any error raised at any stage aborts the whole
// evaluation.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::Arc;

use linked_hash_map::LinkedHashMap;
use log::debug;

use crate::fs::access::FileSystemAccess;
use crate::fs::attributes::{EntryRow, FileSystemAttributes};
use crate::fs::entry::{EntryKind, FileSystemEntry};
use crate::query::executor::context::{
    AggregateContext, ExpressionContext, RowAggregate, SingleRowContext,
};
use crate::query::executor::functions::FunctionRegistry;
use crate::query::executor::result::{QueryEvaluationResult, QueryResult};
use crate::query::executor::value::Value;
use crate::query::parser::ast::{Expression, FromClause, OrderByClause, Query};

/// Evaluates queries against a filesystem source. Each call to
/// [`QueryEvaluation::evaluate`] owns its rows and contexts; the function
/// registry is immutable and shared between evaluations.
pub struct QueryEvaluation<A: FileSystemAccess> {
    access: A,
    functions: Arc<FunctionRegistry>,
}

impl<A: FileSystemAccess> QueryEvaluation<A> {
    pub fn new(access: A) -> Self {
        QueryEvaluation {
            access,
            functions: FunctionRegistry::shared(),
        }
    }

    pub fn evaluate(&self, query: &Query) -> QueryResult<QueryEvaluationResult> {
        let expanded = expand_attributes(&query.selected_attributes);
        let attribute_names = attribute_names(&expanded);

        // FROM and WHERE interleave: each entry is wrapped and filtered
        // before the next one is pulled from the walk.
        let mut row_contexts = Vec::new();
        for entry in EntryWalk::new(&self.access, &query.from) {
            let context = SingleRowContext::new(
                Box::new(EntryRow::new(entry?)),
                Arc::clone(&self.functions),
            );
            if let Some(predicate) = &query.where_clause {
                if !predicate.evaluate(&context)?.evaluates_to_true() {
                    continue;
                }
            }
            row_contexts.push(context);
        }
        debug!("from/where produced {} rows", row_contexts.len());

        let contexts = self.group(row_contexts, query.group_by.key())?;
        let contexts = order(contexts, &query.order_by)?;

        let mut rows = Vec::with_capacity(contexts.len());
        for context in &contexts {
            let mut row = Vec::with_capacity(expanded.len());
            for attribute in &expanded {
                row.push(project(attribute, context.as_ref())?);
            }
            rows.push(row);
        }
        debug!("select produced {} x {} result", rows.len(), attribute_names.len());

        Ok(QueryEvaluationResult { attribute_names, rows })
    }

    /// Partition rows by the grouping key's value, preserving discovery
    /// order, and wrap each partition in an aggregate context. Without a
    /// key the single-row contexts pass through unchanged.
    fn group(
        &self,
        row_contexts: Vec<SingleRowContext>,
        key: Option<&Expression>,
    ) -> QueryResult<Vec<Box<dyn ExpressionContext>>> {
        let Some(key) = key else {
            return Ok(row_contexts
                .into_iter()
                .map(|context| Box::new(context) as Box<dyn ExpressionContext>)
                .collect());
        };

        let mut groups: LinkedHashMap<Value, Vec<SingleRowContext>> = LinkedHashMap::new();
        for context in row_contexts {
            let value = key.evaluate(&context)?;
            groups.entry(value).or_insert_with(Vec::new).push(context);
        }
        debug!("group by '{}' produced {} groups", key, groups.len());

        Ok(groups
            .into_iter()
            .map(|(value, members)| {
                let aggregate = RowAggregate::new(members, key.clone(), value);
                Box::new(AggregateContext::new(aggregate, Arc::clone(&self.functions)))
                    as Box<dyn ExpressionContext>
            })
            .collect())
    }
}

/// Evaluate one projected attribute for one context, reusing the group
/// key's pre-computed value where the context caches it.
fn project(attribute: &Expression, context: &dyn ExpressionContext) -> QueryResult<Value> {
    match context.try_get_cached(attribute) {
        Some(value) => Ok(value),
        None => attribute.evaluate(context),
    }
}

/// Replace every `*` in the SELECT list with one identifier reference per
/// source attribute, in source order; everything else passes through.
fn expand_attributes(attributes: &[Expression]) -> Vec<Expression> {
    let mut expanded = Vec::new();
    for attribute in attributes {
        match attribute {
            Expression::Identifier(identifier) if identifier.is_wildcard() => {
                expanded.extend(
                    FileSystemAttributes::attributes()
                        .into_iter()
                        .map(Expression::Identifier),
                );
            }
            other => expanded.push(other.clone()),
        }
    }
    expanded
}

/// Output column names: plain identifier references keep their spelling,
/// any other projection gets a placeholder header.
fn attribute_names(expanded: &[Expression]) -> Vec<String> {
    expanded
        .iter()
        .map(|attribute| match attribute {
            Expression::Identifier(identifier) => identifier.name().to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

/// Stable single-key sort over contexts. The sort key is evaluated once per
/// context; a comparison error is remembered and re-raised after the sort
/// since the comparator itself cannot fail early.
fn order(
    contexts: Vec<Box<dyn ExpressionContext>>,
    order_by: &OrderByClause,
) -> QueryResult<Vec<Box<dyn ExpressionContext>>> {
    let Some(condition) = order_by.condition() else {
        return Ok(contexts);
    };

    let mut keyed = Vec::with_capacity(contexts.len());
    for context in contexts {
        let key = project(&condition.expression, context.as_ref())?;
        keyed.push((key, context));
    }

    let mut compare_error = None;
    keyed.sort_by(|(a, _), (b, _)| match a.compare(b) {
        Ok(ordering) => {
            if condition.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
        Err(error) => {
            compare_error.get_or_insert(error);
            Ordering::Equal
        }
    });
    if let Some(error) = compare_error {
        return Err(error);
    }

    Ok(keyed.into_iter().map(|(_, context)| context).collect())
}

/// Lazy breadth-first walk over the FROM path. Non-recursive walks list the
/// root once; recursive walks enqueue every directory they encounter and
/// keep yielding until the queue drains. No cycle detection is performed.
struct EntryWalk<'a, A: FileSystemAccess> {
    access: &'a A,
    recursive: bool,
    pending: VecDeque<String>,
    current: std::vec::IntoIter<FileSystemEntry>,
}

impl<'a, A: FileSystemAccess> EntryWalk<'a, A> {
    fn new(access: &'a A, from: &FromClause) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(from.path.clone());
        EntryWalk {
            access,
            recursive: from.recursive,
            pending,
            current: Vec::new().into_iter(),
        }
    }
}

impl<'a, A: FileSystemAccess> Iterator for EntryWalk<'a, A> {
    type Item = QueryResult<FileSystemEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                if self.recursive && entry.kind == EntryKind::Directory {
                    self.pending.push_back(entry.absolute_path.clone());
                }
                return Some(Ok(entry));
            }

            let path = self.pending.pop_front()?;
            match self.access.entries(&path) {
                Ok(entries) => self.current = entries.into_iter(),
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
