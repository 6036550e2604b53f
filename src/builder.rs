//! The structural builder: dotted-key resolution and table-header
//! algorithms over a single-ownership tree.
//!
//! The builder owns the root table for the duration of the parse and keeps
//! the "current table" as a key path that is re-resolved on demand, instead
//! of holding shared pointers into the tree.

#[cfg(test)]
#[path = "./builder_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind};
use crate::span::Span;
use crate::table::Table;
use crate::value::{Key, Value};

type PathSet = foldhash::HashSet<Vec<String>>;

pub(crate) struct Builder {
    root: Table,
    /// Spans of explicit `[header]` declarations, keyed by full path.
    /// A path appearing twice is a redefinition.
    declared_tables: foldhash::HashMap<Vec<String>, Span>,
    /// Full paths created by `[[header]]`. This set is the source of truth
    /// separating extensible arrays-of-tables from static arrays created by
    /// `key = [...]`.
    array_of_tables: PathSet,
    /// Path of the table that key-value pairs are currently inserted into.
    current: Vec<String>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Builder {
            root: Table::new(),
            declared_tables: foldhash::HashMap::with_hasher(
                foldhash::fast::RandomState::default(),
            ),
            array_of_tables: foldhash::HashSet::with_hasher(
                foldhash::fast::RandomState::default(),
            ),
            current: Vec::new(),
        }
    }

    pub(crate) fn into_root(self) -> Table {
        self.root
    }

    /// Resolves the current header path against the tree.
    ///
    /// Every segment of the path was validated when its header was opened,
    /// and nothing can rebind a segment afterwards (redefinition is an
    /// error), so navigation cannot fail.
    pub(crate) fn current_table(&mut self) -> &mut Table {
        let mut t = &mut self.root;
        for name in &self.current {
            t = match t.get_mut(name) {
                Some(Value::Table(next)) => next,
                Some(Value::Array(elements)) => match elements.last_mut() {
                    Some(Value::Table(next)) => next,
                    _ => unreachable!("array-of-tables entries are always tables"),
                },
                _ => unreachable!("the current table path is always navigable"),
            };
        }
        t
    }

    /// Handles a `[a.b.c]` header: walks (creating as needed) every segment
    /// and makes the resulting table current.
    pub(crate) fn open_table(&mut self, path: &[Key]) -> Result<(), Error> {
        let names: Vec<String> = path.iter().map(|k| k.name.clone()).collect();
        // The parser rejects empty headers before calling in.
        let last = path.last().unwrap();

        if let Some(&first) = self.declared_tables.get(&names) {
            return Err(Error {
                kind: ErrorKind::DuplicateTable {
                    name: names.join("."),
                    first,
                },
                span: last.span,
            });
        }

        let mut t = &mut self.root;
        for (i, key) in path.iter().enumerate() {
            t = descend(t, key, &names[..=i], &self.array_of_tables)?;
        }

        self.declared_tables.insert(names.clone(), last.span);
        self.current = names;
        Ok(())
    }

    /// Handles a `[[a.b.c]]` header: walks the prefix, appends a fresh table
    /// to the array-of-tables at the final segment, and makes it current.
    pub(crate) fn open_array_of_tables(&mut self, path: &[Key]) -> Result<(), Error> {
        let names: Vec<String> = path.iter().map(|k| k.name.clone()).collect();
        // The parser rejects empty headers before calling in.
        let last = path.last().unwrap();

        let mut t = &mut self.root;
        for (i, key) in path[..path.len() - 1].iter().enumerate() {
            t = descend(t, key, &names[..=i], &self.array_of_tables)?;
        }

        match t.find_index(&last.name) {
            Some(idx) => {
                let (existing, value) = &mut t.entries_mut()[idx];
                let first = existing.span;
                match value {
                    Value::Array(elements) => {
                        if !self.array_of_tables.contains(names.as_slice())
                            || elements.iter().any(|v| !matches!(v, Value::Table(_)))
                        {
                            return Err(Error {
                                kind: ErrorKind::StaticArrayExtension,
                                span: last.span,
                            });
                        }
                        elements.push(Value::Table(Table::new()));
                    }
                    _ => return Err(duplicate_key(last, first)),
                }
            }
            None => {
                self.array_of_tables.insert(names.clone());
                t.insert(last.clone(), Value::Array(vec![Value::Table(Table::new())]));
            }
        }

        self.current = names;
        Ok(())
    }
}

/// One step of header navigation: enter (or create) the table named by
/// `key` inside `t`. Arrays may only be entered through their last element,
/// and only when `prefix` was created by `[[...]]`.
fn descend<'t>(
    t: &'t mut Table,
    key: &Key,
    prefix: &[String],
    array_of_tables: &PathSet,
) -> Result<&'t mut Table, Error> {
    match t.find_index(&key.name) {
        Some(idx) => {
            let (existing, value) = &mut t.entries_mut()[idx];
            let first = existing.span;
            match value {
                Value::Table(next) => Ok(next),
                Value::Array(elements) => {
                    if !array_of_tables.contains(prefix) {
                        return Err(Error {
                            kind: ErrorKind::StaticArrayExtension,
                            span: key.span,
                        });
                    }
                    match elements.last_mut() {
                        Some(Value::Table(next)) => Ok(next),
                        _ => Err(duplicate_key(key, first)),
                    }
                }
                _ => Err(duplicate_key(key, first)),
            }
        }
        None => {
            match t.insert(key.clone(), Value::Table(Table::new())) {
                Value::Table(next) => Ok(next),
                // insert returns the slot that was just filled with a table
                _ => unreachable!(),
            }
        }
    }
}

/// One intermediate step of dotted-key resolution: descend into an existing
/// sub-table or create a fresh one. Anything that is not a table is a
/// redefinition.
pub(crate) fn navigate_dotted_key<'t>(t: &'t mut Table, key: &Key) -> Result<&'t mut Table, Error> {
    match t.find_index(&key.name) {
        Some(idx) => {
            let (existing, value) = &mut t.entries_mut()[idx];
            let first = existing.span;
            match value {
                Value::Table(next) => Ok(next),
                _ => Err(duplicate_key(key, first)),
            }
        }
        None => {
            match t.insert(key.clone(), Value::Table(Table::new())) {
                Value::Table(next) => Ok(next),
                // insert returns the slot that was just filled with a table
                _ => unreachable!(),
            }
        }
    }
}

/// Final step of a key-value assignment; a key bound twice is an error.
pub(crate) fn insert_value(t: &mut Table, key: Key, value: Value) -> Result<(), Error> {
    if let Some((existing, _)) = t.get_key_value(&key.name) {
        return Err(duplicate_key(&key, existing.span));
    }
    t.insert(key, value);
    Ok(())
}

fn duplicate_key(key: &Key, first: Span) -> Error {
    Error {
        kind: ErrorKind::DuplicateKey {
            key: key.name.clone(),
            first,
        },
        span: key.span,
    }
}
