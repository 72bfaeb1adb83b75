//! Batch conversion
//!
//! [`MassSchemator`] applies one schema to every item of a collection,
//! either lazily through [`Generate`] or eagerly with [`MassSchemator::exec`].
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use super::Schemator;
use crate::error::Result;
use crate::schema::Schema;
use serde_json::Value;
use std::borrow::Borrow;
use std::iter::FusedIterator;

/// Converts collections of source items with a single schema
#[derive(Debug, Clone)]
pub struct MassSchemator {
    schemator: Schemator,
}

impl MassSchemator {
    pub fn new(schemator: Schemator) -> Self {
        Self { schemator }
    }

    pub fn schemator(&self) -> &Schemator {
        &self.schemator
    }

    pub fn into_inner(self) -> Schemator {
        self.schemator
    }

    /// Lazily convert each item of `source`.
    ///
    /// Items are pulled one at a time, so infinite iterators are fine. The
    /// first failure is yielded and ends the sequence.
    pub fn generate<'a, I>(&'a self, source: I, schema: &'a Schema) -> Generate<'a, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        Generate {
            schemator: &self.schemator,
            schema,
            items: source.into_iter(),
            position: 0,
            failed: false,
            exhausted: false,
        }
    }

    /// Convert every item of `source`; the first failure aborts the batch
    pub fn exec<I>(&self, source: I, schema: &Schema) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        self.generate(source, schema).collect()
    }
}

impl From<Schemator> for MassSchemator {
    fn from(schemator: Schemator) -> Self {
        Self::new(schemator)
    }
}

/// Lazy sequence of converted items
pub struct Generate<'a, I> {
    schemator: &'a Schemator,
    schema: &'a Schema,
    items: I,
    position: usize,
    failed: bool,
    exhausted: bool,
}

impl<'a, I> Generate<'a, I> {
    /// Whether a conversion failed and the sequence has ended
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Number of items pulled so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a, I> Iterator for Generate<'a, I>
where
    I: Iterator,
    I::Item: Borrow<Value>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.exhausted {
            return None;
        }

        let Some(item) = self.items.next() else {
            self.exhausted = true;
            return None;
        };
        self.position += 1;

        let converted = self.schemator.convert(item.borrow(), self.schema);
        if let Err(err) = &converted {
            log::debug!("Batch item {} failed: {}", self.position - 1, err);
            self.failed = true;
        }
        Some(converted)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed || self.exhausted {
            (0, Some(0))
        } else {
            let (_, upper) = self.items.size_hint();
            (0, upper)
        }
    }
}

impl<'a, I> FusedIterator for Generate<'a, I>
where
    I: Iterator,
    I::Item: Borrow<Value>,
{
}
