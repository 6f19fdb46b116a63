/*
 * tokenizing/route.rs
 *
 * mwtok - Library to tokenize MediaWiki wikitext
 * Copyright (C) 2019-2025 Wikijump Team
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use super::context::Context;
use std::collections::BTreeSet;

/// The identity of a parse frame: the head position and context it was
/// pushed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StackIdent {
    pub head: usize,
    pub context: Context,
}

/// The set of routes known to fail.
///
/// A route is one attempt to parse a construct from a particular position
/// with a particular context. Without this cache, inputs that keep almost
/// parsing as one construct after another (templates that look like external
/// links that look like wikilinks) re-explore the same doomed routes
/// exponentially many times.
///
/// Ordering is lexicographic on (head, context). Inserting an ident which is
/// already present has no effect.
#[derive(Debug, Default)]
pub struct RouteCache {
    routes: BTreeSet<StackIdent>,
}

impl RouteCache {
    pub fn new() -> Self {
        RouteCache::default()
    }

    #[inline]
    pub fn insert(&mut self, ident: StackIdent) {
        self.routes.insert(ident);
    }

    #[inline]
    pub fn contains(&self, ident: StackIdent) -> bool {
        self.routes.contains(&ident)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[test]
fn membership() {
    let mut cache = RouteCache::new();
    let first = StackIdent {
        head: 4,
        context: Context::TEMPLATE_NAME,
    };
    let second = StackIdent {
        head: 4,
        context: Context::EXT_LINK_URI,
    };

    assert!(cache.is_empty());
    assert!(!cache.contains(first));

    cache.insert(first);
    assert!(cache.contains(first));
    assert!(!cache.contains(second));
    assert_eq!(cache.len(), 1);

    // Duplicates are ignored
    cache.insert(first);
    assert_eq!(cache.len(), 1);

    cache.insert(second);
    assert_eq!(cache.len(), 2);
}
