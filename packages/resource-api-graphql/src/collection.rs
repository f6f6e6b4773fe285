//! Collections handed to the serializer by resolvers.

/// A page of a larger collection, along with the counters needed to render
/// pagination metadata.
pub trait PaginatedCollection<T> {
    /// Number of items across all pages.
    fn total_items(&self) -> u64;

    /// Number of items on the current page.
    fn count(&self) -> u64;

    /// Maximum number of items per page. `0` means pagination is unbounded.
    fn items_per_page(&self) -> f64;

    /// 1-based number of the current page.
    fn current_page(&self) -> f64;

    fn last_page(&self) -> f64;

    /// Items of the current page, in order.
    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_>;
}

/// Any collection a resolver can return.
pub trait ResourceCollection<T> {
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;

    /// The paginator view of this collection, if it has one.
    fn as_paginated(&self) -> Option<&dyn PaginatedCollection<T>> {
        None
    }
}

impl<T> ResourceCollection<T> for Vec<T> {
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.as_slice().iter())
    }
}

/// Paginates an in-memory result set.
#[derive(Debug, Clone)]
pub struct ArrayPaginator<T> {
    results: Vec<T>,
    offset: usize,
    max_results: usize,
}

impl<T> ArrayPaginator<T> {
    pub fn new(results: Vec<T>, offset: usize, max_results: usize) -> Self {
        Self {
            results,
            offset,
            max_results,
        }
    }

    fn page(&self) -> &[T] {
        let start = self.offset.min(self.results.len());
        let end = match self.max_results {
            0 => self.results.len(),
            max => start.saturating_add(max).min(self.results.len()),
        };

        &self.results[start..end]
    }
}

impl<T> PaginatedCollection<T> for ArrayPaginator<T> {
    fn total_items(&self) -> u64 {
        self.results.len() as u64
    }

    fn count(&self) -> u64 {
        self.page().len() as u64
    }

    fn items_per_page(&self) -> f64 {
        self.max_results as f64
    }

    fn current_page(&self) -> f64 {
        match self.max_results {
            0 => 1.,
            max => (self.offset / max) as f64 + 1.,
        }
    }

    fn last_page(&self) -> f64 {
        match self.max_results {
            0 => 1.,
            max => (self.results.len() as f64 / max as f64).ceil().max(1.),
        }
    }

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.page().iter())
    }
}

impl<T> ResourceCollection<T> for ArrayPaginator<T> {
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        PaginatedCollection::items(self)
    }

    fn as_paginated(&self) -> Option<&dyn PaginatedCollection<T>> {
        Some(self)
    }
}

/// A page fetched elsewhere, e.g. with `LIMIT`/`OFFSET`, together with the
/// counters reported by the data source.
#[derive(Debug, Clone)]
pub struct TraversablePaginator<T> {
    items: Vec<T>,
    current_page: f64,
    items_per_page: f64,
    total_items: u64,
}

impl<T> TraversablePaginator<T> {
    pub fn new(
        items: Vec<T>,
        current_page: f64,
        items_per_page: f64,
        total_items: u64,
    ) -> Self {
        Self {
            items,
            current_page,
            items_per_page,
            total_items,
        }
    }
}

impl<T> PaginatedCollection<T> for TraversablePaginator<T> {
    fn total_items(&self) -> u64 {
        self.total_items
    }

    fn count(&self) -> u64 {
        self.items.len() as u64
    }

    fn items_per_page(&self) -> f64 {
        self.items_per_page
    }

    fn current_page(&self) -> f64 {
        self.current_page
    }

    fn last_page(&self) -> f64 {
        if self.items_per_page <= 0. {
            return 1.;
        }

        (self.total_items as f64 / self.items_per_page).ceil().max(1.)
    }

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.items.iter())
    }
}

impl<T> ResourceCollection<T> for TraversablePaginator<T> {
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        PaginatedCollection::items(self)
    }

    fn as_paginated(&self) -> Option<&dyn PaginatedCollection<T>> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_array_paginator_slices_results() {
        let paginator = ArrayPaginator::new((0..25).collect::<Vec<u32>>(), 20, 10);

        assert_eq!(paginator.total_items(), 25);
        assert_eq!(paginator.count(), 5);
        assert_eq!(paginator.current_page(), 3.);
        assert_eq!(paginator.last_page(), 3.);
        assert_eq!(
            PaginatedCollection::items(&paginator).copied().collect::<Vec<_>>(),
            vec![20, 21, 22, 23, 24]
        );
    }

    #[test]
    fn test_empty_array_paginator_has_one_page() {
        let paginator = ArrayPaginator::<u64>::new(vec![], 0, 10);

        assert_eq!(paginator.count(), 0);
        assert_eq!(paginator.current_page(), 1.);
        assert_eq!(paginator.last_page(), 1.);
    }

    #[test]
    fn test_array_paginator_without_page_size() {
        let paginator = ArrayPaginator::new(vec!["a", "b", "c"], 1, 0);

        assert_eq!(paginator.count(), 2);
        assert_eq!(paginator.items_per_page(), 0.);
        assert_eq!(paginator.current_page(), 1.);
        assert_eq!(paginator.last_page(), 1.);
    }

    #[test]
    fn test_array_paginator_offset_past_end() {
        let paginator = ArrayPaginator::new(vec![1, 2, 3], 10, 2);

        assert_eq!(paginator.count(), 0);
        assert_eq!(paginator.current_page(), 6.);
    }

    #[test]
    fn test_traversable_paginator_last_page() {
        let paginator = TraversablePaginator::new(vec!['f', 'g'], 2., 5., 7);
        assert_eq!(paginator.last_page(), 2.);
        assert_eq!(paginator.count(), 2);

        let empty = TraversablePaginator::<char>::new(vec![], 1., 5., 0);
        assert_eq!(empty.last_page(), 1.);

        let unbounded = TraversablePaginator::new(vec!['a'], 1., 0., 40);
        assert_eq!(unbounded.last_page(), 1.);
    }

    #[test]
    fn test_capability_probe() {
        let plain = vec![1, 2, 3];
        assert!(plain.as_paginated().is_none());
        assert_eq!(plain.iter().count(), 3);

        let paginated = ArrayPaginator::new(vec![1, 2, 3], 0, 2);
        let collection: &dyn ResourceCollection<i32> = &paginated;
        assert_eq!(collection.as_paginated().map(|p| p.count()), Some(2));
    }
}
