//! Pagination requests and result pages

use super::boundary::Boundary;
use super::ordering::Sort;
use crate::errors::QueryError;

/// A zero-based page number with a page size and optional sort
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Sort,
}

impl PageRequest {
    pub fn of(page: u64, size: u64) -> Result<Self, QueryError> {
        Self::of_sorted(page, size, Sort::unsorted())
    }

    pub fn of_sorted(page: u64, size: u64, sort: Sort) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::invalid_argument(
                "Page size must not be less than one",
            ));
        }
        Ok(Self { page, size, sort })
    }

    pub fn page_number(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Number of rows preceding this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn previous_or_first(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            ..self.clone()
        }
    }

    pub fn first(&self) -> Self {
        self.with_page(0)
    }

    pub fn with_page(&self, page: u64) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Pagination information handed to a query
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Pageable {
    /// No paging: all rows, no sort
    #[default]
    Unpaged,
    /// A page request, optionally decorated with a boundary that restricts the
    /// rows considered before paging
    Paged {
        request: PageRequest,
        boundary: Option<Boundary>,
    },
}

impl Pageable {
    pub fn unpaged() -> Self {
        Pageable::Unpaged
    }

    pub fn of(page: u64, size: u64) -> Result<Self, QueryError> {
        Ok(PageRequest::of(page, size)?.into())
    }

    pub fn of_sorted(page: u64, size: u64, sort: Sort) -> Result<Self, QueryError> {
        Ok(PageRequest::of_sorted(page, size, sort)?.into())
    }

    /// Attach `boundary` to a paged request; unpaged stays unpaged
    pub fn with_boundary(&self, boundary: Boundary) -> Self {
        match self {
            Pageable::Unpaged => Pageable::Unpaged,
            Pageable::Paged { request, .. } => Pageable::Paged {
                request: request.clone(),
                boundary: Some(boundary),
            },
        }
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, Pageable::Paged { .. })
    }

    pub fn is_unpaged(&self) -> bool {
        !self.is_paged()
    }

    pub fn request(&self) -> Option<&PageRequest> {
        match self {
            Pageable::Unpaged => None,
            Pageable::Paged { request, .. } => Some(request),
        }
    }

    pub fn boundary(&self) -> Option<&Boundary> {
        match self {
            Pageable::Unpaged => None,
            Pageable::Paged { boundary, .. } => boundary.as_ref(),
        }
    }

    pub fn page_number(&self) -> Option<u64> {
        self.request().map(PageRequest::page_number)
    }

    pub fn page_size(&self) -> Option<u64> {
        self.request().map(PageRequest::page_size)
    }

    pub fn offset(&self) -> Option<u64> {
        self.request().map(PageRequest::offset)
    }

    pub fn sort(&self) -> Sort {
        self.request()
            .map(|request| request.sort().clone())
            .unwrap_or_default()
    }

    /// The following page, keeping any attached boundary
    pub fn next(&self) -> Self {
        self.map_request(PageRequest::next)
    }

    pub fn previous_or_first(&self) -> Self {
        self.map_request(PageRequest::previous_or_first)
    }

    pub fn first(&self) -> Self {
        self.map_request(PageRequest::first)
    }

    fn map_request(&self, f: impl FnOnce(&PageRequest) -> PageRequest) -> Self {
        match self {
            Pageable::Unpaged => Pageable::Unpaged,
            Pageable::Paged { request, boundary } => Pageable::Paged {
                request: f(request),
                boundary: boundary.clone(),
            },
        }
    }
}

impl From<PageRequest> for Pageable {
    fn from(request: PageRequest) -> Self {
        Pageable::Paged {
            request,
            boundary: None,
        }
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    pageable: Pageable,
    total: u64,
}

impl<T> Page<T> {
    /// Create a page. When the content shows the total must be larger than
    /// reported (or no total is known), the total is derived from the content.
    pub fn new(content: Vec<T>, pageable: Pageable, total: u64) -> Self {
        let total = match pageable.request() {
            Some(request) if !content.is_empty() => {
                let minimum = request.offset().saturating_add(content.len() as u64);
                // A short page implies the exact total
                if (content.len() as u64) < request.page_size() {
                    minimum
                } else {
                    total.max(minimum)
                }
            }
            Some(_) => total,
            None => total.max(content.len() as u64),
        };

        Self {
            content,
            pageable,
            total,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn pageable(&self) -> &Pageable {
        &self.pageable
    }

    pub fn total_elements(&self) -> u64 {
        self.total
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn number(&self) -> u64 {
        self.pageable.page_number().unwrap_or(0)
    }

    pub fn size(&self) -> u64 {
        self.pageable
            .page_size()
            .unwrap_or(self.content.len() as u64)
    }

    pub fn total_pages(&self) -> u64 {
        match self.pageable.page_size() {
            Some(size) => self.total.div_ceil(size),
            None => 1,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number().saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number() > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset_and_navigation() {
        let request = PageRequest::of(2, 10).unwrap();
        assert_eq!(request.offset(), 20);
        assert_eq!(request.next().page_number(), 3);
        assert_eq!(request.previous_or_first().page_number(), 1);
        assert_eq!(request.first().page_number(), 0);
        assert_eq!(request.first().previous_or_first().page_number(), 0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            PageRequest::of(0, 0),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_boundary_survives_navigation() {
        let boundary = Boundary::by("age", 5..10).unwrap();
        let pageable = Pageable::of(0, 5).unwrap().with_boundary(boundary.clone());

        assert_eq!(pageable.next().boundary(), Some(&boundary));
        assert_eq!(pageable.next().page_number(), Some(1));
        assert!(Pageable::unpaged().with_boundary(boundary).is_unpaged());
    }

    #[test]
    fn test_page_totals() {
        let page = Page::new(vec![1, 2], Pageable::of(1, 2).unwrap(), 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::new(vec![5], Pageable::of(2, 2).unwrap(), 5);
        assert!(last.is_last());
    }

    #[test]
    fn test_short_page_derives_total() {
        let page = Page::new(vec!["a", "b"], Pageable::of(0, 10).unwrap(), 0);
        assert_eq!(page.total_elements(), 2);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_last_representable_page_saturates() {
        let pageable = Pageable::of(u64::MAX, 2).unwrap();
        assert_eq!(pageable.next().page_number(), Some(u64::MAX));

        let page = Page::new(vec![1], pageable, 0);
        assert_eq!(page.total_elements(), u64::MAX);
        assert!(page.is_last());
    }

    #[test]
    fn test_unpaged_page() {
        let page = Page::new(vec![1, 2, 3], Pageable::unpaged(), 0);
        assert_eq!(page.total_elements(), 3);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.map(|v| v * 2).content(), &[2, 4, 6]);
    }
}
