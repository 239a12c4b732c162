//! Pagination request and result types.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MAX_PAGE_SIZE: u32 = 100;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    size: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = ValidationError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.size)
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Result<Self, ValidationError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPage { page, size });
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

/// One page of results plus the totals needed to navigate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = u32::try_from(total_elements.div_ceil(size)).unwrap_or(u32::MAX);
        Self {
            content,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages,
        }
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page.saturating_add(1) >= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, 101).is_err());
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 60);
    }

    #[test]
    fn test_page_navigation() {
        let req = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![1, 2, 3], req, 23);

        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(page.has_next());
        assert!(!page.is_first());
        assert!(!page.is_last());
    }

    #[test]
    fn test_last_possible_page_number() {
        let req = PageRequest::new(u32::MAX, 10).unwrap();
        let page: Page<i32> = Page::new(vec![], req, 5);

        assert!(page.is_last());
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_deserialize_validates_size() {
        let ok: PageRequest = serde_json::from_str(r#"{"page":2,"size":25}"#).unwrap();
        assert_eq!(ok, PageRequest::new(2, 25).unwrap());

        assert!(serde_json::from_str::<PageRequest>(r#"{"page":0,"size":0}"#).is_err());
        assert!(serde_json::from_str::<PageRequest>(r#"{"page":0,"size":101}"#).is_err());
    }

    #[test]
    fn test_empty_page() {
        let page: Page<i32> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_first());
        assert!(page.is_last());
        assert!(!page.has_next());
    }
}
