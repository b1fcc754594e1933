//! Explicit state for a paged list of backend entities.

use crate::types::Page;

/// Position within a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
}

impl PageCursor {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            total_pages: 0,
        }
    }

    fn last_page(&self) -> u32 {
        self.total_pages.saturating_sub(1)
    }

    /// Jump to `page`, clamped to the known page range. Before the first
    /// query the total is unknown and any page is accepted.
    pub fn go_to(&mut self, page: u32) {
        self.page = if self.total_pages == 0 {
            page
        } else {
            page.min(self.last_page())
        };
    }
}

/// The entities currently shown for one paged query.
///
/// Each backend round-trip replaces the items wholesale; there is no
/// merging with concurrent edits from other clients.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    items: Vec<T>,
    cursor: PageCursor,
}

impl<T> Listing<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::new(page_size),
        }
    }

    /// Replace the displayed items with a freshly fetched page.
    pub fn replace(&mut self, page: Page<T>) {
        self.items = page.content;
        self.cursor.total_pages = page.total_pages;
        if self.cursor.page > self.cursor.last_page() {
            self.cursor.page = self.cursor.last_page();
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }
}
