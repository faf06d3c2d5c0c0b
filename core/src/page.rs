use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const PER_PAGE_CHOICES: [usize; 4] = [5, 10, 20, 50];

/// One window over a result list. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: usize,
    pub per_page: usize,
    pub total_results: usize,
    pub total_pages: usize,
    /// Offset of the first result on this page.
    pub start: usize,
    /// One past the last result on this page.
    pub end: usize,
}

impl Page {
    /// `number` is clamped into `1..=total_pages`; a `per_page` of 0 is read as 1.
    pub fn new(total_results: usize, per_page: usize, number: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_results.div_ceil(per_page);
        let number = number.clamp(1, total_pages.max(1));
        let start = ((number - 1) * per_page).min(total_results);
        let end = (start + per_page).min(total_results);
        Self { number, per_page, total_results, total_pages, start, end }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        &items[self.start.min(end)..end]
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_cover_every_result_once() {
        let items: Vec<usize> = (0..23).collect();
        let first = Page::new(items.len(), 10, 1);
        assert_eq!(first.total_pages, 3);
        let mut seen = Vec::new();
        for n in 1..=first.total_pages {
            seen.extend_from_slice(Page::new(items.len(), 10, n).slice(&items));
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn clamps_page_number() {
        let p = Page::new(7, 5, 9);
        assert_eq!((p.number, p.start, p.end), (2, 5, 7));
        assert!(!p.has_next());
        assert!(p.has_previous());
        assert_eq!(Page::new(7, 5, 0).number, 1);
    }

    #[test]
    fn empty_results_give_an_empty_first_page() {
        let p = Page::new(0, 10, 3);
        assert_eq!((p.number, p.total_pages, p.start, p.end), (1, 0, 0, 0));
        assert!(p.slice::<u8>(&[]).is_empty());
    }
}
