use std::ops::Range;

/// Outcome of a page turn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Moved(usize),
    AtFirst,
    AtLast,
}

impl Turn {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Turn::Moved(_) => None,
            Turn::AtFirst => Some("Already at the first page."),
            Turn::AtLast => Some("Already at the last page."),
        }
    }
}

pub fn total_pages(items: usize, page_size: usize) -> usize {
    items.div_ceil(page_size.max(1))
}

/// Half-open index range of `page` (1-based); empty past the end.
pub fn window(items: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size).min(items);
    let end = page.max(1).saturating_mul(page_size).min(items);
    start..end
}

pub fn next(page: usize, total: usize) -> Turn {
    if page < total {
        Turn::Moved(page + 1)
    } else {
        Turn::AtLast
    }
}

pub fn prev(page: usize) -> Turn {
    if page > 1 {
        Turn::Moved(page - 1)
    } else {
        Turn::AtFirst
    }
}

/// Current page of one paged collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn total_pages(&self, items: usize) -> usize {
        total_pages(items, self.page_size)
    }

    pub fn window(&self, items: usize) -> Range<usize> {
        window(items, self.page_size, self.page)
    }

    pub fn next(&mut self, items: usize) -> Turn {
        let turn = next(self.page, self.total_pages(items));
        if let Turn::Moved(page) = turn {
            self.page = page;
        }
        turn
    }

    pub fn prev(&mut self) -> Turn {
        let turn = prev(self.page);
        if let Turn::Moved(page) = turn {
            self.page = page;
        }
        turn
    }

    /// `page/total` as shown in footers, e.g. `1/0` for an empty collection.
    pub fn label(&self, items: usize) -> String {
        format!("{}/{}", self.page, self.total_pages(items))
    }
}
