//! Offset pagination.

use serde::Serialize;

/// Whether a page reports the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Only "has more" is reported.
    Simple,
    /// Total count is reported alongside "has more".
    Standard,
}

/// Pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number.
    pub page: u32,
    pub per_page: u32,
    pub mode: PageMode,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: u32, mode: PageMode) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.clamp(1, 100),
            mode,
        }
    }

    pub fn standard(page: Option<u32>, per_page: u32) -> Self {
        Self::new(page, per_page, PageMode::Standard)
    }

    pub fn simple(page: Option<u32>, per_page: u32) -> Self {
        Self::new(page, per_page, PageMode::Simple)
    }

    /// The first matching row only.
    pub fn first() -> Self {
        Self::simple(Some(1), 1)
    }

    /// Every matching row on a single page.
    pub fn all() -> Self {
        Self {
            page: 1,
            per_page: u32::MAX,
            mode: PageMode::Simple,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.per_page as usize)
    }
}

/// Parse a raw `page` request value. Anything malformed is page 1.
pub fn parse_page(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&p| p > 0)
}

/// One page of an ordered result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub has_more: bool,

    /// Present for standard pagination only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Cut one page out of the complete, already ordered result.
    pub fn from_rows(rows: Vec<T>, request: PageRequest) -> Self {
        let len = rows.len();
        let start = request.offset().min(len);
        let end = start.saturating_add(request.per_page as usize).min(len);

        let items: Vec<T> = rows.into_iter().skip(start).take(end - start).collect();

        Self {
            items,
            current_page: request.page,
            per_page: request.per_page,
            has_more: end < len,
            total: match request.mode {
                PageMode::Standard => Some(len as u64),
                PageMode::Simple => None,
            },
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            has_more: self.has_more,
            total: self.total,
        }
    }

    /// Like [`Page::map`] but drops items `f` rejects. Metadata is kept as is.
    pub fn filter_map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> Option<U>,
    {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            has_more: self.has_more,
            total: self.total,
        }
    }

    /// Last page number, when the total is known.
    pub fn last_page(&self) -> Option<u32> {
        self.total.map(|total| {
            let pages = total.div_ceil(u64::from(self.per_page)).max(1);
            u32::try_from(pages).unwrap_or(u32::MAX)
        })
    }
}
