use super::error::PageError;

/// One page of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    /// 1-based.
    pub page_number: usize,
    pub total_pages: usize,
}

/// `ceil(len / page_size)`, never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Pull a requested page number into `1..=total_pages`.
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// Slice out page `page_number` (1-based) of `view`.
///
/// Callers clamp with [`clamp_page`] first; an out-of-range page is an error.
pub fn page<T>(view: &[T], page_size: usize, page_number: usize) -> Result<Page<'_, T>, PageError> {
    if page_size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    let total = total_pages(view.len(), page_size);
    if !(1..=total).contains(&page_number) {
        return Err(PageError::InvalidPage {
            page: page_number,
            total_pages: total,
        });
    }

    let start = (page_number - 1) * page_size;
    let end = (start + page_size).min(view.len());
    Ok(Page {
        rows: &view[start.min(end)..end],
        page_number,
        total_pages: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_cover_the_view_exactly() {
        let view: Vec<usize> = (0..23).collect();
        for size in 1..=25 {
            let total = total_pages(view.len(), size);
            let mut seen = Vec::new();
            for p in 1..=total {
                seen.extend_from_slice(page(&view, size, p).unwrap().rows);
            }
            assert_eq!(seen, view, "page size {size}");
        }
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let view: Vec<usize> = (0..23).collect();
        let last = page(&view, 10, 3).unwrap();
        assert_eq!(last.rows, &[20, 21, 22]);
        assert_eq!(last.total_pages, 3);
    }

    #[test]
    fn empty_view_has_one_empty_page() {
        let view: Vec<usize> = Vec::new();
        let only = page(&view, 10, 1).unwrap();
        assert!(only.rows.is_empty());
        assert_eq!(only.total_pages, 1);
    }

    #[test]
    fn out_of_range_pages_are_rejected() {
        let view: Vec<usize> = (0..5).collect();
        assert_eq!(
            page(&view, 2, 0),
            Err(PageError::InvalidPage {
                page: 0,
                total_pages: 3
            })
        );
        assert_eq!(
            page(&view, 2, 4),
            Err(PageError::InvalidPage {
                page: 4,
                total_pages: 3
            })
        );
        assert_eq!(page(&view, 0, 1), Err(PageError::ZeroPageSize));
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_page(0, 4), 1);
        assert_eq!(clamp_page(9, 4), 4);
        assert_eq!(clamp_page(3, 4), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }
}
