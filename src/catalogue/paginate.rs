use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_index(&self, page_size: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * page_size.max(1) + 1
        }
    }

    pub fn last_index(&self, page_size: usize) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index(page_size) + self.items.len() - 1
        }
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Slices one page out of `items`. Page 0 is read as 1 and pages past the end
/// clamp to the last page.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let page = page.clamp(1, total);
    let start = (page - 1) * size;
    let end = (start + size).min(items.len());
    let slice = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    Page {
        items: slice,
        page,
        total_pages: total,
        total_items: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_one_empty_page() {
        let page = paginate::<u32>(&[], 12, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.is_empty());
        assert_eq!(page.first_index(12), 0);
    }

    #[test]
    fn page_zero_reads_as_first() {
        let items: Vec<u32> = (0..5).collect();
        let page = paginate(&items, 2, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![0, 1]);
    }

    #[test]
    fn range_indices() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(&items, 12, 2);
        assert_eq!(page.first_index(12), 13);
        assert_eq!(page.last_index(12), 24);
    }
}
