use itertools::Itertools;

use super::escape_html;

const MAX_BUTTONS: usize = 7;
const ELLIPSIS: &str = "\u{2026}";

/// One pagination button. `target` is the page a click selects; gaps in a
/// long page list have no target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageControl {
    pub label: String,
    pub target: Option<usize>,
    pub active: bool,
    pub disabled: bool,
}

impl PageControl {
    fn number(page: usize, current: usize) -> Self {
        Self {
            label: page.to_string(),
            target: Some(page),
            active: page == current,
            disabled: false,
        }
    }

    fn gap() -> Self {
        Self {
            label: ELLIPSIS.to_string(),
            target: None,
            active: false,
            disabled: true,
        }
    }
}

/// Prev, page numbers and next for `current` of `total`. Long ranges keep
/// the first and last page plus two either side of the current one.
pub fn controls(current: usize, total: usize) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let mut out = Vec::with_capacity(MAX_BUTTONS + 4);

    out.push(PageControl {
        label: "Prev".to_string(),
        target: Some(current.saturating_sub(1).max(1)),
        active: false,
        disabled: current <= 1,
    });

    if total <= MAX_BUTTONS {
        out.extend((1..=total).map(|p| PageControl::number(p, current)));
    } else {
        let left = current.saturating_sub(2).max(1);
        let right = (current + 2).min(total);
        out.push(PageControl::number(1, current));
        if left > 2 {
            out.push(PageControl::gap());
        }
        out.extend(
            (left..=right)
                .filter(|p| *p != 1 && *p != total)
                .map(|p| PageControl::number(p, current)),
        );
        if right + 1 < total {
            out.push(PageControl::gap());
        }
        out.push(PageControl::number(total, current));
    }

    out.push(PageControl {
        label: "Next".to_string(),
        target: Some((current + 1).min(total)),
        active: false,
        disabled: current >= total,
    });
    out
}

pub fn render_controls(controls: &[PageControl]) -> String {
    if controls.is_empty() {
        return String::new();
    }
    let buttons = controls
        .iter()
        .map(|c| match c.target {
            Some(target) => {
                let mut class = String::from("page-btn");
                if c.active {
                    class.push_str(" active");
                }
                format!(
                    r#"<button type="button" class="{}" data-page="{}"{}{}>{}</button>"#,
                    class,
                    target,
                    if c.active { r#" aria-current="page""# } else { "" },
                    if c.disabled { " disabled" } else { "" },
                    escape_html(&c.label)
                )
            }
            None => format!(r#"<span class="page-gap">{}</span>"#, escape_html(&c.label)),
        })
        .join("");
    format!(r#"<nav class="pagination" aria-label="Pages">{buttons}</nav>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(controls: &[PageControl]) -> Vec<&str> {
        controls.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn single_page_has_no_controls() {
        assert!(controls(1, 1).is_empty());
        assert_eq!(render_controls(&controls(1, 1)), "");
    }

    #[test]
    fn short_range_lists_every_page() {
        let c = controls(2, 3);
        assert_eq!(labels(&c), vec!["Prev", "1", "2", "3", "Next"]);
        assert!(c[2].active);
        assert!(!c[0].disabled);
        assert_eq!(c[0].target, Some(1));
    }

    #[test]
    fn edges_disable_prev_and_next() {
        let first = controls(1, 3);
        assert!(first[0].disabled);
        let last = controls(3, 3);
        assert!(last.last().unwrap().disabled);
    }

    #[test]
    fn long_range_collapses_with_gaps() {
        let c = controls(10, 20);
        assert_eq!(
            labels(&c),
            vec!["Prev", "1", "\u{2026}", "8", "9", "10", "11", "12", "\u{2026}", "20", "Next"]
        );
    }

    #[test]
    fn rendered_buttons_carry_target_page() {
        let html = render_controls(&controls(1, 2));
        assert!(html.contains(r#"data-page="2""#));
        assert!(html.contains(r#"class="page-btn active" data-page="1" aria-current="page""#));
    }
}
