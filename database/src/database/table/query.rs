use std::cmp::Ordering;

use strum_macros::{Display, EnumString};

use crate::model::person::Person;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// Order the records were added in
    #[default]
    Insertion,
    /// `firstname lastname`, case-insensitive
    Name,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub rows: Vec<&'a Person>,
    /// Total across all pages
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

#[tracing::instrument(skip(people))]
pub fn sort(people: &[Person], key: SortKey, direction: SortDirection) -> Vec<&Person> {
    let mut sorted: Vec<&Person> = people.iter().collect();

    if key == SortKey::Name {
        // Stable, so equal names keep insertion order
        sorted.sort_by(|a, b| compare_names(a, b));
    }

    if direction == SortDirection::Descending {
        sorted.reverse();
    }

    sorted
}

fn compare_names(a: &Person, b: &Person) -> Ordering {
    let a_name = a.full_name();
    let b_name = b.full_name();

    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then_with(|| a_name.cmp(&b_name))
}

/// Cuts one page out of `rows`. Page numbers past the end are clamped to the last page.
pub fn paginate(rows: Vec<&Person>, request: PageRequest) -> Page<'_> {
    let total = rows.len();
    let page_size = request.page_size.max(1);
    let page_count = total.div_ceil(page_size).max(1);
    let page = request.page.clamp(1, page_count);

    let rows = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        rows,
        total,
        page,
        page_count,
    }
}
