//! Filtering, sorting and pagination over the directory cache.
//!
//! Everything here is a pure function of the records and the query state; the
//! view recomputes the visible page from scratch on every read.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use usuarios_api::{UserDraft, UserRecord};
use usuarios_core::Error;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Column the directory can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Backend identifier.
    Id,
    /// First name.
    FirstName,
    /// Last name.
    LastName,
    /// Email.
    Email,
    /// Login name.
    Username,
    /// Stored plain hash.
    PasswordHash,
    /// Stored MD5 digest.
    PasswordMd5,
    /// Stored SHA-1 digest.
    PasswordSha1,
    /// Account status.
    Status,
}

impl SortField {
    /// Every sortable field.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Id,
            Self::FirstName,
            Self::LastName,
            Self::Email,
            Self::Username,
            Self::PasswordHash,
            Self::PasswordMd5,
            Self::PasswordSha1,
            Self::Status,
        ]
    }

    /// Short name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first-name",
            Self::LastName => "last-name",
            Self::Email => "email",
            Self::Username => "username",
            Self::PasswordHash => "hash",
            Self::PasswordMd5 => "md5",
            Self::PasswordSha1 => "sha1",
            Self::Status => "status",
        }
    }

    /// Ascending three-way comparison of two records on this field.
    #[must_use]
    pub fn compare(self, a: &UserRecord, b: &UserRecord) -> Ordering {
        let (x, y) = (&a.fields, &b.fields);
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Status => x.status.code().cmp(&y.status.code()),
            Self::FirstName => x.first_name.cmp(&y.first_name),
            Self::LastName => x.last_name.cmp(&y.last_name),
            Self::Email => x.email.cmp(&y.email),
            Self::Username => x.username.cmp(&y.username),
            Self::PasswordHash => x.password_hash.cmp(&y.password_hash),
            Self::PasswordMd5 => x.password_md5.cmp(&y.password_md5),
            Self::PasswordSha1 => x.password_sha1.cmp(&y.password_sha1),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "id" | "idusuario" => Ok(Self::Id),
            "first-name" | "nombre" => Ok(Self::FirstName),
            "last-name" | "apellido" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "username" | "usuario" => Ok(Self::Username),
            "hash" | "contrasena-hash" => Ok(Self::PasswordHash),
            "md5" | "contrasena-md5" => Ok(Self::PasswordMd5),
            "sha1" | "contrasena-sha1" => Ok(Self::PasswordSha1),
            "status" => Ok(Self::Status),
            _ => Err(Error::InvalidRequest(format!("Unknown sort field: {s}"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Active sort column and direction. No field means original order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    field: Option<SortField>,
    direction: SortDirection,
}

impl SortState {
    /// Sort by `field` in `direction`.
    #[must_use]
    pub const fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Active field, if any.
    #[must_use]
    pub const fn field(&self) -> Option<SortField> {
        self.field
    }

    /// Active direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Column header click: a new field starts ascending, the active field
    /// flips direction.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.toggled();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Compare two records under this state.
    #[must_use]
    pub fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        self.field
            .map_or(Ordering::Equal, |field| self.direction.apply(field.compare(a, b)))
    }
}

/// True when every searchable field contains `needle`, which must already be
/// lowercase.
fn matches_lowercase(fields: &UserDraft, needle: &str) -> bool {
    [
        &fields.first_name,
        &fields.last_name,
        &fields.email,
        &fields.username,
    ]
    .iter()
    .all(|value| value.to_lowercase().contains(needle))
}

/// Case-insensitive, conjunctive match of `search` against first name, last
/// name, email and username.
#[must_use]
pub fn matches_search(fields: &UserDraft, search: &str) -> bool {
    matches_lowercase(fields, &search.to_lowercase())
}

/// Records matching `search`, in cache order.
#[must_use]
pub fn filter_records<'a>(records: &'a [UserRecord], search: &str) -> Vec<&'a UserRecord> {
    if search.is_empty() {
        return records.iter().collect();
    }
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| matches_lowercase(&record.fields, &needle))
        .collect()
}

/// Stable sort in place.
pub fn sort_records(records: &mut [&UserRecord], sort: &SortState) {
    if sort.field().is_some() {
        records.sort_by(|a, b| sort.compare(a, b));
    }
}

/// Number of pages needed for `rows` rows; zero rows means zero pages.
#[must_use]
pub const fn total_pages(rows: usize) -> usize {
    rows.div_ceil(PAGE_SIZE)
}

/// Bound a 1-based page number to `[1, max(total_pages, 1)]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of the directory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// Rows on this page.
    pub rows: Vec<&'a UserRecord>,
    /// 1-based page number after clamping.
    pub number: usize,
    /// Total pages for the filtered set.
    pub total_pages: usize,
    /// Rows in the filtered set.
    pub total_rows: usize,
}

impl Page<'_> {
    /// True when the page has no rows to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cut page `page` (1-based, clamped) out of `rows`.
#[must_use]
pub fn paginate(rows: Vec<&UserRecord>, page: usize) -> Page<'_> {
    let total_rows = rows.len();
    let total_pages = total_pages(total_rows);
    let number = clamp_page(page, total_pages);
    let start = (number - 1) * PAGE_SIZE;

    let rows = rows.into_iter().skip(start).take(PAGE_SIZE).collect();
    Page {
        rows,
        number,
        total_pages,
        total_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usuarios_api::{Status, UserId};

    fn user(id: u64, first: &str, last: &str, email: &str, username: &str) -> UserRecord {
        UserRecord::new(
            UserId::new(id),
            UserDraft {
                first_name: first.into(),
                last_name: last.into(),
                email: email.into(),
                username: username.into(),
                ..UserDraft::default()
            },
        )
    }

    fn numbered(count: u64) -> Vec<UserRecord> {
        (1..=count)
            .map(|i| user(i, &format!("n{i}"), "x", "x@x", &format!("u{i}")))
            .collect()
    }

    fn ids(rows: &[&UserRecord]) -> Vec<u64> {
        rows.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn filter_is_conjunctive_and_case_insensitive() {
        let records = vec![
            user(1, "Ana", "Anaya", "ana@ana.com", "ana"),
            user(2, "Ana", "Perez", "ana@example.com", "ana2"),
            user(3, "Juana", "Banana", "JUANA@banana.com", "juanAna"),
        ];

        assert_eq!(ids(&filter_records(&records, "ANA")), vec![1, 3]);
        assert_eq!(ids(&filter_records(&records, "ana@")), Vec::<u64>::new());
        assert_eq!(ids(&filter_records(&records, "perez")), Vec::<u64>::new());
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let records = vec![
            user(9, "b", "b", "b", "b"),
            user(2, "a", "a", "a", "a"),
            user(5, "c", "c", "c", "c"),
        ];
        assert_eq!(ids(&filter_records(&records, "")), vec![9, 2, 5]);
    }

    #[test]
    fn empty_fields_only_match_empty_search() {
        let record = user(1, "", "Lopez", "l@x", "lopez");
        assert!(matches_search(&record.fields, ""));
        assert!(!matches_search(&record.fields, "lopez"));
    }

    #[test]
    fn no_sort_field_keeps_order() {
        let records = vec![user(3, "c", "", "", ""), user(1, "a", "", "", "")];
        let mut rows = filter_records(&records, "");
        sort_records(&mut rows, &SortState::default());
        assert_eq!(ids(&rows), vec![3, 1]);
    }

    #[test]
    fn toggled_sort_reverses() {
        let records = vec![
            user(1, "Carlos", "", "", ""),
            user(2, "Ana", "", "", ""),
            user(3, "Luis", "", "", ""),
            user(4, "Beto", "", "", ""),
        ];
        let mut state = SortState::default();

        state.toggle(SortField::FirstName);
        let mut ascending = filter_records(&records, "");
        sort_records(&mut ascending, &state);
        assert_eq!(ids(&ascending), vec![2, 4, 1, 3]);

        state.toggle(SortField::FirstName);
        assert_eq!(state.direction(), SortDirection::Descending);
        let mut descending = filter_records(&records, "");
        sort_records(&mut descending, &state);

        let mut reversed = ids(&ascending);
        reversed.reverse();
        assert_eq!(ids(&descending), reversed);
    }

    #[test]
    fn toggling_new_field_restarts_ascending() {
        let mut state = SortState::by(SortField::Email, SortDirection::Descending);
        state.toggle(SortField::Id);
        assert_eq!(state.field(), Some(SortField::Id));
        assert_eq!(state.direction(), SortDirection::Ascending);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let records = vec![
            user(1, "Ana", "", "", ""),
            user(2, "Bea", "", "", ""),
            user(3, "Ana", "", "", ""),
        ];
        let mut rows = filter_records(&records, "");
        sort_records(&mut rows, &SortState::by(SortField::FirstName, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec![1, 3, 2]);
    }

    #[test]
    fn numeric_fields_sort_numerically() {
        let records = vec![user(10, "", "", "", ""), user(9, "", "", "", ""), user(100, "", "", "", "")];
        let mut rows = filter_records(&records, "");
        sort_records(&mut rows, &SortState::by(SortField::Id, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec![9, 10, 100]);

        let huge = user(u64::MAX, "", "", "", "");
        let large = user(u64::MAX - 1, "", "", "", "");
        assert_eq!(SortField::Id.compare(&large, &huge), Ordering::Less);

        let mut inactive = user(1, "", "", "", "");
        inactive.fields.status = Status::Inactive;
        let active = user(2, "", "", "", "");
        assert_eq!(SortField::Status.compare(&inactive, &active), Ordering::Less);
    }

    #[test]
    fn sort_field_parses_wire_and_short_names() {
        assert_eq!("nombre".parse::<SortField>().unwrap(), SortField::FirstName);
        assert_eq!("last_name".parse::<SortField>().unwrap(), SortField::LastName);
        assert_eq!("IDUSUARIO".parse::<SortField>().unwrap(), SortField::Id);
        assert!("age".parse::<SortField>().is_err());
        for field in SortField::all() {
            assert_eq!(field.name().parse::<SortField>().unwrap(), *field);
        }
    }

    #[test]
    fn pagination_slices_by_ten() {
        let records = numbered(23);
        assert_eq!(total_pages(23), 3);

        let page = paginate(filter_records(&records, ""), 1);
        assert_eq!(ids(&page.rows), (1..=10).collect::<Vec<_>>());

        let page = paginate(filter_records(&records, ""), 3);
        assert_eq!(ids(&page.rows), vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_rows, 23);
    }

    #[test]
    fn pagination_clamps_out_of_range() {
        let records = numbered(12);
        let page = paginate(filter_records(&records, ""), 7);
        assert_eq!(page.number, 2);
        assert_eq!(ids(&page.rows), vec![11, 12]);

        let page = paginate(filter_records(&records, ""), 0);
        assert_eq!(page.number, 1);
    }

    #[test]
    fn empty_set_has_zero_pages_but_shows_page_one() {
        let page = paginate(Vec::new(), 4);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.number, 1);
        assert!(page.is_empty());
    }
}
