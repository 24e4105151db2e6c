//! User directory view state.

use std::sync::Arc;
use tracing::{debug, warn};
use usuarios_api::{UserDraft, UserId, UserRecord};
use usuarios_core::{Error, Result};

use crate::api::DirectoryApi;
use crate::form::{FormField, Modal};
use crate::query::{self, Page, SortDirection, SortField, SortState};

/// Cached user list plus the search, sort, page and modal state of the
/// directory table.
///
/// The async operations issue one request and apply its result. An event loop
/// that runs requests concurrently can instead call the `apply_*` methods as
/// responses arrive; the last one applied wins.
pub struct Directory {
    api: Arc<dyn DirectoryApi>,
    users: Vec<UserRecord>,
    search: String,
    sort: SortState,
    page: usize,
    modal: Modal,
}

impl Directory {
    /// Empty directory backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self {
            api,
            users: Vec::new(),
            search: String::new(),
            sort: SortState::default(),
            page: 1,
            modal: Modal::Closed,
        }
    }

    /// The cache, in load/insert order.
    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Cached record by identifier.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    // -- query state --------------------------------------------------------

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text and go back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Current sort state.
    #[must_use]
    pub const fn sort(&self) -> SortState {
        self.sort
    }

    /// Header click on `field`.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Sort by `field` in `direction`.
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.sort = SortState::by(field, direction);
    }

    /// Back to cache order.
    pub fn clear_sort(&mut self) {
        self.sort = SortState::default();
    }

    /// Filtered and sorted rows, recomputed on every call.
    #[must_use]
    pub fn visible(&self) -> Vec<&UserRecord> {
        let mut rows = query::filter_records(&self.users, &self.search);
        query::sort_records(&mut rows, &self.sort);
        rows
    }

    /// Page count for the current filter.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        query::total_pages(self.visible().len())
    }

    /// Current page number, clamped to the filtered set.
    #[must_use]
    pub fn page_number(&self) -> usize {
        query::clamp_page(self.page, self.total_pages())
    }

    /// Rows of the current page.
    #[must_use]
    pub fn current_page(&self) -> Page<'_> {
        query::paginate(self.visible(), self.page)
    }

    /// Jump to `page`, bounded to the available pages.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = query::clamp_page(page, self.total_pages());
    }

    /// First page.
    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Previous page, stopping at the first.
    pub fn previous_page(&mut self) {
        let current = self.page_number();
        self.go_to_page(current.saturating_sub(1));
    }

    /// Next page, stopping at the last.
    pub fn next_page(&mut self) {
        let current = self.page_number();
        self.go_to_page(current + 1);
    }

    /// Last page.
    pub fn last_page(&mut self) {
        self.go_to_page(self.total_pages());
    }

    // -- modal --------------------------------------------------------------

    /// Modal state.
    #[must_use]
    pub const fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Open the modal on an empty draft.
    pub fn open_create(&mut self) {
        self.modal = Modal::Creating(UserDraft::default());
    }

    /// Open the modal on a copy of cached record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` is not cached.
    pub fn open_edit(&mut self, id: UserId) -> Result<()> {
        let record = self
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {id} is not in the directory")))?;
        self.modal = Modal::Editing(record);
        Ok(())
    }

    /// Type into a modal input. Returns false when the modal is closed.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        self.modal.set(field, value)
    }

    /// Close the modal, discarding its buffer.
    pub fn cancel(&mut self) {
        self.modal = Modal::Closed;
    }

    // -- remote operations --------------------------------------------------

    /// Fetch all users and replace the cache. On failure the cache is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns the API error after logging it.
    pub async fn load(&mut self) -> Result<usize> {
        let result = self.api.list_users().await;
        match result {
            Ok(users) => {
                self.apply_loaded(users);
                Ok(self.users.len())
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "failed to load users");
                self.users.clear();
                Err(err)
            }
        }
    }

    /// Submit the modal: create from a draft or update from an edit buffer.
    /// The modal closes on success and stays open with its input on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the modal is closed, or the API
    /// error after logging it.
    pub async fn submit(&mut self) -> Result<UserRecord> {
        match self.modal.clone() {
            Modal::Closed => Err(Error::InvalidRequest("no form is open".to_string())),
            Modal::Creating(draft) => self.create(&draft).await,
            Modal::Editing(record) => self.update(&record).await,
        }
    }

    async fn create(&mut self, draft: &UserDraft) -> Result<UserRecord> {
        let result = self.api.create_user(draft).await;
        match result {
            Ok(created) => {
                self.apply_created(created.clone());
                self.modal = Modal::Closed;
                Ok(created)
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "failed to create user");
                Err(err)
            }
        }
    }

    async fn update(&mut self, record: &UserRecord) -> Result<UserRecord> {
        let result = self.api.update_user(record).await;
        match result {
            Ok(updated) => {
                self.apply_updated(updated.clone());
                self.modal = Modal::Closed;
                Ok(updated)
            }
            Err(err) => {
                warn!(id = %record.id, code = err.error_code(), error = %err, "failed to update user");
                Err(err)
            }
        }
    }

    /// Delete user `id` remotely, then drop it from the cache.
    ///
    /// # Errors
    ///
    /// Returns the API error after logging it; the cache is left unchanged.
    pub async fn delete(&mut self, id: UserId) -> Result<()> {
        let result = self.api.delete_user(id).await;
        match result {
            Ok(()) => {
                self.apply_deleted(id);
                Ok(())
            }
            Err(err) => {
                warn!(%id, code = err.error_code(), error = %err, "failed to delete user");
                Err(err)
            }
        }
    }

    // -- completions --------------------------------------------------------

    /// Replace the cache with a loaded list.
    pub fn apply_loaded(&mut self, users: Vec<UserRecord>) {
        debug!(count = users.len(), "directory loaded");
        self.users = users;
    }

    /// Append a created record. An identifier already cached is replaced in
    /// place so identifiers stay unique.
    pub fn apply_created(&mut self, record: UserRecord) {
        if let Some(slot) = self.users.iter_mut().find(|user| user.id == record.id) {
            *slot = record;
        } else {
            debug!(id = %record.id, "user added to directory");
            self.users.push(record);
        }
    }

    /// Replace the cached record with the same identifier. Returns false if
    /// it is no longer cached.
    pub fn apply_updated(&mut self, record: UserRecord) -> bool {
        if let Some(slot) = self.users.iter_mut().find(|user| user.id == record.id) {
            *slot = record;
            true
        } else {
            debug!(id = %record.id, "updated user is no longer cached");
            false
        }
    }

    /// Drop a record from the cache. Returns false if it was not cached.
    pub fn apply_deleted(&mut self, id: UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|user| user.id != id);
        before != self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDirectoryApi;
    use usuarios_api::Status;

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord::new(
            UserId::new(id),
            UserDraft {
                first_name: name.into(),
                last_name: format!("{name}son"),
                email: format!("{}@example.com", name.to_lowercase()),
                username: name.to_lowercase(),
                ..UserDraft::default()
            },
        )
    }

    fn ids(directory: &Directory) -> Vec<u64> {
        directory.users().iter().map(|u| u.id.get()).collect()
    }

    fn directory_with(mock: MockDirectoryApi, users: Vec<UserRecord>) -> Directory {
        let mut directory = Directory::new(Arc::new(mock));
        directory.apply_loaded(users);
        directory
    }

    #[tokio::test]
    async fn load_replaces_cache() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_list_users()
            .times(1)
            .returning(|| Ok(vec![user(5, "Ana"), user(7, "Beto")]));

        let mut directory = directory_with(mock, vec![user(1, "Old")]);
        assert_eq!(directory.load().await.unwrap(), 2);
        assert_eq!(ids(&directory), vec![5, 7]);
    }

    #[tokio::test]
    async fn load_failure_leaves_empty_cache() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_list_users()
            .returning(|| Err(Error::ServiceUnavailable("connection refused".into())));

        let mut directory = Directory::new(Arc::new(mock));
        let err = directory.load().await.unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
        assert!(directory.users().is_empty());
        assert!(directory.current_page().is_empty());
    }

    #[tokio::test]
    async fn create_appends_and_closes_modal() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_create_user()
            .withf(|draft| draft.email == "carla@example.com" && draft.status == Status::Active)
            .times(1)
            .returning(|draft| Ok(UserRecord::new(UserId::new(42), draft.clone())));

        let mut directory = directory_with(mock, vec![user(5, "Ana")]);
        directory.open_create();
        directory.set_field(FormField::FirstName, "Carla");
        directory.set_field(FormField::Email, "carla@example.com");

        let created = directory.submit().await.unwrap();
        assert_eq!(created.id, UserId::new(42));
        assert_eq!(ids(&directory), vec![5, 42]);
        assert_eq!(
            directory.users().iter().filter(|u| u.id == UserId::new(42)).count(),
            1
        );
        assert!(!directory.modal().is_open());

        // the next create starts from an empty draft
        directory.open_create();
        assert_eq!(directory.modal().fields(), Some(&UserDraft::default()));
    }

    #[tokio::test]
    async fn create_failure_keeps_modal_open() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_create_user()
            .returning(|_| Err(Error::BadRequest("email required".into())));

        let mut directory = directory_with(mock, Vec::new());
        directory.open_create();
        directory.set_field(FormField::FirstName, "Carla");

        let err = directory.submit().await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(directory.users().is_empty());
        assert_eq!(
            directory.modal().fields().map(|f| f.first_name.as_str()),
            Some("Carla")
        );
    }

    #[tokio::test]
    async fn create_with_existing_identifier_does_not_duplicate() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_create_user()
            .returning(|draft| Ok(UserRecord::new(UserId::new(5), draft.clone())));

        let mut directory = directory_with(mock, vec![user(5, "Ana")]);
        directory.open_create();
        directory.set_field(FormField::FirstName, "Zoe");
        directory.submit().await.unwrap();

        assert_eq!(ids(&directory), vec![5]);
        assert_eq!(directory.users()[0].fields.first_name, "Zoe");
    }

    #[tokio::test]
    async fn update_replaces_only_matching_record() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_update_user()
            .withf(|record| record.id == UserId::new(7) && record.fields.email == "beto@new.com")
            .times(1)
            .returning(|record| Ok(record.clone()));

        let original = vec![user(5, "Ana"), user(7, "Beto"), user(9, "Ciro")];
        let mut directory = directory_with(mock, original.clone());
        directory.open_edit(UserId::new(7)).unwrap();
        directory.set_field(FormField::Email, "beto@new.com");

        directory.submit().await.unwrap();
        assert!(!directory.modal().is_open());
        assert_eq!(ids(&directory), vec![5, 7, 9]);
        assert_eq!(directory.users()[0], original[0]);
        assert_eq!(directory.users()[1].fields.email, "beto@new.com");
        assert_eq!(directory.users()[2], original[2]);
    }

    #[tokio::test]
    async fn update_failure_keeps_cache_and_buffer() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_update_user()
            .returning(|_| Err(Error::Timeout("slow".into())));

        let mut directory = directory_with(mock, vec![user(7, "Beto")]);
        directory.open_edit(UserId::new(7)).unwrap();
        directory.set_field(FormField::Email, "beto@new.com");

        assert!(directory.submit().await.is_err());
        assert_eq!(directory.users()[0].fields.email, "beto@example.com");
        assert!(directory.modal().is_open());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_delete_user()
            .withf(|id| *id == UserId::new(7))
            .times(1)
            .returning(|_| Ok(()));

        let mut directory =
            directory_with(mock, vec![user(5, "Ana"), user(7, "Beto"), user(9, "Ciro")]);
        directory.delete(UserId::new(7)).await.unwrap();
        assert_eq!(ids(&directory), vec![5, 9]);
    }

    #[tokio::test]
    async fn delete_failure_keeps_record() {
        let mut mock = MockDirectoryApi::new();
        mock.expect_delete_user()
            .returning(|_| Err(Error::NotFound("gone".into())));

        let mut directory = directory_with(mock, vec![user(7, "Beto")]);
        assert!(directory.delete(UserId::new(7)).await.is_err());
        assert_eq!(ids(&directory), vec![7]);
    }

    #[tokio::test]
    async fn submit_without_modal_is_rejected() {
        let mut directory = Directory::new(Arc::new(MockDirectoryApi::new()));
        let err = directory.submit().await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn open_edit_unknown_id() {
        let mut directory = directory_with(MockDirectoryApi::new(), vec![user(1, "Ana")]);
        assert!(matches!(
            directory.open_edit(UserId::new(2)),
            Err(Error::NotFound(_))
        ));
        assert!(!directory.modal().is_open());
    }

    #[test]
    fn cancel_discards_edit_buffer() {
        let mut directory = directory_with(MockDirectoryApi::new(), vec![user(1, "Ana")]);
        directory.open_edit(UserId::new(1)).unwrap();
        directory.set_field(FormField::FirstName, "Changed");
        directory.cancel();

        assert!(!directory.modal().is_open());
        assert!(!directory.set_field(FormField::FirstName, "Ignored"));
        assert_eq!(directory.users()[0].fields.first_name, "Ana");
    }

    #[test]
    fn search_resets_page_and_clamps() {
        let users: Vec<UserRecord> = (1..=25).map(|i| user(i, &format!("User{i}"))).collect();
        let mut directory = directory_with(MockDirectoryApi::new(), users);

        directory.last_page();
        assert_eq!(directory.page_number(), 3);
        assert_eq!(directory.current_page().rows.len(), 5);

        directory.set_search("user1");
        assert_eq!(directory.page_number(), 1);
        // User1, User10..User19
        assert_eq!(directory.current_page().total_rows, 11);
        assert_eq!(directory.total_pages(), 2);
    }

    #[test]
    fn page_clamps_when_cache_shrinks() {
        let users: Vec<UserRecord> = (1..=21).map(|i| user(i, &format!("User{i}"))).collect();
        let mut directory = directory_with(MockDirectoryApi::new(), users);
        directory.go_to_page(3);
        assert_eq!(directory.page_number(), 3);

        directory.apply_deleted(UserId::new(21));
        assert_eq!(directory.page_number(), 2);
        assert_eq!(directory.current_page().rows.len(), 10);
    }

    #[test]
    fn page_navigation_is_bounded() {
        let users: Vec<UserRecord> = (1..=15).map(|i| user(i, &format!("User{i}"))).collect();
        let mut directory = directory_with(MockDirectoryApi::new(), users);

        directory.previous_page();
        assert_eq!(directory.page_number(), 1);
        directory.next_page();
        directory.next_page();
        assert_eq!(directory.page_number(), 2);
        directory.first_page();
        assert_eq!(directory.page_number(), 1);
        directory.go_to_page(99);
        assert_eq!(directory.page_number(), 2);
    }

    #[test]
    fn sort_controls() {
        let mut directory = directory_with(
            MockDirectoryApi::new(),
            vec![user(2, "Beto"), user(1, "Ana"), user(3, "Ciro")],
        );

        directory.toggle_sort(SortField::FirstName);
        let names: Vec<&str> = directory
            .visible()
            .iter()
            .map(|u| u.fields.first_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Beto", "Ciro"]);

        directory.set_sort(SortField::Id, SortDirection::Descending);
        let order: Vec<u64> = directory.visible().iter().map(|u| u.id.get()).collect();
        assert_eq!(order, vec![3, 2, 1]);

        directory.clear_sort();
        let order: Vec<u64> = directory.visible().iter().map(|u| u.id.get()).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn late_update_for_deleted_record_is_dropped() {
        let mut directory = directory_with(MockDirectoryApi::new(), vec![user(7, "Beto")]);
        assert!(directory.apply_deleted(UserId::new(7)));
        assert!(!directory.apply_updated(user(7, "Beto")));
        assert!(directory.users().is_empty());
    }
}
