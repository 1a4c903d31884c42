//! Unit tests for Users crate
//! Use cases and the HTTP surface against an in-memory repository

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex, OnceLock};

    use chrono::Utc;
    use kernel::id::UserId;

    use crate::application::access_token::{self, TokenClaims};
    use crate::application::config::UsersConfig;
    use crate::application::context::RequestContext;
    use crate::domain::entity::{
        Access, AuditStamp, NewUser, ProfileUpdate, ProfileView, StatusUpdate, UserView,
    };
    use crate::domain::repository::{CredentialRepository, ProfileRepository, UserQueryRepository};
    use crate::domain::value_object::{
        FilterField, PageRequest, RawPassword, UserFilter, UserName, UserPassword, UserRole,
    };
    use crate::error::{UserError, UserResult};

    pub const TEST_PASSWORD: &str = "correct-horse-9";

    /// Hashed once per test binary; Argon2 is slow in debug builds
    pub fn test_password() -> UserPassword {
        static HASH: OnceLock<UserPassword> = OnceLock::new();
        HASH.get_or_init(|| {
            let raw = RawPassword::new(TEST_PASSWORD.to_string()).unwrap();
            UserPassword::from_raw(&raw, None).unwrap()
        })
        .clone()
    }

    #[derive(Debug, Clone)]
    pub struct StoredUser {
        pub id: UserId,
        pub user_name: UserName,
        pub password: UserPassword,
        pub role: UserRole,
        /// `None` models a missing linked row
        pub profile: Option<ProfileUpdate>,
        pub status: Option<StatusUpdate>,
        pub created_by: String,
        pub updated_by: String,
    }

    impl StoredUser {
        fn field(&self, field: FilterField) -> Option<&str> {
            let profile = self.profile.as_ref();
            let status = self.status.as_ref();
            match field {
                FilterField::Name => profile.and_then(|p| p.name.as_deref()),
                FilterField::City => profile.and_then(|p| p.city.as_deref()),
                FilterField::Province => profile.and_then(|p| p.province.as_deref()),
                FilterField::JobRole => status.and_then(|s| s.job_role.as_deref()),
                FilterField::Status => status.and_then(|s| s.status.as_deref()),
            }
        }

        fn view(&self) -> UserView {
            let p = self.profile.clone().unwrap_or_default();
            let s = self.status.clone().unwrap_or_default();
            UserView {
                username: self.user_name.as_str().to_string(),
                name: p.name,
                role: self.role,
                gender: p.gender,
                dob: p.dob,
                education: p.education,
                city: p.city,
                province: p.province,
                address: p.address,
                phone_number: p.phone_number,
                job_role: s.job_role,
                status: s.status,
                placement: None,
                department_name: None,
            }
        }

        fn profile_view(&self) -> ProfileView {
            let v = self.view();
            ProfileView {
                user_id: self.id.into_uuid(),
                username: v.username,
                name: v.name,
                role: v.role,
                gender: v.gender,
                dob: v.dob,
                education: v.education,
                city: v.city,
                province: v.province,
                address: v.address,
                phone_number: v.phone_number,
                job_role: v.job_role,
                status: v.status,
                placement_city: None,
                department_name: None,
            }
        }
    }

    /// Case-insensitive substring match, like `ILIKE '%v%'`
    fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
        haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
    }

    #[derive(Clone, Default)]
    pub struct InMemoryUserRepository {
        users: Arc<Mutex<Vec<StoredUser>>>,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert a fixture user whose password is [`TEST_PASSWORD`]
        pub fn insert(&self, name: &str, role: UserRole) -> UserId {
            let id = UserId::new();
            self.users.lock().unwrap().push(StoredUser {
                id,
                user_name: UserName::new(name).unwrap(),
                password: test_password(),
                role,
                profile: Some(ProfileUpdate::default()),
                status: Some(StatusUpdate::default()),
                created_by: "fixture".to_string(),
                updated_by: "fixture".to_string(),
            });
            id
        }

        pub fn set_profile(&self, id: UserId, profile: Option<ProfileUpdate>) {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                user.profile = profile;
            }
        }

        pub fn set_status(&self, id: UserId, status: Option<StatusUpdate>) {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                user.status = status;
            }
        }

        pub fn get(&self, id: UserId) -> Option<StoredUser> {
            self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
        }

        pub fn find(&self, name: &str) -> Option<StoredUser> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.user_name.as_str() == name)
                .cloned()
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    impl CredentialRepository for InMemoryUserRepository {
        async fn register(&self, user: &NewUser) -> UserResult<UserId> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.user_name == user.user_name) {
                return Err(UserError::UserNameTaken);
            }
            users.push(StoredUser {
                id: user.user_id,
                user_name: user.user_name.clone(),
                password: user.password.clone(),
                role: user.role,
                profile: Some(ProfileUpdate::default()),
                status: Some(StatusUpdate::default()),
                created_by: user.audit.by.clone(),
                updated_by: user.audit.by.clone(),
            });
            Ok(user.user_id)
        }

        async fn find_by_username(&self, user_name: &UserName) -> UserResult<Option<Access>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| &u.user_name == user_name)
                .map(|u| Access {
                    user_id: u.id,
                    user_name: u.user_name.clone(),
                    password: u.password.clone(),
                    role: u.role,
                }))
        }

        async fn exists_by_username(&self, user_name: &UserName) -> UserResult<bool> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().any(|u| &u.user_name == user_name))
        }
    }

    impl UserQueryRepository for InMemoryUserRepository {
        async fn list(
            &self,
            filter: &UserFilter,
            page: &PageRequest,
        ) -> UserResult<(Vec<UserView>, u64)> {
            let users = self.users.lock().unwrap();
            let matched: Vec<UserView> = users
                .iter()
                .filter(|u| {
                    filter
                        .active()
                        .all(|(field, value)| contains_ci(u.field(field), value))
                })
                .map(StoredUser::view)
                .collect();

            let total = matched.len() as u64;
            let data = matched
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.size() as usize)
                .collect();

            Ok((data, total))
        }

        async fn find_profile(&self, user_id: &UserId) -> UserResult<Option<ProfileView>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| &u.id == user_id)
                .map(StoredUser::profile_view))
        }
    }

    impl ProfileRepository for InMemoryUserRepository {
        async fn update_profile(
            &self,
            user_id: &UserId,
            update: &ProfileUpdate,
            audit: &AuditStamp,
        ) -> UserResult<bool> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.iter_mut().find(|u| &u.id == user_id) else {
                return Ok(false);
            };
            let Some(profile) = user.profile.as_mut() else {
                return Ok(false);
            };

            let update = update.clone();
            profile.name = update.name.or(profile.name.take());
            profile.gender = update.gender.or(profile.gender.take());
            profile.dob = update.dob.or(profile.dob);
            profile.education = update.education.or(profile.education.take());
            profile.address = update.address.or(profile.address.take());
            profile.city = update.city.or(profile.city.take());
            profile.province = update.province.or(profile.province.take());
            profile.phone_number = update.phone_number.or(profile.phone_number.take());
            user.updated_by = audit.by.clone();
            Ok(true)
        }

        async fn update_status(
            &self,
            user_id: &UserId,
            update: &StatusUpdate,
            audit: &AuditStamp,
        ) -> UserResult<bool> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.iter_mut().find(|u| &u.id == user_id) else {
                return Ok(false);
            };
            let Some(status) = user.status.as_mut() else {
                return Ok(false);
            };

            let update = update.clone();
            status.job_role = update.job_role.or(status.job_role.take());
            status.status = update.status.or(status.status.take());
            user.updated_by = audit.by.clone();
            Ok(true)
        }
    }

    pub fn ctx(id: UserId, name: &str, role: UserRole) -> RequestContext {
        RequestContext {
            user_id: id.to_string(),
            user_name: UserName::new(name).unwrap(),
            role,
        }
    }

    pub fn token_for(config: &UsersConfig, id: UserId, name: &str, role: UserRole) -> String {
        let claims = TokenClaims {
            sub: id.to_string(),
            username: name.to_string(),
            role,
            exp: Utc::now().timestamp() + 60,
        };
        access_token::issue(&config.token_secret, &claims).unwrap()
    }
}

#[cfg(test)]
mod register_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::config::UsersConfig;
    use crate::application::{RegisterInput, RegisterUseCase};
    use crate::domain::value_object::UserRole;
    use crate::error::UserError;

    fn input(name: &str, password: &str, role: &str) -> RegisterInput {
        RegisterInput {
            user_name: name.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_registers_trainee() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let use_case = RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()));

        let output = use_case
            .execute(
                Some(&ctx(admin, "admin", UserRole::Admin)),
                input("trainee01", "a-long-password", "TRAINEE"),
            )
            .await
            .unwrap();

        let stored = repo.get(output.user_id).unwrap();
        assert_eq!(stored.user_name.as_str(), "trainee01");
        assert_eq!(stored.role, UserRole::Trainee);
        assert_eq!(stored.created_by, "admin");
        assert_ne!(stored.password.as_phc_string(), "a-long-password");
    }

    #[tokio::test]
    async fn test_trainee_cannot_register() {
        let repo = InMemoryUserRepository::new();
        let trainee = repo.insert("trainee", UserRole::Trainee);
        let use_case = RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()));

        let err = use_case
            .execute(
                Some(&ctx(trainee, "trainee", UserRole::Trainee)),
                input("another", "a-long-password", "trainee"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Forbidden(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        repo.insert("taken", UserRole::Trainee);
        let use_case = RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()));

        let err = use_case
            .execute(
                Some(&ctx(admin, "admin", UserRole::Admin)),
                input("taken", "a-long-password", "trainee"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::UserNameTaken));
        assert_eq!(err.status_code(), 409);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_bad_input_is_rejected_before_store() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let use_case = RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()));
        let admin_ctx = ctx(admin, "admin", UserRole::Admin);

        let err = use_case
            .execute(Some(&admin_ctx), input("newbie", "a-long-password", "root"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));

        let err = use_case
            .execute(Some(&admin_ctx), input("newbie", "short", "trainee"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::PasswordValidation(_)));

        let err = use_case
            .execute(Some(&admin_ctx), input("no spaces", "a-long-password", "trainee"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));

        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_registration_is_self_created() {
        let repo = InMemoryUserRepository::new();
        let use_case = RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()));

        let output = use_case
            .execute(None, input("root_admin", "a-long-password", "admin"))
            .await
            .unwrap();

        let stored = repo.get(output.user_id).unwrap();
        assert_eq!(stored.created_by, "root_admin");
        assert_eq!(stored.role, UserRole::Admin);
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::access_token;
    use crate::application::config::UsersConfig;
    use crate::application::{SignInInput, SignInUseCase};
    use crate::domain::value_object::UserRole;
    use crate::error::UserError;

    fn sign_in(name: &str, password: &str) -> SignInInput {
        SignInInput {
            user_name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_token() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert("ann", UserRole::Trainee);
        let config = Arc::new(UsersConfig::development());
        let use_case = SignInUseCase::new(Arc::new(repo), config.clone());

        let output = use_case.execute(sign_in("ann", TEST_PASSWORD)).await.unwrap();
        assert_eq!(output.user_id, id);
        assert_eq!(output.role, UserRole::Trainee);

        let claims = access_token::verify(&config.token_secret, &output.access_token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.username, "ann");
        assert_eq!(claims.role, UserRole::Trainee);
        assert_eq!(claims.exp * 1000, output.expires_at_ms);
    }

    #[tokio::test]
    async fn test_debug_output_hides_access_token() {
        let repo = InMemoryUserRepository::new();
        repo.insert("ann", UserRole::Trainee);
        let use_case = SignInUseCase::new(Arc::new(repo), Arc::new(UsersConfig::development()));

        let output = use_case.execute(sign_in("ann", TEST_PASSWORD)).await.unwrap();
        let printed = format!("{output:?}");

        assert!(!printed.contains(&output.access_token));
        assert!(printed.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let repo = InMemoryUserRepository::new();
        repo.insert("ann", UserRole::Trainee);
        let use_case = SignInUseCase::new(Arc::new(repo), Arc::new(UsersConfig::development()));

        let wrong_password = use_case
            .execute(sign_in("ann", "not-the-password"))
            .await
            .unwrap_err();
        let unknown_user = use_case
            .execute(sign_in("nobody", TEST_PASSWORD))
            .await
            .unwrap_err();
        let malformed_name = use_case
            .execute(sign_in("x", TEST_PASSWORD))
            .await
            .unwrap_err();

        for err in [wrong_password, unknown_user, malformed_name] {
            assert!(matches!(err, UserError::InvalidCredentials));
            assert_eq!(err.into_app_error().message(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.insert("Ann", UserRole::Trainee);
        let use_case = SignInUseCase::new(Arc::new(repo), Arc::new(UsersConfig::development()));

        assert!(use_case.execute(sign_in("ann", TEST_PASSWORD)).await.is_err());
        assert!(use_case.execute(sign_in("Ann", TEST_PASSWORD)).await.is_ok());
    }
}

#[cfg(test)]
mod seed_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::config::UsersConfig;
    use crate::application::{SeedOutcome, seed_admin};
    use crate::domain::value_object::UserRole;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repo = InMemoryUserRepository::new();
        let config = Arc::new(UsersConfig::development());

        let first = seed_admin(
            Arc::new(repo.clone()),
            config.clone(),
            "admin".to_string(),
            "admin-password-1".to_string(),
        )
        .await
        .unwrap();
        let SeedOutcome::Created(id) = first else {
            panic!("expected a new admin, got {first:?}");
        };
        assert_eq!(repo.get(id).unwrap().role, UserRole::Admin);

        let second = seed_admin(
            Arc::new(repo.clone()),
            config,
            "admin".to_string(),
            "admin-password-1".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(second, SeedOutcome::AlreadyExists);
        assert_eq!(repo.len(), 1);
    }
}

#[cfg(test)]
mod listing_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::ListUsersUseCase;
    use crate::domain::entity::{ProfileUpdate, StatusUpdate};
    use crate::domain::value_object::{FilterField, PageRequest, UserFilter, UserRole};
    use crate::error::UserError;

    fn seeded(n: usize) -> (InMemoryUserRepository, kernel::id::UserId) {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        for i in 1..n {
            repo.insert(&format!("trainee{i:02}"), UserRole::Trainee);
        }
        (repo, admin)
    }

    #[tokio::test]
    async fn test_first_page_of_twelve() {
        let (repo, admin) = seeded(12);
        let use_case = ListUsersUseCase::new(Arc::new(repo));

        let page = use_case
            .execute(
                &ctx(admin, "admin", UserRole::Admin),
                UserFilter::default(),
                PageRequest::new(1, 5),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.total_data, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.previous_page, None);
    }

    #[tokio::test]
    async fn test_last_page_of_twelve() {
        let (repo, admin) = seeded(12);
        let use_case = ListUsersUseCase::new(Arc::new(repo));

        let page = use_case
            .execute(
                &ctx(admin, "admin", UserRole::Admin),
                UserFilter::default(),
                PageRequest::new(3, 5),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.next_page, None);
        assert_eq!(page.previous_page, Some(2));
    }

    #[tokio::test]
    async fn test_pages_concatenate_to_full_result() {
        let (repo, admin) = seeded(12);
        let use_case = ListUsersUseCase::new(Arc::new(repo));
        let admin_ctx = ctx(admin, "admin", UserRole::Admin);

        for size in [1, 4, 5, 12, 50] {
            let mut seen = Vec::new();
            let mut page_no = 1;
            loop {
                let page = use_case
                    .execute(&admin_ctx, UserFilter::default(), PageRequest::new(page_no, size))
                    .await
                    .unwrap();
                assert!(page.data.len() <= size as usize);
                seen.extend(page.data.into_iter().map(|u| u.username));
                match page.next_page {
                    Some(next) => page_no = next as i64,
                    None => break,
                }
            }

            let mut unique = seen.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(seen.len(), 12, "size {size}");
            assert_eq!(unique.len(), 12, "size {size}");
        }
    }

    #[tokio::test]
    async fn test_filter_total_matches_unpaged_data() {
        let (repo, admin) = seeded(6);
        let a = repo.find("trainee01").unwrap().id;
        let b = repo.find("trainee02").unwrap().id;
        repo.set_profile(
            a,
            Some(ProfileUpdate {
                city: Some("Jakarta Selatan".into()),
                ..Default::default()
            }),
        );
        repo.set_profile(
            b,
            Some(ProfileUpdate {
                city: Some("jakarta".into()),
                ..Default::default()
            }),
        );
        repo.set_status(
            b,
            Some(StatusUpdate {
                job_role: Some("Backend".into()),
                status: Some("active".into()),
            }),
        );
        let use_case = ListUsersUseCase::new(Arc::new(repo));
        let admin_ctx = ctx(admin, "admin", UserRole::Admin);

        let city = UserFilter::default().with(FilterField::City, "  JAKARTA ");
        let page = use_case
            .execute(&admin_ctx, city.clone(), PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(page.total_data, 2);
        assert_eq!(page.data.len(), 1);

        let full = use_case
            .execute(&admin_ctx, city.clone(), PageRequest::new(1, 100))
            .await
            .unwrap();
        assert_eq!(full.data.len() as u64, full.total_data);

        let both = city.with(FilterField::JobRole, "back");
        let page = use_case
            .execute(&admin_ctx, both, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_data, 1);
        assert_eq!(page.data[0].username, "trainee02");
    }

    #[tokio::test]
    async fn test_no_match_is_empty_page() {
        let (repo, admin) = seeded(3);
        let use_case = ListUsersUseCase::new(Arc::new(repo));

        let page = use_case
            .execute(
                &ctx(admin, "admin", UserRole::Admin),
                UserFilter::default().with(FilterField::Name, "zzz"),
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.next_page, None);
    }

    #[tokio::test]
    async fn test_listing_requires_admin() {
        let (repo, _) = seeded(3);
        let trainee = repo.find("trainee01").unwrap().id;
        let use_case = ListUsersUseCase::new(Arc::new(repo));

        let err = use_case
            .execute(
                &ctx(trainee, "trainee01", UserRole::Trainee),
                UserFilter::default(),
                PageRequest::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Forbidden(_)));
    }
}

#[cfg(test)]
mod profile_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{GetProfileUseCase, UpdateProfileUseCase};
    use crate::domain::entity::{ProfileUpdate, StatusUpdate};
    use crate::domain::value_object::UserRole;
    use crate::error::UserError;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_fresh_profile_is_mostly_null() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert("ann", UserRole::Trainee);
        let use_case = GetProfileUseCase::new(Arc::new(repo));

        let profile = use_case
            .execute(&ctx(id, "ann", UserRole::Trainee))
            .await
            .unwrap();

        assert_eq!(profile.user_id, id.into_uuid());
        assert_eq!(profile.username, "ann");
        assert_eq!(profile.name, None);
        assert_eq!(profile.department_name, None);
    }

    #[tokio::test]
    async fn test_missing_linked_rows_do_not_fail() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert("ann", UserRole::Trainee);
        repo.set_profile(id, None);
        repo.set_status(id, None);
        let use_case = GetProfileUseCase::new(Arc::new(repo));

        let profile = use_case
            .execute(&ctx(id, "ann", UserRole::Trainee))
            .await
            .unwrap();
        assert_eq!(profile.job_role, None);
    }

    #[tokio::test]
    async fn test_unknown_user_profile_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let use_case = GetProfileUseCase::new(Arc::new(repo));

        let err = use_case
            .execute(&ctx(UserId::new(), "ghost", UserRole::Trainee))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UserNotFound));
    }

    #[tokio::test]
    async fn test_update_own_profile_restamps_user() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert("ann", UserRole::Trainee);
        let use_case = UpdateProfileUseCase::new(Arc::new(repo.clone()));
        let ann = ctx(id, "ann", UserRole::Trainee);

        use_case
            .update_profile(
                &ann,
                None,
                ProfileUpdate {
                    name: Some(" Ann Lee ".into()),
                    city: Some("Bandung".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        use_case
            .update_profile(
                &ann,
                None,
                ProfileUpdate {
                    province: Some("Jawa Barat".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = repo.get(id).unwrap();
        let profile = stored.profile.unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ann Lee"));
        assert_eq!(profile.city.as_deref(), Some("Bandung"));
        assert_eq!(profile.province.as_deref(), Some("Jawa Barat"));
        assert_eq!(stored.updated_by, "ann");
    }

    #[tokio::test]
    async fn test_only_admin_edits_others() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let ann = repo.insert("ann", UserRole::Trainee);
        let bob = repo.insert("bob", UserRole::Trainee);
        let use_case = UpdateProfileUseCase::new(Arc::new(repo.clone()));
        let update = StatusUpdate {
            job_role: Some("QA".into()),
            status: Some("probation".into()),
        };

        let err = use_case
            .update_status(
                &ctx(ann, "ann", UserRole::Trainee),
                Some(bob.to_string().as_str()),
                update.clone(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Forbidden(_)));

        use_case
            .update_status(
                &ctx(admin, "admin", UserRole::Admin),
                Some(bob.to_string().as_str()),
                update,
            )
            .await
            .unwrap();

        let stored = repo.get(bob).unwrap();
        assert_eq!(stored.status.unwrap().job_role.as_deref(), Some("QA"));
        assert_eq!(stored.updated_by, "admin");
    }

    #[tokio::test]
    async fn test_update_missing_rows_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let ann = repo.insert("ann", UserRole::Trainee);
        repo.set_profile(ann, None);
        let use_case = UpdateProfileUseCase::new(Arc::new(repo));
        let admin_ctx = ctx(admin, "admin", UserRole::Admin);
        let update = ProfileUpdate {
            name: Some("Ann".into()),
            ..Default::default()
        };

        let err = use_case
            .update_profile(&admin_ctx, Some(ann.to_string().as_str()), update.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UserNotFound));

        let err = use_case
            .update_profile(&admin_ctx, Some(UserId::new().to_string().as_str()), update)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::UserNotFound));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::access_token::{self, TokenClaims};
    use crate::application::config::UsersConfig;
    use crate::domain::value_object::UserRole;
    use crate::presentation::router::users_router_generic;

    fn app(repo: &InMemoryUserRepository, config: &UsersConfig) -> Router {
        users_router_generic(repo.clone(), config.clone())
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_then_list() {
        let repo = InMemoryUserRepository::new();
        repo.insert("admin", UserRole::Admin);
        let config = UsersConfig::development();

        let response = app(&repo, &config)
            .oneshot(send_json(
                "POST",
                "/auth/signin",
                None,
                json!({"username": "admin", "password": TEST_PASSWORD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["role"], "admin");
        let token = body["accessToken"].as_str().unwrap().to_string();

        let response = app(&repo, &config)
            .oneshot(get("/users", Some(token.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalData"], 1);
        assert_eq!(body["data"][0]["username"], "admin");
        assert!(body.get("nextPage").is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_401() {
        let repo = InMemoryUserRepository::new();
        repo.insert("admin", UserRole::Admin);
        let config = UsersConfig::development();

        let response = app(&repo, &config)
            .oneshot(send_json(
                "POST",
                "/auth/signin",
                None,
                json!({"username": "admin", "password": "wrong-password"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["detail"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_protected_routes_need_a_valid_token() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let config = UsersConfig::development();

        let response = app(&repo, &config).oneshot(get("/users", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = token_for(&config, admin, "admin", UserRole::Admin);
        let tampered = format!("{token}x");
        let response = app(&repo, &config)
            .oneshot(get("/profiles", Some(tampered.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let foreign = token_for(&UsersConfig::development(), admin, "admin", UserRole::Admin);
        let response = app(&repo, &config)
            .oneshot(get("/users", Some(foreign.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let expired = access_token::issue(
            &config.token_secret,
            &TokenClaims {
                sub: admin.to_string(),
                username: "admin".to_string(),
                role: UserRole::Admin,
                exp: Utc::now().timestamp() - 120,
            },
        )
        .unwrap();
        let response = app(&repo, &config)
            .oneshot(get("/users", Some(expired.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_trainee_cannot_list_or_register() {
        let repo = InMemoryUserRepository::new();
        let trainee = repo.insert("ann", UserRole::Trainee);
        let config = UsersConfig::development();
        let token = token_for(&config, trainee, "ann", UserRole::Trainee);

        let response = app(&repo, &config)
            .oneshot(get("/users", Some(token.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(&repo, &config)
            .oneshot(send_json(
                "POST",
                "/auth/register",
                Some(token.as_str()),
                json!({"username": "newbie", "password": "a-long-password", "role": "trainee"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_admin_registers_user() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        let config = UsersConfig::development();
        let token = token_for(&config, admin, "admin", UserRole::Admin);

        let response = app(&repo, &config)
            .oneshot(send_json(
                "POST",
                "/auth/register",
                Some(token.as_str()),
                json!({"username": "newbie", "password": "a-long-password", "role": "Trainee"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let user_id = body["userId"].as_str().unwrap();

        let stored = repo.find("newbie").unwrap();
        assert_eq!(stored.id.to_string(), user_id);
        assert_eq!(stored.role, UserRole::Trainee);

        let response = app(&repo, &config)
            .oneshot(send_json(
                "POST",
                "/auth/register",
                Some(token.as_str()),
                json!({"username": "newbie", "password": "a-long-password", "role": "trainee"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_invalid_paging_falls_back_to_defaults() {
        let repo = InMemoryUserRepository::new();
        let admin = repo.insert("admin", UserRole::Admin);
        for i in 0..7 {
            repo.insert(&format!("trainee{i}"), UserRole::Trainee);
        }
        let config = UsersConfig::development();
        let token = token_for(&config, admin, "admin", UserRole::Admin);

        let response = app(&repo, &config)
            .oneshot(get("/users?page=abc&size=-4&city=%20%20", Some(token.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["nextPage"], 2);
    }

    #[tokio::test]
    async fn test_profile_roundtrip_over_http() {
        let repo = InMemoryUserRepository::new();
        let ann = repo.insert("ann", UserRole::Trainee);
        let config = UsersConfig::development();
        let token = token_for(&config, ann, "ann", UserRole::Trainee);

        let response = app(&repo, &config)
            .oneshot(send_json(
                "PUT",
                "/profiles",
                Some(token.as_str()),
                json!({"name": "Ann Lee", "dob": "1999-04-01"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app(&repo, &config)
            .oneshot(send_json(
                "PUT",
                "/profiles/status",
                Some(token.as_str()),
                json!({"jobRole": "Backend"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app(&repo, &config)
            .oneshot(get("/profiles", Some(token.as_str())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "ann");
        assert_eq!(body["name"], "Ann Lee");
        assert_eq!(body["dob"], "1999-04-01");
        assert_eq!(body["jobRole"], "Backend");
        assert!(body["placementCity"].is_null());
    }

    #[tokio::test]
    async fn test_empty_profile_update_is_400() {
        let repo = InMemoryUserRepository::new();
        let ann = repo.insert("ann", UserRole::Trainee);
        let config = UsersConfig::development();
        let token = token_for(&config, ann, "ann", UserRole::Trainee);

        let response = app(&repo, &config)
            .oneshot(send_json("PUT", "/profiles", Some(token.as_str()), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
