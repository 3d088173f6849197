use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::{TestRequest, TestServer};
use chrono::{Days, Utc};
use chrono_tz::Asia::Kolkata;
use uuid::Uuid;

use gymdesk_api::{
    ApiState, build_router,
    middleware::auth::{create_token, hash_password},
    services::image_store::{DisabledImageStore, ImageStore},
};
use gymdesk_core::models::{
    auth::{Admin, Role},
    gym::GymDetails,
    member::Member,
    package::Subscription,
};
use gymdesk_db::Repositories;

pub const JWT_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const MEMBER_MOBILE: &str = "9876543210";
pub const MEMBER_PASSWORD: &str = "member-password";
pub const GYM_CODE: &str = "GYMCODE123";
pub const GYM_NAME: &str = "Iron Temple";

pub struct TestContext {
    pub server: TestServer,
    pub state: Arc<ApiState>,
    pub admin: Admin,
    pub member: Member,
}

impl TestContext {
    /// Seeded in-memory app: one admin, one member with a subscription
    /// covering today, and the gym record.
    pub async fn new() -> Self {
        Self::with_repos(Repositories::in_memory()).await
    }

    pub async fn with_repos(repos: Repositories) -> Self {
        Self::build(repos, Arc::new(DisabledImageStore), true).await
    }

    pub async fn with_images(images: Arc<dyn ImageStore>) -> Self {
        Self::build(Repositories::in_memory(), images, true).await
    }

    /// Admin and member only; the gym record has never been saved.
    pub async fn without_gym() -> Self {
        Self::build(Repositories::in_memory(), Arc::new(DisabledImageStore), false).await
    }

    async fn build(repos: Repositories, images: Arc<dyn ImageStore>, with_gym: bool) -> Self {
        let state = Arc::new(ApiState {
            repos,
            images,
            jwt_secret: JWT_SECRET.to_string(),
            jwt_expiry_hours: 1,
            timezone: Kolkata,
        });
        let now = Utc::now();

        let admin = Admin {
            id: Uuid::new_v4(),
            name: "Owner".to_string(),
            email: ADMIN_EMAIL.to_string(),
            created_at: now,
        };
        state
            .repos
            .admins
            .create_admin(&admin, &hash_password(ADMIN_PASSWORD).unwrap())
            .await
            .unwrap();

        let member = create_member(&state, "Asha", MEMBER_MOBILE, Some(MEMBER_PASSWORD)).await;
        let today = state.today();
        state
            .repos
            .subscriptions
            .create_subscription(&Subscription {
                id: Uuid::new_v4(),
                member_id: member.id,
                package_id: None,
                package_name: "Monthly".to_string(),
                start_date: today.checked_sub_days(Days::new(3)).unwrap(),
                end_date: today.checked_add_days(Days::new(27)).unwrap(),
                amount_paid: 1500.0,
                created_at: now,
            })
            .await
            .unwrap();

        if with_gym {
            state
                .repos
                .gym
                .save_gym_details(&GymDetails {
                    id: Uuid::new_v4(),
                    name: GYM_NAME.to_string(),
                    mobile: None,
                    email: None,
                    address: None,
                    logo_url: None,
                    gym_code: GYM_CODE.to_string(),
                    updated_at: now,
                })
                .await
                .unwrap();
        }

        let server = TestServer::new(build_router(state.clone())).unwrap();

        Self {
            server,
            state,
            admin,
            member,
        }
    }

    pub fn admin_auth(&self) -> (HeaderName, HeaderValue) {
        bearer(&token_for(self.admin.id, Role::Admin))
    }

    pub fn member_auth(&self) -> (HeaderName, HeaderValue) {
        bearer(&token_for(self.member.id, Role::Member))
    }

    pub fn as_admin(&self, request: TestRequest) -> TestRequest {
        let (name, value) = self.admin_auth();
        request.add_header(name, value)
    }

    pub fn as_member(&self, request: TestRequest) -> TestRequest {
        let (name, value) = self.member_auth();
        request.add_header(name, value)
    }
}

pub fn token_for(id: Uuid, role: Role) -> String {
    create_token(id, role, JWT_SECRET, 1).unwrap()
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub async fn create_member(
    state: &ApiState,
    name: &str,
    mobile: &str,
    password: Option<&str>,
) -> Member {
    let now = Utc::now();
    let member = Member {
        id: Uuid::new_v4(),
        name: name.to_string(),
        mobile: mobile.to_string(),
        email: None,
        gender: None,
        address: None,
        photo_url: None,
        date_of_birth: None,
        package_id: None,
        package_name: None,
        diet_plan_id: None,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };
    let hash = password.map(|p| hash_password(p).unwrap());
    state
        .repos
        .members
        .create_member(&member, hash)
        .await
        .unwrap()
}
