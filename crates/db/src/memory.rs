//! Process-local store with the same ordering and filtering rules as the
//! PostgreSQL repositories. Used by the API tests and for trying the server
//! without a database.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use tokio::sync::RwLock;
use uuid::Uuid;

use gymdesk_core::models::{
    attendance::{AttendanceFilter, AttendanceLog, SubjectKind},
    auth::Admin,
    diet::DietPlan,
    employee::{Employee, EmployeeFilter},
    enquiry::{Enquiry, EnquiryFilter, EnquiryStatus},
    follow_up::{FollowUp, FollowUpFilter},
    gym::GymDetails,
    member::{Member, MemberFilter},
    package::{Package, Subscription},
    pagination::{PageQuery, paginate},
    water::WaterEntry,
    workout::{Workout, WorkoutLog},
};

use crate::repositories::{
    admin::{AdminCredentials, AdminRepository},
    attendance::AttendanceRepository,
    diet::DietPlanRepository,
    employee::EmployeeRepository,
    enquiry::EnquiryRepository,
    follow_up::FollowUpRepository,
    gym::GymRepository,
    member::{MemberCredentials, MemberRepository},
    package::PackageRepository,
    subscription::SubscriptionRepository,
    water::WaterRepository,
    workout::WorkoutRepository,
};

#[derive(Debug, Default)]
struct State {
    admins: Vec<(Admin, String)>,
    enquiries: Vec<Enquiry>,
    follow_ups: Vec<FollowUp>,
    employees: Vec<Employee>,
    members: Vec<(Member, Option<String>)>,
    packages: Vec<Package>,
    subscriptions: Vec<Subscription>,
    attendance: Vec<AttendanceLog>,
    gym: Option<GymDetails>,
    workouts: Vec<Workout>,
    workout_logs: Vec<WorkoutLog>,
    diet_plans: Vec<DietPlan>,
    water: Vec<WaterEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

fn page_of<T: Clone>(items: Vec<T>, page: PageQuery) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    (paginate(&items, page), total)
}

fn replace<T: Clone>(items: &mut [T], item: &T, same: impl Fn(&T) -> bool) -> Option<T> {
    let slot = items.iter_mut().find(|existing| same(existing))?;
    *slot = item.clone();
    Some(item.clone())
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn create_admin(&self, admin: &Admin, password_hash: &str) -> Result<Admin> {
        let mut state = self.state.write().await;
        let email = admin.email.trim().to_lowercase();
        if state.admins.iter().any(|(a, _)| a.email == email) {
            return Err(eyre!("Admin with email {} already exists", email));
        }
        let stored = Admin {
            email,
            ..admin.clone()
        };
        state.admins.push((stored.clone(), password_hash.to_string()));
        Ok(stored)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminCredentials>> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .iter()
            .find(|(a, _)| a.email.eq_ignore_ascii_case(email.trim()))
            .map(|(admin, hash)| AdminCredentials {
                admin: admin.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>> {
        let state = self.state.read().await;
        Ok(state
            .admins
            .iter()
            .find(|(a, _)| a.id == id)
            .map(|(a, _)| a.clone()))
    }
}

#[async_trait]
impl EnquiryRepository for MemoryStore {
    async fn create_enquiry(&self, enquiry: &Enquiry) -> Result<Enquiry> {
        self.state.write().await.enquiries.push(enquiry.clone());
        Ok(enquiry.clone())
    }

    async fn get_enquiry(&self, id: Uuid) -> Result<Option<Enquiry>> {
        let state = self.state.read().await;
        Ok(state.enquiries.iter().find(|e| e.id == id).cloned())
    }

    async fn list_enquiries(
        &self,
        filter: &EnquiryFilter,
        page: PageQuery,
    ) -> Result<(Vec<Enquiry>, u64)> {
        let state = self.state.read().await;
        let mut matching: Vec<Enquiry> = state
            .enquiries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by_key(|e| (Reverse(e.created_at), e.id));
        Ok(page_of(matching, page))
    }

    async fn update_enquiry(&self, enquiry: &Enquiry) -> Result<Option<Enquiry>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.enquiries, enquiry, |e| e.id == enquiry.id))
    }

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.enquiries.len();
        state.enquiries.retain(|e| e.id != id);
        let deleted = state.enquiries.len() < before;
        if deleted {
            for follow_up in state.follow_ups.iter_mut().filter(|f| f.enquiry_id == Some(id)) {
                follow_up.enquiry_id = None;
            }
        }
        Ok(deleted)
    }

    async fn count_by_status(&self) -> Result<Vec<(EnquiryStatus, u64)>> {
        let state = self.state.read().await;
        Ok(EnquiryStatus::ALL
            .iter()
            .map(|status| {
                let count = state.enquiries.iter().filter(|e| e.status == *status).count();
                (*status, count as u64)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }

    async fn count_created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .enquiries
            .iter()
            .filter(|e| e.created_at >= start && e.created_at < end)
            .count() as u64)
    }

    async fn all_enquiries(&self) -> Result<Vec<Enquiry>> {
        let state = self.state.read().await;
        let mut all = state.enquiries.clone();
        all.sort_by_key(|e| (e.created_at, e.id));
        Ok(all)
    }
}

#[async_trait]
impl FollowUpRepository for MemoryStore {
    async fn create_follow_up(&self, follow_up: &FollowUp) -> Result<FollowUp> {
        self.state.write().await.follow_ups.push(follow_up.clone());
        Ok(follow_up.clone())
    }

    async fn get_follow_up(&self, id: Uuid) -> Result<Option<FollowUp>> {
        let state = self.state.read().await;
        Ok(state.follow_ups.iter().find(|f| f.id == id).cloned())
    }

    async fn list_follow_ups(
        &self,
        filter: &FollowUpFilter,
        page: PageQuery,
    ) -> Result<(Vec<FollowUp>, u64)> {
        let state = self.state.read().await;
        let mut matching: Vec<FollowUp> = state
            .follow_ups
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        matching.sort_by_key(|f| (f.due_at, f.id));
        Ok(page_of(matching, page))
    }

    async fn update_follow_up(&self, follow_up: &FollowUp) -> Result<Option<FollowUp>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.follow_ups, follow_up, |f| {
            f.id == follow_up.id
        }))
    }

    async fn delete_follow_up(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.follow_ups.len();
        state.follow_ups.retain(|f| f.id != id);
        Ok(state.follow_ups.len() < before)
    }

    async fn count_pending_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .follow_ups
            .iter()
            .filter(|f| !f.is_done && f.due_at >= start && f.due_at < end)
            .count() as u64)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create_employee(&self, employee: &Employee) -> Result<Employee> {
        self.state.write().await.employees.push(employee.clone());
        Ok(employee.clone())
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let state = self.state.read().await;
        let mut matching: Vec<Employee> = state
            .employees
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Option<Employee>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.employees, employee, |e| e.id == employee.id))
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn create_member(&self, member: &Member, password_hash: Option<String>) -> Result<Member> {
        self.state
            .write()
            .await
            .members
            .push((member.clone(), password_hash));
        Ok(member.clone())
    }

    async fn get_member(&self, id: Uuid) -> Result<Option<Member>> {
        let state = self.state.read().await;
        Ok(state
            .members
            .iter()
            .find(|(m, _)| m.id == id && !m.is_deleted)
            .map(|(m, _)| m.clone()))
    }

    async fn find_member_credentials(&self, mobile: &str) -> Result<Vec<MemberCredentials>> {
        let state = self.state.read().await;
        let mut found: Vec<MemberCredentials> = state
            .members
            .iter()
            .filter(|(m, _)| m.mobile == mobile.trim() && !m.is_deleted)
            .map(|(member, hash)| MemberCredentials {
                member: member.clone(),
                password_hash: hash.clone(),
            })
            .collect();
        found.sort_by_key(|c| c.member.created_at);
        Ok(found)
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        page: PageQuery,
    ) -> Result<(Vec<Member>, u64)> {
        let state = self.state.read().await;
        let mut matching: Vec<Member> = state
            .members
            .iter()
            .map(|(m, _)| m)
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matching.sort_by_key(|m| (Reverse(m.created_at), m.id));
        Ok(page_of(matching, page))
    }

    async fn update_member(&self, member: &Member) -> Result<Option<Member>> {
        let mut state = self.state.write().await;
        let Some((slot, _)) = state
            .members
            .iter_mut()
            .find(|(m, _)| m.id == member.id && !m.is_deleted)
        else {
            return Ok(None);
        };
        *slot = Member {
            is_deleted: false,
            ..member.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn set_member_password(&self, id: Uuid, password_hash: String) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .members
            .iter_mut()
            .find(|(m, _)| m.id == id && !m.is_deleted)
        {
            Some((member, hash)) => {
                *hash = Some(password_hash);
                member.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state
            .members
            .iter_mut()
            .find(|(m, _)| m.id == id && !m.is_deleted)
        {
            Some((member, _)) => {
                member.is_deleted = true;
                member.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_members(&self) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.members.iter().filter(|(m, _)| !m.is_deleted).count() as u64)
    }

    async fn list_members_without_package(&self) -> Result<Vec<Member>> {
        let state = self.state.read().await;
        let mut matching: Vec<Member> = state
            .members
            .iter()
            .map(|(m, _)| m)
            .filter(|m| {
                m.package_id.is_none() && m.package_name.as_deref().is_some_and(|n| !n.is_empty())
            })
            .cloned()
            .collect();
        matching.sort_by_key(|m| (m.created_at, m.id));
        Ok(matching)
    }

    async fn set_member_package(&self, id: Uuid, package_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.members.iter_mut().find(|(m, _)| m.id == id) {
            Some((member, _)) => {
                member.package_id = Some(package_id);
                member.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn create_package(&self, package: &Package) -> Result<Package> {
        self.state.write().await.packages.push(package.clone());
        Ok(package.clone())
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<Package>> {
        let state = self.state.read().await;
        Ok(state.packages.iter().find(|p| p.id == id).cloned())
    }

    async fn list_packages(&self, include_inactive: bool) -> Result<Vec<Package>> {
        let state = self.state.read().await;
        let mut matching: Vec<Package> = state
            .packages
            .iter()
            .filter(|p| include_inactive || p.is_active)
            .cloned()
            .collect();
        matching.sort_by_key(|p| (p.created_at, p.id));
        Ok(matching)
    }

    async fn update_package(&self, package: &Package) -> Result<Option<Package>> {
        let mut state = self.state.write().await;
        Ok(replace(&mut state.packages, package, |p| p.id == package.id))
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn create_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        self.state
            .write()
            .await
            .subscriptions
            .push(subscription.clone());
        Ok(subscription.clone())
    }

    async fn list_member_subscriptions(&self, member_id: Uuid) -> Result<Vec<Subscription>> {
        let state = self.state.read().await;
        let mut matching: Vec<Subscription> = state
            .subscriptions
            .iter()
            .filter(|s| s.member_id == member_id)
            .cloned()
            .collect();
        matching.sort_by_key(|s| (Reverse(s.start_date), Reverse(s.created_at)));
        Ok(matching)
    }

    async fn find_active_subscription(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Subscription>> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.member_id == member_id && s.is_active_on(date))
            .max_by_key(|s| s.end_date)
            .cloned())
    }

    async fn count_active_subscriptions(&self, date: NaiveDate) -> Result<u64> {
        let state = self.state.read().await;
        let live: BTreeSet<Uuid> = state
            .members
            .iter()
            .filter(|(m, _)| !m.is_deleted)
            .map(|(m, _)| m.id)
            .collect();
        let active: BTreeSet<Uuid> = state
            .subscriptions
            .iter()
            .filter(|s| s.is_active_on(date) && live.contains(&s.member_id))
            .map(|s| s.member_id)
            .collect();
        Ok(active.len() as u64)
    }

    async fn list_subscriptions_without_package(&self) -> Result<Vec<Subscription>> {
        let state = self.state.read().await;
        let mut matching: Vec<Subscription> = state
            .subscriptions
            .iter()
            .filter(|s| s.package_id.is_none())
            .cloned()
            .collect();
        matching.sort_by_key(|s| (s.created_at, s.id));
        Ok(matching)
    }

    async fn set_subscription_package(&self, id: Uuid, package_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.subscriptions.iter_mut().find(|s| s.id == id) {
            Some(subscription) => {
                subscription.package_id = Some(package_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn find_attendance(
        &self,
        kind: SubjectKind,
        subject_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceLog>> {
        let state = self.state.read().await;
        Ok(state
            .attendance
            .iter()
            .find(|l| l.subject_kind == kind && l.subject_id == subject_id && l.date == date)
            .cloned())
    }

    async fn insert_attendance(&self, log: &AttendanceLog) -> Result<Option<AttendanceLog>> {
        let mut state = self.state.write().await;
        let taken = state.attendance.iter().any(|l| {
            l.subject_kind == log.subject_kind && l.subject_id == log.subject_id && l.date == log.date
        });
        if taken {
            return Ok(None);
        }
        state.attendance.push(log.clone());
        Ok(Some(log.clone()))
    }

    async fn save_attendance(&self, log: &AttendanceLog) -> Result<AttendanceLog> {
        let mut state = self.state.write().await;
        let slot = state
            .attendance
            .iter_mut()
            .find(|l| l.id == log.id)
            .ok_or_else(|| eyre!("Attendance log {} does not exist", log.id))?;
        slot.in_time = log.in_time;
        slot.out_time = log.out_time;
        slot.total_hours = log.total_hours;
        slot.source = log.source;
        Ok(slot.clone())
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceLog>> {
        let state = self.state.read().await;
        let mut matching: Vec<AttendanceLog> = state
            .attendance
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        matching.sort_by_key(|l| (Reverse(l.date), Reverse(l.in_time)));
        Ok(matching)
    }

    async fn count_attendance(&self, kind: SubjectKind, date: NaiveDate) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .attendance
            .iter()
            .filter(|l| l.subject_kind == kind && l.date == date)
            .count() as u64)
    }
}

#[async_trait]
impl GymRepository for MemoryStore {
    async fn get_gym_details(&self) -> Result<Option<GymDetails>> {
        Ok(self.state.read().await.gym.clone())
    }

    async fn save_gym_details(&self, details: &GymDetails) -> Result<GymDetails> {
        self.state.write().await.gym = Some(details.clone());
        Ok(details.clone())
    }
}

#[async_trait]
impl WorkoutRepository for MemoryStore {
    async fn create_workout(&self, workout: &Workout) -> Result<Workout> {
        self.state.write().await.workouts.push(workout.clone());
        Ok(workout.clone())
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        let state = self.state.read().await;
        Ok(state.workouts.iter().find(|w| w.id == id).cloned())
    }

    async fn list_workouts(&self) -> Result<Vec<Workout>> {
        let state = self.state.read().await;
        let mut all = state.workouts.clone();
        all.sort_by_key(|w| (Reverse(w.created_at), w.id));
        Ok(all)
    }

    async fn delete_workout(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.workouts.len();
        state.workouts.retain(|w| w.id != id);
        let deleted = state.workouts.len() < before;
        if deleted {
            state.workout_logs.retain(|l| l.workout_id != id);
        }
        Ok(deleted)
    }

    async fn insert_workout_log(&self, log: &WorkoutLog) -> Result<WorkoutLog> {
        self.state.write().await.workout_logs.push(log.clone());
        Ok(log.clone())
    }

    async fn find_workout_log_between(
        &self,
        member_id: Uuid,
        workout_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<WorkoutLog>> {
        let state = self.state.read().await;
        Ok(state
            .workout_logs
            .iter()
            .filter(|l| {
                l.member_id == member_id && l.workout_id == workout_id && l.date >= start && l.date < end
            })
            .min_by_key(|l| l.date)
            .cloned())
    }

    async fn list_member_completions(&self, member_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let state = self.state.read().await;
        let mut dates: Vec<DateTime<Utc>> = state
            .workout_logs
            .iter()
            .filter(|l| l.member_id == member_id)
            .map(|l| l.date)
            .collect();
        dates.sort();
        Ok(dates)
    }
}

#[async_trait]
impl DietPlanRepository for MemoryStore {
    async fn create_diet_plan(&self, plan: &DietPlan) -> Result<DietPlan> {
        self.state.write().await.diet_plans.push(plan.clone());
        Ok(plan.clone())
    }

    async fn get_diet_plan(&self, id: Uuid) -> Result<Option<DietPlan>> {
        let state = self.state.read().await;
        Ok(state.diet_plans.iter().find(|p| p.id == id).cloned())
    }

    async fn list_diet_plans(&self) -> Result<Vec<DietPlan>> {
        let state = self.state.read().await;
        let mut all = state.diet_plans.clone();
        all.sort_by_key(|p| (Reverse(p.created_at), p.id));
        Ok(all)
    }
}

#[async_trait]
impl WaterRepository for MemoryStore {
    async fn insert_water_entry(&self, entry: &WaterEntry) -> Result<WaterEntry> {
        self.state.write().await.water.push(entry.clone());
        Ok(entry.clone())
    }

    async fn list_water_entries(
        &self,
        member_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WaterEntry>> {
        let state = self.state.read().await;
        let mut matching: Vec<WaterEntry> = state
            .water
            .iter()
            .filter(|w| w.member_id == member_id && w.logged_at >= start && w.logged_at < end)
            .cloned()
            .collect();
        matching.sort_by_key(|w| w.logged_at);
        Ok(matching)
    }
}
