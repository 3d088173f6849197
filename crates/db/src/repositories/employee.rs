use async_trait::async_trait;
use eyre::Result;
use mockall::automock;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use gymdesk_core::models::employee::{Employee, EmployeeFilter};

use super::{PgStore, push_keyword};
use crate::models::{DbEmployee, convert_all};

const COLUMNS: &str = "id, name, mobile, email, gender, role, employee_type, address, photo_url, \
                       joining_date, is_active, created_at, updated_at";

#[automock]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create_employee(&self, employee: &Employee) -> Result<Employee>;

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>>;

    /// Ordered by name.
    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;

    async fn update_employee(&self, employee: &Employee) -> Result<Option<Employee>>;
}

#[async_trait]
impl EmployeeRepository for PgStore {
    async fn create_employee(&self, employee: &Employee) -> Result<Employee> {
        tracing::debug!("Creating employee: id={}, role={}", employee.id, employee.role);

        let row = sqlx::query_as::<_, DbEmployee>(&format!(
            r#"
            INSERT INTO employees ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.mobile)
        .bind(&employee.email)
        .bind(employee.gender.map(|g| g.as_str()))
        .bind(&employee.role)
        .bind(employee.employee_type.as_str())
        .bind(&employee.address)
        .bind(&employee.photo_url)
        .bind(employee.joining_date)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>> {
        let row = sqlx::query_as::<_, DbEmployee>(&format!(
            "SELECT {COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM employees WHERE TRUE"));
        if !filter.include_inactive {
            select.push(" AND is_active");
        }
        if let Some(role) = &filter.role {
            select.push(" AND LOWER(role) = LOWER(").push_bind(role.clone()).push(")");
        }
        if let Some(keyword) = &filter.keyword {
            push_keyword(&mut select, keyword, &["name", "mobile", "email"]);
        }
        select.push(" ORDER BY name, id");

        let rows = select
            .build_query_as::<DbEmployee>()
            .fetch_all(self.pool())
            .await?;

        convert_all(rows)
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Option<Employee>> {
        let row = sqlx::query_as::<_, DbEmployee>(&format!(
            r#"
            UPDATE employees
            SET name = $2, mobile = $3, email = $4, gender = $5, role = $6, employee_type = $7,
                address = $8, photo_url = $9, joining_date = $10, is_active = $11, updated_at = $12
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.mobile)
        .bind(&employee.email)
        .bind(employee.gender.map(|g| g.as_str()))
        .bind(&employee.role)
        .bind(employee.employee_type.as_str())
        .bind(&employee.address)
        .bind(&employee.photo_url)
        .bind(employee.joining_date)
        .bind(employee.is_active)
        .bind(employee.updated_at)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
