use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: &[(&str, &str)] = &[
    (
        "admins",
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "packages",
        r#"
        CREATE TABLE IF NOT EXISTS packages (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            duration_months INTEGER NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            description TEXT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_months > 0)
        );
        "#,
    ),
    (
        "diet_plans",
        r#"
        CREATE TABLE IF NOT EXISTS diet_plans (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            meals JSONB NOT NULL DEFAULT '[]'::jsonb,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "members",
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            mobile VARCHAR(32) NOT NULL,
            email VARCHAR(255) NULL,
            gender VARCHAR(16) NULL,
            address TEXT NULL,
            photo_url TEXT NULL,
            date_of_birth DATE NULL,
            package_id UUID NULL REFERENCES packages(id),
            package_name VARCHAR(255) NULL,
            diet_plan_id UUID NULL REFERENCES diet_plans(id),
            password_hash VARCHAR(255) NULL,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "employees",
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            mobile VARCHAR(32) NOT NULL,
            email VARCHAR(255) NULL,
            gender VARCHAR(16) NULL,
            role VARCHAR(64) NOT NULL,
            employee_type VARCHAR(32) NOT NULL,
            address TEXT NULL,
            photo_url TEXT NULL,
            joining_date DATE NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "enquiries",
        r#"
        CREATE TABLE IF NOT EXISTS enquiries (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            mobile VARCHAR(32) NOT NULL,
            email VARCHAR(255) NULL,
            gender VARCHAR(16) NULL,
            address TEXT NULL,
            source VARCHAR(255) NULL,
            interested_in VARCHAR(255) NULL,
            lead_type VARCHAR(16) NOT NULL,
            status VARCHAR(32) NOT NULL,
            assigned_to UUID NULL REFERENCES employees(id),
            comment TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "follow_ups",
        r#"
        CREATE TABLE IF NOT EXISTS follow_ups (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            enquiry_id UUID NULL REFERENCES enquiries(id) ON DELETE SET NULL,
            member_id UUID NULL REFERENCES members(id),
            name VARCHAR(255) NOT NULL,
            mobile VARCHAR(32) NOT NULL,
            follow_up_type VARCHAR(32) NOT NULL,
            convertibility VARCHAR(16) NULL,
            due_at TIMESTAMP WITH TIME ZONE NOT NULL,
            comment TEXT NULL,
            response TEXT NULL,
            is_done BOOLEAN NOT NULL DEFAULT FALSE,
            done_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "attendance_logs",
        r#"
        CREATE TABLE IF NOT EXISTS attendance_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            subject_kind VARCHAR(16) NOT NULL,
            subject_id UUID NOT NULL,
            subject_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            in_time TIMESTAMP WITH TIME ZONE NOT NULL,
            out_time TIMESTAMP WITH TIME ZONE NULL,
            total_hours DOUBLE PRECISION NULL,
            source VARCHAR(16) NOT NULL,
            CONSTRAINT one_log_per_day UNIQUE (subject_kind, subject_id, date),
            CONSTRAINT valid_attendance_range CHECK (out_time IS NULL OR out_time >= in_time)
        );
        "#,
    ),
    (
        "subscriptions",
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            member_id UUID NOT NULL REFERENCES members(id),
            package_id UUID NULL REFERENCES packages(id),
            package_name VARCHAR(255) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            amount_paid DOUBLE PRECISION NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_subscription_range CHECK (end_date >= start_date)
        );
        "#,
    ),
    (
        "gym_details",
        r#"
        CREATE TABLE IF NOT EXISTS gym_details (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            mobile VARCHAR(32) NULL,
            email VARCHAR(255) NULL,
            address TEXT NULL,
            logo_url TEXT NULL,
            gym_code VARCHAR(64) NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "workouts",
        r#"
        CREATE TABLE IF NOT EXISTS workouts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            category VARCHAR(64) NULL,
            description TEXT NULL,
            duration_minutes INTEGER NOT NULL,
            exercises JSONB NOT NULL DEFAULT '[]'::jsonb,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "workout_logs",
        r#"
        CREATE TABLE IF NOT EXISTS workout_logs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            member_id UUID NOT NULL REFERENCES members(id),
            workout_id UUID NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            date TIMESTAMP WITH TIME ZONE NOT NULL,
            duration_minutes INTEGER NULL
        );
        "#,
    ),
    (
        "water_intake",
        r#"
        CREATE TABLE IF NOT EXISTS water_intake (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            member_id UUID NOT NULL REFERENCES members(id),
            amount_ml INTEGER NOT NULL,
            logged_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_members_mobile ON members(mobile)",
    "CREATE INDEX IF NOT EXISTS idx_enquiries_status ON enquiries(status)",
    "CREATE INDEX IF NOT EXISTS idx_enquiries_created_at ON enquiries(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_follow_ups_due_at ON follow_ups(due_at)",
    "CREATE INDEX IF NOT EXISTS idx_follow_ups_enquiry_id ON follow_ups(enquiry_id)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_logs_date ON attendance_logs(date)",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_member_id ON subscriptions(member_id)",
    "CREATE INDEX IF NOT EXISTS idx_workout_logs_member_date ON workout_logs(member_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_water_intake_member_logged ON water_intake(member_id, logged_at)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, ddl) in TABLES {
        tracing::debug!("Ensuring table {}", table);
        sqlx::query(ddl).execute(pool).await?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
