use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE SCHEMA IF NOT EXISTS backoffice;")
            .await?;
        db.execute_unprepared("SET search_path TO backoffice, public;")
            .await?;

        // gen_random_uuid() is built in from Postgres 13 on
        db.execute_unprepared(ENUM_TYPES).await?;
        db.execute_unprepared(TABLES).await?;

        // coach_teams and coaches reference each other
        db.execute_unprepared(
            r#"
            ALTER TABLE backoffice.coach_teams
                ADD CONSTRAINT coach_teams_team_leader_id_fkey
                FOREIGN KEY (team_leader_id) REFERENCES backoffice.coaches (id)
                ON DELETE SET NULL;
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CASCADE removes the tables, types and indexes along with the schema
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS backoffice CASCADE;")
            .await?;

        Ok(())
    }
}

const ENUM_TYPES: &str = r#"
    CREATE TYPE backoffice.role AS ENUM ('staff', 'finance', 'admin');
    CREATE TYPE backoffice.client_status AS ENUM ('lead', 'active', 'paused', 'churned');
    CREATE TYPE backoffice.payment_frequency AS ENUM ('one_time', 'weekly', 'biweekly', 'monthly');
    CREATE TYPE backoffice.payment_slot_status AS ENUM ('pending', 'paid', 'overdue', 'waived');
    CREATE TYPE backoffice.payment_method AS ENUM ('card', 'bank_transfer', 'cash', 'other');
    CREATE TYPE backoffice.coach_payment_status AS ENUM ('pending', 'approved', 'paid', 'void');
    CREATE TYPE backoffice.goal_status AS ENUM ('not_started', 'in_progress', 'completed', 'abandoned');
    CREATE TYPE backoffice.audit_action AS ENUM ('create', 'update', 'delete');
"#;

const TABLES: &str = r#"
    CREATE TABLE backoffice.users (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        email varchar(255) NOT NULL UNIQUE,
        first_name varchar(100) NOT NULL,
        last_name varchar(100) NOT NULL,
        display_name varchar(200),
        password text NOT NULL,
        role backoffice.role NOT NULL DEFAULT 'staff',
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.coach_teams (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        name varchar(100) NOT NULL UNIQUE,
        description text,
        team_leader_id uuid,
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.coaches (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id uuid REFERENCES backoffice.users (id) ON DELETE SET NULL,
        coach_team_id uuid REFERENCES backoffice.coach_teams (id) ON DELETE SET NULL,
        first_name varchar(100) NOT NULL,
        last_name varchar(100) NOT NULL,
        email varchar(255) NOT NULL UNIQUE,
        phone varchar(50),
        specialties text[] NOT NULL DEFAULT '{}',
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.clients (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        first_name varchar(100) NOT NULL,
        last_name varchar(100) NOT NULL,
        email varchar(255) NOT NULL UNIQUE,
        phone varchar(50),
        status backoffice.client_status NOT NULL DEFAULT 'lead',
        coach_id uuid REFERENCES backoffice.coaches (id) ON DELETE SET NULL,
        tags text[] NOT NULL DEFAULT '{}',
        notes text,
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.payment_plans (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        client_id uuid NOT NULL REFERENCES backoffice.clients (id) ON DELETE CASCADE,
        name varchar(200) NOT NULL,
        total_amount_cents bigint NOT NULL CHECK (total_amount_cents > 0),
        currency char(3) NOT NULL,
        installment_count integer NOT NULL CHECK (installment_count > 0),
        frequency backoffice.payment_frequency NOT NULL,
        start_date date NOT NULL,
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.payment_slots (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        payment_plan_id uuid NOT NULL REFERENCES backoffice.payment_plans (id) ON DELETE CASCADE,
        sequence integer NOT NULL,
        due_date date NOT NULL,
        amount_due_cents bigint NOT NULL CHECK (amount_due_cents >= 0),
        status backoffice.payment_slot_status NOT NULL DEFAULT 'pending',
        paid_at timestamptz,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now(),
        UNIQUE (payment_plan_id, sequence)
    );

    CREATE TABLE backoffice.payments (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        client_id uuid NOT NULL REFERENCES backoffice.clients (id) ON DELETE CASCADE,
        payment_plan_id uuid REFERENCES backoffice.payment_plans (id) ON DELETE SET NULL,
        payment_slot_id uuid REFERENCES backoffice.payment_slots (id) ON DELETE SET NULL,
        amount_cents bigint NOT NULL CHECK (amount_cents > 0),
        currency char(3) NOT NULL,
        method backoffice.payment_method NOT NULL,
        paid_at timestamptz NOT NULL,
        reference varchar(255),
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.coach_payments (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        coach_id uuid NOT NULL REFERENCES backoffice.coaches (id) ON DELETE CASCADE,
        client_id uuid REFERENCES backoffice.clients (id) ON DELETE SET NULL,
        amount_cents bigint NOT NULL CHECK (amount_cents > 0),
        currency char(3) NOT NULL,
        period_start date NOT NULL,
        period_end date NOT NULL,
        status backoffice.coach_payment_status NOT NULL DEFAULT 'pending',
        paid_at timestamptz,
        notes text,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now(),
        CHECK (period_start <= period_end)
    );

    CREATE TABLE backoffice.client_activity_periods (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        client_id uuid NOT NULL REFERENCES backoffice.clients (id) ON DELETE CASCADE,
        coach_id uuid NOT NULL REFERENCES backoffice.coaches (id) ON DELETE CASCADE,
        payment_plan_id uuid REFERENCES backoffice.payment_plans (id) ON DELETE SET NULL,
        start_date date NOT NULL,
        end_date date,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now(),
        CHECK (end_date IS NULL OR start_date <= end_date)
    );

    CREATE TABLE backoffice.goal_categories (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        name varchar(100) NOT NULL UNIQUE,
        description text,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.goal_types (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        goal_category_id uuid NOT NULL REFERENCES backoffice.goal_categories (id) ON DELETE CASCADE,
        name varchar(100) NOT NULL,
        unit varchar(50),
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now(),
        UNIQUE (goal_category_id, name)
    );

    CREATE TABLE backoffice.goals (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        client_id uuid NOT NULL REFERENCES backoffice.clients (id) ON DELETE CASCADE,
        goal_type_id uuid NOT NULL REFERENCES backoffice.goal_types (id) ON DELETE NO ACTION,
        title varchar(200) NOT NULL,
        description text,
        target_value bigint,
        current_value bigint,
        status backoffice.goal_status NOT NULL DEFAULT 'not_started',
        due_date date,
        completed_at timestamptz,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.wins (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        client_id uuid NOT NULL REFERENCES backoffice.clients (id) ON DELETE CASCADE,
        goal_id uuid REFERENCES backoffice.goals (id) ON DELETE SET NULL,
        coach_id uuid REFERENCES backoffice.coaches (id) ON DELETE SET NULL,
        title varchar(200) NOT NULL,
        description text,
        win_date date NOT NULL,
        created_at timestamptz NOT NULL DEFAULT now(),
        updated_at timestamptz NOT NULL DEFAULT now()
    );

    CREATE TABLE backoffice.audit_logs (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        actor_id uuid REFERENCES backoffice.users (id) ON DELETE SET NULL,
        action backoffice.audit_action NOT NULL,
        table_name varchar(100) NOT NULL,
        record_id uuid NOT NULL,
        changes jsonb NOT NULL DEFAULT '{}',
        created_at timestamptz NOT NULL DEFAULT now()
    );
"#;
