//! Reference catalog tables.
//!
//! Names are unique per scope, ignoring case. Children are removed together
//! with their parent.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CATALOG_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS sub_categories CASCADE;
            DROP TABLE IF EXISTS categories CASCADE;
            DROP TABLE IF EXISTS operation_types CASCADE;
            DROP TABLE IF EXISTS statuses CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const CATALOG_SQL: &str = r"
-- ============================================================
-- STATUSES (Business, Personal, Tax, ...)
-- ============================================================
CREATE TABLE statuses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_statuses_name_not_blank CHECK (btrim(name) <> '')
);

CREATE UNIQUE INDEX uq_statuses_name ON statuses (lower(name));

-- ============================================================
-- OPERATION TYPES (Top-up, Write-off, ...)
-- ============================================================
CREATE TABLE operation_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_operation_types_name_not_blank CHECK (btrim(name) <> '')
);

CREATE UNIQUE INDEX uq_operation_types_name ON operation_types (lower(name));

-- ============================================================
-- CATEGORIES (scoped to an operation type)
-- ============================================================
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    operation_type_id UUID NOT NULL
        CONSTRAINT fk_categories_operation_type
        REFERENCES operation_types(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_categories_name_not_blank CHECK (btrim(name) <> '')
);

CREATE UNIQUE INDEX uq_categories_name ON categories (operation_type_id, lower(name));

-- ============================================================
-- SUB CATEGORIES (scoped to a category)
-- ============================================================
CREATE TABLE sub_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category_id UUID NOT NULL
        CONSTRAINT fk_sub_categories_category
        REFERENCES categories(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sub_categories_name_not_blank CHECK (btrim(name) <> '')
);

CREATE UNIQUE INDEX uq_sub_categories_name ON sub_categories (category_id, lower(name));
";
