//! Cash-flow records.
//!
//! Catalog entries referenced by a record cannot be deleted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CASH_FLOWS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS cash_flows CASCADE;")
            .await?;
        Ok(())
    }
}

const CASH_FLOWS_SQL: &str = r"
CREATE TABLE cash_flows (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    date DATE NOT NULL DEFAULT CURRENT_DATE,
    status_id UUID NOT NULL
        CONSTRAINT fk_cash_flows_status
        REFERENCES statuses(id) ON DELETE RESTRICT,
    operation_type_id UUID NOT NULL
        CONSTRAINT fk_cash_flows_operation_type
        REFERENCES operation_types(id) ON DELETE RESTRICT,
    category_id UUID NOT NULL
        CONSTRAINT fk_cash_flows_category
        REFERENCES categories(id) ON DELETE RESTRICT,
    subcategory_id UUID NOT NULL
        CONSTRAINT fk_cash_flows_subcategory
        REFERENCES sub_categories(id) ON DELETE RESTRICT,
    amount NUMERIC(12, 2) NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_cash_flows_amount_range CHECK (amount > 0 AND amount <= 1000000000)
);

CREATE INDEX idx_cash_flows_date ON cash_flows (date DESC, id);
CREATE INDEX idx_cash_flows_amount ON cash_flows (amount DESC, id);
CREATE INDEX idx_cash_flows_category ON cash_flows (category_id);
CREATE INDEX idx_cash_flows_subcategory ON cash_flows (subcategory_id);
";
