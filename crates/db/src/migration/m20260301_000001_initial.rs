//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the ledger schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COMPANIES & PERIODS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(POSTING_PROFILES_SQL).await?;

        // ============================================================
        // PART 4: JOURNALS & LINES
        // ============================================================
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 5: TRADE TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSACTION_ITEMS_SQL).await?;

        // ============================================================
        // PART 6: VOUCHERS
        // ============================================================
        db.execute_unprepared(VOUCHERS_SQL).await?;
        db.execute_unprepared(VOUCHER_LINES_SQL).await?;

        // ============================================================
        // PART 7: PAYROLL
        // ============================================================
        db.execute_unprepared(PAYROLLS_SQL).await?;

        // ============================================================
        // PART 8: RECURRING TEMPLATES
        // ============================================================
        db.execute_unprepared(RECURRING_TEMPLATES_SQL).await?;
        db.execute_unprepared(RECURRING_TEMPLATE_LINES_SQL).await?;
        db.execute_unprepared(RECURRING_RUNS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

CREATE TYPE account_subtype AS ENUM (
    'current_asset',
    'fixed_asset',
    'other_asset',
    'current_liability',
    'long_term_liability',
    'owner_equity',
    'retained_earnings'
);

CREATE TYPE normal_balance AS ENUM ('debit', 'credit');

CREATE TYPE period_status AS ENUM ('open', 'closed');

CREATE TYPE journal_source AS ENUM (
    'manual',
    'transaction',
    'voucher',
    'payroll',
    'recurring'
);

CREATE TYPE transaction_type AS ENUM ('sale', 'purchase');

CREATE TYPE transaction_status AS ENUM ('draft', 'posted', 'voided');

CREATE TYPE payment_status AS ENUM ('unpaid', 'partially_paid', 'paid');

CREATE TYPE voucher_status AS ENUM ('draft', 'posted');

CREATE TYPE recurring_frequency AS ENUM (
    'daily',
    'weekly',
    'monthly',
    'quarterly',
    'yearly',
    'custom'
);

CREATE TYPE run_status AS ENUM ('success', 'failure');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_period_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_periods_company_dates
    ON accounting_periods(company_id, start_date, end_date);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    account_subtype account_subtype,
    normal_balance normal_balance NOT NULL,
    is_header BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    allow_manual_entry BOOLEAN NOT NULL DEFAULT true,
    parent_id UUID REFERENCES chart_of_accounts(id),
    level INTEGER NOT NULL DEFAULT 0,
    opening_balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    current_balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_coa_company_code UNIQUE (company_id, code)
);

CREATE INDEX idx_coa_company ON chart_of_accounts(company_id) WHERE is_active = true;
CREATE INDEX idx_coa_parent ON chart_of_accounts(parent_id);
";

const POSTING_PROFILES_SQL: &str = r"
CREATE TABLE posting_profiles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    accounts_receivable_id UUID REFERENCES chart_of_accounts(id),
    accounts_payable_id UUID REFERENCES chart_of_accounts(id),
    output_tax_id UUID REFERENCES chart_of_accounts(id),
    input_tax_id UUID REFERENCES chart_of_accounts(id),
    salary_expense_id UUID REFERENCES chart_of_accounts(id),
    cash_account_code_prefix VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_posting_profile_company UNIQUE (company_id)
);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    journal_number VARCHAR(50) NOT NULL,
    period_id UUID NOT NULL REFERENCES accounting_periods(id),
    journal_date DATE NOT NULL,
    description TEXT NOT NULL,
    source journal_source NOT NULL DEFAULT 'manual',
    source_id UUID,
    is_closed BOOLEAN NOT NULL DEFAULT false,
    posted BOOLEAN NOT NULL DEFAULT true,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_journal_company_number UNIQUE (company_id, journal_number)
);

CREATE INDEX idx_journals_company_date ON journals(company_id, journal_date);
CREATE INDEX idx_journals_source ON journals(source, source_id);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_id UUID NOT NULL REFERENCES journals(id),
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    line_no INTEGER NOT NULL,
    description TEXT,
    debit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    balance_before NUMERIC(20, 2) NOT NULL DEFAULT 0,
    balance_after NUMERIC(20, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_line_one_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_journal_lines_journal ON journal_lines(journal_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    transaction_number VARCHAR(50) NOT NULL,
    transaction_type transaction_type NOT NULL,
    transaction_date DATE NOT NULL,
    description TEXT NOT NULL,
    contact_id UUID,
    contact_name VARCHAR(255),
    subtotal NUMERIC(20, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(20, 2) NOT NULL DEFAULT 0,
    total NUMERIC(20, 2) NOT NULL DEFAULT 0,
    amount_paid NUMERIC(20, 2) NOT NULL DEFAULT 0,
    remaining_balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    payment_status payment_status NOT NULL DEFAULT 'unpaid',
    status transaction_status NOT NULL DEFAULT 'draft',
    posted_journal_id UUID REFERENCES journals(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_transaction_company_number UNIQUE (company_id, transaction_number)
);

CREATE INDEX idx_transactions_company_date ON transactions(company_id, transaction_date);
CREATE INDEX idx_transactions_status ON transactions(company_id, status);
";

const TRANSACTION_ITEMS_SQL: &str = r"
CREATE TABLE transaction_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    description TEXT,
    quantity NUMERIC(20, 4) NOT NULL DEFAULT 1,
    unit_price NUMERIC(20, 2) NOT NULL DEFAULT 0,
    discount NUMERIC(20, 2) NOT NULL DEFAULT 0,
    subtotal NUMERIC(20, 2) NOT NULL DEFAULT 0,
    item_id UUID,
    asset_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transaction_items_transaction ON transaction_items(transaction_id);
CREATE INDEX idx_transaction_items_item ON transaction_items(item_id);
CREATE INDEX idx_transaction_items_asset ON transaction_items(asset_id);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    voucher_number VARCHAR(50) NOT NULL,
    voucher_date DATE NOT NULL,
    description TEXT NOT NULL,
    status voucher_status NOT NULL DEFAULT 'draft',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_voucher_company_number UNIQUE (company_id, voucher_number)
);
";

const VOUCHER_LINES_SQL: &str = r"
CREATE TABLE voucher_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    voucher_id UUID NOT NULL REFERENCES vouchers(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    description TEXT,
    debit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_voucher_lines_voucher ON voucher_lines(voucher_id);
";

const PAYROLLS_SQL: &str = r"
CREATE TABLE payrolls (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    employee_name VARCHAR(255) NOT NULL,
    period VARCHAR(100) NOT NULL,
    pay_date DATE NOT NULL,
    gross NUMERIC(20, 2) NOT NULL DEFAULT 0,
    deductions NUMERIC(20, 2) NOT NULL DEFAULT 0,
    net_pay NUMERIC(20, 2) NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    journal_id UUID REFERENCES journals(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payrolls_company ON payrolls(company_id, is_paid);
";

const RECURRING_TEMPLATES_SQL: &str = r"
CREATE TABLE recurring_templates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    transaction_type transaction_type NOT NULL DEFAULT 'sale',
    frequency recurring_frequency NOT NULL,
    interval_days INTEGER,
    next_run_at DATE NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE,
    is_active BOOLEAN NOT NULL DEFAULT true,
    auto_posting BOOLEAN NOT NULL DEFAULT false,
    executions_total BIGINT NOT NULL DEFAULT 0,
    success_total BIGINT NOT NULL DEFAULT 0,
    failure_total BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_recurring_due ON recurring_templates(next_run_at) WHERE is_active = true;
";

const RECURRING_TEMPLATE_LINES_SQL: &str = r"
CREATE TABLE recurring_template_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    template_id UUID NOT NULL REFERENCES recurring_templates(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    description TEXT,
    debit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(20, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_template_lines_template ON recurring_template_lines(template_id);
";

const RECURRING_RUNS_SQL: &str = r"
CREATE TABLE recurring_runs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    template_id UUID NOT NULL REFERENCES recurring_templates(id) ON DELETE CASCADE,
    run_at TIMESTAMPTZ NOT NULL,
    status run_status NOT NULL,
    transaction_id UUID,
    error_message TEXT,
    snapshot JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_recurring_runs_template ON recurring_runs(template_id, run_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS recurring_runs CASCADE;
DROP TABLE IF EXISTS recurring_template_lines CASCADE;
DROP TABLE IF EXISTS recurring_templates CASCADE;
DROP TABLE IF EXISTS payrolls CASCADE;
DROP TABLE IF EXISTS voucher_lines CASCADE;
DROP TABLE IF EXISTS vouchers CASCADE;
DROP TABLE IF EXISTS transaction_items CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journals CASCADE;
DROP TABLE IF EXISTS posting_profiles CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;
DROP TABLE IF EXISTS accounting_periods CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS run_status;
DROP TYPE IF EXISTS recurring_frequency;
DROP TYPE IF EXISTS voucher_status;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS journal_source;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS normal_balance;
DROP TYPE IF EXISTS account_subtype;
DROP TYPE IF EXISTS account_type;
";
