//! Database seeder for Saldo development and testing.
//!
//! Seeds a demo company with an open accounting period, a small chart of
//! accounts, and the posting profile auto-posting depends on.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use saldo_db::entities::{
    accounting_periods, chart_of_accounts, companies, posting_profiles,
    sea_orm_active_enums::{AccountSubtype, AccountType, NormalBalance, PeriodStatus},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";

// Fixed account IDs so the posting profile and re-runs stay stable.
const CASH_ID: &str = "00000000-0000-0000-0001-000000000001";
const BANK_ID: &str = "00000000-0000-0000-0001-000000000002";
const RECEIVABLE_ID: &str = "00000000-0000-0000-0001-000000000003";
const INPUT_TAX_ID: &str = "00000000-0000-0000-0001-000000000004";
const PAYABLE_ID: &str = "00000000-0000-0000-0002-000000000001";
const OUTPUT_TAX_ID: &str = "00000000-0000-0000-0002-000000000002";
const EQUITY_ID: &str = "00000000-0000-0000-0003-000000000001";
const REVENUE_ID: &str = "00000000-0000-0000-0004-000000000001";
const SALARY_EXPENSE_ID: &str = "00000000-0000-0000-0005-000000000001";
const OFFICE_EXPENSE_ID: &str = "00000000-0000-0000-0005-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = saldo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo company...");
    seed_company(&db).await;

    println!("Seeding accounting periods...");
    seed_periods(&db).await;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await;

    println!("Seeding posting profile...");
    seed_posting_profile(&db).await;

    println!("Seeding complete!");
}

fn demo_company_id() -> Uuid {
    Uuid::parse_str(DEMO_COMPANY_ID).unwrap()
}

fn account_id(fixed: &str) -> Uuid {
    Uuid::parse_str(fixed).unwrap()
}

/// Seeds the demo company.
async fn seed_company(db: &DatabaseConnection) {
    if companies::Entity::find_by_id(demo_company_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo company already exists, skipping...");
        return;
    }

    let company = companies::ActiveModel {
        id: Set(demo_company_id()),
        name: Set("Demo Trading Co".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = company.insert(db).await {
        eprintln!("Failed to insert demo company: {e}");
    } else {
        println!("  Created demo company: Demo Trading Co");
    }
}

/// Seeds one open monthly period per month of the current year.
async fn seed_periods(db: &DatabaseConnection) {
    let company_id = demo_company_id();
    let year = Utc::now().date_naive().year();
    let mut inserted = 0;

    for month in 1u32..=12 {
        let Some(start) = chrono::NaiveDate::from_ymd_opt(year, month, 1) else {
            continue;
        };
        let end = if month == 12 {
            chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .and_then(|d| d.pred_opt())
        .expect("month end exists");

        let period = accounting_periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(format!("{year}-{month:02}")),
            start_date: Set(start),
            end_date: Set(end),
            status: Set(PeriodStatus::Open),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = period.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert period {year}-{month:02}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} accounting periods for {year}");
}

/// Seeds a minimal postable chart of accounts.
#[allow(clippy::too_many_lines)]
async fn seed_accounts(db: &DatabaseConnection) {
    let company_id = demo_company_id();

    // (fixed id, code, name, type, subtype, normal side)
    let accounts = [
        (
            CASH_ID,
            "1-10001",
            "Cash",
            AccountType::Asset,
            Some(AccountSubtype::CurrentAsset),
            NormalBalance::Debit,
        ),
        (
            BANK_ID,
            "1-10002",
            "Bank",
            AccountType::Asset,
            Some(AccountSubtype::CurrentAsset),
            NormalBalance::Debit,
        ),
        (
            RECEIVABLE_ID,
            "1-10100",
            "Accounts Receivable",
            AccountType::Asset,
            Some(AccountSubtype::CurrentAsset),
            NormalBalance::Debit,
        ),
        (
            INPUT_TAX_ID,
            "1-10200",
            "Input Tax",
            AccountType::Asset,
            Some(AccountSubtype::CurrentAsset),
            NormalBalance::Debit,
        ),
        (
            PAYABLE_ID,
            "2-10100",
            "Accounts Payable",
            AccountType::Liability,
            Some(AccountSubtype::CurrentLiability),
            NormalBalance::Credit,
        ),
        (
            OUTPUT_TAX_ID,
            "2-10200",
            "Output Tax",
            AccountType::Liability,
            Some(AccountSubtype::CurrentLiability),
            NormalBalance::Credit,
        ),
        (
            EQUITY_ID,
            "3-10000",
            "Owner Equity",
            AccountType::Equity,
            Some(AccountSubtype::OwnerEquity),
            NormalBalance::Credit,
        ),
        (
            REVENUE_ID,
            "4-10000",
            "Sales Revenue",
            AccountType::Revenue,
            None,
            NormalBalance::Credit,
        ),
        (
            SALARY_EXPENSE_ID,
            "5-10000",
            "Salary Expense",
            AccountType::Expense,
            None,
            NormalBalance::Debit,
        ),
        (
            OFFICE_EXPENSE_ID,
            "5-10100",
            "Office Expense",
            AccountType::Expense,
            None,
            NormalBalance::Debit,
        ),
    ];

    let mut inserted = 0;
    for (id, code, name, account_type, subtype, normal_balance) in accounts {
        if chart_of_accounts::Entity::find_by_id(account_id(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let account = chart_of_accounts::ActiveModel {
            id: Set(account_id(id)),
            company_id: Set(company_id),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            account_type: Set(account_type),
            account_subtype: Set(subtype),
            normal_balance: Set(normal_balance),
            is_header: Set(false),
            is_active: Set(true),
            allow_manual_entry: Set(true),
            parent_id: Set(None),
            level: Set(1),
            opening_balance: Set(Decimal::ZERO),
            current_balance: Set(Decimal::ZERO),
            notes: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = account.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert account {code}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} accounts");
}

/// Seeds the company's posting profile pointing at the seeded accounts.
async fn seed_posting_profile(db: &DatabaseConnection) {
    let company_id = demo_company_id();

    let existing = posting_profiles::Entity::find()
        .filter(posting_profiles::Column::CompanyId.eq(company_id))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Posting profile already exists, skipping...");
        return;
    }

    let profile = posting_profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        accounts_receivable_id: Set(Some(account_id(RECEIVABLE_ID))),
        accounts_payable_id: Set(Some(account_id(PAYABLE_ID))),
        output_tax_id: Set(Some(account_id(OUTPUT_TAX_ID))),
        input_tax_id: Set(Some(account_id(INPUT_TAX_ID))),
        salary_expense_id: Set(Some(account_id(SALARY_EXPENSE_ID))),
        cash_account_code_prefix: Set(Some("1-1000".to_string())),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = profile.insert(db).await {
        if !e.to_string().contains("duplicate key") {
            eprintln!("Failed to insert posting profile: {e}");
        }
    } else {
        println!("  Created posting profile");
    }
}
