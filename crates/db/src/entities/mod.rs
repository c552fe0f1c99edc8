//! `SeaORM` entity definitions.

pub mod accounting_periods;
pub mod chart_of_accounts;
pub mod companies;
pub mod journal_lines;
pub mod journals;
pub mod payrolls;
pub mod posting_profiles;
pub mod recurring_runs;
pub mod recurring_template_lines;
pub mod recurring_templates;
pub mod sea_orm_active_enums;
pub mod transaction_items;
pub mod transactions;
pub mod voucher_lines;
pub mod vouchers;
