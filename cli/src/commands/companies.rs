//! List companies command.

use anyhow::Result;
use directory_business::{ErrorView, UserFetcher, UserRecord, distinct_companies};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::output::Output;

#[derive(Debug, PartialEq, Eq, Tabled)]
pub struct CompanyRow {
    #[tabled(rename = "Company")]
    pub name: String,
    #[tabled(rename = "Users")]
    pub users: usize,
}

/// One row per distinct company, in first-seen order.
pub fn company_rows(users: &[UserRecord]) -> Vec<CompanyRow> {
    distinct_companies(users)
        .into_iter()
        .map(|name| {
            let count = users.iter().filter(|u| u.company.name == name).count();
            CompanyRow { name, users: count }
        })
        .collect()
}

#[instrument(skip_all, name = "companies")]
pub async fn run_companies(fetcher: &UserFetcher) -> Result<()> {
    let out = Output::new();

    let users = match fetcher.fetch_all().await {
        Ok(users) => users,
        Err(e) => {
            out.error_view(&ErrorView::for_users(&e));
            return Err(anyhow::Error::new(e).context("Failed to fetch users"));
        }
    };

    let rows = company_rows(&users);
    if rows.is_empty() {
        out.dim("No companies found.");
        return Ok(());
    }

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.print(table.to_string());
    out.count("Companies", rows.len());

    Ok(())
}
