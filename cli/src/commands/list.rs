//! List users command.

use anyhow::Result;
use directory_business::{
    CompanyFilter, DirectoryState, DirectoryView, ErrorView, UserFetcher, UserRecord,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{info, instrument};

use crate::cli::ListArgs;
use crate::output::Output;
use crate::utils::truncate_str;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.get(),
            name: truncate_str(&user.name, 28),
            email: truncate_str(&user.email, 32),
            company: truncate_str(&user.company.name, 24),
        }
    }
}

/// Apply the list flags to a fresh view state. Returns the state and its view.
pub fn browse(users: &[UserRecord], args: &ListArgs, page_size: usize) -> (DirectoryState, DirectoryView) {
    let mut state = DirectoryState::new(page_size);
    if let Some(search) = &args.search {
        state.set_search(search.clone());
    }
    state.set_company(CompanyFilter::from(args.company.clone()));

    let total_pages = state.view(users).total_pages;
    state.go_to_page(args.page, total_pages);
    let view = state.view(users);
    (state, view)
}

/// `1 [2] 3` with the current page bracketed.
pub fn pager_line(state: &DirectoryState, total_pages: usize) -> String {
    let current = state.page().page;
    DirectoryState::page_numbers(total_pages)
        .map(|page| {
            if page == current {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[instrument(skip_all, name = "list", fields(page = args.page, search = args.search.as_deref().unwrap_or("")))]
pub async fn run_list(fetcher: &UserFetcher, args: &ListArgs, page_size: usize) -> Result<()> {
    let out = Output::new();

    let users = match fetcher.fetch_all().await {
        Ok(users) => users,
        Err(e) => {
            out.error_view(&ErrorView::for_users(&e));
            return Err(anyhow::Error::new(e).context("Failed to fetch users"));
        }
    };

    let (state, view) = browse(&users, args, page_size);
    info!(
        total = users.len(),
        filtered = view.filtered_count,
        "directory view computed"
    );

    if let Some(company) = &args.company
        && !view.companies.contains(company)
    {
        out.warning(format!("No company named {company:?}"));
    }
    if args.page != state.page().page {
        out.warning(format!(
            "Page {} is out of range, showing page {}",
            args.page,
            state.page().page
        ));
    }

    out.header("User Directory");
    if view.visible_items.is_empty() {
        out.dim("No users found.");
        return Ok(());
    }

    let rows: Vec<UserRow> = view.visible_items.iter().map(UserRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.print(table.to_string());

    out.newline();
    out.print(format!(
        "Page {} of {}   {}",
        state.page().page,
        view.total_pages,
        pager_line(&state, view.total_pages)
    ));
    let mut hints = Vec::new();
    if state.has_prev() {
        hints.push(format!("previous: --page {}", state.page().page - 1));
    }
    if state.has_next(view.total_pages) {
        hints.push(format!("next: --page {}", state.page().page + 1));
    }
    if !hints.is_empty() {
        out.dim(hints.join("   "));
    }
    out.count("Matching users", view.filtered_count);

    Ok(())
}
