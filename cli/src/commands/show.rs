//! Show one user command.

use anyhow::{Result, bail};
use directory_business::{
    DirectoryError, DirectoryResult, ErrorView, Route, UserDetail, UserFetcher, UserId,
};
use console::style;
use tracing::instrument;

use crate::output::Output;

/// Resolve a detail path (`/user/3`). `None` means the path names the directory.
pub fn resolve_path(path: &str) -> DirectoryResult<Option<UserId>> {
    match Route::parse(path)? {
        Route::UserDetail(id) => Ok(Some(id)),
        Route::Directory => Ok(None),
    }
}

/// Accept either a bare id (`3`) or a detail path (`/user/3`).
#[instrument(skip_all, name = "show", fields(target = raw))]
pub async fn run_show(fetcher: &UserFetcher, raw: &str) -> Result<()> {
    let out = Output::new();

    let loaded = if raw.trim_start().starts_with('/') {
        match resolve_path(raw) {
            Ok(Some(id)) => fetcher.fetch_one(id).await,
            Ok(None) => bail!("{raw:?} is the directory page; use `list` instead"),
            Err(e) => Err(e),
        }
    } else {
        fetcher.fetch_one_from_path(raw).await
    };

    match loaded {
        Ok(user) => {
            print_detail(&out, &UserDetail::from(&user));
            Ok(())
        }
        Err(e) => fail(&out, e),
    }
}

fn fail(out: &Output, err: DirectoryError) -> Result<()> {
    out.error_view(&ErrorView::for_user_detail(&err));
    Err(anyhow::Error::new(err).context("Failed to fetch user details"))
}

fn print_detail(out: &Output, detail: &UserDetail) {
    out.header(&detail.name);
    if !detail.username.is_empty() {
        out.dim(format!("@{}", detail.username));
    }

    out.newline();
    out.subheader("Contact");
    out.labeled_indent("Email", &detail.contact.email, 2);
    out.labeled_indent("Phone", &detail.contact.phone, 2);
    out.labeled_indent("Website", &detail.contact.website, 2);

    out.newline();
    out.subheader("Company");
    out.labeled_indent("Name", &detail.company.name, 2);
    if !detail.company.catch_phrase.is_empty() {
        out.print(format!("  {}", style(&detail.company.catch_phrase).italic()));
    }

    out.newline();
    out.subheader("Address");
    out.labeled_indent("Street", &detail.address.street, 2);
    out.labeled_indent("Suite", &detail.address.suite, 2);
    out.labeled_indent("City", &detail.address.locality, 2);
}
