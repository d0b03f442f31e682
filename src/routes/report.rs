//! This file defines the route handlers for the consolidated financial
//! report, served either as JSON or as a downloadable CSV file.

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use time::{
    OffsetDateTime,
    format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    AppState, Error,
    models::{FinancialReport, User, UserID},
    stores::{TransactionStore, UserStore},
    use_cases::{TransactionUseCases, UserUseCases},
};

/// A route handler for the consolidated financial report as JSON.
///
/// Returns the status code 403 if the current user may not view reports.
pub async fn get_financial_report<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let report = TransactionUseCases::new(state.transaction_store)
        .generate_financial_report(&current_user)?;

    Ok(Json(report))
}

/// A route handler for downloading the consolidated financial report as a
/// CSV file.
///
/// The response carries an attachment content disposition with a timestamped
/// file name. Returns the status code 403 if the current user may not view
/// reports.
pub async fn get_csv_report<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
) -> Result<Response, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let report = TransactionUseCases::new(state.transaction_store)
        .generate_financial_report(&current_user)?;
    // The report permission check has already passed, and viewing reports
    // implies managing users, so this cannot fail on permissions.
    let users = UserUseCases::new(state.user_store).get_all_users(&current_user)?;

    let csv_text = build_csv(&report, &users)?;

    let file_name = format!(
        "financial_report_{}.csv",
        OffsetDateTime::now_utc()
            .format(FILE_NAME_DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv_text,
    )
        .into_response())
}

/// Date format for transaction rows, e.g. "15/01/2024".
const ROW_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// Date time format for the report footer, e.g. "15/01/2024 09:30".
const FOOTER_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Date time format for the downloaded file name, e.g. "20240115_093042".
const FILE_NAME_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Render `report` as CSV: numbered transaction rows sorted by date, followed
/// by a summary block with the overall totals.
///
/// `users` supplies the display names for the owner column; owners that are
/// not in `users` are shown as "N/A".
fn build_csv(report: &FinancialReport, users: &[User]) -> Result<String, Error> {
    let display_names: HashMap<UserID, String> = users
        .iter()
        .map(|user| {
            let display_name = user
                .name()
                .map(String::from)
                .unwrap_or_else(|| user.email().to_string());

            (user.id(), display_name)
        })
        .collect();

    let mut transactions = report.transactions.clone();
    transactions.sort_by_key(|transaction| (*transaction.date(), transaction.id()));

    let into_csv_error = |error: csv::Error| Error::CsvError(error.to_string());

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(["No.", "Date", "Description", "Type", "Amount", "User"])
        .map_err(into_csv_error)?;

    for (index, transaction) in transactions.iter().enumerate() {
        let date = transaction
            .date()
            .format(ROW_DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?;
        let owner = display_names
            .get(&transaction.user_id())
            .cloned()
            .unwrap_or_else(|| "N/A".to_string());

        writer
            .write_record([
                (index + 1).to_string(),
                date,
                transaction.description().to_string(),
                transaction.kind().to_string(),
                format!("${:.2}", transaction.amount()),
                owner,
            ])
            .map_err(into_csv_error)?;
    }

    let report_date = OffsetDateTime::now_utc()
        .format(FOOTER_DATE_FORMAT)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    let summary_rows = [
        vec![String::new()],
        vec!["FINANCIAL SUMMARY".to_string()],
        vec!["Total income:".to_string(), format!("${:.2}", report.total_income)],
        vec![
            "Total expenses:".to_string(),
            format!("${:.2}", report.total_expenses),
        ],
        vec!["Final balance:".to_string(), format!("${:.2}", report.balance)],
        vec![
            "Transaction count:".to_string(),
            report.transactions.len().to_string(),
        ],
        vec!["Report date:".to_string(), report_date],
    ];

    for row in summary_rows {
        writer.write_record(&row).map_err(into_csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}


#[cfg(test)]
mod report_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        build_router,
        routes::endpoints,
        test_utils::{get_test_state, sign_up},
    };

    fn get_test_server() -> TestServer {
        TestServer::new(build_router(get_test_state()))
    }

    async fn record_transaction(
        server: &TestServer,
        cookie: &axum_extra::extract::cookie::Cookie<'static>,
        amount: f64,
        kind: &str,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "description": "Test transaction",
                "amount": amount,
                "date": "2024-01-15",
                "type": kind,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn financial_report_contains_consolidated_totals() {
        let server = get_test_server();
        let admin_cookie = sign_up(&server, "admin@test.com").await;
        let user_cookie = sign_up(&server, "user@test.com").await;

        record_transaction(&server, &admin_cookie, 1500.0, "INCOME").await;
        record_transaction(&server, &user_cookie, 500.0, "EXPENSE").await;

        let response = server
            .get(endpoints::FINANCIAL_REPORT)
            .add_cookie(admin_cookie)
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["total_income"], 1500.0);
        assert_eq!(body["total_expenses"], 500.0);
        assert_eq!(body["balance"], 1000.0);
        // The report covers every user's transactions.
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["monthly_summaries"][0]["month"], "Jan 2024");
    }

    #[tokio::test]
    async fn financial_report_is_forbidden_for_regular_users() {
        let server = get_test_server();
        sign_up(&server, "admin@test.com").await;
        let user_cookie = sign_up(&server, "user@test.com").await;

        let response = server
            .get(endpoints::FINANCIAL_REPORT)
            .add_cookie(user_cookie)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn csv_report_is_served_as_an_attachment() {
        let server = get_test_server();
        let admin_cookie = sign_up(&server, "admin@test.com").await;

        record_transaction(&server, &admin_cookie, 1500.0, "INCOME").await;

        let response = server
            .get(endpoints::CSV_REPORT)
            .add_cookie(admin_cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-type").to_str().unwrap(),
            "text/csv; charset=utf-8"
        );
        assert!(
            response
                .header("content-disposition")
                .to_str()
                .unwrap()
                .starts_with("attachment; filename=\"financial_report_")
        );

        let body = response.text();
        assert!(body.starts_with("No.,Date,Description,Type,Amount,User"));
        assert!(body.contains("15/01/2024,Test transaction,INCOME,$1500.00,admin@test.com"));
        assert!(body.contains("FINANCIAL SUMMARY"));
    }

    #[tokio::test]
    async fn csv_report_is_forbidden_for_regular_users() {
        let server = get_test_server();
        sign_up(&server, "admin@test.com").await;
        let user_cookie = sign_up(&server, "user@test.com").await;

        let response = server
            .get(endpoints::CSV_REPORT)
            .add_cookie(user_cookie)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
