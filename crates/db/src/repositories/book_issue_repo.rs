//! Repository for `book_issues`: lending, returns and fines.
//!
//! Issue and return run in a single transaction that locks the patron and
//! book rows, so concurrent loans cannot overdraw `available_copies` or a
//! patron's borrowing limit.

use sqlx::PgPool;
use sangam_core::books::{status_for_copies, STATUS_AVAILABLE};
use sangam_core::error::CoreError;
use sangam_core::library::{check_borrow_limit, compute_fine, ISSUE_RETURNED};
use sangam_core::types::DbId;

use crate::error::RepoError;
use crate::models::library::{
    BookIssue, BookIssueDetail, IssueBook, IssueFilter, LibraryDashboard, ReturnBook,
};

const COLUMNS: &str = "id, book_id, patron_id, issued_by, issue_date, due_date, return_date, \
                       returned_by, status, fine_amount, fine_paid, notes, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT i.id, i.book_id, b.title AS book_title, b.accession_number, \
                                    i.patron_id, p.name AS patron_name, p.patron_code, \
                                    i.issue_date, i.due_date, i.return_date, i.status, \
                                    i.fine_amount, i.fine_paid, i.notes \
                             FROM book_issues i \
                             JOIN books b ON b.id = i.book_id \
                             JOIN library_patrons p ON p.id = i.patron_id";

pub struct BookIssueRepo;

impl BookIssueRepo {
    /// Lend one copy of a book to a patron.
    ///
    /// Rule failures (inactive patron, unavailable book, limit reached)
    /// surface as [`RepoError::Rule`].
    pub async fn issue(pool: &PgPool, input: &IssueBook) -> Result<BookIssue, RepoError> {
        let mut tx = pool.begin().await?;

        let patron: Option<(bool, i32)> = sqlx::query_as(
            "SELECT is_active, max_books_allowed FROM library_patrons WHERE id = $1 FOR UPDATE",
        )
        .bind(input.patron_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (patron_active, max_books) = patron.ok_or(CoreError::NotFound {
            entity: "Patron",
            id: input.patron_id,
        })?;
        if !patron_active {
            return Err(CoreError::Conflict("Patron is inactive".to_string()).into());
        }

        let book: Option<(String, i32)> =
            sqlx::query_as("SELECT status, available_copies FROM books WHERE id = $1 FOR UPDATE")
                .bind(input.book_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (book_status, available) = book.ok_or(CoreError::NotFound {
            entity: "Book",
            id: input.book_id,
        })?;
        if book_status != STATUS_AVAILABLE || available <= 0 {
            return Err(CoreError::Conflict(format!(
                "Book is not available for issue (status {book_status}, {available} copies)"
            ))
            .into());
        }

        let (active,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM book_issues WHERE patron_id = $1 AND return_date IS NULL",
        )
        .bind(input.patron_id)
        .fetch_one(&mut *tx)
        .await?;
        check_borrow_limit(active, max_books)?;

        let remaining = available - 1;
        sqlx::query("UPDATE books SET available_copies = $2, status = $3 WHERE id = $1")
            .bind(input.book_id)
            .bind(remaining)
            .bind(status_for_copies(&book_status, remaining))
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO book_issues (book_id, patron_id, issued_by, issue_date, due_date, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let issue = sqlx::query_as::<_, BookIssue>(&query)
            .bind(input.book_id)
            .bind(input.patron_id)
            .bind(input.issued_by)
            .bind(input.issue_date)
            .bind(input.due_date)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(issue)
    }

    /// Close an issue, charging the overdue fine and restoring the copy.
    pub async fn return_book(
        pool: &PgPool,
        id: DbId,
        input: &ReturnBook,
    ) -> Result<BookIssue, RepoError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM book_issues WHERE id = $1 FOR UPDATE");
        let issue = sqlx::query_as::<_, BookIssue>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "BookIssue",
                id,
            })?;
        if issue.return_date.is_some() {
            return Err(CoreError::Conflict("Book has already been returned".to_string()).into());
        }

        let fine = compute_fine(issue.due_date, input.return_date);
        let query = format!(
            "UPDATE book_issues SET
                return_date = $2,
                returned_by = $3,
                status = $4,
                fine_amount = $5,
                fine_paid = ($5 = 0)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, BookIssue>(&query)
            .bind(id)
            .bind(input.return_date)
            .bind(input.returned_by)
            .bind(ISSUE_RETURNED)
            .bind(fine)
            .fetch_one(&mut *tx)
            .await?;

        let book: (String, i32, i32) = sqlx::query_as(
            "SELECT status, available_copies, total_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(issue.book_id)
        .fetch_one(&mut *tx)
        .await?;
        let (book_status, available, total) = book;
        let restored = (available + 1).min(total);
        sqlx::query("UPDATE books SET available_copies = $2, status = $3 WHERE id = $1")
            .bind(issue.book_id)
            .bind(restored)
            .bind(status_for_copies(&book_status, restored))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Mark a fine paid. Returns `None` when the issue does not exist.
    pub async fn pay_fine(pool: &PgPool, id: DbId) -> Result<Option<BookIssue>, sqlx::Error> {
        let query =
            format!("UPDATE book_issues SET fine_paid = true WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, BookIssue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BookIssue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM book_issues WHERE id = $1");
        sqlx::query_as::<_, BookIssue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Issues joined with book and patron, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &IssueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookIssueDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::TEXT IS NULL OR i.status = $1)
               AND ($2::BIGINT IS NULL OR i.patron_id = $2)
               AND ($3::BIGINT IS NULL OR i.book_id = $3)
               AND ($4 = false OR (i.return_date IS NULL AND i.due_date < NOW()))
             ORDER BY i.issue_date DESC, i.id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, BookIssueDetail>(&query)
            .bind(&filter.status)
            .bind(filter.patron_id)
            .bind(filter.book_id)
            .bind(filter.overdue_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Unreturned issues past their due date, most overdue first.
    pub async fn list_overdue(pool: &PgPool) -> Result<Vec<BookIssueDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE i.return_date IS NULL AND i.due_date < NOW()
             ORDER BY i.due_date"
        );
        sqlx::query_as::<_, BookIssueDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Issues held by one patron, newest first.
    pub async fn list_for_patron(
        pool: &PgPool,
        patron_id: DbId,
    ) -> Result<Vec<BookIssueDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE i.patron_id = $1
             ORDER BY i.issue_date DESC"
        );
        sqlx::query_as::<_, BookIssueDetail>(&query)
            .bind(patron_id)
            .fetch_all(pool)
            .await
    }

    pub async fn dashboard(pool: &PgPool) -> Result<LibraryDashboard, sqlx::Error> {
        sqlx::query_as::<_, LibraryDashboard>(
            "SELECT
                (SELECT COUNT(*) FROM books) AS total_books,
                (SELECT COALESCE(SUM(total_copies), 0)::BIGINT FROM books) AS total_copies,
                (SELECT COALESCE(SUM(available_copies), 0)::BIGINT FROM books) AS available_copies,
                (SELECT COUNT(*) FROM library_patrons WHERE is_active = true) AS total_patrons,
                (SELECT COUNT(*) FROM book_issues WHERE return_date IS NULL) AS active_issues,
                (SELECT COUNT(*) FROM book_issues
                    WHERE return_date IS NULL AND due_date < NOW()) AS overdue_issues,
                (SELECT COUNT(*) FROM book_issues
                    WHERE issue_date >= date_trunc('month', NOW())) AS issued_this_month,
                (SELECT COUNT(*) FROM book_issues
                    WHERE return_date >= date_trunc('month', NOW())) AS returned_this_month,
                (SELECT COALESCE(SUM(fine_amount), 0) FROM book_issues
                    WHERE fine_paid = false) AS outstanding_fines",
        )
        .fetch_one(pool)
        .await
    }
}
