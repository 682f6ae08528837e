pub mod admin;
pub mod auth;
pub mod book_donations;
pub mod books;
pub mod community;
pub mod crawler;
pub mod donations;
pub mod events;
pub mod exams;
pub mod health;
pub mod library;
pub mod me;
pub mod site;
pub mod transparency;
pub mod volunteers;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=                                  WebSocket (access token required)
///
/// /auth/signup|login|refresh|logout           sessions
/// /auth/forgot-password|reset-password        password reset
/// /auth/me                                    get, update own profile
/// /auth/me/password                           change password
///
/// /site/settings|hero|stats|overview          public content
/// /site/testimonials                          list approved, submit
/// /site/contact                               submit inquiry
/// /site/members                               member directory
///
/// /books                                      catalogue (public)
/// /books/stats                                catalogue totals
/// /books/{id}                                 get
///
/// /library/books                              create (librarian)
/// /library/books/{id}                         update, delete
/// /library/patrons                            list, create
/// /library/patrons/{id}                       get, update, deactivate
/// /library/issues                             list, issue
/// /library/issues/{id}/return|pay-fine        return, settle fine
/// /library/overdue|dashboard                  reports
///
/// /book-donations                             submit (public)
///
/// /campaigns                                  active campaigns
/// /campaigns/{id}                             get
/// /donations                                  donate (optional auth)
/// /donations/stats                            totals
///
/// /transparency/summary|transactions          verified ledger
///
/// /events                                     published events
/// /events/{id}                                get
/// /events/{id}/register                       register (optional auth)
///
/// /volunteer-applications                     apply (optional auth)
///
/// /exams                                      paged listing
/// /exams/{id}                                 get
/// /exams/{id}/save|reminders                  toggles (auth)
///
/// /crawler/webhook                            scraper output (cron secret)
/// /crawler/run                                status refresh (cron or admin)
///
/// /community/students|members                 join
/// /community/me|directory                     identity, directory
/// /community/posts                            list, create
/// /community/posts/{id}                       get, delete
/// /community/posts/{id}/replies|upvote        reply, upvote
/// /community/replies/{id}/upvote|best-answer  upvote, best answer
/// /community/messages                         group chat
/// /community/dm                               send direct message
/// /community/dm/unread                        unread counts
/// /community/dm/{peer_type}/{peer_id}         conversation
///
/// /me/summary|registrations|donations|books   dashboard (auth)
/// /me/registrations/{id}/cancel               cancel registration
/// /me/saved-exams                             saved exams
/// /me/notifications                           list (?unread_only)
/// /me/notifications/read-all|{id}/read        mark read
///
/// /admin/users                                list, counts, get, update
/// /admin/users/{id}/toggle-active|role        account status, role
/// /admin/analytics|activity                   reporting
/// /admin/settings|hero|stats|testimonials     site content
/// /admin/contact|members                      inquiries, members
/// /admin/book-donations                       list, create, status, export
/// /admin/campaigns|donations                  fundraising
/// /admin/transactions                         ledger
/// /admin/events|registrations                 events
/// /admin/volunteers                           review queue
/// /admin/exams                                exam maintenance
/// /admin/crawler/status                       recent runs
/// /admin/community/students|members           moderation
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket (authenticated through the `token` query parameter).
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/site", site::public_router())
        .nest("/books", books::router())
        .nest("/library", library::router())
        .nest("/book-donations", book_donations::public_router())
        .nest("/campaigns", donations::campaign_router())
        .nest("/donations", donations::donation_router())
        .nest("/transparency", transparency::public_router())
        .nest("/events", events::public_router())
        .nest("/volunteer-applications", volunteers::public_router())
        .nest("/exams", exams::router())
        .nest("/crawler", crawler::router())
        .nest("/community", community::router())
        .nest("/me", me::router())
        .nest("/admin", admin::router())
}
