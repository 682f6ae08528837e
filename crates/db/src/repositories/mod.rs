//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Operations that enforce
//! business rules inside a transaction return [`crate::RepoError`].

pub mod activity_repo;
pub mod analytics_repo;
pub mod book_donation_repo;
pub mod book_issue_repo;
pub mod book_repo;
pub mod campaign_repo;
pub mod chat_repo;
pub mod community_member_repo;
pub mod contact_repo;
pub mod crawler_run_repo;
pub mod donation_repo;
pub mod event_repo;
pub mod exam_repo;
pub mod forum_repo;
pub mod hero_repo;
pub mod member_repo;
pub mod notification_repo;
pub mod participant_repo;
pub mod patron_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod setting_repo;
pub mod stat_repo;
pub mod student_repo;
pub mod testimonial_repo;
pub mod transaction_repo;
pub mod volunteer_repo;

pub use activity_repo::ActivityRepo;
pub use analytics_repo::AnalyticsRepo;
pub use book_donation_repo::BookDonationRepo;
pub use book_issue_repo::BookIssueRepo;
pub use book_repo::BookRepo;
pub use campaign_repo::CampaignRepo;
pub use chat_repo::ChatRepo;
pub use community_member_repo::CommunityMemberRepo;
pub use contact_repo::ContactRepo;
pub use crawler_run_repo::CrawlerRunRepo;
pub use donation_repo::DonationRepo;
pub use event_repo::EventRepo;
pub use exam_repo::ExamRepo;
pub use forum_repo::ForumRepo;
pub use hero_repo::HeroRepo;
pub use member_repo::MemberRepo;
pub use notification_repo::NotificationRepo;
pub use participant_repo::ParticipantRepo;
pub use patron_repo::PatronRepo;
pub use profile_repo::{ProfileFilter, ProfileRepo};
pub use session_repo::{PasswordResetRepo, SessionRepo};
pub use setting_repo::SettingRepo;
pub use stat_repo::StatRepo;
pub use student_repo::StudentRepo;
pub use testimonial_repo::TestimonialRepo;
pub use transaction_repo::TransactionRepo;
pub use volunteer_repo::VolunteerRepo;
