//! Community hub: participants, forum votes and direct messages.

use sangam_core::community::{Participant, AUTHOR_MEMBER, AUTHOR_STUDENT};
use sangam_db::models::community::{
    CreateCommunityMember, CreatePost, CreateStudent, PostFilter,
};
use sangam_db::models::profile::CreateProfile;
use sangam_db::repositories::{
    ChatRepo, CommunityMemberRepo, ForumRepo, ParticipantRepo, ProfileRepo, StudentRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateProfile {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        full_name: email.to_string(),
        phone: None,
        role: "user".to_string(),
    };
    ProfileRepo::create(pool, &input).await.unwrap().id
}

async fn student(pool: &PgPool, email: &str) -> Participant {
    let user_id = user(pool, email).await;
    let input = CreateStudent {
        name: format!("Student {email}"),
        email: email.to_string(),
        ..Default::default()
    };
    StudentRepo::create(pool, &input, user_id, "approved")
        .await
        .unwrap();
    ParticipantRepo::resolve(pool, user_id).await.unwrap().unwrap()
}

async fn member(pool: &PgPool, email: &str, status: &str) -> (i64, i64) {
    let user_id = user(pool, email).await;
    let input = CreateCommunityMember {
        name: format!("Member {email}"),
        email: email.to_string(),
        ..Default::default()
    };
    let created = CommunityMemberRepo::create(pool, &input, user_id, status)
        .await
        .unwrap();
    (user_id, created.id)
}

fn post(title: &str) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        content: "How do I prepare for the reasoning section?".to_string(),
        category: None,
    }
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_member_is_not_a_participant(pool: PgPool) {
    let (user_id, member_id) = member(&pool, "m@x.test", "pending").await;
    assert!(ParticipantRepo::resolve(&pool, user_id).await.unwrap().is_none());

    CommunityMemberRepo::set_status(&pool, member_id, "approved")
        .await
        .unwrap();
    let participant = ParticipantRepo::resolve(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(participant.author_type, AUTHOR_MEMBER);
    assert_eq!(participant.id, member_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_identity_is_preferred(pool: PgPool) {
    let me = student(&pool, "s@x.test").await;
    assert_eq!(me.author_type, AUTHOR_STUDENT);

    let input = CreateCommunityMember {
        name: "Also a member".to_string(),
        email: "s-member@x.test".to_string(),
        ..Default::default()
    };
    CommunityMemberRepo::create(&pool, &input, me.user_id.unwrap(), "approved")
        .await
        .unwrap();

    let resolved = ParticipantRepo::resolve(&pool, me.user_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.author_type, AUTHOR_STUDENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn participant_user_ids_filters_to_approved(pool: PgPool) {
    let approved = student(&pool, "a@x.test").await.user_id.unwrap();
    let (pending, _) = member(&pool, "p@x.test", "pending").await;
    let outsider = user(&pool, "o@x.test").await;

    let ids = ParticipantRepo::participant_user_ids(&pool, &[outsider, pending, approved])
        .await
        .unwrap();
    assert_eq!(ids, vec![approved]);

    let none = ParticipantRepo::participant_user_ids(&pool, &[]).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Forum
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upvote_counts_once_per_participant(pool: PgPool) {
    let author = student(&pool, "a@x.test").await;
    let voter = student(&pool, "b@x.test").await;
    let created = ForumRepo::create_post(&pool, &author, &post("Reasoning"), "doubt")
        .await
        .unwrap();

    assert_eq!(ForumRepo::upvote_post(&pool, created.id, &voter).await.unwrap(), Some(1));
    assert_eq!(ForumRepo::upvote_post(&pool, created.id, &voter).await.unwrap(), Some(1));
    assert_eq!(ForumRepo::upvote_post(&pool, created.id, &author).await.unwrap(), Some(2));
    assert_eq!(ForumRepo::upvote_post(&pool, 9_999, &voter).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn best_answer_is_unique_and_sorted_first(pool: PgPool) {
    let author = student(&pool, "a@x.test").await;
    let helper = student(&pool, "b@x.test").await;
    let created = ForumRepo::create_post(&pool, &author, &post("Syllabus"), "doubt")
        .await
        .unwrap();

    let first = ForumRepo::create_reply(&pool, created.id, &helper, "Check the notice")
        .await
        .unwrap();
    let second = ForumRepo::create_reply(&pool, created.id, &helper, "Page 4 has it")
        .await
        .unwrap();

    ForumRepo::mark_best_answer(&pool, first.id).await.unwrap().unwrap();
    ForumRepo::mark_best_answer(&pool, second.id).await.unwrap().unwrap();

    let replies = ForumRepo::list_replies(&pool, created.id).await.unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].id, second.id);
    assert!(replies[0].is_best_answer);
    assert!(!replies[1].is_best_answer);

    let reloaded = ForumRepo::find_post(&pool, created.id).await.unwrap().unwrap();
    assert!(reloaded.is_answered);

    let listed = ForumRepo::list_posts(&pool, &PostFilter::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(listed[0].reply_count, 2);
}

// ---------------------------------------------------------------------------
// Direct messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reading_a_conversation_clears_unread(pool: PgPool) {
    let alice = student(&pool, "alice@x.test").await;
    let bob = student(&pool, "bob@x.test").await;

    ChatRepo::send_dm(&pool, &alice, &bob, "Hi Bob").await.unwrap();
    ChatRepo::send_dm(&pool, &alice, &bob, "Are you joining Sunday?")
        .await
        .unwrap();
    ChatRepo::send_dm(&pool, &bob, &alice, "Yes!").await.unwrap();

    let unread = ChatRepo::unread_counts(&pool, &bob).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].sender_id, alice.id);
    assert_eq!(unread[0].count, 2);

    let thread = ChatRepo::conversation(&pool, &bob, &alice.author_type, alice.id)
        .await
        .unwrap();
    assert_eq!(thread.len(), 3);
    assert_eq!(thread[0].content, "Hi Bob");

    assert!(ChatRepo::unread_counts(&pool, &bob).await.unwrap().is_empty());
    // Bob's reply is still unread for Alice.
    assert_eq!(ChatRepo::unread_counts(&pool, &alice).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chat_history_is_ascending(pool: PgPool) {
    let alice = student(&pool, "alice@x.test").await;
    for text in ["one", "two", "three"] {
        ChatRepo::post_message(&pool, &alice, text).await.unwrap();
    }

    let recent = ChatRepo::recent_messages(&pool, 2).await.unwrap();
    let contents: Vec<_> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["two", "three"]);
}
