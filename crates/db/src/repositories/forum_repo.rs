//! Repository for the community forum: posts, replies, upvotes and best
//! answers.

use sqlx::PgPool;
use sangam_core::community::Participant;
use sangam_core::search::like_pattern;
use sangam_core::types::DbId;

use crate::models::community::{CreatePost, Post, PostFilter, PostSummary, Reply};

const POST_COLUMNS: &str = "id, author_type, author_id, author_name, title, content, category, \
                            is_answered, upvotes, created_at, updated_at";

const REPLY_COLUMNS: &str = "id, post_id, author_type, author_id, author_name, content, \
                             is_best_answer, upvotes, created_at, updated_at";

pub struct ForumRepo;

impl ForumRepo {
    pub async fn create_post(
        pool: &PgPool,
        author: &Participant,
        input: &CreatePost,
        category: &str,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_posts (author_type, author_id, author_name, title, content, category)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&author.author_type)
            .bind(author.id)
            .bind(&author.name)
            .bind(input.title.trim())
            .bind(&input.content)
            .bind(category)
            .fetch_one(pool)
            .await
    }

    pub async fn find_post(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {POST_COLUMNS} FROM community_posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Posts with reply counts, newest first.
    pub async fn list_posts(
        pool: &PgPool,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostSummary>, sqlx::Error> {
        sqlx::query_as::<_, PostSummary>(
            "SELECT p.id, p.author_type, p.author_id, p.author_name, p.title, p.content,
                    p.category, p.is_answered, p.upvotes, COUNT(r.id) AS reply_count, p.created_at
             FROM community_posts p
             LEFT JOIN community_replies r ON r.post_id = p.id
             WHERE ($1::TEXT IS NULL OR p.category = $1)
               AND ($2::TEXT IS NULL OR p.title ILIKE $2 OR p.content ILIKE $2)
             GROUP BY p.id
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(&filter.category)
        .bind(like_pattern(filter.search.as_deref()))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn delete_post(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM community_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Replies
    // -----------------------------------------------------------------------

    pub async fn create_reply(
        pool: &PgPool,
        post_id: DbId,
        author: &Participant,
        content: &str,
    ) -> Result<Reply, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_replies (post_id, author_type, author_id, author_name, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REPLY_COLUMNS}"
        );
        sqlx::query_as::<_, Reply>(&query)
            .bind(post_id)
            .bind(&author.author_type)
            .bind(author.id)
            .bind(&author.name)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_reply(pool: &PgPool, id: DbId) -> Result<Option<Reply>, sqlx::Error> {
        let query = format!("SELECT {REPLY_COLUMNS} FROM community_replies WHERE id = $1");
        sqlx::query_as::<_, Reply>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replies to a post: best answer first, then most upvoted, then oldest.
    pub async fn list_replies(pool: &PgPool, post_id: DbId) -> Result<Vec<Reply>, sqlx::Error> {
        let query = format!(
            "SELECT {REPLY_COLUMNS} FROM community_replies
             WHERE post_id = $1
             ORDER BY is_best_answer DESC, upvotes DESC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Reply>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }

    /// Make `reply_id` the single best answer of its post and mark the post
    /// answered.
    pub async fn mark_best_answer(pool: &PgPool, reply_id: DbId) -> Result<Option<Reply>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let post: Option<(DbId,)> =
            sqlx::query_as("SELECT post_id FROM community_replies WHERE id = $1")
                .bind(reply_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((post_id,)) = post else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE community_replies SET is_best_answer = false
             WHERE post_id = $1 AND is_best_answer = true AND id <> $2",
        )
        .bind(post_id)
        .bind(reply_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE community_replies SET is_best_answer = true WHERE id = $1
             RETURNING {REPLY_COLUMNS}"
        );
        let reply = sqlx::query_as::<_, Reply>(&query)
            .bind(reply_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE community_posts SET is_answered = true WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(reply))
    }

    // -----------------------------------------------------------------------
    // Upvotes
    // -----------------------------------------------------------------------

    /// Record one upvote per participant. Returns the post's upvote count,
    /// or `None` when the post does not exist.
    pub async fn upvote_post(
        pool: &PgPool,
        post_id: DbId,
        voter: &Participant,
    ) -> Result<Option<i32>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO community_post_upvotes (post_id, voter_type, voter_id)
             SELECT id, $2, $3 FROM community_posts WHERE id = $1
             ON CONFLICT ON CONSTRAINT uq_community_post_upvotes_voter DO NOTHING",
        )
        .bind(post_id)
        .bind(&voter.author_type)
        .bind(voter.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let increment = i32::from(inserted > 0);
        let upvotes: Option<(i32,)> = sqlx::query_as(
            "UPDATE community_posts SET upvotes = upvotes + $2 WHERE id = $1 RETURNING upvotes",
        )
        .bind(post_id)
        .bind(increment)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(upvotes.map(|(n,)| n))
    }

    /// Same as [`ForumRepo::upvote_post`] for replies.
    pub async fn upvote_reply(
        pool: &PgPool,
        reply_id: DbId,
        voter: &Participant,
    ) -> Result<Option<i32>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO community_reply_upvotes (reply_id, voter_type, voter_id)
             SELECT id, $2, $3 FROM community_replies WHERE id = $1
             ON CONFLICT ON CONSTRAINT uq_community_reply_upvotes_voter DO NOTHING",
        )
        .bind(reply_id)
        .bind(&voter.author_type)
        .bind(voter.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let increment = i32::from(inserted > 0);
        let upvotes: Option<(i32,)> = sqlx::query_as(
            "UPDATE community_replies SET upvotes = upvotes + $2 WHERE id = $1 RETURNING upvotes",
        )
        .bind(reply_id)
        .bind(increment)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(upvotes.map(|(n,)| n))
    }

    pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM community_posts")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
