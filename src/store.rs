use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::{ debug, info };

use crate::error::Result;
use crate::models::{ BookRecord, NewBook, NewUser, Page, RatingRecord, UserRecord };

/// `id` stays in the projection so `ORDER BY id` keeps record-id ordering
const USER_FIELDS: &str = "id, <string> record::id(id) AS recordKey, username, role";
const BOOK_FIELDS: &str =
    "id, <string> record::id(id) AS recordKey, title, author, publishedYear, fiction";
const RATING_FIELDS: &str = "userId, bookId, rating";

const SCHEMA: &str =
    r#"
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS book SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS hasRead SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS hasReadUserBook ON TABLE hasRead FIELDS userId, bookId UNIQUE;
    DEFINE INDEX IF NOT EXISTS hasReadBook ON TABLE hasRead FIELDS bookId;
"#;

#[derive(Clone, Debug)]
pub struct StoreClient {
    pub db: Surreal<Any>,
}

impl StoreClient {
    /// Open a new store connection.
    ///
    /// Credentials are optional because the embedded `mem://` engine runs
    /// without authentication.
    pub async fn new(
        connection_url: &str,
        credentials: Option<(&str, &str)>,
        namespace: &str,
        database: &str
    ) -> Result<Self> {
        info!("Connecting to SurrealDB at {}", connection_url);

        let db: Surreal<Any> = Surreal::init();
        db.connect(connection_url).await?;

        if let Some((username, password)) = credentials {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(namespace).use_db(database).await?;

        info!("Successfully connected to SurrealDB");
        Ok(Self { db })
    }

    /// Define tables and the uniqueness constraint on ratings. Idempotent.
    pub async fn define_schema(&self) -> Result<()> {
        self.db.query(SCHEMA).await?.check()?;
        debug!("Store schema defined");
        Ok(())
    }

    /// Round trip used by health checks and pool recycling
    pub async fn ping(&self) -> Result<()> {
        self.db.query("RETURN 1").await?.check()?;
        Ok(())
    }

    /// List users in record-id order
    pub async fn list_users(&self, page: Page) -> Result<Vec<UserRecord>> {
        let sql = format!("SELECT {} FROM user ORDER BY id{}", USER_FIELDS, page.clause());

        let mut query = self.db.query(sql);
        if let Some(limit) = page.limit {
            query = query.bind(("limit", limit));
        }
        if let Some(offset) = page.offset {
            query = query.bind(("offset", offset));
        }

        let mut result = query.await?;
        let users: Vec<UserRecord> = result.take(0)?;
        Ok(users)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM type::thing('user', $user_id)", USER_FIELDS);

        let mut result = self.db.query(sql).bind(("user_id", user_id.to_string())).await?;
        let users: Vec<UserRecord> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// List books in record-id order, optionally keeping only one fiction flag
    pub async fn list_books(&self, fiction: Option<bool>, page: Page) -> Result<Vec<BookRecord>> {
        let filter = if fiction.is_some() { " WHERE fiction = $fiction" } else { "" };
        let sql = format!(
            "SELECT {} FROM book{} ORDER BY id{}",
            BOOK_FIELDS,
            filter,
            page.clause()
        );

        let mut query = self.db.query(sql);
        if let Some(fiction) = fiction {
            query = query.bind(("fiction", fiction));
        }
        if let Some(limit) = page.limit {
            query = query.bind(("limit", limit));
        }
        if let Some(offset) = page.offset {
            query = query.bind(("offset", offset));
        }

        let mut result = query.await?;
        let books: Vec<BookRecord> = result.take(0)?;
        Ok(books)
    }

    pub async fn get_book(&self, book_id: &str) -> Result<Option<BookRecord>> {
        let sql = format!("SELECT {} FROM type::thing('book', $book_id)", BOOK_FIELDS);

        let mut result = self.db.query(sql).bind(("book_id", book_id.to_string())).await?;
        let books: Vec<BookRecord> = result.take(0)?;
        Ok(books.into_iter().next())
    }

    /// Ratings written by one user
    pub async fn ratings_by_user(&self, user_id: &str) -> Result<Vec<RatingRecord>> {
        let sql = format!(
            "SELECT {} FROM hasRead WHERE userId = $user_id ORDER BY bookId",
            RATING_FIELDS
        );

        let mut result = self.db.query(sql).bind(("user_id", user_id.to_string())).await?;
        let ratings: Vec<RatingRecord> = result.take(0)?;
        Ok(ratings)
    }

    /// Ratings given to one book
    pub async fn ratings_for_book(&self, book_id: &str) -> Result<Vec<RatingRecord>> {
        let sql = format!(
            "SELECT {} FROM hasRead WHERE bookId = $book_id ORDER BY userId",
            RATING_FIELDS
        );

        let mut result = self.db.query(sql).bind(("book_id", book_id.to_string())).await?;
        let ratings: Vec<RatingRecord> = result.take(0)?;
        Ok(ratings)
    }

    /// Bare rating values of one user, input to the average aggregate
    pub async fn rating_values(&self, user_id: &str) -> Result<Vec<i64>> {
        let query = "SELECT VALUE rating FROM hasRead WHERE userId = $user_id";

        let mut result = self.db.query(query).bind(("user_id", user_id.to_string())).await?;
        let values: Vec<i64> = result.take(0)?;
        Ok(values)
    }

    /// Create or overwrite the rating of `(user_id, book_id)` in one statement.
    ///
    /// The record id is the `[userId, bookId]` pair, so concurrent upserts of
    /// the same pair all land on the same row.
    pub async fn upsert_rating(
        &self,
        user_id: &str,
        book_id: &str,
        rating: i64
    ) -> Result<Option<RatingRecord>> {
        let query =
            r#"
            UPSERT type::thing('hasRead', [$user_id, $book_id]) SET
                userId = $user_id,
                bookId = $book_id,
                rating = $rating
        "#;

        let mut result = self.db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("book_id", book_id.to_string()))
            .bind(("rating", rating)).await?;

        let upserted: Vec<RatingRecord> = result.take(0)?;
        Ok(upserted.into_iter().next())
    }

    /// Delete the rating of `(user_id, book_id)`; returns whether a row existed
    pub async fn delete_rating(&self, user_id: &str, book_id: &str) -> Result<bool> {
        let query = r#"
            DELETE type::thing('hasRead', [$user_id, $book_id]) RETURN BEFORE
        "#;

        let mut result = self.db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("book_id", book_id.to_string())).await?;

        let deleted: Vec<RatingRecord> = result.take(0)?;
        Ok(!deleted.is_empty())
    }

    /// Insert or replace a user under its given key
    pub async fn upsert_user(&self, user: &NewUser) -> Result<()> {
        let query =
            r#"
            UPSERT type::thing('user', $user_id) SET
                username = $username,
                role = $role
            RETURN NONE
        "#;

        self.db
            .query(query)
            .bind(("user_id", user.id.clone()))
            .bind(("username", user.username.clone()))
            .bind(("role", user.role.clone())).await?
            .check()?;

        debug!("Upserted user {}", user.id);
        Ok(())
    }

    /// Insert or replace a book under its given key
    pub async fn upsert_book(&self, book: &NewBook) -> Result<()> {
        let query =
            r#"
            UPSERT type::thing('book', $book_id) SET
                title = $title,
                author = $author,
                publishedYear = $published_year,
                fiction = $fiction
            RETURN NONE
        "#;

        self.db
            .query(query)
            .bind(("book_id", book.id.clone()))
            .bind(("title", book.title.clone()))
            .bind(("author", book.author.clone()))
            .bind(("published_year", book.published_year))
            .bind(("fiction", book.fiction)).await?
            .check()?;

        debug!("Upserted book {}", book.id);
        Ok(())
    }
}
