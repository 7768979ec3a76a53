/// Declares the application's database pool and its schema.
///
/// Types are listed in dependency order: a table must come after the tables
/// its foreign keys reference.
///
/// # Generated Functions
/// - `async fn create_tables(pool: &PgPool) -> anyhow::Result<()>`: creates every listed table, then its indexes.
/// - `async fn drop_tables(pool: &PgPool) -> anyhow::Result<()>`: drops every listed table (`CASCADE`).
/// - `async fn connect(drop_tables: bool, create_tables: bool) -> anyhow::Result<&'static PgPool>`:
///   connects to `DATABASE_URL` once and optionally resets the schema.
///
/// # Example
/// ```rust,ignore
/// init_databases!(
///     default: [User, Post, Like]
/// );
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let pool = connect(false, true).await?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! init_databases {
    (
        default: [$($default_type:ty),* $(,)?]
    ) => {
        static POOL: $crate::__private::tokio::sync::OnceCell<$crate::__private::sqlx::PgPool> =
            $crate::__private::tokio::sync::OnceCell::const_new();

        #[allow(dead_code)]
        async fn create_tables(pool: &$crate::__private::sqlx::PgPool) -> $crate::__private::anyhow::Result<()> {
            $(
                let create_table_sql_str = <$default_type as $crate::SqlxSchema>::create_table_sql();
                $crate::__private::sqlx::query(&create_table_sql_str).execute(pool).await
                    .map_err(|e| $crate::__private::anyhow::anyhow!("Failed to create table for '{}'. Error: {:?}", stringify!($default_type), e))?;
            )*

            $(
                for index_sql in <$default_type as $crate::SqlxSchema>::INDEXES_SQL {
                    $crate::__private::sqlx::query(index_sql).execute(pool).await
                        .map_err(|e| $crate::__private::anyhow::anyhow!("Failed to create index for '{}'. SQL: {}. Error: {:?}", stringify!($default_type), index_sql, e))?;
                }
            )*

            Ok(())
        }

        #[allow(dead_code)]
        async fn drop_tables(pool: &$crate::__private::sqlx::PgPool) -> $crate::__private::anyhow::Result<()> {
            $(
                let drop_table_sql_str = <$default_type as $crate::SqlxSchema>::drop_table_sql();
                if let Err(e) = $crate::__private::sqlx::query(&drop_table_sql_str).execute(pool).await {
                    $crate::__private::tracing::warn!("Failed to drop table for '{}'. Error: {:?}", stringify!($default_type), e);
                }
            )*
            Ok(())
        }

        #[allow(dead_code)]
        async fn connect(drop: bool, create: bool) -> $crate::__private::anyhow::Result<&'static $crate::__private::sqlx::PgPool> {
            POOL.get_or_try_init(|| async {
                let database_url = std::env::var("DATABASE_URL")
                    .map_err(|_| $crate::__private::anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

                let pool = $crate::__private::sqlx::PgPool::connect(&database_url).await?;

                if drop {
                    drop_tables(&pool).await?;
                }

                if create {
                    create_tables(&pool).await?;
                }

                Ok::<_, $crate::__private::anyhow::Error>(pool)
            }).await
        }
    };
}
