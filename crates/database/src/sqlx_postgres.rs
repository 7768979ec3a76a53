use sqlx::{FromRow, Postgres, Error as SqlxError, postgres::PgArguments, Executor};

/// Schema of a table mapped by `#[derive(SqlxObject)]`.
pub trait SqlxSchema: Send + Sync + Unpin + Clone + std::fmt::Debug {
    /// The intermediate type that implements FromRow, used for fetching from the database.
    type Row: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin;

    const TABLE_NAME: &'static str;
    /// First primary key column; the referenced column of foreign keys.
    const ID_COLUMN_NAME: &'static str;
    const PRIMARY_KEY_COLUMNS: &'static [&'static str];
    /// Physical column names, in declaration order.
    const COLUMNS: &'static [&'static str];
    const INDEXES_SQL: &'static [&'static str];

    fn id_column_name() -> &'static str { Self::ID_COLUMN_NAME }
    fn table_name() -> &'static str { Self::TABLE_NAME }
    fn columns() -> &'static [&'static str] { Self::COLUMNS }
    fn indexes_sql() -> &'static [&'static str] { Self::INDEXES_SQL }

    fn select_columns_sql() -> String {
        Self::COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
    }

    /// Converts the intermediate Row type to the Self type.
    fn from_row(row: Self::Row) -> Self;

    fn create_table_sql() -> String;
    fn drop_table_sql() -> String;
    fn insert_sql() -> String;
    /// `UPDATE ... RETURNING`, or a plain select by key when every column is part of the key.
    fn update_sql() -> String;
    fn delete_sql() -> String;
}

/// CRUD on single rows, identified by their primary key.
#[async_trait::async_trait]
pub trait SqlxCrud: SqlxSchema + SqlxFilterQuery + Sized {
    /// Binds the writable columns for `insert_sql`.
    fn bind_insert<'q>(&self, query: sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>)
        -> sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>;

    /// Binds the writable columns, then the key columns, for `update_sql`.
    fn bind_update<'q>(&self, query: sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>)
        -> sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>;

    /// Binds the key columns for `delete_sql`.
    fn bind_primary_key<'q>(&self, query: sqlx::query::Query<'q, Postgres, PgArguments>)
        -> sqlx::query::Query<'q, Postgres, PgArguments>;

    /// Inserts the row and returns it as stored, with database defaults filled in.
    async fn create<'e, E>(self, executor: E) -> Result<Self, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        let sql = Self::insert_sql();
        self.bind_insert(sqlx::query_as::<_, Self::Row>(&sql))
            .fetch_one(executor)
            .await
            .map(Self::from_row)
    }

    /// Writes every writable column of the row identified by the primary key.
    async fn update<'e, E>(self, executor: E) -> Result<Self, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        let sql = Self::update_sql();
        self.bind_update(sqlx::query_as::<_, Self::Row>(&sql))
            .fetch_one(executor)
            .await
            .map(Self::from_row)
    }

    /// Deletes the row identified by the primary key, returning the number of rows removed.
    async fn delete<'e, E>(self, executor: E) -> Result<u64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        let sql = Self::delete_sql();
        self.bind_primary_key(sqlx::query(&sql))
            .execute(executor)
            .await
            .map(|done| done.rows_affected())
    }
}

/// Specifies the direction for ordering query results.
#[derive(Debug, Clone, Copy)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Lets `QueryCriteria` hold boxed argument values of different types.
pub trait AsSqlxArg: Send + Sync {
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError>;
}

impl<T> AsSqlxArg for T
where
    T: for<'a> sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
{
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError> {
        use sqlx::Arguments;
        args.add(self.clone()).map_err(SqlxError::Encode)
    }
}

/// Represents a single filter condition for a database query.
pub struct FilterCondition {
    /// Physical column name.
    pub column: &'static str,
    pub operator: &'static str,
    /// Holds the value for the condition's placeholder, if any.
    pub value: Option<Box<dyn AsSqlxArg>>,
}

impl FilterCondition {
    /// Renders the condition, binding its value (if any) at the next placeholder.
    /// Array operators (`= ANY`, `<> ALL`) get their placeholder in parentheses.
    pub fn push_sql(&self, arguments: &mut PgArguments, placeholder_idx: &mut usize) -> Result<String, SqlxError> {
        let Some(value) = &self.value else {
            return Ok(format!("\"{}\" {}", self.column, self.operator));
        };

        value.add_to_args(arguments)?;
        let idx = *placeholder_idx;
        *placeholder_idx += 1;

        let operator = self.operator.trim_end();
        if operator.ends_with("ANY") || operator.ends_with("ALL") {
            Ok(format!("\"{}\" {}(${})", self.column, operator, idx))
        } else {
            Ok(format!("\"{}\" {} ${}", self.column, operator, idx))
        }
    }
}

/// Criteria for a filtered query: AND-ed conditions, ordering and paging.
#[derive(Default)]
pub struct QueryCriteria {
    pub conditions: Vec<FilterCondition>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Vec<(&'static str, OrderDirection)>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter condition that may or may not have a value.
    pub fn add_filter<V>(mut self, column: &'static str, operator: &'static str, value: Option<V>) -> Self
    where
        V: for<'a> ::sqlx::Encode<'a, Postgres> + ::sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.conditions.push(FilterCondition {
            column,
            operator,
            value: value.map(|v| Box::new(v) as Box<dyn AsSqlxArg>),
        });
        self
    }

    pub fn add_valued_filter<V>(self, column: &'static str, operator: &'static str, value: V) -> Self
    where
        V: for<'a> ::sqlx::Encode<'a, Postgres> + ::sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.add_filter(column, operator, Some(value))
    }

    pub fn limit(mut self, limit_val: i64) -> Self {
        self.limit = Some(limit_val);
        self
    }

    pub fn offset(mut self, offset_val: i64) -> Self {
        self.offset = Some(offset_val);
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: OrderDirection) -> Self {
        self.order_by.push((column, direction));
        self
    }

    /// `WHERE ...` clause for the conditions, empty when there are none.
    pub fn where_sql(&self, arguments: &mut PgArguments, placeholder_idx: &mut usize) -> Result<String, SqlxError> {
        if self.conditions.is_empty() {
            return Ok(String::new());
        }

        let clauses = self.conditions.iter()
            .map(|condition| condition.push_sql(arguments, placeholder_idx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!(" WHERE {}", clauses.join(" AND ")))
    }

    /// `ORDER BY`, `LIMIT` and `OFFSET` clauses, in that order.
    pub fn tail_sql(&self, arguments: &mut PgArguments, placeholder_idx: &mut usize) -> Result<String, SqlxError> {
        use sqlx::Arguments;
        let mut sql = String::new();

        if !self.order_by.is_empty() {
            let order_clauses: Vec<String> = self.order_by.iter()
                .map(|(col, dir)| format!("\"{}\" {}", col, dir.as_sql()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", order_clauses.join(", ")));
        }

        if let Some(limit_val) = self.limit {
            arguments.add(limit_val).map_err(SqlxError::Encode)?;
            sql.push_str(&format!(" LIMIT ${}", placeholder_idx));
            *placeholder_idx += 1;
        }

        if let Some(offset_val) = self.offset {
            arguments.add(offset_val).map_err(SqlxError::Encode)?;
            sql.push_str(&format!(" OFFSET ${}", placeholder_idx));
            *placeholder_idx += 1;
        }

        Ok(sql)
    }

    /// Full `SELECT` for the given table and columns.
    pub fn select_sql<T: SqlxSchema>(&self, arguments: &mut PgArguments) -> Result<String, SqlxError> {
        let mut placeholder_idx = 1;
        let mut sql = format!("SELECT {} FROM \"{}\"", T::select_columns_sql(), T::TABLE_NAME);
        sql.push_str(&self.where_sql(arguments, &mut placeholder_idx)?);
        sql.push_str(&self.tail_sql(arguments, &mut placeholder_idx)?);
        Ok(sql)
    }
}

/// Finding and counting by dynamic criteria.
#[async_trait::async_trait]
pub trait SqlxFilterQuery: SqlxSchema + Sized {
    async fn find_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<Vec<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        let mut arguments = PgArguments::default();
        let sql = criteria.select_sql::<Self>(&mut arguments)?;

        sqlx::query_as_with::<_, Self::Row, _>(&sql, arguments)
            .fetch_all(executor)
            .await
            .map(|rows| rows.into_iter().map(Self::from_row).collect())
    }

    /// First match of the criteria; adds `LIMIT 1` unless a limit is set.
    async fn find_one_by_criteria<'e, E>(
        mut criteria: QueryCriteria,
        executor: E,
    ) -> Result<Option<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        if criteria.limit.is_none() {
            criteria = criteria.limit(1);
        };
        let mut results = Self::find_by_criteria(criteria, executor).await?;
        Ok(results.pop())
    }

    /// Number of rows matching the conditions; ordering and paging are ignored.
    async fn count_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<i64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
        Self: Send,
    {
        let mut arguments = PgArguments::default();
        let mut placeholder_idx = 1;
        let sql = format!(
            "SELECT COUNT(*) FROM \"{}\"{}",
            Self::TABLE_NAME,
            criteria.where_sql(&mut arguments, &mut placeholder_idx)?
        );

        sqlx::query_scalar_with::<_, i64, _>(&sql, arguments)
            .fetch_one(executor)
            .await
    }
}
