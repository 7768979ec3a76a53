use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

pub const DEFAULT_REFERENTIAL_ACTION: &str = "NO ACTION";

#[derive(Debug)]
pub struct ForeignKeyInfo {
    pub referenced_table: String,
    pub related_rust_type: syn::Ident,
    pub on_delete: String,
    pub on_update: String,
}

/// Struct-level options of `#[derive(SqlxObject)]`.
#[derive(Debug)]
pub struct TableOptions {
    pub table_name: String,
    /// Rust field names forming an explicit (possibly composite) primary key.
    pub primary_key: Option<Vec<String>>,
}

pub struct FieldData {
    pub ident: syn::Ident,
    /// Physical column name.
    pub column: String,
    pub ty: syn::Type,
    pub is_option: bool,
    pub is_pk: bool,
    /// Integer `id` primary key filled in by the database.
    pub is_auto_pk: bool,
    pub is_skipped: bool,
    /// Stored as TEXT through `Display` / `FromStr`.
    pub is_text_mapped: bool,
    /// Never written by INSERT or UPDATE; the database supplies the value.
    pub is_db_managed: bool,
    pub sql_type: String,
    pub column_default: Option<String>,
    pub check: Option<String>,
    pub foreign_key: Option<ForeignKeyInfo>,
    pub unique: bool,
    pub indexed: bool,
}

impl FieldData {
    pub fn is_writable(&self) -> bool {
        !self.is_skipped && !self.is_auto_pk && !self.is_db_managed
    }
}

impl std::fmt::Debug for FieldData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldData")
            .field("ident", &self.ident.to_string())
            .field("column", &self.column)
            .field("ty", &self.ty.to_token_stream().to_string())
            .field("is_option", &self.is_option)
            .field("is_pk", &self.is_pk)
            .field("is_auto_pk", &self.is_auto_pk)
            .field("is_skipped", &self.is_skipped)
            .field("is_text_mapped", &self.is_text_mapped)
            .field("is_db_managed", &self.is_db_managed)
            .field("sql_type", &self.sql_type)
            .field("column_default", &self.column_default)
            .field("check", &self.check)
            .field("foreign_key", &self.foreign_key)
            .field("unique", &self.unique)
            .field("indexed", &self.indexed)
            .finish()
    }
}

pub fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(last_segment) = type_path.path.segments.last() {
            return last_segment.ident == "Option";
        }
    }
    false
}

pub fn get_option_inner_type(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty {
        if let Some(last_segment) = type_path.path.segments.last() {
            if last_segment.ident == "Option" {
                if let PathArguments::AngleBracketed(angle_args) = &last_segment.arguments {
                    if angle_args.args.len() == 1 {
                        if let GenericArgument::Type(inner_ty) = &angle_args.args[0] {
                            return Some(inner_ty.clone());
                        }
                    }
                }
            }
        }
    }
    None
}

pub fn get_fully_qualified_type_string(ty: &Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}

pub fn is_integer_type(ty: &Type) -> bool {
    matches!(get_fully_qualified_type_string(ty).as_str(), "i32" | "i64")
}

pub fn is_simple_type(ty: &Type) -> bool {
    let type_str = get_fully_qualified_type_string(ty);
    matches!(type_str.as_str(),
        "String" | "std::string::String" |
        "i16" | "i32" | "i64" | "f32" | "f64" | "bool" | "Vec<u8>" |
        "DateTime<Utc>" | "::chrono::DateTime<::chrono::Utc>" | "chrono::DateTime<chrono::Utc>" |
        "NaiveDateTime" | "::chrono::NaiveDateTime" | "chrono::NaiveDateTime" |
        "NaiveDate" | "::chrono::NaiveDate" | "chrono::NaiveDate"
    ) || type_str.starts_with("Json<") || type_str.starts_with("::sqlx::types::Json<") || type_str.starts_with("sqlx::types::Json<")
}

/// SQL type of a non-optional Rust type. Anything that is not a known simple
/// type is treated as an enum stored as TEXT.
pub fn map_rust_type_to_sql(ty: &Type, is_auto_pk: bool) -> String {
    let type_str = get_fully_qualified_type_string(ty);

    if is_auto_pk {
        return match type_str.as_str() {
            "i64" => "BIGSERIAL".to_string(),
            _ => "SERIAL".to_string(),
        };
    }

    match type_str.as_str() {
        "String" | "std::string::String" => "TEXT".to_string(),
        "i16" => "SMALLINT".to_string(),
        "i32" => "INTEGER".to_string(),
        "i64" => "BIGINT".to_string(),
        "f32" => "REAL".to_string(),
        "f64" => "DOUBLE PRECISION".to_string(),
        "bool" => "BOOLEAN".to_string(),
        "Vec<u8>" => "BYTEA".to_string(),
        s if s.starts_with("Json<") || s.starts_with("::sqlx::types::Json<") || s.starts_with("sqlx::types::Json<") => "JSONB".to_string(),
        "DateTime<Utc>" | "::chrono::DateTime<::chrono::Utc>" | "chrono::DateTime<chrono::Utc>" => "TIMESTAMPTZ".to_string(),
        "NaiveDateTime" | "::chrono::NaiveDateTime" | "chrono::NaiveDateTime" => "TIMESTAMP".to_string(),
        "NaiveDate" | "::chrono::NaiveDate" | "chrono::NaiveDate" => "DATE".to_string(),
        _ => "TEXT".to_string(),
    }
}

/// `Post` -> `posts`, `UserFollow` -> `user_follows`.
pub fn default_table_name(struct_name: &str) -> String {
    let mut snake = String::new();
    for (i, ch) in struct_name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake + "s"
}
