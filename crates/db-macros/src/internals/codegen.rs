use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, LitStr, Type, parse_quote};

use super::types::{get_option_inner_type, FieldData, TableOptions};

fn lit(value: &str) -> LitStr {
    LitStr::new(value, proc_macro2::Span::call_site())
}

fn quoted(column: &str) -> String {
    format!("\"{}\"", column)
}

fn returning_columns(fields_data: &[FieldData]) -> String {
    fields_data.iter()
        .filter(|f| !f.is_skipped)
        .map(|f| quoted(&f.column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"a" = $n AND "b" = $n+1` over the primary key columns, starting at `first_placeholder`.
fn primary_key_predicate(fields_data: &[FieldData], first_placeholder: usize) -> String {
    fields_data.iter()
        .filter(|f| f.is_pk)
        .enumerate()
        .map(|(i, f)| format!("{} = ${}", quoted(&f.column), first_placeholder + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

pub fn generate_row_struct(row_struct_name: &Ident, fields_data: &[FieldData]) -> TokenStream {
    let row_struct_fields_defs: Vec<TokenStream> = fields_data.iter()
        .filter(|f| !f.is_skipped)
        .map(|field| {
            let field_ident = &field.ident;
            let row_field_ty: Type = if field.is_text_mapped {
                if field.is_option { parse_quote!(Option<String>) } else { parse_quote!(String) }
            } else {
                field.ty.clone()
            };

            if field.column != field_ident.to_string() {
                let column = lit(&field.column);
                quote! {
                    #[sqlx(rename = #column)]
                    pub #field_ident: #row_field_ty
                }
            } else {
                quote! { pub #field_ident: #row_field_ty }
            }
        })
        .collect();

    quote! {
        #[derive(::sqlx::FromRow, Debug, Clone)]
        #[automatically_derived]
        pub struct #row_struct_name {
            #(#row_struct_fields_defs),*
        }
    }
}

pub fn generate_sqlx_schema_impl(
    struct_name: &Ident,
    row_struct_name: &Ident,
    options: &TableOptions,
    fields_data: &[FieldData],
) -> TokenStream {
    let table_name_str = options.table_name.as_str();
    let active_fields: Vec<&FieldData> = fields_data.iter().filter(|f| !f.is_skipped).collect();

    let column_lits: Vec<LitStr> = active_fields.iter().map(|f| lit(&f.column)).collect();
    let pk_column_lits: Vec<LitStr> = active_fields.iter().filter(|f| f.is_pk).map(|f| lit(&f.column)).collect();
    let id_column_lit = pk_column_lits.first().cloned().unwrap_or_else(|| lit("id"));

    let from_row_assignments = generate_from_row_assignments(fields_data);
    let create_table_body = generate_create_table_sql(table_name_str, fields_data);
    let index_lits = generate_index_sqls(table_name_str, fields_data);

    let drop_table_sql_query = format!("DROP TABLE IF EXISTS \"{}\" CASCADE", table_name_str);
    let insert_sql_query = generate_insert_sql(table_name_str, fields_data);
    let update_sql_query = generate_update_sql(table_name_str, fields_data);
    let delete_sql_query = format!(
        "DELETE FROM \"{}\" WHERE {}",
        table_name_str,
        primary_key_predicate(fields_data, 1)
    );

    quote! {
        #[automatically_derived]
        impl ::sns_database::SqlxSchema for #struct_name {
            type Row = #row_struct_name;

            const TABLE_NAME: &'static str = #table_name_str;
            const ID_COLUMN_NAME: &'static str = #id_column_lit;
            const PRIMARY_KEY_COLUMNS: &'static [&'static str] = &[#( #pk_column_lits ),*];
            const COLUMNS: &'static [&'static str] = &[#( #column_lits ),*];
            const INDEXES_SQL: &'static [&'static str] = &[#( #index_lits ),*];

            fn from_row(row: Self::Row) -> Self {
                Self {
                    #(#from_row_assignments),*
                }
            }

            fn create_table_sql() -> String { #create_table_body }
            fn drop_table_sql() -> String { #drop_table_sql_query.to_string() }
            fn insert_sql() -> String { #insert_sql_query.to_string() }
            fn update_sql() -> String { #update_sql_query.to_string() }
            fn delete_sql() -> String { #delete_sql_query.to_string() }
        }
    }
}

pub fn generate_sqlx_crud_impl(struct_name: &Ident, fields_data: &[FieldData]) -> TokenStream {
    let insert_bindings: Vec<TokenStream> = fields_data.iter()
        .filter(|f| f.is_writable())
        .map(bind_stream)
        .collect();
    let update_bindings: Vec<TokenStream> = fields_data.iter()
        .filter(|f| f.is_writable() && !f.is_pk)
        .chain(fields_data.iter().filter(|f| f.is_pk))
        .map(bind_stream)
        .collect();
    let pk_bindings: Vec<TokenStream> = fields_data.iter()
        .filter(|f| f.is_pk)
        .map(bind_stream)
        .collect();

    quote! {
        #[automatically_derived]
        impl ::sns_database::SqlxCrud for #struct_name {
            fn bind_insert<'q>(
                &self,
                query: ::sqlx::query::QueryAs<'q, ::sqlx::Postgres, <Self as ::sns_database::SqlxSchema>::Row, ::sqlx::postgres::PgArguments>
            ) -> ::sqlx::query::QueryAs<'q, ::sqlx::Postgres, <Self as ::sns_database::SqlxSchema>::Row, ::sqlx::postgres::PgArguments> {
                query #(#insert_bindings)*
            }

            fn bind_update<'q>(
                &self,
                query: ::sqlx::query::QueryAs<'q, ::sqlx::Postgres, <Self as ::sns_database::SqlxSchema>::Row, ::sqlx::postgres::PgArguments>
            ) -> ::sqlx::query::QueryAs<'q, ::sqlx::Postgres, <Self as ::sns_database::SqlxSchema>::Row, ::sqlx::postgres::PgArguments> {
                query #(#update_bindings)*
            }

            fn bind_primary_key<'q>(
                &self,
                query: ::sqlx::query::Query<'q, ::sqlx::Postgres, ::sqlx::postgres::PgArguments>
            ) -> ::sqlx::query::Query<'q, ::sqlx::Postgres, ::sqlx::postgres::PgArguments> {
                query #(#pk_bindings)*
            }
        }
    }
}

pub fn generate_sqlx_filter_query_impl(struct_name: &Ident) -> TokenStream {
    quote! {
        #[automatically_derived]
        impl ::sns_database::SqlxFilterQuery for #struct_name {}
    }
}

/// `fetch_<name>` for every foreign key field, `<name>` being the field name
/// without its `_id` suffix.
pub fn generate_fetch_helpers(struct_name: &Ident, fields_data: &[FieldData]) -> TokenStream {
    let fetch_helper_methods: Vec<TokenStream> = fields_data.iter().filter_map(|field| {
        let fk_info = field.foreign_key.as_ref()?;
        let field_ident = &field.ident;
        let field_name = field_ident.to_string();
        let fetch_method_name = format_ident!("fetch_{}", field_name.strip_suffix("_id").unwrap_or(&field_name));
        let related_type = &fk_info.related_rust_type;
        let id_column_name_of_related_type = quote!{ <#related_type as ::sns_database::SqlxSchema>::id_column_name() };

        if field.is_option {
            Some(quote! {
                pub async fn #fetch_method_name<'exe, E>(
                    &self,
                    executor: E
                ) -> Result<Option<#related_type>, ::sqlx::Error>
                where
                    E: ::sqlx::Executor<'exe, Database = ::sqlx::Postgres> + Send,
                {
                    let Some(id_val) = self.#field_ident.clone() else {
                        return Ok(None);
                    };
                    let criteria = ::sns_database::QueryCriteria::new()
                        .add_valued_filter(#id_column_name_of_related_type, "=", id_val);
                    <#related_type as ::sns_database::SqlxFilterQuery>::find_one_by_criteria(criteria, executor).await
                }
            })
        } else {
            Some(quote! {
                pub async fn #fetch_method_name<'exe, E>(
                    &self,
                    executor: E
                ) -> Result<Option<#related_type>, ::sqlx::Error>
                where
                    E: ::sqlx::Executor<'exe, Database = ::sqlx::Postgres> + Send,
                {
                    let criteria = ::sns_database::QueryCriteria::new()
                        .add_valued_filter(#id_column_name_of_related_type, "=", self.#field_ident.clone());
                    <#related_type as ::sns_database::SqlxFilterQuery>::find_one_by_criteria(criteria, executor).await
                }
            })
        }
    }).collect();

    if fetch_helper_methods.is_empty() {
        return quote! {};
    }

    quote! {
        #[automatically_derived]
        impl #struct_name {
            #(#fetch_helper_methods)*
        }
    }
}

fn generate_from_row_assignments(fields_data: &[FieldData]) -> Vec<TokenStream> {
    fields_data.iter().map(|field| {
        let field_ident = &field.ident;

        if field.is_skipped {
            return quote! { #field_ident: Default::default() };
        }

        if field.is_text_mapped {
            let type_for_analysis = get_option_inner_type(&field.ty).unwrap_or_else(|| field.ty.clone());
            if field.is_option {
                quote! { #field_ident: row.#field_ident.map(|s| s.parse().unwrap_or_else(|_| <#type_for_analysis>::default())) }
            } else {
                quote! { #field_ident: row.#field_ident.parse().unwrap_or_else(|_| <#type_for_analysis>::default()) }
            }
        } else {
            quote! { #field_ident: row.#field_ident }
        }
    }).collect()
}

fn bind_stream(field: &FieldData) -> TokenStream {
    let field_ident = &field.ident;
    if field.is_text_mapped {
        if field.is_option {
            quote! { .bind(self.#field_ident.as_ref().map(|v| v.to_string())) }
        } else {
            quote! { .bind(self.#field_ident.to_string()) }
        }
    } else {
        quote! { .bind(self.#field_ident.clone()) }
    }
}

/// Body of `create_table_sql`. Foreign keys name the referenced column through
/// the related type, so the statement is assembled at runtime.
fn generate_create_table_sql(table_name_str: &str, fields_data: &[FieldData]) -> TokenStream {
    let active_fields: Vec<&FieldData> = fields_data.iter().filter(|f| !f.is_skipped).collect();
    let pk_count = active_fields.iter().filter(|f| f.is_pk).count();

    let column_defs: Vec<LitStr> = active_fields.iter().map(|field| {
        let mut col_def_parts = vec![quoted(&field.column), field.sql_type.clone()];

        if field.is_pk && pk_count == 1 {
            col_def_parts.push("PRIMARY KEY".to_string());
        } else if !field.is_option {
            col_def_parts.push("NOT NULL".to_string());
        }

        if let Some(default) = &field.column_default {
            col_def_parts.push(format!("DEFAULT {}", default));
        }

        if let Some(check) = &field.check {
            col_def_parts.push(format!("CHECK ({})", check));
        }

        if field.unique {
            col_def_parts.push("UNIQUE".to_string());
        }

        lit(&col_def_parts.join(" "))
    }).collect();

    let composite_pk = if pk_count > 1 {
        let pk_columns = active_fields.iter()
            .filter(|f| f.is_pk)
            .map(|f| quoted(&f.column))
            .collect::<Vec<_>>()
            .join(", ");
        let clause = lit(&format!("PRIMARY KEY ({})", pk_columns));
        quote! { parts.push(#clause.to_string()); }
    } else {
        quote! {}
    };

    let foreign_keys: Vec<TokenStream> = active_fields.iter().filter_map(|field| {
        let fk_info = field.foreign_key.as_ref()?;
        let related_type = &fk_info.related_rust_type;
        let column = lit(&field.column);
        let referenced_table = lit(&fk_info.referenced_table);
        let on_delete = lit(&fk_info.on_delete);
        let on_update = lit(&fk_info.on_update);
        Some(quote! {
            parts.push(format!(
                "FOREIGN KEY (\"{}\") REFERENCES \"{}\"(\"{}\") ON DELETE {} ON UPDATE {}",
                #column,
                #referenced_table,
                <#related_type as ::sns_database::SqlxSchema>::ID_COLUMN_NAME,
                #on_delete,
                #on_update,
            ));
        })
    }).collect();

    quote! {
        let mut parts: Vec<String> = vec![#( #column_defs.to_string() ),*];
        #composite_pk
        #(#foreign_keys)*
        format!("CREATE TABLE IF NOT EXISTS \"{}\" ({})", #table_name_str, parts.join(", "))
    }
}

fn generate_index_sqls(table_name_str: &str, fields_data: &[FieldData]) -> Vec<LitStr> {
    fields_data.iter()
        .filter(|f| !f.is_skipped && f.indexed)
        .map(|field| {
            let index_name = format!("idx_{}_{}", table_name_str, field.column);
            lit(&format!(
                "CREATE INDEX IF NOT EXISTS \"{}\" ON \"{}\" (\"{}\")",
                index_name, table_name_str, field.column
            ))
        })
        .collect()
}

fn generate_insert_sql(table_name_str: &str, fields_data: &[FieldData]) -> String {
    let insert_columns: Vec<String> = fields_data.iter()
        .filter(|f| f.is_writable())
        .map(|f| quoted(&f.column))
        .collect();
    let returning = returning_columns(fields_data);

    if insert_columns.is_empty() {
        return format!("INSERT INTO \"{}\" DEFAULT VALUES RETURNING {}", table_name_str, returning);
    }

    let placeholders = (1..=insert_columns.len()).map(|i| format!("${}", i)).collect::<Vec<String>>().join(", ");
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING {}",
        table_name_str,
        insert_columns.join(", "),
        placeholders,
        returning
    )
}

fn generate_update_sql(table_name_str: &str, fields_data: &[FieldData]) -> String {
    let set_clauses: Vec<String> = fields_data.iter()
        .filter(|f| f.is_writable() && !f.is_pk)
        .enumerate()
        .map(|(i, f)| format!("{} = ${}", quoted(&f.column), i + 1))
        .collect();
    let returning = returning_columns(fields_data);

    if set_clauses.is_empty() {
        format!(
            "SELECT {} FROM \"{}\" WHERE {}",
            returning,
            table_name_str,
            primary_key_predicate(fields_data, 1)
        )
    } else {
        format!(
            "UPDATE \"{}\" SET {} WHERE {} RETURNING {}",
            table_name_str,
            set_clauses.join(", "),
            primary_key_predicate(fields_data, set_clauses.len() + 1),
            returning
        )
    }
}
